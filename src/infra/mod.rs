//! Infrastructure - configuration
//!
//! - `config` - Application configuration (TOML loading, env
//!   overrides, defaults)

pub mod config;

// Re-export commonly used types
pub use config::Config;
