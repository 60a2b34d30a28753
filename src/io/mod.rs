//! IO modules - external system interfaces
//!
//! - `store` - Counting store client (MongoDB, behind a trait)
//! - `http` - Dashboard HTTP endpoint

pub mod http;
pub mod store;

// Re-export commonly used types
pub use http::start_dashboard_server;
pub use store::{CountingStore, MongoStore};
