//! Services - the aggregation/query engine
//!
//! - `people` - People-count aggregation (per-day granularity)
//! - `vehicles` - Vehicle-event aggregation (full-instant granularity)
//! - `summary` - Response record composition
//! - `dashboard` - Per-request pipeline tying the three together

pub mod dashboard;
pub mod people;
pub mod summary;
pub mod vehicles;

// Re-export commonly used types
pub use dashboard::{Dashboard, QueryError};
pub use summary::Summary;
