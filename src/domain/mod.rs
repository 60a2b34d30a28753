//! Domain - core value types for the aggregation engine
//!
//! - `types` - Store record shapes and vehicle classification
//! - `window` - Request window resolution (live vs. explicit range)

pub mod types;
pub mod window;

// Re-export commonly used types
pub use types::{ClassMultipliers, GateSource, PeopleRecord, VehicleClass, VehicleRecord};
pub use window::{ParameterError, TimeWindow, WindowParams};
