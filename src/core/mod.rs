//! Fee schedules and the engine that evaluates them

pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod fee;
pub mod log;
pub mod source;

// Re-export main types for cleaner imports
pub use engine::FeeConfigurationEngine;
pub use error::FeeError;
pub use fee::{FeeCalculation, FeeConfig, FeeType, Supplier, SupplierSharing, TransactionFeeRow};
pub use source::FeeConfigSource;
