use thiserror::Error;

/// Errors raised by [`FeeConfigurationEngine`](super::engine::FeeConfigurationEngine).
///
/// These signal caller bugs. Bootstrap failures never surface here; the engine
/// absorbs them and falls back to the default schedules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Fee configuration is not initialized")]
    NotInitialized,
    #[error("Currency not supported: {0:?}")]
    UnsupportedCurrency(String),
    #[error("Supplier name cannot be empty")]
    EmptySupplierName,
    #[error("Supplier {name:?} already exists for {currency}")]
    DuplicateSupplierName { currency: String, name: String },
}

pub type Result<T> = std::result::Result<T, FeeError>;
