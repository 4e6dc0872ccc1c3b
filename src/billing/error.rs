use thiserror::Error;

/// A usage record that breaks the estimator's preconditions.
///
/// This is never used for "no data": a zero average duration is a valid record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("function name is empty")]
    EmptyFunctionName,
    #[error("function {function} in {region}: memory size must be positive")]
    ZeroMemory { function: String, region: String },
    #[error("function {function} in {region}: invalid average duration {value}")]
    InvalidDuration {
        function: String,
        region: String,
        value: f64,
    },
    #[error("function {function} in {region}: invalid invocation count {value}")]
    InvalidInvocations {
        function: String,
        region: String,
        value: f64,
    },
}

/// Pricing table construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("pricing table has no tiers")]
    Empty,
    #[error("pricing tiers must be strictly increasing ({previous} MB followed by {next} MB)")]
    NotIncreasing { previous: u32, next: u32 },
    #[error("invalid price {price} for the {memory_mb} MB tier")]
    InvalidPrice { memory_mb: u32, price: f64 },
    #[error("invalid price per invocation {0}")]
    InvalidInvocationPrice(f64),
}
