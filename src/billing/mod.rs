pub mod calculator;
pub mod error;
pub mod pricing;
pub mod report;
pub mod types;

pub use error::{PricingError, RecordError};
pub use pricing::{PricingTable, PricingTier};
pub use report::{Report, ReportRow, ReportSummary};
pub use types::{CostEstimate, Measured, UsageRecord, Usd, NOT_AVAILABLE};
