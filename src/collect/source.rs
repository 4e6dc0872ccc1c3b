use async_trait::async_trait;
use thiserror::Error;

/// A function discovered in one region
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub name: String,
    pub memory_size_mb: u32,
}

/// Daily statistic requested from the metrics service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Sum of `Invocations` over the last day
    InvocationSum,
    /// Average of `Duration` over the last day, in milliseconds
    AverageDuration,
}

impl Metric {
    pub fn metric_name(&self) -> &'static str {
        match self {
            Metric::InvocationSum => "Invocations",
            Metric::AverageDuration => "Duration",
        }
    }
}

/// Failure reported by a metrics source. Passed through unchanged, never read as "no data".
#[derive(Debug, Error)]
#[error("{operation} failed in {region}: {message}")]
pub struct SourceError {
    pub region: String,
    pub operation: &'static str,
    pub message: String,
}

impl SourceError {
    pub fn new(region: &str, operation: &'static str, message: impl ToString) -> Self {
        Self {
            region: region.to_string(),
            operation,
            message: message.to_string(),
        }
    }
}

/// Where functions and their metrics come from
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Regions this source can report on, in discovery order
    async fn regions(&self) -> Result<Vec<String>, SourceError>;

    /// Every function deployed in `region`, in listing order
    async fn list_functions(&self, region: &str) -> Result<Vec<FunctionInfo>, SourceError>;

    /// The last day's statistic for one function. Returns 0 when there are no datapoints.
    async fn fetch_metric(
        &self,
        region: &str,
        function_name: &str,
        metric: Metric,
    ) -> Result<f64, SourceError>;
}
