use serde::{Deserialize, Serialize};
use std::fmt;

use super::RecordError;

/// Literal shown in place of values derived from a missing duration metric
pub const NOT_AVAILABLE: &str = "N/A";

/// One function's observed metrics in one region over the last day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub function_name: String,
    pub region: String,
    pub memory_size_mb: u32,
    /// Average duration in milliseconds, 0 when the metric had no datapoints
    #[serde(default)]
    pub avg_duration_ms: f64,
    #[serde(default)]
    pub invocations: f64,
}

impl UsageRecord {
    /// Build a record, rejecting values the estimator cannot price
    pub fn new(
        function_name: impl Into<String>,
        region: impl Into<String>,
        memory_size_mb: u32,
        avg_duration_ms: f64,
        invocations: f64,
    ) -> Result<Self, RecordError> {
        let record = Self {
            function_name: function_name.into(),
            region: region.into(),
            memory_size_mb,
            avg_duration_ms,
            invocations,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.function_name.trim().is_empty() {
            return Err(RecordError::EmptyFunctionName);
        }

        if self.memory_size_mb == 0 {
            return Err(RecordError::ZeroMemory {
                function: self.function_name.clone(),
                region: self.region.clone(),
            });
        }

        if !self.avg_duration_ms.is_finite() || self.avg_duration_ms < 0.0 {
            return Err(RecordError::InvalidDuration {
                function: self.function_name.clone(),
                region: self.region.clone(),
                value: self.avg_duration_ms,
            });
        }

        if !self.invocations.is_finite() || self.invocations < 0.0 {
            return Err(RecordError::InvalidInvocations {
                function: self.function_name.clone(),
                region: self.region.clone(),
                value: self.invocations,
            });
        }

        Ok(())
    }
}

/// Cost derived from one usage record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub intervals: u64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub has_data: bool,
}

/// A display value that is either known or replaced by `N/A`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measured<T> {
    Value(T),
    NotAvailable,
}

impl<T: Copy> Measured<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Measured::Value(v) => Some(*v),
            Measured::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Measured::Value(_))
    }
}

impl<T: fmt::Display> fmt::Display for Measured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measured::Value(v) => fmt::Display::fmt(v, f),
            Measured::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Dollar amount rendered with three decimals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Usd(pub f64);

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_validation() {
        assert!(UsageRecord::new("api", "us-east-1", 128, 0.0, 0.0).is_ok());
        assert!(UsageRecord::new("api", "us-east-1", 128, 12.5, 40.0).is_ok());

        assert_eq!(
            UsageRecord::new("  ", "us-east-1", 128, 1.0, 1.0),
            Err(RecordError::EmptyFunctionName)
        );
        assert!(matches!(
            UsageRecord::new("api", "us-east-1", 0, 1.0, 1.0),
            Err(RecordError::ZeroMemory { .. })
        ));
        assert!(matches!(
            UsageRecord::new("api", "us-east-1", 128, -1.0, 1.0),
            Err(RecordError::InvalidDuration { .. })
        ));
        assert!(matches!(
            UsageRecord::new("api", "us-east-1", 128, f64::NAN, 1.0),
            Err(RecordError::InvalidDuration { .. })
        ));
        assert!(matches!(
            UsageRecord::new("api", "us-east-1", 128, 1.0, f64::INFINITY),
            Err(RecordError::InvalidInvocations { .. })
        ));
    }

    #[test]
    fn test_measured_display() {
        assert_eq!(Measured::Value(42u64).to_string(), "42");
        assert_eq!(Measured::<u64>::NotAvailable.to_string(), "N/A");
        assert_eq!(Measured::Value(Usd(0.0811)).to_string(), "0.081");
        assert_eq!(Measured::<Usd>::NotAvailable.to_string(), "N/A");
        assert_eq!(Measured::Value(7u64).value(), Some(7));
        assert!(!Measured::<u64>::NotAvailable.is_available());
    }

    #[test]
    fn test_usd_three_decimals() {
        assert_eq!(Usd(0.0).to_string(), "0.000");
        assert_eq!(Usd(1.0).to_string(), "1.000");
        assert_eq!(Usd(12.34567).to_string(), "12.346");
    }

    #[test]
    fn test_record_deserialize_defaults() {
        let record: UsageRecord = serde_json::from_str(
            r#"{"function_name":"api","region":"us-east-1","memory_size_mb":512}"#,
        )
        .unwrap();
        assert_eq!(record.avg_duration_ms, 0.0);
        assert_eq!(record.invocations, 0.0);
    }
}
