use async_trait::async_trait;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::source::{FunctionInfo, Metric, MetricsSource, SourceError};
use crate::billing::UsageRecord;

/// Metrics replayed from a JSON array of usage records
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    records: Vec<UsageRecord>,
}

impl SnapshotSource {
    /// Each (region, function) pair may appear only once
    pub fn new(records: Vec<UsageRecord>) -> Result<Self, SourceError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert((record.region.as_str(), record.function_name.as_str())) {
                return Err(SourceError::new(
                    &record.region,
                    "loading snapshot",
                    format!("duplicate entry for function {}", record.function_name),
                ));
            }
        }

        Ok(Self { records })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let location = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| SourceError::new(&location, "reading snapshot", e))?;
        let records: Vec<UsageRecord> = serde_json::from_str(&content)
            .map_err(|e| SourceError::new(&location, "parsing snapshot", e))?;

        debug!("Loaded {} usage records from {}", records.len(), location);
        Self::new(records)
    }

    fn find(&self, region: &str, function_name: &str) -> Option<&UsageRecord> {
        self.records
            .iter()
            .find(|r| r.region == region && r.function_name == function_name)
    }
}

#[async_trait]
impl MetricsSource for SnapshotSource {
    async fn regions(&self) -> Result<Vec<String>, SourceError> {
        let mut regions: Vec<String> = Vec::new();
        for record in &self.records {
            if !regions.contains(&record.region) {
                regions.push(record.region.clone());
            }
        }
        Ok(regions)
    }

    async fn list_functions(&self, region: &str) -> Result<Vec<FunctionInfo>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.region == region)
            .map(|r| FunctionInfo {
                name: r.function_name.clone(),
                memory_size_mb: r.memory_size_mb,
            })
            .collect())
    }

    async fn fetch_metric(
        &self,
        region: &str,
        function_name: &str,
        metric: Metric,
    ) -> Result<f64, SourceError> {
        let record = self.find(region, function_name).ok_or_else(|| {
            SourceError::new(
                region,
                "fetching metric",
                format!("unknown function {}", function_name),
            )
        })?;

        Ok(match metric {
            Metric::InvocationSum => record.invocations,
            Metric::AverageDuration => record.avg_duration_ms,
        })
    }
}
