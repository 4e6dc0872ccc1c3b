use indicatif::ProgressBar;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::billing::{PricingTable, Report};
use crate::collect::{collect_usage, CollectError, MetricsSource};
use crate::config::{Config, ConfigError, DEFAULT_CONCURRENCY};

/// Collects usage for a set of regions and turns it into a ranked report
pub struct CostEstimator {
    pricing: PricingTable,
    concurrency: usize,
}

impl CostEstimator {
    pub fn new(pricing: PricingTable, concurrency: usize) -> Self {
        Self {
            pricing,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.pricing_table()?, config.concurrency))
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Fetch every region, wait for all of them, then price and rank.
    /// Nothing is priced unless collection finished for every region.
    pub async fn run<F>(
        &self,
        source: Arc<dyn MetricsSource>,
        regions: &[String],
        progress: &ProgressBar,
        shutdown: F,
    ) -> Result<Report, CollectError>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Scanning {} regions with concurrency {}",
            regions.len(),
            self.concurrency
        );

        let records = collect_usage(source, regions, self.concurrency, progress, shutdown).await?;
        let report = Report::from_records(&self.pricing, records)?;

        let summary = report.summary();
        info!(
            "Estimated {} functions ({} without data), total ${:.3}/month",
            summary.functions, summary.functions_without_data, summary.total_monthly_cost
        );

        Ok(report)
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(PricingTable::default(), DEFAULT_CONCURRENCY)
    }
}
