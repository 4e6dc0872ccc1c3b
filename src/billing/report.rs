use crate::billing::calculator::estimate_record;
use crate::billing::pricing::PricingTable;
use crate::billing::{CostEstimate, Measured, RecordError, UsageRecord, Usd};

/// Column headers for the full (CSV) report
pub const TABLE_HEADERS: [&str; 7] = [
    "Function",
    "Region",
    "Memory (MB)",
    "Average Running Duration in the Last Day (ms)",
    "Number of Invocations in the Last Day",
    "Cost in the Last Day ($)",
    "Monthly Cost Estimation ($)",
];

/// Column headers for the condensed console table
pub const CONSOLE_TABLE_HEADERS: [&str; 4] = [
    "Function",
    "Region",
    "Cost in the Last Day ($)",
    "Monthly Cost Estimation ($)",
];

/// One display row of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub function_name: String,
    pub region: String,
    pub memory_size_mb: u32,
    pub duration_ms: Measured<u64>,
    pub invocations: Measured<u64>,
    pub daily_cost: Measured<Usd>,
    pub monthly_cost: Measured<Usd>,
}

impl ReportRow {
    /// Build the display row. A zero duration blanks every derived column.
    pub fn new(record: &UsageRecord, estimate: &CostEstimate) -> Self {
        let available = |value| {
            if estimate.has_data {
                Measured::Value(value)
            } else {
                Measured::NotAvailable
            }
        };

        Self {
            function_name: record.function_name.clone(),
            region: record.region.clone(),
            memory_size_mb: record.memory_size_mb,
            duration_ms: available(record.avg_duration_ms.trunc() as u64),
            invocations: available(record.invocations.trunc() as u64),
            daily_cost: if estimate.has_data {
                Measured::Value(Usd(estimate.daily_cost))
            } else {
                Measured::NotAvailable
            },
            monthly_cost: if estimate.has_data {
                Measured::Value(Usd(estimate.monthly_cost))
            } else {
                Measured::NotAvailable
            },
        }
    }

    /// Ordering key: not-available counts as zero
    pub fn sort_cost(&self) -> f64 {
        self.monthly_cost.value().map(|usd| usd.0).unwrap_or(0.0)
    }

    /// All seven columns, in `TABLE_HEADERS` order
    pub fn cells(&self) -> [String; 7] {
        [
            self.function_name.clone(),
            self.region.clone(),
            self.memory_size_mb.to_string(),
            self.duration_ms.to_string(),
            self.invocations.to_string(),
            self.daily_cost.to_string(),
            self.monthly_cost.to_string(),
        ]
    }

    /// Condensed columns, in `CONSOLE_TABLE_HEADERS` order
    pub fn console_cells(&self) -> [String; 4] {
        [
            self.function_name.clone(),
            self.region.clone(),
            self.daily_cost.to_string(),
            self.monthly_cost.to_string(),
        ]
    }
}

/// Ranked rows plus the running monthly total
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub total_monthly_cost: f64,
}

impl Report {
    /// Total every estimate and rank rows by monthly cost, highest first.
    ///
    /// The total uses the computed cost even where the row shows `N/A`.
    /// Equal costs keep the order in which records were supplied.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (UsageRecord, CostEstimate)>,
    {
        let mut rows = Vec::new();
        let mut total_monthly_cost = 0.0;

        for (record, estimate) in entries {
            total_monthly_cost += estimate.monthly_cost;
            rows.push(ReportRow::new(&record, &estimate));
        }

        // sort_by is stable, so ties stay in discovery order
        rows.sort_by(|a, b| b.sort_cost().total_cmp(&a.sort_cost()));

        Self {
            rows,
            total_monthly_cost,
        }
    }

    /// Validate and price every record, then build the report.
    /// The first malformed record aborts the whole report.
    pub fn from_records(
        pricing: &PricingTable,
        records: Vec<UsageRecord>,
    ) -> Result<Self, RecordError> {
        let entries = records
            .into_iter()
            .map(|record| {
                let estimate = estimate_record(pricing, &record)?;
                Ok((record, estimate))
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(Self::build(entries))
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            functions: self.rows.len(),
            functions_without_data: self
                .rows
                .iter()
                .filter(|r| !r.duration_ms.is_available())
                .count(),
            total_monthly_cost: self.total_monthly_cost,
        }
    }
}

/// Counts logged once a report is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub functions: usize,
    pub functions_without_data: usize,
    pub total_monthly_cost: f64,
}
