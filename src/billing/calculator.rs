use crate::billing::pricing::{PricingTable, PRICE_INTERVAL_MS};
use crate::billing::{CostEstimate, RecordError, UsageRecord};

/// The last day of usage is projected over a 30-day month
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Number of billed 100ms intervals for an average duration (rounded up)
pub fn billed_intervals(avg_duration_ms: f64) -> u64 {
    (avg_duration_ms / PRICE_INTERVAL_MS).ceil() as u64
}

/// Daily cost: compute time at the memory tier's rate plus the per-request fee
pub fn calculate_daily_cost(
    pricing: &PricingTable,
    avg_duration_ms: f64,
    invocations: f64,
    memory_size_mb: u32,
) -> f64 {
    let per_invocation_compute =
        billed_intervals(avg_duration_ms) as f64 * pricing.price_for_memory(memory_size_mb);
    let compute_cost = per_invocation_compute * invocations;
    let request_cost = invocations * pricing.price_per_invocation();

    compute_cost + request_cost
}

/// Full estimate for raw metric values. Total over non-negative, finite input.
pub fn estimate_cost(
    pricing: &PricingTable,
    avg_duration_ms: f64,
    invocations: f64,
    memory_size_mb: u32,
) -> CostEstimate {
    let daily_cost = calculate_daily_cost(pricing, avg_duration_ms, invocations, memory_size_mb);

    CostEstimate {
        intervals: billed_intervals(avg_duration_ms),
        daily_cost,
        monthly_cost: daily_cost * DAYS_PER_MONTH,
        // Zero average duration means the metric was absent, not free usage
        has_data: avg_duration_ms != 0.0,
    }
}

/// Validate a record and estimate its cost
pub fn estimate_record(
    pricing: &PricingTable,
    record: &UsageRecord,
) -> Result<CostEstimate, RecordError> {
    record.validate()?;

    Ok(estimate_cost(
        pricing,
        record.avg_duration_ms,
        record.invocations,
        record.memory_size_mb,
    ))
}
