use serde::{Deserialize, Serialize};

use super::PricingError;

/// Price of a single request, independent of memory size
pub const PRICE_PER_INVOCATION: f64 = 0.000_000_2;

/// Length of one billing interval in milliseconds
pub const PRICE_INTERVAL_MS: f64 = 100.0;

/// AWS Lambda price per 100ms interval, keyed by memory size in MB
const DEFAULT_TIERS: [(u32, f64); 46] = [
    (128, 0.000000208),
    (192, 0.000000313),
    (256, 0.000000417),
    (320, 0.000000521),
    (384, 0.000000625),
    (448, 0.000000729),
    (512, 0.000000834),
    (576, 0.000000938),
    (640, 0.000001042),
    (704, 0.000001146),
    (768, 0.000001250),
    (832, 0.000001354),
    (896, 0.000001459),
    (960, 0.000001563),
    (1024, 0.000001667),
    (1088, 0.000001771),
    (1152, 0.000001875),
    (1216, 0.000001980),
    (1280, 0.000002045),
    (1344, 0.000002188),
    (1408, 0.000002292),
    (1472, 0.000002396),
    (1536, 0.000002501),
    (1600, 0.000002605),
    (1664, 0.000002709),
    (1728, 0.000002813),
    (1792, 0.000002917),
    (1856, 0.000003021),
    (1920, 0.000003126),
    (1984, 0.000003230),
    (2048, 0.000003334),
    (2112, 0.000003438),
    (2176, 0.000003542),
    (2240, 0.000003647),
    (2304, 0.000003751),
    (2368, 0.000003855),
    (2432, 0.000003959),
    (2496, 0.000004063),
    (2560, 0.000004168),
    (2624, 0.000004272),
    (2688, 0.000004376),
    (2752, 0.000004480),
    (2816, 0.000004584),
    (2880, 0.000004688),
    (2944, 0.000004793),
    (3008, 0.000004897),
];

/// A memory size and its price per billing interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub memory_mb: u32,
    pub price_per_interval: f64,
}

impl PricingTier {
    pub const fn new(memory_mb: u32, price_per_interval: f64) -> Self {
        Self {
            memory_mb,
            price_per_interval,
        }
    }
}

/// Immutable pricing table handed to the estimator.
///
/// Tiers are kept sorted by memory size; construction rejects empty tables,
/// duplicate or unordered memory sizes, and negative prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    tiers: Vec<PricingTier>,
    price_per_invocation: f64,
}

impl PricingTable {
    pub fn new(tiers: Vec<PricingTier>, price_per_invocation: f64) -> Result<Self, PricingError> {
        if tiers.is_empty() {
            return Err(PricingError::Empty);
        }

        for pair in tiers.windows(2) {
            if pair[1].memory_mb <= pair[0].memory_mb {
                return Err(PricingError::NotIncreasing {
                    previous: pair[0].memory_mb,
                    next: pair[1].memory_mb,
                });
            }
        }

        if let Some(tier) = tiers
            .iter()
            .find(|t| !t.price_per_interval.is_finite() || t.price_per_interval < 0.0)
        {
            return Err(PricingError::InvalidPrice {
                memory_mb: tier.memory_mb,
                price: tier.price_per_interval,
            });
        }

        if !price_per_invocation.is_finite() || price_per_invocation < 0.0 {
            return Err(PricingError::InvalidInvocationPrice(price_per_invocation));
        }

        Ok(Self {
            tiers,
            price_per_invocation,
        })
    }

    /// Same tiers with a different per-request price
    pub fn with_price_per_invocation(self, price_per_invocation: f64) -> Result<Self, PricingError> {
        Self::new(self.tiers, price_per_invocation)
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn price_per_invocation(&self) -> f64 {
        self.price_per_invocation
    }

    /// Find the tier closest to `memory_mb`. On an exact midpoint the lower tier wins.
    pub fn nearest_tier(&self, memory_mb: u32) -> &PricingTier {
        let mut best = &self.tiers[0];
        let mut best_distance = best.memory_mb.abs_diff(memory_mb);

        for tier in &self.tiers[1..] {
            let distance = tier.memory_mb.abs_diff(memory_mb);
            // Strictly smaller only: ascending order makes the lower tier win ties
            if distance < best_distance {
                best = tier;
                best_distance = distance;
            } else if tier.memory_mb > memory_mb {
                break;
            }
        }

        best
    }

    /// Price per 100ms interval for the given memory size
    pub fn price_for_memory(&self, memory_mb: u32) -> f64 {
        self.nearest_tier(memory_mb).price_per_interval
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS
                .iter()
                .map(|&(memory_mb, price)| PricingTier::new(memory_mb, price))
                .collect(),
            price_per_invocation: PRICE_PER_INVOCATION,
        }
    }
}
