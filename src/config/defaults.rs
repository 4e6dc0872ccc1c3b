use super::types::{Config, PricingConfig};
use crate::billing::pricing::PRICE_PER_INVOCATION;

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Regions where Lambda is offered
pub const DEFAULT_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

impl Default for Config {
    fn default() -> Self {
        Config {
            regions: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            aws: Default::default(),
            pricing: PricingConfig::default(),
            output: Default::default(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            price_per_invocation: PRICE_PER_INVOCATION,
            tiers: None,
        }
    }
}
