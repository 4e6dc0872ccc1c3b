use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::billing::PricingTier;

/// Main config structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Regions to scan. Empty means every known Lambda region.
    pub regions: Vec<String>,
    /// Maximum number of regions fetched at the same time
    pub concurrency: usize,
    pub aws: AwsConfig,
    pub pricing: PricingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Named profile from the shared AWS config files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub price_per_invocation: f64,
    /// Replaces the built-in tier table when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiers: Option<Vec<PricingTier>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file written after every run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<PathBuf>,
}

/// Configuration problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid pricing: {0}")]
    Pricing(#[from] crate::billing::PricingError),
    #[error("{0}")]
    Invalid(String),
}
