use super::defaults::DEFAULT_REGIONS;
use super::types::{Config, ConfigError};
use crate::billing::PricingTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Comma separated region list, replaces `regions` from the file
pub const ENV_REGIONS: &str = "LAMBDA_COST_REGIONS";
/// Overrides `concurrency` from the file
pub const ENV_CONCURRENCY: &str = "LAMBDA_COST_CONCURRENCY";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the default config file, then apply environment overrides
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with(Config::get_config_path(), |key| std::env::var(key).ok())
    }

    /// Load `path` and apply overrides from `lookup`. A file that cannot be
    /// read or parsed is an error, never replaced by defaults.
    pub fn load_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::load_from(path)?;
        config.apply_overrides(lookup);
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from `path`, or the defaults if there is no file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Config::default());
        }

        debug!("Loading config from {}", path.display());
        ConfigLoader::load_from_path(path)
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(regions) = lookup(ENV_REGIONS) {
            self.regions = regions
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }

        if let Some(concurrency) = lookup(ENV_CONCURRENCY) {
            match concurrency.trim().parse::<usize>() {
                Ok(value) if value > 0 => self.concurrency = value,
                _ => warn!("Ignoring invalid {}={}", ENV_CONCURRENCY, concurrency),
            }
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path (~/.lambda-cost/config.toml)
    pub fn get_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(".lambda-cost").join("config.toml")
        } else {
            PathBuf::from(".lambda-cost/config.toml")
        }
    }

    /// Initialize config directory and create default config
    pub fn init() -> Result<(), ConfigError> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
            println!("Created config at {}", config_path.display());
        } else {
            println!("Config already exists at {}", config_path.display());
        }

        Ok(())
    }

    /// Validate configuration
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be greater than 0".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for region in &self.regions {
            if region.trim().is_empty() {
                return Err(ConfigError::Invalid("empty region name".to_string()));
            }
            if !seen.insert(region) {
                return Err(ConfigError::Invalid(format!("Duplicate region: {}", region)));
            }
        }

        self.pricing_table()?;
        Ok(())
    }

    /// Print configuration as TOML
    pub fn print(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        println!("{}", content);
        Ok(())
    }

    /// Pricing table built from the configured tiers, or the built-in one
    pub fn pricing_table(&self) -> Result<PricingTable, ConfigError> {
        let table = match &self.pricing.tiers {
            Some(tiers) => PricingTable::new(tiers.clone(), self.pricing.price_per_invocation)?,
            None => PricingTable::default()
                .with_price_per_invocation(self.pricing.price_per_invocation)?,
        };
        Ok(table)
    }

    /// Regions to scan: the configured list, or every known Lambda region
    pub fn effective_regions(&self) -> Vec<String> {
        if self.regions.is_empty() {
            DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect()
        } else {
            self.regions.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::PricingTier;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.check().is_ok());
        assert_eq!(config.effective_regions().len(), DEFAULT_REGIONS.len());
        assert_eq!(config.pricing_table().unwrap(), PricingTable::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.regions = vec!["us-east-1".to_string(), "eu-west-1".to_string()];
        config.concurrency = 3;
        config.aws.profile = Some("billing".to_string());
        config.save_to(&path).unwrap();

        let loaded = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "regions = [\"us-west-2\"]\n").unwrap();

        let loaded = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(loaded.regions, vec!["us-west-2".to_string()]);
        assert_eq!(loaded.concurrency, Config::default().concurrency);
        assert_eq!(loaded.pricing, Config::default().pricing);
    }

    #[test]
    fn test_custom_pricing_tiers() {
        let toml_str = r#"
[pricing]
price_per_invocation = 0.0000004
tiers = [
    { memory_mb = 128, price_per_interval = 0.000001 },
    { memory_mb = 512, price_per_interval = 0.000004 },
]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let table = config.pricing_table().unwrap();
        assert_eq!(
            table.tiers(),
            &[
                PricingTier::new(128, 0.000001),
                PricingTier::new(512, 0.000004)
            ]
        );
        assert_eq!(table.price_per_invocation(), 0.0000004);
        assert_eq!(table.price_for_memory(400), 0.000004);
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let mut config = Config::default();
        config.concurrency = 0;
        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.regions = vec!["us-east-1".to_string(), "us-east-1".to_string()];
        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.pricing.tiers = Some(Vec::new());
        assert!(matches!(config.check(), Err(ConfigError::Pricing(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_REGIONS, "us-east-1, eu-west-1,,"),
            (ENV_CONCURRENCY, "2"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(
            config.regions,
            vec!["us-east-1".to_string(), "eu-west-1".to_string()]
        );
        assert_eq!(config.concurrency, 2);

        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_CONCURRENCY).then(|| "zero".to_string()));
        assert_eq!(config.concurrency, Config::default().concurrency);
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[pricing]\ntiers = [{ memory_mb = 128, price_per_interval = \"oops\" }]\n",
        )
        .unwrap();

        let result = ConfigLoader::load_with(&path, |_| None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = ConfigLoader::load_with(&path, |key| {
            (key == ENV_REGIONS).then(|| "ap-south-1".to_string())
        })
        .unwrap();
        assert_eq!(config.regions, vec!["ap-south-1".to_string()]);
        assert_eq!(config.pricing, Config::default().pricing);
    }
}
