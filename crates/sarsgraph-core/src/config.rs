//! Runtime configuration
//!
//! Loaded from TOML. Every section has defaults, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! [governance.thresholds]
//! Virology = 5
//! Genomics = 5
//! Treatment = 3
//!
//! [rate_distortion]
//! batch_sizes = [5, 10, 15, 20, 25, 30]
//!
//! [logging]
//! filter = "info"
//! json = false
//! ```

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::governance::GovernanceRule;
use crate::rd::check_batch_sizes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SarsGraphConfig {
    /// Evidence thresholds
    pub governance: GovernanceConfig,
    /// Batch sizes tried by the knee search
    pub rate_distortion: RateDistortionConfig,
    /// Subscriber settings for binaries
    pub logging: LoggingConfig,
}

/// `[governance]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceConfig {
    /// Minimum evidence keyed by domain tag
    pub thresholds: BTreeMap<String, u64>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        let thresholds = [
            (Domain::Virology, 5),
            (Domain::Genomics, 5),
            (Domain::Treatment, 3),
        ]
        .into_iter()
        .map(|(domain, min)| (domain.as_str().to_string(), min))
        .collect();
        Self { thresholds }
    }
}

/// `[rate_distortion]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateDistortionConfig {
    /// Candidate batch sizes
    pub batch_sizes: Vec<u32>,
}

impl Default for RateDistortionConfig {
    fn default() -> Self {
        Self {
            batch_sizes: vec![5, 10, 15, 20, 25, 30],
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl SarsGraphConfig {
    /// Defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the governance thresholds
    #[must_use]
    pub fn with_thresholds<I>(mut self, thresholds: I) -> Self
    where
        I: IntoIterator<Item = (Domain, u64)>,
    {
        self.governance.thresholds = thresholds
            .into_iter()
            .map(|(domain, min)| (domain.as_str().to_string(), min))
            .collect();
        self
    }

    /// Replace the batch sizes
    #[must_use]
    pub fn with_batch_sizes(mut self, batch_sizes: Vec<u32>) -> Self {
        self.rate_distortion.batch_sizes = batch_sizes;
        self
    }

    /// Replace the log filter
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = filter.into();
        self
    }

    /// Toggle JSON log output
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.logging.json = json;
        self
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.governance_rule()?;
        check_batch_sizes(&self.rate_distortion.batch_sizes)
            .map_err(|e| ConfigError::Invalid(format!("rate_distortion.batch_sizes: {e}")))?;
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter is empty".to_string()));
        }
        Ok(())
    }

    /// Thresholds as a [`GovernanceRule`]
    ///
    /// Keys are parsed leniently, so two spellings of one domain
    /// (`Genomics` and `genomics`) are rejected rather than merged.
    pub fn governance_rule(&self) -> Result<GovernanceRule, ConfigError> {
        let mut thresholds: BTreeMap<Domain, (&str, u64)> = BTreeMap::new();
        for (tag, min) in &self.governance.thresholds {
            let domain = tag
                .parse::<Domain>()
                .map_err(|e| ConfigError::Invalid(format!("governance.thresholds: {e}")))?;
            if let Some((previous, _)) = thresholds.insert(domain, (tag.as_str(), *min)) {
                return Err(ConfigError::Invalid(format!(
                    "governance.thresholds: {domain} is listed twice (`{previous}` and `{tag}`)"
                )));
            }
        }
        GovernanceRule::from_pairs(thresholds.into_iter().map(|(domain, (_, min))| (domain, min)))
            .map_err(|e| ConfigError::Invalid(format!("governance.thresholds: {e}")))
    }
}
