//! Configuration loader

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::cache::CacheConfig;
use crate::error::{ConfigError, VigilError};
use crate::rules::results::Severity;

use super::{CustomRulesConfig, RuleConfig, ScanConfig};

/// Name of the configuration file looked up in the scan root
pub const CONFIG_FILENAME: &str = ".vigil.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan scope
    #[serde(default)]
    pub scan: ScanConfig,

    /// Rule overrides keyed by rule id
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,

    /// Custom regex rules keyed by id
    #[serde(default)]
    pub custom: CustomRulesConfig,

    /// Finding cache
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load `.vigil.toml` from `dir` if present, otherwise the defaults
    pub fn load_or_default(dir: &Path) -> Result<Self, VigilError> {
        let config_path = dir.join(CONFIG_FILENAME);

        if config_path.is_file() {
            Self::load_from_file(&config_path)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILENAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, VigilError> {
        let content = fs::read_to_string(path).map_err(|e| {
            VigilError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check every severity string and glob so problems surface at load
    /// time rather than mid-scan
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.min_severity()?;
        for rule_id in self.rules.keys() {
            self.rule_severity(rule_id)?;
        }
        for rule in self.custom.rules.values() {
            parse_severity(&rule.severity)?;
        }
        self.exclude_set()?;
        Ok(())
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules.get(rule_id).map(|r| r.enabled).unwrap_or(true)
    }

    /// Severity override for a rule, if configured
    pub fn rule_severity(&self, rule_id: &str) -> Result<Option<Severity>, ConfigError> {
        self.rules
            .get(rule_id)
            .and_then(|r| r.severity.as_deref())
            .map(parse_severity)
            .transpose()
    }

    /// Minimum severity kept in results
    pub fn min_severity(&self) -> Result<Severity, ConfigError> {
        parse_severity(&self.scan.min_severity)
    }

    /// Compile `scan.exclude` into a glob set
    pub fn exclude_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.scan.exclude {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: self.scan.exclude.join(", "),
            message: e.to_string(),
        })
    }
}

/// Parse a severity string from configuration
pub fn parse_severity(value: &str) -> Result<Severity, ConfigError> {
    Severity::from_string(value).ok_or_else(|| ConfigError::InvalidSeverity {
        value: value.to_string(),
    })
}
