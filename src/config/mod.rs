//! Configuration module

pub mod loader;

pub use loader::Config;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cap on the size of a scanned file, in bytes
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether the rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Severity override (critical, warning, info)
    pub severity: Option<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Scan scope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns (relative to the scan root) of files to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Findings below this severity are dropped
    #[serde(default = "default_min_severity")]
    pub min_severity: String,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            min_severity: default_min_severity(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn default_min_severity() -> String {
    "info".to_string()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Custom rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRule {
    /// Regex pattern to match
    pub pattern: String,

    /// Severity level (critical, warning, info)
    #[serde(default = "default_custom_severity")]
    pub severity: String,

    /// Languages the rule applies to; empty means every language
    #[serde(default)]
    pub languages: Vec<String>,

    /// Match against the code view (string literals intact) instead of
    /// the masked view
    #[serde(default)]
    pub match_strings: bool,

    /// Custom message for the finding
    pub message: Option<String>,

    /// Detailed description
    pub description: Option<String>,

    /// Suggested remediation
    pub remediation: Option<String>,
}

fn default_custom_severity() -> String {
    "warning".to_string()
}

/// Custom rules configuration container
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomRulesConfig {
    /// Map of rule ID to rule configuration
    #[serde(flatten)]
    pub rules: BTreeMap<String, CustomRule>,
}
