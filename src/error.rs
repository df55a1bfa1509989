//! Error types for Vigil
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use thiserror::Error;

/// Main error type for Vigil
#[derive(Error, Debug)]
pub enum VigilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scan-related errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Rule catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cache persistence errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A severity string could not be understood
    #[error("Invalid severity '{value}' (expected critical, warning or info)")]
    InvalidSeverity {
        /// The offending value
        value: String,
    },

    /// An exclude glob could not be compiled
    #[error("Invalid glob '{pattern}': {message}")]
    InvalidGlob {
        /// The glob as written in the config
        pattern: String,
        /// Reason reported by the glob compiler
        message: String,
    },
}

/// Errors that occur during scanning
#[derive(Error, Debug)]
pub enum ScanError {
    /// Failed to read a file
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The scan root does not exist
    #[error("Scan root '{path}' does not exist")]
    RootNotFound {
        /// Path given as scan root
        path: String,
    },

    /// Failed to write rendered output
    #[error("Failed to write output '{path}': {source}")]
    OutputWrite {
        /// Destination path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The blocking scan worker failed to complete
    #[error("Scan worker failed: {0}")]
    Worker(String),
}

/// Errors raised while building the rule catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two rules share an id
    #[error("Duplicate rule id '{0}'")]
    DuplicateRule(String),

    /// A rule was declared without an id
    #[error("Rule '{0}' has an empty id")]
    EmptyId(String),

    /// A custom rule pattern failed to compile
    #[error("Invalid pattern in rule '{rule_id}': {source}")]
    InvalidPattern {
        /// Rule that carries the pattern
        rule_id: String,
        /// The regex compile error
        source: regex::Error,
    },
}

/// Errors that occur while persisting the cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create the cache directory
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Directory path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the cache file
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// File path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        VigilError::Config(ConfigError::Parse(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = VigilError::Scan(ScanError::RootNotFound {
            path: "missing/dir".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Scan error: Scan root 'missing/dir' does not exist"
        );
    }

    #[test]
    fn test_catalog_error_from() {
        let err: VigilError = CatalogError::DuplicateRule("B101".to_string()).into();
        assert!(matches!(err, VigilError::Catalog(_)));
        assert!(err.to_string().contains("B101"));
    }

    #[test]
    fn test_toml_error_converts_to_config_error() {
        let parse_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: VigilError = parse_err.into();
        assert!(matches!(err, VigilError::Config(ConfigError::Parse(_))));
    }
}
