//! CLI commands module

pub mod rules;
pub mod scan;

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::VigilError;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File or directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Only run rules of these categories
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Skip rules of these categories
    #[arg(long, value_delimiter = ',')]
    pub skip: Option<Vec<String>>,

    /// Drop findings below this severity (critical, warning, info)
    #[arg(long, value_name = "SEVERITY")]
    pub min_severity: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable the findings cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only list rules that run on this language (python, java, rust)
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Output format shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// Load the explicit config file if one was given, otherwise look for
/// `.vigil.toml` in `dir`
pub(crate) fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, VigilError> {
    match explicit {
        Some(path) => Config::load_from_file(path),
        None => Config::load_or_default(dir),
    }
}

/// Write rendered output to `path`, or to stdout when no path is given
pub(crate) fn emit(rendered: &str, path: Option<&Path>) -> Result<(), VigilError> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| crate::error::ScanError::OutputWrite {
                path: path.display().to_string(),
                source: e,
            })?;
            tracing::info!("Output written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
