//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::error::VigilError;
use crate::rules::catalog::Rule;
use crate::rules::results::ScanResults;

/// Trait for rendering command output
pub trait OutputRenderer {
    /// Render the results of a scan
    fn render_scan(&self, results: &ScanResults) -> Result<String, VigilError>;

    /// Render a rule listing
    fn render_rules(&self, rules: &[&Rule]) -> Result<String, VigilError>;
}
