//! JSON output formatting

use serde::Serialize;

use super::OutputRenderer;
use crate::error::VigilError;
use crate::rules::catalog::Rule;
use crate::rules::results::{Confidence, Finding, ScanResults, ScanSummary, Severity};
use crate::source::Language;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    version: &'static str,
    root: &'a str,
    duration_ms: u64,
    summary: ScanSummary,
    findings: &'a [Finding],
}

#[derive(Serialize)]
struct RuleOutput<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    severity: Severity,
    confidence: Confidence,
    /// Empty means every language
    languages: &'a [Language],
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remediation: Option<&'a str>,
}

impl OutputRenderer for JsonOutput {
    fn render_scan(&self, results: &ScanResults) -> Result<String, VigilError> {
        let output = ScanOutput {
            version: env!("CARGO_PKG_VERSION"),
            root: &results.root_name,
            duration_ms: results.duration_ms,
            summary: results.summary(),
            findings: results.findings(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn render_rules(&self, rules: &[&Rule]) -> Result<String, VigilError> {
        let output: Vec<RuleOutput> = rules
            .iter()
            .map(|r| RuleOutput {
                id: &r.id,
                name: &r.name,
                category: &r.category,
                severity: r.severity,
                confidence: r.confidence,
                languages: &r.languages,
                message: &r.message,
                description: r.description.as_deref(),
                remediation: r.remediation.as_deref(),
            })
            .collect();

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
