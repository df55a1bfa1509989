//! # Scan Results Structures
//!
//! This module defines the data structures for representing findings and the
//! aggregated outcome of a scan.
//!
//! ## Overview
//!
//! - [`Severity`] - Finding severity levels (Critical, Warning, Info)
//! - [`Confidence`] - How sure a rule is about a hit (High, Medium, Low)
//! - [`Finding`] - Individual finding with location and remediation
//! - [`ScanResults`] - Collection of findings from a scan run
//! - [`ScanSummary`] - Totals by severity and category
//!
//! ## Examples
//!
//! ```rust
//! use vigil::rules::results::{Finding, ScanResults, Severity};
//!
//! let mut results = ScanResults::new("my-project");
//! results.add_findings(vec![
//!     Finding::new("B307", "injection", Severity::Warning, "Use of eval()")
//!         .with_location("app.py", 12, 5),
//! ]);
//! results.finalize(Severity::Info);
//!
//! assert!(results.has_warnings());
//! assert_eq!(results.count_by_severity(Severity::Warning), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Severity levels for findings.
///
/// - **Critical** - Exploitable or certainly wrong (e.g., hardcoded secrets)
/// - **Warning** - Likely a bug or a risky construct
/// - **Info** - Worth a look, often intentional
///
/// # Examples
///
/// ```rust
/// use vigil::rules::Severity;
///
/// assert_eq!(Severity::from_string("high"), Some(Severity::Critical));
/// assert!(Severity::Critical.is_at_least(Severity::Warning));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Issues that must be resolved.
    Critical,
    /// Issues that should be addressed.
    Warning,
    /// Informational notes.
    Info,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" | "error" | "high" => Some(Self::Critical),
            "warning" | "warn" | "medium" => Some(Self::Warning),
            "info" | "information" | "note" | "low" => Some(Self::Info),
            _ => None,
        }
    }

    /// Lowercase label used in output and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Whether `self` is as severe as `threshold` or more
    pub fn is_at_least(&self, threshold: Severity) -> bool {
        *self <= threshold
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How likely a hit is to be a true positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" | "med" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding: one rule firing at one place in one file.
///
/// # Examples
///
/// ```rust
/// use vigil::rules::{Finding, Severity};
///
/// let finding = Finding::new("SEC001", "secrets", Severity::Critical, "GitHub token detected")
///     .with_location("src/config.rs", 42, 17)
///     .with_snippet("let token = \"ghp_...\";")
///     .with_remediation("Load the token from the environment");
///
/// assert_eq!(finding.location(), "src/config.rs:42:17");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule identifier (e.g., "B101", "NP_ALWAYS_NULL", "eq_op").
    pub rule_id: String,

    /// Category of the rule (e.g., "injection", "crypto").
    pub category: String,

    /// Severity of the finding.
    pub severity: Severity,

    /// Confidence of the rule that produced the finding.
    pub confidence: Confidence,

    /// Short message describing the finding.
    pub message: String,

    /// Path relative to the scan root, `/` separated.
    pub path: String,

    /// 1-based line number.
    pub line: usize,

    /// 1-based character column.
    pub column: usize,

    /// The offending source line, trimmed.
    #[serde(default)]
    pub snippet: String,

    /// Why this is a problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// How to fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Finding {
    /// Create a new finding with high confidence and no location
    pub fn new(
        rule_id: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category: category.into(),
            severity,
            confidence: Confidence::High,
            message: message.into(),
            path: String::new(),
            line: 0,
            column: 0,
            snippet: String::new(),
            description: None,
            remediation: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, path: impl Into<String>, line: usize, column: usize) -> Self {
        self.path = path.into();
        self.line = line;
        self.column = column;
        self
    }

    /// Set the snippet (trimmed)
    pub fn with_snippet(mut self, snippet: impl AsRef<str>) -> Self {
        self.snippet = snippet.as_ref().trim().to_string();
        self
    }

    /// Set the confidence
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the remediation
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    /// `path:line:column`
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.path, self.line, self.column)
    }

    fn sort_key(&self) -> (Severity, &str, usize, usize, &str) {
        (
            self.severity,
            self.path.as_str(),
            self.line,
            self.column,
            self.rule_id.as_str(),
        )
    }
}

/// Totals for a finished scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    /// Always carries `critical`, `warning` and `info`, even at zero
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub files_scanned: usize,
    pub rules_evaluated: usize,
}

/// Collection of findings from a complete scan run.
///
/// Findings are accumulated with [`ScanResults::add_findings`] in whatever
/// order workers produce them and then put in canonical form by
/// [`ScanResults::finalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResults {
    /// Name of the scanned root (directory or file name).
    pub root_name: String,

    /// Number of files that were read and matched.
    pub files_scanned: usize,

    /// Number of rules in play after category and config filtering.
    pub rules_evaluated: usize,

    /// Wall time of the scan in milliseconds.
    pub duration_ms: u64,

    findings: Vec<Finding>,
}

impl ScanResults {
    /// Create empty results
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            files_scanned: 0,
            rules_evaluated: 0,
            duration_ms: 0,
            findings: Vec::new(),
        }
    }

    /// Add a finding
    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Add multiple findings
    pub fn add_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Drop findings below `min_severity`, keep one finding per
    /// `(rule_id, path, line)` and sort canonically.
    ///
    /// When two findings share a key, the one with the smallest column
    /// survives. Order is severity, path, line, column, then rule id.
    pub fn finalize(&mut self, min_severity: Severity) {
        let mut kept: HashMap<(String, String, usize), Finding> = HashMap::new();

        for finding in self.findings.drain(..) {
            if !finding.severity.is_at_least(min_severity) {
                continue;
            }
            let key = (finding.rule_id.clone(), finding.path.clone(), finding.line);
            match kept.get(&key) {
                Some(existing) if existing.column <= finding.column => {}
                _ => {
                    kept.insert(key, finding);
                }
            }
        }

        let mut findings: Vec<Finding> = kept.into_values().collect();
        findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.findings = findings;
    }

    /// Get all findings
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Get findings by severity
    pub fn findings_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Get findings by category
    pub fn findings_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    /// Get findings for one rule
    pub fn findings_for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    /// Count findings by severity
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings_by_severity(severity).count()
    }

    /// Check if there are any critical findings
    pub fn has_critical(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Critical)
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Warning)
    }

    /// Get total number of findings
    pub fn total_count(&self) -> usize {
        self.findings.len()
    }

    /// Check if there are no findings
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Totals by severity and category
    pub fn summary(&self) -> ScanSummary {
        let mut by_severity: BTreeMap<String, usize> = Severity::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut by_category = BTreeMap::new();

        for finding in &self.findings {
            *by_severity
                .entry(finding.severity.as_str().to_string())
                .or_insert(0) += 1;
            *by_category.entry(finding.category.clone()).or_insert(0) += 1;
        }

        ScanSummary {
            total: self.findings.len(),
            by_severity,
            by_category,
            files_scanned: self.files_scanned,
            rules_evaluated: self.rules_evaluated,
        }
    }
}
