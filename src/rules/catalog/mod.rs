//! # Rule Catalog
//!
//! The catalog is the immutable registry of detection rules. Each [`Rule`]
//! binds a [`Matcher`] to an identifier, a category, a default severity and
//! confidence, the languages it applies to and the text shown to users.
//!
//! Built-in rules are grouped by the tool whose identifiers they reuse:
//!
//! | Module | Language | Identifiers |
//! |--------|----------|-------------|
//! | [`python`] | Python | Bandit test ids (`B101`...) |
//! | [`java`] | Java | SpotBugs bug pattern names |
//! | [`rust_lang`] | Rust | Clippy lint names |
//! | [`secrets`] | all | `SEC001`... |
//!
//! Custom rules from configuration are added with
//! [`RuleCatalog::with_custom`] and get ids of the form `custom/<id>`.

pub mod custom;
pub mod java;
pub mod python;
pub mod rust_lang;
pub mod secrets;

use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};

use crate::config::Config;
use crate::error::CatalogError;
use crate::rules::matchers::{Hit, Matcher};
use crate::rules::results::{Confidence, Finding, Severity};
use crate::source::{Language, SourceUnit};

/// Rule categories known to the built-in catalog
pub const CATEGORIES: [&str; 13] = [
    "secrets",
    "injection",
    "crypto",
    "deserialization",
    "transport",
    "filesystem",
    "errors",
    "correctness",
    "concurrency",
    "resources",
    "performance",
    "style",
    "custom",
];

/// A detection rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    /// Short snake_case name (e.g. `exec_used`)
    pub name: String,
    pub category: String,
    pub severity: Severity,
    pub confidence: Confidence,
    /// Languages the rule applies to; empty means all
    pub languages: Vec<Language>,
    pub matcher: Matcher,
    pub message: String,
    pub description: Option<String>,
    pub remediation: Option<String>,
    /// Whole-file regex that must match for the rule to run
    pub guard: Option<Regex>,
}

impl Rule {
    /// Create a rule with high confidence, applying to every language, whose
    /// message defaults to its name
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        matcher: Matcher,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            message: name.clone(),
            name,
            category: category.into(),
            severity,
            confidence: Confidence::High,
            languages: Vec::new(),
            matcher,
            description: None,
            remediation: None,
            guard: None,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_languages(mut self, languages: &[Language]) -> Self {
        self.languages = languages.to_vec();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn with_guard(mut self, guard: Regex) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether the rule runs on files of `language`
    pub fn applies_to(&self, language: Language) -> bool {
        self.languages.is_empty() || self.languages.contains(&language)
    }

    /// Run the matcher over a unit, honouring language and guard
    pub fn hits(&self, unit: &SourceUnit) -> Vec<Hit> {
        if !self.applies_to(unit.language) {
            return Vec::new();
        }
        if let Some(guard) = &self.guard {
            if !guard.is_match(&unit.text) {
                return Vec::new();
            }
        }
        self.matcher.find(unit)
    }

    /// Turn a hit into a finding carrying this rule's metadata
    pub fn finding(&self, unit: &SourceUnit, hit: Hit) -> Finding {
        let mut finding = Finding::new(
            self.id.clone(),
            self.category.clone(),
            self.severity,
            self.message.clone(),
        )
        .with_confidence(self.confidence)
        .with_location(unit.path.clone(), hit.line, hit.column)
        .with_snippet(unit.line_text(hit.line).unwrap_or_default());

        if let Some(description) = &self.description {
            finding = finding.with_description(description.clone());
        }
        if let Some(remediation) = &self.remediation {
            finding = finding.with_remediation(remediation.clone());
        }
        finding
    }

    fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{:?}|{:?}|{:?}|{}|{}|{}",
            self.id,
            self.category,
            self.severity,
            self.confidence,
            self.languages,
            self.guard.as_ref().map(Regex::as_str).unwrap_or(""),
            self.message,
            self.matcher.fingerprint()
        )
    }
}

/// Immutable registry of rules
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Build a catalog, rejecting empty or duplicate ids
    pub fn new(rules: Vec<Rule>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(rule.name.clone()));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateRule(rule.id.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// Every built-in rule
    pub fn builtin() -> Result<Self, CatalogError> {
        let rules = python::PYTHON_RULES
            .iter()
            .chain(java::JAVA_RULES.iter())
            .chain(rust_lang::RUST_RULES.iter())
            .chain(secrets::SECRET_RULES.iter())
            .cloned()
            .collect();
        Self::new(rules)
    }

    /// A new catalog extended with the custom rules from configuration
    pub fn with_custom(&self, config: &Config) -> Result<Self, CatalogError> {
        let mut rules = self.rules.clone();
        rules.extend(custom::custom_rules(&config.custom)?);
        Self::new(rules)
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that run on files of `language`
    pub fn for_language(&self, language: Language) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.applies_to(language))
    }

    /// Categories present in the catalog, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// A catalog restricted by category. When `only` is given it wins
    /// and `skip` is ignored.
    pub fn select(&self, only: Option<&[String]>, skip: Option<&[String]>) -> Self {
        let rules = self
            .rules
            .iter()
            .filter(|r| match (only, skip) {
                (Some(only), _) => only.iter().any(|c| c == &r.category),
                (None, Some(skip)) => !skip.iter().any(|c| c == &r.category),
                (None, None) => true,
            })
            .cloned()
            .collect();
        Self { rules }
    }

    /// Hex SHA-256 over every rule definition, used to key the cache
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for rule in &self.rules {
            hasher.update(rule.fingerprint().as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}
