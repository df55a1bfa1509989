//! Custom rules defined in configuration

use regex::Regex;

use super::Rule;
use crate::config::CustomRulesConfig;
use crate::error::CatalogError;
use crate::rules::matchers::Matcher;
use crate::rules::results::Severity;
use crate::source::Language;

/// Compile the `[custom.<id>]` tables into rules with ids `custom/<id>`.
///
/// Unknown severities fall back to warning and unknown language names are
/// ignored with a warning; a pattern that does not compile is an error.
pub fn custom_rules(config: &CustomRulesConfig) -> Result<Vec<Rule>, CatalogError> {
    let mut rules = Vec::new();

    for (id, custom) in &config.rules {
        let rule_id = format!("custom/{}", id);

        let regex = Regex::new(&custom.pattern).map_err(|source| CatalogError::InvalidPattern {
            rule_id: rule_id.clone(),
            source,
        })?;

        let severity = Severity::from_string(&custom.severity).unwrap_or_else(|| {
            tracing::warn!(
                rule = %rule_id,
                severity = %custom.severity,
                "Unknown severity, using warning"
            );
            Severity::Warning
        });

        let languages: Vec<Language> = custom
            .languages
            .iter()
            .filter_map(|name| {
                let language = Language::from_name(name);
                if language.is_none() {
                    tracing::warn!(rule = %rule_id, language = %name, "Unknown language ignored");
                }
                language
            })
            .collect();

        let matcher = if custom.match_strings {
            Matcher::code(regex)
        } else {
            Matcher::masked(regex)
        };

        let mut rule = Rule::new(rule_id.clone(), id.clone(), "custom", severity, matcher)
            .with_languages(&languages)
            .with_message(
                custom
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Custom rule '{}' matched", id)),
            );
        if let Some(description) = &custom.description {
            rule = rule.with_description(description.clone());
        }
        if let Some(remediation) = &custom.remediation {
            rule = rule.with_remediation(remediation.clone());
        }

        rules.push(rule);
    }

    Ok(rules)
}
