//! Terminal output formatting with colors

use colored::Colorize;
use std::time::Duration;

use super::OutputRenderer;
use crate::error::VigilError;
use crate::rules::catalog::Rule;
use crate::rules::results::{Finding, ScanResults, Severity};
use crate::utils::format_duration;

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, root_name: &str) -> String {
        format!(
            r#"
{} v{}

{} {}
"#,
            "vigil".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Root:".dimmed(),
            root_name.white().bold(),
        )
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}\n  {}\n\n", "━".repeat(50).dimmed(), title.bold())
    }

    fn format_findings(&self, results: &ScanResults) -> String {
        let mut output = self.section("FINDINGS");

        if results.is_clean() {
            output.push_str(&format!("  {}\n", "No issues found.".green()));
            return output;
        }

        for severity in Severity::ALL {
            let findings: Vec<_> = results.findings_by_severity(severity).collect();
            if findings.is_empty() {
                continue;
            }

            output.push_str(&format!("{} ({})\n", severity_label(severity), findings.len()));
            for finding in findings {
                output.push_str(&self.format_finding(finding));
            }
            output.push('\n');
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let mut output = format!(
            "  {} [{}] {}\n",
            "•".dimmed(),
            finding.rule_id.cyan(),
            finding.message
        );
        output.push_str(&format!(
            "    {} {}\n",
            "└─".dimmed(),
            finding.location().dimmed()
        ));
        if !finding.snippet.is_empty() {
            output.push_str(&format!("       {}\n", finding.snippet.italic()));
        }

        output
    }

    fn format_summary(&self, results: &ScanResults) -> String {
        let mut output = self.section("SUMMARY");

        output.push_str(&format!(
            "Critical: {} │ Warnings: {} │ Info: {}\n",
            results
                .count_by_severity(Severity::Critical)
                .to_string()
                .red()
                .bold(),
            results
                .count_by_severity(Severity::Warning)
                .to_string()
                .yellow()
                .bold(),
            results
                .count_by_severity(Severity::Info)
                .to_string()
                .blue()
                .bold()
        ));
        output.push_str(&format!(
            "{} files, {} rules in {}\n",
            results.files_scanned,
            results.rules_evaluated,
            format_duration(Duration::from_millis(results.duration_ms))
        ));

        output
    }
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => "❌ CRITICAL".red().bold().to_string(),
        Severity::Warning => "⚠️  WARNING".yellow().bold().to_string(),
        Severity::Info => "ℹ️  INFO".blue().bold().to_string(),
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputRenderer for TerminalOutput {
    fn render_scan(&self, results: &ScanResults) -> Result<String, VigilError> {
        let mut output = String::new();

        output.push_str(&self.format_header(&results.root_name));
        output.push_str(&self.format_findings(results));
        output.push_str(&self.format_summary(results));

        Ok(output)
    }

    fn render_rules(&self, rules: &[&Rule]) -> Result<String, VigilError> {
        let mut output = self.section(&format!("RULES ({})", rules.len()));

        for rule in rules {
            let languages = if rule.languages.is_empty() {
                "all".to_string()
            } else {
                rule.languages
                    .iter()
                    .map(|l| l.name())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            output.push_str(&format!(
                "  {} {:<16} {:<9} {} {}\n",
                format!("{:<32}", rule.id).cyan(),
                rule.category,
                rule.severity.as_str(),
                format!("{:<7}", languages).dimmed(),
                rule.message
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::RuleCatalog;
    use crate::source::Language;

    #[test]
    fn test_render_scan_groups_by_severity() {
        let mut results = ScanResults::new("demo");
        results.files_scanned = 1;
        results.add_findings(vec![
            Finding::new("B307", "injection", Severity::Warning, "Use of eval()")
                .with_location("app.py", 4, 7)
                .with_snippet("value = eval(data)"),
            Finding::new("SEC003", "secrets", Severity::Critical, "AWS access key detected")
                .with_location("app.py", 2, 8),
        ]);
        results.finalize(Severity::Info);

        let output = TerminalOutput::new().render_scan(&results).unwrap();

        assert!(output.contains("demo"));
        assert!(output.contains("CRITICAL"));
        assert!(output.contains("WARNING"));
        assert!(!output.contains("INFO"));
        assert!(output.contains("app.py:4:7"));
        assert!(output.contains("value = eval(data)"));
        assert!(output.find("SEC003").unwrap() < output.find("B307").unwrap());
    }

    #[test]
    fn test_render_clean_scan() {
        let results = ScanResults::new("empty");
        let output = TerminalOutput::default().render_scan(&results).unwrap();

        assert!(output.contains("No issues found."));
        assert!(output.contains("SUMMARY"));
    }

    #[test]
    fn test_render_rules_table() {
        let catalog = RuleCatalog::builtin().unwrap();
        let rules: Vec<&Rule> = catalog.for_language(Language::Rust).collect();
        let output = TerminalOutput::new().render_rules(&rules).unwrap();

        assert!(output.contains(&format!("RULES ({})", rules.len())));
        assert!(output.contains("eq_op"));
        assert!(!output.contains("B101"));
    }
}
