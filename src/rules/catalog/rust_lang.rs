//! Rust rules, identified by Clippy lint names

use lazy_static::lazy_static;
use regex::Regex;

use super::Rule;
use crate::rules::matchers::Matcher;
use crate::rules::results::{Confidence, Severity};
use crate::source::Language;

lazy_static! {
    /// Built-in Rust rules
    pub static ref RUST_RULES: Vec<Rule> = vec![
        Rule::new(
            "approx_constant",
            "approx_constant",
            "correctness",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\b(?:3\.14\d*|2\.718\d*|1\.4142\d*|0\.693\d*|1\.5707\d*|0\.7853\d*)(?:_?f(?:32|64))?\b")
                    .unwrap(),
            ),
        )
        .with_message("Approximate value of a constant found")
        .with_remediation("Use the constant from std::f64::consts (PI, E, SQRT_2, LN_2, FRAC_PI_2, FRAC_PI_4)"),

        Rule::new(
            "eq_op",
            "eq_op",
            "correctness",
            Severity::Warning,
            Matcher::IdenticalOperands,
        )
        .with_message("Equal expressions as operands to a binary operator")
        .with_description("Comparing an expression with itself is always true or always false")
        .with_remediation("Check whether one side should be a different expression"),

        Rule::new(
            "len_zero",
            "len_zero",
            "style",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"\.len\s*\(\s*\)\s*(?:(?:==|!=|>)\s*0\b|(?:>=|<)\s*1\b)|\b0\s*(?:==|!=|<)\s*[\w.]+\.len\s*\(\s*\)")
                    .unwrap(),
            ),
        )
        .with_message("Length comparison to zero")
        .with_remediation("Use is_empty()"),

        Rule::new(
            "needless_bool",
            "needless_bool",
            "style",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"\bif\b[^{]*\{\s*(?:true|false)\s*\}\s*else\s*\{\s*(?:true|false)\s*\}").unwrap(),
            ),
        )
        .with_message("This if-then-else expression returns a bool literal")
        .with_remediation("Return the condition itself, negated if needed"),

        Rule::new(
            "ptr_arg",
            "ptr_arg",
            "style",
            Severity::Info,
            Matcher::masked(
                Regex::new(r"\bfn\s+\w+[^(]*\(.*?\b\w+\s*:\s*&\s*(?:'\w+\s+)?(?P<at>Vec\s*<|String\b|PathBuf\b)").unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Writing &Vec, &String or &PathBuf instead of a slice type")
        .with_remediation("Take &[T], &str or &Path"),

        Rule::new(
            "danger_accept_invalid_certs",
            "danger_accept_invalid_certs",
            "transport",
            Severity::Critical,
            Matcher::masked(
                Regex::new(r"\.\s*danger_accept_invalid_(?:certs|hostnames)\s*\(\s*true\s*\)").unwrap(),
            ),
        )
        .with_message("TLS certificate or hostname verification disabled")
        .with_remediation("Keep verification on; add a custom root certificate for private CAs"),

        Rule::new(
            "shell_command",
            "shell_command",
            "injection",
            Severity::Warning,
            Matcher::code(
                Regex::new(r#"\bCommand\s*::\s*new\s*\(\s*"(?:sh|bash|zsh|cmd|cmd\.exe|powershell|pwsh)"\s*\)"#).unwrap(),
            ),
        )
        .with_confidence(Confidence::Medium)
        .with_message("Process spawned through a shell")
        .with_remediation("Run the program directly and pass arguments with .arg()"),

        Rule::new(
            "weak_hash",
            "weak_hash",
            "crypto",
            Severity::Warning,
            Matcher::masked(
                Regex::new(r"\b(?:md5\s*::\s*compute|Md[45]\s*::\s*(?:new|digest)|Sha1\s*::\s*(?:new|digest))\s*\(").unwrap(),
            ),
        )
        .with_message("Use of a weak hash function (MD4, MD5 or SHA-1)")
        .with_remediation("Use SHA-256 or BLAKE3"),
    ]
    .into_iter()
    .map(|rule| rule.with_languages(&[Language::Rust]))
    .collect();
}
