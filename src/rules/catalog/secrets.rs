//! Secret detection rules
//!
//! These run on the `code` view so that tokens inside string literals are
//! visible. Comments are still blanked, which keeps documentation examples
//! out of the results.

use lazy_static::lazy_static;
use regex::Regex;

use super::Rule;
use crate::rules::matchers::Matcher;
use crate::rules::results::{Confidence, Severity};
use crate::source::Language;

/// A pattern for detecting secrets
struct SecretPattern {
    id: &'static str,
    name: &'static str,
    title: &'static str,
    description: &'static str,
    pattern: &'static str,
    confidence: Confidence,
    /// Empty means every language
    languages: &'static [Language],
}

const REMEDIATION: &str =
    "Rotate the credential and load it from the environment or a secret store";

/// Python has dedicated hardcoded-password rules (B105-B107)
const GENERIC_LANGUAGES: &[Language] = &[Language::Java, Language::Rust];

const SECRET_PATTERNS: &[SecretPattern] = &[
    // GitHub tokens
    SecretPattern {
        id: "SEC001",
        name: "github_personal_access_token",
        title: "GitHub Personal Access Token",
        description: "GitHub personal access tokens start with 'ghp_'",
        pattern: r"\bghp_[A-Za-z0-9]{36}\b",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC002",
        name: "github_token",
        title: "GitHub OAuth or App Token",
        description: "GitHub OAuth, user-to-server, server-to-server and refresh tokens",
        pattern: r"\bgh[ousr]_[A-Za-z0-9]{36}\b",
        confidence: Confidence::High,
        languages: &[],
    },
    // AWS
    SecretPattern {
        id: "SEC003",
        name: "aws_access_key_id",
        title: "AWS Access Key ID",
        description: "AWS access keys start with 'AKIA'",
        pattern: r"\bAKIA[0-9A-Z]{16}\b",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC004",
        name: "aws_secret_access_key",
        title: "AWS Secret Access Key",
        description: "AWS secret access keys are 40 character strings",
        pattern: r#"(?i)aws_secret_(?:access_)?key\s*[=:]\s*['"]?[A-Za-z0-9/+=]{40}['"]?"#,
        confidence: Confidence::High,
        languages: &[],
    },
    // Stripe
    SecretPattern {
        id: "SEC005",
        name: "stripe_secret_key",
        title: "Stripe Secret Key",
        description: "Stripe secret keys start with 'sk_live_' or 'sk_test_'",
        pattern: r"\bsk_(?:live|test)_[0-9a-zA-Z]{24,}",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC006",
        name: "stripe_restricted_key",
        title: "Stripe Restricted Key",
        description: "Stripe restricted keys start with 'rk_live_' or 'rk_test_'",
        pattern: r"\brk_(?:live|test)_[0-9a-zA-Z]{24,}",
        confidence: Confidence::High,
        languages: &[],
    },
    // Slack
    SecretPattern {
        id: "SEC007",
        name: "slack_token",
        title: "Slack Token",
        description: "Slack tokens start with 'xox'",
        pattern: r"\bxox[baprs]-[0-9a-zA-Z-]{10,48}",
        confidence: Confidence::High,
        languages: &[],
    },
    // Google
    SecretPattern {
        id: "SEC008",
        name: "google_api_key",
        title: "Google API Key",
        description: "Google API keys start with 'AIza'",
        pattern: r"\bAIza[0-9A-Za-z\-_]{35}",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC009",
        name: "google_oauth_token",
        title: "Google OAuth Token",
        description: "Google OAuth access tokens start with 'ya29.'",
        pattern: r"\bya29\.[0-9A-Za-z\-_]{20,}",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC010",
        name: "firebase_server_key",
        title: "Firebase Cloud Messaging Key",
        description: "Firebase server keys",
        pattern: r"\bAAAA[A-Za-z0-9_-]{7}:[A-Za-z0-9_-]{140}",
        confidence: Confidence::High,
        languages: &[],
    },
    // Other SaaS providers
    SecretPattern {
        id: "SEC011",
        name: "twilio_api_key",
        title: "Twilio API Key",
        description: "Twilio API keys start with 'SK'",
        pattern: r"\bSK[0-9a-fA-F]{32}\b",
        confidence: Confidence::Medium,
        languages: &[],
    },
    SecretPattern {
        id: "SEC012",
        name: "sendgrid_api_key",
        title: "SendGrid API Key",
        description: "SendGrid API keys start with 'SG.'",
        pattern: r"\bSG\.[0-9A-Za-z\-_]{22}\.[0-9A-Za-z\-_]{43}",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC013",
        name: "mailgun_api_key",
        title: "Mailgun API Key",
        description: "Mailgun API keys start with 'key-'",
        pattern: r"\bkey-[0-9a-zA-Z]{32}\b",
        confidence: Confidence::Medium,
        languages: &[],
    },
    SecretPattern {
        id: "SEC014",
        name: "npm_token",
        title: "npm Token",
        description: "npm tokens start with 'npm_'",
        pattern: r"\bnpm_[A-Za-z0-9]{36}\b",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC015",
        name: "discord_token",
        title: "Discord Token",
        description: "Discord bot tokens",
        pattern: r"\b[MN][A-Za-z\d]{23,}\.[\w-]{6}\.[\w-]{27}",
        confidence: Confidence::Medium,
        languages: &[],
    },
    // Keys and tokens
    SecretPattern {
        id: "SEC016",
        name: "private_key",
        title: "Private Key",
        description: "PEM encoded private key",
        pattern: r"-----BEGIN (?:RSA |DSA |EC |OPENSSH |ENCRYPTED )?PRIVATE KEY-----",
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC017",
        name: "json_web_token",
        title: "JSON Web Token",
        description: "Signed JWT with header and payload",
        pattern: r"\beyJ[A-Za-z0-9_=-]+\.eyJ[A-Za-z0-9_=-]+\.[A-Za-z0-9_.+/=-]+",
        confidence: Confidence::Medium,
        languages: &[],
    },
    // Connection strings
    SecretPattern {
        id: "SEC018",
        name: "database_url_credentials",
        title: "Database Connection String with Credentials",
        description: "MongoDB, PostgreSQL, MySQL or Redis URL with a password",
        pattern: r#"\b(?:mongodb(?:\+srv)?|postgres(?:ql)?|mysql|redis)://[^\s:/@"']+:[^\s@/"']+@"#,
        confidence: Confidence::High,
        languages: &[],
    },
    SecretPattern {
        id: "SEC019",
        name: "url_credentials",
        title: "URL with Embedded Credentials",
        description: "HTTP URL containing username:password",
        pattern: r#"\bhttps?://[^\s:/@"']+:[^\s@/"']+@[^\s/"']+"#,
        confidence: Confidence::High,
        languages: &[],
    },
    // Generic assignments
    SecretPattern {
        id: "SEC020",
        name: "generic_password",
        title: "Hardcoded Password",
        description: "Password assigned in code",
        pattern: r#"(?i)\b\w*(?:password|passwd|pwd)\w*\s*[=:]\s*['"][^'"]{8,}['"]"#,
        confidence: Confidence::Medium,
        languages: GENERIC_LANGUAGES,
    },
    SecretPattern {
        id: "SEC021",
        name: "generic_api_key",
        title: "Hardcoded API Key",
        description: "API key, secret key or access token assigned in code",
        pattern: r#"(?i)\b\w*(?:api[_-]?key|secret[_-]?key|access[_-]?token|auth[_-]?token)\w*\s*[=:]\s*['"][^'"]{16,}['"]"#,
        confidence: Confidence::Medium,
        languages: GENERIC_LANGUAGES,
    },
];

lazy_static! {
    /// Built-in secret rules
    pub static ref SECRET_RULES: Vec<Rule> = SECRET_PATTERNS
        .iter()
        .map(|secret| {
            Rule::new(
                secret.id,
                secret.name,
                "secrets",
                Severity::Critical,
                Matcher::code(Regex::new(secret.pattern).unwrap()),
            )
            .with_confidence(secret.confidence)
            .with_languages(secret.languages)
            .with_message(format!("{} detected", secret.title))
            .with_description(secret.description)
            .with_remediation(REMEDIATION)
        })
        .collect();
}
