//! Exit codes for the CLI
//!
//! Standard exit codes used by the Vigil CLI for CI/CD integration.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Scan completed, nothing above info |
//! | 1 | `CRITICAL_ISSUES` | Critical issues | Hardcoded secret, SQL injection |
//! | 2 | `WARNINGS` | Warnings | Weak hash, unclosed stream |
//! | 3 | `ERROR` | Runtime error | Missing root, invalid config file |
//! | 4 | `INVALID_ARGS` | Invalid arguments | Unknown severity or language |
//!
//! # Usage
//!
//! ```rust,ignore
//! use vigil::cli::exit_codes;
//!
//! std::process::exit(exit_codes::CRITICAL_ISSUES);
//! ```

/// Success - no findings above info severity.
pub const SUCCESS: i32 = 0;

/// At least one critical finding.
pub const CRITICAL_ISSUES: i32 = 1;

/// Warnings but no critical findings.
pub const WARNINGS: i32 = 2;

/// Runtime error.
///
/// Used when:
/// - The configuration file cannot be read or is invalid
/// - The scan root does not exist
/// - The output file cannot be written
pub const ERROR: i32 = 3;

/// Invalid arguments (unknown severity or language).
pub const INVALID_ARGS: i32 = 4;
