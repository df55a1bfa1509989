//! Scan command - run the rule catalog over a file or directory
//!
//! Configuration is loaded from `--config` or from `.vigil.toml` next to the
//! scanned files. The scan itself is CPU bound and runs on the blocking
//! thread pool.

use colored::Colorize;
use std::path::PathBuf;

use super::{emit, load_config, OutputFormat, ScanArgs};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, OutputRenderer, TerminalOutput};
use crate::config::loader::parse_severity;
use crate::error::{ScanError, VigilError};
use crate::rules::engine::ScanEngine;
use crate::rules::results::ScanResults;
use crate::rules::RuleCatalog;
use crate::scanner::Scanner;

/// Execute the scan command
///
/// # Returns
///
/// An exit code: 0 when clean, 1 for critical findings, 2 for warnings,
/// 4 for invalid arguments
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the root does
/// not exist or the output cannot be written
pub async fn execute(args: ScanArgs, config_path: Option<PathBuf>) -> Result<i32, VigilError> {
    if let Some(min_severity) = &args.min_severity {
        if let Err(e) = parse_severity(min_severity) {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(exit_codes::INVALID_ARGS);
        }
    }

    let base_dir = match args.path.parent() {
        Some(parent) if args.path.is_file() => parent.to_path_buf(),
        _ => args.path.clone(),
    };
    let mut config = load_config(config_path.as_deref(), &base_dir)?;
    if let Some(min_severity) = args.min_severity {
        config.scan.min_severity = min_severity;
    }

    let scanner = Scanner::with_max_file_size(&args.path, config.scan.max_file_size)?;
    let catalog = RuleCatalog::builtin()?.with_custom(&config)?;
    let mut engine = ScanEngine::new(catalog, config);

    if let Some(only) = args.only {
        engine.set_only_categories(only);
    }
    if let Some(skip) = args.skip {
        engine.set_skip_categories(skip);
    }
    if args.no_cache {
        engine.set_cache_enabled(false);
    }

    let results = tokio::task::spawn_blocking(move || engine.run(&scanner))
        .await
        .map_err(|e| ScanError::Worker(e.to_string()))??;

    let output: Box<dyn OutputRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = output.render_scan(&results)?;
    emit(&rendered, args.output.as_deref())?;

    Ok(exit_code(&results))
}

/// Exit code for a finished scan
pub fn exit_code(results: &ScanResults) -> i32 {
    if results.has_critical() {
        exit_codes::CRITICAL_ISSUES
    } else if results.has_warnings() {
        exit_codes::WARNINGS
    } else {
        exit_codes::SUCCESS
    }
}
