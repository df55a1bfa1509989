//! Rules command - list the rule catalog

use colored::Colorize;
use std::path::{Path, PathBuf};

use super::{emit, load_config, OutputFormat, RulesArgs};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, OutputRenderer, TerminalOutput};
use crate::error::VigilError;
use crate::rules::catalog::Rule;
use crate::rules::RuleCatalog;
use crate::source::Language;

/// Execute the rules command
///
/// Lists built-in rules plus custom rules from the configuration found in
/// the current directory, optionally narrowed to one language.
pub async fn execute(args: RulesArgs, config_path: Option<PathBuf>) -> Result<i32, VigilError> {
    let language = match args.language.as_deref() {
        Some(name) => match Language::from_name(name) {
            Some(language) => Some(language),
            None => {
                eprintln!(
                    "{} Unknown language '{}' (expected python, java or rust)",
                    "Error:".red().bold(),
                    name
                );
                return Ok(exit_codes::INVALID_ARGS);
            }
        },
        None => None,
    };

    let config = load_config(config_path.as_deref(), Path::new("."))?;
    let catalog = RuleCatalog::builtin()?.with_custom(&config)?;

    let rules: Vec<&Rule> = match language {
        Some(language) => catalog.for_language(language).collect(),
        None => catalog.rules().iter().collect(),
    };

    let output: Box<dyn OutputRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    emit(&output.render_rules(&rules)?, None)?;

    Ok(exit_codes::SUCCESS)
}
