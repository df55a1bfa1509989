//! # CLI Module
//!
//! This module defines the command-line interface for Vigil using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan a file or directory and report findings |
//! | `rules` | List the rule catalog |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//!
//! ## Examples
//!
//! ```bash
//! # Scan the current directory
//! vigil scan
//!
//! # Only secrets and injection rules, as JSON
//! vigil scan src --only secrets,injection --format json -o findings.json
//!
//! # List the Java rules
//! vigil rules --language java
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{RulesArgs, ScanArgs};

/// Vigil - Static scanner for security and correctness anti-patterns
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a file or directory for anti-patterns
    Scan(ScanArgs),

    /// List the available rules
    Rules(RulesArgs),
}
