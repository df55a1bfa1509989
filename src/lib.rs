//! Vigil Library
//!
//! This crate scans Python, Java and Rust sources for security and
//! correctness anti-patterns using a catalog of lexical rules.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod rules;
pub mod scanner;
pub mod source;
pub mod utils;

pub use error::VigilError;
