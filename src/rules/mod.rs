//! Rules module - rule catalog, matchers and evaluation engine

pub mod catalog;
pub mod engine;
pub mod matchers;
pub mod results;
pub mod suppression;

pub use catalog::{Rule, RuleCatalog};
pub use results::{Confidence, Finding, ScanResults, Severity};
