//! Utility modules for Vigil

pub mod timing;

pub use timing::{format_duration, ScanTiming, Timer};
