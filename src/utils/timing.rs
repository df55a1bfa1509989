//! Timing utilities for measuring and formatting durations

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::source::Language;

/// A simple timer for measuring elapsed time
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer that starts immediately
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed whole milliseconds, saturating
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn elapsed_formatted(&self) -> String {
        format_duration(self.elapsed())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Format a duration into a human-readable string
///
/// - Durations >= 1 second: "1.23s"
/// - Durations >= 1 millisecond: "456ms"
/// - Durations < 1 millisecond: "< 1ms"
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();

    if millis == 0 {
        "< 1ms".to_string()
    } else if millis >= 1000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", millis)
    }
}

/// Work done for one language during a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTiming {
    pub files: usize,
    /// Files answered from the cache
    pub cached: usize,
    pub findings: usize,
    /// Summed matching time across workers
    pub duration: Duration,
}

/// Per-language timing for an entire scan run
#[derive(Debug, Clone, Default)]
pub struct ScanTiming {
    languages: BTreeMap<Language, LanguageTiming>,
}

impl ScanTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one file
    pub fn record(&mut self, language: Language, findings: usize, duration: Duration, cached: bool) {
        let entry = self.languages.entry(language).or_default();
        entry.files += 1;
        entry.findings += findings;
        entry.duration += duration;
        if cached {
            entry.cached += 1;
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = (&Language, &LanguageTiming)> {
        self.languages.iter()
    }

    pub fn get(&self, language: Language) -> Option<&LanguageTiming> {
        self.languages.get(&language)
    }
}
