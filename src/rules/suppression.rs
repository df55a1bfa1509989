//! Inline suppression markers
//!
//! `vigil:ignore` silences findings on the marker's line and on the line
//! below it; `vigil:ignore-file` silences them for the whole file. Both take
//! an optional `:` followed by rule ids separated by commas or spaces.
//! Without ids every rule is silenced.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref MARKER: Regex =
        Regex::new(r"(?i)vigil:ignore(?P<file>-file)?(?P<tail>.*)").unwrap();
    static ref RULE_ID: Regex = Regex::new(r"^[A-Za-z][\w/.-]*$").unwrap();
}

/// Rules a marker applies to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    All,
    Rules(HashSet<String>),
}

impl Scope {
    fn parse(tail: &str) -> Self {
        let Some(list) = tail.trim_start().strip_prefix(':') else {
            return Scope::All;
        };
        let ids: HashSet<String> = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| RULE_ID.is_match(token))
            .map(str::to_ascii_lowercase)
            .collect();
        if ids.is_empty() {
            Scope::All
        } else {
            Scope::Rules(ids)
        }
    }

    fn covers(&self, rule_id: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Rules(ids) => ids.contains(&rule_id.to_ascii_lowercase()),
        }
    }

    fn merge(&mut self, other: Scope) {
        match (&mut *self, other) {
            (Scope::All, _) => {}
            (_, Scope::All) => *self = Scope::All,
            (Scope::Rules(ids), Scope::Rules(more)) => ids.extend(more),
        }
    }
}

/// Suppression markers found in one file
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    file: Option<Scope>,
    lines: HashMap<usize, Scope>,
}

impl Suppressions {
    /// Collect markers from source text; lines are 1-based
    pub fn parse(text: &str) -> Self {
        let mut suppressions = Self::default();

        for (index, line) in text.lines().enumerate() {
            for caps in MARKER.captures_iter(line) {
                let scope = Scope::parse(caps.name("tail").map_or("", |m| m.as_str()));
                if caps.name("file").is_some() {
                    match &mut suppressions.file {
                        Some(existing) => existing.merge(scope),
                        None => suppressions.file = Some(scope),
                    }
                } else {
                    match suppressions.lines.entry(index + 1) {
                        Entry::Occupied(mut entry) => entry.get_mut().merge(scope),
                        Entry::Vacant(entry) => {
                            entry.insert(scope);
                        }
                    }
                }
            }
        }

        suppressions
    }

    /// Whether no marker was found
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.lines.is_empty()
    }

    /// Whether a finding of `rule_id` on `line` is silenced
    pub fn is_suppressed(&self, rule_id: &str, line: usize) -> bool {
        if self.file.as_ref().is_some_and(|s| s.covers(rule_id)) {
            return true;
        }
        [line, line.saturating_sub(1)]
            .iter()
            .filter(|&&l| l > 0)
            .filter_map(|l| self.lines.get(l))
            .any(|s| s.covers(rule_id))
    }
}
