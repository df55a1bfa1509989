//! Block and field matchers

use super::{report_offset, Hit};
use crate::source::{SourceUnit, View};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref SYNCHRONIZED: Regex = Regex::new(r"\bsynchronized\b").unwrap();
}

/// Where a block match is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReport {
    /// At the header site
    Header,
    /// At the first child matching `contains`
    Contains,
}

/// Which field misuse to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Read somewhere but never assigned, including at declaration
    Unwritten,
    /// Assigned (at declaration or later) but never read
    Unread,
    /// Written under a lock and also accessed without one. Reported at the
    /// first unlocked access.
    InconsistentSync,
}

pub(super) fn find_block(
    unit: &SourceUnit,
    header: &Regex,
    contains: Option<&Regex>,
    lacks: Option<&Regex>,
    report: BlockReport,
) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        let Some(head) = report_offset(header, &site.masked) else {
            continue;
        };

        let found = match contains {
            Some(contains) => {
                let found = unit.children(index).find_map(|j| {
                    report_offset(contains, &unit.sites[j].masked).map(|offset| (j, offset))
                });
                match found {
                    Some(found) => Some(found),
                    None => continue,
                }
            }
            None => None,
        };

        if let Some(lacks) = lacks {
            if unit
                .children(index)
                .any(|j| lacks.is_match(&unit.sites[j].masked))
            {
                continue;
            }
        }

        let hit = match (report, found) {
            (BlockReport::Contains, Some((j, offset))) => Hit::at(unit, j, View::Masked, offset),
            _ => Hit::at(unit, index, View::Masked, head),
        };
        hits.push(hit);
    }

    hits
}

/// One occurrence of a field name outside its declaration
#[derive(Debug, Clone, Copy)]
struct Access {
    site: usize,
    offset: usize,
    read: bool,
    write: bool,
}

const COMPOUND_ASSIGN: [&str; 10] = [
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

pub(super) fn find_fields(
    unit: &SourceUnit,
    decl: &Regex,
    exclude: Option<&Regex>,
    check: FieldCheck,
) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        if exclude.is_some_and(|e| e.is_match(&site.masked)) {
            continue;
        }
        let Some(caps) = decl.captures(&site.masked) else {
            continue;
        };
        let Some(name) = caps.name("name") else {
            continue;
        };
        let initialized = caps.name("init").is_some();

        let accesses = match Regex::new(&format!(r"\b{}\b", regex::escape(name.as_str()))) {
            Ok(occurrence) => field_accesses(unit, index, &occurrence),
            Err(e) => {
                debug!(field = name.as_str(), error = %e, "Skipping field");
                continue;
            }
        };
        let reads = accesses.iter().any(|a| a.read);
        let writes = accesses.iter().any(|a| a.write);

        let hit = match check {
            FieldCheck::Unwritten => (!initialized && !writes && reads)
                .then(|| Hit::at(unit, index, View::Masked, name.start())),
            FieldCheck::Unread => (!reads && (initialized || writes))
                .then(|| Hit::at(unit, index, View::Masked, name.start())),
            FieldCheck::InconsistentSync => {
                let locked = |a: &Access| is_synchronized(unit, a.site);
                if accesses.iter().any(|a| a.write && locked(a)) {
                    accesses
                        .iter()
                        .find(|a| !locked(a))
                        .map(|a| Hit::at(unit, a.site, View::Masked, a.offset))
                } else {
                    None
                }
            }
        };
        hits.extend(hit);
    }

    hits
}

/// Whether a site runs under a lock: inside a `synchronized` block or
/// method, or on a line that takes one itself
fn is_synchronized(unit: &SourceUnit, index: usize) -> bool {
    if SYNCHRONIZED.is_match(&unit.sites[index].masked) {
        return true;
    }
    let mut cursor = index;
    while let Some(header) = unit.enclosing(cursor) {
        if SYNCHRONIZED.is_match(&unit.sites[header].masked) {
            return true;
        }
        cursor = header;
    }
    false
}

/// Classify every occurrence of a field name outside its declaration
fn field_accesses(unit: &SourceUnit, decl_site: usize, occurrence: &Regex) -> Vec<Access> {
    let mut accesses = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        if index == decl_site {
            continue;
        }
        let text = site.masked.as_str();
        for m in occurrence.find_iter(text) {
            let after = text[m.end()..].trim_start();
            let before = text[..m.start()].trim_end();

            // Method call with the same name
            if after.starts_with('(') {
                continue;
            }

            let (read, write) = if after.starts_with("++")
                || after.starts_with("--")
                || before.ends_with("++")
                || before.ends_with("--")
                || COMPOUND_ASSIGN.iter().any(|op| after.starts_with(op))
            {
                (true, true)
            } else if after.starts_with('=') && !after.starts_with("==") {
                (false, true)
            } else {
                (true, false)
            };
            accesses.push(Access {
                site: index,
                offset: m.start(),
                read,
                write,
            });
        }
    }

    accesses
}
