//! Bind-then-use matching within a local scope

use super::{report_offset, Hit};
use crate::source::{SourceUnit, View};
use regex::Regex;
use tracing::debug;

/// Placeholder substituted with the bound identifier in templates
const NAME_PLACEHOLDER: &str = "{name}";

/// What a [`Flow`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowReport {
    /// The first use reached after the bind
    Use,
    /// The bind itself, when no use follows in scope
    Missing,
}

/// A name captured by `bind` and tracked through the sites that follow it.
///
/// `bind` must have a named group `name`. `use_` and `kill` are regex
/// templates where `{name}` stands for the escaped captured identifier.
/// Sites are visited in [`SourceUnit::scope_after`] order.
///
/// With [`FlowReport::Use`] the first site matching `use_` is a hit, unless
/// the text after the use itself matches `kill`. A site matching `kill`
/// ends the search. When `through` is set, uses only count after a site
/// matching it has been passed.
///
/// With [`FlowReport::Missing`] the bind is reported when no site in scope
/// matches `use_`.
#[derive(Debug, Clone)]
pub struct Flow {
    pub bind: Regex,
    pub use_: String,
    pub kill: Option<String>,
    pub through: Option<Regex>,
    pub report: FlowReport,
}

impl Flow {
    /// Report the first use of the bound name
    pub fn new(bind: Regex, use_: impl Into<String>) -> Self {
        Self {
            bind,
            use_: use_.into(),
            kill: None,
            through: None,
            report: FlowReport::Use,
        }
    }

    /// Report the bind when the name is never used as `use_` describes
    pub fn missing(bind: Regex, use_: impl Into<String>) -> Self {
        Self {
            report: FlowReport::Missing,
            ..Self::new(bind, use_)
        }
    }

    pub fn with_kill(mut self, kill: impl Into<String>) -> Self {
        self.kill = Some(kill.into());
        self
    }

    pub fn with_through(mut self, through: Regex) -> Self {
        self.through = Some(through);
        self
    }

    pub(super) fn fingerprint(&self) -> String {
        format!(
            "flow({},{},{},{},{:?})",
            self.bind.as_str(),
            self.use_,
            self.kill.as_deref().unwrap_or(""),
            self.through.as_ref().map(Regex::as_str).unwrap_or(""),
            self.report
        )
    }

    pub(super) fn find(&self, unit: &SourceUnit) -> Vec<Hit> {
        let mut hits = Vec::new();

        for (index, site) in unit.sites.iter().enumerate() {
            let Some(caps) = self.bind.captures(&site.masked) else {
                continue;
            };
            let Some(name) = caps.name("name") else {
                continue;
            };
            let Some(use_re) = instantiate(&self.use_, name.as_str()) else {
                continue;
            };
            let kill_re = match &self.kill {
                Some(template) => match instantiate(template, name.as_str()) {
                    Some(re) => Some(re),
                    None => continue,
                },
                None => None,
            };

            let bind_end = caps.get(0).map_or(0, |m| m.end());
            let rest = &site.masked[bind_end..];

            let hit = match self.report {
                FlowReport::Use => {
                    if kill_re.as_ref().is_some_and(|k| k.is_match(rest)) {
                        continue;
                    }
                    self.first_use(unit, index, &use_re, kill_re.as_ref())
                }
                FlowReport::Missing => {
                    let used = use_re.is_match(rest)
                        || unit
                            .scope_after(index)
                            .any(|j| use_re.is_match(&unit.sites[j].masked));
                    (!used).then(|| Hit::at(unit, index, View::Masked, name.start()))
                }
            };

            hits.extend(hit);
        }

        hits
    }

    fn first_use(
        &self,
        unit: &SourceUnit,
        bind_site: usize,
        use_re: &Regex,
        kill_re: Option<&Regex>,
    ) -> Option<Hit> {
        let mut passed_through = self.through.is_none();

        for j in unit.scope_after(bind_site) {
            let text = &unit.sites[j].masked;

            if passed_through {
                if let Some(m) = use_re.find(text) {
                    if kill_re.is_some_and(|k| k.is_match(&text[m.end()..])) {
                        return None;
                    }
                    let offset = report_offset(use_re, text).unwrap_or(m.start());
                    return Some(Hit::at(unit, j, View::Masked, offset));
                }
            }

            if kill_re.is_some_and(|k| k.is_match(text)) {
                return None;
            }

            if let Some(through) = &self.through {
                if through.is_match(text) {
                    passed_through = true;
                }
            }
        }

        None
    }
}

/// Build a regex from a template, substituting the escaped identifier
fn instantiate(template: &str, name: &str) -> Option<Regex> {
    let pattern = template.replace(NAME_PLACEHOLDER, &regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(template = template, error = %e, "Skipping uncompilable flow template");
            None
        }
    }
}
