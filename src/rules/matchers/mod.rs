//! # Matchers
//!
//! A [`Matcher`] is the detection half of a rule. It evaluates against a
//! whole [`SourceUnit`] and yields [`Hit`]s: the index of the site that
//! fired plus the physical line and 1-based column to report.
//!
//! Line-level variants (`Pattern`, `Sequence`, `Enclosed`) are evaluated
//! here. Variants that need to look across sites live in submodules:
//!
//! - [`flow`] - a name bound on one site and used (or never used) later
//! - [`structure`] - block contents and private field usage
//! - [`compare`] - comparisons that need operand text or declared types
//!
//! Wherever a regex decides the reported position, a group named `at`
//! moves the column from the start of the match to the start of the group.
//!
//! Every regex built at scan time from captured source text goes through
//! `regex::escape`, and a template that still fails to compile is skipped.

pub mod compare;
pub mod flow;
pub mod structure;

pub use compare::TypeCheck;
pub use flow::{Flow, FlowReport};
pub use structure::{BlockReport, FieldCheck};

use crate::source::{SourceUnit, View};
use regex::Regex;

/// A matcher firing at one site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hit {
    /// Index into `SourceUnit::sites`
    pub site: usize,
    /// 1-based physical line
    pub line: usize,
    /// 1-based character column
    pub column: usize,
}

impl Hit {
    /// Hit at a byte offset into one view of `unit.sites[site]`
    pub fn at(unit: &SourceUnit, site: usize, view: View, offset: usize) -> Self {
        let (line, column) = unit.sites[site].position(view, offset);
        Self { site, line, column }
    }
}

/// Detection logic of a rule
#[derive(Debug, Clone)]
pub enum Matcher {
    /// `regex` matches the site in `view`, and `unless` does not.
    ///
    /// When the regex has a group named `at`, the column is the start of
    /// that group instead of the start of the match.
    Pattern {
        regex: Regex,
        view: View,
        unless: Option<Regex>,
    },

    /// `head` matches a site and `next` matches the site after it.
    /// Reported at the head.
    Sequence { head: Regex, next: Regex },

    /// `regex` matches a site whose enclosing header matches `enclosing`
    /// (or does not, when `negate` is set). A site that itself matches
    /// `enclosing` counts as enclosed.
    Enclosed {
        regex: Regex,
        enclosing: Regex,
        negate: bool,
    },

    /// A header whose direct children include a `contains` site and no
    /// `lacks` site.
    Block {
        header: Regex,
        contains: Option<Regex>,
        lacks: Option<Regex>,
        report: BlockReport,
    },

    /// Name binding followed by a use in the same scope
    Flow(Flow),

    /// Private field declarations checked against their uses in the unit
    Field {
        decl: Regex,
        exclude: Option<Regex>,
        check: FieldCheck,
    },

    /// Comparison or logical operator with textually identical operands
    IdenticalOperands,

    /// `a == b` or `a != b` where both operands are declared with one of
    /// `types`
    TypedComparison { types: Vec<String> },

    /// `regex` matches and the operands it captures pass a type check
    Typed { regex: Regex, check: TypeCheck },

    /// Union of several matchers
    Any(Vec<Matcher>),
}

impl Matcher {
    /// Pattern over the masked view
    pub fn masked(regex: Regex) -> Self {
        Self::Pattern {
            regex,
            view: View::Masked,
            unless: None,
        }
    }

    /// Pattern over the masked view with a veto
    pub fn masked_unless(regex: Regex, unless: Regex) -> Self {
        Self::Pattern {
            regex,
            view: View::Masked,
            unless: Some(unless),
        }
    }

    /// Pattern over the code view, string literals included
    pub fn code(regex: Regex) -> Self {
        Self::Pattern {
            regex,
            view: View::Code,
            unless: None,
        }
    }

    /// Pattern over the code view with a veto
    pub fn code_unless(regex: Regex, unless: Regex) -> Self {
        Self::Pattern {
            regex,
            view: View::Code,
            unless: Some(unless),
        }
    }

    /// Evaluate against a unit. Hits come back sorted by site and column.
    pub fn find(&self, unit: &SourceUnit) -> Vec<Hit> {
        let mut hits = match self {
            Self::Pattern {
                regex,
                view,
                unless,
            } => find_pattern(unit, regex, *view, unless.as_ref()),
            Self::Sequence { head, next } => find_sequence(unit, head, next),
            Self::Enclosed {
                regex,
                enclosing,
                negate,
            } => find_enclosed(unit, regex, enclosing, *negate),
            Self::Block {
                header,
                contains,
                lacks,
                report,
            } => structure::find_block(unit, header, contains.as_ref(), lacks.as_ref(), *report),
            Self::Flow(flow) => flow.find(unit),
            Self::Field {
                decl,
                exclude,
                check,
            } => structure::find_fields(unit, decl, exclude.as_ref(), *check),
            Self::IdenticalOperands => compare::find_identical_operands(unit),
            Self::TypedComparison { types } => compare::find_typed_comparisons(unit, types),
            Self::Typed { regex, check } => compare::find_typed(unit, regex, check),
            Self::Any(matchers) => matchers.iter().flat_map(|m| m.find(unit)).collect(),
        };
        hits.sort();
        hits.dedup();
        hits
    }

    /// Every regex source in the matcher, in a stable order
    pub fn fingerprint(&self) -> String {
        fn opt(regex: &Option<Regex>) -> &str {
            regex.as_ref().map(Regex::as_str).unwrap_or("")
        }

        match self {
            Self::Pattern {
                regex,
                view,
                unless,
            } => format!("pattern({:?},{},{})", view, regex.as_str(), opt(unless)),
            Self::Sequence { head, next } => {
                format!("sequence({},{})", head.as_str(), next.as_str())
            }
            Self::Enclosed {
                regex,
                enclosing,
                negate,
            } => format!(
                "enclosed({},{},{})",
                regex.as_str(),
                enclosing.as_str(),
                negate
            ),
            Self::Block {
                header,
                contains,
                lacks,
                report,
            } => format!(
                "block({},{},{},{:?})",
                header.as_str(),
                opt(contains),
                opt(lacks),
                report
            ),
            Self::Flow(flow) => flow.fingerprint(),
            Self::Field {
                decl,
                exclude,
                check,
            } => format!("field({},{},{:?})", decl.as_str(), opt(exclude), check),
            Self::IdenticalOperands => "identical_operands".to_string(),
            Self::TypedComparison { types } => format!("typed_comparison({})", types.join(",")),
            Self::Typed { regex, check } => format!("typed({},{:?})", regex.as_str(), check),
            Self::Any(matchers) => {
                let parts: Vec<String> = matchers.iter().map(Matcher::fingerprint).collect();
                format!("any({})", parts.join(";"))
            }
        }
    }
}

/// Byte offset to report for the first match of `regex` in `text`: the
/// start of the `at` group when the regex has one and it took part in the
/// match, else the start of the match
pub(crate) fn report_offset(regex: &Regex, text: &str) -> Option<usize> {
    if regex.capture_names().any(|n| n == Some("at")) {
        let caps = regex.captures(text)?;
        caps.name("at").or_else(|| caps.get(0)).map(|m| m.start())
    } else {
        regex.find(text).map(|m| m.start())
    }
}

fn find_pattern(unit: &SourceUnit, regex: &Regex, view: View, unless: Option<&Regex>) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        let text = site.view(view);
        if unless.is_some_and(|u| u.is_match(text)) {
            continue;
        }
        if let Some(offset) = report_offset(regex, text) {
            hits.push(Hit::at(unit, index, view, offset));
        }
    }

    hits
}

fn find_sequence(unit: &SourceUnit, head: &Regex, next: &Regex) -> Vec<Hit> {
    unit.sites
        .iter()
        .enumerate()
        .filter_map(|(index, site)| {
            let offset = report_offset(head, &site.masked)?;
            let following = unit.next_site(index)?;
            next.is_match(&unit.sites[following].masked)
                .then(|| Hit::at(unit, index, View::Masked, offset))
        })
        .collect()
}

fn find_enclosed(unit: &SourceUnit, regex: &Regex, enclosing: &Regex, negate: bool) -> Vec<Hit> {
    unit.sites
        .iter()
        .enumerate()
        .filter_map(|(index, site)| {
            let m = regex.find(&site.masked)?;
            let enclosed = enclosing.is_match(&site.masked[..m.start()])
                || unit
                    .enclosing(index)
                    .is_some_and(|header| enclosing.is_match(&unit.sites[header].masked));
            let offset = report_offset(regex, &site.masked).unwrap_or(m.start());
            (enclosed != negate).then(|| Hit::at(unit, index, View::Masked, offset))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Language;
    use pretty_assertions::assert_eq;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn lines(hits: &[Hit]) -> Vec<usize> {
        hits.iter().map(|h| h.line).collect()
    }

    #[test]
    fn test_masked_pattern_ignores_strings_and_comments() {
        let unit = SourceUnit::parse(
            "a.py",
            Language::Python,
            "x = eval(data)\nprint(\"eval(data)\")\n# eval(data)\n",
        );
        let hits = Matcher::masked(re(r"\beval\s*\(")).find(&unit);
        assert_eq!(hits, vec![Hit { site: 0, line: 1, column: 5 }]);
    }

    #[test]
    fn test_code_pattern_sees_literals() {
        let unit = SourceUnit::parse("a.py", Language::Python, "host = \"0.0.0.0\"\n");
        let hits = Matcher::code(re(r#"["']0\.0\.0\.0["']"#)).find(&unit);
        assert_eq!(hits, vec![Hit { site: 0, line: 1, column: 8 }]);
    }

    #[test]
    fn test_unless_vetoes_site() {
        let unit = SourceUnit::parse(
            "a.py",
            Language::Python,
            "yaml.load(s)\nyaml.load(s, Loader=yaml.SafeLoader)\n",
        );
        let hits =
            Matcher::masked_unless(re(r"\byaml\.load\("), re(r"SafeLoader")).find(&unit);
        assert_eq!(lines(&hits), vec![1]);
    }

    #[test]
    fn test_at_group_sets_column() {
        let unit = SourceUnit::parse("a.py", Language::Python, "r = obj.eval(x) + eval(y)\n");
        let hits = Matcher::masked(re(r"(?:^|[^.\w])(?P<at>eval)\s*\(")).find(&unit);
        assert_eq!(hits, vec![Hit { site: 0, line: 1, column: 19 }]);
    }

    #[test]
    fn test_sequence_reports_head() {
        let src = "try:\n    go()\nexcept Exception:\n    pass\n";
        let unit = SourceUnit::parse("a.py", Language::Python, src);
        let hits = Matcher::Sequence {
            head: re(r"^\s*(?P<at>except)\b[^:]*:\s*$"),
            next: re(r"^\s*pass\s*$"),
        }
        .find(&unit);
        assert_eq!(lines(&hits), vec![3]);
    }

    #[test]
    fn test_sequence_column_follows_at_group() {
        let src = "for x in xs:\n    try:\n        go(x)\n    except Exception:\n        continue\n";
        let unit = SourceUnit::parse("a.py", Language::Python, src);
        let hits = Matcher::Sequence {
            head: re(r"^\s*(?P<at>except)\b[^:]*:\s*$"),
            next: re(r"^\s*continue\s*$"),
        }
        .find(&unit);
        assert_eq!(hits, vec![Hit { site: 3, line: 4, column: 5 }]);
    }

    #[test]
    fn test_hit_on_continued_line_reports_physical_position() {
        let src = "proc = subprocess.Popen(\n    cmd,\n    shell=True)\n";
        let unit = SourceUnit::parse("a.py", Language::Python, src);
        assert_eq!(unit.sites.len(), 1);

        let hits = Matcher::masked(re(r"\bshell\s*=\s*True\b")).find(&unit);
        assert_eq!(hits, vec![Hit { site: 0, line: 3, column: 5 }]);

        let hits = Matcher::masked(re(r"\bsubprocess\.Popen\(")).find(&unit);
        assert_eq!(hits, vec![Hit { site: 0, line: 1, column: 8 }]);
    }

    #[test]
    fn test_enclosed_negated() {
        let src = r#"class A {
    synchronized void a() throws Exception {
        if (!ready) {
            wait();
        }
        while (!ready) {
            wait();
        }
        while (!ready) wait();
    }
}
"#;
        let unit = SourceUnit::parse("A.java", Language::Java, src);
        let hits = Matcher::Enclosed {
            regex: re(r"\bwait\s*\(\s*\)"),
            enclosing: re(r"^\s*(?:\}\s*)?(?:while|for|do)\b"),
            negate: true,
        }
        .find(&unit);
        assert_eq!(lines(&hits), vec![4]);
    }

    #[test]
    fn test_any_merges_and_dedups() {
        let unit = SourceUnit::parse("a.py", Language::Python, "os.system(cmd)\n");
        let matcher = Matcher::Any(vec![
            Matcher::masked(re(r"\bos\.system\(")),
            Matcher::masked(re(r"\bos\.system\(")),
        ]);
        assert_eq!(matcher.find(&unit).len(), 1);
    }

    #[test]
    fn test_fingerprint_changes_with_pattern() {
        let a = Matcher::masked(re("a")).fingerprint();
        let b = Matcher::masked(re("b")).fingerprint();
        let c = Matcher::code(re("a")).fingerprint();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
