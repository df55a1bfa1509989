//! Comparison matchers that need operand text or declared types

use super::Hit;
use crate::source::{SourceUnit, View};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPERATOR: Regex = Regex::new(r"==|!=|<=|>=|&&|\|\|").unwrap();
    static ref EQUALITY: Regex =
        Regex::new(r"(?P<lhs>[A-Za-z_]\w*)\s*(?:==|!=)\s*(?P<rhs>[A-Za-z_]\w*)").unwrap();
    static ref METHOD_HEADER: Regex =
        Regex::new(r"\)\s*(?:throws\s+[\w.,\s]+)?\{\s*$").unwrap();
}

/// Identifiers that are never declared variables
const NON_VARIABLES: [&str; 4] = ["null", "true", "false", "this"];

/// Words a declaration regex can mistake for a type
const NON_TYPES: [&str; 8] = [
    "return",
    "new",
    "throw",
    "else",
    "case",
    "instanceof",
    "assert",
    "yield",
];

/// Type condition on the operands a [`Matcher::Typed`](super::Matcher::Typed)
/// regex captures.
///
/// A type name matches by its simple name (`java.util.Date` matches `Date`),
/// and the entry `[]` matches every array type. String and number literals
/// count as `String`, `int` and `double`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheck {
    /// The `operand` group has one of the types
    OneOf(Vec<String>),
    /// The `operand` group is not known to have one of the types
    NoneOf(Vec<String>),
    /// `lhs` and `rhs` both have one of the types, and not the same one
    Unrelated(Vec<String>),
}

impl TypeCheck {
    fn passes(&self, unit: &SourceUnit, index: usize, caps: &regex::Captures<'_>) -> bool {
        let type_of = |group: &str| {
            caps.name(group)
                .and_then(|m| operand_type(unit, index, m.as_str().trim()))
        };
        match self {
            Self::OneOf(types) => type_of("operand").is_some_and(|ty| has_type(&ty, types)),
            Self::NoneOf(types) => !type_of("operand").is_some_and(|ty| has_type(&ty, types)),
            Self::Unrelated(types) => match (type_of("lhs"), type_of("rhs")) {
                (Some(lhs), Some(rhs)) => {
                    has_type(&lhs, types)
                        && has_type(&rhs, types)
                        && base_name(&lhs) != base_name(&rhs)
                }
                _ => false,
            },
        }
    }
}

fn is_operand_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Byte offset where the operand ending `text` starts. An operand is a
/// dotted name with optional balanced call or index suffixes, as in
/// `self.items.len()` or `a[i].b()`.
fn operand_start(text: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = chars.len();
    let mut start = None;

    while i > 0 {
        let c = chars[i - 1].1;
        if is_operand_char(c) {
            start = Some(chars[i - 1].0);
            i -= 1;
            continue;
        }

        let open = match c {
            ')' => '(',
            ']' => '[',
            _ => break,
        };
        let mut depth = 0usize;
        let mut opener = None;
        for j in (0..i).rev() {
            let d = chars[j].1;
            if d == c {
                depth += 1;
            } else if d == open {
                depth -= 1;
                if depth == 0 {
                    opener = Some(j);
                    break;
                }
            }
        }
        match opener {
            Some(j) if j > 0 && is_operand_char(chars[j - 1].1) => {
                start = Some(chars[j].0);
                i = j;
            }
            _ => break,
        }
    }

    start
}

/// Byte length of the operand starting `text`, with the same shape as
/// [`operand_start`]
fn operand_len(text: &str) -> usize {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;
    let mut end = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if is_operand_char(c) {
            end = pos + c.len_utf8();
            i += 1;
            continue;
        }

        let close = match c {
            '(' => ')',
            '[' => ']',
            _ => break,
        };
        if i == 0 || !is_operand_char(chars[i - 1].1) {
            break;
        }
        let mut depth = 0usize;
        let mut closer = None;
        for (j, &(_, d)) in chars.iter().enumerate().skip(i) {
            if d == c {
                depth += 1;
            } else if d == close {
                depth -= 1;
                if depth == 0 {
                    closer = Some(j);
                    break;
                }
            }
        }
        match closer {
            Some(j) => {
                end = chars[j].0 + close.len_utf8();
                i = j + 1;
            }
            None => break,
        }
    }

    end
}

/// Characters that bind tighter than the operator and would make the
/// adjacent identifier only part of an operand
fn extends_operand(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '.' | '!' | '(' | '[' | '&' | '|' | '^' | '<' | '>'
    )
}

const COMPARISONS: [&str; 4] = ["==", "!=", "<=", ">="];
const LOGICAL: [&str; 2] = ["&&", "||"];

/// Whether the text before the left operand makes it part of a larger
/// operand. Comparisons bind tighter than `&&` and `||`.
fn extends_left(before: &str, logical: bool) -> bool {
    if logical {
        COMPARISONS.iter().any(|op| before.ends_with(op))
            || before.chars().last().is_some_and(extends_operand)
    } else {
        !LOGICAL.iter().any(|op| before.ends_with(op))
            && before.chars().last().is_some_and(extends_operand)
    }
}

fn extends_right(after: &str, logical: bool) -> bool {
    if logical {
        COMPARISONS.iter().any(|op| after.starts_with(op))
            || after.chars().next().is_some_and(extends_operand)
    } else {
        !LOGICAL.iter().any(|op| after.starts_with(op))
            && after.chars().next().is_some_and(extends_operand)
    }
}

pub(super) fn find_identical_operands(unit: &SourceUnit) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        let text = site.masked.as_str();

        for op in OPERATOR.find_iter(text) {
            let left_text = text[..op.start()].trim_end();
            let Some(left_start) = operand_start(left_text) else {
                continue;
            };
            let left = &left_text[left_start..];

            let right_text = text[op.end()..].trim_start();
            let right_len = operand_len(right_text);
            let right = &right_text[..right_len];

            // Masked literals all look alike
            if left.is_empty()
                || left != right
                || left.starts_with('.')
                || left.ends_with('.')
                || left.contains(['"', '\''])
            {
                continue;
            }

            let logical = matches!(op.as_str(), "&&" | "||");
            let before = left_text[..left_start].trim_end();
            let after = right_text[right_len..].trim_start();
            if extends_left(before, logical) || extends_right(after, logical) {
                continue;
            }

            hits.push(Hit::at(unit, index, View::Masked, left_start));
        }
    }

    hits
}

pub(super) fn find_typed_comparisons(unit: &SourceUnit, types: &[String]) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        let text = site.masked.as_str();

        for caps in EQUALITY.captures_iter(text) {
            let (Some(lhs), Some(rhs)) = (caps.name("lhs"), caps.name("rhs")) else {
                continue;
            };
            if NON_VARIABLES.contains(&lhs.as_str()) || NON_VARIABLES.contains(&rhs.as_str()) {
                continue;
            }
            if text[..lhs.start()].ends_with('.') {
                continue;
            }
            let next = text[rhs.end()..].trim_start().chars().next();
            if matches!(next, Some('.') | Some('(') | Some('[')) {
                continue;
            }

            let typed = |name: &str| {
                declared_type(unit, index, name)
                    .is_some_and(|ty| types.iter().any(|t| t == simple_name(&ty)))
            };
            if typed(lhs.as_str()) && typed(rhs.as_str()) {
                hits.push(Hit::at(unit, index, View::Masked, lhs.start()));
            }
        }
    }

    hits
}

pub(super) fn find_typed(unit: &SourceUnit, regex: &Regex, check: &TypeCheck) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (index, site) in unit.sites.iter().enumerate() {
        let text = site.masked.as_str();
        let Some(caps) = regex.captures_iter(text).find(|caps| check.passes(unit, index, caps))
        else {
            continue;
        };
        let offset = caps
            .name("at")
            .or_else(|| caps.get(0))
            .map_or(0, |m| m.start());
        hits.push(Hit::at(unit, index, View::Masked, offset));
    }

    hits
}

/// Type of an operand: a literal, or a name declared earlier in the
/// enclosing method, parameters included
fn operand_type(unit: &SourceUnit, index: usize, operand: &str) -> Option<String> {
    let first = operand.chars().next()?;
    if first == '"' {
        return Some("String".to_string());
    }
    if first.is_ascii_digit() {
        let hex = operand.starts_with("0x") || operand.starts_with("0X");
        let floating =
            operand.contains('.') || (!hex && operand.ends_with(['d', 'D', 'f', 'F']));
        return Some(if floating { "double" } else { "int" }.to_string());
    }
    let is_name = (first.is_alphabetic() || first == '_')
        && operand.chars().all(|c| c.is_alphanumeric() || c == '_');
    if !is_name || NON_VARIABLES.contains(&operand) {
        return None;
    }
    declared_type(unit, index, operand)
}

fn has_type(ty: &str, types: &[String]) -> bool {
    types
        .iter()
        .any(|t| (t == "[]" && ty.ends_with("[]")) || t == base_name(ty))
}

/// Simple name without generic arguments or array brackets
fn base_name(ty: &str) -> &str {
    let ty = ty.split(['<', '[']).next().unwrap_or(ty).trim();
    simple_name(ty)
}

/// Type of the closest declaration of `name` between the enclosing method
/// header and `index`
fn declared_type(unit: &SourceUnit, index: usize, name: &str) -> Option<String> {
    let decl = Regex::new(&format!(
        r"(?:^|[^\w.])(?P<ty>[A-Za-z_][\w.]*(?:<[^<>]*>)?(?:\[\])*)\s+{}\s*(?:[,);:]|=[^=])",
        regex::escape(name)
    ))
    .ok()?;

    let mut start = 0;
    let mut cursor = index;
    while let Some(header) = unit.enclosing(cursor) {
        if METHOD_HEADER.is_match(&unit.sites[header].masked) {
            start = header;
            break;
        }
        cursor = header;
    }

    unit.sites[start..index]
        .iter()
        .rev()
        .find_map(|site| {
            decl.captures_iter(&site.masked)
                .filter_map(|caps| caps.name("ty").map(|m| m.as_str().to_string()))
                .filter(|ty| !NON_TYPES.contains(&ty.as_str()))
                .last()
        })
}

fn simple_name(ty: &str) -> &str {
    ty.rsplit('.').next().unwrap_or(ty)
}
