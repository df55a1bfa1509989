//! # Source Representation
//!
//! Turns a source file into a [`SourceUnit`]: a list of [`Site`]s, one per
//! logical line that carries code. Each site keeps three renditions of the
//! line and the nesting depth it sits at, which is enough structure for the
//! matchers to reason about blocks, enclosing headers and local scopes
//! without a full parser.
//!
//! - `raw` - the line exactly as written
//! - `code` - comments blanked, string literals intact
//! - `masked` - comments and literal contents blanked
//!
//! A logical line is a physical line plus every line that continues it:
//! lines inside open parentheses or brackets, after a Python backslash, or
//! inside a multi-line string. The continued pieces are joined with a single
//! space and each site remembers where its pieces start, so a match offset
//! still maps back to the physical line and column it came from. In Java and
//! Rust a `{` opened inside parentheses (a lambda or closure body) ends the
//! joining, and its body gets sites of its own.
//!
//! Depth is brace depth for Java and Rust and indentation level for Python.
//! A line that starts with closing braces takes the depth after those braces,
//! so `} else {` sits at the same depth as the `if` it continues.

mod lexer;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Languages the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python sources (`.py`, `.pyw`)
    Python,
    /// Java sources (`.java`)
    Java,
    /// Rust sources (`.rs`)
    Rust,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 3] = [Language::Python, Language::Java, Language::Rust];

    /// Detect the language from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyw" => Some(Self::Python),
            "java" => Some(Self::Java),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Parse a language name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Lowercase name of the language
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Rust => "rust",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which rendition of a site a pattern is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Comments removed, string literals intact
    Code,
    /// Comments removed, literal contents blanked
    Masked,
}

/// A logical source line that carries code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// 1-based number of the first physical line
    pub line: usize,
    /// The physical lines as written, newline separated
    pub raw: String,
    /// The joined lines with comments blanked
    pub code: String,
    /// The joined lines with comments and literal contents blanked
    pub masked: String,
    /// Nesting depth at the start of the line
    pub depth: usize,
    /// `(char offset in the views, physical line)` for every joined piece
    segments: Vec<(usize, usize)>,
}

impl Site {
    /// Text of the requested view
    pub fn view(&self, view: View) -> &str {
        match view {
            View::Code => &self.code,
            View::Masked => &self.masked,
        }
    }

    /// Physical line of a byte offset in one of the views
    pub fn line_at(&self, view: View, byte_offset: usize) -> usize {
        self.position(view, byte_offset).0
    }

    /// 1-based character column of a byte offset in one of the views,
    /// counted from the start of its physical line
    pub fn column_at(&self, view: View, byte_offset: usize) -> usize {
        self.position(view, byte_offset).1
    }

    /// `(line, column)` of a byte offset in one of the views
    pub fn position(&self, view: View, byte_offset: usize) -> (usize, usize) {
        let text = self.view(view);
        let end = byte_offset.min(text.len());
        let chars = text.get(..end).map(|s| s.chars().count()).unwrap_or(0);
        let (start, line) = self
            .segments
            .iter()
            .rev()
            .find(|(start, _)| *start <= chars)
            .copied()
            .unwrap_or((0, self.line));
        (line, chars - start + 1)
    }

    /// Physical line numbers covered by the site
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().map(|&(_, line)| line)
    }

    fn open(line: usize, raw: &str, code: &str, masked: &str, depth: usize) -> Self {
        Self {
            line,
            raw: raw.to_string(),
            code: code.to_string(),
            masked: masked.to_string(),
            depth,
            segments: vec![(0, line)],
        }
    }

    fn join(&mut self, line: usize, raw: &str, code: &str, masked: &str) {
        self.raw.push('\n');
        self.raw.push_str(raw);
        self.code.push(' ');
        self.masked.push(' ');
        self.segments.push((self.code.chars().count(), line));
        self.code.push_str(code);
        self.masked.push_str(masked);
    }

    fn trim_end(&mut self) {
        let code = self.code.trim_end().len();
        self.code.truncate(code);
        let masked = self.masked.trim_end().len();
        self.masked.truncate(masked);
    }
}

/// A lexed source file, ready for matching
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path relative to the scan root, `/` separated
    pub path: String,
    /// Language of the file
    pub language: Language,
    /// Full file text
    pub text: String,
    /// Every physical line, including blank and comment-only ones
    pub lines: Vec<String>,
    /// Lines carrying code, in file order
    pub sites: Vec<Site>,
}

impl SourceUnit {
    /// Lex `text` into sites. Never fails: unterminated strings or comments
    /// simply run to the end of the file.
    pub fn parse(path: impl Into<String>, language: Language, text: impl Into<String>) -> Self {
        let text = text.into();
        let lexed = lexer::lex(&text, language);
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        let mut sites: Vec<Site> = Vec::new();
        let mut indents = vec![0usize];
        let mut statement_depth = 0;
        // Brace depth at the start of the last site
        let mut site_braces = 0;

        for (idx, (raw, info)) in lines.iter().zip(lexed).enumerate() {
            if info.code.trim().is_empty() {
                continue;
            }

            let joins = info.continuation
                && match language {
                    Language::Python => true,
                    Language::Java | Language::Rust => {
                        info.leading_closers == 0 && info.brace_depth == site_braces
                    }
                };
            if joins {
                if let Some(site) = sites.last_mut() {
                    site.join(idx + 1, raw, &info.code, &info.masked);
                    continue;
                }
            }

            let depth = match language {
                Language::Python => {
                    if !info.continuation {
                        while indents.len() > 1 && info.indent < indents[indents.len() - 1] {
                            indents.pop();
                        }
                        if info.indent > indents[indents.len() - 1] {
                            indents.push(info.indent);
                        }
                        statement_depth = indents.len() - 1;
                    }
                    statement_depth
                }
                Language::Java | Language::Rust => {
                    info.brace_depth.saturating_sub(info.leading_closers)
                }
            };

            site_braces = info.brace_depth;
            sites.push(Site::open(idx + 1, raw, &info.code, &info.masked, depth));
        }

        for site in &mut sites {
            site.trim_end();
        }

        Self {
            path: path.into(),
            language,
            text,
            lines,
            sites,
        }
    }

    /// Raw text of a 1-based line number, if it exists
    pub fn line_text(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Index of the site following `index`
    pub fn next_site(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.sites.len()).then_some(next)
    }

    /// Nearest preceding site with a smaller depth: the header that opens
    /// the block `index` lives in
    pub fn enclosing(&self, index: usize) -> Option<usize> {
        let depth = self.sites.get(index)?.depth;
        (0..index).rev().find(|&j| self.sites[j].depth < depth)
    }

    /// Sites nested under the header at `index`
    pub fn block(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let depth = self.sites.get(index).map(|s| s.depth).unwrap_or(0);
        (index + 1..self.sites.len()).take_while(move |&j| self.sites[j].depth > depth)
    }

    /// Sites exactly one level below the header at `index`
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let depth = self.sites.get(index).map(|s| s.depth).unwrap_or(0);
        self.block(index)
            .filter(move |&j| self.sites[j].depth == depth + 1)
    }

    /// Sites that follow `index` within its own block, nested ones included
    pub fn scope_after(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let depth = self.sites.get(index).map(|s| s.depth).unwrap_or(0);
        (index + 1..self.sites.len()).take_while(move |&j| self.sites[j].depth >= depth)
    }
}
