//! Line-oriented lexer
//!
//! Splits a file into physical lines and, for each one, produces a `code`
//! rendition with comments blanked out and a `masked` rendition where the
//! contents of string and character literals are also blanked. Both keep the
//! same character count as the original prefix so columns stay aligned.

use super::Language;

/// Lexical facts about one physical line
#[derive(Debug, Clone, Default)]
pub(crate) struct LineInfo {
    /// Line text with comments replaced by spaces (strings intact)
    pub code: String,
    /// `code` with literal contents replaced by spaces
    pub masked: String,
    /// Brace depth before the first character of the line
    pub brace_depth: usize,
    /// Number of `}` appearing before any other token on the line
    pub leading_closers: usize,
    /// Indentation width (tabs expand to the next multiple of 8)
    pub indent: usize,
    /// Whether the line continues a statement started on an earlier line
    pub continuation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    BlockComment { nesting: usize },
    Str {
        quote: char,
        triple: bool,
        raw: bool,
        hashes: usize,
    },
}

/// Lex `text` into per-line information.
pub(crate) fn lex(text: &str, language: Language) -> Vec<LineInfo> {
    let mut lexer = Lexer::new(language);
    text.lines().map(|line| lexer.line(line)).collect()
}

struct Lexer {
    language: Language,
    state: State,
    brace_depth: usize,
    bracket_depth: usize,
    backslash_continued: bool,
}

impl Lexer {
    fn new(language: Language) -> Self {
        Self {
            language,
            state: State::Normal,
            brace_depth: 0,
            bracket_depth: 0,
            backslash_continued: false,
        }
    }

    fn line(&mut self, line: &str) -> LineInfo {
        let chars: Vec<char> = line.chars().collect();
        let continuation = self.bracket_depth > 0
            || self.backslash_continued
            || self.state != State::Normal;

        let mut info = LineInfo {
            brace_depth: self.brace_depth,
            indent: indent_width(&chars),
            continuation,
            ..Default::default()
        };

        let mut seen_token = false;
        let mut escaped_eol = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match self.state {
                State::BlockComment { nesting } => {
                    if c == '*' && next == Some('/') {
                        self.state = if nesting > 1 {
                            State::BlockComment {
                                nesting: nesting - 1,
                            }
                        } else {
                            State::Normal
                        };
                        push_blank(&mut info, 2);
                        i += 2;
                    } else if self.language == Language::Rust && c == '/' && next == Some('*') {
                        self.state = State::BlockComment {
                            nesting: nesting + 1,
                        };
                        push_blank(&mut info, 2);
                        i += 2;
                    } else {
                        push_blank(&mut info, 1);
                        i += 1;
                    }
                }
                State::Str {
                    quote,
                    triple,
                    raw,
                    hashes,
                } => {
                    if !raw && c == '\\' {
                        info.code.push(c);
                        info.masked.push(' ');
                        match next {
                            Some(escaped) => {
                                info.code.push(escaped);
                                info.masked.push(' ');
                                i += 2;
                            }
                            None => {
                                escaped_eol = true;
                                i += 1;
                            }
                        }
                        continue;
                    }

                    if c == quote && closes(&chars, i, quote, triple, hashes) {
                        let width = if triple { 3 } else { 1 + hashes };
                        for &d in &chars[i..i + width] {
                            info.code.push(d);
                            info.masked.push(d);
                        }
                        self.state = State::Normal;
                        i += width;
                        continue;
                    }

                    info.code.push(c);
                    info.masked.push(' ');
                    i += 1;
                }
                State::Normal => {
                    if self.starts_line_comment(&chars, i) {
                        break;
                    }

                    if self.language != Language::Python && c == '/' && next == Some('*') {
                        self.state = State::BlockComment { nesting: 1 };
                        push_blank(&mut info, 2);
                        i += 2;
                        continue;
                    }

                    if let Some((width, state)) = self.literal_start(&chars, i) {
                        for &d in &chars[i..i + width] {
                            info.code.push(d);
                            info.masked.push(d);
                        }
                        self.state = state;
                        seen_token = true;
                        i += width;
                        continue;
                    }

                    self.track_nesting(c, seen_token, &mut info);
                    if !c.is_whitespace() && c != '}' {
                        seen_token = true;
                    }

                    info.code.push(c);
                    info.masked.push(c);
                    i += 1;
                }
            }
        }

        // Only Rust strings and triple-quoted strings may run past a newline
        // without an escape.
        if let State::Str { triple, raw, .. } = self.state {
            let spans_lines = triple || self.language == Language::Rust;
            if !spans_lines && (raw || !escaped_eol) {
                self.state = State::Normal;
            }
        }

        self.backslash_continued = self.language == Language::Python
            && self.state == State::Normal
            && info.code.trim_end().ends_with('\\');

        info
    }

    fn starts_line_comment(&self, chars: &[char], i: usize) -> bool {
        match self.language {
            Language::Python => chars[i] == '#',
            Language::Java | Language::Rust => {
                chars[i] == '/' && chars.get(i + 1) == Some(&'/')
            }
        }
    }

    /// Detect the opening delimiter of a string or character literal at `i`.
    ///
    /// Returns the delimiter width and the state to enter.
    fn literal_start(&self, chars: &[char], i: usize) -> Option<(usize, State)> {
        let c = chars[i];
        match self.language {
            Language::Python => {
                if c != '"' && c != '\'' {
                    return None;
                }
                let raw = python_prefix(chars, i).contains(|p: char| p == 'r' || p == 'R');
                let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                Some((
                    if triple { 3 } else { 1 },
                    State::Str {
                        quote: c,
                        triple,
                        raw,
                        hashes: 0,
                    },
                ))
            }
            Language::Java => match c {
                '"' => {
                    let triple =
                        chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"');
                    Some((
                        if triple { 3 } else { 1 },
                        State::Str {
                            quote: '"',
                            triple,
                            raw: false,
                            hashes: 0,
                        },
                    ))
                }
                '\'' => Some((1, plain_string('\''))),
                _ => None,
            },
            Language::Rust => match c {
                '"' => Some((1, plain_string('"'))),
                '\'' if is_rust_char_literal(chars, i) => Some((1, plain_string('\''))),
                'r' if !is_word_before(chars, i, true) => {
                    let hashes = chars[i + 1..].iter().take_while(|&&h| h == '#').count();
                    if chars.get(i + 1 + hashes) == Some(&'"') {
                        Some((
                            2 + hashes,
                            State::Str {
                                quote: '"',
                                triple: false,
                                raw: true,
                                hashes,
                            },
                        ))
                    } else {
                        None
                    }
                }
                _ => None,
            },
        }
    }

    fn track_nesting(&mut self, c: char, seen_token: bool, info: &mut LineInfo) {
        let braces_are_blocks = self.language != Language::Python;
        match c {
            '{' if braces_are_blocks => self.brace_depth += 1,
            '}' if braces_are_blocks => {
                self.brace_depth = self.brace_depth.saturating_sub(1);
                if !seen_token {
                    info.leading_closers += 1;
                }
            }
            '(' | '[' | '{' => self.bracket_depth += 1,
            ')' | ']' | '}' => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            _ => {}
        }
    }
}

fn plain_string(quote: char) -> State {
    State::Str {
        quote,
        triple: false,
        raw: false,
        hashes: 0,
    }
}

fn push_blank(info: &mut LineInfo, n: usize) {
    for _ in 0..n {
        info.code.push(' ');
        info.masked.push(' ');
    }
}

fn closes(chars: &[char], i: usize, quote: char, triple: bool, hashes: usize) -> bool {
    if triple {
        return chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote);
    }
    (1..=hashes).all(|k| chars.get(i + k) == Some(&'#'))
}

fn indent_width(chars: &[char]) -> usize {
    let mut width = 0;
    for &c in chars {
        match c {
            ' ' => width += 1,
            '\t' => width += 8 - (width % 8),
            _ => break,
        }
    }
    width
}

/// String prefix letters (`r`, `b`, `f`, `u`) directly before a Python quote.
fn python_prefix(chars: &[char], quote_at: usize) -> String {
    let mut start = quote_at;
    while start > 0 && quote_at - start < 2 && "rRbBuUfF".contains(chars[start - 1]) {
        start -= 1;
    }
    if start > 0 && (chars[start - 1].is_alphanumeric() || chars[start - 1] == '_') {
        return String::new();
    }
    chars[start..quote_at].iter().collect()
}

/// Whether the character before `i` continues an identifier. A lone `b`
/// (as in `br"..."`) is allowed when `allow_byte_prefix` is set.
fn is_word_before(chars: &[char], i: usize, allow_byte_prefix: bool) -> bool {
    if i == 0 {
        return false;
    }
    let prev = chars[i - 1];
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    if allow_byte_prefix && prev == 'b' {
        return i >= 2 && is_word(chars[i - 2]);
    }
    is_word(prev)
}

/// `'x'` and `'\n'` are char literals, `'a` in `&'a str` is a lifetime.
fn is_rust_char_literal(chars: &[char], i: usize) -> bool {
    match chars.get(i + 1) {
        Some('\\') => true,
        Some(_) => chars.get(i + 2) == Some(&'\''),
        None => false,
    }
}
