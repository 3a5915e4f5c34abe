//! Comment and docstring stripping.
//!
//! Extraction regexes run over stripped text so commented-out imports and
//! doc prose never produce edges. Stripping replaces characters with
//! spaces and keeps every newline, so byte offsets still map to the
//! original line numbers.

use lazy_static::lazy_static;
use regex::Regex;

/// Byte-offset to 1-indexed line number lookup.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

/// Replaces every character except newlines with a space.
fn blank(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' { '\n' } else { ' ' })
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Code,
    Str(char),
    LineComment,
    BlockComment,
}

/// Strips `//` line comments and `/* */` block comments (C family:
/// JS/TS, Java, Kotlin, Go, Rust, Swift, Scala, Zig, PHP). String
/// literals are respected; nesting is not.
pub fn strip_c_comments(content: &str) -> String {
    strip_with(content, &["//"], Some(("/*", "*/")))
}

/// Strips `#` line comments (Python, Ruby, Elixir, Perl, shell-style).
pub fn strip_hash_comments(content: &str) -> String {
    strip_with(content, &["#"], None)
}

/// Strips `%` line comments (Erlang).
pub fn strip_percent_comments(content: &str) -> String {
    strip_with(content, &["%"], None)
}

/// Strips `'` line comments (VB.NET). VB has no block comments.
pub fn strip_vb_comments(content: &str) -> String {
    strip_with(content, &["'"], None)
}

/// Strips `(* *)` block comments (OCaml, F#) plus F# `//` lines.
pub fn strip_ml_comments(content: &str) -> String {
    strip_with(content, &["//"], Some(("(*", "*)")))
}

/// Strips PHP's three comment forms.
pub fn strip_php_comments(content: &str) -> String {
    strip_with(content, &["//", "#"], Some(("/*", "*/")))
}

fn strip_with(content: &str, line_markers: &[&str], block: Option<(&str, &str)>) -> String {
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut i = 0;

    // VB comments use the same quote char as its strings; a `'` only
    // opens a string in languages where it is not a line marker.
    let quote_chars: &[char] = if line_markers.contains(&"'") {
        &['"']
    } else {
        &['"', '\'', '`']
    };

    'outer: while i < bytes.len() {
        let c = bytes[i] as char;
        match state {
            State::Code => {
                if let Some((open, _)) = block {
                    if content[i..].starts_with(open) {
                        state = State::BlockComment;
                        out.push_str(&" ".repeat(open.len()));
                        i += open.len();
                        continue 'outer;
                    }
                }
                for marker in line_markers {
                    if content[i..].starts_with(marker) {
                        state = State::LineComment;
                        out.push_str(&" ".repeat(marker.len()));
                        i += marker.len();
                        continue 'outer;
                    }
                }
                if quote_chars.contains(&c) {
                    state = State::Str(c);
                }
                out.push(c);
                i += c.len_utf8();
            }
            State::Str(quote) => {
                if c == '\\' && i + 1 < bytes.len() {
                    out.push(c);
                    let next = content[i + 1..].chars().next().unwrap();
                    out.push(next);
                    i += 1 + next.len_utf8();
                    continue;
                }
                if c == quote || c == '\n' {
                    state = State::Code;
                }
                out.push(c);
                i += c.len_utf8();
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
                i += c.len_utf8();
            }
            State::BlockComment => {
                let close = block.unwrap().1;
                if content[i..].starts_with(close) {
                    state = State::Code;
                    out.push_str(&" ".repeat(close.len()));
                    i += close.len();
                    continue;
                }
                out.push(if c == '\n' { '\n' } else { ' ' });
                i += c.len_utf8();
            }
        }
    }
    out
}

lazy_static! {
    static ref TRIPLE_QUOTED: Regex =
        Regex::new(r#"(?s)(""".*?"""|'''.*?''')"#).expect("static regex");
    static ref ELIXIR_DOC: Regex =
        Regex::new(r#"(?s)@(?:module)?doc\s+(?:~[sS])?""".*?""""#).expect("static regex");
}

/// Blanks all triple-quoted strings (Python docstrings and multi-line
/// literals). Anything that looks like an import inside prose disappears.
pub fn strip_triple_quoted(content: &str) -> String {
    TRIPLE_QUOTED
        .replace_all(content, |caps: &regex::Captures| blank(&caps[0]))
        .into_owned()
}

/// Blanks Elixir `@doc`/`@moduledoc` heredocs, then `#` comments.
pub fn strip_elixir_docs(content: &str) -> String {
    let without_docs = ELIXIR_DOC
        .replace_all(content, |caps: &regex::Captures| blank(&caps[0]))
        .into_owned();
    strip_hash_comments(&without_docs)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn c_comments_preserve_lines_and_strings() {
        let src = "a // import 'x'\nb /* import 'y'\nstill */ c\nlet s = \"// not a comment\";\n";
        let stripped = strip_c_comments(src);
        assert_eq!(stripped.lines().count(), src.lines().count());
        assert!(!stripped.contains("'x'"));
        assert!(!stripped.contains("'y'"));
        assert!(stripped.contains("\"// not a comment\""));
    }

    #[test]
    fn hash_comments_respect_quotes() {
        let src = "x = \"#nope\"\ny = 1 # import os\n";
        let stripped = strip_hash_comments(src);
        assert!(stripped.contains("#nope"));
        assert!(!stripped.contains("import os"));
    }

    #[test]
    fn triple_quoted_blocks_are_blanked() {
        let src = "\"\"\"\nimport fake\n\"\"\"\nimport real\n";
        let stripped = strip_triple_quoted(src);
        assert!(!stripped.contains("import fake"));
        assert!(stripped.contains("import real"));
        assert_eq!(stripped.lines().count(), src.lines().count());
    }

    #[test]
    fn line_index_is_one_based() {
        let idx = LineIndex::new("ab\ncd\nef");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(1), 1);
        assert_eq!(idx.line_of(3), 2);
        assert_eq!(idx.line_of(7), 3);
    }
}
