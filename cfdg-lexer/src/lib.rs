//! Line-buffered source reader.
//!
//! Holds the whole source in memory (reading it off disk is the embedding
//! program's job, not this crate's) but exposes the same primitives a
//! streaming line reader would: single-character lookahead, identifier/
//! number/token/string readers, comment elision, and backslash-newline
//! continuation joining. Positions are byte offsets into the original
//! source so callers can hand them straight to a diagnostic renderer.

use std::ops::Range;

/// A `(line, column)` pair, both 1-indexed, for diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone)]
pub struct SourceReader<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> SourceReader<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[must_use]
    pub fn line_col(&self, pos: usize) -> LineCol {
        let before = &self.source[..pos.min(self.source.len())];
        let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
        let column = before.rfind('\n').map_or(before.len(), |i| before.len() - i - 1) + 1;
        LineCol { line, column }
    }

    /// Is the buffer exhausted at the current line (next char is a newline)?
    #[must_use]
    pub fn at_eol(&self) -> bool {
        matches!(self.peek_char(), None | Some('\n'))
    }

    /// Is the whole source exhausted?
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[must_use]
    pub fn peek_char_at(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    pub fn skip_chars(&mut self, n: usize) {
        for _ in 0..n {
            if let Some(c) = self.peek_char() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    pub fn read_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes whitespace, `/* ... */` and `//`/`#` line comments, and
    /// backslash-newline continuations (joined with a single implicit
    /// space, per spec). Transparent to callers: after this returns, the
    /// reader sits on the next significant character or end-of-source.
    pub fn skip_space(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                }
                Some('\\') if self.peek_char_at(1) == Some('\n') => {
                    self.skip_chars(2);
                }
                Some('/') if self.peek_char_at(1) == Some('*') => {
                    self.skip_chars(2);
                    while !self.at_eof()
                        && !(self.peek_char() == Some('*') && self.peek_char_at(1) == Some('/'))
                    {
                        self.skip_chars(1);
                    }
                    self.skip_chars(2);
                }
                Some('/') if self.peek_char_at(1) == Some('/') => {
                    self.skip_to_eol();
                }
                Some('#') => {
                    self.skip_to_eol();
                }
                _ => break,
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while !matches!(self.peek_char(), None | Some('\n')) {
            self.skip_chars(1);
        }
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.skip_chars(1);
        }
    }

    /// `[A-Za-z_|][A-Za-z0-9_]*`
    pub fn read_identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '|' => {
                self.skip_chars(1);
            }
            _ => return None,
        }
        while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.skip_chars(1);
        }
        Some(&self.source[start..self.pos])
    }

    /// A signed decimal literal: `-?[0-9]+(\.[0-9]+)?`.
    pub fn read_signed_real(&mut self) -> Option<f64> {
        let start = self.pos;
        if self.peek_char() == Some('-') || self.peek_char() == Some('+') {
            self.skip_chars(1);
        }
        let digits_start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.skip_chars(1);
        }
        if self.peek_char() == Some('.') {
            self.skip_chars(1);
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.skip_chars(1);
            }
        }
        if self.pos == digits_start {
            self.pos = start;
            return None;
        }
        self.source[start..self.pos].parse().ok()
    }

    /// An unquoted run of non-whitespace characters.
    pub fn read_token(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if !c.is_whitespace()) {
            self.skip_chars(1);
        }
        if self.pos == start {
            None
        } else {
            Some(&self.source[start..self.pos])
        }
    }

    /// A `"..."` string with no escape processing (the grammar has no
    /// use for escapes: quoted strings only ever hold include paths).
    pub fn read_quoted_string(&mut self) -> Option<&'a str> {
        if self.peek_char() != Some('"') {
            return None;
        }
        self.skip_chars(1);
        let start = self.pos;
        while !matches!(self.peek_char(), None | Some('"')) {
            self.skip_chars(1);
        }
        let text = &self.source[start..self.pos];
        if self.peek_char() == Some('"') {
            self.skip_chars(1);
        }
        Some(text)
    }

    /// `before`/`at` substrings around the current position, for
    /// diagnostic printing without a full diagnostic renderer.
    #[must_use]
    pub fn context(&self, radius: usize) -> (&'a str, &'a str) {
        let before_start = self.source[..self.pos]
            .char_indices()
            .rev()
            .nth(radius)
            .map_or(0, |(i, _)| i);
        let at_end = self.source[self.pos..]
            .char_indices()
            .nth(radius)
            .map_or(self.source.len(), |(i, _)| self.pos + i);
        (&self.source[before_start..self.pos], &self.source[self.pos..at_end])
    }

    #[must_use]
    pub fn span_text(&self, span: Range<usize>) -> &'a str {
        &self.source[span]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_identifier_with_line_alias_prefix() {
        let mut r = SourceReader::new("|hue 30");
        assert_eq!(r.read_identifier(), Some("|hue"));
    }

    #[test]
    fn skips_block_and_line_comments() {
        let mut r = SourceReader::new("/* hi */  // trailing\n# also\nrule");
        r.skip_space();
        assert_eq!(r.read_identifier(), Some("rule"));
    }

    #[test]
    fn continuation_joins_lines() {
        let mut r = SourceReader::new("a \\\nb");
        assert_eq!(r.read_identifier(), Some("a"));
        r.skip_space();
        assert_eq!(r.read_identifier(), Some("b"));
    }

    #[test]
    fn reads_signed_real() {
        let mut r = SourceReader::new("-0.375 rest");
        assert_eq!(r.read_signed_real(), Some(-0.375));
    }

    #[test]
    fn reads_quoted_string() {
        let mut r = SourceReader::new("\"foo/bar.cfdg\" tail");
        assert_eq!(r.read_quoted_string(), Some("foo/bar.cfdg"));
    }

    #[test]
    fn line_col_tracks_newlines() {
        let r = SourceReader::new("abc\ndef\nghi");
        let pos = "abc\ndef\n".len();
        assert_eq!(r.line_col(pos), LineCol { line: 3, column: 1 });
    }
}
