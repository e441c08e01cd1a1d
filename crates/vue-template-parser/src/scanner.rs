//! Character scanner shared by the block locator and the tree builder.

use source_text::Span;

/// A cursor over the source of one file.
pub(crate) struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Create a scanner positioned at `pos`.
    pub fn at(source: &'a str, pos: usize) -> Self {
        Self { source, pos }
    }

    /// Get the current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move back (or forward) to `pos`.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Get the remaining source.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Whether the whole source has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek at the next character.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peek at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.remaining().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and return the number of bytes skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        self.consume_while(char::is_whitespace);
        self.pos - start
    }

    /// Check if the remaining source starts with the given string.
    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Like [`Scanner::starts_with`], ignoring ASCII case.
    pub fn starts_with_ignore_case(&self, s: &str) -> bool {
        self.remaining()
            .get(..s.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(s))
    }

    /// Consume a string if the remaining source starts with it.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate is true.
    pub fn consume_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.next_char();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// Consume until the given string is found or the input ends.
    pub fn consume_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        match self.remaining().find(s) {
            Some(index) => self.pos += index,
            None => self.pos = self.source.len(),
        }
        &self.source[start..self.pos]
    }

    /// Whether a tag name starts here (`<` already consumed).
    pub fn at_tag_name_start(&self) -> bool {
        self.peek_char().is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Read a tag name.
    pub fn read_tag_name(&mut self) -> &'a str {
        self.consume_while(|c| !c.is_whitespace() && c != '/' && c != '>')
    }

    /// Read an attribute name.
    ///
    /// Dynamic arguments (`:[key]`) may contain characters that otherwise
    /// end a name, so brackets are matched.
    pub fn read_attr_name(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek_char() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                _ if depth > 0 => {}
                c if c.is_whitespace() || c == '=' || c == '>' || c == '"' || c == '\'' => break,
                '/' if self.peek_second() == Some('>') || self.pos > start => break,
                _ => {}
            }
            self.next_char();
        }
        &self.source[start..self.pos]
    }

    /// Read a quoted value. Returns the content and whether the closing
    /// quote was found.
    pub fn read_quoted(&mut self) -> Option<(&'a str, bool)> {
        let quote = self.peek_char()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        self.next_char();
        let start = self.pos;
        match self.remaining().find(quote) {
            Some(index) => {
                self.pos += index;
                let value = &self.source[start..self.pos];
                self.next_char();
                Some((value, true))
            }
            None => {
                self.pos = self.source.len();
                Some((&self.source[start..], false))
            }
        }
    }

    /// Read an unquoted attribute value.
    pub fn read_unquoted_value(&mut self) -> &'a str {
        self.consume_while(|c| !c.is_whitespace() && c != '>')
    }

    /// Read a comment. Returns its content.
    pub fn read_comment(&mut self) -> Option<&'a str> {
        if !self.consume("<!--") {
            return None;
        }
        let content = self.consume_until("-->");
        self.consume("-->");
        Some(content)
    }

    /// Read raw content until `</closing_tag`, matched case-insensitively.
    /// The end tag itself is not consumed.
    pub fn read_raw_text(&mut self, closing_tag: &str) -> &'a str {
        let start = self.pos;
        let pattern = format!("</{}", closing_tag);
        while !self.is_eof() {
            if self.starts_with_ignore_case(&pattern) {
                let after = self.remaining()[pattern.len()..].chars().next();
                if after.map_or(true, |c| c.is_whitespace() || c == '>' || c == '/') {
                    break;
                }
            }
            self.next_char();
        }
        &self.source[start..self.pos]
    }

    /// Span from `start` to the current position.
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }
}
