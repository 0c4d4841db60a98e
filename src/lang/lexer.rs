// This file is part of qjson, a qjson-to-JSON decoder.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// qjson is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// qjson is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with qjson.  If not, see <http://www.gnu.org/licenses/>.

//! The structural lexer: whitespace/comment skipping, delimiter
//! recognition, and the four string forms (double-quoted,
//! single-quoted, multiline, quoteless). Once [`Lexer::next`] yields an
//! error token the lexer is latched and every subsequent call yields
//! the same token, so the structural parser only has to check once per
//! step.

use crate::error::ErrorKind;
use crate::lang::datetime;
use crate::lang::token::{Token, TokenKind};
use crate::pos::Pos;

pub struct Lexer<'a> {
    input: &'a [u8],
    rest: &'a [u8],
    pos: Pos,
    latched: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, rest: input, pos: Pos::BOF, latched: None }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    fn advance(&mut self, n: usize) {
        self.rest = &self.rest[n..];
        self.pos.advance(n);
    }

    /// Returns the byte length of a newline (`\n` or `\r\n`) at the front
    /// of `s`, or 0.
    fn newline_len(s: &[u8]) -> usize {
        match s.first() {
            Some(b'\n') => 1,
            Some(b'\r') if s.get(1) == Some(&b'\n') => 2,
            _ => 0,
        }
    }

    /// Returns the byte length of a run of horizontal whitespace (plain
    /// space/tab, or the U+00A0 NBSP byte sequence) at the front of `s`.
    fn whitespace_len(s: &[u8]) -> usize {
        match s.first() {
            Some(b' ') | Some(b'\t') => 1,
            Some(0xC2) if s.get(1) == Some(&0xA0) => 2,
            _ => 0,
        }
    }

    fn pop_newline(&mut self) -> bool {
        let n = Self::newline_len(self.rest);
        if n == 0 {
            return false;
        }
        self.advance(n);
        self.pos.newline();
        true
    }

    fn skip_whitespace(&mut self) {
        loop {
            let n = Self::whitespace_len(self.rest);
            if n == 0 {
                break;
            }
            self.advance(n);
        }
    }

    fn qchar_len(&self) -> Result<usize, ErrorKind> {
        crate::utf8::char_len(self.rest)
    }

    fn skip_rest_of_line(&mut self) -> Result<(), ErrorKind> {
        loop {
            if self.pop_newline() || self.rest.is_empty() {
                return Ok(());
            }
            let n = self.qchar_len()?;
            self.advance(n);
        }
    }

    /// Returns true if a `#...` or `//...` line comment was skipped.
    fn skip_line_comment(&mut self) -> Result<bool, ErrorKind> {
        if self.rest.is_empty() {
            return Ok(false);
        }
        let is_comment = self.rest[0] == b'#'
            || (self.rest[0] == b'/' && self.rest.get(1) == Some(&b'/'));
        if !is_comment {
            return Ok(false);
        }
        self.skip_rest_of_line()?;
        Ok(true)
    }

    /// Returns true if a `/*...*/` comment was skipped.
    fn skip_multiline_comment(&mut self) -> Result<bool, ErrorKind> {
        if self.rest.len() < 2 || self.rest[0] != b'/' || self.rest[1] != b'*' {
            return Ok(false);
        }
        let start = self.pos;
        self.advance(2);
        loop {
            if self.rest.is_empty() {
                self.pos = start;
                return Err(ErrorKind::UnclosedSlashStarComment);
            }
            if self.rest[0] == b'*' && self.rest.get(1) == Some(&b'/') {
                self.advance(2);
                return Ok(true);
            }
            if self.pop_newline() {
                continue;
            }
            if self.rest[0] < 0x20 {
                self.advance(1);
                continue;
            }
            let n = self.qchar_len()?;
            self.advance(n);
        }
    }

    fn skip_spaces(&mut self) -> Result<(), ErrorKind> {
        loop {
            self.skip_whitespace();
            if self.skip_line_comment()? {
                continue;
            }
            if self.skip_multiline_comment()? {
                continue;
            }
            if !self.pop_newline() {
                break;
            }
        }
        Ok(())
    }

    fn delimiter(&mut self) -> Option<TokenKind<'a>> {
        let kind = match self.rest.first()? {
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'[' => TokenKind::OpenSquare,
            b']' => TokenKind::CloseSquare,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            _ => return None,
        };
        self.advance(1);
        Some(kind)
    }

    fn double_quoted_string(&mut self) -> Result<Option<&'a [u8]>, ErrorKind> {
        if self.rest.first() != Some(&b'"') {
            return Ok(None);
        }
        let start_byte = self.pos.byte;
        let start_pos = self.pos;
        self.advance(1);
        loop {
            if self.rest.is_empty() {
                self.pos = start_pos;
                return Err(ErrorKind::UnclosedDoubleQuoteString);
            }
            if self.rest[0] == b'\\' && self.rest.get(1) == Some(&b'"') {
                self.advance(2);
                continue;
            }
            if self.rest[0] == b'"' {
                self.advance(1);
                return Ok(Some(&self.input[start_byte..self.pos.byte]));
            }
            if Self::newline_len(self.rest) != 0 {
                self.pos = start_pos;
                return Err(ErrorKind::NewlineInDoubleQuoteString);
            }
            let n = self.qchar_len()?;
            self.advance(n);
        }
    }

    fn single_quoted_string(&mut self) -> Result<Option<&'a [u8]>, ErrorKind> {
        if self.rest.first() != Some(&b'\'') {
            return Ok(None);
        }
        let start_byte = self.pos.byte;
        let start_pos = self.pos;
        self.advance(1);
        loop {
            if self.rest.is_empty() {
                self.pos = start_pos;
                return Err(ErrorKind::UnclosedSingleQuoteString);
            }
            if self.rest[0] == b'\\' && self.rest.get(1) == Some(&b'\'') {
                self.advance(2);
                continue;
            }
            if self.rest[0] == b'\'' {
                self.advance(1);
                return Ok(Some(&self.input[start_byte..self.pos.byte]));
            }
            if Self::newline_len(self.rest) != 0 {
                self.pos = start_pos;
                return Err(ErrorKind::NewlineInSingleQuoteString);
            }
            let n = self.qchar_len()?;
            self.advance(n);
        }
    }

    /// Tests whether the `:` at the front of `rest` belongs to an ISO
    /// date-time literal that started up to 13 bytes earlier in the
    /// quoteless string being scanned. Returns the number of extra bytes
    /// to consume (0 if it does not).
    fn iso_date_time_len(&self) -> usize {
        if self.rest.first() != Some(&b':') || self.pos.byte < 13 {
            return 0;
        }
        let probe = &self.input[self.pos.byte - 13..];
        let n = datetime::literal_len(probe);
        if n > 13 {
            (n - 13) as usize
        } else {
            0
        }
    }

    fn matching_margin_len(margin: &[u8], line: &[u8]) -> usize {
        let n = margin.len().min(line.len());
        for i in 0..n {
            if line[i] != margin[i] {
                return i;
            }
        }
        n
    }

    fn newline_specifier_len(s: &[u8]) -> usize {
        if s.first() != Some(&b'\\') {
            return 0;
        }
        if s.get(1) == Some(&b'n') {
            return 2;
        }
        if s.get(1) == Some(&b'r') && s.get(2) == Some(&b'\\') && s.get(3) == Some(&b'n') {
            return 4;
        }
        0
    }

    fn quoteless_string(&mut self) -> Result<Option<&'a [u8]>, ErrorKind> {
        fn is_stop_byte(b: u8) -> bool {
            matches!(b, b',' | b':' | b'{' | b'}' | b'[' | b']' | b'#' | b'\n' | b'\r' | b'/')
        }

        let start_byte = self.pos.byte;
        let mut end_byte = start_byte;
        loop {
            if self.rest.is_empty() {
                break;
            }
            if Self::whitespace_len(self.rest) != 0 {
                self.skip_whitespace();
                continue;
            }
            let b0 = self.rest[0];
            if is_stop_byte(b0) {
                let is_comment_start =
                    b0 == b'/' && self.rest.len() > 1 && matches!(self.rest[1], b'/' | b'*');
                let is_newline = Self::newline_len(self.rest) != 0;
                let is_plain_stop = b0 != b'\r' && b0 != b'/';
                if is_comment_start || is_newline || is_plain_stop {
                    let n = self.iso_date_time_len();
                    if n == 0 {
                        break;
                    }
                    self.advance(n);
                    end_byte = self.pos.byte;
                    continue;
                }
            }
            let n = self.qchar_len()?;
            self.advance(n);
            end_byte = self.pos.byte;
        }
        if start_byte == end_byte {
            return Ok(None);
        }
        Ok(Some(&self.input[start_byte..end_byte]))
    }

    fn multiline_string(&mut self) -> Result<Option<&'a [u8]>, ErrorKind> {
        if self.rest.first() != Some(&b'`') {
            return Ok(None);
        }
        let line_so_far = &self.input[self.pos.line_start..self.pos.byte];
        let margin_end_in_line = {
            let mut n = 0;
            let mut s = line_so_far;
            loop {
                let w = Self::whitespace_len(s);
                if w == 0 {
                    break;
                }
                s = &s[w..];
                n += w;
            }
            n
        };
        if self.pos.line_start + margin_end_in_line != self.pos.byte {
            self.pos = Pos {
                byte: self.pos.line_start + margin_end_in_line,
                line_start: self.pos.line_start,
                line: self.pos.line,
            };
            return Err(ErrorKind::MarginMustBeWhitespaceOnly);
        }
        let margin = line_so_far;
        // The payload includes the first line's margin (its leading
        // indentation), not just the back-tick onward -- `output_multiline_string`
        // locates the opening back-tick within the slice to recover both.
        let start_byte = self.pos.line_start;
        let start_pos = self.pos;

        self.advance(1); // opening `
        self.skip_whitespace();
        if self.rest.is_empty() {
            self.pos = start_pos;
            return Err(ErrorKind::MissingNewlineSpecifier);
        }
        let n = Self::newline_specifier_len(self.rest);
        if n == 0 {
            self.pos = start_pos;
            return Err(ErrorKind::InvalidNewlineSpecifier);
        }
        self.advance(n);
        self.skip_whitespace();
        if !self.pop_newline() {
            if !self.skip_line_comment()? {
                self.pos = start_pos;
                return Err(ErrorKind::InvalidMultilineStart);
            }
        }
        if self.rest.is_empty() {
            self.pos = start_pos;
            return Err(ErrorKind::UnclosedMultiline);
        }
        let n = Self::matching_margin_len(margin, self.rest);
        if n != margin.len() {
            self.pos = Pos { byte: self.pos.byte + n, line_start: self.pos.line_start, line: self.pos.line };
            return Err(ErrorKind::InvalidMarginChar);
        }
        self.advance(n);

        loop {
            if self.rest.is_empty() {
                self.pos = start_pos;
                return Err(ErrorKind::UnclosedMultiline);
            }
            if self.pop_newline() {
                let n = Self::matching_margin_len(margin, self.rest);
                if n != margin.len() {
                    self.pos = Pos {
                        byte: self.pos.byte + n,
                        line_start: self.pos.line_start,
                        line: self.pos.line,
                    };
                    return Err(ErrorKind::InvalidMarginChar);
                }
                if n > 0 {
                    self.advance(n);
                }
                continue;
            }
            if self.rest[0] < 0x20 {
                self.advance(1);
                continue;
            }
            if self.rest[0] == b'`' {
                self.advance(1);
                if self.rest.first() != Some(&b'\\') {
                    return Ok(Some(&self.input[start_byte..self.pos.byte]));
                }
                continue;
            }
            let n = self.qchar_len()?;
            self.advance(n);
        }
    }

    /// Reads the next token. Once an error token is produced, every
    /// subsequent call returns the same token.
    pub fn next(&mut self) -> Token<'a> {
        if let Some(tok) = self.latched {
            if tok.is_error() {
                return tok;
            }
        }

        if let Err(kind) = self.skip_spaces() {
            let tok = Token { pos: self.pos, kind: TokenKind::Error(kind) };
            self.latched = Some(tok);
            return tok;
        }

        let token_pos = self.pos;
        if self.rest.is_empty() {
            let tok = Token { pos: token_pos, kind: TokenKind::Error(ErrorKind::EndOfInput) };
            self.latched = Some(tok);
            return tok;
        }

        if let Some(kind) = self.delimiter() {
            return Token { pos: token_pos, kind };
        }

        macro_rules! try_string {
            ($method:ident, $variant:ident) => {
                match self.$method() {
                    Ok(Some(s)) => return Token { pos: token_pos, kind: TokenKind::$variant(s) },
                    Ok(None) => {}
                    Err(kind) => {
                        let tok = Token { pos: self.pos, kind: TokenKind::Error(kind) };
                        self.latched = Some(tok);
                        return tok;
                    }
                }
            };
        }

        try_string!(double_quoted_string, DoubleQuotedString);
        try_string!(single_quoted_string, SingleQuotedString);
        try_string!(multiline_string, MultilineString);
        try_string!(quoteless_string, QuotelessString);

        unreachable!("a non-empty, non-delimiter input always yields a quoteless string")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<String> {
        let mut lexer = Lexer::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            let tok = lexer.next();
            match tok.kind {
                TokenKind::Error(e) => {
                    out.push(format!("Error({e})"));
                    break;
                }
                TokenKind::OpenBrace => out.push("{".into()),
                TokenKind::CloseBrace => out.push("}".into()),
                TokenKind::OpenSquare => out.push("[".into()),
                TokenKind::CloseSquare => out.push("]".into()),
                TokenKind::Colon => out.push(":".into()),
                TokenKind::Comma => out.push(",".into()),
                TokenKind::DoubleQuotedString(s) => {
                    out.push(format!("dq:{}", std::str::from_utf8(s).unwrap()))
                }
                TokenKind::SingleQuotedString(s) => {
                    out.push(format!("sq:{}", std::str::from_utf8(s).unwrap()))
                }
                TokenKind::MultilineString(s) => {
                    out.push(format!("ml:{}", std::str::from_utf8(s).unwrap()))
                }
                TokenKind::QuotelessString(s) => {
                    out.push(format!("id:{}", std::str::from_utf8(s).unwrap()))
                }
            }
        }
        out
    }

    #[test]
    fn empty_input_is_end_of_input() {
        assert_eq!(kinds(""), vec!["Error(end of input)"]);
    }

    #[test]
    fn delimiters_and_quoteless() {
        assert_eq!(
            kinds("{a: 1}"),
            vec!["{", "id:a", ":", "id:1", "}", "Error(end of input)"]
        );
    }

    #[test]
    fn double_quoted_string_with_escaped_quote() {
        assert_eq!(kinds(r#""a\"b""#), vec![r#"dq:"a\"b""#, "Error(end of input)"]);
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("a // comment\n: 1"), vec!["id:a", ":", "id:1", "Error(end of input)"]);
    }

    #[test]
    fn unclosed_double_quote_errors() {
        assert_eq!(kinds("\"abc"), vec!["Error(unclosed double quote string)"]);
    }

    #[test]
    fn newline_in_single_quote_errors() {
        assert_eq!(kinds("'abc\ndef'"), vec!["Error(newline in single quoted string)"]);
    }

    #[test]
    fn multiline_payload_includes_leading_margin() {
        let doc = "  `\\n\n  one\n  two`";
        let mut lexer = Lexer::new(doc.as_bytes());
        let tok = lexer.next();
        match tok.kind {
            TokenKind::MultilineString(s) => assert_eq!(s, doc.as_bytes()),
            other => panic!("expected MultilineString, got {other:?}"),
        }
    }

    #[test]
    fn multiline_backtick_not_at_margin_errors() {
        assert_eq!(
            kinds("a: `\\n\n b`"),
            vec!["id:a", ":", "Error(multiline margin must contain only whitespaces)"]
        );
    }
}
