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

//! The structural recursive-descent parser: `value`/`values`/`member`/
//! `members`, mutually recursive exactly as in the reference grammar,
//! plus the four string re-emission routines that turn a lexed qjson
//! string token into its JSON text.

use crate::error::ErrorKind;
use crate::lang::lexer::Lexer;
use crate::lang::numeric;
use crate::lang::token::{Token, TokenKind};
use crate::output::Output;
use crate::pos::Pos;

/// Containers may nest at most this deep before parsing gives up. Matches
/// the reference implementation's own fixed limit.
const MAX_DEPTH: u32 = 200;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    tok: Token<'a>,
    depth: u32,
    out: Output,
}

/// Either a finished output buffer or a located error, matching the
/// two-outcome shape `qjson_decode` itself reduces every parse to before
/// formatting.
pub enum Outcome {
    Ok(Vec<u8>),
    Err(ErrorKind, Pos),
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut lexer = Lexer::new(input);
        let tok = lexer.next();
        Self { lexer, tok, depth: 0, out: Output::new() }
    }

    fn advance(&mut self) {
        self.tok = self.lexer.next();
    }

    fn done(&self) -> bool {
        self.tok.is_error()
    }

    fn error_kind(&self) -> ErrorKind {
        match self.tok.kind {
            TokenKind::Error(kind) => kind,
            _ => unreachable!("error_kind() called on a non-error token"),
        }
    }

    fn set_error(&mut self, kind: ErrorKind) {
        self.tok = Token { pos: self.tok.pos, kind: TokenKind::Error(kind) };
    }

    fn set_error_at(&mut self, kind: ErrorKind, pos: Pos) {
        self.tok = Token { pos, kind: TokenKind::Error(kind) };
    }

    /// Parses the top-level document: an implicit member list with no
    /// surrounding braces, followed by end of input. A stray top-level
    /// `}` (no opening brace consumed it) is a syntax error.
    pub fn parse(mut self) -> Outcome {
        self.members();
        if matches!(self.tok.kind, TokenKind::CloseBrace) {
            self.set_error(ErrorKind::SyntaxError);
        }
        debug_assert!(self.done());
        if self.tok.is_end_of_input() {
            Outcome::Ok(self.out.into_bytes())
        } else {
            let pos = self.tok.pos;
            let kind = self.error_kind();
            Outcome::Err(kind, pos)
        }
    }

    /// Processes one value. On success, advances past it and returns
    /// `self.done()`. On failure, sets the error token (the caller always
    /// checks `done()` next, so a `false` return only ever means "go on
    /// reading more values/members").
    fn value(&mut self) -> bool {
        match self.tok.kind {
            TokenKind::CloseSquare => {
                self.set_error(ErrorKind::UnexpectedCloseSquare);
                return false;
            }
            TokenKind::CloseBrace => {
                self.set_error(ErrorKind::UnexpectedCloseBrace);
                return false;
            }
            TokenKind::DoubleQuotedString(s) => {
                if let Err(kind) = output_double_quoted_string(&mut self.out, s) {
                    self.set_error(kind);
                    return true;
                }
            }
            TokenKind::SingleQuotedString(s) => {
                if let Err(kind) = output_single_quoted_string(&mut self.out, s) {
                    self.set_error(kind);
                    return true;
                }
            }
            TokenKind::MultilineString(s) => {
                output_multiline_string(&mut self.out, s);
            }
            TokenKind::QuotelessString(s) => {
                if let Some(lit) = numeric::literal_value(s) {
                    self.out.push_str(lit);
                } else if numeric::looks_numeric(s) {
                    match numeric::eval(s) {
                        Ok(numeric::Value::Decimal(f)) => self.out.push_str(&numeric::format_decimal(f)),
                        Ok(numeric::Value::Integer(i)) => self.out.push_str(&i.to_string()),
                        Err((kind, offset)) => {
                            self.set_error_at(kind, self.tok.pos.advanced(offset));
                            return true;
                        }
                    }
                } else {
                    output_quoteless_string(&mut self.out, s);
                }
            }
            TokenKind::OpenBrace => {
                let start_pos = self.tok.pos;
                self.advance();
                if self.done() {
                    if self.tok.is_end_of_input() {
                        self.set_error_at(ErrorKind::UnclosedObject, start_pos);
                    }
                    return true;
                }
                if self.depth == MAX_DEPTH {
                    self.set_error(ErrorKind::MaxObjectArrayDepth);
                    return true;
                }
                self.depth += 1;
                if self.members() {
                    if self.tok.is_end_of_input() {
                        self.set_error_at(ErrorKind::UnclosedObject, start_pos);
                    }
                    return true;
                }
                self.depth -= 1;
            }
            TokenKind::OpenSquare => {
                let start_pos = self.tok.pos;
                self.advance();
                if self.done() {
                    if self.tok.is_end_of_input() {
                        self.set_error_at(ErrorKind::UnclosedArray, start_pos);
                    }
                    return true;
                }
                if self.depth == MAX_DEPTH {
                    self.set_error(ErrorKind::MaxObjectArrayDepth);
                    return true;
                }
                self.depth += 1;
                if self.values() {
                    if self.tok.is_end_of_input() {
                        self.set_error_at(ErrorKind::UnclosedArray, start_pos);
                    }
                    return true;
                }
                self.depth -= 1;
            }
            TokenKind::Colon | TokenKind::Comma => {
                self.set_error(ErrorKind::SyntaxError);
                return false;
            }
            TokenKind::Error(_) => return false,
        }
        self.advance();
        self.done()
    }

    /// Processes zero or more values and consumes the closing `]`.
    /// Returns `self.done()`.
    fn values(&mut self) -> bool {
        let mut not_first = false;
        self.out.push_byte(b'[');
        while !self.done() && !matches!(self.tok.kind, TokenKind::CloseSquare) {
            if not_first {
                self.out.push_byte(b',');
                if matches!(self.tok.kind, TokenKind::Comma) {
                    self.advance();
                    if self.done() {
                        if self.tok.is_end_of_input() {
                            self.set_error(ErrorKind::ExpectValueAfterComma);
                        }
                        break;
                    }
                    if matches!(self.tok.kind, TokenKind::CloseBrace | TokenKind::CloseSquare) {
                        self.set_error(ErrorKind::ExpectValueAfterComma);
                        break;
                    }
                }
            } else {
                not_first = true;
            }
            if self.value() {
                break;
            }
        }
        self.out.push_byte(b']');
        self.done()
    }

    /// Processes one `identifier: value` member.
    fn member(&mut self) -> bool {
        match self.tok.kind {
            TokenKind::CloseSquare => {
                self.set_error(ErrorKind::UnexpectedCloseSquare);
                return false;
            }
            TokenKind::DoubleQuotedString(s) => {
                if let Err(kind) = output_double_quoted_string(&mut self.out, s) {
                    self.set_error(kind);
                    return true;
                }
            }
            TokenKind::SingleQuotedString(s) => {
                if let Err(kind) = output_single_quoted_string(&mut self.out, s) {
                    self.set_error(kind);
                    return true;
                }
            }
            TokenKind::QuotelessString(s) => {
                output_quoteless_string(&mut self.out, s);
            }
            _ => {
                self.set_error(ErrorKind::ExpectStringIdentifier);
            }
        }
        self.advance();
        if self.done() {
            if self.tok.is_end_of_input() {
                self.set_error(ErrorKind::UnexpectedEndOfInput);
            }
            return true;
        }
        if !matches!(self.tok.kind, TokenKind::Colon) {
            self.set_error(ErrorKind::ExpectColon);
            return true;
        }
        self.out.push_byte(b':');
        self.advance();
        if self.done() {
            if self.tok.is_end_of_input() {
                self.set_error(ErrorKind::UnexpectedEndOfInput);
            }
            return true;
        }
        self.value()
    }

    /// Processes zero or more members and consumes the closing `}`.
    /// Returns `self.done()`.
    fn members(&mut self) -> bool {
        let mut not_first = false;
        self.out.push_byte(b'{');
        while !self.done() && !matches!(self.tok.kind, TokenKind::CloseBrace) {
            if not_first {
                self.out.push_byte(b',');
                if matches!(self.tok.kind, TokenKind::Comma) {
                    self.advance();
                    if self.done() {
                        if self.tok.is_end_of_input() {
                            self.set_error(ErrorKind::ExpectIdentifierAfterComma);
                        }
                        break;
                    }
                    if matches!(self.tok.kind, TokenKind::CloseBrace | TokenKind::CloseSquare) {
                        self.set_error(ErrorKind::ExpectIdentifierAfterComma);
                        break;
                    }
                }
            } else {
                not_first = true;
            }
            if self.member() {
                break;
            }
        }
        self.out.push_byte(b'}');
        self.done()
    }
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b & 0xDF, b'A'..=b'F')
}

/// Re-emits a double-quoted qjson string's text (including the
/// surrounding quotes in `raw`) as a JSON string: `<` followed by `/`
/// gets an inserted backslash (so `</script>` embedded in a string
/// survives being pasted into a `<script>` block), a literal tab becomes
/// `\t`, and escape sequences are validated against the set JSON allows.
fn output_double_quoted_string(out: &mut Output, raw: &[u8]) -> Result<(), ErrorKind> {
    out.push_byte(b'"');
    let mut i = 1;
    while i < raw.len() - 1 {
        match raw[i] {
            b'/' => {
                if raw[i - 1] == b'<' {
                    out.push_byte(b'\\');
                }
            }
            b'\t' => {
                out.push_str("\\t");
                i += 1;
                continue;
            }
            b'\\' => {
                validate_escape(raw, i, b'"')?;
            }
            _ => {}
        }
        out.push_byte(raw[i]);
        i += 1;
    }
    out.push_byte(b'"');
    Ok(())
}

/// Same as [`output_double_quoted_string`] but for single-quoted qjson
/// strings: an escaped `'` is unescaped to a bare `'` (JSON strings never
/// need it escaped), and a literal `"` picks up a backslash instead.
fn output_single_quoted_string(out: &mut Output, raw: &[u8]) -> Result<(), ErrorKind> {
    out.push_byte(b'"');
    let mut i = 1;
    while i < raw.len() - 1 {
        match raw[i] {
            b'/' => {
                if raw[i - 1] == b'<' {
                    out.push_byte(b'\\');
                }
            }
            b'\t' => {
                out.push_str("\\t");
                i += 1;
                continue;
            }
            b'\\' => {
                validate_escape(raw, i, b'\'')?;
                if raw[i + 1] == b'\'' {
                    i += 1;
                    continue;
                }
            }
            b'"' => {
                out.push_byte(b'\\');
            }
            _ => {}
        }
        out.push_byte(raw[i]);
        i += 1;
    }
    out.push_byte(b'"');
    Ok(())
}

/// Checks that the two-byte (or `\u` six-byte) escape starting at
/// `raw[i]` is one JSON (or this crate's superset, the alternate quote)
/// recognizes. `alt_quote` is the extra quote character this string form
/// allows escaping (`"` for single-quoted strings, `'` for double-quoted
/// ones).
fn validate_escape(raw: &[u8], i: usize, alt_quote: u8) -> Result<(), ErrorKind> {
    let c = raw[i + 1];
    let is_simple = matches!(c, b't' | b'n' | b'r' | b'f' | b'b' | b'/' | b'\\' | b'"') || c == alt_quote;
    let is_unicode = c == b'u'
        && raw.len() >= i + 6
        && is_hex_digit(raw[i + 2])
        && is_hex_digit(raw[i + 3])
        && is_hex_digit(raw[i + 4])
        && is_hex_digit(raw[i + 5]);
    if is_simple || is_unicode {
        Ok(())
    } else {
        Err(ErrorKind::InvalidEscapeSequence)
    }
}

/// Re-emits a bare (quoteless) string's text as a JSON string: every byte
/// is literal except a handful that need JSON escaping, plus the same
/// `<` + `/` rule as the quoted forms.
fn output_quoteless_string(out: &mut Output, raw: &[u8]) {
    out.push_byte(b'"');
    for (i, &b) in raw.iter().enumerate() {
        match b {
            b'"' => out.push_byte(b'\\'),
            b'\t' => {
                out.push_str("\\t");
                continue;
            }
            b'/' => {
                if i > 0 && raw[i - 1] == b'<' {
                    out.push_byte(b'\\');
                }
            }
            b'\\' => out.push_byte(b'\\'),
            _ => {}
        }
        out.push_byte(b);
    }
    out.push_byte(b'"');
}

/// Re-emits a backtick multiline string's body as a JSON string: the
/// margin (the whitespace prefix of the line holding the opening
/// backtick) is stripped from every subsequent line, the requested
/// newline specifier becomes that literal escape sequence in the output,
/// and control bytes get their usual JSON escapes.
fn output_multiline_string(out: &mut Output, raw: &[u8]) {
    let backtick_at = raw.iter().position(|&b| b == b'`').expect("multiline string always contains its opening `");
    let margin = &raw[..backtick_at];
    let mut rest = &raw[backtick_at + 1..];
    loop {
        let w = match rest.first() {
            Some(b' ') | Some(b'\t') => 1,
            Some(0xC2) if rest.get(1) == Some(&0xA0) => 2,
            _ => 0,
        };
        if w == 0 {
            break;
        }
        rest = &rest[w..];
    }
    // rest[0] is the backslash of the newline specifier.
    rest = &rest[1..];
    let nl: &str;
    if rest.first() == Some(&b'n') {
        nl = "\\n";
        rest = &rest[1..];
    } else {
        nl = "\\r\\n";
        rest = &rest[3..];
    }
    let nl_pos = rest.iter().position(|&b| b == b'\n').expect("multiline start line always ends in a newline");
    // Drop the first line's trailing newline plus the second line's
    // margin on the left, and only the closing back-tick on the right --
    // every other line's margin is stripped as it's encountered below.
    rest = &rest[nl_pos + 1 + margin.len()..rest.len() - 1];

    out.push_byte(b'"');
    while !rest.is_empty() {
        if rest[0] == b'\n' {
            out.push_str(nl);
            let skip = (1 + margin.len()).min(rest.len());
            rest = &rest[skip..];
            continue;
        }
        if rest[0] == b'\r' && rest.get(1) == Some(&b'\n') {
            out.push_str(nl);
            let skip = (2 + margin.len()).min(rest.len());
            rest = &rest[skip..];
            continue;
        }
        if rest[0] < 0x20 {
            match rest[0] {
                0x08 => out.push_str("\\b"),
                b'\t' => out.push_str("\\t"),
                b'\r' => out.push_str("\\r"),
                0x0C => out.push_str("\\f"),
                b => out.push_str(&format!("\\u{b:04X}")),
            }
            rest = &rest[1..];
            continue;
        }
        if rest[0] == b'<' {
            out.push_byte(b'<');
            if rest.len() > 1 && rest[1] == b'/' {
                out.push_byte(b'\\');
            }
            rest = &rest[1..];
            continue;
        }
        if rest[0] == b'"' {
            out.push_str("\\\"");
            rest = &rest[1..];
            continue;
        }
        if rest[0] == b'`' && rest.len() > 1 && rest[1] == b'\\' {
            out.push_byte(b'`');
            rest = &rest[2..];
            continue;
        }
        if rest[0] == b'\\' {
            out.push_str("\\\\");
            rest = &rest[1..];
            continue;
        }
        out.push_byte(rest[0]);
        rest = &rest[1..];
    }
    out.push_byte(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> String {
        match Parser::new(s.as_bytes()).parse() {
            Outcome::Ok(bytes) => String::from_utf8(bytes).unwrap(),
            Outcome::Err(kind, _) => panic!("unexpected error: {kind}"),
        }
    }

    fn decode_err(s: &str) -> ErrorKind {
        match Parser::new(s.as_bytes()).parse() {
            Outcome::Ok(bytes) => panic!("expected error, got {:?}", String::from_utf8(bytes)),
            Outcome::Err(kind, _) => kind,
        }
    }

    #[test]
    fn empty_object_implicit_braces() {
        assert_eq!(decode(""), "{}");
    }

    #[test]
    fn simple_member() {
        assert_eq!(decode("a: 1"), r#"{"a":1}"#);
    }

    #[test]
    fn nested_array_and_object() {
        assert_eq!(decode("a: [1, 2, {b: 3}]"), r#"{"a":[1,2,{"b":3}]}"#);
    }

    #[test]
    fn trailing_comma_allowed() {
        assert_eq!(decode("a: [1, 2,]"), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn boolean_and_null_synonyms() {
        assert_eq!(decode("a: yes, b: no, c: null"), r#"{"a":true,"b":false,"c":null}"#);
    }

    #[test]
    fn quoted_keys_and_values() {
        assert_eq!(decode(r#""a": "hello""#), r#"{"a":"hello"}"#);
    }

    #[test]
    fn numeric_expression_is_evaluated() {
        assert_eq!(decode("a: 1 + 2 * 3"), r#"{"a":7}"#);
    }

    #[test]
    fn stray_close_brace_is_syntax_error() {
        assert_eq!(decode_err("}"), ErrorKind::SyntaxError);
    }

    #[test]
    fn unclosed_object_errors() {
        assert_eq!(decode_err("a: {b: 1"), ErrorKind::UnclosedObject);
    }

    #[test]
    fn unclosed_array_errors() {
        assert_eq!(decode_err("a: [1, 2"), ErrorKind::UnclosedArray);
    }

    #[test]
    fn unclosed_array_anchors_at_opening_bracket() {
        match Parser::new(b"a: [1, 2").parse() {
            Outcome::Err(ErrorKind::UnclosedArray, pos) => assert_eq!(pos.byte, 3),
            Outcome::Err(kind, _) => panic!("expected UnclosedArray, got {kind}"),
            Outcome::Ok(bytes) => panic!("expected error, got {:?}", String::from_utf8(bytes)),
        }
    }

    #[test]
    fn missing_colon_errors() {
        assert_eq!(decode_err("a 1"), ErrorKind::ExpectColon);
    }

    #[test]
    fn less_than_slash_is_escaped() {
        assert_eq!(decode(r#"a: "</script>""#), r#"{"a":"<\/script>"}"#);
    }
}
