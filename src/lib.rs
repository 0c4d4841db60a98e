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

//! qjson decodes qjson, a human-friendly JSON superset, into strict
//! JSON bytes.
//!
//! qjson extends JSON with quoteless identifiers and strings, single- and
//! triple-backtick-quoted strings, line and block comments, trailing
//! commas, arithmetic/bitwise/duration numeric expressions, ISO 8601
//! date-time literals, and boolean/null word synonyms. [`decode`] is the
//! only entry point most callers need; it never panics and always
//! returns either a JSON object or a one-line error message, matching
//! the reference decoder's own "never return NULL or empty" contract.

pub mod error;
pub mod lang;
pub mod output;
pub mod pos;
pub mod utf8;

use error::Diagnostic;
use lang::parser::{Outcome, Parser};
use pos::Location;

/// The decoder's version and the qjson syntax version it implements, in
/// the form `"qjson: vA.B.C syntax: vX.Y.Z"`.
pub fn version() -> &'static str {
    concat!("qjson: v", env!("CARGO_PKG_VERSION"), " syntax: v", "0.0.0")
}

/// Decodes `input` (qjson text) into JSON bytes.
///
/// On success the result is always a JSON object (`{...}`), since a qjson
/// document is an implicit member list with no surrounding braces. On
/// failure the result is a single line of the form `"<message> at line L
/// col C"` -- never empty, never `{...}`-shaped, so callers can tell the
/// two cases apart just by looking at the first byte.
pub fn decode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return b"{}".to_vec();
    }
    match Parser::new(input).parse() {
        Outcome::Ok(bytes) => bytes,
        Outcome::Err(kind, pos) => {
            let diag = Diagnostic { kind, location: Location::of(input, pos) };
            diag.to_string().into_bytes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str(s: &str) -> String {
        String::from_utf8(decode(s.as_bytes())).unwrap()
    }

    #[test]
    fn empty_input_decodes_to_empty_object() {
        assert_eq!(decode_str(""), "{}");
    }

    #[test]
    fn version_has_expected_shape() {
        let v = version();
        assert!(v.starts_with("qjson: v"), "{v}");
        assert!(v.contains("syntax: v"), "{v}");
    }

    #[test]
    fn minimal_document() {
        assert_eq!(decode_str("name: 'qjson', count: 3"), r#"{"name":"qjson","count":3}"#);
    }

    #[test]
    fn error_message_has_location_suffix() {
        let msg = decode_str("a: {b: 1");
        assert!(msg.ends_with("at line 1 col 4"), "{msg}");
        assert!(msg.starts_with("unclosed object"), "{msg}");
    }

    #[test]
    fn duration_literal() {
        assert_eq!(decode_str("ttl: 1h30m"), r#"{"ttl":5400}"#);
    }

    #[test]
    fn comments_and_trailing_commas_are_ignored() {
        let doc = "// leading comment\na: 1, /* inline */ b: 2,\n";
        assert_eq!(decode_str(doc), r#"{"a":1,"b":2}"#);
    }
}
