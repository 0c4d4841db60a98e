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

//! Black-box tests over `qjson::decode`, covering the concrete scenarios
//! and boundary cases a qjson document must satisfy.

fn decode(s: &str) -> String {
    String::from_utf8(qjson::decode(s.as_bytes())).unwrap()
}

fn is_success(s: &str) -> bool {
    decode(s).starts_with('{')
}

#[test]
fn quoted_string_value() {
    assert_eq!(decode(r#"name: "Alice""#), r#"{"name":"Alice"}"#);
}

#[test]
fn based_integer_literals_format_without_decimal_point() {
    assert_eq!(
        decode("a: 0x10, b: 0b1010, c: 0o17, d: 1_000"),
        r#"{"a":16,"b":10,"c":15,"d":1000}"#
    );
}

#[test]
fn duration_composition() {
    assert_eq!(decode("ttl: 1h30m"), r#"{"ttl":5400}"#);
}

#[test]
fn empty_input_is_empty_object() {
    assert_eq!(decode(""), "{}");
}

#[test]
fn unterminated_single_quote_string() {
    let msg = decode("x: '{'");
    assert!(msg.starts_with("unclosed single quote string at line 1 col 4"), "{msg}");
}

#[test]
fn multiline_literal_strips_margin() {
    // The back-tick must be the first non-whitespace byte on its own
    // line (its margin), so the value starts on the line after `msg:`.
    let doc = "msg:\n  `\\n\n  line one\n  line two`";
    assert_eq!(decode(doc), r#"{"msg":"line one\nline two"}"#);
}

#[test]
fn multiline_with_text_before_backtick_rejects_margin() {
    let msg = decode("msg: `\\n\n  line one`");
    assert!(msg.starts_with("multiline margin must contain only whitespaces"), "{msg}");
}

#[test]
fn array_with_trailing_comma() {
    assert_eq!(decode("arr: [1, 2, 3,]"), r#"{"arr":[1,2,3]}"#);
}

#[test]
fn truly_unclosed_object() {
    let msg = decode("{a:1");
    assert!(msg.starts_with("unclosed object at line 1 col 1"), "{msg}");
}

#[test]
fn integer_overflow_at_2_pow_63() {
    let msg = decode("n: 9223372036854775808");
    assert!(msg.starts_with("number overflow"), "{msg}");
}

#[test]
fn integer_at_i64_max_succeeds() {
    // i64::MAX fits the literal grammar without overflowing, but the
    // final coercion through f64 (spec.md 4.6) loses precision at this
    // magnitude, so only the successful-parse shape is checked here, not
    // an exact digit-for-digit round-trip.
    assert!(is_success("n: 9223372036854775807"));
}

#[test]
fn hour_24_with_nonzero_minute_fails() {
    let msg = decode("t: 1997-07-16T24:30:00Z");
    assert!(msg.starts_with("invalid ISO date time"), "{msg}");
}

#[test]
fn hour_24_with_zero_minute_succeeds() {
    assert!(is_success("t: 1997-07-16T24:00:00Z"));
}

#[test]
fn binary_prefix_with_no_digits_fails() {
    let msg = decode("n: 0b");
    assert!(msg.starts_with("invalid binary number"), "{msg}");
}

#[test]
fn bare_zero_is_integer_not_octal() {
    assert_eq!(decode("n: 0"), r#"{"n":0}"#);
}

#[test]
fn trailing_underscore_in_integer_fails() {
    let msg = decode("n: 1_");
    assert!(msg.starts_with("invalid integer number"), "{msg}");
}

#[test]
fn leading_underscore_is_not_a_number_at_all() {
    // `_1` does not start with a digit, so it is not a numeric expression;
    // it is emitted as an opaque quoteless string instead.
    assert_eq!(decode("n: _1"), r#"{"n":"_1"}"#);
}

#[test]
fn iso_date_time_z_and_zero_offset_are_equal() {
    let a = decode("t: 1997-07-16T19:20:00Z");
    let b = decode("t: 1997-07-16T19:20:00+00:00");
    assert_eq!(a, b);
}

#[test]
fn iso_date_time_offset_converts_to_same_utc_instant() {
    let z = decode("t: 1997-07-16T19:20:00Z");
    let offset = decode("t: 1997-07-16T20:20:00+01:00");
    assert_eq!(z, offset);
}

#[test]
fn literal_synonyms_map_to_canonical_keywords() {
    assert_eq!(decode("a: yes, b: No, c: ON, d: off, e: TRUE, f: False, g: null"),
        r#"{"a":true,"b":false,"c":true,"d":false,"e":true,"f":false,"g":null}"#);
}

#[test]
fn nesting_cap_at_200_is_enforced() {
    let deep: String = "[".repeat(201) + &"]".repeat(201);
    let msg = decode(&format!("a: {deep}"));
    assert!(msg.starts_with("too many object or array encapsulations"), "{msg}");
}

#[test]
fn nesting_at_200_succeeds() {
    let deep: String = "[".repeat(199) + "1" + &"]".repeat(199);
    assert!(is_success(&format!("a: {deep}")));
}

#[test]
fn comments_and_whitespace_are_ignored() {
    let doc = "// leading\na: 1 /* inline */, b: 2 # trailing\n";
    assert_eq!(decode(doc), r#"{"a":1,"b":2}"#);
}

#[test]
fn division_by_zero_is_reported() {
    let msg = decode("n: 1 / 0");
    assert!(msg.starts_with("division by zero"), "{msg}");
}

#[test]
fn bitwise_op_on_decimal_requires_integer() {
    let msg = decode("n: 1.5 & 2");
    assert!(msg.starts_with("operand must be integer"), "{msg}");
}

#[test]
fn quoteless_identifiers_as_keys() {
    assert_eq!(decode("foo: 1, bar: 2"), r#"{"foo":1,"bar":2}"#);
}

#[test]
fn nested_object_and_array() {
    assert_eq!(decode("a: {b: [1, {c: 2}]}"), r#"{"a":{"b":[1,{"c":2}]}}"#);
}

#[test]
fn unclosed_array_is_reported() {
    let msg = decode("a: [1, 2");
    assert!(msg.starts_with("unclosed array"), "{msg}");
}

#[test]
fn version_reports_both_crate_and_syntax() {
    let v = qjson::version();
    assert!(v.contains("qjson:"));
    assert!(v.contains("syntax:"));
}
