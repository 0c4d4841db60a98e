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

//! Numeric/duration expression evaluation. A quoteless string that looks
//! like a number (its first significant byte is a digit, a leading `.`
//! followed by a digit, or one of `+ - ( <space> <tab>`) is fed to this
//! sub-lexer and a Pratt (precedence-climbing) evaluator instead of
//! being emitted as a JSON string.
//!
//! This generalizes the same `nud`/`led`-table dispatch the host crate's
//! own expression parser uses: a prefix ("null denotation") handler per
//! token kind, an infix ("left denotation") handler per operator, and an
//! `expression(rbp)` loop that keeps consuming infix operators whose
//! precedence exceeds the caller's right-binding power.

use crate::error::ErrorKind;
use crate::lang::datetime;
use crate::lang::token::{NumToken, NumTokenKind, HIGHEST_PRECEDENCE};

/// The result of evaluating a numeric expression: either type spec.md
/// allows, already resolved to its final Rust type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
}

/// Evaluates a complete numeric/duration expression. `offset` in the
/// returned error is relative to the start of `input`.
pub fn eval(input: &[u8]) -> Result<Value, (ErrorKind, usize)> {
    let mut lexer = NumLexer::new(input);
    let result = expression(&mut lexer, 0);
    match result.kind {
        NumTokenKind::Error(kind) => Err((kind, result.offset)),
        NumTokenKind::Integer(i) => Ok(Value::Decimal(i as f64)),
        NumTokenKind::Decimal(f) => Ok(Value::Decimal(f)),
        _ => unreachable!("expression() only ever returns a value or an error token"),
    }
}

/// True when `p` (the text of a quoteless string) looks enough like a
/// numeric expression to be handed to [`eval`] rather than emitted as a
/// plain JSON string. Scans past leading sign/paren/space characters to
/// find the first byte that actually discriminates.
pub fn looks_numeric(p: &[u8]) -> bool {
    for (i, &b) in p.iter().enumerate() {
        if matches!(b, b'+' | b'-' | b' ' | b'\t' | b'(') {
            continue;
        }
        return b.is_ascii_digit() || (b == b'.' && i + 1 < p.len() && p[i + 1].is_ascii_digit());
    }
    false
}

/// Recognizes the boolean/null synonyms (`null`, `true`/`false`,
/// `yes`/`no`, `on`/`off`, case-insensitively) and returns the JSON
/// literal text to emit, if `p` is one of them.
pub fn literal_value(p: &[u8]) -> Option<&'static str> {
    fn eq_ci(a: &[u8], b: &str) -> bool {
        a.len() == b.len() && a.iter().zip(b.bytes()).all(|(&x, y)| x.to_ascii_lowercase() == y)
    }
    match p.len() {
        5 if eq_ci(p, "false") => Some("false"),
        4 if eq_ci(p, "null") => Some("null"),
        4 if eq_ci(p, "true") => Some("true"),
        3 if eq_ci(p, "yes") => Some("true"),
        3 if eq_ci(p, "off") => Some("false"),
        2 if eq_ci(p, "on") => Some("true"),
        2 if eq_ci(p, "no") => Some("false"),
        _ => None,
    }
}

/// Formats a decimal result the way `%.16g` would: shortest
/// representation that round-trips, no trailing `.0` on whole numbers.
/// Rust's `Display` for `f64` already has exactly this shape (no NaN/inf
/// can reach here: the evaluator never produces them from i64/date-time
/// inputs, and division by zero is a hard error rather than infinity).
pub fn format_decimal(v: f64) -> String {
    format!("{}", v)
}

// ---------------------------------------------------------------------------

struct NumLexer<'a> {
    input: &'a [u8],
    rest: &'a [u8],
    offset: usize,
    tok: NumToken,
}

impl<'a> NumLexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        let mut lexer = Self { input, rest: input, offset: 0, tok: NumToken { offset: 0, kind: NumTokenKind::Plus } };
        lexer.advance_token();
        lexer
    }

    fn done(&self) -> bool {
        self.tok.kind.is_error()
    }

    fn pop(&mut self, n: usize) {
        self.rest = &self.rest[n..];
        self.offset += n;
    }

    fn advance_token(&mut self) {
        if self.done() {
            return;
        }
        while let Some(&b) = self.rest.first() {
            if b == b' ' || b == b'\t' {
                self.pop(1);
            } else {
                break;
            }
        }
        if self.rest.is_empty() {
            self.tok = NumToken { offset: self.offset, kind: NumTokenKind::Error(ErrorKind::EndOfInput) };
            return;
        }
        let start = self.offset;
        if let Some(kind) = next_operator(self.rest) {
            self.pop(1);
            self.tok = NumToken { offset: start, kind };
            return;
        }
        if let Some(result) = try_iso_date_time(self.rest) {
            self.tok = match result {
                Ok((value, n)) => {
                    self.pop(n);
                    NumToken { offset: start, kind: NumTokenKind::Decimal(value) }
                }
                Err(()) => NumToken { offset: start, kind: NumTokenKind::Error(ErrorKind::InvalidIsoDateTime) },
            };
            return;
        }
        for parser in [try_bin, try_hex, try_dec, try_oct, try_int] {
            if let Some(result) = parser(self.rest) {
                self.tok = match result {
                    Ok((kind, n)) => {
                        self.pop(n);
                        NumToken { offset: start, kind }
                    }
                    Err(kind) => NumToken { offset: start, kind: NumTokenKind::Error(kind) },
                };
                return;
            }
        }
        self.tok = NumToken { offset: start, kind: NumTokenKind::Error(ErrorKind::InvalidNumericExpression) };
    }
}

fn next_operator(rest: &[u8]) -> Option<NumTokenKind> {
    use NumTokenKind::*;
    Some(match rest[0] {
        b'%' => Modulo,
        b'&' => And,
        b'(' => OpenParen,
        b')' => CloseParen,
        b'*' => Mul,
        b'+' => Plus,
        b'-' => Minus,
        b'/' => Div,
        b'^' => Xor,
        b'd' | b'D' => Days,
        b'h' | b'H' => Hours,
        b'm' | b'M' => Minutes,
        b's' | b'S' => Seconds,
        b'w' | b'W' => Weeks,
        b'|' => Or,
        b'~' => Inverse,
        _ => return None,
    })
}

fn in_range(v: u8, lo: u8, hi: u8) -> bool {
    v.wrapping_sub(lo) <= hi.wrapping_sub(lo)
}

fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}
fn is_oct_digit(b: u8) -> bool {
    in_range(b, b'0', b'7')
}
fn is_int_digit(b: u8) -> bool {
    in_range(b, b'0', b'9')
}
fn is_hex_digit(b: u8) -> bool {
    is_int_digit(b) || in_range(b & 0xDF, b'A', b'F')
}

/// Scans a run of digits (as classified by `is_digit`), allowing a
/// single `_` strictly between two digits. Returns `Some(n)` for a valid
/// run of length `n`, `Some(usize::MAX)` for an invalid separator
/// placement, or `None` if `v` does not start with a digit at all.
fn scan_digits(v: &[u8], is_digit: fn(u8) -> bool) -> Option<usize> {
    if v.is_empty() || !is_digit(v[0]) {
        return None;
    }
    let mut p = 1;
    while p < v.len() {
        if v[p] == b'_' {
            p += 1;
            if p == v.len() {
                return Some(usize::MAX);
            }
        }
        if !is_digit(v[p]) {
            if v[p - 1] == b'_' {
                return Some(usize::MAX);
            }
            return Some(p);
        }
        p += 1;
    }
    Some(v.len())
}

/// Skips a fixed-length header (e.g. `0b`) and an optional following
/// `_`. Returns the total bytes skipped and the remainder, or `None` if
/// input runs out.
fn skip_header<'a>(n: usize, v: &'a [u8]) -> Option<(usize, &'a [u8])> {
    if n >= v.len() {
        return None;
    }
    let mut v = &v[n..];
    let mut n = n;
    if v[0] == b'_' {
        n += 1;
        v = &v[1..];
        if v.is_empty() {
            return None;
        }
    }
    Some((n, v))
}

fn try_bin(v: &[u8]) -> Option<Result<(NumTokenKind, usize), ErrorKind>> {
    if v.len() < 2 || v[0] != b'0' || (v[1] & 0xDF) != b'B' {
        return None;
    }
    Some(parse_based(v, 2, is_bin_digit, ErrorKind::InvalidBinaryNumber, |digits| {
        let mut val: u64 = 0;
        for &b in digits {
            if b == b'_' {
                continue;
            }
            if val & 0x8000_0000_0000_0000 != 0 {
                return None;
            }
            val <<= 1;
            if b == b'1' {
                val |= 1;
            }
        }
        if val & 0x8000_0000_0000_0000 != 0 {
            None
        } else {
            Some(val as i64)
        }
    }))
}

fn try_hex(v: &[u8]) -> Option<Result<(NumTokenKind, usize), ErrorKind>> {
    if v.len() < 2 || v[0] != b'0' || (v[1] & 0xDF) != b'X' {
        return None;
    }
    Some(parse_based(v, 2, is_hex_digit, ErrorKind::InvalidHexadecimalNumber, |digits| {
        let mut val: u64 = 0;
        for &b in digits {
            if b == b'_' {
                continue;
            }
            if val & 0xF000_0000_0000_0000 != 0 {
                return None;
            }
            let d = if is_int_digit(b) { b - b'0' } else { (b & 0xDF) - b'A' + 10 };
            val = (val << 4) | d as u64;
        }
        if val & 0x8000_0000_0000_0000 != 0 {
            None
        } else {
            Some(val as i64)
        }
    }))
}

/// Shared skeleton for `0b`/`0x`-style literals: validates the header,
/// scans digits, and decodes. `header_len` is the number of header bytes
/// (e.g. 2 for `0b`/`0x`).
fn parse_based(
    v: &[u8],
    header_len: usize,
    is_digit: fn(u8) -> bool,
    invalid: ErrorKind,
    decode: fn(&[u8]) -> Option<i64>,
) -> Result<(NumTokenKind, usize), ErrorKind> {
    match skip_header(header_len, v) {
        None => Err(invalid),
        Some((n, rest)) => match scan_digits(rest, is_digit) {
            Some(p) if p > 0 && p != usize::MAX => {
                let total = n + p;
                match decode(&v[header_len.min(total)..total]) {
                    Some(val) => Ok((NumTokenKind::Integer(val), total)),
                    None => Err(ErrorKind::NumberOverflow),
                }
            }
            _ => Err(invalid),
        },
    }
}

fn try_oct(v: &[u8]) -> Option<Result<(NumTokenKind, usize), ErrorKind>> {
    if v.is_empty() || v[0] != b'0' {
        return None;
    }
    if v.len() >= 2 && (v[1] & 0xDF) == b'O' {
        return Some(parse_based(v, 2, is_oct_digit, ErrorKind::InvalidOctalNumber, decode_oct_explicit));
    }
    // bare legacy form: a leading 0 followed directly by an octal digit.
    if v.len() < 2 || (v[1] != b'_' && !is_oct_digit(v[1])) {
        return None;
    }
    Some(parse_based(v, 1, is_oct_digit, ErrorKind::InvalidOctalNumber, decode_oct_legacy))
}

fn decode_oct_explicit(digits: &[u8]) -> Option<i64> {
    decode_oct(digits)
}
fn decode_oct_legacy(digits: &[u8]) -> Option<i64> {
    decode_oct(digits)
}
fn decode_oct(digits: &[u8]) -> Option<i64> {
    let mut val: u64 = 0;
    for &b in digits {
        if b == b'_' {
            continue;
        }
        if val & 0xF000_0000_0000_0000 != 0 {
            return None;
        }
        val = (val << 3) | (b - b'0') as u64;
    }
    Some(val as i64)
}

fn try_int(v: &[u8]) -> Option<Result<(NumTokenKind, usize), ErrorKind>> {
    if v.is_empty() {
        return None;
    }
    if in_range(v[0], b'1', b'9') {
        return match scan_digits(v, is_int_digit) {
            Some(p) if p != usize::MAX => Some(decode_int(&v[..p]).map(|val| (NumTokenKind::Integer(val), p)).ok_or(ErrorKind::NumberOverflow).into()),
            Some(_) => Some(Err(ErrorKind::InvalidIntegerNumber)),
            None => None,
        };
    }
    if v[0] != b'0' {
        return None;
    }
    if v.len() > 1 && (v[1] == b'_' || is_int_digit(v[1])) {
        return Some(Err(ErrorKind::InvalidIntegerNumber));
    }
    Some(Ok((NumTokenKind::Integer(0), 1)))
}

fn decode_int(digits: &[u8]) -> Option<i64> {
    let mut val: u64 = 0;
    for &b in digits {
        if b == b'_' {
            continue;
        }
        if val > 0x1999_9999_9999_9999 {
            return None;
        }
        val = val * 10 + (b - b'0') as u64;
    }
    if val & 0x8000_0000_0000_0000 != 0 {
        None
    } else {
        Some(val as i64)
    }
}

fn parse_exponent(v: &[u8]) -> Option<usize> {
    if v.is_empty() || (v[0] & 0xDF) != b'E' {
        return None;
    }
    let mut n = 1;
    let mut v = &v[1..];
    if v.is_empty() {
        return Some(usize::MAX);
    }
    if v[0] == b'+' || v[0] == b'-' {
        n += 1;
        v = &v[1..];
        if v.is_empty() {
            return Some(usize::MAX);
        }
    }
    match scan_digits(v, is_int_digit) {
        Some(p) if p > 0 && p != usize::MAX => Some(n + p),
        _ => Some(usize::MAX),
    }
}

/// Returns `Some(0)` for "not a decimal literal" (fall through to the
/// integer parser instead), `Some(usize::MAX)` for malformed, or
/// `Some(n)` for a valid length. `None` is never returned; the `Option`
/// wrapper exists only to mirror the other `try_*` parsers' shape.
fn try_dec(v: &[u8]) -> Option<Result<(NumTokenKind, usize), ErrorKind>> {
    let len = scan_dec_len(v);
    match len {
        0 => None,
        usize::MAX => Some(Err(ErrorKind::InvalidDecimalNumber)),
        n => {
            let text = &v[..n];
            match std::str::from_utf8(text).ok().and_then(|s| s.parse::<f64>().ok()) {
                Some(val) if val.is_finite() => Some(Ok((NumTokenKind::Decimal(val), n))),
                _ => Some(Err(ErrorKind::InvalidDecimalNumber)),
            }
        }
    }
}

fn scan_dec_len(v: &[u8]) -> usize {
    let p = match scan_digits(v, is_int_digit) {
        Some(usize::MAX) => return 0,
        Some(p) => p,
        None => 0,
    };
    if p == 0 {
        // numbers must be of the form .123[e[+/-]145]
        if v.is_empty() || v[0] != b'.' || v.len() < 2 {
            return 0;
        }
        let rest = &v[1..];
        return match scan_digits(rest, is_int_digit) {
            Some(usize::MAX) => usize::MAX,
            Some(p) if p > 0 => {
                let q = parse_exponent(&rest[p..]).unwrap_or(0);
                if q == usize::MAX {
                    usize::MAX
                } else {
                    1 + p + q
                }
            }
            _ => {
                if !rest.is_empty() && (rest[0] == b'_' || (rest[0] & 0xDF) == b'E') {
                    usize::MAX
                } else {
                    0
                }
            }
        };
    }
    // numbers must be of the form 123e[+/-]145 or 123.456[e[+/-]789]
    let rest = &v[p..];
    let q = parse_exponent(rest);
    match q {
        Some(usize::MAX) => return usize::MAX,
        Some(q) if q > 0 => return p + q,
        _ => {}
    }
    if rest.is_empty() || rest[0] != b'.' {
        return 0; // not invalid, but not a decimal number either: caller tries int next
    }
    let mut n = p + 1;
    let frac = &rest[1..];
    let q = match scan_digits(frac, is_int_digit) {
        Some(usize::MAX) => return usize::MAX,
        Some(q) => q,
        None => 0,
    };
    n += q;
    let after_frac = &frac[q..];
    let e = match parse_exponent(after_frac) {
        Some(usize::MAX) => return usize::MAX,
        Some(e) => e,
        None => 0,
    };
    n += e;
    if after_frac.len() > e && after_frac[e] == b'_' {
        return usize::MAX;
    }
    n
}

fn try_iso_date_time(v: &[u8]) -> Option<Result<(f64, usize), ()>> {
    let n = datetime::literal_len(v);
    if n == 0 {
        return None;
    }
    if n < 0 {
        return Some(Err(()));
    }
    let n = n as usize;
    match datetime::decode(&v[..n]) {
        Some(val) => Some(Ok((val, n))),
        None => Some(Err(())),
    }
}

// ---------------------------------------------------------------------------
// Pratt evaluator
// ---------------------------------------------------------------------------

fn expression(lexer: &mut NumLexer, rbp: u8) -> NumToken {
    if lexer.done() {
        return lexer.tok;
    }
    let t = lexer.tok;
    lexer.advance_token();
    let mut left = nud(lexer, t);
    while !matches!(left.kind, NumTokenKind::Error(_)) && rbp < lexer.tok.kind.precedence() {
        let t = lexer.tok;
        lexer.advance_token();
        left = led(lexer, t, left);
    }
    left
}

fn err(t: NumToken, kind: ErrorKind) -> NumToken {
    NumToken { offset: t.offset, kind: NumTokenKind::Error(kind) }
}

/// Rewrites "ran out of input" into "invalid expression" for the
/// contexts where running out of input mid-operand is itself the error
/// (as opposed to the duration operators, where a missing right operand
/// is valid and handled separately in `led_duration`).
fn operand(t: NumToken) -> NumToken {
    if matches!(t.kind, NumTokenKind::Error(ErrorKind::EndOfInput)) {
        err(t, ErrorKind::InvalidNumericExpression)
    } else {
        t
    }
}

fn nud(lexer: &mut NumLexer, t: NumToken) -> NumToken {
    use NumTokenKind::*;
    match t.kind {
        Integer(_) | Decimal(_) => t,
        Plus => operand(expression(lexer, HIGHEST_PRECEDENCE + 1)),
        Minus => {
            let right = operand(expression(lexer, HIGHEST_PRECEDENCE + 1));
            match right.kind {
                Integer(i) => NumToken { offset: right.offset, kind: Integer(-i) },
                Decimal(f) => NumToken { offset: right.offset, kind: Decimal(-f) },
                _ => right,
            }
        }
        Inverse => {
            let right = operand(expression(lexer, HIGHEST_PRECEDENCE + 1));
            match right.kind {
                Integer(i) => NumToken { offset: right.offset, kind: Integer(!i) },
                Decimal(_) => err(t, ErrorKind::OperandMustBeInteger),
                _ => right,
            }
        }
        OpenParen => {
            let right = operand(expression(lexer, 0));
            if matches!(right.kind, Error(_)) {
                return right;
            }
            if !matches!(lexer.tok.kind, CloseParen) {
                return err(t, ErrorKind::UnclosedParenthesis);
            }
            lexer.advance_token();
            right
        }
        CloseParen => err(t, ErrorKind::UnopenedParenthesis),
        _ => err(t, ErrorKind::InvalidNumericExpression),
    }
}

fn as_f64(t: NumToken) -> f64 {
    match t.kind {
        NumTokenKind::Integer(i) => i as f64,
        NumTokenKind::Decimal(f) => f,
        _ => unreachable!("as_f64 called on a non-numeric token"),
    }
}

/// Promotes `left`/`right` to a common type (decimal if either is),
/// mirroring the reference implementation's `normalizeTypes`.
fn normalize(left: NumToken, right: NumToken) -> (NumToken, NumToken) {
    use NumTokenKind::*;
    match (left.kind, right.kind) {
        (Integer(i), Decimal(_)) => (NumToken { kind: Decimal(i as f64), ..left }, right),
        (Decimal(_), Integer(i)) => (left, NumToken { kind: Decimal(i as f64), ..right }),
        _ => (left, right),
    }
}

fn led(lexer: &mut NumLexer, t: NumToken, left: NumToken) -> NumToken {
    use NumTokenKind::*;
    match t.kind {
        Plus => binary_arith(lexer, t, left, Plus.precedence(), |a, b| a + b, |a, b| a + b),
        Minus => binary_arith(lexer, t, left, Minus.precedence(), |a, b| a - b, |a, b| a - b),
        Mul => binary_arith(lexer, t, left, Mul.precedence(), |a, b| a * b, |a, b| a * b),
        Div => binary_div(lexer, t, left),
        Modulo => binary_int_only(lexer, t, left, Modulo.precedence(), |a, b| {
            if b == 0 {
                None
            } else {
                Some(a % b)
            }
        }),
        And => binary_int_only(lexer, t, left, And.precedence(), |a, b| Some(a & b)),
        Or => binary_int_only(lexer, t, left, Or.precedence(), |a, b| Some(a | b)),
        Xor => binary_int_only(lexer, t, left, Xor.precedence(), |a, b| Some(a ^ b)),
        Weeks => led_duration(lexer, left, 3600.0 * 24.0 * 7.0, Weeks.precedence() - 1),
        Days => led_duration(lexer, left, 3600.0 * 24.0, Days.precedence() - 1),
        Hours => led_duration(lexer, left, 3600.0, Hours.precedence() - 1),
        Minutes => led_duration(lexer, left, 60.0, Minutes.precedence() - 1),
        Seconds => led_duration(lexer, left, 1.0, Seconds.precedence() - 1),
        _ => err(t, ErrorKind::InvalidNumericExpression),
    }
}

fn binary_arith(
    lexer: &mut NumLexer,
    t: NumToken,
    left: NumToken,
    prec: u8,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> NumToken {
    let right = operand(expression(lexer, prec));
    if matches!(right.kind, NumTokenKind::Error(_)) {
        return right;
    }
    let (left, right) = normalize(left, right);
    match (left.kind, right.kind) {
        (NumTokenKind::Integer(a), NumTokenKind::Integer(b)) => {
            NumToken { offset: left.offset, kind: NumTokenKind::Integer(int_op(a, b)) }
        }
        (NumTokenKind::Decimal(a), NumTokenKind::Decimal(b)) => {
            NumToken { offset: left.offset, kind: NumTokenKind::Decimal(float_op(a, b)) }
        }
        _ => err(t, ErrorKind::InvalidNumericExpression),
    }
}

fn binary_div(lexer: &mut NumLexer, t: NumToken, left: NumToken) -> NumToken {
    let right = operand(expression(lexer, NumTokenKind::Div.precedence()));
    if matches!(right.kind, NumTokenKind::Error(_)) {
        return right;
    }
    let (left, right) = normalize(left, right);
    match (left.kind, right.kind) {
        (NumTokenKind::Integer(a), NumTokenKind::Integer(b)) => {
            if b == 0 {
                err(t, ErrorKind::DivisionByZero)
            } else {
                NumToken { offset: left.offset, kind: NumTokenKind::Integer(a / b) }
            }
        }
        (NumTokenKind::Decimal(a), NumTokenKind::Decimal(b)) => {
            if b == 0.0 {
                err(t, ErrorKind::DivisionByZero)
            } else {
                NumToken { offset: left.offset, kind: NumTokenKind::Decimal(a / b) }
            }
        }
        _ => err(t, ErrorKind::InvalidNumericExpression),
    }
}

fn binary_int_only(
    lexer: &mut NumLexer,
    t: NumToken,
    left: NumToken,
    prec: u8,
    op: fn(i64, i64) -> Option<i64>,
) -> NumToken {
    let right = operand(expression(lexer, prec));
    if matches!(right.kind, NumTokenKind::Error(_)) {
        return right;
    }
    let (left, right) = normalize(left, right);
    match (left.kind, right.kind) {
        (NumTokenKind::Integer(a), NumTokenKind::Integer(b)) => match op(a, b) {
            Some(v) => NumToken { offset: left.offset, kind: NumTokenKind::Integer(v) },
            None => err(t, ErrorKind::DivisionByZero),
        },
        _ => err(t, ErrorKind::OperandMustBeInteger),
    }
}

/// `led` for the duration operators (`w`/`d`/`h`/`m`/`s`): the left
/// operand is a count of that unit, converted to seconds; the right
/// operand, if present, is added (this is how `1h30m` parses as "1 hour
/// plus 30 minutes" rather than needing explicit `+`). A missing right
/// operand is not an error -- `1h` alone is valid.
fn led_duration(lexer: &mut NumLexer, left: NumToken, unit_seconds: f64, rbp: u8) -> NumToken {
    let mut left = NumToken { offset: left.offset, kind: NumTokenKind::Decimal(as_f64(left) * unit_seconds) };
    if matches!(lexer.tok.kind, NumTokenKind::CloseParen) {
        return left;
    }
    let right = expression(lexer, rbp);
    match right.kind {
        NumTokenKind::Error(ErrorKind::EndOfInput) => left,
        NumTokenKind::Error(_) => right,
        _ => {
            let NumTokenKind::Decimal(base) = left.kind else { unreachable!() };
            left.kind = NumTokenKind::Decimal(base + as_f64(right));
            left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(s: &str) -> Value {
        eval(s.as_bytes()).unwrap_or_else(|e| panic!("{s:?} failed: {:?}", e))
    }

    #[test]
    fn simple_integer_arithmetic() {
        assert_eq!(eval_ok("1 + 2 * 3"), Value::Decimal(7.0));
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(eval_ok("(1 + 2) * 3"), Value::Decimal(9.0));
    }

    #[test]
    fn hex_and_bin_literals() {
        assert_eq!(eval_ok("0xFF"), Value::Decimal(255.0));
        assert_eq!(eval_ok("0b1010"), Value::Decimal(10.0));
    }

    #[test]
    fn octal_legacy_and_explicit() {
        assert_eq!(eval_ok("017"), Value::Decimal(15.0));
        assert_eq!(eval_ok("0o17"), Value::Decimal(15.0));
    }

    #[test]
    fn bare_zero_is_integer_zero_not_octal() {
        assert_eq!(eval_ok("0"), Value::Decimal(0.0));
    }

    #[test]
    fn decimal_with_exponent() {
        assert_eq!(eval_ok("1.5e2"), Value::Decimal(150.0));
    }

    #[test]
    fn duration_combination() {
        assert_eq!(eval_ok("1h30m"), Value::Decimal(5400.0));
    }

    #[test]
    fn division_by_zero_errors() {
        assert_eq!(eval(b"1/0").unwrap_err().0, ErrorKind::DivisionByZero);
    }

    #[test]
    fn modulo_requires_integers() {
        assert_eq!(eval(b"1.5 % 2").unwrap_err().0, ErrorKind::OperandMustBeInteger);
    }

    #[test]
    fn integer_overflow_detected() {
        assert_eq!(eval(b"9223372036854775808").unwrap_err().0, ErrorKind::NumberOverflow);
    }

    #[test]
    fn separator_cannot_lead_or_trail() {
        assert!(eval(b"1_").is_err());
        assert!(eval(b"_1").is_err());
    }

    #[test]
    fn unclosed_paren_errors() {
        assert_eq!(eval(b"(1 + 2").unwrap_err().0, ErrorKind::UnclosedParenthesis);
    }

    #[test]
    fn looks_numeric_detection() {
        assert!(looks_numeric(b"42"));
        assert!(looks_numeric(b"-42"));
        assert!(looks_numeric(b".5"));
        assert!(!looks_numeric(b"hello"));
    }

    #[test]
    fn literal_value_synonyms() {
        assert_eq!(literal_value(b"TRUE"), Some("true"));
        assert_eq!(literal_value(b"No"), Some("false"));
        assert_eq!(literal_value(b"on"), Some("true"));
        assert_eq!(literal_value(b"maybe"), None);
    }
}
