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

//! Token kinds produced by the structural lexer and by the numeric
//! sub-lexer that runs over a quoteless string's text.
//!
//! The reference implementation shares one tag enum between both
//! lexers, since braces/colons/strings and operators/durations never
//! occur in the same stream at the same time. Rust's enums already carry
//! per-variant payloads, so splitting them keeps each lexer's match
//! arms exhaustive over only the tags it can actually produce.

use crate::error::ErrorKind;
use crate::pos::Pos;

/// A token from the structural lexer, with the position of its first byte.
#[derive(Clone, Copy, Debug)]
pub struct Token<'a> {
    pub pos: Pos,
    pub kind: TokenKind<'a>,
}

#[derive(Clone, Copy, Debug)]
pub enum TokenKind<'a> {
    OpenBrace,
    CloseBrace,
    OpenSquare,
    CloseSquare,
    Colon,
    Comma,
    DoubleQuotedString(&'a [u8]),
    SingleQuotedString(&'a [u8]),
    MultilineString(&'a [u8]),
    QuotelessString(&'a [u8]),
    Error(ErrorKind),
}

impl<'a> Token<'a> {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }

    /// True when this token is specifically the "ran out of input"
    /// sentinel, as opposed to some other error.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self.kind, TokenKind::Error(ErrorKind::EndOfInput))
    }
}

/// A token from the numeric/duration expression sub-lexer, carrying its
/// byte offset within the quoteless string being evaluated (used only to
/// compute an absolute error position when the expression fails).
#[derive(Clone, Copy, Debug)]
pub struct NumToken {
    pub offset: usize,
    pub kind: NumTokenKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumTokenKind {
    Integer(i64),
    Decimal(f64),
    Plus,
    Minus,
    Mul,
    Div,
    Xor,
    And,
    Or,
    Inverse,
    Modulo,
    OpenParen,
    CloseParen,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Error(ErrorKind),
}

impl NumTokenKind {
    /// Binding power used by the Pratt evaluator, mirroring the
    /// reference implementation's precedence table. Zero for tokens that
    /// never appear as an infix operator.
    pub fn precedence(self) -> u8 {
        use NumTokenKind::*;
        match self {
            Plus | Minus | Xor | Or => 1,
            Mul | Div | And | Modulo => 2,
            Weeks | Days | Hours | Minutes | Seconds => 4,
            _ => 0,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, NumTokenKind::Error(_))
    }
}

pub const HIGHEST_PRECEDENCE: u8 = 4;
