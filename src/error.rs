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

//! The decoder's error set. It is closed and fully enumerable, so this is
//! a plain enum with a hand-written `Display` rather than a `thiserror`
//! derive or a boxed `dyn Error` hierarchy.

use std::fmt::{self, Display, Formatter};

use crate::pos::Location;

/// One diagnostic class. `EndOfInput` is a terminal sentinel distinct from
/// every other variant: it marks "the lexer ran out of input" rather than
/// a malformed construct, and callers that can tolerate running out of
/// input (an optional trailing operand, the top-level member list) match
/// on it specifically instead of comparing against a raw pointer the way
/// the original implementation did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    EndOfInput,
    InvalidChar,
    TruncatedChar,
    SyntaxError,
    UnclosedDoubleQuoteString,
    UnclosedSingleQuoteString,
    UnclosedSlashStarComment,
    NewlineInDoubleQuoteString,
    NewlineInSingleQuoteString,
    ExpectStringIdentifier,
    ExpectColon,
    MaxObjectArrayDepth,
    UnclosedObject,
    UnclosedArray,
    UnexpectedEndOfInput,
    ExpectIdentifierAfterComma,
    ExpectValueAfterComma,
    InvalidEscapeSequence,
    InvalidNumericExpression,
    InvalidBinaryNumber,
    InvalidHexadecimalNumber,
    InvalidOctalNumber,
    InvalidIntegerNumber,
    InvalidDecimalNumber,
    NumberOverflow,
    UnopenedParenthesis,
    DivisionByZero,
    UnclosedParenthesis,
    OperandMustBeInteger,
    MarginMustBeWhitespaceOnly,
    UnclosedMultiline,
    InvalidMarginChar,
    MissingNewlineSpecifier,
    InvalidNewlineSpecifier,
    InvalidMultilineStart,
    UnexpectedCloseBrace,
    UnexpectedCloseSquare,
    InvalidIsoDateTime,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::EndOfInput => "end of input",
            ErrorKind::InvalidChar => "invalid character",
            ErrorKind::TruncatedChar => "last utf8 char is truncated",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::UnclosedDoubleQuoteString => "unclosed double quote string",
            ErrorKind::UnclosedSingleQuoteString => "unclosed single quote string",
            ErrorKind::UnclosedSlashStarComment => "unclosed /*...*/ comment",
            ErrorKind::NewlineInDoubleQuoteString => "newline in double quoted string",
            ErrorKind::NewlineInSingleQuoteString => "newline in single quoted string",
            ErrorKind::ExpectStringIdentifier => "expect string identifier",
            ErrorKind::ExpectColon => "expect a colon",
            ErrorKind::MaxObjectArrayDepth => "too many object or array encapsulations",
            ErrorKind::UnclosedObject => "unclosed object",
            ErrorKind::UnclosedArray => "unclosed array",
            ErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ErrorKind::ExpectIdentifierAfterComma => "expect identifier after comma",
            ErrorKind::ExpectValueAfterComma => "expect value after comma",
            ErrorKind::InvalidEscapeSequence => "invalid escape squence",
            ErrorKind::InvalidNumericExpression => "invalid numeric expression",
            ErrorKind::InvalidBinaryNumber => "invalid binary number",
            ErrorKind::InvalidHexadecimalNumber => "invalid hexadecimal number",
            ErrorKind::InvalidOctalNumber => "invalid octal number",
            ErrorKind::InvalidIntegerNumber => "invalid integer number",
            ErrorKind::InvalidDecimalNumber => "invalid decimal number",
            ErrorKind::NumberOverflow => "number overflow",
            ErrorKind::UnopenedParenthesis => "missing open parenthesis",
            ErrorKind::DivisionByZero => "division by zero",
            ErrorKind::UnclosedParenthesis => "missing close parenthesis",
            ErrorKind::OperandMustBeInteger => "operand must be integer",
            ErrorKind::MarginMustBeWhitespaceOnly => "multiline margin must contain only whitespaces",
            ErrorKind::UnclosedMultiline => "unclosed multiline",
            ErrorKind::InvalidMarginChar => "invalid margin character",
            ErrorKind::MissingNewlineSpecifier => "missing \\n or \\r\\n after multiline start",
            ErrorKind::InvalidNewlineSpecifier => "expect \\n or \\r\\n after `",
            ErrorKind::InvalidMultilineStart => "invalid multiline start line",
            ErrorKind::UnexpectedCloseBrace => "unexpected }",
            ErrorKind::UnexpectedCloseSquare => "unexpected ]",
            ErrorKind::InvalidIsoDateTime => "invalid ISO date time",
        })
    }
}

/// An error together with where it occurred, as rendered into the final
/// `decode()` output on failure.
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub location: Location,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Pos;

    #[test]
    fn renders_message_and_location() {
        let diag = Diagnostic {
            kind: ErrorKind::ExpectColon,
            location: Location::of(b"a b", Pos { byte: 2, line_start: 0, line: 0 }),
        };
        assert_eq!(diag.to_string(), "expect a colon at line 1 col 3");
    }
}
