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

//! Source positions.

use std::fmt::{self, Display, Formatter};

/// A position within the input, tracked incrementally as bytes are consumed.
///
/// `byte` is non-decreasing across a decode. `line_start` resets to `byte`
/// and `line` increments every time a newline is crossed.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Pos {
    /// Byte offset of the next unconsumed byte.
    pub byte: usize,

    /// Byte offset of the first byte of the current line.
    pub line_start: usize,

    /// Zero-based line index.
    pub line: usize,
}

impl Pos {
    /// The position at the beginning of input.
    pub const BOF: Self = Self { byte: 0, line_start: 0, line: 0 };

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.byte += n;
    }

    /// Returns a copy advanced by `n` bytes on the same line. Used to
    /// locate an error partway through a quoteless string's numeric
    /// expression, which by construction never contains a newline.
    #[inline]
    pub fn advanced(self, n: usize) -> Self {
        Self { byte: self.byte + n, ..self }
    }

    #[inline]
    pub fn newline(&mut self) {
        self.line_start = self.byte;
        self.line += 1;
    }
}

// ----------------------------------------------------------------------------

/// A 1-based (line, column) location, used only to render diagnostics.
///
/// Column is counted in codepoints, not bytes, per the `column` rule in
/// spec.md §9: re-scan the current line from its stored start offset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Computes the location of `pos` within `input`, counting codepoints
    /// from `pos.line_start` up to `pos.byte`.
    pub fn of(input: &[u8], pos: Pos) -> Self {
        let column = count_codepoints(&input[pos.line_start..pos.byte]);
        Self { line: pos.line + 1, column: column + 1 }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "line {} col {}", self.line, self.column)
    }
}

/// Counts UTF-8 codepoints in a byte slice assumed to hold only complete,
/// already-validated encodings (continuation bytes, 0x80..=0xBF, don't
/// start a new codepoint).
fn count_codepoints(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_bof() {
        assert_eq!(Pos::BOF, Pos { byte: 0, line_start: 0, line: 0 });
    }

    #[test]
    fn pos_advance_newline() {
        let mut pos = Pos::BOF;
        pos.advance(3);
        assert_eq!(pos.byte, 3);
        pos.newline();
        assert_eq!(pos.line_start, 3);
        assert_eq!(pos.line, 1);
    }

    #[test]
    fn location_ascii_column() {
        let input = b"abc: 1\ndef: 2";
        let pos = Pos { byte: 4, line_start: 0, line: 0 };
        assert_eq!(Location::of(input, pos), Location { line: 1, column: 5 });
    }

    #[test]
    fn location_counts_codepoints_not_bytes() {
        // "café: " - 'é' is 2 bytes but 1 codepoint.
        let input = "café: 1".as_bytes();
        let pos = Pos { byte: "café: ".len(), line_start: 0, line: 0 };
        assert_eq!(Location::of(input, pos), Location { line: 1, column: 7 });
    }

    #[test]
    fn location_second_line() {
        let input = b"a: 1\nbb: 2";
        let pos = Pos { byte: 8, line_start: 5, line: 1 };
        assert_eq!(Location::of(input, pos), Location { line: 2, column: 4 });
    }
}
