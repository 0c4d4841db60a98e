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

//! Grow-on-demand output buffer for the JSON text being assembled.
//!
//! `Vec<u8>` already grows on demand, so this is a thin wrapper rather
//! than a reimplementation of the malloc/realloc dance the buffer needed
//! in C; it exists so the parser has one place to reset output when it
//! backs out of a partially-written value after a diagnostic.

pub struct Output {
    buf: Vec<u8>,
}

impl Output {
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(1024) }
    }

    pub fn push_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub fn push_bytes(&mut self, s: &[u8]) {
        self.buf.extend_from_slice(s);
    }

    /// Discards everything written so far, for the error path where a
    /// partially assembled value must be replaced by a diagnostic.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_up_bytes() {
        let mut out = Output::new();
        out.push_byte(b'{');
        out.push_str("\"a\":1");
        out.push_byte(b'}');
        assert_eq!(out.into_bytes(), b"{\"a\":1}");
    }

    #[test]
    fn reset_discards_content() {
        let mut out = Output::new();
        out.push_str("garbage");
        out.reset();
        out.push_str("ok");
        assert_eq!(out.into_bytes(), b"ok");
    }
}
