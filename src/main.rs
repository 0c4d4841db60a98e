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

use std::env::args;
use std::fs::File;
use std::io::{self, stderr, stdin, stdout, Read, Write};
use std::process::ExitCode;

use colored::Colorize;

/// The name of the decoder.
pub const PROGRAM_NAME: &str = "qjson";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            let _ = writeln!(stderr(), "{}: {}", PROGRAM_NAME.red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<ExitCode> {
    let mut args = args();
    args.next();

    let mut buffer = Vec::new();
    let mut paths: Vec<String> = args.collect();
    if paths.is_empty() {
        paths.push("-".to_string());
    }

    for path in paths {
        if path == "-" {
            writeln!(stderr(), "reading stdin")?;
            stdin().read_to_end(&mut buffer)?;
        } else {
            writeln!(stderr(), "reading {path}")?;
            File::open(path)?.read_to_end(&mut buffer)?;
        }
    }

    let out = qjson::decode(&buffer);
    let is_ok = out.first() == Some(&b'{');

    let mut stdout = stdout();
    stdout.write_all(&out)?;
    stdout.write_all(b"\n")?;

    if is_ok {
        Ok(ExitCode::SUCCESS)
    } else {
        let diagnostic = String::from_utf8_lossy(&out);
        writeln!(stderr(), "{}", diagnostic.red())?;
        Ok(ExitCode::FAILURE)
    }
}
