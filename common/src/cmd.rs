// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facilities used by the command-line tools

use std::env::args_os;
use std::process::exit;

/// Represents a fatal error in a command-line program
#[derive(Debug)]
pub enum CmdError {
    /// incorrect command-line arguments
    Usage(String),
    /// all other errors
    Failure(anyhow::Error),
}

/// Exits the current process on a fatal error
///
/// The error message is prefixed with the program's basename so that it reads
/// sensibly when several services log to the same console.
pub fn fatal(cmd_error: CmdError) -> ! {
    let arg0 = args_os()
        .next()
        .and_then(|arg0_os| arg0_os.into_string().ok())
        .and_then(|arg0| arg0.rsplit('/').next().map(String::from))
        .unwrap_or_else(|| String::from("command"));
    let (exit_code, message) = match cmd_error {
        CmdError::Usage(m) => (2, m),
        CmdError::Failure(e) => (1, format!("{:#}", e)),
    };
    eprintln!("{}: {}", arg0, message);
    exit(exit_code);
}
