// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Helpers for writing tests that execute the command-line programs in this
//! workspace

use std::env;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use subprocess::Exec;
use subprocess::ExitStatus;
use subprocess::Redirection;

/// Exit code command is expected to produce on success
pub const EXIT_SUCCESS: u32 = 0;
/// Exit code command is expected to produce on generic failure
pub const EXIT_FAILURE: u32 = 1;
/// Exit code command is expected to produce on usage error
///
/// This is the exit code clap uses when argument parsing fails.
pub const EXIT_USAGE: u32 = 2;

/// Returns the OS-appropriate path to the given executable
///
/// Intended for use with the `CARGO_BIN_EXE_<name>` variables that Cargo sets
/// when compiling the test suite.
pub fn path_to_executable(cmd_name: &str) -> PathBuf {
    let mut rv = PathBuf::from(cmd_name);
    // Drop the ".exe" extension on Windows.  Otherwise our cross-platform tests
    // will fail on basic checks of the command's own name in error messages.
    rv.set_extension("");
    rv
}

/// Run the given command to completion, returning its exit status and the
/// contents of stdout and stderr
///
/// Panics if the command cannot be executed at all.  Use
/// [`assert_exit_code()`] to check the returned status.
pub fn run_command(exec: Exec) -> (ExitStatus, String, String) {
    let cmdline = exec.to_cmdline_lossy();
    let capture = exec
        .stdout(Redirection::Pipe)
        .stderr(Redirection::Pipe)
        .detached()
        .capture()
        .unwrap_or_else(|error| {
            panic!("failed to execute command {:?}: {}", cmdline, error)
        });

    (capture.exit_status, capture.stdout_str(), capture.stderr_str())
}

/// Asserts that a command exited normally with the given exit code
pub fn assert_exit_code(exit_status: ExitStatus, code: u32) {
    if let ExitStatus::Exited(exit_code) = exit_status {
        assert_eq!(exit_code, code);
    } else {
        panic!(
            "expected normal process exit with code {}, found {:?}",
            code, exit_status
        );
    }
}

/// Returns the POSIX error message for ENOENT
///
/// Error messages that include the underlying message for a file-not-found
/// error can use this to construct the expected message in a way that doesn't
/// hardcode the OS-specific text.
pub fn error_for_enoent() -> String {
    // ENOENT is 2 on every platform we care about.
    std::io::Error::from_raw_os_error(2).to_string()
}

/// Returns a path at which the current test may create a temporary file
///
/// The file is not created and will not be removed automatically.  The path
/// incorporates the process id plus a per-process counter so that concurrently
/// running tests don't collide.
pub fn temp_file_path(anchor_name: &str) -> PathBuf {
    static FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let count = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let mut file_path = env::temp_dir();
    let file_name =
        format!("{}.{}.{}", anchor_name, std::process::id(), count);
    file_path.push(file_name);
    file_path
}
