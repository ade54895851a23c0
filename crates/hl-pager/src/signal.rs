// SPDX-License-Identifier: MIT
//
// Process-wide broken-pipe suppression.
//
// By default a write to a pipe whose reader has gone away raises SIGPIPE,
// which terminates the process. With the signal ignored the same write
// returns `EPIPE` and the pager bridge can report it like any other error.
// The disposition is inherited across exec, but `std::process::Command`
// resets SIGPIPE to default in the child, so pagers are unaffected.

#![allow(unsafe_code)]

use std::sync::Once;

static IGNORE_SIGPIPE: Once = Once::new();

/// Ignore SIGPIPE for the whole process. Safe to call repeatedly; only the
/// first call does anything. No-op on non-unix platforms.
pub fn ignore_broken_pipe() {
    IGNORE_SIGPIPE.call_once(install);
}

#[cfg(unix)]
fn install() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = libc::SIG_IGN;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGPIPE, &raw const sa, std::ptr::null_mut());
    }
    tracing::debug!("SIGPIPE ignored");
}

#[cfg(not(unix))]
fn install() {
    // No SIGPIPE outside unix.
}
