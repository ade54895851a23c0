// SPDX-License-Identifier: MIT
//
// hl-pager — Pager subprocess bridge for hlcat.
//
// Rendered output can be streamed into an interactive pager (`less` and
// friends) that keeps direct control of the terminal. This crate owns the
// child process and the write end of its input pipe, and nothing else may
// close or wait on them.
//
// Lifecycle:
//
//   PagerCommand::spawn ──► Running ──close()──► Closed ──wait()──► Reaped
//                              │                                     ▲
//                              └── write fails ──► Failed ──wait()───┘
//
// Writing after the pipe is closed is an ordinary error, never a signal.
// Call `ignore_broken_pipe()` once at startup so a pager that quits early
// surfaces as `EPIPE` instead of killing the process.

pub mod error;
pub mod pager;
pub mod signal;

pub use error::PagerError;
pub use pager::{EXEC_FAILED, PagerCommand, PagerProcess, PagerState};
pub use signal::ignore_broken_pipe;
