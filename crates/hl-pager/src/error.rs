// SPDX-License-Identifier: MIT
//
// Pager failures.
//
// Every variant is recoverable from the caller's point of view. A spawn
// failure means "no pager, write to the terminal"; anything later means
// "stop paging, keep going".

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagerError {
    /// The pipe or the child process could not be created.
    #[error("failed to start pager `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Writing or flushing the pager's input failed (usually `EPIPE`).
    #[error("failed to write to pager")]
    Write(#[source] io::Error),

    /// The input pipe was already closed locally.
    #[error("pager input is closed")]
    Closed,

    /// Waiting for the child failed.
    #[error("failed to wait for pager")]
    Wait(#[source] io::Error),

    /// The child did not exit normally (killed by a signal).
    #[error("pager terminated abnormally: {0}")]
    Abnormal(ExitStatus),

    /// The child was already waited on.
    #[error("pager was already reaped")]
    AlreadyReaped,
}

impl From<PagerError> for io::Error {
    fn from(err: PagerError) -> Self {
        match err {
            PagerError::Write(source)
            | PagerError::Wait(source)
            | PagerError::Spawn { source, .. } => source,
            PagerError::Closed => Self::new(io::ErrorKind::BrokenPipe, err),
            other => Self::other(other),
        }
    }
}
