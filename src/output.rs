// SPDX-License-Identifier: MIT
//
// Output sink: the pager when one is running, the terminal otherwise.
//
// Readers going away is not an error for a cat-like tool. When the pager
// quits early or stdout's reader closes the pipe, the sink goes quiet: every
// later write succeeds and discards its bytes, so the per-file loop runs to
// the end without special cases and the exit status still reflects the
// pager's own.

use std::io::{self, Write};

use hl_pager::{PagerCommand, PagerProcess};
use tracing::{debug, warn};

pub struct Output<W: Write = io::Stdout> {
    terminal: W,
    pager: Option<PagerProcess>,
    silenced: bool,
}

impl Output {
    /// Page through `pager` if given and it starts, else write to stdout.
    pub fn open(pager: Option<&PagerCommand>) -> Self {
        match pager.map(PagerCommand::spawn) {
            Some(Ok(pager)) => Self::paged(io::stdout(), pager),
            Some(Err(err)) => {
                warn!(%err, "pager unavailable, writing to the terminal");
                Self::terminal(io::stdout())
            }
            None => Self::terminal(io::stdout()),
        }
    }
}

impl<W: Write> Output<W> {
    /// Write to `terminal` only.
    pub const fn terminal(terminal: W) -> Self {
        Self {
            terminal,
            pager: None,
            silenced: false,
        }
    }

    /// Write to a running pager. `terminal` is only flushed at the end.
    pub const fn paged(terminal: W, pager: PagerProcess) -> Self {
        Self {
            terminal,
            pager: Some(pager),
            silenced: false,
        }
    }

    pub const fn is_paged(&self) -> bool {
        self.pager.is_some()
    }

    /// Whether writes are being discarded.
    pub const fn is_silenced(&self) -> bool {
        self.silenced
    }

    /// Flush the terminal and, if paging, close the pager's input and wait
    /// for it. Returns the pager's exit status.
    pub fn finish(mut self) -> io::Result<Option<i32>> {
        if let Err(err) = self.terminal.flush() {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(err);
            }
        }
        Ok(self.pager.as_mut().map(PagerProcess::exec))
    }

    fn silence(&mut self, err: &io::Error) {
        debug!(%err, "output closed, discarding the rest");
        self.silenced = true;
    }
}

impl<W: Write> Write for Output<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.silenced {
            return Ok(buf.len());
        }
        let result = match self.pager.as_mut() {
            Some(pager) => pager.write(buf),
            None => self.terminal.write(buf),
        };
        match result {
            Ok(n) => Ok(n),
            // The pager bridge has already dropped its pipe; any failure
            // there ends paging.
            Err(err) if self.pager.is_some() || err.kind() == io::ErrorKind::BrokenPipe => {
                self.silence(&err);
                Ok(buf.len())
            }
            Err(err) => Err(err),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.silenced {
            return Ok(());
        }
        let result = match self.pager.as_mut() {
            Some(pager) => pager.flush(),
            None => self.terminal.flush(),
        };
        match result {
            Err(err) if self.pager.is_some() || err.kind() == io::ErrorKind::BrokenPipe => {
                self.silence(&err);
                Ok(())
            }
            other => other,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
