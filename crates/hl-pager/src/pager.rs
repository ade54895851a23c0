// SPDX-License-Identifier: MIT
//
// The pager bridge: one child process, one pipe.
//
// `PagerCommand` describes what to run and is cheap to build and inspect.
// `spawn()` turns it into a `PagerProcess`, which owns the child handle and
// the write end of the child's stdin. The child's stdout and stderr are
// inherited untouched so the pager draws directly on the terminal.
//
// The owner must close the pipe before waiting, or the pager sits there
// waiting for more input. `exec()` does both in the right order, and Drop
// does the same for a bridge that was never waited on, so the child is
// reaped exactly once whatever path the caller takes.

use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, warn};

use crate::error::PagerError;

/// Returned by [`PagerProcess::exec`] when the wait fails or the pager did
/// not exit normally.
pub const EXEC_FAILED: i32 = -1;

/// Pager used when neither `HLCAT_PAGER` nor `PAGER` is set.
pub const DEFAULT_PAGER: &str = "less";

/// Environment forced on every pager started from the environment:
/// `less` quits on short input, passes colors, and keeps the screen; `lv`
/// passes colors.
pub const PAGER_ENV: [(&str, &str); 2] = [("LESS", "FRX"), ("LV", "-c")];

// ─── PagerCommand ────────────────────────────────────────────────────────────

/// What to run as the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerCommand {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl PagerCommand {
    /// A pager running `program` with no arguments and the inherited
    /// environment.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Resolve the pager from the environment.
    ///
    /// The program is the first non-empty value of `HLCAT_PAGER` and
    /// `PAGER`, else [`DEFAULT_PAGER`]. It is run by name with no
    /// arguments, and [`PAGER_ENV`] is merged over the inherited
    /// environment.
    ///
    /// ```
    /// use hl_pager::PagerCommand;
    ///
    /// let cmd = PagerCommand::from_env(|key| (key == "PAGER").then(|| "more".to_string()));
    /// assert_eq!(cmd.program(), "more");
    /// assert_eq!(cmd.env_value("LESS"), Some("FRX"));
    /// ```
    #[must_use]
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let program = ["HLCAT_PAGER", "PAGER"]
            .into_iter()
            .filter_map(&lookup)
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());

        PAGER_ENV
            .into_iter()
            .fold(Self::new(program), |cmd, (key, value)| cmd.env(key, value))
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set an environment variable for the child, replacing any earlier
    /// value for the same key.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.env.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.env.push((key, value)),
        }
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The override for `key`, if one was set.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Start the pager with a fresh pipe on its stdin.
    ///
    /// # Errors
    ///
    /// [`PagerError::Spawn`] if the pipe or the process cannot be created.
    /// Callers should fall back to writing to the terminal.
    pub fn spawn(&self) -> Result<PagerProcess, PagerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| PagerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        debug!(program = %self.program, pid = child.id(), "pager started");

        Ok(PagerProcess {
            program: self.program.clone(),
            state: if stdin.is_some() {
                PagerState::Running
            } else {
                PagerState::Closed
            },
            child,
            stdin,
        })
    }
}

// ─── PagerProcess ────────────────────────────────────────────────────────────

/// Where a [`PagerProcess`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Input pipe open, child running.
    Running,
    /// Input pipe closed by [`PagerProcess::close`]; child not yet waited on.
    Closed,
    /// Child waited on. Terminal state.
    Reaped,
    /// A write failed and the input pipe was dropped; child not yet waited
    /// on.
    Failed,
}

/// A running pager.
///
/// Write-only: it implements [`Write`] and deliberately not
/// [`Read`](std::io::Read), so reading is rejected by the compiler.
///
/// ```compile_fail
/// use std::io::Read;
///
/// let mut pager = hl_pager::PagerCommand::new("cat").spawn().unwrap();
/// let mut buf = [0u8; 16];
/// pager.read(&mut buf).unwrap();
/// ```
#[derive(Debug)]
pub struct PagerProcess {
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    state: PagerState,
}

impl PagerProcess {
    #[inline]
    #[must_use]
    pub const fn state(&self) -> PagerState {
        self.state
    }

    /// OS process id of the child.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Flush and close the input pipe, signalling end of input. The child
    /// keeps running. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`PagerError::Write`] if the final flush fails. The pipe is closed
    /// either way.
    pub fn close(&mut self) -> Result<(), PagerError> {
        let Some(mut stdin) = self.stdin.take() else {
            return Ok(());
        };
        let flushed = stdin.flush();
        drop(stdin);
        if self.state == PagerState::Running {
            self.state = PagerState::Closed;
        }
        flushed.map_err(PagerError::Write)
    }

    /// Wait for the child to exit and return its exit code.
    ///
    /// The input pipe is dropped first if it is still open, so this never
    /// deadlocks against a pager waiting for more input.
    ///
    /// # Errors
    ///
    /// - [`PagerError::AlreadyReaped`] on a second call
    /// - [`PagerError::Wait`] if the wait itself fails
    /// - [`PagerError::Abnormal`] if the child was killed by a signal
    pub fn wait(&mut self) -> Result<i32, PagerError> {
        if self.state == PagerState::Reaped {
            return Err(PagerError::AlreadyReaped);
        }
        self.stdin = None;

        let waited = self.child.wait();
        self.state = PagerState::Reaped;

        let status = waited.map_err(PagerError::Wait)?;
        debug!(program = %self.program, %status, "pager exited");
        status.code().ok_or(PagerError::Abnormal(status))
    }

    /// Close the input, wait, and return the exit code, or [`EXEC_FAILED`]
    /// if the wait fails or the child did not exit normally.
    pub fn exec(&mut self) -> i32 {
        if let Err(err) = self.close() {
            debug!(program = %self.program, %err, "pager input flush failed on close");
        }
        match self.wait() {
            Ok(code) => code,
            Err(err) => {
                warn!(program = %self.program, %err, "pager did not exit cleanly");
                EXEC_FAILED
            }
        }
    }

    /// Drop the input pipe after a failed write and remember why.
    fn fail(&mut self, err: io::Error) -> io::Error {
        self.stdin = None;
        self.state = PagerState::Failed;
        warn!(program = %self.program, %err, "pager input failed, closing pipe");
        err
    }
}

impl Write for PagerProcess {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PagerError::Closed.into());
        };
        loop {
            match stdin.write(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(self.fail(err)),
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        match stdin.flush() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }
}

impl Drop for PagerProcess {
    fn drop(&mut self) {
        if self.state == PagerState::Reaped {
            return;
        }
        self.stdin = None;
        if let Err(err) = self.child.wait() {
            debug!(program = %self.program, %err, "failed to reap pager on drop");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
