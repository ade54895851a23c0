// SPDX-License-Identifier: MIT
//
// hlcat — print source files with syntax highlighting.
//
// This is the binary that wires the crates together:
//
//   hl-syntax → language definitions, tokenizer, themes
//   hl-term   → palette quantization, ANSI rendering
//   hl-pager  → optional pager subprocess
//
// Each input flows through:
//
//   file → lines → Highlighter (LineState threaded) → AnsiRenderer
//        → Output (pager pipe or stdout)
//
// Exit status is 1 if any input could not be read. When a pager was used
// and it exited non-zero, its status wins.

mod cat;
mod config;
mod output;

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use hl_term::{AnsiRenderer, Palette};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cat::{CatError, Printer};
use crate::config::{Args, Listing, Settings};
use crate::output::Output;

fn main() -> ExitCode {
    init_logging();
    hl_pager::ignore_broken_pipe();

    let args = Args::parse();
    if let Some(listing) = Listing::requested(&args) {
        return match listing.write(&mut Output::terminal(io::stdout())) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("error writing output: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let settings = Settings::resolve(args, |key| env::var(key).ok());
    let out = Output::open(settings.pager.as_ref());
    ExitCode::from(run(&settings, out))
}

/// Log to stderr only. Stdout may be the pager's pipe.
fn init_logging() {
    let filter = EnvFilter::try_from_env("HLCAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

/// Print every input to `out` and work out the exit status.
fn run<W: Write>(settings: &Settings, mut out: Output<W>) -> u8 {
    debug!(
        depth = %settings.depth,
        theme = settings.theme.name,
        paging = settings.pager.is_some(),
        "starting"
    );

    let palette = Palette::new(settings.depth);
    let renderer = AnsiRenderer::new(&palette).with_line_numbers(settings.line_numbers);
    let printer = Printer::new(renderer, settings.theme, settings.syntax);

    let mut status = 0;
    for input in &settings.inputs {
        match printer.print_input(input, &mut out) {
            Ok(_) => {}
            Err(err @ CatError::Write(_)) => {
                error!("{err}");
                status = 1;
                break;
            }
            Err(err) => {
                error!("{err}");
                status = 1;
            }
        }
    }

    if out.is_silenced() {
        debug!(paged = out.is_paged(), "reader went away before the end of output");
    }

    match out.finish() {
        Ok(Some(code)) if code != 0 => exit_byte(code),
        Ok(_) => status,
        Err(err) => {
            error!("error writing output: {err}");
            1
        }
    }
}

/// Map a pager exit code onto a process exit byte. The failure sentinel
/// (-1) comes out as 255.
fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(u8::MAX)
}
