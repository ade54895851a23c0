// SPDX-License-Identifier: MIT
//
// The per-file pipeline: read a line, highlight it, render it, write it.
//
// Every input starts from a fresh `LineState`, so a comment left open at
// the end of one file never colors the next. Within a file the state is
// threaded strictly line by line. Each rendered line is assembled in a
// reusable buffer and handed to the sink in a single write.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use hl_syntax::{Highlighter, LineState, Syntax, Theme};
use hl_term::AnsiRenderer;
use thiserror::Error;
use tracing::debug;

use crate::config::Input;

#[derive(Debug, Error)]
pub enum CatError {
    #[error("could not open {} for reading: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Write(#[source] io::Error),
}

/// Highlights inputs with one renderer and theme.
pub struct Printer<'a> {
    renderer: AnsiRenderer<'a>,
    theme: &'a Theme,
    /// Forced syntax; `None` detects per input.
    syntax: Option<&'static Syntax>,
}

impl<'a> Printer<'a> {
    pub const fn new(
        renderer: AnsiRenderer<'a>,
        theme: &'a Theme,
        syntax: Option<&'static Syntax>,
    ) -> Self {
        Self {
            renderer,
            theme,
            syntax,
        }
    }

    /// The syntax used for `input`: the forced one, or detected from the
    /// file name. Standard input is plain unless forced.
    pub fn syntax_for(&self, input: &Input) -> &'static Syntax {
        self.syntax.unwrap_or_else(|| match input {
            Input::Stdin => &Syntax::PLAIN,
            Input::File(path) => Syntax::for_path(path),
        })
    }

    /// Print one input. Returns the number of lines written.
    pub fn print_input(&self, input: &Input, out: &mut impl Write) -> Result<usize, CatError> {
        let syntax = self.syntax_for(input);
        debug!(input = %input.name(), syntax = syntax.name, "highlighting");
        match input {
            Input::Stdin => self.print(io::stdin().lock(), &input.name(), syntax, out),
            Input::File(path) => {
                let file = File::open(path).map_err(|source| CatError::Open {
                    path: path.clone(),
                    source,
                })?;
                self.print(BufReader::new(file), &input.name(), syntax, out)
            }
        }
    }

    /// Highlight everything `reader` yields. `name` is only used in errors.
    ///
    /// Lines are split on `\n`, a trailing `\r` is dropped, and invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn print(
        &self,
        mut reader: impl BufRead,
        name: &str,
        syntax: &'static Syntax,
        out: &mut impl Write,
    ) -> Result<usize, CatError> {
        let highlighter = Highlighter::new(syntax, self.theme);
        let mut state = LineState::default();
        let mut raw = Vec::new();
        let mut rendered = Vec::new();
        let mut line_number = 0;

        loop {
            raw.clear();
            let read = reader
                .read_until(b'\n', &mut raw)
                .map_err(|source| CatError::Read {
                    name: name.to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            strip_line_ending(&mut raw);
            let line = String::from_utf8_lossy(&raw);
            line_number += 1;

            let (spans, next) = highlighter.highlight_line(&line, state);
            state = next;

            rendered.clear();
            self.renderer
                .render_line(&mut rendered, line_number, &line, &spans)
                .map_err(CatError::Write)?;
            out.write_all(&rendered).map_err(CatError::Write)?;
        }

        Ok(line_number)
    }
}

fn strip_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hl_term::{ColorDepth, Palette};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    const GUTTER_1: &str = "\x1b[7;37m      1 \x1b[0m";
    const GUTTER_2: &str = "\x1b[7;37m      2 \x1b[0m";

    fn run(printer: &Printer<'_>, text: &[u8], syntax: &'static Syntax) -> String {
        let mut out = Vec::new();
        printer.print(text, "test", syntax, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn write_file(dir: &Path, name: &str, text: &str) -> Input {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        Input::File(path)
    }

    // ── Lines ───────────────────────────────────────────────────────────

    #[test]
    fn plain_text_passes_through() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        assert_eq!(run(&printer, b"hello\nworld\n", &Syntax::PLAIN), "hello\nworld\n");
        assert!(!palette.is_compiled());
    }

    #[test]
    fn missing_final_newline_is_added() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        assert_eq!(run(&printer, b"a\nb", &Syntax::PLAIN), "a\nb\n");
        assert_eq!(run(&printer, b"", &Syntax::PLAIN), "");
    }

    #[test]
    fn crlf_is_stripped() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        assert_eq!(run(&printer, b"a\r\n\r\nb\r\n", &Syntax::PLAIN), "a\n\nb\n");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        assert_eq!(run(&printer, b"a\xffb\n", &Syntax::PLAIN), "a\u{fffd}b\n");
    }

    #[test]
    fn line_numbers() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let renderer = AnsiRenderer::new(&palette).with_line_numbers(true);
        let printer = Printer::new(renderer, &theme, None);
        assert_eq!(
            run(&printer, b"x\n\n", &Syntax::PLAIN),
            format!("{GUTTER_1}x\n{GUTTER_2}\n")
        );
    }

    #[test]
    fn keywords_are_styled() {
        let palette = Palette::new(ColorDepth::TrueColor);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        let rust = Syntax::by_name("rust").unwrap();
        assert_eq!(
            run(&printer, b"fn x\n", rust),
            "\x1b[1;38;2;166;38;164mfn\x1b[0m x\n"
        );
    }

    #[test]
    fn state_is_threaded_within_a_file() {
        let palette = Palette::new(ColorDepth::TrueColor);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        let c = Syntax::by_name("c").unwrap();
        let out = run(&printer, b"/* a\nb */\n", c);
        // #898887 italic on both lines.
        let comment = "\x1b[3;38;2;137;136;135m";
        assert_eq!(out, format!("{comment}/* a\x1b[0m\n{comment}b */\x1b[0m\n"));
    }

    // ── Files ───────────────────────────────────────────────────────────

    #[test]
    fn syntax_detected_per_file() {
        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);
        assert_eq!(printer.syntax_for(&Input::File("x.py".into())).name, "Python");
        assert!(printer.syntax_for(&Input::File("README".into())).is_plain());
        assert!(printer.syntax_for(&Input::Stdin).is_plain());

        let forced = Printer::new(AnsiRenderer::new(&palette), &theme, Syntax::by_name("c"));
        assert_eq!(forced.syntax_for(&Input::File("x.py".into())).name, "C");
        assert_eq!(forced.syntax_for(&Input::Stdin).name, "C");
    }

    #[test]
    fn each_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(dir.path(), "a.c", "int x; /* never closed\n");
        let second = write_file(dir.path(), "b.c", "plain words\n");

        let palette = Palette::new(ColorDepth::TrueColor);
        let theme = Theme::default();
        let renderer = AnsiRenderer::new(&palette).with_line_numbers(true);
        let printer = Printer::new(renderer, &theme, None);

        let mut out = Vec::new();
        assert_eq!(printer.print_input(&first, &mut out).unwrap(), 1);
        out.clear();
        assert_eq!(printer.print_input(&second, &mut out).unwrap(), 1);
        // Numbering restarts and nothing is styled as a comment.
        assert_eq!(String::from_utf8(out).unwrap(), format!("{GUTTER_1}plain words\n"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = Input::File(dir.path().join("nope.rs"));

        let palette = Palette::new(ColorDepth::Ansi256);
        let theme = Theme::default();
        let printer = Printer::new(AnsiRenderer::new(&palette), &theme, None);

        let mut out = Vec::new();
        let err = printer.print_input(&input, &mut out).unwrap_err();
        assert!(matches!(err, CatError::Open { .. }));
        assert!(err.to_string().starts_with("could not open "));
        assert!(out.is_empty());
    }

    #[test]
    fn strip_line_ending_cases() {
        for (input, expected) in [
            (&b"a\n"[..], &b"a"[..]),
            (&b"a\r\n"[..], &b"a"[..]),
            (&b"a\r"[..], &b"a\r"[..]),
            (&b"a"[..], &b"a"[..]),
            (&b"\n"[..], &b""[..]),
        ] {
            let mut line = input.to_vec();
            strip_line_ending(&mut line);
            assert_eq!(line, expected);
        }
    }
}
