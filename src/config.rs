// SPDX-License-Identifier: MIT
//
// Command line and environment.
//
// `Args` is what clap parses. `Settings` is what the rest of the program
// uses, and `Settings::resolve` is the only place the two meet. It takes
// the environment as a lookup closure rather than reading it, so every
// precedence rule below is testable without touching the process env.
//
// Precedence, highest first:
//
//   theme   -T NAME  >  HLCAT_THEME  >  -k  >  -L  >  HLCAT_DARK  >  light
//   syntax  -S LANG (unknown names mean plain)  >  detected per file
//   pager   -p  or a non-empty HLCAT_PAGER
//   numbers -n  or a truthy HLCAT_NUMBER
//   colors  -C DEPTH, `auto` consulting COLORTERM and TERM
//
// `--theme-list` and `--syntax-list` short-circuit all of it: see `Listing`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use hl_pager::PagerCommand;
use hl_syntax::{Syntax, Theme};
use hl_term::{ColorChoice, ColorDepth};
use tracing::warn;

// ─── Args ────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "hlcat",
    version,
    about = "Print files with syntax highlighting",
    after_help = "Environment:\n  \
        HLCAT_DARK     truthy selects the dark theme by default\n  \
        HLCAT_NUMBER   truthy enables line numbering (-n) by default\n  \
        HLCAT_PAGER    pager program; enables paging (-p) by default\n  \
        HLCAT_THEME    default theme name\n  \
        HLCAT_LOG      log filter (default: warn)\n  \
        PAGER          fallback pager program (default: less)"
)]
pub struct Args {
    /// Files to print. `-` or no files reads standard input.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Send output through a pager.
    #[arg(short, long)]
    pub pager: bool,

    /// Number output lines.
    #[arg(short, long)]
    pub number: bool,

    /// Use the default dark theme. Wins over --light.
    #[arg(short = 'k', long)]
    pub dark: bool,

    /// Use the default light theme.
    #[arg(short = 'L', long)]
    pub light: bool,

    /// Theme by name: light, dark, solarized-light, solarized-dark.
    #[arg(short = 'T', long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Force a syntax instead of detecting it from each file name.
    #[arg(short = 'S', long, value_name = "LANG")]
    pub syntax: Option<String>,

    /// Color palette: 8, 16, 88, 256, true, or auto.
    #[arg(short = 'C', long, value_name = "DEPTH", default_value = "auto")]
    pub colors: ColorChoice,

    /// List the built-in themes and exit.
    #[arg(long)]
    pub theme_list: bool,

    /// List the built-in syntax definitions and exit.
    #[arg(long)]
    pub syntax_list: bool,
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// A request to print built-in names instead of highlighting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Themes,
    Syntaxes,
}

impl Listing {
    /// The listing `args` asks for. Themes win when both flags are given.
    #[must_use]
    pub const fn requested(args: &Args) -> Option<Self> {
        if args.theme_list {
            Some(Self::Themes)
        } else if args.syntax_list {
            Some(Self::Syntaxes)
        } else {
            None
        }
    }

    /// Names in case-insensitive order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = match self {
            Self::Themes => Theme::all().iter().map(|t| t.name).collect(),
            Self::Syntaxes => Syntax::all().iter().map(|s| s.name).collect(),
        };
        names.sort_by_cached_key(|name| name.to_ascii_lowercase());
        names
    }

    /// Write the heading and one `  - name` line per entry.
    pub fn write(self, w: &mut impl Write) -> io::Result<()> {
        let heading = match self {
            Self::Themes => "Supported themes:",
            Self::Syntaxes => "Supported syntax definitions:",
        };
        writeln!(w, "{heading}")?;
        for name in self.names() {
            writeln!(w, "  - {name}")?;
        }
        w.flush()
    }
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// One thing to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(path: PathBuf) -> Self {
        if path == Path::new("-") {
            Self::Stdin
        } else {
            Self::File(path)
        }
    }

    /// Name for messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug)]
pub struct Settings {
    pub inputs: Vec<Input>,
    /// `Some` when output should be paged.
    pub pager: Option<PagerCommand>,
    pub line_numbers: bool,
    pub theme: &'static Theme,
    /// Forced syntax; `None` detects per file.
    pub syntax: Option<&'static Syntax>,
    pub depth: ColorDepth,
}

impl Settings {
    /// Combine parsed arguments with the environment.
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let inputs = if args.files.is_empty() {
            vec![Input::Stdin]
        } else {
            args.files.into_iter().map(Input::from_arg).collect()
        };

        let paging = args.pager || lookup("HLCAT_PAGER").is_some_and(|v| !v.is_empty());
        let pager = paging.then(|| PagerCommand::from_env(&lookup));

        let line_numbers = args.number || env_flag(lookup("HLCAT_NUMBER").as_deref());

        let theme = resolve_theme(
            args.theme.as_deref(),
            args.dark,
            args.light,
            &lookup,
        );

        let syntax = args.syntax.as_deref().map(|name| {
            Syntax::by_name(name).unwrap_or_else(|| {
                warn!(syntax = name, "unknown syntax, highlighting nothing");
                &Syntax::PLAIN
            })
        });

        let depth = args.colors.resolve(&lookup);

        Self {
            inputs,
            pager,
            line_numbers,
            theme,
            syntax,
            depth,
        }
    }
}

fn resolve_theme(
    requested: Option<&str>,
    dark: bool,
    light: bool,
    lookup: impl Fn(&str) -> Option<String>,
) -> &'static Theme {
    if let Some(name) = requested {
        match Theme::by_name(name) {
            Some(theme) => return theme,
            None => warn!(theme = name, "unknown theme"),
        }
    }
    if let Some(name) = lookup("HLCAT_THEME").filter(|v| !v.is_empty()) {
        match Theme::by_name(&name) {
            Some(theme) => return theme,
            None => warn!(theme = %name, "unknown theme in HLCAT_THEME"),
        }
    }
    let env_dark = env_flag(lookup("HLCAT_DARK").as_deref());
    Theme::default_for(dark || (env_dark && !light))
}

/// Boolean environment value: false when unset, empty, `0`, `f` or `false`
/// (any case), true otherwise.
fn env_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("f") || v.eq_ignore_ascii_case("false"))
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
