//! Highlighting — tokens mapped through a theme into renderable spans.
//!
//! [`Highlighter`] is what the binary drives: one per file, one call per
//! line, threading the returned [`LineState`] into the next call. The
//! output is a list of [`StyleSpan`]s ready for `hl_term::AnsiRenderer`.
//!
//! A highlighter that cannot build its tokenizer does not fail. It logs a
//! warning and renders every line as plain text, the same as the `Plain`
//! syntax.

use hl_term::render::StyleSpan;
use tracing::warn;

use crate::syntax::Syntax;
use crate::theme::Theme;
use crate::tokenizer::{LineState, TokenKind, Tokenizer};

/// Per-file highlighter.
#[derive(Debug)]
pub struct Highlighter<'t> {
    syntax: &'static Syntax,
    /// `None` for plain text, or when the tokenizer failed to build.
    tokenizer: Option<Tokenizer>,
    theme: &'t Theme,
}

impl<'t> Highlighter<'t> {
    #[must_use]
    pub fn new(syntax: &'static Syntax, theme: &'t Theme) -> Self {
        let tokenizer = if syntax.is_plain() {
            None
        } else {
            Tokenizer::new(syntax)
                .map_err(|err| {
                    warn!(syntax = syntax.name, %err, "tokenizer unavailable, highlighting as plain text");
                })
                .ok()
        };
        Self {
            syntax,
            tokenizer,
            theme,
        }
    }

    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> &'static Syntax {
        self.syntax
    }

    #[inline]
    #[must_use]
    pub const fn theme(&self) -> &'t Theme {
        self.theme
    }

    /// Whether lines come out as a single unstyled span.
    #[inline]
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.tokenizer.is_none()
    }

    /// Highlight one line (without its terminator) starting in `state`.
    ///
    /// Spans cover the line contiguously. Returns the state for the next
    /// line.
    #[must_use]
    pub fn highlight_line(&self, line: &str, state: LineState) -> (Vec<StyleSpan>, LineState) {
        let Some(tokenizer) = &self.tokenizer else {
            let spans = if line.is_empty() {
                Vec::new()
            } else {
                vec![StyleSpan::new(0, line.len(), self.theme.style(TokenKind::Normal))]
            };
            return (spans, LineState::default());
        };

        let (tokens, next) = tokenizer.tokenize(line, state);
        let spans = tokens
            .iter()
            .map(|tok| StyleSpan::new(tok.offset, tok.len, self.theme.style(tok.kind)))
            .collect();
        (spans, next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
