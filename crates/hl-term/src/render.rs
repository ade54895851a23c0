// SPDX-License-Identifier: MIT
//
// Span rendering — styled spans of one line in, ANSI bytes out.
//
// The tokenizer hands us a line and an ordered list of (offset, length,
// style) spans. Each span becomes either its raw text (plain style) or
//
//   ESC[ <attrs> ; <bg> ; <fg> m  text  ESC[0m
//
// with every active code merged into a single introducer. Attributes come
// first in a fixed order (bold 1, italic 3, underline 4, strikethrough 9),
// then the background fragment, then the foreground fragment. Colors go
// through the `Palette`, so the same spans render correctly on anything
// from an 8-color console to a TrueColor terminal.
//
// Every span is closed with a full reset. That costs a few bytes per token
// but means no state leaks between spans, between lines, or into a pager
// that gets killed halfway through.

use std::io::{self, Write};

use crate::ansi;
use crate::color::Rgb;
use crate::palette::Palette;

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// Each flag maps to one SGR parameter. Combine with bitwise OR:
    ///
    /// ```
    /// use hl_term::render::Attr;
    ///
    /// let style = Attr::BOLD | Attr::ITALIC;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::UNDERLINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD          = 1 << 0;
        /// SGR 3 — italic or oblique.
        const ITALIC        = 1 << 1;
        /// SGR 4 — single underline.
        const UNDERLINE     = 1 << 2;
        /// SGR 9 — crossed-out text.
        const STRIKETHROUGH = 1 << 3;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Visual style of a span: attributes plus optional colors.
///
/// `None` colors leave the terminal's own foreground/background in place.
/// The all-default style is "plain" and renders as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub attrs: Attr,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Style {
    /// No attributes, terminal default colors.
    pub const PLAIN: Self = Self {
        attrs: Attr::empty(),
        fg: None,
        bg: None,
    };

    /// Plain style with a foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..Self::PLAIN
        }
    }

    /// Return a copy with a background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, color: Rgb) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Return a copy with additional attributes.
    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self {
            attrs: self.attrs.union(attrs),
            ..self
        }
    }

    /// Whether this style needs no escape codes at all.
    #[inline]
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.attrs.is_empty() && self.fg.is_none() && self.bg.is_none()
    }
}

// ─── StyleSpan ───────────────────────────────────────────────────────────────

/// A contiguous run of one line sharing a style.
///
/// `offset` and `len` are byte positions in the line's UTF-8 text. A span
/// with `len == 0` is legal and renders to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpan {
    pub offset: usize,
    pub len: usize,
    pub style: Style,
}

impl StyleSpan {
    #[inline]
    #[must_use]
    pub const fn new(offset: usize, len: usize, style: Style) -> Self {
        Self { offset, len, style }
    }

    /// The byte range this span covers within a line of `line_len` bytes.
    ///
    /// Clamped to the line, so the range may be empty.
    #[must_use]
    pub fn clamped(&self, line_len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(line_len);
        let end = self.offset.saturating_add(self.len).min(line_len);
        start..end
    }
}

// ─── AnsiRenderer ────────────────────────────────────────────────────────────

/// Renders styled lines as ANSI byte streams.
///
/// Borrows the palette it quantizes through; the palette compiles its
/// lookup tree on the first colored span and is reused for every line.
///
/// ```
/// use hl_term::color::Rgb;
/// use hl_term::palette::{ColorDepth, Palette};
/// use hl_term::render::{AnsiRenderer, Attr, Style, StyleSpan};
///
/// let palette = Palette::new(ColorDepth::Ansi16);
/// let renderer = AnsiRenderer::new(&palette);
///
/// let bold_red = Style::fg(Rgb::new(255, 0, 0)).with_attrs(Attr::BOLD);
/// let mut out = Vec::new();
/// renderer.render_span(&mut out, "x", &StyleSpan::new(0, 1, bold_red))?;
/// assert_eq!(out, b"\x1b[1;91mx\x1b[0m");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AnsiRenderer<'p> {
    palette: &'p Palette,
    line_numbers: bool,
}

impl<'p> AnsiRenderer<'p> {
    /// Create a renderer without a line-number gutter.
    #[must_use]
    pub const fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            line_numbers: false,
        }
    }

    /// Enable or disable the line-number gutter.
    #[must_use]
    pub const fn with_line_numbers(self, enabled: bool) -> Self {
        Self {
            line_numbers: enabled,
            ..self
        }
    }

    /// The palette colors are quantized through.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &'p Palette {
        self.palette
    }

    /// Render one span of `line`.
    ///
    /// Plain spans are copied verbatim. Styled spans get exactly one SGR
    /// introducer and one reset. Empty spans (zero length, or entirely past
    /// the end of the line) write nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn render_span(&self, w: &mut impl Write, line: &str, span: &StyleSpan) -> io::Result<()> {
        if span.len == 0 {
            return Ok(());
        }
        let range = span.clamped(line.len());
        if range.is_empty() {
            return Ok(());
        }
        let text = &line.as_bytes()[range];

        let style = &span.style;
        if style.is_plain() {
            return w.write_all(text);
        }

        let bg = style.bg.map(|c| self.palette.background(c));
        let fg = style.fg.map(|c| self.palette.foreground(c));

        let mut params: Vec<&str> = ansi::attr_codes(style.attrs).collect();
        params.extend(bg.as_deref());
        params.extend(fg.as_deref());

        ansi::sgr(w, params)?;
        w.write_all(text)?;
        ansi::reset(w)
    }

    /// Render a full line: optional gutter, every span in order, newline.
    ///
    /// `line_number` is 1-based and only used when the gutter is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn render_line(
        &self,
        w: &mut impl Write,
        line_number: usize,
        line: &str,
        spans: &[StyleSpan],
    ) -> io::Result<()> {
        if self.line_numbers {
            ansi::gutter(w, line_number)?;
        }
        for span in spans {
            self.render_span(w, line, span)?;
        }
        w.write_all(b"\n")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
