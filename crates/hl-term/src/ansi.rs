// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about which codes a span needs — that's the renderer's job.
// This module just knows the byte-level encoding.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to a `Vec<u8>` line buffer.

use std::io::{self, Write};

use crate::render::Attr;

/// Control Sequence Introducer.
pub const CSI: &[u8] = b"\x1b[";

/// Full SGR reset.
pub const RESET: &[u8] = b"\x1b[0m";

/// SGR parameters for the line-number gutter: inverse video, white.
const GUTTER_SGR: &[u8] = b"\x1b[7;37m";

/// Width the line number is right-justified to in the gutter.
pub const GUTTER_WIDTH: usize = 7;

// ─── Reset ───────────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET)
}

// ─── Select Graphic Rendition ────────────────────────────────────────────────

/// SGR codes for text attributes, in emission order.
///
/// Bold, italic, underline, strikethrough. Always this order so output is
/// byte-for-byte reproducible.
pub fn attr_codes(attr: Attr) -> impl Iterator<Item = &'static str> {
    [
        (Attr::BOLD, "1"),
        (Attr::ITALIC, "3"),
        (Attr::UNDERLINE, "4"),
        (Attr::STRIKETHROUGH, "9"),
    ]
    .into_iter()
    .filter(move |(flag, _)| attr.contains(*flag))
    .map(|(_, code)| code)
}

/// Emit one CSI sequence carrying every parameter, semicolon-separated.
///
/// `\x1b[1;4;38;5;196m` for bold + underline + red. Does nothing if
/// `params` is empty.
pub fn sgr<'a>(w: &mut impl Write, params: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
    let mut params = params.into_iter();
    let Some(first) = params.next() else {
        return Ok(());
    };

    w.write_all(CSI)?;
    w.write_all(first.as_bytes())?;
    for param in params {
        w.write_all(b";")?;
        w.write_all(param.as_bytes())?;
    }
    w.write_all(b"m")
}

// ─── Gutter ──────────────────────────────────────────────────────────────────

/// Emit the line-number gutter: inverse video, the 1-based number
/// right-justified to [`GUTTER_WIDTH`], one space, reset.
///
/// Numbers wider than the gutter are written in full, never truncated.
pub fn gutter(w: &mut impl Write, line_number: usize) -> io::Result<()> {
    w.write_all(GUTTER_SGR)?;
    write!(w, "{line_number:>GUTTER_WIDTH$} ")?;
    w.write_all(RESET)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn sgr_empty_emits_nothing() {
        assert_eq!(emit(|w| sgr(w, [] as [&str; 0])), "");
    }

    #[test]
    fn sgr_single() {
        assert_eq!(emit(|w| sgr(w, ["1"])), "\x1b[1m");
    }

    #[test]
    fn sgr_joins_with_semicolons() {
        assert_eq!(
            emit(|w| sgr(w, ["1", "4", "48;5;17", "38;2;1;2;3"])),
            "\x1b[1;4;48;5;17;38;2;1;2;3m"
        );
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attr_codes_empty() {
        assert_eq!(attr_codes(Attr::empty()).count(), 0);
    }

    #[test]
    fn attr_codes_fixed_order() {
        let all = Attr::STRIKETHROUGH | Attr::UNDERLINE | Attr::ITALIC | Attr::BOLD;
        assert_eq!(attr_codes(all).collect::<Vec<_>>(), ["1", "3", "4", "9"]);
    }

    #[test]
    fn attr_codes_subset() {
        let style = Attr::BOLD | Attr::STRIKETHROUGH;
        assert_eq!(attr_codes(style).collect::<Vec<_>>(), ["1", "9"]);
    }

    // ── Gutter ──────────────────────────────────────────────────────────

    #[test]
    fn gutter_right_justifies() {
        assert_eq!(emit(|w| gutter(w, 1)), "\x1b[7;37m      1 \x1b[0m");
        assert_eq!(emit(|w| gutter(w, 1234)), "\x1b[7;37m   1234 \x1b[0m");
    }

    #[test]
    fn gutter_does_not_truncate() {
        assert_eq!(
            emit(|w| gutter(w, 123_456_789)),
            "\x1b[7;37m123456789 \x1b[0m"
        );
    }
}
