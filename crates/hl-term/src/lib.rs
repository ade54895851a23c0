// SPDX-License-Identifier: MIT
//
// hl-term — Terminal color layer for hlcat.
//
// Turns styled spans of source text into ANSI SGR byte streams. Theme
// colors arrive as arbitrary 24-bit RGB; terminals support anywhere from
// 8 colors to full TrueColor. The palette module bridges the two with a
// kd-tree nearest-color search over each fixed terminal table, and the
// render module merges attributes and colors into a single escape
// introducer per span.
//
// Nothing here touches the terminal directly. Every function writes to an
// `impl Write`, so the same bytes can go to stdout or a pager pipe.

pub mod ansi;
pub mod color;
pub mod palette;
pub mod render;

pub use color::Rgb;
pub use palette::{ColorChoice, ColorDepth, Palette};
pub use render::{AnsiRenderer, Attr, Style, StyleSpan};
