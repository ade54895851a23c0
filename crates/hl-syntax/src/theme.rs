//! Color themes — one [`Style`] per [`TokenKind`].
//!
//! Themes are static tables in 24-bit color. Quantizing to what the
//! terminal can show happens later, in `hl_term::Palette`. `Normal` text is
//! always plain in the built-in themes so the terminal's own foreground
//! shows through and unstyled runs cost no escape codes.

use hl_term::color::Rgb;
use hl_term::render::{Attr, Style};

use crate::tokenizer::TokenKind;

/// A named style table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Designed for a dark terminal background.
    pub dark: bool,
    styles: [Style; TokenKind::COUNT],
}

impl Theme {
    /// Build a theme from styles listed in [`TokenKind::ALL`] order.
    #[must_use]
    pub const fn new(name: &'static str, dark: bool, styles: [Style; TokenKind::COUNT]) -> Self {
        Self { name, dark, styles }
    }

    /// Style for a token kind.
    #[inline]
    #[must_use]
    pub const fn style(&self, kind: TokenKind) -> Style {
        self.styles[kind.index()]
    }

    /// Look up a built-in theme by name, ignoring case.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// The default theme for a light or dark background.
    #[must_use]
    pub fn default_for(dark: bool) -> &'static Self {
        if dark { &THEMES[1] } else { &THEMES[0] }
    }

    /// All built-in themes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &THEMES
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_for(false).clone()
    }
}

// ---------------------------------------------------------------------------
// Built-in themes
// ---------------------------------------------------------------------------

const fn fg(hex: u32) -> Style {
    Style::fg(Rgb::from_hex(hex))
}

const fn bold(hex: u32) -> Style {
    fg(hex).with_attrs(Attr::BOLD)
}

const fn italic(hex: u32) -> Style {
    fg(hex).with_attrs(Attr::ITALIC)
}

// Order: normal, keyword, type, constant, number, string, comment, meta,
// function.

static THEMES: [Theme; 4] = [
    Theme::new(
        "light",
        false,
        [
            Style::PLAIN,
            bold(0xa6_26_a4),
            fg(0xc1_84_01),
            fg(0x98_68_01),
            fg(0x98_68_01),
            fg(0x50_a1_4f),
            italic(0x89_88_87),
            fg(0xe4_56_49),
            fg(0x40_78_f2),
        ],
    ),
    Theme::new(
        "dark",
        true,
        [
            Style::PLAIN,
            bold(0xc6_78_dd),
            fg(0xe5_c0_7b),
            fg(0xd1_9a_66),
            fg(0xd1_9a_66),
            fg(0x98_c3_79),
            italic(0x7f_84_8e),
            fg(0xe0_6c_75),
            fg(0x61_af_ef),
        ],
    ),
    Theme::new(
        "solarized-light",
        false,
        [
            Style::PLAIN,
            fg(0x85_99_00),
            fg(0xb5_89_00),
            fg(0x6c_71_c4),
            fg(0xd3_36_82),
            fg(0x2a_a1_98),
            italic(0x93_a1_a1),
            fg(0xcb_4b_16),
            fg(0x26_8b_d2),
        ],
    ),
    Theme::new(
        "solarized-dark",
        true,
        [
            Style::PLAIN,
            fg(0x85_99_00),
            fg(0xb5_89_00),
            fg(0x6c_71_c4),
            fg(0xd3_36_82),
            fg(0x2a_a1_98),
            italic(0x58_6e_75),
            fg(0xcb_4b_16),
            fg(0x26_8b_d2),
        ],
    ),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
