// SPDX-License-Identifier: MIT
//
// Palette quantization — map any 24-bit color onto what the terminal has.
//
// Each fixed-depth palette (8, 16, 88, 256) is a table of reference colors,
// each carrying the SGR fragments that select it. On first use the table is
// compiled into a kd-tree over RGB space; every lookup after that is a
// nearest-neighbor search with squared Euclidean distance. TrueColor skips
// the tree entirely and formats the RGB triple straight into the fragment.
//
// Compilation happens exactly once per `Palette` value through a `OnceLock`,
// so a shared `&Palette` can be queried from any number of threads. There
// are no process-wide palette singletons: the caller builds one `Palette`
// for the chosen depth and hands it to the renderer.
//
// Split rule: at depth d the remaining entries are stable-sorted on axis
// d mod 3 (R, G, B), ties broken by table index, and the entry at len/2
// becomes the node. Everything before it goes left, everything after goes
// right. This only decides the tree's shape and which of several
// equidistant entries wins; the nearest distance is always exact.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

use crate::color::{Rgb, table};

// ─── ColorDepth ──────────────────────────────────────────────────────────────

/// How many colors the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    /// The eight standard ANSI colors (SGR 30–37 / 40–47).
    Ansi8,
    /// Standard plus bright colors (adds SGR 90–97 / 100–107).
    Ansi16,
    /// The xterm 88-color palette (`38;5;N`).
    Ansi88,
    /// The xterm 256-color palette (`38;5;N`).
    Ansi256,
    /// Direct 24-bit color (`38;2;R;G;B`).
    TrueColor,
}

impl ColorDepth {
    /// All depths, from least to most capable.
    pub const ALL: [Self; 5] = [
        Self::Ansi8,
        Self::Ansi16,
        Self::Ansi88,
        Self::Ansi256,
        Self::TrueColor,
    ];

    /// The name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ansi8 => "8",
            Self::Ansi16 => "16",
            Self::Ansi88 => "88",
            Self::Ansi256 => "256",
            Self::TrueColor => "true",
        }
    }

    /// Guess the depth from the terminal's `TERM` and `COLORTERM` values.
    ///
    /// Terminals routinely lie about what they are, so this is a best guess:
    ///
    /// - `COLORTERM=truecolor` → TrueColor
    /// - empty `TERM` (cmd.exe, dumb pipes) → 8
    /// - `linux`, `aterm` → 8
    /// - `xterm*` without a `256color` suffix → 16
    /// - `rxvt*` without a `256color` suffix → 88
    /// - anything else → 256
    #[must_use]
    pub fn detect(term: &str, colorterm: &str) -> Self {
        if colorterm == "truecolor" {
            Self::TrueColor
        } else if term.is_empty() || term == "linux" || term == "aterm" {
            Self::Ansi8
        } else if term.starts_with("xterm") && !term.ends_with("256color") {
            Self::Ansi16
        } else if term.starts_with("rxvt") && !term.ends_with("256color") {
            Self::Ansi88
        } else {
            Self::Ansi256
        }
    }

    /// [`detect`](Self::detect) using an environment lookup.
    ///
    /// Unset variables count as empty.
    #[must_use]
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let term = lookup("TERM").unwrap_or_default();
        let colorterm = lookup("COLORTERM").unwrap_or_default();
        Self::detect(&term, &colorterm)
    }
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color option that is not one of `8, 16, 88, 256, true, auto`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color option: {0} (supported values are: 8, 16, 88, 256, true, auto)")]
pub struct ParseColorError(String);

impl FromStr for ColorDepth {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|depth| depth.name() == s)
            .ok_or_else(|| ParseColorError(s.to_owned()))
    }
}

// ─── ColorChoice ─────────────────────────────────────────────────────────────

/// The user's palette selection: a fixed depth, or detect from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Fixed(ColorDepth),
}

impl ColorChoice {
    /// Resolve to a concrete depth, consulting the environment for `Auto`.
    #[must_use]
    pub fn resolve(self, lookup: impl Fn(&str) -> Option<String>) -> ColorDepth {
        match self {
            Self::Auto => ColorDepth::detect_with(lookup),
            Self::Fixed(depth) => depth,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Fixed)
        }
    }
}

// ─── ColorEntry ──────────────────────────────────────────────────────────────

/// One slot of a fixed palette: its reference color and the SGR fragments
/// that select it as foreground or background.
///
/// Fragments are the bare parameters (`"31"`, `"38;5;196"`), without the
/// `ESC[` introducer or the final `m`, so the renderer can join several of
/// them into a single sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    /// Slot number within its palette.
    pub index: u8,
    /// Reference color the terminal is assumed to show for this slot.
    pub rgb: Rgb,
    fg: String,
    bg: String,
}

impl ColorEntry {
    fn new(index: u8, rgb: Rgb, fg: String, bg: String) -> Self {
        Self { index, rgb, fg, bg }
    }

    /// Foreground SGR fragment.
    #[inline]
    #[must_use]
    pub fn foreground(&self) -> &str {
        &self.fg
    }

    /// Background SGR fragment.
    #[inline]
    #[must_use]
    pub fn background(&self) -> &str {
        &self.bg
    }
}

/// Build the fixed table for a depth. Empty for TrueColor.
fn table_entries(depth: ColorDepth) -> Vec<ColorEntry> {
    match depth {
        ColorDepth::Ansi8 => (0u8..8)
            .map(|i| {
                ColorEntry::new(i, table::ANSI16[usize::from(i)], format!("3{i}"), format!("4{i}"))
            })
            .collect(),
        ColorDepth::Ansi16 => (0u8..16)
            .map(|i| {
                let (fg, bg) = if i < 8 {
                    (30 + u16::from(i), 40 + u16::from(i))
                } else {
                    (82 + u16::from(i), 92 + u16::from(i))
                };
                ColorEntry::new(i, table::ANSI16[usize::from(i)], fg.to_string(), bg.to_string())
            })
            .collect(),
        ColorDepth::Ansi88 => (0u8..88)
            .filter_map(|i| table::ansi88(i).map(|rgb| indexed_entry(i, rgb)))
            .collect(),
        ColorDepth::Ansi256 => (0u8..=255)
            .map(|i| indexed_entry(i, table::ansi256(i)))
            .collect(),
        ColorDepth::TrueColor => Vec::new(),
    }
}

fn indexed_entry(i: u8, rgb: Rgb) -> ColorEntry {
    ColorEntry::new(i, rgb, format!("38;5;{i}"), format!("48;5;{i}"))
}

// ─── PaletteIndex ────────────────────────────────────────────────────────────

/// A kd-tree node. Each node exclusively owns its children.
#[derive(Debug)]
struct Node {
    entry: ColorEntry,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    /// Build a subtree. `entries` must not be empty.
    fn build(mut entries: Vec<ColorEntry>, depth: usize) -> Box<Self> {
        debug_assert!(!entries.is_empty(), "kd-tree subtree built from no entries");

        let axis = depth % 3;
        entries.sort_by_key(|e| (e.rgb.axis(axis), e.index));

        let mid = entries.len() / 2;
        let upper = entries.split_off(mid + 1);
        let entry = entries.remove(mid);
        let lower = entries;

        Box::new(Self {
            entry,
            left: (!lower.is_empty()).then(|| Self::build(lower, depth + 1)),
            right: (!upper.is_empty()).then(|| Self::build(upper, depth + 1)),
        })
    }

    /// Recursive nearest-neighbor search.
    ///
    /// `best` holds the closest entry found so far and its squared distance.
    /// The far subtree is visited only when the splitting plane is no
    /// farther than the current best, so most of the tree is never touched.
    /// Equal distances go to the lower table index.
    fn search<'a>(&'a self, query: Rgb, depth: usize, best: &mut (&'a ColorEntry, u32)) {
        let dist = self.entry.rgb.distance_sq(query);
        if dist < best.1 || (dist == best.1 && self.entry.index < best.0.index) {
            *best = (&self.entry, dist);
        }

        let axis = depth % 3;
        let plane = i32::from(query.axis(axis)) - i32::from(self.entry.rgb.axis(axis));
        let (near, far) = if plane < 0 {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(node) = near {
            node.search(query, depth + 1, best);
        }
        #[allow(clippy::cast_sign_loss)]
        let plane_sq = (plane * plane) as u32;
        // Equal distance can still win on index.
        if plane_sq <= best.1 {
            if let Some(node) = far {
                node.search(query, depth + 1, best);
            }
        }
    }

    fn height(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.height());
        let right = self.right.as_ref().map_or(0, |n| n.height());
        1 + left.max(right)
    }
}

/// A kd-tree over a palette's reference colors.
///
/// Built once, never mutated. Always holds at least one entry, so
/// [`nearest`](Self::nearest) is total.
#[derive(Debug)]
pub struct PaletteIndex {
    root: Box<Node>,
    len: usize,
}

impl PaletteIndex {
    /// Build an index from arbitrary entries.
    ///
    /// Returns `None` when `entries` is empty.
    #[must_use]
    pub fn build(entries: Vec<ColorEntry>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        let len = entries.len();
        Some(Self {
            root: Node::build(entries, 0),
            len,
        })
    }

    /// Number of entries in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: an index holds at least one entry.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Longest root-to-leaf path, counted in nodes.
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// The entry closest to `query` by squared RGB distance.
    #[must_use]
    pub fn nearest(&self, query: Rgb) -> &ColorEntry {
        let mut best = (&self.root.entry, u32::MAX);
        self.root.search(query, 0, &mut best);
        best.0
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────────

/// Color-to-SGR translation for one terminal color depth.
///
/// Fixed depths compile their kd-tree lazily on the first query; TrueColor
/// never builds one. Either way, `foreground` and `background` never fail.
///
/// ```
/// use hl_term::color::Rgb;
/// use hl_term::palette::{ColorDepth, Palette};
///
/// let truecolor = Palette::new(ColorDepth::TrueColor);
/// assert_eq!(truecolor.foreground(Rgb::new(1, 2, 3)), "38;2;1;2;3");
///
/// let ansi16 = Palette::new(ColorDepth::Ansi16);
/// assert_eq!(ansi16.foreground(Rgb::new(250, 10, 10)), "91");
/// assert_eq!(ansi16.background(Rgb::new(250, 10, 10)), "101");
/// ```
#[derive(Debug)]
pub struct Palette {
    depth: ColorDepth,
    index: OnceLock<PaletteIndex>,
}

impl Palette {
    /// Create a palette for `depth`. Nothing is compiled until first use.
    #[must_use]
    pub const fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            index: OnceLock::new(),
        }
    }

    /// The depth this palette targets.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Whether the kd-tree has been built. Always `false` for TrueColor.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.index.get().is_some()
    }

    /// The compiled index, building it on first call. `None` for TrueColor.
    #[must_use]
    pub fn index(&self) -> Option<&PaletteIndex> {
        if self.depth == ColorDepth::TrueColor {
            return None;
        }
        Some(self.index.get_or_init(|| {
            let entries = table_entries(self.depth);
            let len = entries.len();
            let index = PaletteIndex {
                root: Node::build(entries, 0),
                len,
            };
            debug!(
                depth = %self.depth,
                entries = len,
                height = index.height(),
                "compiled palette index"
            );
            index
        }))
    }

    /// The nearest fixed-palette entry. `None` for TrueColor, which has no
    /// table.
    #[must_use]
    pub fn nearest(&self, color: Rgb) -> Option<&ColorEntry> {
        self.index().map(|index| index.nearest(color))
    }

    /// SGR fragment selecting `color` (or its nearest match) as foreground.
    #[must_use]
    pub fn foreground(&self, color: Rgb) -> Cow<'_, str> {
        match self.nearest(color) {
            Some(entry) => Cow::Borrowed(entry.foreground()),
            None => Cow::Owned(format!("38;2;{};{};{}", color.r, color.g, color.b)),
        }
    }

    /// SGR fragment selecting `color` (or its nearest match) as background.
    #[must_use]
    pub fn background(&self, color: Rgb) -> Cow<'_, str> {
        match self.nearest(color) {
            Some(entry) => Cow::Borrowed(entry.background()),
            None => Cow::Owned(format!("48;2;{};{};{}", color.r, color.g, color.b)),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
