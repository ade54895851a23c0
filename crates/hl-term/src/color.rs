// SPDX-License-Identifier: MIT
//
// hl-term color values and the fixed terminal reference tables.
//
// Single-character variable names (r, g, b) are the standard convention in
// color code and match the component names of `Rgb`.
#![allow(clippy::many_single_char_names)]
//
// Themes speak 24-bit sRGB. Terminals speak one of four fixed palettes
// (8, 16, 88, 256 entries) or TrueColor. This module holds the plain value
// type and the reference RGB for every fixed palette slot, as shipped by
// xterm. Matching a theme color to a slot lives in `palette`.

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit sRGB color.
///
/// Small, `Copy`, and totally ordered by component so it can be used as a
/// kd-tree coordinate. Axis 0 is red, 1 is green, 2 is blue.
///
/// ```
/// use hl_term::color::Rgb;
///
/// let orange = Rgb::from_hex(0xff8000);
/// assert_eq!(orange, Rgb::new(255, 128, 0));
/// assert_eq!(orange.axis(1), 128);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` literal.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_hex(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Component along a kd-tree axis. The axis is taken modulo 3.
    #[inline]
    #[must_use]
    pub const fn axis(self, axis: usize) -> u8 {
        match axis % 3 {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    /// Squared Euclidean distance in RGB space.
    ///
    /// The square root is never needed: ordering by squared distance is the
    /// same as ordering by distance. Maximum value is `3 × 255²`, well within
    /// `u32`.
    #[inline]
    #[must_use]
    pub const fn distance_sq(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

// ─── Reference Tables ────────────────────────────────────────────────────────

pub mod table {
    //! Reference RGB values for the fixed terminal palettes.
    //!
    //! The 256-color palette consists of:
    //! - Colors 0–7: Standard colors (black, red, green, yellow, blue, magenta, cyan, white)
    //! - Colors 8–15: Bright variants of the standard colors
    //! - Colors 16–231: A 6×6×6 RGB color cube
    //! - Colors 232–255: A 24-step grayscale ramp
    //!
    //! The 88-color palette shares the first 16 slots, then packs a 4×4×4
    //! cube into 16–79 and an 8-step grayscale ramp into 80–87.

    use super::Rgb;

    /// The standard ANSI-16 palette as RGB values.
    ///
    /// These match the widely-used "xterm" defaults. Individual terminals
    /// may override these, but for nearest-match calculations these provide
    /// a reasonable reference.
    pub const ANSI16: [Rgb; 16] = [
        Rgb::new(0, 0, 0),       // 0: Black
        Rgb::new(205, 0, 0),     // 1: Red
        Rgb::new(0, 205, 0),     // 2: Green
        Rgb::new(205, 205, 0),   // 3: Yellow
        Rgb::new(0, 0, 238),     // 4: Blue
        Rgb::new(205, 0, 205),   // 5: Magenta
        Rgb::new(0, 205, 205),   // 6: Cyan
        Rgb::new(229, 229, 229), // 7: White
        Rgb::new(127, 127, 127), // 8: Bright Black
        Rgb::new(255, 0, 0),     // 9: Bright Red
        Rgb::new(0, 255, 0),     // 10: Bright Green
        Rgb::new(255, 255, 0),   // 11: Bright Yellow
        Rgb::new(92, 92, 255),   // 12: Bright Blue
        Rgb::new(255, 0, 255),   // 13: Bright Magenta
        Rgb::new(0, 255, 255),   // 14: Bright Cyan
        Rgb::new(255, 255, 255), // 15: Bright White
    ];

    /// Levels of the 6×6×6 cube in the 256-color palette.
    const CUBE6: [u8; 6] = [0, 95, 135, 175, 215, 255];

    /// Levels of the 4×4×4 cube in the 88-color palette.
    const CUBE4: [u8; 4] = [0, 139, 205, 255];

    /// Grayscale ramp of the 88-color palette (indices 80–87).
    const GRAY8: [u8; 8] = [46, 92, 115, 139, 162, 185, 208, 231];

    /// Convert an ANSI-256 palette index to RGB.
    #[must_use]
    pub const fn ansi256(idx: u8) -> Rgb {
        match idx {
            0..=15 => ANSI16[idx as usize],
            16..=231 => {
                let i = idx - 16;
                Rgb::new(
                    CUBE6[(i / 36) as usize],
                    CUBE6[((i % 36) / 6) as usize],
                    CUBE6[(i % 6) as usize],
                )
            }
            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                Rgb::new(v, v, v)
            }
        }
    }

    /// Convert an ANSI-88 palette index to RGB.
    ///
    /// Returns `None` for indices past 87.
    #[must_use]
    pub const fn ansi88(idx: u8) -> Option<Rgb> {
        match idx {
            0..=15 => Some(ANSI16[idx as usize]),
            16..=79 => {
                let i = idx - 16;
                Some(Rgb::new(
                    CUBE4[(i / 16) as usize],
                    CUBE4[((i % 16) / 4) as usize],
                    CUBE4[(i % 4) as usize],
                ))
            }
            80..=87 => {
                let v = GRAY8[(idx - 80) as usize];
                Some(Rgb::new(v, v, v))
            }
            _ => None,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_hex_unpacks_components() {
        assert_eq!(Rgb::from_hex(0x12_34_56), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::from_hex(0xffffff), Rgb::WHITE);
        assert_eq!(Rgb::from_hex(0), Rgb::BLACK);
    }

    #[test]
    fn axis_cycles_rgb() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(c.axis(0), 1);
        assert_eq!(c.axis(1), 2);
        assert_eq!(c.axis(2), 3);
        assert_eq!(c.axis(3), 1);
        assert_eq!(c.axis(7), 2);
    }

    #[test]
    fn distance_is_symmetric_and_squared() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(13, 16, 30);
        assert_eq!(a.distance_sq(b), 9 + 16);
        assert_eq!(b.distance_sq(a), 25);
        assert_eq!(a.distance_sq(a), 0);
    }

    #[test]
    fn distance_extremes_fit() {
        assert_eq!(Rgb::BLACK.distance_sq(Rgb::WHITE), 3 * 255 * 255);
    }

    #[test]
    fn debug_is_hex() {
        assert_eq!(format!("{:?}", Rgb::new(255, 128, 0)), "#ff8000");
        assert_eq!(Rgb::new(0, 10, 1).to_string(), "#000a01");
    }

    // ── Tables ──────────────────────────────────────────────────────────

    #[test]
    fn ansi256_system_colors() {
        assert_eq!(table::ansi256(0), Rgb::BLACK);
        assert_eq!(table::ansi256(9), Rgb::new(255, 0, 0));
        assert_eq!(table::ansi256(15), Rgb::WHITE);
    }

    #[test]
    fn ansi256_cube_corners() {
        assert_eq!(table::ansi256(16), Rgb::BLACK);
        assert_eq!(table::ansi256(196), Rgb::new(255, 0, 0));
        assert_eq!(table::ansi256(231), Rgb::WHITE);
        assert_eq!(table::ansi256(17), Rgb::new(0, 0, 95));
    }

    #[test]
    fn ansi256_gray_ramp() {
        assert_eq!(table::ansi256(232), Rgb::new(8, 8, 8));
        assert_eq!(table::ansi256(255), Rgb::new(238, 238, 238));
    }

    #[test]
    fn ansi88_layout() {
        assert_eq!(table::ansi88(1), Some(table::ANSI16[1]));
        assert_eq!(table::ansi88(16), Some(Rgb::BLACK));
        assert_eq!(table::ansi88(79), Some(Rgb::WHITE));
        assert_eq!(table::ansi88(64), Some(Rgb::new(255, 0, 0)));
        assert_eq!(table::ansi88(80), Some(Rgb::new(46, 46, 46)));
        assert_eq!(table::ansi88(87), Some(Rgb::new(231, 231, 231)));
        assert_eq!(table::ansi88(88), None);
    }
}
