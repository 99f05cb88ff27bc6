//! Cosmetic colour tags
//!
//! Colours never affect gameplay. Block hues walk around the colour wheel
//! by level; the backdrop gradient is a pure function of stack height so
//! the presentation layer can recompute it whenever the tower changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_HUE, HUE_STEP};

/// An HSL colour (hue in degrees, saturation and lightness in percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue: hue % 360,
            saturation,
            lightness,
        }
    }

    /// Convert to linear-ish RGB in [0, 1] for renderers that want floats
    pub fn to_rgb(self) -> [f32; 3] {
        let s = self.saturation.min(100) as f32 / 100.0;
        let l = self.lightness.min(100) as f32 / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.hue as f32 / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());

        let (r, g, b) = match self.hue / 60 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let m = l - c / 2.0;
        [r + m, g + m, b + m]
    }
}

impl Default for Hsl {
    fn default() -> Self {
        block_color(0)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Hue for a tower level
#[inline]
pub fn level_hue(level: u32) -> u16 {
    ((BASE_HUE as u64 + level as u64 * HUE_STEP as u64) % 360) as u16
}

/// Colour tag of the block occupying `level` (0 = base)
pub fn block_color(level: u32) -> Hsl {
    Hsl::new(level_hue(level), 80, 60)
}

/// Two-stop radial backdrop, brighter at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backdrop {
    pub top: Hsl,
    pub bottom: Hsl,
}

/// Backdrop for a tower of `stack_len` blocks, keyed on the top block's level
pub fn backdrop(stack_len: usize) -> Backdrop {
    let hue = level_hue(stack_len.saturating_sub(1) as u32);
    Backdrop {
        top: Hsl::new(hue, 40, 20),
        bottom: Hsl::new((hue + 40) % 360, 40, 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_color_walks_hue() {
        assert_eq!(block_color(0).hue, 200);
        assert_eq!(block_color(1).hue, 206);
        // 200 + 27 * 6 = 362 -> wraps
        assert_eq!(block_color(27).hue, 2);
    }

    #[test]
    fn test_backdrop_tracks_top_block() {
        let b = backdrop(1);
        assert_eq!(b.top, Hsl::new(200, 40, 20));
        assert_eq!(b.bottom, Hsl::new(240, 40, 10));

        // Empty tower falls back to the base hue
        assert_eq!(backdrop(0), backdrop(1));
        assert_eq!(backdrop(3).top.hue, 212);
    }

    #[test]
    fn test_display_css() {
        assert_eq!(block_color(0).to_string(), "hsl(200, 80%, 60%)");
    }

    #[test]
    fn test_to_rgb_primaries() {
        let red = Hsl::new(0, 100, 50).to_rgb();
        assert!((red[0] - 1.0).abs() < 1e-5);
        assert!(red[1].abs() < 1e-5 && red[2].abs() < 1e-5);

        let grey = Hsl::new(123, 0, 50).to_rgb();
        for channel in grey {
            assert!((channel - 0.5).abs() < 1e-5);
        }
    }
}
