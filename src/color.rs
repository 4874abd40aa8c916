//! Color types, hex parsing, and categorical palettes.
//!
//! Series colors are assigned from a categorical palette keyed by a hash of
//! the series name, so a series keeps its color across renders regardless of
//! the order it arrives in.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Steel blue, the upper stop of the default heatmap ramp.
    pub const STEEL_BLUE: Self = Self::rgb(70, 130, 180);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Parse a `#rgb` or `#rrggbb` hex color string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] when the string is not a hex color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        let parse = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        match digits.len() {
            3 => {
                let r = parse(&digits[0..1])?;
                let g = parse(&digits[1..2])?;
                let b = parse(&digits[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::rgb(
                parse(&digits[0..2])?,
                parse(&digits[2..4])?,
                parse(&digits[4..6])?,
            )),
            _ => Err(Error::InvalidColor(hex.to_string())),
        }
    }

    /// Format as a `#rrggbb` hex string (alpha is carried separately in SVG).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a unit fraction.
    #[must_use]
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f64::from(self.r) * inv_t + f64::from(other.r) * t) as u8,
            (f64::from(self.g) * inv_t + f64::from(other.g) * t) as u8,
            (f64::from(self.b) * inv_t + f64::from(other.b) * t) as u8,
            (f64::from(self.a) * inv_t + f64::from(other.a) * t) as u8,
        )
    }
}

// ============================================================================
// Categorical palette
// ============================================================================

/// The default 20-color categorical palette.
pub const CATEGORY20: [Rgba; 20] = [
    Rgba::rgb(31, 119, 180),
    Rgba::rgb(174, 199, 232),
    Rgba::rgb(255, 127, 14),
    Rgba::rgb(255, 187, 120),
    Rgba::rgb(44, 160, 44),
    Rgba::rgb(152, 223, 138),
    Rgba::rgb(214, 39, 40),
    Rgba::rgb(255, 152, 150),
    Rgba::rgb(148, 103, 189),
    Rgba::rgb(197, 176, 213),
    Rgba::rgb(140, 86, 75),
    Rgba::rgb(196, 156, 148),
    Rgba::rgb(227, 119, 194),
    Rgba::rgb(247, 182, 210),
    Rgba::rgb(127, 127, 127),
    Rgba::rgb(199, 199, 199),
    Rgba::rgb(188, 189, 34),
    Rgba::rgb(219, 219, 141),
    Rgba::rgb(23, 190, 207),
    Rgba::rgb(158, 218, 229),
];

/// Hash a string key to a stable non-negative code.
///
/// Same recurrence as Java's `String::hashCode`, folded to an absolute value,
/// so a series key maps to the same palette slot in every render.
#[must_use]
pub fn string_hash(key: &str) -> u32 {
    let mut hash: i32 = 0;
    for ch in key.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(ch as i32);
    }
    hash.unsigned_abs()
}

/// Ordinal color assignment over a fixed palette.
///
/// Distinct keys claim palette slots in first-seen order; repeated keys get
/// their original color back. Charts feed [`string_hash`] of the series key,
/// so assignment survives re-renders and series reordering within a chart.
#[derive(Debug, Clone)]
pub struct CategoryScale {
    palette: Vec<Rgba>,
    assigned: HashMap<u32, usize>,
}

impl Default for CategoryScale {
    fn default() -> Self {
        Self::new(CATEGORY20.to_vec())
    }
}

impl CategoryScale {
    /// Create a scale over a custom palette. An empty palette falls back to
    /// the default.
    #[must_use]
    pub fn new(palette: Vec<Rgba>) -> Self {
        let palette = if palette.is_empty() {
            CATEGORY20.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Color for a hashed key, assigning a new slot on first sight.
    pub fn color(&mut self, key_hash: u32) -> Rgba {
        let next = self.assigned.len() % self.palette.len();
        let slot = *self.assigned.entry(key_hash).or_insert(next);
        self.palette[slot % self.palette.len()]
    }

    /// Color for a string key.
    pub fn color_for(&mut self, key: &str) -> Rgba {
        self.color(string_hash(key))
    }

    /// Forget all assignments (used when a chart swaps palettes).
    pub fn reset(&mut self) {
        self.assigned.clear();
    }
}
