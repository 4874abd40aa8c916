//! Chart themes.
//!
//! Two built-in themes, `light` and `dark`. The heatmap color ramp starts at
//! the theme background so empty cells dissolve into the page.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Visual theme applied to chart chrome (background, axes, grid, labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name ("light" or "dark").
    pub name: &'static str,
    /// Wrapper background.
    pub background: Rgba,
    /// Title and primary text.
    pub text: Rgba,
    /// Description and secondary text.
    pub muted_text: Rgba,
    /// Grid lines.
    pub grid: Rgba,
    /// Axis lines and tick labels.
    pub axis: Rgba,
    /// Tooltip background.
    pub tooltip_background: Rgba,
    /// Tooltip text.
    pub tooltip_text: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// The light theme (default).
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::WHITE,
            text: Rgba::rgb(34, 34, 34),
            muted_text: Rgba::rgb(119, 119, 119),
            grid: Rgba::rgb(221, 221, 221),
            axis: Rgba::rgb(85, 85, 85),
            tooltip_background: Rgba::rgb(34, 34, 34).with_alpha(230),
            tooltip_text: Rgba::WHITE,
        }
    }

    /// The dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(24, 26, 27),
            text: Rgba::rgb(230, 230, 230),
            muted_text: Rgba::rgb(160, 160, 160),
            grid: Rgba::rgb(60, 64, 67),
            axis: Rgba::rgb(170, 170, 170),
            tooltip_background: Rgba::rgb(245, 245, 245).with_alpha(235),
            tooltip_text: Rgba::rgb(24, 26, 27),
        }
    }

    /// Look a theme up by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTheme`] for anything but `light` or `dark`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            other => Err(Error::UnknownTheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").unwrap(), Theme::light());
        assert_eq!(Theme::from_name("dark").unwrap(), Theme::dark());
        assert!(Theme::from_name("sepia").is_err());
    }

    #[test]
    fn test_default_is_light() {
        assert_eq!(Theme::default().name, "light");
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(Theme::light().background, Theme::dark().background);
    }
}
