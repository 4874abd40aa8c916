//! # chartkit
//!
//! Declarative interactive charting: fluent chart builders, a shared
//! render/update/resize lifecycle over a retained vector scene, and
//! cross-cutting legend / tooltip / annotation / hover modules.
//!
//! Charts are configuration objects. Setters consume and return the builder;
//! `render()` produces a scene that encodes to SVG or rasterizes to PNG, and
//! pointer events drive hover emphasis, tooltips, legend toggling, and
//! annotations against that same scene.
//!
//! ## Quick start
//!
//! ```
//! use chartkit::chart::LineChart;
//! use chartkit::series::Series;
//!
//! let mut chart = LineChart::new()
//!     .title("Requests")
//!     .dimensions(800.0, 500.0)
//!     .data(vec![Series::new("api", &[(0.0, 10.0), (3_600_000.0, 14.0)])]);
//! let scene = chart.render()?;
//! assert!(scene.shapes.iter().any(|s| s.role == chartkit::scene::Role::LinePath));
//! # Ok::<(), chartkit::Error>(())
//! ```
//!
//! Chart types: area (stacked / streamed / expanded), bar (grouped / stacked
//! / expanded), discrete bar, line (focus and index modes), pie / donut,
//! scatter, heatmap, and table.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in library code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and categorical palettes.
pub mod color;

/// Geometric primitives (points, lines, rectangles).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Value and time formatting.
pub mod format;

/// Series data model.
pub mod series;

/// Stacking layouts.
pub mod stack;

/// Chart themes.
pub mod theme;

/// Axis tick layout and drawing.
pub mod axis;

/// Retained scenes and hit testing.
pub mod scene;

// ============================================================================
// Chart Modules
// ============================================================================

/// Chart types and the shared configuration surface.
pub mod chart;

/// Legend: series keys with visibility toggling.
pub mod legend;

/// Floating tooltip state and placement.
pub mod tooltip;

/// Hover interaction (fade and bolden).
pub mod interact;

/// User-drawn rectangular annotations.
pub mod annotate;

/// Transition orchestration (scene interpolation).
pub mod transition;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Rasterization primitives and the scene renderer.
pub mod render;

/// Output encoders (SVG, PNG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for chartkit operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```
/// use chartkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotate::AnnotationConfig;
    pub use crate::chart::{
        AreaChart, BarChart, Column, DiscreteBarChart, Domain, Event, HeatmapChart, Interpolate,
        LineChart, Margin, PieChart, ScatterChart, SortDirection, TableChart, Threshold,
    };
    pub use crate::color::Rgba;
    pub use crate::error::{Error, Result};
    pub use crate::format::TickFormat;
    pub use crate::geometry::{Point, Rect};
    pub use crate::output::{PngEncoder, SvgEncoder};
    pub use crate::scene::Scene;
    pub use crate::series::{DataPoint, Series};
    pub use crate::theme::Theme;
}
