//! Rasterization: primitives and the scene renderer.

mod primitives;
mod raster;

pub use primitives::{draw_line, draw_line_aa, fill_circle, fill_polygon};
pub use raster::rasterize;
