//! Scene rasterization.
//!
//! Draws a scene's shapes into a framebuffer in order. Text is vector-only
//! and skipped here; the SVG encoder carries it. Hover emphasis maps to
//! opacity: faded shapes drop to 30%, bolden shapes render fully opaque.

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::scene::{Emphasis, Scene, Shape, ShapeKind};

use super::primitives::{draw_line_aa, fill_circle, fill_polygon};

/// Opacity multiplier for faded shapes.
const FADED_OPACITY: f64 = 0.3;

/// Angular step for arc flattening, in radians.
const ARC_STEP: f64 = 0.05;

/// Rasterize a scene into a fresh framebuffer.
///
/// # Errors
///
/// Returns an error if the scene dimensions do not form a valid framebuffer.
pub fn rasterize(scene: &Scene) -> Result<Framebuffer> {
    let mut fb = Framebuffer::new(scene.width.max(1.0) as u32, scene.height.max(1.0) as u32)?;
    fb.clear(scene.background);

    for shape in &scene.shapes {
        draw_shape(&mut fb, shape);
    }

    Ok(fb)
}

fn effective_alpha(shape: &Shape, color: Rgba) -> Rgba {
    let emphasis_factor = match shape.emphasis {
        Emphasis::Faded => FADED_OPACITY,
        Emphasis::Normal | Emphasis::Bolden => 1.0,
    };
    let alpha = f64::from(color.a) * shape.opacity * emphasis_factor;
    color.with_alpha(alpha.clamp(0.0, 255.0) as u8)
}

fn draw_shape(fb: &mut Framebuffer, shape: &Shape) {
    match &shape.kind {
        ShapeKind::Rect {
            rect,
            fill,
            stroke,
            ..
        } => {
            if let Some(fill) = fill {
                fill_polygon(
                    fb,
                    &[
                        Point::new(rect.x, rect.y),
                        Point::new(rect.right(), rect.y),
                        Point::new(rect.right(), rect.bottom()),
                        Point::new(rect.x, rect.bottom()),
                    ],
                    effective_alpha(shape, *fill),
                );
            }
            if let Some(stroke) = stroke {
                let c = effective_alpha(shape, *stroke);
                draw_line_aa(fb, rect.x, rect.y, rect.right(), rect.y, c);
                draw_line_aa(fb, rect.right(), rect.y, rect.right(), rect.bottom(), c);
                draw_line_aa(fb, rect.right(), rect.bottom(), rect.x, rect.bottom(), c);
                draw_line_aa(fb, rect.x, rect.bottom(), rect.x, rect.y, c);
            }
        }
        ShapeKind::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            if let Some(fill) = fill {
                fill_circle(fb, *center, *radius, effective_alpha(shape, *fill));
            } else if let Some(stroke) = stroke {
                // Outline only: a thin ring
                fill_circle(fb, *center, *radius, effective_alpha(shape, *stroke));
            }
        }
        ShapeKind::Line { line, stroke, width } => {
            stroke_segment(
                fb,
                line.start,
                line.end,
                *width,
                effective_alpha(shape, *stroke),
            );
        }
        ShapeKind::Polyline {
            points,
            stroke,
            width,
        } => {
            let c = effective_alpha(shape, *stroke);
            for w in points.windows(2) {
                stroke_segment(fb, w[0], w[1], *width, c);
            }
        }
        ShapeKind::Polygon {
            points,
            fill,
            stroke,
        } => {
            fill_polygon(fb, points, effective_alpha(shape, *fill));
            if let Some(stroke) = stroke {
                let c = effective_alpha(shape, *stroke);
                for w in points.windows(2) {
                    stroke_segment(fb, w[0], w[1], 1.0, c);
                }
            }
        }
        ShapeKind::Arc {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            fill,
        } => {
            let polygon = flatten_arc(*center, *inner_radius, *outer_radius, *start_angle, *end_angle);
            fill_polygon(fb, &polygon, effective_alpha(shape, *fill));
        }
        ShapeKind::Text { .. } => {}
    }
}

/// Stroke a segment of the given width with perpendicular offsets.
fn stroke_segment(fb: &mut Framebuffer, a: Point, b: Point, width: f64, color: Rgba) {
    let passes = width.round().max(1.0) as i32;
    let len = a.distance(b);
    let (nx, ny) = if len < f64::EPSILON {
        (0.0, 1.0)
    } else {
        (-(b.y - a.y) / len, (b.x - a.x) / len)
    };

    for i in 0..passes {
        let offset = f64::from(i) - f64::from(passes - 1) / 2.0;
        draw_line_aa(
            fb,
            a.x + nx * offset,
            a.y + ny * offset,
            b.x + nx * offset,
            b.y + ny * offset,
            color,
        );
    }
}

/// Flatten an annular sector into a polygon.
fn flatten_arc(
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> Vec<Point> {
    use crate::geometry::polar;

    let span = (end_angle - start_angle).abs();
    let steps = (span / ARC_STEP).ceil().max(2.0) as usize;

    let mut points = Vec::with_capacity(steps * 2 + 2);
    for i in 0..=steps {
        let angle = start_angle + span * (i as f64 / steps as f64);
        points.push(polar(center, outer_radius, angle));
    }
    if inner_radius > 0.0 {
        for i in (0..=steps).rev() {
            let angle = start_angle + span * (i as f64 / steps as f64);
            points.push(polar(center, inner_radius, angle));
        }
    } else {
        points.push(center);
    }
    points
}
