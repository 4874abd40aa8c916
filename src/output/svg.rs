//! SVG output encoder.
//!
//! Vector output of a rendered scene. A rasterized framebuffer can also be
//! embedded wholesale as a base64 PNG image, which keeps the two output
//! paths interchangeable for hosts that only speak SVG.

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{polar, Point};
use crate::scene::{Emphasis, Scene, Shape, ShapeKind, TextAnchor};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

/// Opacity multiplier for faded shapes (matches the rasterizer).
const FADED_OPACITY: f64 = 0.3;

/// SVG encoder for scenes and framebuffers.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    body: String,
}

impl SvgEncoder {
    /// Create an empty encoder with the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            body: String::new(),
        }
    }

    /// Encode a scene.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let mut encoder = Self::new(scene.width.max(1.0) as u32, scene.height.max(1.0) as u32);
        encoder.background = Some(scene.background);

        for shape in &scene.shapes {
            encoder.push_shape(shape);
        }
        encoder
    }

    /// Embed a rasterized framebuffer as a base64 PNG image.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_framebuffer(fb: &Framebuffer) -> Result<Self> {
        let mut encoder = Self::new(fb.width(), fb.height());
        encoder.background = None; // image provides the background

        let png_bytes = super::PngEncoder::to_bytes(fb)?;
        let base64_data = STANDARD.encode(&png_bytes);

        let _ = write!(
            encoder.body,
            r#"<image x="0" y="0" width="{}" height="{}" href="data:image/png;base64,{}"/>"#,
            fb.width(),
            fb.height(),
            base64_data
        );
        Ok(encoder)
    }

    /// Set the background color (`None` for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    fn shape_opacity(shape: &Shape) -> f64 {
        let emphasis = match shape.emphasis {
            Emphasis::Faded => FADED_OPACITY,
            Emphasis::Normal | Emphasis::Bolden => 1.0,
        };
        shape.opacity * emphasis
    }

    fn push_shape(&mut self, shape: &Shape) {
        let opacity = Self::shape_opacity(shape);
        let op_attr = if (opacity - 1.0).abs() < 1e-9 {
            String::new()
        } else {
            format!(r#" opacity="{opacity:.3}""#)
        };

        match &shape.kind {
            ShapeKind::Rect {
                rect,
                fill,
                stroke,
                stroke_width,
            } => {
                let _ = write!(
                    self.body,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{}{}{}/>"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    fill_attr(*fill),
                    stroke_attr(*stroke, *stroke_width),
                    op_attr
                );
            }
            ShapeKind::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let _ = write!(
                    self.body,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{}{}{}/>"#,
                    center.x,
                    center.y,
                    radius,
                    fill_attr(*fill),
                    stroke_attr(*stroke, 1.0),
                    op_attr
                );
            }
            ShapeKind::Line { line, stroke, width } => {
                let _ = write!(
                    self.body,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{}{}/>"#,
                    line.start.x,
                    line.start.y,
                    line.end.x,
                    line.end.y,
                    stroke_attr(Some(*stroke), *width),
                    op_attr
                );
            }
            ShapeKind::Polyline {
                points,
                stroke,
                width,
            } => {
                let _ = write!(
                    self.body,
                    r#"<polyline points="{}" fill="none"{}{}/>"#,
                    points_attr(points),
                    stroke_attr(Some(*stroke), *width),
                    op_attr
                );
            }
            ShapeKind::Polygon {
                points,
                fill,
                stroke,
            } => {
                let _ = write!(
                    self.body,
                    r#"<polygon points="{}"{}{}{}/>"#,
                    points_attr(points),
                    fill_attr(Some(*fill)),
                    stroke_attr(*stroke, 1.0),
                    op_attr
                );
            }
            ShapeKind::Arc {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
                fill,
            } => {
                let _ = write!(
                    self.body,
                    r#"<path d="{}"{}{}/>"#,
                    arc_path(*center, *inner_radius, *outer_radius, *start_angle, *end_angle),
                    fill_attr(Some(*fill)),
                    op_attr
                );
            }
            ShapeKind::Text {
                pos,
                text,
                size,
                color,
                anchor,
                rotation,
            } => {
                let anchor = match anchor {
                    TextAnchor::Start => "start",
                    TextAnchor::Middle => "middle",
                    TextAnchor::End => "end",
                };
                let transform = rotation.map_or(String::new(), |deg| {
                    format!(r#" transform="rotate({deg:.1} {:.2} {:.2})""#, pos.x, pos.y)
                });
                let _ = write!(
                    self.body,
                    r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" fill="{}" text-anchor="{anchor}"{transform}{op_attr}>{}</text>"#,
                    pos.x,
                    pos.y,
                    size,
                    color.to_hex(),
                    escape(text)
                );
            }
        }
    }

    /// Render the SVG document as a string.
    #[must_use]
    pub fn to_string(&self) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        if let Some(bg) = self.background {
            let _ = write!(
                out,
                r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                self.width,
                self.height,
                bg.to_hex()
            );
        }
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }

    /// Write the SVG document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

fn fill_attr(fill: Option<Rgba>) -> String {
    match fill {
        Some(c) if c.a == 255 => format!(r#" fill="{}""#, c.to_hex()),
        Some(c) => format!(
            r#" fill="{}" fill-opacity="{:.3}""#,
            c.to_hex(),
            c.alpha_f64()
        ),
        None => r#" fill="none""#.to_string(),
    }
}

fn stroke_attr(stroke: Option<Rgba>, width: f64) -> String {
    match stroke {
        Some(c) if c.a == 255 => {
            format!(r#" stroke="{}" stroke-width="{width:.2}""#, c.to_hex())
        }
        Some(c) => format!(
            r#" stroke="{}" stroke-width="{width:.2}" stroke-opacity="{:.3}""#,
            c.to_hex(),
            c.alpha_f64()
        ),
        None => String::new(),
    }
}

fn points_attr(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 12);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:.2},{:.2}", p.x, p.y);
    }
    out
}

/// Annular sector path, angles in radians clockwise from 12 o'clock.
fn arc_path(
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> String {
    let large = i32::from((end_angle - start_angle).abs() > std::f64::consts::PI);
    let outer_start = polar(center, outer_radius, start_angle);
    let outer_end = polar(center, outer_radius, end_angle);

    if inner_radius > 0.0 {
        let inner_end = polar(center, inner_radius, end_angle);
        let inner_start = polar(center, inner_radius, start_angle);
        format!(
            "M {:.2} {:.2} A {r:.2} {r:.2} 0 {large} 1 {:.2} {:.2} L {:.2} {:.2} A {ri:.2} {ri:.2} 0 {large} 0 {:.2} {:.2} Z",
            outer_start.x,
            outer_start.y,
            outer_end.x,
            outer_end.y,
            inner_end.x,
            inner_end.y,
            inner_start.x,
            inner_start.y,
            r = outer_radius,
            ri = inner_radius,
        )
    } else {
        format!(
            "M {:.2} {:.2} L {:.2} {:.2} A {r:.2} {r:.2} 0 {large} 1 {:.2} {:.2} Z",
            center.x,
            center.y,
            outer_start.x,
            outer_start.y,
            outer_end.x,
            outer_end.y,
            r = outer_radius,
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::scene::Role;

    #[test]
    fn test_empty_scene_document() {
        let scene = Scene::new(100.0, 50.0, Rect::new(0.0, 0.0, 100.0, 50.0), Rgba::WHITE);
        let svg = SvgEncoder::from_scene(&scene).to_string();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="100""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_rect_element() {
        let mut scene = Scene::new(100.0, 50.0, Rect::new(0.0, 0.0, 100.0, 50.0), Rgba::WHITE);
        scene.push(Shape::new(
            ShapeKind::Rect {
                rect: Rect::new(10.0, 10.0, 30.0, 20.0),
                fill: Some(Rgba::RED),
                stroke: None,
                stroke_width: 1.0,
            },
            Role::Bar,
        ));
        let svg = SvgEncoder::from_scene(&scene).to_string();
        assert!(svg.contains("<rect"));
        assert!(svg.contains(r##"fill="#ff0000""##));
    }

    #[test]
    fn test_faded_shape_opacity() {
        let mut scene = Scene::new(100.0, 50.0, Rect::new(0.0, 0.0, 100.0, 50.0), Rgba::WHITE);
        let mut shape = Shape::new(
            ShapeKind::Circle {
                center: Point::new(5.0, 5.0),
                radius: 2.0,
                fill: Some(Rgba::RED),
                stroke: None,
            },
            Role::Point,
        );
        shape.emphasis = Emphasis::Faded;
        scene.push(shape);
        let svg = SvgEncoder::from_scene(&scene).to_string();
        assert!(svg.contains(r#"opacity="0.300""#));
    }

    #[test]
    fn test_text_escaped() {
        let mut scene = Scene::new(100.0, 50.0, Rect::new(0.0, 0.0, 100.0, 50.0), Rgba::WHITE);
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(5.0, 5.0),
                text: "a < b & c".into(),
                size: 12.0,
                color: Rgba::BLACK,
                anchor: TextAnchor::Middle,
                rotation: None,
            },
            Role::Axis,
        ));
        let svg = SvgEncoder::from_scene(&scene).to_string();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_rotated_text() {
        let mut scene = Scene::new(100.0, 50.0, Rect::new(0.0, 0.0, 100.0, 50.0), Rgba::WHITE);
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(10.0, 25.0),
                text: "y axis".into(),
                size: 12.0,
                color: Rgba::BLACK,
                anchor: TextAnchor::Middle,
                rotation: Some(-90.0),
            },
            Role::AxisLabel,
        ));
        let svg = SvgEncoder::from_scene(&scene).to_string();
        assert!(svg.contains("rotate(-90.0"));
    }

    #[test]
    fn test_arc_path_donut() {
        let d = arc_path(
            Point::new(50.0, 50.0),
            20.0,
            40.0,
            0.0,
            std::f64::consts::FRAC_PI_2,
        );
        assert!(d.starts_with('M'));
        assert!(d.contains('A'));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn test_from_framebuffer_embeds_png() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::RED);
        let svg = SvgEncoder::from_framebuffer(&fb).unwrap().to_string();
        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let scene = Scene::new(10.0, 10.0, Rect::new(0.0, 0.0, 10.0, 10.0), Rgba::WHITE);
        SvgEncoder::from_scene(&scene).write_to_file(&path).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("<svg"));
    }
}
