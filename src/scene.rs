//! Retained scene: the output of a chart render.
//!
//! A scene is a flat list of tagged shapes in wrapper coordinates. One render
//! pass serves three consumers: the SVG encoder, the rasterizer, and the
//! pointer pipeline (hit testing plus hover emphasis).

use crate::color::Rgba;
use crate::geometry::{Line, Point, Rect};

/// Text anchor position for text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR).
    #[default]
    Start,
    /// Center text at position.
    Middle,
    /// Align text end at position (right-aligned for LTR).
    End,
}

/// What a shape is, in chart vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Wrapper background.
    Background,
    /// Grid line.
    Grid,
    /// Axis line, tick, or tick label.
    Axis,
    /// Axis caption.
    AxisLabel,
    /// Chart title block.
    Title,
    /// Chart description block.
    Description,
    /// Filled area path.
    Area,
    /// Bar rectangle.
    Bar,
    /// Line path.
    LinePath,
    /// Point marker.
    Point,
    /// Pie slice.
    Slice,
    /// Heatmap tile.
    Tile,
    /// Threshold reference line.
    Threshold,
    /// Legend swatch or label.
    Legend,
    /// Annotation overlay.
    Annotation,
    /// Focus-mode brush rectangle.
    Brush,
    /// Index-mode baseline.
    IndexLine,
    /// Table cell, header, or frame.
    Table,
    /// Context (focus strip) content.
    Context,
}

impl Role {
    /// Whether the pointer pipeline considers shapes of this role.
    #[must_use]
    pub fn interactive(self) -> bool {
        matches!(
            self,
            Self::Area
                | Self::Bar
                | Self::LinePath
                | Self::Point
                | Self::Slice
                | Self::Tile
                | Self::Legend
                | Self::Table
                | Self::IndexLine
        )
    }
}

/// Hover emphasis applied by the interaction module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    /// No emphasis.
    #[default]
    Normal,
    /// Pushed to the background while a sibling is hovered.
    Faded,
    /// The hovered target.
    Bolden,
}

/// Shape geometry and paint.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect {
        /// Geometry.
        rect: Rect,
        /// Fill color, if any.
        fill: Option<Rgba>,
        /// Stroke color, if any.
        stroke: Option<Rgba>,
        /// Stroke width.
        stroke_width: f64,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Fill color, if any.
        fill: Option<Rgba>,
        /// Stroke color, if any.
        stroke: Option<Rgba>,
    },
    /// Line segment.
    Line {
        /// Geometry.
        line: Line,
        /// Stroke color.
        stroke: Rgba,
        /// Stroke width.
        width: f64,
    },
    /// Connected line segments.
    Polyline {
        /// Vertices in draw order.
        points: Vec<Point>,
        /// Stroke color.
        stroke: Rgba,
        /// Stroke width.
        width: f64,
    },
    /// Closed filled polygon.
    Polygon {
        /// Vertices in draw order.
        points: Vec<Point>,
        /// Fill color.
        fill: Rgba,
        /// Stroke color, if any.
        stroke: Option<Rgba>,
    },
    /// Annular sector, angles in radians clockwise from 12 o'clock.
    Arc {
        /// Center.
        center: Point,
        /// Inner radius (0 for a pie, > 0 for a donut).
        inner_radius: f64,
        /// Outer radius.
        outer_radius: f64,
        /// Start angle.
        start_angle: f64,
        /// End angle.
        end_angle: f64,
        /// Fill color.
        fill: Rgba,
    },
    /// Text run (vector output only; the rasterizer skips text).
    Text {
        /// Anchor position.
        pos: Point,
        /// Content.
        text: String,
        /// Font size in pixels.
        size: f64,
        /// Fill color.
        color: Rgba,
        /// Horizontal anchoring.
        anchor: TextAnchor,
        /// Rotation in degrees around `pos`, if any.
        rotation: Option<f64>,
    },
}

/// A tagged shape in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Geometry and paint.
    pub kind: ShapeKind,
    /// Chart vocabulary tag.
    pub role: Role,
    /// Owning series index, if any.
    pub series: Option<usize>,
    /// Point (or row/slice/category) index within the series, if any.
    pub point: Option<usize>,
    /// Base opacity.
    pub opacity: f64,
    /// Hover emphasis.
    pub emphasis: Emphasis,
}

impl Shape {
    /// Create a shape with default opacity and no tags.
    #[must_use]
    pub fn new(kind: ShapeKind, role: Role) -> Self {
        Self {
            kind,
            role,
            series: None,
            point: None,
            opacity: 1.0,
            emphasis: Emphasis::Normal,
        }
    }

    /// Tag with a series index.
    #[must_use]
    pub fn series(mut self, series: usize) -> Self {
        self.series = Some(series);
        self
    }

    /// Tag with a point index.
    #[must_use]
    pub fn point(mut self, point: usize) -> Self {
        self.point = Some(point);
        self
    }

    /// Set base opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Hit test with a tolerance used for thin geometry.
    #[must_use]
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        match &self.kind {
            ShapeKind::Rect { rect, .. } => rect.contains(p),
            ShapeKind::Circle { center, radius, .. } => {
                center.distance(p) <= radius.max(tolerance)
            }
            ShapeKind::Line { line, width, .. } => {
                p.distance_to_segment(line.start, line.end) <= (width / 2.0).max(tolerance)
            }
            ShapeKind::Polyline { points, width, .. } => points.windows(2).any(|w| {
                p.distance_to_segment(w[0], w[1]) <= (width / 2.0).max(tolerance)
            }),
            ShapeKind::Polygon { points, .. } => point_in_polygon(p, points),
            ShapeKind::Arc {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
                ..
            } => {
                let d = center.distance(p);
                if d < *inner_radius || d > *outer_radius {
                    return false;
                }
                // Clockwise angle from 12 o'clock
                let mut angle = (p.x - center.x).atan2(center.y - p.y);
                if angle < 0.0 {
                    angle += std::f64::consts::TAU;
                }
                angle >= *start_angle && angle <= *end_angle
            }
            ShapeKind::Text { .. } => false,
        }
    }
}

/// Even-odd point-in-polygon test.
fn point_in_polygon(p: Point, points: &[Point]) -> bool {
    let mut inside = false;
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Hit-test tolerance in pixels for thin geometry.
pub const HIT_TOLERANCE: f64 = 4.0;

/// A rendered chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Wrapper width in pixels.
    pub width: f64,
    /// Wrapper height in pixels.
    pub height: f64,
    /// Inner plot rectangle in wrapper coordinates.
    pub plot: Rect,
    /// Wrapper background.
    pub background: Rgba,
    /// Shapes in draw order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(width: f64, height: f64, plot: Rect, background: Rgba) -> Self {
        Self {
            width,
            height,
            plot,
            background,
            shapes: Vec::new(),
        }
    }

    /// Append a shape.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Topmost interactive shape containing `p`.
    #[must_use]
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.shapes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.role.interactive() && s.contains(p, HIT_TOLERANCE))
            .map(|(i, _)| i)
    }

    /// Clear all hover emphasis.
    pub fn clear_emphasis(&mut self) {
        for shape in &mut self.shapes {
            shape.emphasis = Emphasis::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_shape(x: f64, role: Role) -> Shape {
        Shape::new(
            ShapeKind::Rect {
                rect: Rect::new(x, 0.0, 10.0, 10.0),
                fill: Some(Rgba::RED),
                stroke: None,
                stroke_width: 1.0,
            },
            role,
        )
    }

    fn empty_scene() -> Scene {
        Scene::new(
            100.0,
            100.0,
            Rect::new(10.0, 10.0, 80.0, 80.0),
            Rgba::WHITE,
        )
    }

    #[test]
    fn test_hit_test_topmost_interactive() {
        let mut scene = empty_scene();
        scene.push(rect_shape(0.0, Role::Grid)); // not interactive
        scene.push(rect_shape(0.0, Role::Bar).series(0));
        scene.push(rect_shape(0.0, Role::Bar).series(1));

        let hit = scene.hit_test(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(scene.shapes[hit].series, Some(1));
    }

    #[test]
    fn test_hit_test_misses() {
        let mut scene = empty_scene();
        scene.push(rect_shape(0.0, Role::Bar));
        assert!(scene.hit_test(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_hit_test_skips_non_interactive() {
        let mut scene = empty_scene();
        scene.push(rect_shape(0.0, Role::Grid));
        assert!(scene.hit_test(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_circle_contains() {
        let s = Shape::new(
            ShapeKind::Circle {
                center: Point::new(10.0, 10.0),
                radius: 3.0,
                fill: Some(Rgba::RED),
                stroke: None,
            },
            Role::Point,
        );
        assert!(s.contains(Point::new(11.0, 11.0), 0.0));
        assert!(!s.contains(Point::new(20.0, 10.0), 4.0));
    }

    #[test]
    fn test_polyline_contains_with_tolerance() {
        let s = Shape::new(
            ShapeKind::Polyline {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(20.0, 0.0),
                ],
                stroke: Rgba::RED,
                width: 2.0,
            },
            Role::LinePath,
        );
        assert!(s.contains(Point::new(5.0, 5.0), 4.0));
        assert!(!s.contains(Point::new(10.0, 0.0), 4.0));
    }

    #[test]
    fn test_polygon_contains() {
        let s = Shape::new(
            ShapeKind::Polygon {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(0.0, 10.0),
                ],
                fill: Rgba::RED,
                stroke: None,
            },
            Role::Area,
        );
        assert!(s.contains(Point::new(5.0, 5.0), 0.0));
        assert!(!s.contains(Point::new(15.0, 5.0), 0.0));
    }

    #[test]
    fn test_arc_contains() {
        use std::f64::consts::FRAC_PI_2;
        // Quarter arc covering 12 o'clock to 3 o'clock
        let s = Shape::new(
            ShapeKind::Arc {
                center: Point::new(0.0, 0.0),
                inner_radius: 0.0,
                outer_radius: 10.0,
                start_angle: 0.0,
                end_angle: FRAC_PI_2,
                fill: Rgba::RED,
            },
            Role::Slice,
        );
        // Up-and-right of center falls inside
        assert!(s.contains(Point::new(3.0, -3.0), 0.0));
        // Down-left does not
        assert!(!s.contains(Point::new(-3.0, 3.0), 0.0));
        // Outside the radius does not
        assert!(!s.contains(Point::new(20.0, -20.0), 0.0));
    }

    #[test]
    fn test_text_never_hit() {
        let s = Shape::new(
            ShapeKind::Text {
                pos: Point::new(0.0, 0.0),
                text: "label".into(),
                size: 12.0,
                color: Rgba::BLACK,
                anchor: TextAnchor::Start,
                rotation: None,
            },
            Role::Axis,
        );
        assert!(!s.contains(Point::new(0.0, 0.0), 10.0));
    }

    #[test]
    fn test_clear_emphasis() {
        let mut scene = empty_scene();
        let mut shape = rect_shape(0.0, Role::Bar);
        shape.emphasis = Emphasis::Faded;
        scene.push(shape);
        scene.clear_emphasis();
        assert_eq!(scene.shapes[0].emphasis, Emphasis::Normal);
    }

    #[test]
    fn test_shape_builder_tags() {
        let s = rect_shape(0.0, Role::Bar).series(2).point(7).opacity(0.5);
        assert_eq!(s.series, Some(2));
        assert_eq!(s.point, Some(7));
        assert!((s.opacity - 0.5).abs() < 1e-9);
    }
}
