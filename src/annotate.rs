//! Annotations: user-drawn rectangular callouts on the drawing surface.
//!
//! A drag anchors one corner in data coordinates (through scale inversion),
//! the release opens a configuration form (color, stroke width, label), and
//! confirming emits the annotation event. Because the box is stored in data
//! space, chart updates re-anchor it through the fresh scales.

use tracing::debug;

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::scale::{ContinuousScale, Scale};
use crate::scene::{Role, Shape, ShapeKind, TextAnchor};

/// Minimum drawn size in pixels; smaller boxes are treated as accidental.
const MIN_EDGE: f64 = 10.0;

/// Default annotation opacity.
const DEFAULT_OPACITY: f64 = 0.6;

/// Offset of the configuration form from the release point.
const CONFIG_OFFSET: f64 = 10.0;

/// Annotation styling, editable through the configuration form.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    /// Border color.
    pub color: Rgba,
    /// Border width in pixels.
    pub stroke_width: f64,
    /// Optional label drawn inside the box.
    pub label: Option<String>,
    /// Box opacity.
    pub opacity: f64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: Rgba::RED,
            stroke_width: 4.0,
            label: None,
            opacity: DEFAULT_OPACITY,
        }
    }
}

/// A completed annotation: the payload of the annotate event, and the input
/// to [`Annotator::replay`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    /// Border color.
    pub color: Rgba,
    /// Border width in pixels.
    pub stroke_width: f64,
    /// Optional label.
    pub label: Option<String>,
    /// Bounding box in data coordinates: `[x0, y0, x1, y1]`.
    pub bbox: [f64; 4],
}

/// Annotation drag state machine.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    style: AnnotationStyle,
    anchor: Option<(f64, f64)>,
    cursor: Option<(f64, f64)>,
    dragging: bool,
    drawn: bool,
    /// Wrapper position of the open configuration form, if any.
    config_at: Option<Point>,
}

impl Annotator {
    /// Begin a drag at a data-space point. Presses outside either domain are
    /// ignored. Returns whether the drag was accepted.
    pub fn mousedown(&mut self, data: (f64, f64), x_domain: (f64, f64), y_domain: (f64, f64)) -> bool {
        let (x0, x1) = ordered(x_domain);
        let (y0, y1) = ordered(y_domain);
        if data.0 < x0 || data.0 > x1 || data.1 < y0 || data.1 > y1 {
            return false;
        }

        self.style = AnnotationStyle::default();
        self.anchor = Some(data);
        self.cursor = None;
        self.dragging = true;
        self.drawn = false;
        self.config_at = None;
        debug!(x = data.0, y = data.1, "annotation drag start");
        true
    }

    /// Extend the drag to a data-space point.
    pub fn mousemove(&mut self, data: (f64, f64)) {
        if self.dragging {
            self.cursor = Some(data);
            self.drawn = true;
        }
    }

    /// End the drag at a wrapper-space pixel. When a box was drawn, the
    /// configuration form opens near the pointer, clamped into the wrapper;
    /// its position is returned.
    pub fn mouseup(
        &mut self,
        pixel: Point,
        wrapper: (f64, f64),
        form_size: (f64, f64),
    ) -> Option<Point> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;

        if !self.drawn {
            return None;
        }

        let mut left = pixel.x + CONFIG_OFFSET;
        let mut top = pixel.y;
        if left + form_size.0 > wrapper.0 {
            left = wrapper.0 - form_size.0 - CONFIG_OFFSET;
        }
        if top + form_size.1 > wrapper.1 {
            top = wrapper.1 - form_size.1 - CONFIG_OFFSET;
        }

        let at = Point::new(left, top);
        self.config_at = Some(at);
        Some(at)
    }

    /// Confirm the configuration form, producing the annotate event payload.
    pub fn apply_config(
        &mut self,
        color: Rgba,
        stroke_width: f64,
        label: Option<String>,
    ) -> Option<AnnotationConfig> {
        let bbox = self.bbox()?;
        self.style.color = color;
        self.style.stroke_width = stroke_width;
        self.style.label.clone_from(&label);
        self.config_at = None;

        Some(AnnotationConfig {
            color,
            stroke_width,
            label,
            bbox,
        })
    }

    /// Replay a stored annotation (force-draw).
    pub fn replay(&mut self, cfg: &AnnotationConfig) {
        self.style.color = cfg.color;
        self.style.stroke_width = cfg.stroke_width;
        self.style.label.clone_from(&cfg.label);
        self.anchor = Some((cfg.bbox[0], cfg.bbox[1]));
        self.cursor = Some((cfg.bbox[2], cfg.bbox[3]));
        self.dragging = false;
        self.drawn = true;
    }

    /// Bounding box in data coordinates, `[x0, y0, x1, y1]`.
    #[must_use]
    pub fn bbox(&self) -> Option<[f64; 4]> {
        let (anchor, cursor) = (self.anchor?, self.cursor?);
        Some([anchor.0, anchor.1, cursor.0, cursor.1])
    }

    /// Wrapper position of the open configuration form, if any.
    #[must_use]
    pub fn config_position(&self) -> Option<Point> {
        self.config_at
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Current style.
    #[must_use]
    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Overlay shapes for the current box, anchored through the given scales
    /// into the plot rectangle. `None` when nothing is drawn or the box is
    /// below the minimum size.
    #[must_use]
    pub fn overlay(
        &self,
        x_scale: &dyn ContinuousScale,
        y_scale: &dyn ContinuousScale,
        plot: Rect,
    ) -> Option<Vec<Shape>> {
        if !self.drawn {
            return None;
        }
        let bbox = self.bbox()?;

        let x0 = plot.x + x_scale.scale(bbox[0]);
        let y0 = plot.y + y_scale.scale(bbox[1]);
        let x1 = plot.x + x_scale.scale(bbox[2]);
        let y1 = plot.y + y_scale.scale(bbox[3]);

        if (x0 - x1).abs() < MIN_EDGE && (y0 - y1).abs() < MIN_EDGE {
            return None;
        }

        let rect = Rect::from_corners(Point::new(x0, y0), Point::new(x1, y1));
        let mut shapes = vec![Shape::new(
            ShapeKind::Rect {
                rect,
                fill: None,
                stroke: Some(self.style.color),
                stroke_width: self.style.stroke_width,
            },
            Role::Annotation,
        )
        .opacity(self.style.opacity)];

        if let Some(label) = &self.style.label {
            shapes.push(
                Shape::new(
                    ShapeKind::Text {
                        pos: Point::new(rect.x + 4.0, rect.y + 14.0),
                        text: label.clone(),
                        size: 11.0,
                        color: self.style.color,
                        anchor: TextAnchor::Start,
                        rotation: None,
                    },
                    Role::Annotation,
                )
                .opacity(self.style.opacity),
            );
        }

        Some(shapes)
    }
}

fn ordered(domain: (f64, f64)) -> (f64, f64) {
    if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;

    fn scales() -> (LinearScale, LinearScale) {
        (
            LinearScale::new((0.0, 100.0), (0.0, 500.0)).unwrap(),
            LinearScale::new((0.0, 10.0), (300.0, 0.0)).unwrap(),
        )
    }

    fn plot() -> Rect {
        Rect::new(40.0, 20.0, 500.0, 300.0)
    }

    #[test]
    fn test_press_outside_domain_rejected() {
        let mut a = Annotator::default();
        assert!(!a.mousedown((150.0, 5.0), (0.0, 100.0), (0.0, 10.0)));
        assert!(!a.dragging());
        assert!(a.mousedown((50.0, 5.0), (0.0, 100.0), (0.0, 10.0)));
        assert!(a.dragging());
    }

    #[test]
    fn test_drag_produces_bbox() {
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        a.mousemove((40.0, 8.0));
        assert_eq!(a.bbox(), Some([10.0, 2.0, 40.0, 8.0]));
    }

    #[test]
    fn test_release_without_motion_no_form() {
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        assert!(a.mouseup(Point::new(100.0, 100.0), (600.0, 400.0), (180.0, 110.0)).is_none());
    }

    #[test]
    fn test_release_opens_clamped_form() {
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        a.mousemove((40.0, 8.0));
        let at = a
            .mouseup(Point::new(590.0, 390.0), (600.0, 400.0), (180.0, 110.0))
            .unwrap();
        assert!(at.x + 180.0 <= 600.0);
        assert!(at.y + 110.0 <= 400.0);
        assert_eq!(a.config_position(), Some(at));
    }

    #[test]
    fn test_apply_config_emits_payload() {
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        a.mousemove((40.0, 8.0));
        a.mouseup(Point::new(100.0, 100.0), (600.0, 400.0), (180.0, 110.0));

        let cfg = a
            .apply_config(Rgba::rgb(0, 128, 0), 2.0, Some("spike".into()))
            .unwrap();
        assert_eq!(cfg.bbox, [10.0, 2.0, 40.0, 8.0]);
        assert_eq!(cfg.label.as_deref(), Some("spike"));
        assert!(a.config_position().is_none());
    }

    #[test]
    fn test_mousedown_resets_style() {
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        a.mousemove((40.0, 8.0));
        a.mouseup(Point::new(100.0, 100.0), (600.0, 400.0), (180.0, 110.0));
        a.apply_config(Rgba::rgb(0, 128, 0), 2.0, Some("spike".into()));

        a.mousedown((20.0, 3.0), (0.0, 100.0), (0.0, 10.0));
        assert_eq!(a.style(), &AnnotationStyle::default());
    }

    #[test]
    fn test_overlay_skips_tiny_boxes() {
        let (xs, ys) = scales();
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        // One pixel wide, one tall
        a.mousemove((10.1, 2.01));
        assert!(a.overlay(&xs, &ys, plot()).is_none());
    }

    #[test]
    fn test_overlay_anchors_through_scales() {
        let (xs, ys) = scales();
        let mut a = Annotator::default();
        a.mousedown((10.0, 2.0), (0.0, 100.0), (0.0, 10.0));
        a.mousemove((40.0, 8.0));
        let shapes = a.overlay(&xs, &ys, plot()).unwrap();
        let ShapeKind::Rect { rect, .. } = &shapes[0].kind else {
            panic!("expected rect");
        };
        // x: 10 -> 50px, 40 -> 200px, plus plot offset 40
        assert!((rect.x - 90.0).abs() < 1e-9);
        assert!((rect.width - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_replay_then_overlay() {
        let (xs, ys) = scales();
        let mut a = Annotator::default();
        a.replay(&AnnotationConfig {
            color: Rgba::rgb(0, 0, 255),
            stroke_width: 2.0,
            label: Some("note".into()),
            bbox: [10.0, 2.0, 40.0, 8.0],
        });
        let shapes = a.overlay(&xs, &ys, plot()).unwrap();
        // Rect plus label text
        assert_eq!(shapes.len(), 2);
    }
}
