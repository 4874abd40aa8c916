//! Axis tick layout and drawing.
//!
//! Ticks are computed in plot-local pixels from a scale, then drawn into the
//! scene as an axis line, tick labels, optional full-length grid lines, and
//! an optional caption. X axes sit at the bottom, y axes at the left.

use crate::format::TickFormat;
use crate::geometry::{Line, Point, Rect};
use crate::scale::{BandScale, ContinuousScale, Scale};
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};
use crate::theme::Theme;

/// Default tick count requested from continuous scales.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Tick label font size.
const TICK_FONT: f64 = 10.0;

/// Caption font size.
const CAPTION_FONT: f64 = 12.0;

/// One tick: plot-local position along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position along the axis, in plot-local pixels.
    pub position: f64,
    /// Formatted label.
    pub label: String,
}

/// Ticks for a continuous scale.
#[must_use]
pub fn continuous_ticks(
    scale: &dyn ContinuousScale,
    count: usize,
    format: &TickFormat,
) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|value| Tick {
            position: scale.scale(value),
            label: format.format(value),
        })
        .collect()
}

/// Ticks for a band scale: one per category, at the band center.
#[must_use]
pub fn band_ticks(scale: &BandScale) -> Vec<Tick> {
    scale
        .categories()
        .iter()
        .enumerate()
        .map(|(i, c)| Tick {
            position: scale.center_at(i),
            label: c.clone(),
        })
        .collect()
}

/// Draw the bottom (x) axis.
///
/// `caption_offset` is the configured bottom margin; the caption sits 5 px
/// above its far edge.
pub fn draw_bottom_axis(
    scene: &mut Scene,
    plot: Rect,
    ticks: &[Tick],
    theme: &Theme,
    grid: bool,
    caption: Option<&str>,
    caption_offset: f64,
) {
    scene.push(Shape::new(
        ShapeKind::Line {
            line: Line::from_coords(plot.x, plot.bottom(), plot.right(), plot.bottom()),
            stroke: theme.axis,
            width: 1.0,
        },
        Role::Axis,
    ));

    for tick in ticks {
        let x = plot.x + tick.position;

        if grid {
            scene.push(Shape::new(
                ShapeKind::Line {
                    line: Line::from_coords(x, plot.y, x, plot.bottom()),
                    stroke: theme.grid,
                    width: 1.0,
                },
                Role::Grid,
            ));
        }

        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(x, plot.bottom() + 14.0),
                text: tick.label.clone(),
                size: TICK_FONT,
                color: theme.axis,
                anchor: TextAnchor::Middle,
                rotation: None,
            },
            Role::Axis,
        ));
    }

    if let Some(caption) = caption {
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(
                    plot.x + plot.width / 2.0,
                    plot.bottom() + caption_offset - 5.0,
                ),
                text: caption.to_string(),
                size: CAPTION_FONT,
                color: theme.text,
                anchor: TextAnchor::Middle,
                rotation: None,
            },
            Role::AxisLabel,
        ));
    }
}

/// Draw the left (y) axis.
///
/// `caption_offset` is the configured left margin; the caption is rotated
/// and sits near its far edge.
pub fn draw_left_axis(
    scene: &mut Scene,
    plot: Rect,
    ticks: &[Tick],
    theme: &Theme,
    grid: bool,
    caption: Option<&str>,
    caption_offset: f64,
) {
    scene.push(Shape::new(
        ShapeKind::Line {
            line: Line::from_coords(plot.x, plot.y, plot.x, plot.bottom()),
            stroke: theme.axis,
            width: 1.0,
        },
        Role::Axis,
    ));

    for tick in ticks {
        let y = plot.y + tick.position;

        if grid {
            scene.push(Shape::new(
                ShapeKind::Line {
                    line: Line::from_coords(plot.x, y, plot.right(), y),
                    stroke: theme.grid,
                    width: 1.0,
                },
                Role::Grid,
            ));
        }

        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(plot.x - 6.0, y + 3.0),
                text: tick.label.clone(),
                size: TICK_FONT,
                color: theme.axis,
                anchor: TextAnchor::End,
                rotation: None,
            },
            Role::Axis,
        ));
    }

    if let Some(caption) = caption {
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(
                    plot.x - caption_offset + 13.0,
                    plot.y + plot.height / 2.0,
                ),
                text: caption.to_string(),
                size: CAPTION_FONT,
                color: theme.text,
                anchor: TextAnchor::Middle,
                rotation: Some(-90.0),
            },
            Role::AxisLabel,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::scale::LinearScale;

    fn scene() -> Scene {
        Scene::new(
            200.0,
            150.0,
            Rect::new(40.0, 20.0, 140.0, 100.0),
            Rgba::WHITE,
        )
    }

    #[test]
    fn test_continuous_ticks_positions() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 140.0)).unwrap();
        let ticks = continuous_ticks(&scale, 10, &TickFormat::UnitSuffix);
        assert!(!ticks.is_empty());
        assert!((ticks[0].position - 0.0).abs() < 1e-9);
        assert!((ticks.last().unwrap().position - 140.0).abs() < 1e-9);
        assert_eq!(ticks.last().unwrap().label, "100");
    }

    #[test]
    fn test_band_ticks_centers() {
        let scale =
            BandScale::bands(vec!["a".into(), "b".into()], (0.0, 100.0)).unwrap();
        let ticks = band_ticks(&scale);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].label, "a");
        assert!(ticks[0].position < ticks[1].position);
    }

    #[test]
    fn test_bottom_axis_grid_lines() {
        let mut s = scene();
        let ticks = vec![
            Tick {
                position: 0.0,
                label: "0".into(),
            },
            Tick {
                position: 140.0,
                label: "1".into(),
            },
        ];
        let plot = s.plot;
        draw_bottom_axis(&mut s, plot, &ticks, &Theme::light(), true, None, 40.0);
        let grid_count = s.shapes.iter().filter(|sh| sh.role == Role::Grid).count();
        assert_eq!(grid_count, 2);
        let label_count = s
            .shapes
            .iter()
            .filter(|sh| sh.role == Role::Axis && matches!(sh.kind, ShapeKind::Text { .. }))
            .count();
        assert_eq!(label_count, 2);
    }

    #[test]
    fn test_bottom_axis_no_grid() {
        let mut s = scene();
        let ticks = vec![Tick {
            position: 50.0,
            label: "x".into(),
        }];
        let plot = s.plot;
        draw_bottom_axis(&mut s, plot, &ticks, &Theme::light(), false, None, 40.0);
        assert!(s.shapes.iter().all(|sh| sh.role != Role::Grid));
    }

    #[test]
    fn test_axis_captions() {
        let mut s = scene();
        let plot = s.plot;
        draw_bottom_axis(
            &mut s,
            plot,
            &[],
            &Theme::light(),
            false,
            Some("time"),
            40.0,
        );
        draw_left_axis(
            &mut s,
            plot,
            &[],
            &Theme::light(),
            false,
            Some("value"),
            40.0,
        );
        let captions: Vec<_> = s
            .shapes
            .iter()
            .filter(|sh| sh.role == Role::AxisLabel)
            .collect();
        assert_eq!(captions.len(), 2);
        // The y caption is rotated
        assert!(captions.iter().any(|sh| matches!(
            &sh.kind,
            ShapeKind::Text {
                rotation: Some(_),
                ..
            }
        )));
    }
}
