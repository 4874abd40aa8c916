//! Transition orchestration.
//!
//! Renders stay pure; animation is expressed as scene interpolation the host
//! drives with a clock. [`enter_scene`] animates a first render (bars grow
//! from the baseline, lines draw in, slices sweep open, everything else
//! fades in); [`update_scene`] morphs between two renders, matching shapes
//! by role and tags.

use std::collections::HashMap;
use std::mem::discriminant;

use crate::geometry::{Point, Rect};
use crate::scene::{Role, Scene, Shape, ShapeKind};

/// Linear interpolation, exact at both endpoints.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x, b.x, t),
        lerp(a.y, b.y, t),
        lerp(a.width, b.width, t),
        lerp(a.height, b.height, t),
    )
}

/// Interpolated first-render frame at `t` in `[0, 1]`.
#[must_use]
pub fn enter_scene(next: &Scene, t: f64) -> Scene {
    let t = t.clamp(0.0, 1.0);
    let mut out = next.clone();
    for shape in &mut out.shapes {
        enter_shape(shape, next.plot, t);
    }
    out
}

fn enter_shape(shape: &mut Shape, plot: Rect, t: f64) {
    match (&mut shape.kind, shape.role) {
        (ShapeKind::Rect { rect, .. }, Role::Bar) => {
            // Grow from the baseline
            let target = *rect;
            rect.height = target.height * t;
            rect.y = target.bottom() - rect.height;
        }
        (ShapeKind::Arc { start_angle, end_angle, .. }, Role::Slice) => {
            // Sweep open from 12 o'clock
            *start_angle *= t;
            *end_angle *= t;
        }
        (ShapeKind::Polyline { points, .. }, Role::LinePath | Role::Context) => {
            // Draw in along the path
            *points = truncate_path(points, t);
        }
        (ShapeKind::Polygon { points, .. }, Role::Area) => {
            // Rise from a flat baseline
            let baseline = plot.bottom();
            for p in points.iter_mut() {
                p.y = lerp(baseline, p.y, t);
            }
        }
        _ => {
            shape.opacity *= t;
        }
    }
}

/// Leading portion of a polyline covering `t` of its total length.
fn truncate_path(points: &[Point], t: f64) -> Vec<Point> {
    if points.len() < 2 || t >= 1.0 {
        return points.to_vec();
    }

    let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut budget = total * t;
    let mut out = vec![points[0]];

    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if seg <= budget {
            out.push(w[1]);
            budget -= seg;
        } else {
            if seg > 0.0 && budget > 0.0 {
                out.push(w[0].lerp(w[1], budget / seg));
            }
            break;
        }
    }
    out
}

type ShapeKey = (Role, Option<usize>, Option<usize>, std::mem::Discriminant<ShapeKind>);

fn shape_key(shape: &Shape) -> ShapeKey {
    (
        shape.role,
        shape.series,
        shape.point,
        discriminant(&shape.kind),
    )
}

/// Interpolated update frame at `t` in `[0, 1]`.
///
/// Shapes are matched by role, series and point tags, and geometry variant;
/// matched shapes morph, unmatched next shapes enter as in [`enter_scene`],
/// and shapes only present in `prev` drop immediately.
#[must_use]
pub fn update_scene(prev: &Scene, next: &Scene, t: f64) -> Scene {
    let t = t.clamp(0.0, 1.0);

    let mut pool: HashMap<ShapeKey, Vec<&Shape>> = HashMap::new();
    for shape in prev.shapes.iter().rev() {
        pool.entry(shape_key(shape)).or_default().push(shape);
    }

    let mut out = next.clone();
    for shape in &mut out.shapes {
        let from = pool.get_mut(&shape_key(shape)).and_then(Vec::pop);
        match from {
            Some(from) => {
                morph_shape(from, shape, t);
            }
            None => enter_shape(shape, next.plot, t),
        }
    }
    out
}

fn morph_shape(from: &Shape, into: &mut Shape, t: f64) {
    into.opacity = lerp(from.opacity, into.opacity, t);

    match (&from.kind, &mut into.kind) {
        (ShapeKind::Rect { rect: a, .. }, ShapeKind::Rect { rect: b, .. }) => {
            *b = lerp_rect(*a, *b, t);
        }
        (
            ShapeKind::Circle {
                center: ac,
                radius: ar,
                ..
            },
            ShapeKind::Circle {
                center: bc,
                radius: br,
                ..
            },
        ) => {
            *bc = lerp_point(*ac, *bc, t);
            *br = lerp(*ar, *br, t);
        }
        (ShapeKind::Line { line: a, .. }, ShapeKind::Line { line: b, .. }) => {
            b.start = lerp_point(a.start, b.start, t);
            b.end = lerp_point(a.end, b.end, t);
        }
        (ShapeKind::Polyline { points: a, .. }, ShapeKind::Polyline { points: b, .. })
        | (ShapeKind::Polygon { points: a, .. }, ShapeKind::Polygon { points: b, .. }) => {
            if a.len() == b.len() {
                for (pa, pb) in a.iter().zip(b.iter_mut()) {
                    *pb = lerp_point(*pa, *pb, t);
                }
            }
        }
        (
            ShapeKind::Arc {
                center: ac,
                inner_radius: ai,
                outer_radius: ao,
                start_angle: asa,
                end_angle: aea,
                ..
            },
            ShapeKind::Arc {
                center: bc,
                inner_radius: bi,
                outer_radius: bo,
                start_angle: bsa,
                end_angle: bea,
                ..
            },
        ) => {
            // The pie's arc tween: angles interpolate, so slices sweep
            *bc = lerp_point(*ac, *bc, t);
            *bi = lerp(*ai, *bi, t);
            *bo = lerp(*ao, *bo, t);
            *bsa = lerp(*asa, *bsa, t);
            *bea = lerp(*aea, *bea, t);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn scene_with(shapes: Vec<Shape>) -> Scene {
        let mut scene = Scene::new(
            100.0,
            100.0,
            Rect::new(10.0, 10.0, 80.0, 80.0),
            Rgba::WHITE,
        );
        scene.shapes = shapes;
        scene
    }

    fn bar(rect: Rect) -> Shape {
        Shape::new(
            ShapeKind::Rect {
                rect,
                fill: Some(Rgba::RED),
                stroke: None,
                stroke_width: 1.0,
            },
            Role::Bar,
        )
        .series(0)
        .point(0)
    }

    #[test]
    fn test_enter_bar_grows_from_baseline() {
        let next = scene_with(vec![bar(Rect::new(20.0, 30.0, 10.0, 40.0))]);

        let start = enter_scene(&next, 0.0);
        let ShapeKind::Rect { rect, .. } = &start.shapes[0].kind else {
            panic!("expected rect");
        };
        assert!((rect.height - 0.0).abs() < 1e-9);
        assert!((rect.y - 70.0).abs() < 1e-9);

        let end = enter_scene(&next, 1.0);
        let ShapeKind::Rect { rect, .. } = &end.shapes[0].kind else {
            panic!("expected rect");
        };
        assert!((rect.height - 40.0).abs() < 1e-9);
        assert!((rect.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_slice_sweeps() {
        let next = scene_with(vec![Shape::new(
            ShapeKind::Arc {
                center: Point::new(50.0, 50.0),
                inner_radius: 0.0,
                outer_radius: 40.0,
                start_angle: 1.0,
                end_angle: 2.0,
                fill: Rgba::RED,
            },
            Role::Slice,
        )]);
        let mid = enter_scene(&next, 0.5);
        let ShapeKind::Arc {
            start_angle,
            end_angle,
            ..
        } = &mid.shapes[0].kind
        else {
            panic!("expected arc");
        };
        assert!((start_angle - 0.5).abs() < 1e-9);
        assert!((end_angle - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_line_draws_in() {
        let next = scene_with(vec![Shape::new(
            ShapeKind::Polyline {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(20.0, 0.0),
                ],
                stroke: Rgba::RED,
                width: 2.0,
            },
            Role::LinePath,
        )]);
        let mid = enter_scene(&next, 0.5);
        let ShapeKind::Polyline { points, .. } = &mid.shapes[0].kind else {
            panic!("expected polyline");
        };
        // Half the length: ends at x = 10
        assert!((points.last().unwrap().x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_area_rises_from_baseline() {
        let next = scene_with(vec![Shape::new(
            ShapeKind::Polygon {
                points: vec![
                    Point::new(10.0, 50.0),
                    Point::new(90.0, 40.0),
                    Point::new(90.0, 90.0),
                    Point::new(10.0, 90.0),
                ],
                fill: Rgba::RED,
                stroke: None,
            },
            Role::Area,
        )]);
        let start = enter_scene(&next, 0.0);
        let ShapeKind::Polygon { points, .. } = &start.shapes[0].kind else {
            panic!("expected polygon");
        };
        // Everything flattened to the plot bottom (90)
        assert!(points.iter().all(|p| (p.y - 90.0).abs() < 1e-9));
    }

    #[test]
    fn test_enter_point_fades() {
        let next = scene_with(vec![Shape::new(
            ShapeKind::Circle {
                center: Point::new(30.0, 30.0),
                radius: 3.0,
                fill: Some(Rgba::RED),
                stroke: None,
            },
            Role::Point,
        )]);
        let mid = enter_scene(&next, 0.25);
        assert!((mid.shapes[0].opacity - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_update_morphs_matched_bar() {
        let prev = scene_with(vec![bar(Rect::new(20.0, 60.0, 10.0, 10.0))]);
        let next = scene_with(vec![bar(Rect::new(20.0, 30.0, 10.0, 40.0))]);

        let mid = update_scene(&prev, &next, 0.5);
        let ShapeKind::Rect { rect, .. } = &mid.shapes[0].kind else {
            panic!("expected rect");
        };
        assert!((rect.y - 45.0).abs() < 1e-9);
        assert!((rect.height - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_unmatched_enters() {
        let prev = scene_with(vec![]);
        let next = scene_with(vec![bar(Rect::new(20.0, 30.0, 10.0, 40.0))]);
        let start = update_scene(&prev, &next, 0.0);
        let ShapeKind::Rect { rect, .. } = &start.shapes[0].kind else {
            panic!("expected rect");
        };
        assert!((rect.height - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_at_one_equals_next() {
        let prev = scene_with(vec![bar(Rect::new(20.0, 60.0, 10.0, 10.0))]);
        let next = scene_with(vec![bar(Rect::new(20.0, 30.0, 10.0, 40.0))]);
        let done = update_scene(&prev, &next, 1.0);
        assert_eq!(done.shapes, next.shapes);
    }

    #[test]
    fn test_truncate_path_zero_keeps_first() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let cut = truncate_path(&points, 0.0);
        assert_eq!(cut.len(), 1);
    }
}
