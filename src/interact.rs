//! Hover interaction: fade siblings, bolden the target.
//!
//! On mouse-over, every shape in the target group keeps full emphasis while
//! its siblings fade; mouse-out clears both. Charts choose the grouping:
//! series-wise (area, line, scatter, heatmap, grouped bars) or shape-wise
//! (discrete bars, pie slices).

use tracing::trace;

use crate::scene::{Emphasis, Role, Scene};

/// How hover targets are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverGroup {
    /// All shapes of the same series light up together.
    Series,
    /// Only the shape with the same point index lights up.
    Point,
}

/// The hovered target, as resolved by a scene hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    /// Index of the hit shape within the scene.
    pub shape_index: usize,
    /// Role of the hit shape.
    pub role: Role,
    /// Series tag of the hit shape.
    pub series: Option<usize>,
    /// Point tag of the hit shape.
    pub point: Option<usize>,
}

impl HitTarget {
    /// Resolve a hit shape index into a target.
    #[must_use]
    pub fn from_scene(scene: &Scene, shape_index: usize) -> Self {
        let shape = &scene.shapes[shape_index];
        Self {
            shape_index,
            role: shape.role,
            series: shape.series,
            point: shape.point,
        }
    }
}

/// Apply mouse-over emphasis for `target` across shapes whose role is in
/// `roles`, grouped as requested. Other shapes are left untouched.
pub fn mouseover(scene: &mut Scene, roles: &[Role], group: HoverGroup, target: HitTarget) {
    trace!(?group, series = ?target.series, point = ?target.point, "hover enter");

    for shape in &mut scene.shapes {
        if !roles.contains(&shape.role) {
            continue;
        }

        let matches = match group {
            HoverGroup::Series => shape.series == target.series,
            HoverGroup::Point => shape.point == target.point && shape.series == target.series,
        };

        shape.emphasis = if matches {
            Emphasis::Bolden
        } else {
            Emphasis::Faded
        };
    }
}

/// Clear all hover emphasis (mouse-out).
pub fn mouseout(scene: &mut Scene) {
    trace!("hover leave");
    scene.clear_emphasis();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::geometry::Rect;
    use crate::scene::{Shape, ShapeKind};

    fn bar(series: usize, point: usize) -> Shape {
        Shape::new(
            ShapeKind::Rect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                fill: Some(Rgba::RED),
                stroke: None,
                stroke_width: 1.0,
            },
            Role::Bar,
        )
        .series(series)
        .point(point)
    }

    fn scene() -> Scene {
        let mut s = Scene::new(
            100.0,
            100.0,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rgba::WHITE,
        );
        s.push(bar(0, 0));
        s.push(bar(0, 1));
        s.push(bar(1, 0));
        s
    }

    #[test]
    fn test_series_grouping() {
        let mut s = scene();
        let target = HitTarget::from_scene(&s, 0);
        mouseover(&mut s, &[Role::Bar], HoverGroup::Series, target);

        assert_eq!(s.shapes[0].emphasis, Emphasis::Bolden);
        assert_eq!(s.shapes[1].emphasis, Emphasis::Bolden);
        assert_eq!(s.shapes[2].emphasis, Emphasis::Faded);
    }

    #[test]
    fn test_point_grouping() {
        let mut s = scene();
        let target = HitTarget::from_scene(&s, 0);
        mouseover(&mut s, &[Role::Bar], HoverGroup::Point, target);

        assert_eq!(s.shapes[0].emphasis, Emphasis::Bolden);
        assert_eq!(s.shapes[1].emphasis, Emphasis::Faded);
        assert_eq!(s.shapes[2].emphasis, Emphasis::Faded);
    }

    #[test]
    fn test_other_roles_untouched() {
        let mut s = scene();
        s.push(Shape::new(
            ShapeKind::Rect {
                rect: Rect::new(0.0, 0.0, 5.0, 5.0),
                fill: None,
                stroke: Some(Rgba::BLACK),
                stroke_width: 1.0,
            },
            Role::Grid,
        ));
        let target = HitTarget::from_scene(&s, 0);
        mouseover(&mut s, &[Role::Bar], HoverGroup::Series, target);
        assert_eq!(s.shapes[3].emphasis, Emphasis::Normal);
    }

    #[test]
    fn test_mouseout_clears() {
        let mut s = scene();
        let target = HitTarget::from_scene(&s, 0);
        mouseover(&mut s, &[Role::Bar], HoverGroup::Series, target);
        mouseout(&mut s);
        assert!(s.shapes.iter().all(|sh| sh.emphasis == Emphasis::Normal));
    }
}
