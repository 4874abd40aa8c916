//! Pie / donut chart.
//!
//! Each datum is one slice; slice order follows input order (no sorting).
//! The legend keys are the slice labels, and toggling a legend entry
//! removes its slice from the layout.

use crate::chart::base::{
    begin_scene, impl_chart_lifecycle, impl_config_accessors, render_legend, Config, Dispatch,
    Event,
};
use crate::error::Result;
use crate::format::{percent, TickFormat};
use crate::geometry::{polar, Point};
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};
use crate::series::Series;
use crate::tooltip::{Tooltip, TooltipContent};

/// Slices with a smaller share than this get no centroid label.
const LABEL_THRESHOLD: f64 = 0.02;

/// Gap between the outer radius and the chart box edge.
const OUTER_INSET: f64 = 10.0;

/// Pie chart.
#[derive(Debug, Clone)]
pub struct PieChart {
    config: Config,
    data: Vec<Series>,
    donut: bool,
    dispatch: Dispatch,
    tooltip: Tooltip,
    legend: Legend,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    hover: Option<HitTarget>,
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new()
    }
}

impl PieChart {
    /// Create a pie chart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            data: Vec::new(),
            donut: false,
            dispatch: Dispatch::default(),
            tooltip: Tooltip::default(),
            legend: Legend::default(),
            scene: None,
            prev_scene: None,
            hover: None,
        }
    }

    /// Set the slices from label/value pairs.
    #[must_use]
    pub fn slices(mut self, slices: &[(&str, f64)]) -> Self {
        self.data = slices
            .iter()
            .map(|(label, value)| Series::new(*label, &[(0.0, *value)]))
            .collect();
        self
    }

    /// Render as a donut (inner radius at half the outer).
    #[must_use]
    pub fn donut(mut self, on: bool) -> Self {
        self.donut = on;
        self
    }

    fn slice_value(s: &Series) -> f64 {
        s.values.first().map_or(0.0, |p| p.y)
    }

    fn build_scene(&mut self, _update: bool) -> Result<Scene> {
        let mut scene = begin_scene(&self.config);

        let legend_height = render_legend(
            &mut scene,
            &mut self.config,
            &mut self.legend,
            &self.data,
            |s| s.key.clone(),
        );
        let layout = self.config.layout(self.config.legend, legend_height);
        scene.plot = layout.plot;
        let plot = layout.plot;
        let m = layout.margin;

        let enabled: Vec<(usize, &Series)> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.disabled)
            .collect();
        if enabled.is_empty() {
            return Err(crate::Error::EmptyData);
        }

        let total: f64 = enabled.iter().map(|(_, s)| Self::slice_value(s)).sum();
        if total <= 0.0 {
            return Err(crate::Error::EmptyData);
        }

        // The pie fills the chart box including its margins
        let box_w = plot.width + m.left + m.right;
        let box_h = plot.height + m.top + m.bottom;
        let center = Point::new(plot.x - m.left + box_w / 2.0, plot.y - m.top + box_h / 2.0);
        let outer = (box_w.min(box_h) / 2.0 - OUTER_INSET).max(1.0);
        let inner = if self.donut { outer / 2.0 } else { 0.0 };

        let labels: Vec<String> = enabled.iter().map(|(_, s)| s.key.clone()).collect();

        let mut angle = 0.0;
        for ((si, s), label) in enabled.iter().zip(&labels) {
            let value = Self::slice_value(s);
            let share = value / total;
            let end = angle + share * std::f64::consts::TAU;
            let color = self.config.palette.color_for(label);

            scene.push(
                Shape::new(
                    ShapeKind::Arc {
                        center,
                        inner_radius: inner,
                        outer_radius: outer,
                        start_angle: angle,
                        end_angle: end,
                        fill: color,
                    },
                    Role::Slice,
                )
                .series(*si),
            );

            // Centroid labels only without a legend, and only on slices big
            // enough to carry them
            if !self.config.legend && share > LABEL_THRESHOLD {
                let mid = (angle + end) / 2.0;
                let centroid = polar(center, (inner + outer) / 2.0, mid);
                scene.push(Shape::new(
                    ShapeKind::Text {
                        pos: centroid,
                        text: label.clone(),
                        size: 11.0,
                        color: self.config.theme.text,
                        anchor: TextAnchor::Middle,
                        rotation: None,
                    },
                    Role::Slice,
                ));
            }

            angle = end;
        }

        self.hover = None;
        Ok(scene)
    }

    fn slice_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let si = target.series?;
        let s = self.data.get(si)?;
        let value = Self::slice_value(s);

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, 0.0, value));
        }

        let total: f64 = self
            .data
            .iter()
            .filter(|s| !s.disabled)
            .map(Self::slice_value)
            .sum();
        let share = if total > 0.0 { value / total } else { 0.0 };

        Some(
            TooltipContent::heading(s.key.clone())
                .line(
                    self.config
                        .y_format
                        .unwrap_or(TickFormat::GroupedInt)
                        .format(value),
                )
                .line(percent(share)),
        )
    }

    /// Pointer motion: hover bookkeeping.
    pub fn pointer_moved(&mut self, p: Point) {
        let (bounds, target) = match self.scene.as_ref() {
            Some(scene) => (
                (scene.width, scene.height),
                scene
                    .hit_test(p)
                    .map(|i| HitTarget::from_scene(scene, i))
                    .filter(|t| t.role == Role::Slice),
            ),
            None => return,
        };

        match target {
            Some(target) if self.hover == Some(target) => {
                if self.config.tooltips {
                    self.tooltip.update(p.x, p.y, bounds);
                }
                self.dispatch.emit(Event::MouseMove);
            }
            Some(target) => {
                let content = if self.config.tooltips {
                    self.slice_tooltip(target)
                } else {
                    None
                };
                if let Some(scene) = self.scene.as_mut() {
                    interact::mouseover(scene, &[Role::Slice], HoverGroup::Series, target);
                }
                self.hover = Some(target);
                if let Some(content) = content {
                    self.tooltip.show(p.x, p.y, bounds, content);
                }
                self.dispatch.emit(Event::MouseOver {
                    series: target.series,
                    point: None,
                });
            }
            None => {
                if self.hover.take().is_some() {
                    if let Some(scene) = self.scene.as_mut() {
                        interact::mouseout(scene);
                    }
                    self.tooltip.hide();
                    self.dispatch.emit(Event::MouseOut);
                }
            }
        }
    }

    /// Pointer left the chart entirely.
    pub fn pointer_left(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            interact::mouseout(scene);
        }
        self.hover = None;
        self.tooltip.hide();
    }

    /// Primary activation at a point.
    pub fn pointer_clicked(&mut self, p: Point) -> Result<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let Some(idx) = scene.hit_test(p) else {
            return Ok(());
        };
        let target = HitTarget::from_scene(scene, idx);

        match target.role {
            Role::Legend => {
                let series = target.series.unwrap_or(0);
                if self.config.legend_toggle {
                    self.toggle_series(series);
                    self.dispatch.emit(Event::LegendClick { series });
                    self.update()?;
                } else {
                    self.dispatch.emit(Event::LegendClick { series });
                }
            }
            Role::Slice => self.dispatch.emit(Event::Click {
                series: target.series,
                point: None,
            }),
            _ => {}
        }
        Ok(())
    }

    /// Double activation at a point.
    pub fn pointer_double_clicked(&mut self, p: Point) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let Some(idx) = scene.hit_test(p) else {
            return;
        };
        let target = HitTarget::from_scene(scene, idx);
        match target.role {
            Role::Legend => self.dispatch.emit(Event::LegendDblClick {
                series: target.series.unwrap_or(0),
            }),
            Role::Slice => self.dispatch.emit(Event::DblClick {
                series: target.series,
                point: None,
            }),
            _ => {}
        }
    }
}

impl_config_accessors!(PieChart);
impl_chart_lifecycle!(PieChart);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Emphasis;

    fn chart() -> PieChart {
        PieChart::new()
            .dimensions(500.0, 400.0)
            .slices(&[("a", 50.0), ("b", 30.0), ("c", 20.0)])
    }

    fn arcs(scene: &Scene) -> Vec<(usize, f64, f64)> {
        scene
            .shapes
            .iter()
            .filter_map(|s| match (&s.kind, s.role) {
                (
                    ShapeKind::Arc {
                        start_angle,
                        end_angle,
                        ..
                    },
                    Role::Slice,
                ) => Some((s.series.unwrap(), *start_angle, *end_angle)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slices_tile_the_circle() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let arcs = arcs(scene);
        assert_eq!(arcs.len(), 3);
        assert!((arcs[0].1 - 0.0).abs() < 1e-9);
        assert!((arcs[2].2 - std::f64::consts::TAU).abs() < 1e-9);
        // Adjacent slices share edges, input order preserved
        assert!((arcs[0].2 - arcs[1].1).abs() < 1e-9);
        assert!((arcs[1].2 - arcs[2].1).abs() < 1e-9);
    }

    #[test]
    fn test_share_proportional_angles() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let arcs = arcs(scene);
        let half = arcs[0].2 - arcs[0].1;
        assert!((half - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_donut_inner_radius() {
        let mut c = chart().donut(true);
        let scene = c.render().unwrap();
        let inner = scene
            .shapes
            .iter()
            .find_map(|s| match &s.kind {
                ShapeKind::Arc {
                    inner_radius,
                    outer_radius,
                    ..
                } => Some((*inner_radius, *outer_radius)),
                _ => None,
            })
            .unwrap();
        assert!((inner.0 - inner.1 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels_only_without_legend() {
        let mut with_legend = chart();
        let scene = with_legend.render().unwrap();
        let texts = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Slice && matches!(s.kind, ShapeKind::Text { .. }))
            .count();
        assert_eq!(texts, 0);

        let mut without = chart().legend(false);
        let scene = without.render().unwrap();
        let texts = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Slice && matches!(s.kind, ShapeKind::Text { .. }))
            .count();
        assert_eq!(texts, 3);
    }

    #[test]
    fn test_tiny_slice_unlabeled() {
        let mut c = PieChart::new()
            .dimensions(500.0, 400.0)
            .legend(false)
            .slices(&[("big", 99.0), ("tiny", 1.0)]);
        let scene = c.render().unwrap();
        let labels: Vec<&str> = scene
            .shapes
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Text { text, .. } if s.role == Role::Slice => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["big"]);
    }

    #[test]
    fn test_legend_toggle_removes_slice() {
        let mut c = chart();
        c.render().unwrap();
        c.toggle_series(0);
        c.update().unwrap();
        let scene = c.scene().unwrap();
        let arcs = arcs(scene);
        assert_eq!(arcs.len(), 2);
        // Remaining slices retile the full circle
        assert!((arcs.last().unwrap().2 - std::f64::consts::TAU).abs() < 1e-9);
    }

    #[test]
    fn test_hover_and_tooltip_share() {
        let mut c = chart();
        c.render().unwrap();
        // Probe inside the first slice (50% spans the right half)
        let scene = c.scene().unwrap();
        let ShapeKind::Arc { center, outer_radius, .. } = &scene.shapes
            .iter()
            .find(|s| s.role == Role::Slice)
            .unwrap()
            .kind
        else {
            panic!("expected arc");
        };
        let probe = polar(*center, outer_radius / 2.0, std::f64::consts::FRAC_PI_2);
        c.pointer_moved(probe);

        let tip = c.tooltip_state().unwrap();
        assert_eq!(tip.content.heading, "a");
        assert!(tip.content.lines.contains(&"50%".to_string()));

        let scene = c.scene().unwrap();
        let faded = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Slice && s.emphasis == Emphasis::Faded)
            .count();
        assert_eq!(faded, 2);
    }

    #[test]
    fn test_zero_total_errors() {
        let mut c = PieChart::new().slices(&[("a", 0.0), ("b", 0.0)]);
        assert!(c.render().is_err());
    }
}
