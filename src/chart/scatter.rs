//! Scatter chart: linear x and y, one circle per point.

use tracing::debug;

use crate::annotate::{AnnotationConfig, Annotator};
use crate::axis::{self, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, draw_x_thresholds, draw_y_thresholds, impl_chart_lifecycle,
    impl_config_accessors, render_legend, Config, Dispatch, Event, ANNOTATE_FORM_SIZE,
};
use crate::error::Result;
use crate::format::TickFormat;
use crate::geometry::Point;
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scale::{ensure_span, ContinuousScale, LinearScale, Scale};
use crate::scene::{Role, Scene, Shape, ShapeKind};
use crate::series::{self, Series};
use crate::tooltip::{Tooltip, TooltipContent};

/// Default point radius.
const DEFAULT_RADIUS: f64 = 3.0;

/// Scatter chart.
#[derive(Debug, Clone)]
pub struct ScatterChart {
    config: Config,
    data: Vec<Series>,
    radius: f64,
    series_format: Option<fn(&str) -> String>,
    annotate: bool,
    annotator: Annotator,
    dispatch: Dispatch,
    tooltip: Tooltip,
    legend: Legend,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    last_x: Option<LinearScale>,
    last_y: Option<LinearScale>,
    hover: Option<HitTarget>,
}

impl Default for ScatterChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterChart {
    /// Create a scatter chart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            data: Vec::new(),
            radius: DEFAULT_RADIUS,
            series_format: None,
            annotate: false,
            annotator: Annotator::default(),
            dispatch: Dispatch::default(),
            tooltip: Tooltip::default(),
            legend: Legend::default(),
            scene: None,
            prev_scene: None,
            last_x: None,
            last_y: None,
            hover: None,
        }
    }

    /// Set the chart data from a bare point list; the legend is suppressed.
    #[must_use]
    pub fn data_points(mut self, points: &[(f64, f64)]) -> Self {
        self.data = series::wrap_points(points);
        self.config.legend = false;
        self
    }

    /// Set the point radius.
    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(0.5);
        self
    }

    /// Set the series name formatter.
    #[must_use]
    pub fn series_format(mut self, f: fn(&str) -> String) -> Self {
        self.series_format = Some(f);
        self
    }

    /// Allow user-drawn annotations.
    #[must_use]
    pub fn annotate(mut self, on: bool) -> Self {
        self.annotate = on;
        self
    }

    fn label_of(&self, key: &str) -> String {
        self.series_format.map_or_else(|| key.to_string(), |f| f(key))
    }

    fn build_scene(&mut self, _update: bool) -> Result<Scene> {
        let mut scene = begin_scene(&self.config);

        let fmt = self.series_format;
        let legend_height = render_legend(
            &mut scene,
            &mut self.config,
            &mut self.legend,
            &self.data,
            |s| fmt.map_or_else(|| s.key.clone(), |f| f(&s.key)),
        );
        let layout = self.config.layout(self.config.legend, legend_height);
        scene.plot = layout.plot;
        let plot = layout.plot;

        let enabled: Vec<(usize, &Series)> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.disabled)
            .collect();
        let refs: Vec<&Series> = enabled.iter().map(|(_, s)| *s).collect();

        let x_dom = ensure_span(
            self.config
                .x_domain
                .resolve(series::x_extent(&refs).unwrap_or((0.0, 1.0))),
        );
        let y_dom = ensure_span(
            self.config
                .y_domain
                .resolve(series::y_extent(&refs).unwrap_or((0.0, 1.0))),
        );

        let x = LinearScale::new(x_dom, (0.0, plot.width))?;
        let y = LinearScale::new(y_dom, (plot.height, 0.0))?;

        let x_format = self.config.x_tick_format.unwrap_or(TickFormat::Plain);
        let y_format = self.config.y_tick_format.unwrap_or(TickFormat::UnitSuffix);
        axis::draw_bottom_axis(
            &mut scene,
            plot,
            &axis::continuous_ticks(&x, DEFAULT_TICK_COUNT, &x_format),
            &self.config.theme,
            self.config.grid,
            self.config.x_label.as_deref(),
            layout.margin.bottom,
        );
        axis::draw_left_axis(
            &mut scene,
            plot,
            &axis::continuous_ticks(&y, DEFAULT_TICK_COUNT, &y_format),
            &self.config.theme,
            self.config.grid,
            self.config.y_label.as_deref(),
            layout.margin.left,
        );

        for (si, s) in &enabled {
            let label = self.label_of(&s.key);
            let color = self.config.palette.color_for(&label);
            for (pi, p) in s.values.iter().enumerate() {
                scene.push(
                    Shape::new(
                        ShapeKind::Circle {
                            center: Point::new(plot.x + x.scale(p.x), plot.y + y.scale(p.y)),
                            radius: self.radius,
                            fill: Some(color),
                            stroke: None,
                        },
                        Role::Point,
                    )
                    .series(*si)
                    .point(pi),
                );
            }
        }

        draw_x_thresholds(&mut scene, plot, &self.config.x_thresholds, |v| x.scale(v));
        draw_y_thresholds(&mut scene, plot, &self.config.y_thresholds, |v| y.scale(v));

        if let Some(shapes) = self.annotator.overlay(&x, &y, plot) {
            scene.shapes.extend(shapes);
        }

        self.last_x = Some(x);
        self.last_y = Some(y);
        self.hover = None;
        Ok(scene)
    }

    fn default_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let si = target.series?;
        let pi = target.point?;
        let s = self.data.get(si)?;
        let p = s.values.get(pi)?;

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, p.x, p.y));
        }

        let multi = series::enabled(&self.data).len() > 1;
        let x_str = self
            .config
            .x_format
            .unwrap_or(TickFormat::Plain)
            .format(p.x);
        let heading = if multi {
            format!("{x_str} - {}", self.label_of(&s.key))
        } else {
            x_str
        };
        Some(
            TooltipContent::heading(heading).line(
                self.config
                    .y_format
                    .unwrap_or(TickFormat::GroupedInt)
                    .format(p.y),
            ),
        )
    }

    fn data_coords(&self, p: Point) -> Option<(f64, f64)> {
        let (x, y) = (self.last_x?, self.last_y?);
        let plot = self.scene.as_ref()?.plot;
        Some((x.invert(p.x - plot.x), y.invert(p.y - plot.y)))
    }

    fn refresh_annotation(&mut self) {
        let (Some(x), Some(y)) = (self.last_x, self.last_y) else {
            return;
        };
        if let Some(scene) = self.scene.as_mut() {
            scene.shapes.retain(|s| s.role != Role::Annotation);
            if let Some(shapes) = self.annotator.overlay(&x, &y, scene.plot) {
                scene.shapes.extend(shapes);
            }
        }
    }

    /// Pointer motion: annotation dragging, then hover bookkeeping.
    pub fn pointer_moved(&mut self, p: Point) {
        if self.annotate && self.annotator.dragging() {
            if let Some(data) = self.data_coords(p) {
                self.annotator.mousemove(data);
                self.refresh_annotation();
            }
            return;
        }

        let (bounds, target) = match self.scene.as_ref() {
            Some(scene) => (
                (scene.width, scene.height),
                scene
                    .hit_test(p)
                    .map(|i| HitTarget::from_scene(scene, i))
                    .filter(|t| t.role == Role::Point),
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
                    self.default_tooltip(target)
                } else {
                    None
                };
                if let Some(scene) = self.scene.as_mut() {
                    interact::mouseover(scene, &[Role::Point], HoverGroup::Series, target);
                }
                self.hover = Some(target);
                if let Some(content) = content {
                    self.tooltip.show(p.x, p.y, bounds, content);
                }
                self.dispatch.emit(Event::MouseOver {
                    series: target.series,
                    point: target.point,
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

    /// Pointer press: begins an annotation drag when enabled.
    pub fn pointer_pressed(&mut self, p: Point) {
        if !self.annotate {
            return;
        }
        let (Some(x), Some(y)) = (self.last_x, self.last_y) else {
            return;
        };
        if let Some(data) = self.data_coords(p) {
            self.annotator.mousedown(data, x.domain(), y.domain());
        }
    }

    /// Pointer release: completes an annotation drag when enabled.
    pub fn pointer_released(&mut self, p: Point) {
        if !self.annotate {
            return;
        }
        let wrapper = (self.config.width(), self.config.height());
        self.annotator.mouseup(p, wrapper, ANNOTATE_FORM_SIZE);
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
            Role::Point => self.dispatch.emit(Event::Click {
                series: target.series,
                point: target.point,
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
            Role::Point => self.dispatch.emit(Event::DblClick {
                series: target.series,
                point: target.point,
            }),
            _ => {}
        }
    }

    /// Confirm the annotation configuration form.
    pub fn apply_annotation(
        &mut self,
        color: crate::color::Rgba,
        stroke_width: f64,
        label: Option<String>,
    ) {
        if let Some(cfg) = self.annotator.apply_config(color, stroke_width, label) {
            debug!(?cfg.bbox, "annotation confirmed");
            self.dispatch.emit(Event::Annotate(cfg));
            self.refresh_annotation();
        }
    }

    /// Force-draw a stored annotation.
    pub fn draw_annotation(&mut self, cfg: &AnnotationConfig) {
        if !self.annotate {
            return;
        }
        self.annotator.replay(cfg);
        self.refresh_annotation();
    }
}

impl_config_accessors!(ScatterChart);
impl_chart_lifecycle!(ScatterChart);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Emphasis;

    fn chart() -> ScatterChart {
        ScatterChart::new()
            .dimensions(640.0, 480.0)
            .data(vec![
                Series::new("a", &[(0.0, 10.0), (5.0, 20.0), (10.0, 15.0)]),
                Series::new("b", &[(0.0, 30.0), (5.0, 5.0), (10.0, 25.0)]),
            ])
    }

    fn point_center(scene: &Scene, series: usize, point: usize) -> Point {
        scene
            .shapes
            .iter()
            .find_map(|s| match (&s.kind, s.role) {
                (ShapeKind::Circle { center, .. }, Role::Point)
                    if s.series == Some(series) && s.point == Some(point) =>
                {
                    Some(*center)
                }
                _ => None,
            })
            .expect("point shape")
    }

    #[test]
    fn test_render_emits_points_per_series() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let points = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Point)
            .count();
        assert_eq!(points, 6);
    }

    #[test]
    fn test_disabled_series_not_drawn() {
        let mut c = chart();
        c.toggle_series(1);
        let scene = c.render().unwrap();
        assert!(scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Point)
            .all(|s| s.series == Some(0)));
    }

    #[test]
    fn test_points_inside_plot() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let plot = scene.plot;
        for s in scene.shapes.iter().filter(|s| s.role == Role::Point) {
            let ShapeKind::Circle { center, .. } = &s.kind else {
                panic!("expected circle");
            };
            assert!(center.x >= plot.x - 1e-6 && center.x <= plot.right() + 1e-6);
            assert!(center.y >= plot.y - 1e-6 && center.y <= plot.bottom() + 1e-6);
        }
    }

    #[test]
    fn test_hover_fades_other_series() {
        let mut c = chart();
        c.render().unwrap();
        let target = point_center(c.scene().unwrap(), 0, 0);
        c.pointer_moved(target);

        let scene = c.scene().unwrap();
        let faded = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Point && s.emphasis == Emphasis::Faded)
            .count();
        assert_eq!(faded, 3);
        assert!(c.tooltip_state().is_some_and(|t| t.visible));

        let events = c.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::MouseOver { series: Some(0), .. })));
    }

    #[test]
    fn test_hover_out_clears() {
        let mut c = chart();
        c.render().unwrap();
        let target = point_center(c.scene().unwrap(), 0, 0);
        c.pointer_moved(target);
        c.pointer_moved(Point::new(1.0, 1.0));

        let scene = c.scene().unwrap();
        assert!(scene
            .shapes
            .iter()
            .all(|s| s.emphasis == Emphasis::Normal));
        assert!(!c.tooltip_state().is_some_and(|t| t.visible));
    }

    #[test]
    fn test_tooltip_includes_series_when_multi() {
        let mut c = chart();
        c.render().unwrap();
        let target = point_center(c.scene().unwrap(), 1, 1);
        c.pointer_moved(target);
        let tip = c.tooltip_state().unwrap();
        assert!(tip.content.heading.contains('b'));
    }

    #[test]
    fn test_legend_click_toggles_and_rerenders() {
        let mut c = chart();
        c.render().unwrap();
        let legend_pos = c
            .scene()
            .unwrap()
            .shapes
            .iter()
            .find_map(|s| match (&s.kind, s.role) {
                (ShapeKind::Rect { rect, .. }, Role::Legend) if s.series == Some(1) => {
                    Some(rect.center())
                }
                _ => None,
            })
            .expect("legend swatch");

        c.pointer_clicked(legend_pos).unwrap();
        assert!(c.series()[1].disabled);
        assert!(c
            .take_events()
            .iter()
            .any(|e| matches!(e, Event::LegendClick { series: 1 })));
        // Re-rendered without the toggled series
        assert!(c
            .scene()
            .unwrap()
            .shapes
            .iter()
            .filter(|s| s.role == Role::Point)
            .all(|s| s.series == Some(0)));
    }

    #[test]
    fn test_annotation_drag_emits_event() {
        let mut c = chart().annotate(true);
        c.render().unwrap();
        let plot = c.scene().unwrap().plot;

        let start = Point::new(plot.x + 20.0, plot.y + 20.0);
        let end = Point::new(plot.x + 120.0, plot.y + 90.0);
        c.pointer_pressed(start);
        c.pointer_moved(end);
        c.pointer_released(end);
        c.apply_annotation(crate::color::Rgba::RED, 4.0, Some("note".into()));

        let events = c.take_events();
        let annotate = events
            .iter()
            .find_map(|e| match e {
                Event::Annotate(cfg) => Some(cfg.clone()),
                _ => None,
            })
            .expect("annotate event");
        assert!(annotate.label.as_deref() == Some("note"));

        // Overlay present in the scene
        assert!(c
            .scene()
            .unwrap()
            .shapes
            .iter()
            .any(|s| s.role == Role::Annotation));
    }

    #[test]
    fn test_annotation_survives_update() {
        let mut c = chart().annotate(true);
        c.render().unwrap();
        let plot = c.scene().unwrap().plot;
        c.pointer_pressed(Point::new(plot.x + 20.0, plot.y + 20.0));
        c.pointer_moved(Point::new(plot.x + 120.0, plot.y + 90.0));
        c.pointer_released(Point::new(plot.x + 120.0, plot.y + 90.0));
        c.apply_annotation(crate::color::Rgba::RED, 4.0, None);

        c.update().unwrap();
        assert!(c
            .scene()
            .unwrap()
            .shapes
            .iter()
            .any(|s| s.role == Role::Annotation));
    }

    #[test]
    fn test_data_points_suppresses_legend() {
        let mut c = ScatterChart::new().data_points(&[(0.0, 1.0), (1.0, 2.0)]);
        let scene = c.render().unwrap();
        assert!(scene.shapes.iter().all(|s| s.role != Role::Legend));
    }

    #[test]
    fn test_resize_changes_scene_size() {
        let mut c = chart();
        c.render().unwrap();
        c.resize(800.0, 300.0).unwrap();
        let scene = c.scene().unwrap();
        assert!((scene.width - 796.0).abs() < 1e-9);
        assert!((scene.height - 296.0).abs() < 1e-9);
    }

    #[test]
    fn test_svg_and_png_outputs() {
        let mut c = chart();
        c.render().unwrap();
        assert!(c.to_svg().unwrap().contains("<circle"));
        let png = c.to_png().unwrap();
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_scene_at_enter_fades_points() {
        let mut c = chart();
        c.render().unwrap();
        let half = c.scene_at(0.5).unwrap();
        let point = half
            .shapes
            .iter()
            .find(|s| s.role == Role::Point)
            .unwrap();
        assert!((point.opacity - 0.5).abs() < 1e-9);
    }
}
