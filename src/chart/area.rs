//! Area chart: filled series over a time axis, with stacked, streamed, and
//! expanded layouts.

use tracing::debug;

use crate::annotate::{AnnotationConfig, Annotator};
use crate::axis::{self, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, draw_x_thresholds, draw_y_thresholds, impl_chart_lifecycle,
    impl_config_accessors, interpolate_path, render_legend, Config, Dispatch, Event, Interpolate,
    ANNOTATE_FORM_SIZE,
};
use crate::error::Result;
use crate::format::TickFormat;
use crate::geometry::Point;
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scale::{ensure_span, ContinuousScale, LinearScale, Scale, TimeScale};
use crate::scene::{Role, Scene, Shape, ShapeKind};
use crate::series::{self, Series};
use crate::stack::{self, StackOffset, StackOrder};
use crate::tooltip::{Tooltip, TooltipContent};

/// Fill opacity for area bands.
const AREA_OPACITY: f64 = 0.85;

/// Area chart.
#[derive(Debug, Clone)]
pub struct AreaChart {
    config: Config,
    data: Vec<Series>,
    stacked: bool,
    streamed: bool,
    expanded: bool,
    interpolate: Interpolate,
    series_format: Option<fn(&str) -> String>,
    annotate: bool,
    annotator: Annotator,
    dispatch: Dispatch,
    tooltip: Tooltip,
    legend: Legend,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    last_x: Option<TimeScale>,
    last_y: Option<LinearScale>,
    hover: Option<HitTarget>,
}

impl Default for AreaChart {
    fn default() -> Self {
        Self::new()
    }
}

impl AreaChart {
    /// Create an area chart. Time tick labels are the x default.
    #[must_use]
    pub fn new() -> Self {
        let mut config = Config::default();
        config.x_tick_format = Some(TickFormat::MultiTime);
        Self {
            config,
            data: Vec::new(),
            stacked: false,
            streamed: false,
            expanded: false,
            interpolate: Interpolate::Linear,
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

    /// Stack the series from zero.
    #[must_use]
    pub fn stacked(mut self, on: bool) -> Self {
        self.stacked = on;
        self
    }

    /// Streamgraph layout (wiggle offset, inside-out order).
    #[must_use]
    pub fn streamed(mut self, on: bool) -> Self {
        self.streamed = on;
        self
    }

    /// Normalize each x slot to `[0, 1]`; y ticks become percentages.
    #[must_use]
    pub fn expanded(mut self, on: bool) -> Self {
        self.expanded = on;
        self
    }

    /// Set the path interpolation mode.
    #[must_use]
    pub fn interpolate(mut self, mode: Interpolate) -> Self {
        self.interpolate = mode;
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

    fn layered(&self) -> bool {
        self.stacked || self.streamed || self.expanded
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
        if refs.is_empty() {
            return Err(crate::Error::EmptyData);
        }

        // Stacked layouts need the per-point baselines up front
        let stacked = if self.layered() {
            let (offset, order) = if self.streamed {
                (StackOffset::Wiggle, StackOrder::InsideOut)
            } else if self.expanded {
                (StackOffset::Expand, StackOrder::Input)
            } else {
                (StackOffset::Zero, StackOrder::Input)
            };
            Some(stack::stack(&refs, offset, order)?)
        } else {
            None
        };

        let x_dom = ensure_span(
            self.config
                .x_domain
                .resolve(series::x_extent(&refs).unwrap_or((0.0, 1.0))),
        );

        let y_dom = if self.expanded {
            (0.0, 1.0)
        } else {
            let data_min = series::y_extent(&refs).map_or(0.0, |e| e.0);
            let data_max = match &stacked {
                Some(layers) => stack::stacked_max(layers),
                None => series::y_extent(&refs).map_or(1.0, |e| e.1),
            };
            ensure_span(self.config.y_domain.resolve((data_min.min(0.0), data_max)))
        };

        let x = TimeScale::new(x_dom, (0.0, plot.width))?;
        let y = LinearScale::new(y_dom, (plot.height, 0.0))?;

        let x_format = self.config.x_tick_format.unwrap_or(TickFormat::MultiTime);
        let y_format = if self.expanded {
            TickFormat::Percent
        } else {
            self.config.y_tick_format.unwrap_or(TickFormat::UnitSuffix)
        };
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

        // One filled band per series
        for (pos, (si, s)) in enabled.iter().enumerate() {
            let label = self.label_of(&s.key);
            let color = self.config.palette.color_for(&label);

            let (top, bottom): (Vec<Point>, Vec<Point>) = match &stacked {
                Some(layers) => {
                    let layer = &layers[pos];
                    (
                        layer
                            .points
                            .iter()
                            .map(|p| {
                                Point::new(
                                    plot.x + x.scale(p.x),
                                    plot.y + y.scale(p.y0 + p.y),
                                )
                            })
                            .collect(),
                        layer
                            .points
                            .iter()
                            .map(|p| Point::new(plot.x + x.scale(p.x), plot.y + y.scale(p.y0)))
                            .collect(),
                    )
                }
                None => (
                    s.values
                        .iter()
                        .map(|p| Point::new(plot.x + x.scale(p.x), plot.y + y.scale(p.y)))
                        .collect(),
                    s.values
                        .iter()
                        .map(|p| Point::new(plot.x + x.scale(p.x), plot.bottom()))
                        .collect(),
                ),
            };

            let mut outline = interpolate_path(&top, self.interpolate);
            let mut lower = interpolate_path(&bottom, self.interpolate);
            lower.reverse();
            outline.extend(lower);

            scene.push(
                Shape::new(
                    ShapeKind::Polygon {
                        points: outline,
                        fill: color,
                        stroke: None,
                    },
                    Role::Area,
                )
                .series(*si)
                .opacity(AREA_OPACITY),
            );
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

    fn series_tooltip(&self, target: HitTarget, p: Point) -> Option<TooltipContent> {
        // Series-name tooltips only make sense with multiple visible series
        if series::enabled(&self.data).len() < 2 {
            return None;
        }
        let si = target.series?;
        let s = self.data.get(si)?;

        if let Some(f) = self.config.tooltip_fn {
            let (dx, dy) = self.data_coords(p)?;
            return Some(f(&s.key, dx, dy));
        }
        Some(TooltipContent::heading(self.label_of(&s.key)))
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
                    .filter(|t| t.role == Role::Area),
            ),
            None => return,
        };

        match target {
            Some(target) if self.hover == Some(target) => {
                if self.config.tooltips && self.tooltip.visible() {
                    self.tooltip.update(p.x, p.y, bounds);
                }
                self.dispatch.emit(Event::MouseMove);
            }
            Some(target) => {
                let content = if self.config.tooltips {
                    self.series_tooltip(target, p)
                } else {
                    None
                };
                if let Some(scene) = self.scene.as_mut() {
                    interact::mouseover(scene, &[Role::Area], HoverGroup::Series, target);
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
            Role::Area => self.dispatch.emit(Event::Click {
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
            Role::Area => self.dispatch.emit(Event::DblClick {
                series: target.series,
                point: None,
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

impl_config_accessors!(AreaChart);
impl_chart_lifecycle!(AreaChart);
