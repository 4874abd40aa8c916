//! Line chart: time x, optional point markers, focus (context strip with an
//! x brush) and index (percent-change rebasing with a draggable baseline)
//! modes.

use tracing::debug;

use crate::annotate::{AnnotationConfig, Annotator};
use crate::axis::{self, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, draw_x_thresholds, draw_y_thresholds, impl_chart_lifecycle,
    impl_config_accessors, interpolate_path, render_legend, Config, Dispatch, Event, Interpolate,
    ANNOTATE_FORM_SIZE,
};
use crate::error::Result;
use crate::format::{signed_percent, TickFormat};
use crate::geometry::{Line as Segment, Point, Rect};
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scale::{ensure_span, ContinuousScale, LinearScale, Scale, TimeScale};
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};
use crate::series::{self, Series};
use crate::tooltip::{Tooltip, TooltipContent};

/// Default point radius.
const DEFAULT_RADIUS: f64 = 3.0;

/// Height fraction of the context strip in focus mode.
const CONTEXT_FRACTION: f64 = 0.1;

/// Gap between the main plot and the context strip.
const CONTEXT_GAP: f64 = 40.0;

/// Hint shown next to a freshly created index line.
const INDEX_HINT: &str = "<- Drag Index Line";

/// One display point: pixel source data after cut/rebase.
#[derive(Debug, Clone, Copy)]
struct DisplayPoint {
    x: f64,
    y: f64,
    orig: f64,
}

/// One series after index-mode trimming and rebasing.
#[derive(Debug, Clone)]
struct DisplaySeries {
    index: usize,
    key: String,
    points: Vec<DisplayPoint>,
}

/// Line chart.
#[derive(Debug, Clone)]
pub struct LineChart {
    config: Config,
    data: Vec<Series>,
    points: bool,
    radius: f64,
    focus: bool,
    index: bool,
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
    display: Vec<DisplaySeries>,
    brush_extent: Option<(f64, f64)>,
    baseline_index: Option<usize>,
    hover: Option<HitTarget>,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChart {
    /// Create a line chart. Time tick labels are the x default.
    #[must_use]
    pub fn new() -> Self {
        let mut config = Config::default();
        config.x_tick_format = Some(TickFormat::MultiTime);
        Self {
            config,
            data: Vec::new(),
            points: true,
            radius: DEFAULT_RADIUS,
            focus: false,
            index: false,
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
            display: Vec::new(),
            brush_extent: None,
            baseline_index: None,
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

    /// Show or hide point markers.
    #[must_use]
    pub fn points(mut self, on: bool) -> Self {
        self.points = on;
        self
    }

    /// Set the point radius.
    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(0.5);
        self
    }

    /// Render a context strip with an x brush below the main plot.
    #[must_use]
    pub fn focus(mut self, on: bool) -> Self {
        self.focus = on;
        self
    }

    /// Rebase values to percent change against a draggable baseline.
    #[must_use]
    pub fn index(mut self, on: bool) -> Self {
        self.index = on;
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

    /// Narrow the main x domain (focus mode). `None` restores the full
    /// extent.
    pub fn brush(&mut self, extent: Option<(f64, f64)>) -> Result<&Scene> {
        self.brush_extent = extent;
        self.update()
    }

    /// Snap the index baseline to the point nearest the given plot-local x
    /// pixel and re-render (index mode).
    pub fn drag_index_line(&mut self, x_pixel: f64) -> Result<&Scene> {
        let Some(x) = self.last_x else {
            return self.update();
        };

        let mut best: Option<(f64, usize)> = None;
        if let Some(first) = self.display.first() {
            for (i, p) in first.points.iter().enumerate() {
                if p.orig == 0.0 {
                    continue;
                }
                let diff = (x.scale(p.x) - x_pixel).abs();
                if best.map_or(true, |(d, _)| diff < d) {
                    best = Some((diff, i));
                }
            }
        }

        if let Some((_, i)) = best {
            if self.baseline_index != Some(i) {
                debug!(baseline = i, "index baseline moved");
                self.baseline_index = Some(i);
            }
        }
        self.update()
    }

    fn label_of(&self, key: &str) -> String {
        self.series_format.map_or_else(|| key.to_string(), |f| f(key))
    }

    /// First slot from `from` where every series is nonzero.
    fn allowed_index(refs: &[&Series], from: usize) -> usize {
        let len = refs.first().map_or(0, |s| s.values.len());
        let mut k = from;
        while k < len {
            let blocked = refs
                .iter()
                .any(|s| s.values.get(k).map_or(true, |p| p.y == 0.0));
            if blocked {
                k += 1;
            } else {
                break;
            }
        }
        k.min(len.saturating_sub(1))
    }

    /// Trim leading slots the index baseline cannot use and rebase values.
    fn build_display(&self, refs: &[(usize, &Series)], update: bool) -> (Vec<DisplaySeries>, usize) {
        let plain: Vec<&Series> = refs.iter().map(|(_, s)| *s).collect();

        if !self.index {
            let display = refs
                .iter()
                .map(|(i, s)| DisplaySeries {
                    index: *i,
                    key: s.key.clone(),
                    points: s
                        .values
                        .iter()
                        .map(|p| DisplayPoint {
                            x: p.x,
                            y: p.y,
                            orig: p.y,
                        })
                        .collect(),
                })
                .collect();
            return (display, 0);
        }

        let cut = Self::allowed_index(&plain, 0);
        let requested = if update {
            self.baseline_index.unwrap_or(0)
        } else {
            0
        };
        let baseline = Self::allowed_index(&plain, cut + requested).saturating_sub(cut);

        let display = refs
            .iter()
            .map(|(i, s)| {
                let sliced = &s.values[cut.min(s.values.len())..];
                let base = sliced.get(baseline).map_or(1.0, |p| p.y);
                let base = if base == 0.0 { 1.0 } else { base };
                DisplaySeries {
                    index: *i,
                    key: s.key.clone(),
                    points: sliced
                        .iter()
                        .map(|p| DisplayPoint {
                            x: p.x,
                            y: p.y / base - 1.0,
                            orig: p.y,
                        })
                        .collect(),
                }
            })
            .collect();
        (display, baseline)
    }

    #[allow(clippy::too_many_lines)]
    fn build_scene(&mut self, update: bool) -> Result<Scene> {
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
        let full = layout.plot;

        let (main, context) = if self.focus {
            let h2 = full.height * CONTEXT_FRACTION;
            let h1 = (full.height - h2 - CONTEXT_GAP).max(1.0);
            (
                Rect::new(full.x, full.y, full.width, h1),
                Some(Rect::new(
                    full.x,
                    full.y + h1 + CONTEXT_GAP,
                    full.width,
                    h2,
                )),
            )
        } else {
            (full, None)
        };
        scene.plot = main;

        let enabled: Vec<(usize, &Series)> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.disabled)
            .collect();
        if enabled.is_empty() || enabled[0].1.is_empty() {
            return Err(crate::Error::EmptyData);
        }

        let (display, baseline) = self.build_display(&enabled, update);
        self.baseline_index = self.index.then_some(baseline);

        // Full extents drive the context strip and the default main domain
        let xs: Vec<f64> = display
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.x))
            .collect();
        let ys: Vec<f64> = display
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.y))
            .collect();
        let x_full = ensure_span(self.config.x_domain.resolve((
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )));
        let y_dom = ensure_span(self.config.y_domain.resolve((
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )));

        let x_main_dom = match self.brush_extent.filter(|_| self.focus) {
            Some((a, b)) => ensure_span((a.min(b), a.max(b))),
            None => x_full,
        };

        let x = TimeScale::new(x_main_dom, (0.0, main.width))?;
        let y = LinearScale::new(y_dom, (main.height, 0.0))?;

        let x_format = self.config.x_tick_format.unwrap_or(TickFormat::MultiTime);
        let y_format = if self.index {
            TickFormat::SignedPercent
        } else {
            self.config.y_tick_format.unwrap_or(TickFormat::UnitSuffix)
        };
        axis::draw_bottom_axis(
            &mut scene,
            main,
            &axis::continuous_ticks(&x, DEFAULT_TICK_COUNT, &x_format),
            &self.config.theme,
            self.config.grid,
            if self.focus {
                None
            } else {
                self.config.x_label.as_deref()
            },
            layout.margin.bottom,
        );
        axis::draw_left_axis(
            &mut scene,
            main,
            &axis::continuous_ticks(&y, DEFAULT_TICK_COUNT, &y_format),
            &self.config.theme,
            self.config.grid,
            self.config.y_label.as_deref(),
            layout.margin.left,
        );

        // Main series paths and markers, clipped to the brushed domain
        for s in &display {
            let label = self.label_of(&s.key);
            let color = self.config.palette.color_for(&label);

            let visible: Vec<&DisplayPoint> = s
                .points
                .iter()
                .filter(|p| p.x >= x_main_dom.0 && p.x <= x_main_dom.1)
                .collect();

            let run: Vec<Point> = visible
                .iter()
                .map(|p| Point::new(main.x + x.scale(p.x), main.y + y.scale(p.y)))
                .collect();
            if run.len() >= 2 {
                scene.push(
                    Shape::new(
                        ShapeKind::Polyline {
                            points: interpolate_path(&run, self.interpolate),
                            stroke: color,
                            width: 2.0,
                        },
                        Role::LinePath,
                    )
                    .series(s.index),
                );
            }

            if self.points {
                for (pi, p) in s.points.iter().enumerate() {
                    if p.x < x_main_dom.0 || p.x > x_main_dom.1 {
                        continue;
                    }
                    scene.push(
                        Shape::new(
                            ShapeKind::Circle {
                                center: Point::new(
                                    main.x + x.scale(p.x),
                                    main.y + y.scale(p.y),
                                ),
                                radius: self.radius,
                                fill: Some(color),
                                stroke: None,
                            },
                            Role::Point,
                        )
                        .series(s.index)
                        .point(pi),
                    );
                }
            }
        }

        // Context strip: full-domain miniature plus the brush window
        if let Some(ctx) = context {
            let x2 = TimeScale::new(x_full, (0.0, ctx.width))?;
            let y2 = LinearScale::new(y_dom, (ctx.height, 0.0))?;

            axis::draw_bottom_axis(
                &mut scene,
                ctx,
                &axis::continuous_ticks(&x2, DEFAULT_TICK_COUNT, &x_format),
                &self.config.theme,
                false,
                self.config.x_label.as_deref(),
                layout.margin.bottom,
            );
            // The context y axis carries no ticks
            scene.push(Shape::new(
                ShapeKind::Line {
                    line: Segment::from_coords(ctx.x, ctx.y, ctx.x, ctx.bottom()),
                    stroke: self.config.theme.axis,
                    width: 1.0,
                },
                Role::Axis,
            ));

            for s in &display {
                let label = self.label_of(&s.key);
                let color = self.config.palette.color_for(&label);
                let run: Vec<Point> = s
                    .points
                    .iter()
                    .map(|p| Point::new(ctx.x + x2.scale(p.x), ctx.y + y2.scale(p.y)))
                    .collect();
                if run.len() >= 2 {
                    scene.push(
                        Shape::new(
                            ShapeKind::Polyline {
                                points: interpolate_path(&run, self.interpolate),
                                stroke: color,
                                width: 1.0,
                            },
                            Role::Context,
                        )
                        .series(s.index),
                    );
                }
            }

            let (b0, b1) = self.brush_extent.unwrap_or(x_full);
            let bx0 = ctx.x + x2.scale(b0.min(b1));
            let bx1 = ctx.x + x2.scale(b0.max(b1));
            scene.push(
                Shape::new(
                    ShapeKind::Rect {
                        rect: Rect::new(bx0, ctx.y - 6.0, (bx1 - bx0).max(1.0), ctx.height + 7.0),
                        fill: Some(self.config.theme.axis.with_alpha(40)),
                        stroke: Some(self.config.theme.axis),
                        stroke_width: 1.0,
                    },
                    Role::Brush,
                )
                .opacity(0.8),
            );
        }

        // Index baseline line and hint
        if self.index {
            if let Some(first) = display.first() {
                if let Some(bp) = first.points.get(baseline) {
                    let ix = main.x + x.scale(bp.x);
                    scene.push(
                        Shape::new(
                            ShapeKind::Line {
                                line: Segment::from_coords(ix, main.y, ix, main.bottom()),
                                stroke: self.config.theme.text,
                                width: 2.0,
                            },
                            Role::IndexLine,
                        )
                        .point(baseline),
                    );
                    if !update {
                        scene.push(Shape::new(
                            ShapeKind::Text {
                                pos: Point::new(ix + 5.0, main.y + 12.0),
                                text: INDEX_HINT.to_string(),
                                size: 10.0,
                                color: self.config.theme.muted_text,
                                anchor: TextAnchor::Start,
                                rotation: None,
                            },
                            Role::IndexLine,
                        ));
                    }
                }
            }
        }

        draw_x_thresholds(&mut scene, main, &self.config.x_thresholds, |v| x.scale(v));
        draw_y_thresholds(&mut scene, main, &self.config.y_thresholds, |v| y.scale(v));

        if let Some(shapes) = self.annotator.overlay(&x, &y, main) {
            scene.shapes.extend(shapes);
        }

        self.last_x = Some(x);
        self.last_y = Some(y);
        self.display = display;
        self.hover = None;
        Ok(scene)
    }

    fn point_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let si = target.series?;
        let pi = target.point?;
        let s = self.display.iter().find(|d| d.index == si)?;
        let p = s.points.get(pi)?;

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, p.x, p.orig));
        }

        let x_str = self
            .config
            .x_format
            .unwrap_or(TickFormat::Time)
            .format(p.x);
        let heading = if self.display.len() > 1 {
            format!("{x_str} - {}", self.label_of(&s.key))
        } else {
            x_str
        };

        let mut content = TooltipContent::heading(heading);
        if self.index {
            content = content
                .line(signed_percent(p.y))
                .line(crate::format::grouped_int(p.orig));
        } else {
            content = content.line(
                self.config
                    .y_format
                    .unwrap_or(TickFormat::GroupedInt)
                    .format(p.y),
            );
        }
        Some(content)
    }

    fn path_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        if self.display.len() < 2 {
            return None;
        }
        let si = target.series?;
        let s = self.display.iter().find(|d| d.index == si)?;
        Some(TooltipContent::heading(self.label_of(&s.key)))
    }

    fn index_tooltip(&self) -> Option<TooltipContent> {
        let baseline = self.baseline_index?;
        let p = self.display.first()?.points.get(baseline)?;
        Some(TooltipContent::heading(
            self.config
                .x_format
                .unwrap_or(TickFormat::Time)
                .format(p.x),
        ))
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

    /// Pointer motion: annotation dragging, then hover bookkeeping over
    /// points, paths, and the index line.
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
                scene.hit_test(p).map(|i| HitTarget::from_scene(scene, i)).filter(|t| {
                    matches!(t.role, Role::Point | Role::LinePath | Role::IndexLine)
                }),
            ),
            None => return,
        };

        match target {
            Some(target) if self.hover == Some(target) => {
                if self.config.tooltips && self.tooltip.visible() {
                    self.tooltip.update(p.x, p.y, bounds);
                }
                match target.role {
                    Role::LinePath => self.dispatch.emit(Event::PathMouseMove),
                    Role::Point => self.dispatch.emit(Event::MouseMove),
                    _ => {}
                }
            }
            Some(target) => {
                let content = if self.config.tooltips {
                    match target.role {
                        Role::Point => self.point_tooltip(target),
                        Role::LinePath => self.path_tooltip(target),
                        Role::IndexLine => self.index_tooltip(),
                        _ => None,
                    }
                } else {
                    None
                };

                if target.role != Role::IndexLine {
                    if let Some(scene) = self.scene.as_mut() {
                        interact::mouseover(
                            scene,
                            &[Role::LinePath, Role::Point],
                            HoverGroup::Series,
                            target,
                        );
                    }
                }
                self.hover = Some(target);
                if let Some(content) = content {
                    self.tooltip.show(p.x, p.y, bounds, content);
                }

                match target.role {
                    Role::LinePath => self.dispatch.emit(Event::PathMouseOver {
                        series: target.series.unwrap_or(0),
                    }),
                    Role::Point => self.dispatch.emit(Event::MouseOver {
                        series: target.series,
                        point: target.point,
                    }),
                    _ => {}
                }
            }
            None => {
                if let Some(old) = self.hover.take() {
                    if let Some(scene) = self.scene.as_mut() {
                        interact::mouseout(scene);
                    }
                    self.tooltip.hide();
                    match old.role {
                        Role::LinePath => self.dispatch.emit(Event::PathMouseOut),
                        _ => self.dispatch.emit(Event::MouseOut),
                    }
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
            Role::LinePath => self.dispatch.emit(Event::PathClick {
                series: target.series.unwrap_or(0),
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
            Role::LinePath => self.dispatch.emit(Event::PathDblClick {
                series: target.series.unwrap_or(0),
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

impl_config_accessors!(LineChart);
impl_chart_lifecycle!(LineChart);
