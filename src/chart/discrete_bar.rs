//! Discrete bar chart: one flat series, one bar per datum, colored by
//! category. The legend is off by default.

use crate::axis::{self, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, draw_y_thresholds, impl_chart_lifecycle, impl_config_accessors, Config,
    Dispatch, Event,
};
use crate::error::Result;
use crate::format::TickFormat;
use crate::geometry::{Point, Rect};
use crate::interact::{self, HitTarget, HoverGroup};
use crate::scale::{BandScale, LinearScale, Scale};
use crate::scene::{Role, Scene, Shape, ShapeKind};
use crate::series::{self, Series};
use crate::tooltip::{Tooltip, TooltipContent};

/// Discrete bar chart.
#[derive(Debug, Clone)]
pub struct DiscreteBarChart {
    config: Config,
    data: Vec<Series>,
    dispatch: Dispatch,
    tooltip: Tooltip,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    hover: Option<HitTarget>,
}

impl Default for DiscreteBarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscreteBarChart {
    /// Create a discrete bar chart (legend off).
    #[must_use]
    pub fn new() -> Self {
        let mut config = Config::default();
        config.legend = false;
        Self {
            config,
            data: Vec::new(),
            dispatch: Dispatch::default(),
            tooltip: Tooltip::default(),
            scene: None,
            prev_scene: None,
            hover: None,
        }
    }

    /// Set the chart data from a bare point list.
    #[must_use]
    pub fn data_points(mut self, points: &[(f64, f64)]) -> Self {
        self.data = series::wrap_points(points);
        self
    }

    fn category_label(&self, x: f64) -> String {
        self.config
            .x_tick_format
            .unwrap_or(TickFormat::Plain)
            .format(x)
    }

    fn build_scene(&mut self, _update: bool) -> Result<Scene> {
        let mut scene = begin_scene(&self.config);
        let layout = self.config.layout(false, 0.0);
        scene.plot = layout.plot;
        let plot = layout.plot;

        let values = self
            .data
            .first()
            .filter(|s| !s.is_empty())
            .ok_or(crate::Error::EmptyData)?
            .values
            .clone();

        let categories: Vec<String> = values.iter().map(|p| self.category_label(p.x)).collect();
        let x = BandScale::bands(categories, (0.0, plot.width))?;

        let max = values.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let y_dom = self.config.y_domain.resolve((0.0, max.max(1e-9)));
        let y = LinearScale::new(y_dom, (plot.height, 0.0))?;

        let y_format = self.config.y_tick_format.unwrap_or(TickFormat::UnitSuffix);
        axis::draw_bottom_axis(
            &mut scene,
            plot,
            &axis::band_ticks(&x),
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

        let band = x.band_width();
        for (ci, p) in values.iter().enumerate() {
            let label = self.category_label(p.x);
            let color = self.config.palette.color_for(&label);
            let top = y.scale(p.y);
            scene.push(
                Shape::new(
                    ShapeKind::Rect {
                        rect: Rect::new(
                            plot.x + x.position_at(ci),
                            plot.y + top,
                            band,
                            (plot.height - top).max(0.0),
                        ),
                        fill: Some(color),
                        stroke: None,
                        stroke_width: 1.0,
                    },
                    Role::Bar,
                )
                .series(0)
                .point(ci),
            );
        }

        draw_y_thresholds(&mut scene, plot, &self.config.y_thresholds, |v| y.scale(v));

        self.hover = None;
        Ok(scene)
    }

    fn bar_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let ci = target.point?;
        let s = self.data.first()?;
        let p = s.values.get(ci)?;

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, p.x, p.y));
        }

        Some(
            TooltipContent::heading(self.category_label(p.x)).line(
                self.config
                    .y_tick_format
                    .unwrap_or(TickFormat::GroupedInt)
                    .format(p.y),
            ),
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
                    .filter(|t| t.role == Role::Bar),
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
                    self.bar_tooltip(target)
                } else {
                    None
                };
                if let Some(scene) = self.scene.as_mut() {
                    interact::mouseover(scene, &[Role::Bar], HoverGroup::Point, target);
                }
                self.hover = Some(target);
                if let Some(content) = content {
                    self.tooltip.show(p.x, p.y, bounds, content);
                }
                self.dispatch.emit(Event::MouseOver {
                    series: None,
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

    /// Primary activation at a point.
    pub fn pointer_clicked(&mut self, p: Point) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        if let Some(idx) = scene.hit_test(p) {
            let target = HitTarget::from_scene(scene, idx);
            if target.role == Role::Bar {
                self.dispatch.emit(Event::Click {
                    series: None,
                    point: target.point,
                });
            }
        }
    }

    /// Double activation at a point.
    pub fn pointer_double_clicked(&mut self, p: Point) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        if let Some(idx) = scene.hit_test(p) {
            let target = HitTarget::from_scene(scene, idx);
            if target.role == Role::Bar {
                self.dispatch.emit(Event::DblClick {
                    series: None,
                    point: target.point,
                });
            }
        }
    }
}

impl_config_accessors!(DiscreteBarChart);
impl_chart_lifecycle!(DiscreteBarChart);
