//! Heatmap chart: series rows over a time axis, value mapped to a color
//! ramp from the theme background up to steel blue.

use crate::axis::{self, Tick, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, impl_chart_lifecycle, impl_config_accessors, render_legend, Config, Dispatch,
    Event,
};
use crate::color::{CategoryScale, Rgba};
use crate::error::Result;
use crate::format::TickFormat;
use crate::geometry::{Point, Rect};
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scale::{BandScale, ColorScale, Scale, TimeScale};
use crate::scene::{Role, Scene, Shape, ShapeKind};
use crate::series::{self, Series};
use crate::tooltip::{Tooltip, TooltipContent};

/// Heatmap chart.
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    config: Config,
    data: Vec<Series>,
    series_format: Option<fn(&str) -> String>,
    dispatch: Dispatch,
    tooltip: Tooltip,
    legend: Legend,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    hover: Option<HitTarget>,
}

impl Default for HeatmapChart {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapChart {
    /// Create a heatmap. Time tick labels are the x default.
    #[must_use]
    pub fn new() -> Self {
        let mut config = Config::default();
        config.x_tick_format = Some(TickFormat::MultiTime);
        Self {
            config,
            data: Vec::new(),
            series_format: None,
            dispatch: Dispatch::default(),
            tooltip: Tooltip::default(),
            legend: Legend::default(),
            scene: None,
            prev_scene: None,
            hover: None,
        }
    }

    /// Set the series name formatter.
    #[must_use]
    pub fn series_format(mut self, f: fn(&str) -> String) -> Self {
        self.series_format = Some(f);
        self
    }

    fn label_of(&self, key: &str) -> String {
        self.series_format.map_or_else(|| key.to_string(), |f| f(key))
    }

    fn build_scene(&mut self, _update: bool) -> Result<Scene> {
        let mut scene = begin_scene(&self.config);

        // Row identity is the only color the series carry; the ramp owns the
        // rest, so legend swatches go monochrome
        self.config.palette = CategoryScale::new(vec![Rgba::BLACK]);

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

        // X gap between the last two samples pads the domain so the final
        // tile gets its own column
        let x_buffer = refs
            .iter()
            .filter_map(|s| {
                let n = s.values.len();
                (n >= 2).then(|| s.values[n - 1].x - s.values[n - 2].x)
            })
            .next_back()
            .unwrap_or(0.0);

        let (x_min, x_max) = series::x_extent(&refs).unwrap_or((0.0, 1.0));
        let x = TimeScale::new(
            crate::scale::ensure_span((x_min, x_max + x_buffer)),
            (0.0, plot.width),
        )?;

        // Rows plus a trailing filler slot so the last row has a band
        let mut row_labels: Vec<String> =
            enabled.iter().map(|(_, s)| self.label_of(&s.key)).collect();
        let tile_labels = row_labels.clone();
        row_labels.push(String::new());
        let y = BandScale::points(row_labels, (plot.height, 0.0))?;
        let step = y.step();

        let z_max = series::y_extent(&refs).map_or(1.0, |e| e.1).max(1e-9);
        let z = ColorScale::ramp(self.config.theme.background, Rgba::STEEL_BLUE, (0.0, z_max))?;

        // Zero-size ticks: labels only, no grid; row labels sit at band
        // centers (half a step above the band's base position)
        let x_format = self.config.x_tick_format.unwrap_or(TickFormat::MultiTime);
        axis::draw_bottom_axis(
            &mut scene,
            plot,
            &axis::continuous_ticks(&x, DEFAULT_TICK_COUNT, &x_format),
            &self.config.theme,
            false,
            self.config.x_label.as_deref(),
            layout.margin.bottom,
        );
        let y_ticks: Vec<Tick> = tile_labels
            .iter()
            .enumerate()
            .map(|(i, label)| Tick {
                position: y.position_at(i) - step / 2.0,
                label: label.clone(),
            })
            .collect();
        axis::draw_left_axis(
            &mut scene,
            plot,
            &y_ticks,
            &self.config.theme,
            false,
            self.config.y_label.as_deref(),
            layout.margin.left,
        );

        for (row, (si, s)) in enabled.iter().enumerate() {
            for (pi, p) in s.values.iter().enumerate() {
                let x0 = x.scale(p.x);
                let x1 = match s.values.get(pi + 1) {
                    Some(next) => x.scale(next.x),
                    None => plot.width,
                };
                let width = (x1 - x0).max(0.0);
                if width <= 0.0 {
                    continue;
                }

                scene.push(
                    Shape::new(
                        ShapeKind::Rect {
                            rect: Rect::new(
                                plot.x + x0,
                                plot.y + y.position_at(row) - step,
                                width,
                                step,
                            ),
                            fill: Some(z.scale(p.y)),
                            stroke: None,
                            stroke_width: 1.0,
                        },
                        Role::Tile,
                    )
                    .series(*si)
                    .point(pi),
                );
            }
        }

        self.hover = None;
        Ok(scene)
    }

    fn tile_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let si = target.series?;
        let pi = target.point?;
        let s = self.data.get(si)?;
        let p = s.values.get(pi)?;

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, p.x, p.y));
        }

        Some(
            TooltipContent::heading(
                self.config
                    .x_format
                    .unwrap_or(TickFormat::Time)
                    .format(p.x),
            )
            .line(
                self.config
                    .y_format
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
                    .filter(|t| t.role == Role::Tile),
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
                    self.tile_tooltip(target)
                } else {
                    None
                };
                if let Some(scene) = self.scene.as_mut() {
                    interact::mouseover(scene, &[Role::Tile], HoverGroup::Series, target);
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
            Role::Tile => self.dispatch.emit(Event::Click {
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
            Role::Tile => self.dispatch.emit(Event::DblClick {
                series: target.series,
                point: target.point,
            }),
            _ => {}
        }
    }
}

impl_config_accessors!(HeatmapChart);
impl_chart_lifecycle!(HeatmapChart);
