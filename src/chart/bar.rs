//! Bar chart: grouped, stacked, or expanded bars over a category axis.
//!
//! Categories come from the first series' x values; series are assumed to
//! be index-aligned on the same categories.

use crate::axis::{self, DEFAULT_TICK_COUNT};
use crate::chart::base::{
    begin_scene, draw_y_thresholds, impl_chart_lifecycle, impl_config_accessors, render_legend,
    Config, Dispatch, Event,
};
use crate::error::Result;
use crate::format::TickFormat;
use crate::geometry::{Point, Rect};
use crate::interact::{self, HitTarget, HoverGroup};
use crate::legend::Legend;
use crate::scale::{BandScale, LinearScale, Scale};
use crate::scene::{Role, Scene, Shape, ShapeKind};
use crate::series::{self, Series};
use crate::stack::{self, StackOffset, StackOrder};
use crate::tooltip::{Tooltip, TooltipContent};

/// Bar chart.
#[derive(Debug, Clone)]
pub struct BarChart {
    config: Config,
    data: Vec<Series>,
    stacked: bool,
    expanded: bool,
    dispatch: Dispatch,
    tooltip: Tooltip,
    legend: Legend,
    scene: Option<Scene>,
    prev_scene: Option<Scene>,
    hover: Option<HitTarget>,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    /// Create a bar chart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            data: Vec::new(),
            stacked: false,
            expanded: false,
            dispatch: Dispatch::default(),
            tooltip: Tooltip::default(),
            legend: Legend::default(),
            scene: None,
            prev_scene: None,
            hover: None,
        }
    }

    /// Stack the series from zero.
    #[must_use]
    pub fn stacked(mut self, on: bool) -> Self {
        self.stacked = on;
        self
    }

    /// Normalize each category to `[0, 1]`; y ticks become percentages.
    #[must_use]
    pub fn expanded(mut self, on: bool) -> Self {
        self.expanded = on;
        self
    }

    fn layered(&self) -> bool {
        self.stacked || self.expanded
    }

    fn category_label(&self, x: f64) -> String {
        self.config
            .x_tick_format
            .unwrap_or(TickFormat::Plain)
            .format(x)
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

        let enabled: Vec<(usize, &Series)> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.disabled)
            .collect();
        let refs: Vec<&Series> = enabled.iter().map(|(_, s)| *s).collect();
        if refs.is_empty() || refs[0].is_empty() {
            return Err(crate::Error::EmptyData);
        }

        let stacked = if self.layered() {
            let offset = if self.expanded {
                StackOffset::Expand
            } else {
                StackOffset::Zero
            };
            Some(stack::stack(&refs, offset, StackOrder::Input)?)
        } else {
            None
        };

        // Categories from the first series
        let categories: Vec<String> = refs[0]
            .values
            .iter()
            .map(|p| self.category_label(p.x))
            .collect();
        let x = BandScale::bands(categories, (0.0, plot.width))?;

        let y_dom = if self.expanded {
            (0.0, 1.0)
        } else {
            let max = match &stacked {
                Some(layers) => stack::stacked_max(layers),
                None => series::y_extent(&refs).map_or(1.0, |e| e.1),
            };
            self.config.y_domain.resolve((0.0, max.max(1e-9)))
        };
        let y = LinearScale::new(y_dom, (plot.height, 0.0))?;

        let y_format = if self.expanded {
            TickFormat::Percent
        } else {
            self.config.y_tick_format.unwrap_or(TickFormat::UnitSuffix)
        };
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

        let n = refs.len() as f64;
        let band = x.band_width();

        for (pos, (si, s)) in enabled.iter().enumerate() {
            let color = self.config.palette.color_for(&s.key);
            for (ci, p) in s.values.iter().enumerate() {
                if ci >= x.categories().len() {
                    break;
                }
                let band_start = plot.x + x.position_at(ci);

                let (bx, bw) = if self.layered() {
                    (band_start, band)
                } else {
                    (band_start + band / n * pos as f64, band / n)
                };

                let (top, bottom) = match &stacked {
                    Some(layers) => {
                        let sp = layers[pos].points[ci];
                        (y.scale(sp.y0 + sp.y), y.scale(sp.y0))
                    }
                    None => (y.scale(p.y), plot.height),
                };

                scene.push(
                    Shape::new(
                        ShapeKind::Rect {
                            rect: Rect::new(bx, plot.y + top, bw, (bottom - top).max(0.0)),
                            fill: Some(color),
                            stroke: None,
                            stroke_width: 1.0,
                        },
                        Role::Bar,
                    )
                    .series(*si)
                    .point(ci),
                );
            }
        }

        draw_y_thresholds(&mut scene, plot, &self.config.y_thresholds, |v| y.scale(v));

        // X thresholds snap to the matching category's center
        for t in &self.config.x_thresholds {
            if let Some(ci) = refs[0]
                .values
                .iter()
                .position(|p| (p.x - t.value).abs() < f64::EPSILON)
            {
                let tx = plot.x + x.center_at(ci);
                scene.push(
                    Shape::new(
                        ShapeKind::Line {
                            line: crate::geometry::Line::from_coords(
                                tx,
                                plot.y,
                                tx,
                                plot.bottom(),
                            ),
                            stroke: t.color,
                            width: 1.5,
                        },
                        Role::Threshold,
                    )
                    .opacity(0.7),
                );
            }
        }

        self.hover = None;
        Ok(scene)
    }

    fn bar_tooltip(&self, target: HitTarget) -> Option<TooltipContent> {
        let si = target.series?;
        let ci = target.point?;
        let s = self.data.get(si)?;
        let p = s.values.get(ci)?;

        if let Some(f) = self.config.tooltip_fn {
            return Some(f(&s.key, p.x, p.y));
        }

        let heading = format!("{} - {}", self.category_label(p.x), s.key);
        let value = self
            .config
            .y_format
            .unwrap_or(TickFormat::GroupedInt)
            .format(p.y);
        let mut content = TooltipContent::heading(heading).line(value);

        if self.expanded {
            let refs = series::enabled(&self.data);
            let total: f64 = refs.iter().filter_map(|s| s.values.get(ci)).map(|p| p.y).sum();
            if total > 0.0 {
                content = content.line(crate::format::percent(p.y / total));
            }
        }
        Some(content)
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
                    interact::mouseover(scene, &[Role::Bar], HoverGroup::Series, target);
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
            Role::Bar => self.dispatch.emit(Event::Click {
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
            Role::Bar => self.dispatch.emit(Event::DblClick {
                series: target.series,
                point: target.point,
            }),
            _ => {}
        }
    }
}

impl_config_accessors!(BarChart);
impl_chart_lifecycle!(BarChart);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Emphasis;

    fn fixture() -> Vec<Series> {
        vec![
            Series::new("q1", &[(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]),
            Series::new("q2", &[(1.0, 15.0), (2.0, 10.0), (3.0, 25.0)]),
        ]
    }

    fn chart() -> BarChart {
        BarChart::new().dimensions(640.0, 480.0).data(fixture())
    }

    fn bars(scene: &Scene) -> Vec<&Shape> {
        scene.shapes.iter().filter(|s| s.role == Role::Bar).collect()
    }

    fn bar_rect(scene: &Scene, series: usize, point: usize) -> Rect {
        scene
            .shapes
            .iter()
            .find_map(|s| match (&s.kind, s.role) {
                (ShapeKind::Rect { rect, .. }, Role::Bar)
                    if s.series == Some(series) && s.point == Some(point) =>
                {
                    Some(*rect)
                }
                _ => None,
            })
            .expect("bar rect")
    }

    #[test]
    fn test_grouped_bar_count() {
        let mut c = chart();
        let scene = c.render().unwrap();
        assert_eq!(bars(scene).len(), 6);
    }

    #[test]
    fn test_grouped_bars_side_by_side() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let a = bar_rect(scene, 0, 0);
        let b = bar_rect(scene, 1, 0);
        // Same category: series 1 sits right of series 0, same baseline
        assert!(b.x >= a.right() - 1e-6);
        assert!((a.bottom() - b.bottom()).abs() < 1e-6);
    }

    #[test]
    fn test_bars_grow_down_to_baseline() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let plot = scene.plot;
        for shape in bars(scene) {
            let ShapeKind::Rect { rect, .. } = &shape.kind else {
                panic!("expected rect");
            };
            assert!((rect.bottom() - plot.bottom()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stacked_bars_ride() {
        let mut c = chart().stacked(true);
        let scene = c.render().unwrap();
        let a = bar_rect(scene, 0, 0);
        let b = bar_rect(scene, 1, 0);
        // Series 1 stacks on top of series 0, sharing the full band width
        assert!((b.bottom() - a.y).abs() < 1.0);
        assert!((a.width - b.width).abs() < 1e-6);
        assert!((a.x - b.x).abs() < 1e-6);
    }

    #[test]
    fn test_expanded_columns_fill_plot() {
        let mut c = chart().expanded(true);
        let scene = c.render().unwrap();
        let plot = scene.plot;
        for ci in 0..3 {
            let a = bar_rect(scene, 0, ci);
            let b = bar_rect(scene, 1, ci);
            let total = a.height + b.height;
            assert!((total - plot.height).abs() < 1.5);
        }
    }

    #[test]
    fn test_hover_fades_other_series() {
        let mut c = chart();
        c.render().unwrap();
        let target = bar_rect(c.scene().unwrap(), 0, 1).center();
        c.pointer_moved(target);

        let scene = c.scene().unwrap();
        let faded: Vec<_> = bars(scene)
            .into_iter()
            .filter(|s| s.emphasis == Emphasis::Faded)
            .collect();
        assert_eq!(faded.len(), 3);
        assert!(faded.iter().all(|s| s.series == Some(1)));
    }

    #[test]
    fn test_tooltip_heading_category_and_series() {
        let mut c = chart();
        c.render().unwrap();
        let target = bar_rect(c.scene().unwrap(), 1, 2).center();
        c.pointer_moved(target);
        let tip = c.tooltip_state().unwrap();
        assert!(tip.content.heading.contains("q2"));
        assert!(tip.content.heading.contains('3'));
        assert_eq!(tip.content.lines[0], "25");
    }

    #[test]
    fn test_expanded_tooltip_has_share() {
        let mut c = chart().expanded(true);
        c.render().unwrap();
        let target = bar_rect(c.scene().unwrap(), 0, 0).center();
        c.pointer_moved(target);
        let tip = c.tooltip_state().unwrap();
        // 10 of 25 -> 40%
        assert!(tip.content.lines.iter().any(|l| l == "40%"));
    }

    #[test]
    fn test_click_emits_event() {
        let mut c = chart();
        c.render().unwrap();
        let target = bar_rect(c.scene().unwrap(), 0, 0).center();
        c.pointer_clicked(target).unwrap();
        assert!(c.take_events().iter().any(|e| matches!(
            e,
            Event::Click {
                series: Some(0),
                point: Some(0)
            }
        )));
    }

    #[test]
    fn test_category_labels_on_axis() {
        let mut c = chart();
        let scene = c.render().unwrap();
        let labels: Vec<String> = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Axis)
            .filter_map(|s| match &s.kind {
                ShapeKind::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&"1".to_string()));
        assert!(labels.contains(&"3".to_string()));
    }

    #[test]
    fn test_empty_data_errors() {
        let mut c = BarChart::new();
        assert!(c.render().is_err());
    }
}
