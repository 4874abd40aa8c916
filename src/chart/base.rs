//! Shared chart configuration and render lifecycle.
//!
//! Every chart type owns a [`Config`] exposing the same fluent accessors
//! (margin, domains, labels, colors, toggles) and drives the same lifecycle:
//! `render()` builds a fresh scene, `update()` re-renders with
//! transition-from-previous semantics, `resize()` adjusts dimensions then
//! updates. The accessor and lifecycle surfaces are stamped onto each chart
//! type by the macros at the bottom of this module.

use crate::annotate::AnnotationConfig;
use crate::color::{CategoryScale, Rgba};
use crate::format::TickFormat;
use crate::geometry::{Point, Rect};
use crate::legend::{Legend, PADDING as LEGEND_PADDING};
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};
use crate::theme::Theme;
use crate::tooltip::TooltipContent;

/// Title block height in pixels.
const TITLE_HEIGHT: f64 = 24.0;
/// Description block height in pixels.
const DESC_HEIGHT: f64 = 18.0;
/// Wrapper border allowance subtracted from the outer dimensions.
const BORDER_ALLOWANCE: f64 = 4.0;
/// Extra margin reserved for an axis caption.
const CAPTION_MARGIN: f64 = 15.0;
/// Size of the annotation configuration form.
pub(crate) const ANNOTATE_FORM_SIZE: (f64, f64) = (180.0, 110.0);

/// Chart margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

/// Partial domain override; unset sides fall back to the data extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Domain {
    /// Lower bound override.
    pub min: Option<f64>,
    /// Upper bound override.
    pub max: Option<f64>,
}

impl Domain {
    /// Resolve against a data extent.
    #[must_use]
    pub fn resolve(&self, data: (f64, f64)) -> (f64, f64) {
        (self.min.unwrap_or(data.0), self.max.unwrap_or(data.1))
    }
}

/// A reference line across the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    /// Position in data coordinates.
    pub value: f64,
    /// Line color.
    pub color: Rgba,
}

/// Custom tooltip content hook: series key, x value, y value.
pub type TooltipFn = fn(&str, f64, f64) -> TooltipContent;

/// Path interpolation for line and area charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolate {
    /// Straight segments between points.
    #[default]
    Linear,
    /// Horizontal-then-vertical steps.
    StepBefore,
    /// Vertical-then-horizontal steps.
    StepAfter,
}

/// Expand a pixel-space point run according to the interpolation mode.
pub(crate) fn interpolate_path(points: &[Point], mode: Interpolate) -> Vec<Point> {
    match mode {
        Interpolate::Linear => points.to_vec(),
        Interpolate::StepBefore | Interpolate::StepAfter => {
            let mut out = Vec::with_capacity(points.len() * 2);
            for (i, p) in points.iter().enumerate() {
                if i > 0 {
                    let prev = points[i - 1];
                    let corner = if mode == Interpolate::StepAfter {
                        Point::new(p.x, prev.y)
                    } else {
                        Point::new(prev.x, p.y)
                    };
                    out.push(corner);
                }
                out.push(*p);
            }
            out
        }
    }
}

/// Events a chart emits; hosts drain them after lifecycle or pointer calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Primary activation of a chart shape.
    Click {
        /// Series index, when the shape belongs to one.
        series: Option<usize>,
        /// Point index, when the shape carries one.
        point: Option<usize>,
    },
    /// Double activation of a chart shape.
    DblClick {
        /// Series index, when the shape belongs to one.
        series: Option<usize>,
        /// Point index, when the shape carries one.
        point: Option<usize>,
    },
    /// Pointer entered a chart shape.
    MouseOver {
        /// Series index, when the shape belongs to one.
        series: Option<usize>,
        /// Point index, when the shape carries one.
        point: Option<usize>,
    },
    /// Pointer left the hovered shape.
    MouseOut,
    /// Pointer moved within the hovered shape.
    MouseMove,
    /// Primary activation of a line path.
    PathClick {
        /// Series index of the path.
        series: usize,
    },
    /// Double activation of a line path.
    PathDblClick {
        /// Series index of the path.
        series: usize,
    },
    /// Pointer entered a line path.
    PathMouseOver {
        /// Series index of the path.
        series: usize,
    },
    /// Pointer left a line path.
    PathMouseOut,
    /// Pointer moved along a line path.
    PathMouseMove,
    /// Legend entry activated.
    LegendClick {
        /// Series index of the entry.
        series: usize,
    },
    /// Legend entry double-activated.
    LegendDblClick {
        /// Series index of the entry.
        series: usize,
    },
    /// An annotation was confirmed.
    Annotate(AnnotationConfig),
}

/// Typed event queue.
#[derive(Debug, Clone, Default)]
pub struct Dispatch {
    events: Vec<Event>,
}

impl Dispatch {
    /// Queue an event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Take all queued events.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

/// Shared chart configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) theme: Theme,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) margin: Margin,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) x_label: Option<String>,
    pub(crate) y_label: Option<String>,
    pub(crate) x_tick_format: Option<TickFormat>,
    pub(crate) y_tick_format: Option<TickFormat>,
    pub(crate) x_format: Option<TickFormat>,
    pub(crate) y_format: Option<TickFormat>,
    pub(crate) x_domain: Domain,
    pub(crate) y_domain: Domain,
    pub(crate) x_thresholds: Vec<Threshold>,
    pub(crate) y_thresholds: Vec<Threshold>,
    pub(crate) palette: CategoryScale,
    pub(crate) transition: bool,
    pub(crate) duration_ms: u64,
    pub(crate) tooltips: bool,
    pub(crate) tooltip_fn: Option<TooltipFn>,
    pub(crate) grid: bool,
    pub(crate) legend: bool,
    pub(crate) legend_toggle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::light(),
            title: None,
            description: None,
            margin: Margin::default(),
            width: 800.0,
            height: 600.0,
            x_label: None,
            y_label: None,
            x_tick_format: None,
            y_tick_format: None,
            x_format: None,
            y_format: None,
            x_domain: Domain::default(),
            y_domain: Domain::default(),
            x_thresholds: Vec::new(),
            y_thresholds: Vec::new(),
            palette: CategoryScale::default(),
            transition: true,
            duration_ms: 750,
            tooltips: true,
            tooltip_fn: None,
            grid: true,
            legend: true,
            legend_toggle: true,
        }
    }
}

/// Computed frame geometry for one render.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    /// Inner plot rectangle in wrapper coordinates.
    pub plot: Rect,
    /// Effective chart margin.
    pub margin: Margin,
}

impl Config {
    /// Usable outer width (the wrapper border allowance removed).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width - BORDER_ALLOWANCE
    }

    /// Usable outer height (the wrapper border allowance removed).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height - BORDER_ALLOWANCE
    }

    /// Configured theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether tooltips are enabled.
    #[must_use]
    pub fn tooltips(&self) -> bool {
        self.tooltips
    }

    /// Transition duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub(crate) fn set_theme(&mut self, name: &str) {
        // Unknown theme names are ignored, matching the permissive accessor
        if let Ok(theme) = Theme::from_name(name) {
            self.theme = theme;
        }
    }

    pub(crate) fn header_height(&self) -> f64 {
        let mut h = 0.0;
        if self.title.is_some() {
            h += TITLE_HEIGHT;
        }
        if self.description.is_some() {
            h += DESC_HEIGHT;
        }
        h
    }

    /// Effective margin: legend padding replaces the top margin when the
    /// legend is shown; axis captions widen their side.
    pub(crate) fn chart_margin(&self, legend_shown: bool) -> Margin {
        Margin {
            top: if legend_shown {
                LEGEND_PADDING
            } else {
                self.margin.top
            },
            bottom: if self.x_label.is_some() {
                self.margin.bottom + CAPTION_MARGIN
            } else {
                self.margin.bottom
            },
            left: if self.y_label.is_some() {
                self.margin.left + CAPTION_MARGIN
            } else {
                self.margin.left
            },
            right: self.margin.right,
        }
    }

    /// Compute the frame layout. `legend_height` is zero when hidden.
    pub(crate) fn layout(&self, legend_shown: bool, legend_height: f64) -> Layout {
        let m = self.chart_margin(legend_shown);
        let header = self.header_height();

        let legend_block = if legend_shown {
            self.margin.top + legend_height
        } else {
            0.0
        };

        let w = (self.width() - m.left - m.right).max(1.0);
        let h = (self.height()
            - header
            - if legend_shown {
                legend_height + LEGEND_PADDING
            } else {
                0.0
            }
            - self.margin.top
            - m.bottom)
            .max(1.0);

        // Without a legend the margin.top consumed above doubles as the
        // plot's top inset
        let plot_y = if legend_shown {
            header + legend_block + m.top
        } else {
            header + m.top
        };

        Layout {
            plot: Rect::new(m.left, plot_y, w, h),
            margin: m,
        }
    }

    /// Wrapper-space origin of the legend row.
    pub(crate) fn legend_origin(&self, legend_shown: bool) -> Point {
        let m = self.chart_margin(legend_shown);
        Point::new(m.left, self.header_height() + self.margin.top)
    }
}

/// Start a scene: background, title, and description blocks.
pub(crate) fn begin_scene(config: &Config) -> Scene {
    let mut scene = Scene::new(
        config.width(),
        config.height(),
        Rect::default(), // charts fill this in from the layout
        config.theme.background,
    );

    let mut y = 0.0;
    if let Some(title) = &config.title {
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(config.width() / 2.0, y + 17.0),
                text: title.clone(),
                size: 14.0,
                color: config.theme.text,
                anchor: TextAnchor::Middle,
                rotation: None,
            },
            Role::Title,
        ));
        y += TITLE_HEIGHT;
    }
    if let Some(description) = &config.description {
        scene.push(Shape::new(
            ShapeKind::Text {
                pos: Point::new(config.width() / 2.0, y + 13.0),
                text: description.clone(),
                size: 11.0,
                color: config.theme.muted_text,
                anchor: TextAnchor::Middle,
                rotation: None,
            },
            Role::Description,
        ));
    }

    scene
}

/// Draw vertical x-threshold lines across the plot.
pub(crate) fn draw_x_thresholds(
    scene: &mut Scene,
    plot: Rect,
    thresholds: &[Threshold],
    position: impl Fn(f64) -> f64,
) {
    for t in thresholds {
        let x = plot.x + position(t.value);
        scene.push(
            Shape::new(
                ShapeKind::Line {
                    line: crate::geometry::Line::from_coords(x, plot.y, x, plot.bottom()),
                    stroke: t.color,
                    width: 1.5,
                },
                Role::Threshold,
            )
            .opacity(0.7),
        );
    }
}

/// Draw horizontal y-threshold lines across the plot.
pub(crate) fn draw_y_thresholds(
    scene: &mut Scene,
    plot: Rect,
    thresholds: &[Threshold],
    position: impl Fn(f64) -> f64,
) {
    for t in thresholds {
        let y = plot.y + position(t.value);
        scene.push(
            Shape::new(
                ShapeKind::Line {
                    line: crate::geometry::Line::from_coords(plot.x, y, plot.right(), y),
                    stroke: t.color,
                    width: 1.5,
                },
                Role::Threshold,
            )
            .opacity(0.7),
        );
    }
}

/// Render the legend into the scene and return its measured height, or zero
/// when hidden.
pub(crate) fn render_legend(
    scene: &mut Scene,
    config: &mut Config,
    legend: &mut Legend,
    data: &[crate::series::Series],
    label_for: impl Fn(&crate::series::Series) -> String,
) -> f64 {
    if !config.legend {
        return 0.0;
    }

    let m = config.chart_margin(true);
    let width = (config.width() - m.left - m.right).max(1.0);
    legend.update(data, &mut config.palette, label_for);
    let origin = config.legend_origin(true);
    legend.render(scene, origin, width, &config.theme);
    legend.measured_height(width)
}

/// Stamp the shared fluent configuration accessors onto a chart type.
macro_rules! impl_config_accessors {
    ($chart:ty) => {
        impl $chart {
            /// Set the theme by name; unknown names are ignored.
            #[must_use]
            pub fn theme(mut self, name: &str) -> Self {
                self.config.set_theme(name);
                self
            }

            /// Set the chart title.
            #[must_use]
            pub fn title(mut self, title: impl Into<String>) -> Self {
                self.config.title = Some(title.into());
                self
            }

            /// Set the chart description.
            #[must_use]
            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.config.description = Some(description.into());
                self
            }

            /// Set the chart margin.
            #[must_use]
            pub fn margin(mut self, margin: $crate::chart::Margin) -> Self {
                self.config.margin = margin;
                self
            }

            /// Set the outer dimensions in pixels.
            #[must_use]
            pub fn dimensions(mut self, width: f64, height: f64) -> Self {
                self.config.width = width;
                self.config.height = height;
                self
            }

            /// Set the x axis caption.
            #[must_use]
            pub fn x_label(mut self, label: impl Into<String>) -> Self {
                self.config.x_label = Some(label.into());
                self
            }

            /// Set the y axis caption.
            #[must_use]
            pub fn y_label(mut self, label: impl Into<String>) -> Self {
                self.config.y_label = Some(label.into());
                self
            }

            /// Set the x tick label formatter.
            #[must_use]
            pub fn x_tick_format(mut self, format: $crate::format::TickFormat) -> Self {
                self.config.x_tick_format = Some(format);
                self
            }

            /// Set the y tick label formatter.
            #[must_use]
            pub fn y_tick_format(mut self, format: $crate::format::TickFormat) -> Self {
                self.config.y_tick_format = Some(format);
                self
            }

            /// Set the x value formatter used in tooltip content.
            #[must_use]
            pub fn x_format(mut self, format: $crate::format::TickFormat) -> Self {
                self.config.x_format = Some(format);
                self
            }

            /// Set the y value formatter used in tooltip content.
            #[must_use]
            pub fn y_format(mut self, format: $crate::format::TickFormat) -> Self {
                self.config.y_format = Some(format);
                self
            }

            /// Override the x domain (either side optional).
            #[must_use]
            pub fn x_domain(mut self, domain: $crate::chart::Domain) -> Self {
                self.config.x_domain = domain;
                self
            }

            /// Override the y domain (either side optional).
            #[must_use]
            pub fn y_domain(mut self, domain: $crate::chart::Domain) -> Self {
                self.config.y_domain = domain;
                self
            }

            /// Set vertical reference lines at x positions.
            #[must_use]
            pub fn x_thresholds(mut self, thresholds: Vec<$crate::chart::Threshold>) -> Self {
                self.config.x_thresholds = thresholds;
                self
            }

            /// Set horizontal reference lines at y positions.
            #[must_use]
            pub fn y_thresholds(mut self, thresholds: Vec<$crate::chart::Threshold>) -> Self {
                self.config.y_thresholds = thresholds;
                self
            }

            /// Replace the categorical palette.
            #[must_use]
            pub fn palette(mut self, colors: Vec<$crate::color::Rgba>) -> Self {
                self.config.palette = $crate::color::CategoryScale::new(colors);
                self
            }

            /// Enable or disable transitions.
            #[must_use]
            pub fn transition(mut self, on: bool) -> Self {
                self.config.transition = on;
                self
            }

            /// Set the transition duration in milliseconds.
            #[must_use]
            pub fn duration(mut self, ms: u64) -> Self {
                self.config.duration_ms = ms;
                self
            }

            /// Enable or disable tooltips.
            #[must_use]
            pub fn tooltips(mut self, on: bool) -> Self {
                self.config.tooltips = on;
                self
            }

            /// Set a custom tooltip content hook.
            #[must_use]
            pub fn tooltip(mut self, f: $crate::chart::TooltipFn) -> Self {
                self.config.tooltip_fn = Some(f);
                self
            }

            /// Enable or disable grid lines.
            #[must_use]
            pub fn grid(mut self, on: bool) -> Self {
                self.config.grid = on;
                self
            }

            /// Enable or disable the legend.
            #[must_use]
            pub fn legend(mut self, on: bool) -> Self {
                self.config.legend = on;
                self
            }

            /// Enable or disable legend toggling.
            #[must_use]
            pub fn legend_toggle(mut self, on: bool) -> Self {
                self.config.legend_toggle = on;
                self
            }

            /// The chart's configuration.
            #[must_use]
            pub fn config(&self) -> &$crate::chart::Config {
                &self.config
            }
        }
    };
}

/// Stamp the shared render lifecycle onto a chart type. The chart provides
/// `fn build_scene(&mut self, update: bool) -> Result<Scene>`.
macro_rules! impl_chart_lifecycle {
    ($chart:ty) => {
        impl $chart {
            /// Replace the chart data (builder form).
            #[must_use]
            pub fn data(mut self, data: Vec<$crate::series::Series>) -> Self {
                self.set_data(data);
                self
            }

            /// Replace the chart data.
            pub fn set_data(&mut self, data: Vec<$crate::series::Series>) {
                self.data = data;
            }

            /// Series currently held by the chart.
            #[must_use]
            pub fn series(&self) -> &[$crate::series::Series] {
                &self.data
            }

            /// Toggle a series' disabled flag by index.
            pub fn toggle_series(&mut self, series: usize) {
                if let Some(s) = self.data.get_mut(series) {
                    s.disabled = !s.disabled;
                }
            }

            /// Build the full scene from scratch.
            pub fn render(&mut self) -> $crate::Result<&$crate::scene::Scene> {
                tracing::debug!(chart = stringify!($chart), "render");
                let scene = self.build_scene(false)?;
                self.prev_scene = None;
                Ok(&*self.scene.insert(scene))
            }

            /// Re-render, keeping the previous frame as the transition start.
            pub fn update(&mut self) -> $crate::Result<&$crate::scene::Scene> {
                tracing::debug!(chart = stringify!($chart), "update");
                let scene = self.build_scene(true)?;
                self.prev_scene = self.scene.take();
                Ok(&*self.scene.insert(scene))
            }

            /// Replace the data and update.
            pub fn update_data(
                &mut self,
                data: Vec<$crate::series::Series>,
            ) -> $crate::Result<&$crate::scene::Scene> {
                self.set_data(data);
                self.update()
            }

            /// Set new outer dimensions and update.
            pub fn resize(&mut self, width: f64, height: f64) -> $crate::Result<&$crate::scene::Scene> {
                tracing::debug!(chart = stringify!($chart), width, height, "resize");
                self.config.width = width;
                self.config.height = height;
                self.update()
            }

            /// The last rendered scene, if any.
            #[must_use]
            pub fn scene(&self) -> Option<&$crate::scene::Scene> {
                self.scene.as_ref()
            }

            /// Transition frame at `t` in `[0, 1]`. With transitions off (or
            /// nothing rendered yet) this is the final frame.
            #[must_use]
            pub fn scene_at(&self, t: f64) -> Option<$crate::scene::Scene> {
                let scene = self.scene.as_ref()?;
                if !self.config.transition {
                    return Some(scene.clone());
                }
                Some(match &self.prev_scene {
                    Some(prev) => $crate::transition::update_scene(prev, scene, t),
                    None => $crate::transition::enter_scene(scene, t),
                })
            }

            /// Drain queued chart events.
            pub fn take_events(&mut self) -> Vec<$crate::chart::Event> {
                self.dispatch.drain()
            }

            /// Current tooltip state, if any.
            #[must_use]
            pub fn tooltip_state(&self) -> Option<&$crate::tooltip::TooltipState> {
                self.tooltip.state()
            }

            /// Encode the last rendered scene as an SVG document.
            #[must_use]
            pub fn to_svg(&self) -> Option<String> {
                self.scene
                    .as_ref()
                    .map(|s| $crate::output::SvgEncoder::from_scene(s).to_string())
            }

            /// Rasterize the last rendered scene to PNG bytes.
            pub fn to_png(&self) -> $crate::Result<Vec<u8>> {
                let scene = self
                    .scene
                    .as_ref()
                    .ok_or_else(|| $crate::Error::Rendering("nothing rendered yet".into()))?;
                $crate::output::PngEncoder::scene_to_bytes(scene)
            }
        }
    };
}

pub(crate) use impl_chart_lifecycle;
pub(crate) use impl_config_accessors;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_resolve() {
        let d = Domain {
            min: Some(0.0),
            max: None,
        };
        assert_eq!(d.resolve((-5.0, 12.0)), (0.0, 12.0));
        assert_eq!(Domain::default().resolve((-5.0, 12.0)), (-5.0, 12.0));
    }

    #[test]
    fn test_dispatch_drain() {
        let mut d = Dispatch::default();
        d.emit(Event::MouseOut);
        d.emit(Event::LegendClick { series: 1 });
        let events = d.drain();
        assert_eq!(events.len(), 2);
        assert!(d.drain().is_empty());
    }

    #[test]
    fn test_chart_margin_caption_growth() {
        let mut config = Config::default();
        let base = config.chart_margin(false);
        assert!((base.bottom - 40.0).abs() < 1e-9);
        assert!((base.left - 40.0).abs() < 1e-9);

        config.x_label = Some("time".into());
        config.y_label = Some("value".into());
        let grown = config.chart_margin(false);
        assert!((grown.bottom - 55.0).abs() < 1e-9);
        assert!((grown.left - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_margin_legend_replaces_top() {
        let config = Config::default();
        assert!((config.chart_margin(true).top - LEGEND_PADDING).abs() < 1e-9);
        assert!((config.chart_margin(false).top - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_accounts_for_blocks() {
        let mut config = Config::default();
        config.title = Some("t".into());
        config.description = Some("d".into());

        let without_legend = config.layout(false, 0.0);
        let with_legend = config.layout(true, 28.0);

        // The legend pushes the plot down and shrinks it
        assert!(with_legend.plot.y > without_legend.plot.y);
        assert!(with_legend.plot.height < without_legend.plot.height);

        // Plot bottom plus bottom margin lands on the usable height
        let l = config.layout(false, 0.0);
        assert!(
            (l.plot.bottom() + l.margin.bottom - config.height()).abs() < 1e-6
        );
    }

    #[test]
    fn test_layout_never_collapses() {
        let mut config = Config::default();
        config.width = 10.0;
        config.height = 10.0;
        let l = config.layout(false, 0.0);
        assert!(l.plot.width >= 1.0);
        assert!(l.plot.height >= 1.0);
    }

    #[test]
    fn test_begin_scene_blocks() {
        let mut config = Config::default();
        config.title = Some("Latency".into());
        config.description = Some("p99 per region".into());
        let scene = begin_scene(&config);

        assert!(scene.shapes.iter().any(|s| s.role == Role::Title));
        assert!(scene.shapes.iter().any(|s| s.role == Role::Description));
    }

    #[test]
    fn test_begin_scene_without_blocks() {
        let scene = begin_scene(&Config::default());
        assert!(scene.shapes.is_empty());
    }

    #[test]
    fn test_width_height_allowance() {
        let config = Config::default();
        assert!((config.width() - 796.0).abs() < 1e-9);
        assert!((config.height() - 596.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_theme_permissive() {
        let mut config = Config::default();
        config.set_theme("dark");
        assert_eq!(config.theme.name, "dark");
        config.set_theme("nonsense");
        assert_eq!(config.theme.name, "dark");
    }
}
