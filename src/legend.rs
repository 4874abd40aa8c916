//! Legend: series key list with visibility toggling.
//!
//! Entries sort by descending median y so the hottest series reads first.
//! The legend occupies one fixed-height row above the plot; overflowing
//! entries hide behind an expand toggle. Clicking an entry flips the series'
//! disabled flag (when toggling is enabled) and the chart re-renders.

use crate::color::{CategoryScale, Rgba};
use crate::geometry::{Point, Rect};
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};
use crate::series::Series;
use crate::theme::Theme;

/// Default legend row height in pixels.
pub const ROW_HEIGHT: f64 = 21.0;

/// Default legend padding in pixels.
pub const PADDING: f64 = 5.0;

/// Swatch square side.
const SWATCH: f64 = 10.0;
/// Gap between swatch and label.
const SWATCH_GAP: f64 = 4.0;
/// Gap between entries.
const ENTRY_GAP: f64 = 12.0;
/// Approximate label character advance.
const CHAR_ADVANCE: f64 = 6.5;
/// Label font size.
const LABEL_FONT: f64 = 11.0;

/// One legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Index of the series in the chart's data.
    pub series: usize,
    /// Displayed label (the formatted series key).
    pub label: String,
    /// Swatch color.
    pub color: Rgba,
    /// Mirror of the series' disabled flag.
    pub disabled: bool,
}

/// Legend module state.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: Vec<LegendEntry>,
    expanded: bool,
}

impl Legend {
    /// Rebuild entries from the chart's series, sorted by descending median
    /// y value. `label_for` formats the series key.
    pub fn update(
        &mut self,
        series: &[Series],
        colors: &mut CategoryScale,
        label_for: impl Fn(&Series) -> String,
    ) {
        let mut entries: Vec<LegendEntry> = series
            .iter()
            .enumerate()
            .map(|(i, s)| LegendEntry {
                series: i,
                label: label_for(s),
                color: colors.color_for(&label_for(s)),
                disabled: s.disabled,
            })
            .collect();

        let medians: Vec<f64> = series
            .iter()
            .map(|s| s.median_y().unwrap_or(f64::NEG_INFINITY))
            .collect();
        entries.sort_by(|a, b| {
            medians[b.series]
                .partial_cmp(&medians[a.series])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.entries = entries;
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    /// Toggle the expanded state, or force it with `Some(_)`.
    pub fn expand_toggle(&mut self, expand: Option<bool>) {
        self.expanded = expand.unwrap_or(!self.expanded);
    }

    /// Whether the legend is expanded.
    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Whether entries overflow the collapsed row at the given width.
    #[must_use]
    pub fn overflows(&self, width: f64) -> bool {
        self.layout_rows(width) > 1
    }

    fn entry_width(entry: &LegendEntry) -> f64 {
        SWATCH + SWATCH_GAP + entry.label.chars().count() as f64 * CHAR_ADVANCE + ENTRY_GAP
    }

    fn layout_rows(&self, width: f64) -> usize {
        let mut rows = 1;
        let mut x = 0.0;
        for entry in &self.entries {
            let w = Self::entry_width(entry);
            if x + w > width && x > 0.0 {
                rows += 1;
                x = 0.0;
            }
            x += w;
        }
        rows
    }

    /// Measured height: one row collapsed, every row expanded, plus chrome.
    #[must_use]
    pub fn measured_height(&self, width: f64) -> f64 {
        let rows = if self.expanded {
            self.layout_rows(width)
        } else {
            1
        };
        rows as f64 * ROW_HEIGHT + 7.0
    }

    /// Render the legend into the scene at `origin`, wrapping entries at
    /// `width`. Swatches and labels are tagged with their series index so
    /// pointer hits resolve to legend clicks.
    pub fn render(&mut self, scene: &mut Scene, origin: Point, width: f64, theme: &Theme) {
        let visible_rows = if self.expanded {
            self.layout_rows(width)
        } else {
            1
        };

        let mut x = origin.x;
        let mut y = origin.y;
        let mut row = 0;

        for entry in &self.entries {
            let w = Self::entry_width(entry);
            if x + w > origin.x + width && x > origin.x {
                row += 1;
                if row >= visible_rows {
                    break;
                }
                x = origin.x;
                y += ROW_HEIGHT;
            }

            let swatch_rect = Rect::new(x, y + (ROW_HEIGHT - SWATCH) / 2.0, SWATCH, SWATCH);
            let swatch = if entry.disabled {
                // Hollow swatch for disabled series
                ShapeKind::Rect {
                    rect: swatch_rect,
                    fill: None,
                    stroke: Some(entry.color),
                    stroke_width: 1.5,
                }
            } else {
                ShapeKind::Rect {
                    rect: swatch_rect,
                    fill: Some(entry.color),
                    stroke: None,
                    stroke_width: 1.0,
                }
            };
            scene.push(Shape::new(swatch, Role::Legend).series(entry.series));

            let label = Shape::new(
                ShapeKind::Text {
                    pos: Point::new(x + SWATCH + SWATCH_GAP, y + ROW_HEIGHT / 2.0 + 4.0),
                    text: entry.label.clone(),
                    size: LABEL_FONT,
                    color: theme.text,
                    anchor: TextAnchor::Start,
                    rotation: None,
                },
                Role::Legend,
            )
            .series(entry.series)
            .opacity(if entry.disabled { 0.5 } else { 1.0 });
            scene.push(label);

            // Invisible hit region spanning swatch and label
            scene.push(
                Shape::new(
                    ShapeKind::Rect {
                        rect: Rect::new(x, y, w - ENTRY_GAP, ROW_HEIGHT),
                        fill: None,
                        stroke: None,
                        stroke_width: 0.0,
                    },
                    Role::Legend,
                )
                .series(entry.series),
            );

            x += w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_fixture() -> Vec<Series> {
        vec![
            Series::new("low", &[(0.0, 1.0), (1.0, 1.0)]),
            Series::new("high", &[(0.0, 9.0), (1.0, 9.0)]),
            Series::new("mid", &[(0.0, 5.0), (1.0, 5.0)]),
        ]
    }

    fn built_legend() -> Legend {
        let mut legend = Legend::default();
        let mut colors = CategoryScale::default();
        legend.update(&series_fixture(), &mut colors, |s| s.key.clone());
        legend
    }

    #[test]
    fn test_entries_sorted_by_median_desc() {
        let legend = built_legend();
        let labels: Vec<&str> = legend.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_disabled_flag_mirrors_series() {
        let mut series = series_fixture();
        series[1].disabled = true;
        let mut legend = Legend::default();
        let mut colors = CategoryScale::default();
        legend.update(&series, &mut colors, |s| s.key.clone());
        let entry = legend
            .entries()
            .iter()
            .find(|e| e.label == "high")
            .unwrap();
        assert!(entry.disabled);
    }

    #[test]
    fn test_measured_height_expansion() {
        let mut legend = built_legend();
        // Narrow width forces multiple rows
        let collapsed = legend.measured_height(60.0);
        legend.expand_toggle(None);
        let expanded = legend.measured_height(60.0);
        assert!(expanded > collapsed);
        assert!(legend.overflows(60.0));
    }

    #[test]
    fn test_expand_toggle_explicit() {
        let mut legend = built_legend();
        legend.expand_toggle(Some(true));
        assert!(legend.expanded());
        legend.expand_toggle(Some(false));
        assert!(!legend.expanded());
        legend.expand_toggle(None);
        assert!(legend.expanded());
    }

    #[test]
    fn test_render_tags_series() {
        use crate::color::Rgba;
        let mut legend = built_legend();
        let mut scene = Scene::new(
            400.0,
            300.0,
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Rgba::WHITE,
        );
        legend.render(&mut scene, Point::new(10.0, 5.0), 380.0, &Theme::light());

        let legend_shapes: Vec<_> = scene
            .shapes
            .iter()
            .filter(|s| s.role == Role::Legend)
            .collect();
        assert!(!legend_shapes.is_empty());
        assert!(legend_shapes.iter().all(|s| s.series.is_some()));
    }

    #[test]
    fn test_render_collapsed_clips_rows() {
        use crate::color::Rgba;
        let mut legend = built_legend();
        let mut scene = Scene::new(60.0, 300.0, Rect::new(0.0, 0.0, 60.0, 300.0), Rgba::WHITE);
        legend.render(&mut scene, Point::new(0.0, 0.0), 60.0, &Theme::light());
        let collapsed_count = scene.shapes.len();

        let mut scene2 = Scene::new(60.0, 300.0, Rect::new(0.0, 0.0, 60.0, 300.0), Rgba::WHITE);
        legend.expand_toggle(Some(true));
        legend.render(&mut scene2, Point::new(0.0, 0.0), 60.0, &Theme::light());
        assert!(scene2.shapes.len() > collapsed_count);
    }
}
