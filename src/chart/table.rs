//! Table chart: column configuration, sorting, and row selection over rows
//! of JSON objects.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::chart::base::{begin_scene, impl_config_accessors, Config, Dispatch, Event, Margin};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::scene::{Role, Scene, Shape, ShapeKind, TextAnchor};

/// Header row height.
const HEADER_HEIGHT: f64 = 24.0;
/// Data row height.
const ROW_HEIGHT: f64 = 22.0;
/// Cell text inset.
const CELL_PAD: f64 = 6.0;

/// Per-cell formatter.
pub type CellFormatter = fn(&Value) -> String;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Column configuration.
#[derive(Debug, Clone)]
pub struct Column {
    /// Row field this column reads.
    pub key: String,
    /// Header label; the key doubles as the label when unset.
    pub label: Option<String>,
    /// Hidden columns take part in data but not layout.
    pub hidden: bool,
    /// Per-column sortable override.
    pub sortable: Option<bool>,
    /// Cell value formatter.
    pub formatter: Option<CellFormatter>,
}

impl Column {
    /// Create a column for a row field.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            hidden: false,
            sortable: None,
            formatter: None,
        }
    }

    /// Set the header label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Hide the column.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Override the table-level sortable flag for this column.
    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    /// Set a cell formatter.
    #[must_use]
    pub fn formatter(mut self, f: CellFormatter) -> Self {
        self.formatter = Some(f);
        self
    }

    fn header(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

/// A table row.
pub type Row = serde_json::Map<String, Value>;

/// Table chart.
#[derive(Debug, Clone)]
pub struct TableChart {
    config: Config,
    columns: Vec<Column>,
    sortable: bool,
    rows: Vec<Row>,
    /// Display order: indices into `rows`.
    order: Vec<usize>,
    sort_state: Option<(usize, SortDirection)>,
    selected: Option<usize>,
    dispatch: Dispatch,
    scene: Option<Scene>,
}

impl Default for TableChart {
    fn default() -> Self {
        Self::new()
    }
}

impl TableChart {
    /// Create a table chart (legend off, uniform 20 px margin).
    #[must_use]
    pub fn new() -> Self {
        let mut config = Config::default();
        config.legend = false;
        config.margin = Margin {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 20.0,
        };
        Self {
            config,
            columns: Vec::new(),
            sortable: true,
            rows: Vec::new(),
            order: Vec::new(),
            sort_state: None,
            selected: None,
            dispatch: Dispatch::default(),
            scene: None,
        }
    }

    /// Set the column configuration.
    #[must_use]
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Enable or disable sorting table-wide.
    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Set the rows (builder form). Rows without an `id` field get one.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Set the rows. Rows without an `id` field get one.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        for row in &mut self.rows {
            if !row.contains_key("id") {
                row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
            }
        }
        self.order = (0..self.rows.len()).collect();
        self.selected = None;
    }

    /// Parse rows from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is not an array of objects.
    pub fn set_rows_json(&mut self, payload: &str) -> Result<()> {
        let rows: Vec<Row> = serde_json::from_str(payload)?;
        self.set_rows(rows);
        Ok(())
    }

    /// Effective columns: configured, or derived from the first row.
    fn effective_columns(&self) -> Vec<Column> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        self.rows.first().map_or_else(Vec::new, |row| {
            row.keys().map(|k| Column::new(k.clone())).collect()
        })
    }

    fn cell_text(column: &Column, value: Option<&Value>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        if let Some(f) = column.formatter {
            return f(value);
        }
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Sort by a row field. Missing values sort first.
    pub fn sort(&mut self, key: &str, direction: SortDirection) {
        debug!(key, ?direction, "table sort");
        let rows = &self.rows;
        self.order.sort_by(|&a, &b| {
            let cmp = compare_values(rows[a].get(key), rows[b].get(key));
            match direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });
    }

    /// Activate a header: cycle asc/desc on a sortable column.
    pub fn header_clicked(&mut self, col: usize) {
        let columns = self.effective_columns();
        let Some(column) = columns.get(col) else {
            return;
        };
        if !column.sortable.unwrap_or(self.sortable) {
            return;
        }

        let direction = match self.sort_state {
            Some((c, SortDirection::Asc)) if c == col => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.sort_state = Some((col, direction));
        let key = column.key.clone();
        self.sort(&key, direction);
    }

    /// The sorted column and direction, if any.
    #[must_use]
    pub fn sort_state(&self) -> Option<(usize, SortDirection)> {
        self.sort_state
    }

    /// Select the first row whose `key` field equals `value`; returns the
    /// selected row.
    pub fn select_row(&mut self, key: &str, value: &Value) -> Option<&Row> {
        self.selected = self.rows.iter().position(|r| r.get(key) == Some(value));
        self.selected.map(|i| &self.rows[i])
    }

    /// The selected row, if any.
    #[must_use]
    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.map(|i| &self.rows[i])
    }

    /// Column width percentages derived from content length; hidden columns
    /// collapse to zero and the last visible column absorbs rounding.
    fn column_widths(&self, columns: &[Column]) -> Vec<f64> {
        let mut units: Vec<f64> = columns
            .iter()
            .map(|c| {
                if c.hidden {
                    0.0
                } else {
                    c.header().chars().count().max(4) as f64
                }
            })
            .collect();

        for &ri in &self.order {
            for (ci, c) in columns.iter().enumerate() {
                if c.hidden {
                    continue;
                }
                let text = Self::cell_text(c, self.rows[ri].get(&c.key));
                units[ci] = units[ci].max(text.chars().count() as f64);
            }
        }

        let total: f64 = units.iter().sum();
        if total <= 0.0 {
            return vec![0.0; columns.len()];
        }

        let mut pcts: Vec<f64> = units.iter().map(|u| u / total * 100.0).collect();
        // The last visible column absorbs rounding so the row spans exactly
        if let Some(last_visible) = (0..pcts.len()).rev().find(|&i| pcts[i] > 0.0) {
            let others: f64 = pcts
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != last_visible)
                .map(|(_, p)| *p)
                .sum();
            pcts[last_visible] = 100.0 - others;
        }
        pcts
    }

    /// Build the full scene.
    pub fn render(&mut self) -> Result<&Scene> {
        debug!(rows = self.rows.len(), "table render");
        self.sort_state = None;
        self.selected = None;
        self.order = (0..self.rows.len()).collect();
        self.rebuild()
    }

    /// Re-render keeping sorting and selection.
    pub fn update(&mut self) -> Result<&Scene> {
        self.rebuild()
    }

    /// Set new outer dimensions and re-layout without touching rows.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<&Scene> {
        self.config.width = width;
        self.config.height = height;
        self.rebuild()
    }

    fn rebuild(&mut self) -> Result<&Scene> {
        let mut scene = begin_scene(&self.config);
        let layout = self.config.layout(false, 0.0);
        scene.plot = layout.plot;
        let plot = layout.plot;

        let columns = self.effective_columns();
        if columns.is_empty() {
            return Err(crate::Error::EmptyData);
        }
        let widths = self.column_widths(&columns);

        let theme = &self.config.theme;

        // Frame
        scene.push(Shape::new(
            ShapeKind::Rect {
                rect: plot,
                fill: None,
                stroke: Some(theme.grid),
                stroke_width: 1.0,
            },
            Role::Table,
        ));

        // Header row
        scene.push(Shape::new(
            ShapeKind::Rect {
                rect: Rect::new(plot.x, plot.y, plot.width, HEADER_HEIGHT),
                fill: Some(theme.grid.with_alpha(90)),
                stroke: None,
                stroke_width: 1.0,
            },
            Role::Table,
        ));

        let mut x = plot.x;
        for (ci, column) in columns.iter().enumerate() {
            if column.hidden {
                continue;
            }
            let w = widths[ci] / 100.0 * plot.width;

            let sort_marker = match self.sort_state {
                Some((c, SortDirection::Asc)) if c == ci => " \u{2191}",
                Some((c, SortDirection::Desc)) if c == ci => " \u{2193}",
                _ if column.sortable.unwrap_or(self.sortable) => " \u{2195}",
                _ => "",
            };

            scene.push(
                Shape::new(
                    ShapeKind::Text {
                        pos: Point::new(x + CELL_PAD, plot.y + HEADER_HEIGHT - 7.0),
                        text: format!("{}{sort_marker}", column.header()),
                        size: 11.0,
                        color: theme.text,
                        anchor: TextAnchor::Start,
                        rotation: None,
                    },
                    Role::Table,
                )
                .series(ci),
            );
            // Header hit region
            scene.push(
                Shape::new(
                    ShapeKind::Rect {
                        rect: Rect::new(x, plot.y, w, HEADER_HEIGHT),
                        fill: None,
                        stroke: None,
                        stroke_width: 0.0,
                    },
                    Role::Table,
                )
                .series(ci),
            );

            x += w;
        }

        // Rows, clipped to the table body
        let body_top = plot.y + HEADER_HEIGHT;
        let visible_rows = ((plot.height - HEADER_HEIGHT) / ROW_HEIGHT).floor() as usize;

        for (display_idx, &ri) in self.order.iter().take(visible_rows).enumerate() {
            let row = &self.rows[ri];
            let y = body_top + display_idx as f64 * ROW_HEIGHT;

            let selected = self.selected == Some(ri);
            scene.push(
                Shape::new(
                    ShapeKind::Rect {
                        rect: Rect::new(plot.x, y, plot.width, ROW_HEIGHT),
                        fill: if selected {
                            Some(crate::color::Rgba::STEEL_BLUE.with_alpha(60))
                        } else {
                            None
                        },
                        stroke: None,
                        stroke_width: 0.0,
                    },
                    Role::Table,
                )
                .point(ri),
            );

            let mut x = plot.x;
            for (ci, column) in columns.iter().enumerate() {
                if column.hidden {
                    continue;
                }
                let w = widths[ci] / 100.0 * plot.width;
                scene.push(
                    Shape::new(
                        ShapeKind::Text {
                            pos: Point::new(x + CELL_PAD, y + ROW_HEIGHT - 6.0),
                            text: Self::cell_text(column, row.get(&column.key)),
                            size: 11.0,
                            color: theme.text,
                            anchor: TextAnchor::Start,
                            rotation: None,
                        },
                        Role::Table,
                    )
                    .series(ci)
                    .point(ri),
                );
                x += w;
            }

            // Row separator
            scene.push(Shape::new(
                ShapeKind::Line {
                    line: crate::geometry::Line::from_coords(
                        plot.x,
                        y + ROW_HEIGHT,
                        plot.right(),
                        y + ROW_HEIGHT,
                    ),
                    stroke: theme.grid,
                    width: 1.0,
                },
                Role::Grid,
            ));
        }

        Ok(&*self.scene.insert(scene))
    }

    /// The last rendered scene, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Drain queued chart events.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.dispatch.drain()
    }

    /// Encode the last rendered scene as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> Option<String> {
        self.scene
            .as_ref()
            .map(|s| crate::output::SvgEncoder::from_scene(s).to_string())
    }

    /// Primary activation: header cells toggle sorting, rows select.
    pub fn pointer_clicked(&mut self, p: Point) -> Result<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let Some(idx) = scene.hit_test(p) else {
            return Ok(());
        };
        let shape = &scene.shapes[idx];
        if shape.role != Role::Table {
            return Ok(());
        }

        match (shape.series, shape.point) {
            // Header cell
            (Some(col), None) => {
                self.header_clicked(col);
                self.rebuild()?;
            }
            // Row (or cell within it)
            (_, Some(row)) => {
                self.selected = Some(row);
                self.dispatch.emit(Event::Click {
                    series: None,
                    point: Some(row),
                });
                self.rebuild()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Double activation on a row.
    pub fn pointer_double_clicked(&mut self, p: Point) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        if let Some(idx) = scene.hit_test(p) {
            let shape = &scene.shapes[idx];
            if shape.role == Role::Table {
                if let Some(row) = shape.point {
                    self.dispatch.emit(Event::DblClick {
                        series: None,
                        point: Some(row),
                    });
                }
            }
        }
    }
}

/// Order JSON values: numbers numerically, everything else by string form,
/// missing values first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_string(a).cmp(&value_string(b)),
        },
    }
}

fn value_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl_config_accessors!(TableChart);
