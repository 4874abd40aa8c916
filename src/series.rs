//! Series data model.
//!
//! A series is a named group of points sharing one visual treatment. Charts
//! accept either a list of series or a bare point list; the bare list is
//! wrapped into a single anonymous series with the legend suppressed. Points
//! serialize as `[x, y]` pairs so the documented JSON response shape
//! (`[{"key": ..., "values": [[x, y], ...]}, ...]`) loads directly.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key given to the wrapper series of a bare point list.
pub const ANONYMOUS_KEY: &str = "series";

/// One data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct DataPoint {
    /// X value (a millisecond timestamp on time axes).
    pub x: f64,
    /// Y value.
    pub y: f64,
}

impl DataPoint {
    /// Create a new data point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<DataPoint> for (f64, f64) {
    fn from(p: DataPoint) -> Self {
        (p.x, p.y)
    }
}

/// A named group of data points sharing a visual treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series name, also the legend key and color seed.
    pub key: String,
    /// The points, in input order.
    pub values: Vec<DataPoint>,
    /// Disabled series stay in the legend but leave layout and drawing.
    #[serde(default)]
    pub disabled: bool,
}

impl Series {
    /// Create a series from `(x, y)` pairs.
    #[must_use]
    pub fn new(key: impl Into<String>, points: &[(f64, f64)]) -> Self {
        Self {
            key: key.into(),
            values: points.iter().copied().map(DataPoint::from).collect(),
            disabled: false,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Median of the y values, the legend's sort key. `None` when empty.
    #[must_use]
    pub fn median_y(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut ys: Vec<f64> = self.values.iter().map(|p| p.y).collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = ys.len() / 2;
        if ys.len() % 2 == 1 {
            Some(ys[mid])
        } else {
            Some((ys[mid - 1] + ys[mid]) / 2.0)
        }
    }
}

/// Wrap a bare point list into a single anonymous series.
#[must_use]
pub fn wrap_points(points: &[(f64, f64)]) -> Vec<Series> {
    vec![Series::new(ANONYMOUS_KEY, points)]
}

/// Parse the documented JSON response shape into series.
///
/// Accepts either a series list or a bare `[[x, y], ...]` point list.
///
/// # Errors
///
/// Returns [`crate::Error::SeriesDecode`] when the payload matches neither
/// shape.
pub fn from_json(payload: &str) -> Result<Vec<Series>> {
    match serde_json::from_str::<Vec<Series>>(payload) {
        Ok(series) => Ok(series),
        Err(first_err) => match serde_json::from_str::<Vec<(f64, f64)>>(payload) {
            Ok(points) => Ok(wrap_points(&points)),
            Err(_) => Err(first_err.into()),
        },
    }
}

/// The enabled (non-disabled) series, preserving order.
#[must_use]
pub fn enabled(series: &[Series]) -> Vec<&Series> {
    series.iter().filter(|s| !s.disabled).collect()
}

/// X extent across the given series. `None` when there are no points.
#[must_use]
pub fn x_extent(series: &[&Series]) -> Option<(f64, f64)> {
    extent(series, |p| p.x)
}

/// Y extent across the given series. `None` when there are no points.
#[must_use]
pub fn y_extent(series: &[&Series]) -> Option<(f64, f64)> {
    extent(series, |p| p.y)
}

fn extent(series: &[&Series], get: impl Fn(&DataPoint) -> f64) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;

    for s in series {
        for p in &s.values {
            let v = get(p);
            min = min.min(v);
            max = max.max(v);
            seen = true;
        }
    }

    seen.then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Series> {
        vec![
            Series::new("a", &[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]),
            Series::new("b", &[(0.0, 5.0), (1.0, 4.0), (2.0, 6.0)]),
        ]
    }

    #[test]
    fn test_series_json_round_trip() {
        let series = sample();
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("[0.0,1.0]") || json.contains("[0,1]"));
        let back: Vec<Series> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn test_from_json_series_shape() {
        let payload = r#"[{"key":"cpu","values":[[0,1],[1,2]]}]"#;
        let series = from_json(payload).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].key, "cpu");
        assert_eq!(series[0].values[1], DataPoint::new(1.0, 2.0));
        assert!(!series[0].disabled);
    }

    #[test]
    fn test_from_json_bare_points() {
        let payload = "[[0,1],[1,2],[2,4]]";
        let series = from_json(payload).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].key, ANONYMOUS_KEY);
        assert_eq!(series[0].len(), 3);
    }

    #[test]
    fn test_from_json_garbage() {
        assert!(from_json("{\"not\": \"series\"}").is_err());
    }

    #[test]
    fn test_enabled_filters_disabled() {
        let mut series = sample();
        series[0].disabled = true;
        let on = enabled(&series);
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].key, "b");
    }

    #[test]
    fn test_extents() {
        let series = sample();
        let refs = enabled(&series);
        assert_eq!(x_extent(&refs), Some((0.0, 2.0)));
        assert_eq!(y_extent(&refs), Some((1.0, 6.0)));
    }

    #[test]
    fn test_extent_empty() {
        let refs: Vec<&Series> = Vec::new();
        assert_eq!(x_extent(&refs), None);
    }

    #[test]
    fn test_median_y() {
        let s = Series::new("m", &[(0.0, 1.0), (1.0, 9.0), (2.0, 3.0)]);
        assert_eq!(s.median_y(), Some(3.0));
        let even = Series::new("e", &[(0.0, 1.0), (1.0, 3.0)]);
        assert_eq!(even.median_y(), Some(2.0));
        assert_eq!(Series::new("none", &[]).median_y(), None);
    }
}
