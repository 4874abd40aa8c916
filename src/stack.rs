//! Stacking layouts for area and bar charts.
//!
//! Computes a `y0` baseline per point so multiple series accumulate
//! vertically. Offsets: `Zero` (classic stacking), `Expand` (normalize each
//! x slot to `[0, 1]`), `Wiggle` (streamgraph baseline minimizing weighted
//! change). Orders: input order, or `InsideOut` (series with the largest
//! values placed innermost), the pairing streamed charts use.

use crate::error::{Error, Result};
use crate::series::Series;

/// Baseline placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Stack from zero.
    #[default]
    Zero,
    /// Normalize each x slot so the column spans `[0, 1]`.
    Expand,
    /// Streamgraph baseline minimizing weighted wiggle.
    Wiggle,
}

/// Stacking order of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// Input order.
    #[default]
    Input,
    /// Largest series innermost, alternating outward.
    InsideOut,
}

/// One stacked point: the (possibly normalized) value and its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedPoint {
    /// X value.
    pub x: f64,
    /// Y extent of this series at `x` (normalized under `Expand`).
    pub y: f64,
    /// Baseline the extent sits on.
    pub y0: f64,
}

/// A stacked series, in the input order of the source slice.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedSeries {
    /// Index into the source slice.
    pub index: usize,
    /// Series key.
    pub key: String,
    /// Stacked points.
    pub points: Vec<StackedPoint>,
}

/// Stack the given series.
///
/// Series must be aligned index-wise: same length, matching x positions
/// assumed. The result preserves input order; baselines are computed in the
/// requested stacking order.
///
/// # Errors
///
/// [`Error::EmptyData`] for an empty slice or empty series,
/// [`Error::SeriesLengthMismatch`] when lengths disagree.
pub fn stack(
    series: &[&Series],
    offset: StackOffset,
    order: StackOrder,
) -> Result<Vec<StackedSeries>> {
    if series.is_empty() || series[0].values.is_empty() {
        return Err(Error::EmptyData);
    }

    let m = series[0].values.len();
    for s in series {
        if s.values.len() != m {
            return Err(Error::SeriesLengthMismatch {
                expected: m,
                found: s.values.len(),
            });
        }
    }

    // Working copy of y values, normalized under Expand
    let mut ys: Vec<Vec<f64>> = series
        .iter()
        .map(|s| s.values.iter().map(|p| p.y).collect())
        .collect();

    if offset == StackOffset::Expand {
        for j in 0..m {
            let total: f64 = ys.iter().map(|col| col[j]).sum();
            if total > 0.0 {
                for col in &mut ys {
                    col[j] /= total;
                }
            }
        }
    }

    let stack_order = match order {
        StackOrder::Input => (0..series.len()).collect::<Vec<_>>(),
        StackOrder::InsideOut => inside_out_order(&ys),
    };

    // Baseline of the bottom-most series at each x slot
    let base = match offset {
        StackOffset::Wiggle => wiggle_baseline(series, &ys, &stack_order),
        StackOffset::Zero | StackOffset::Expand => vec![0.0; m],
    };

    // Accumulate in stacking order, then emit in input order
    let mut baselines: Vec<Vec<f64>> = vec![vec![0.0; m]; series.len()];
    let mut running = base;
    for &i in &stack_order {
        baselines[i] = running.clone();
        for j in 0..m {
            running[j] += ys[i][j];
        }
    }

    Ok(series
        .iter()
        .enumerate()
        .map(|(i, s)| StackedSeries {
            index: i,
            key: s.key.clone(),
            points: s
                .values
                .iter()
                .enumerate()
                .map(|(j, p)| StackedPoint {
                    x: p.x,
                    y: ys[i][j],
                    y0: baselines[i][j],
                })
                .collect(),
        })
        .collect())
}

/// Largest-sum series innermost: sort by the index of each series' maximum,
/// then deal outward to whichever side currently carries less weight.
fn inside_out_order(ys: &[Vec<f64>]) -> Vec<usize> {
    let sums: Vec<f64> = ys.iter().map(|col| col.iter().sum()).collect();
    let max_index: Vec<usize> = ys
        .iter()
        .map(|col| {
            col.iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map_or(0, |(j, _)| j)
        })
        .collect();

    let mut by_max: Vec<usize> = (0..ys.len()).collect();
    by_max.sort_by_key(|&i| max_index[i]);

    let mut top_sum = 0.0;
    let mut bottom_sum = 0.0;
    let mut tops = Vec::new();
    let mut bottoms = Vec::new();

    for &i in &by_max {
        if top_sum < bottom_sum {
            top_sum += sums[i];
            tops.push(i);
        } else {
            bottom_sum += sums[i];
            bottoms.push(i);
        }
    }

    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

/// Streamgraph baseline: the bottom series' y0 at each slot, chosen so the
/// weighted sum of slope changes stays small, then shifted non-negative.
fn wiggle_baseline(series: &[&Series], ys: &[Vec<f64>], order: &[usize]) -> Vec<f64> {
    let m = series[0].values.len();
    let xs: Vec<f64> = series[0].values.iter().map(|p| p.x).collect();

    let mut y0 = vec![0.0; m];
    let mut o = 0.0;
    let mut o_min = 0.0_f64;

    for j in 1..m {
        let dx = xs[j] - xs[j - 1];
        if dx.abs() < f64::EPSILON {
            y0[j] = o;
            continue;
        }

        let s1: f64 = order.iter().map(|&i| ys[i][j]).sum();

        let mut s2 = 0.0;
        for (pos, &i) in order.iter().enumerate() {
            let mut s3 = (ys[i][j] - ys[i][j - 1]) / (2.0 * dx);
            for &k in &order[..pos] {
                s3 += (ys[k][j] - ys[k][j - 1]) / dx;
            }
            s2 += s3 * ys[i][j];
        }

        if s1.abs() > f64::EPSILON {
            o -= s2 / s1 * dx;
        }
        y0[j] = o;
        o_min = o_min.min(o);
    }

    for v in &mut y0 {
        *v -= o_min;
    }
    y0
}

/// Maximum stacked top (`y0 + y`) across all series and slots.
#[must_use]
pub fn stacked_max(stacked: &[StackedSeries]) -> f64 {
    stacked
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.y0 + p.y))
        .fold(f64::NEG_INFINITY, f64::max)
}
