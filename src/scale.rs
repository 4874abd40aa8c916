//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Continuous scales also invert, which the annotation and brush machinery
//! uses to go from pixels back to data coordinates.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Continuous numeric scales: shared surface of [`LinearScale`] and
/// [`TimeScale`], object-safe so interaction modules can hold either.
pub trait ContinuousScale: Scale<f64, f64> {
    /// Invert the scale (range to domain).
    fn invert(&self, value: f64) -> f64;

    /// Representative tick positions in domain space.
    fn ticks(&self, count: usize) -> Vec<f64>;
}

/// Widen a degenerate extent so a scale over it stays invertible.
#[must_use]
pub fn ensure_span(domain: (f64, f64)) -> (f64, f64) {
    if (domain.1 - domain.0).abs() < f64::EPSILON {
        (domain.0 - 0.5, domain.1 + 0.5)
    } else {
        domain
    }
}

// ============================================================================
// Linear scale
// ============================================================================

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is collapsed.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain(
                "Domain min and max cannot be equal".to_string(),
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Create a scale from data extent.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f64, f64)) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self::new((min, max), range).ok()
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

impl ContinuousScale for LinearScale {
    fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain_min, self.domain_max, count)
    }
}

/// Round tick step: a 1/2/5 multiple of a power of ten near `span / count`.
#[must_use]
pub fn tick_step(span: f64, count: usize) -> f64 {
    let count = count.max(1) as f64;
    let raw = span.abs() / count;
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let mut step = 10f64.powf(raw.log10().floor());
    let err = raw / step;
    if err >= 7.5 {
        step *= 10.0;
    } else if err >= 3.5 {
        step *= 5.0;
    } else if err >= 1.5 {
        step *= 2.0;
    }
    step
}

fn linear_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let step = tick_step(hi - lo, count);
    let first = (lo / step).ceil();
    let last = (hi / step).floor();

    let mut ticks = Vec::new();
    let mut i = first;
    while i <= last {
        // Re-multiply instead of accumulating to avoid float drift
        ticks.push(i * step);
        i += 1.0;
    }
    if min > max {
        ticks.reverse();
    }
    ticks
}

// ============================================================================
// Time scale
// ============================================================================

/// Linear scale over millisecond timestamps with calendar-aware ticks.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    inner: LinearScale,
}

const MS_SECOND: f64 = 1_000.0;
const MS_MINUTE: f64 = 60.0 * MS_SECOND;
const MS_HOUR: f64 = 60.0 * MS_MINUTE;
const MS_DAY: f64 = 24.0 * MS_HOUR;
const MS_MONTH: f64 = 30.0 * MS_DAY;
const MS_YEAR: f64 = 365.0 * MS_DAY;

/// Candidate tick intervals, smallest first.
const TIME_INTERVALS: [f64; 16] = [
    MS_SECOND,
    5.0 * MS_SECOND,
    15.0 * MS_SECOND,
    30.0 * MS_SECOND,
    MS_MINUTE,
    5.0 * MS_MINUTE,
    15.0 * MS_MINUTE,
    30.0 * MS_MINUTE,
    MS_HOUR,
    3.0 * MS_HOUR,
    6.0 * MS_HOUR,
    12.0 * MS_HOUR,
    MS_DAY,
    2.0 * MS_DAY,
    7.0 * MS_DAY,
    MS_MONTH,
];

impl TimeScale {
    /// Create a new time scale over millisecond timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is collapsed.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        Ok(Self {
            inner: LinearScale::new(domain, range)?,
        })
    }

    fn datetime(ms: f64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(ms as i64).single()
    }
}

impl Scale<f64, f64> for TimeScale {
    fn scale(&self, value: f64) -> f64 {
        self.inner.scale(value)
    }

    fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    fn range(&self) -> (f64, f64) {
        self.inner.range()
    }
}

impl ContinuousScale for TimeScale {
    fn invert(&self, value: f64) -> f64 {
        self.inner.invert(value)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.inner.domain();
        let span = max - min;
        if span <= 0.0 {
            return vec![min];
        }

        let target = span / count.max(1) as f64;

        // Years get 1/2/5-stepped linear ticks on the year number
        if target > 3.0 * MS_MONTH {
            return year_ticks(min, max, count);
        }

        // Months align to month starts
        if target > 15.0 * MS_DAY {
            return month_ticks(min, max);
        }

        let interval = TIME_INTERVALS
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (span / a - count as f64).abs();
                let db = (span / b - count as f64).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(MS_DAY);

        let mut ticks = Vec::new();
        let mut t = (min / interval).ceil() * interval;
        while t <= max {
            ticks.push(t);
            t += interval;
        }
        ticks
    }
}

fn year_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let y0 = TimeScale::datetime(min).map_or(1970, |d| d.year());
    let y1 = TimeScale::datetime(max).map_or(1970, |d| d.year());

    // Whole-year steps only; fractional years make no calendar sense
    let span = f64::from((y1 - y0).max(1));
    let step = tick_step(span, count).ceil().max(1.0) as i32;

    let first = y0 - y0.rem_euclid(step);
    (0..)
        .map(|i| first + i * step)
        .take_while(|y| *y <= y1 + step)
        .filter_map(|y| {
            Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0)
                .single()
                .map(|d| d.timestamp_millis() as f64)
        })
        .filter(|&t| t >= min && t <= max)
        .collect()
}

fn month_ticks(min: f64, max: f64) -> Vec<f64> {
    let Some(start) = TimeScale::datetime(min) else {
        return Vec::new();
    };

    let mut year = start.year();
    let mut month = start.month();
    // First month boundary at or after the domain start
    if start.day() != 1 || start.timestamp_subsec_millis() != 0 {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    let mut ticks = Vec::new();
    loop {
        let Some(tick) = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single() else {
            break;
        };
        let ms = tick.timestamp_millis() as f64;
        if ms > max {
            break;
        }
        if ms >= min {
            ticks.push(ms);
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    ticks
}

// ============================================================================
// Band scale
// ============================================================================

/// Ordinal scale mapping categories to evenly spaced positions.
///
/// `Bands` mode yields rounded bands with inner padding (bar charts);
/// `Points` mode yields bare positions from one range end to the other
/// (heatmap rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMode {
    /// Padded bands with a usable width.
    Bands,
    /// Point positions, endpoints included.
    Points,
}

/// Ordinal category scale.
#[derive(Debug, Clone)]
pub struct BandScale {
    categories: Vec<String>,
    range: (f64, f64),
    mode: BandMode,
    padding: f64,
}

impl BandScale {
    /// Create a band scale with 10% inner padding.
    ///
    /// # Errors
    ///
    /// Returns an error if `categories` is empty.
    pub fn bands(categories: Vec<String>, range: (f64, f64)) -> Result<Self> {
        Self::with_mode(categories, range, BandMode::Bands, 0.1)
    }

    /// Create a point scale (no bands, endpoints included).
    ///
    /// # Errors
    ///
    /// Returns an error if `categories` is empty.
    pub fn points(categories: Vec<String>, range: (f64, f64)) -> Result<Self> {
        Self::with_mode(categories, range, BandMode::Points, 0.0)
    }

    fn with_mode(
        categories: Vec<String>,
        range: (f64, f64),
        mode: BandMode,
        padding: f64,
    ) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::ScaleDomain(
                "Band scale requires at least one category".to_string(),
            ));
        }
        Ok(Self {
            categories,
            range,
            mode,
            padding,
        })
    }

    /// Ordered categories of the domain.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Position of a category: band start in `Bands` mode, the point itself
    /// in `Points` mode. `None` for unknown categories.
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.categories.iter().position(|c| c == category)?;
        Some(self.position_at(index))
    }

    /// Position by category index (callers that already hold an index).
    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        let n = self.categories.len() as f64;
        let (r0, r1) = self.range;
        match self.mode {
            BandMode::Bands => {
                let step = (r1 - r0) / n;
                (r0 + index as f64 * step + step * self.padding / 2.0).round()
            }
            BandMode::Points => {
                if self.categories.len() == 1 {
                    r0
                } else {
                    r0 + index as f64 * (r1 - r0) / (n - 1.0)
                }
            }
        }
    }

    /// Usable band width (`Bands` mode); zero for point scales.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        match self.mode {
            BandMode::Bands => {
                let step = (self.range.1 - self.range.0) / self.categories.len() as f64;
                (step * (1.0 - self.padding)).round().max(1.0)
            }
            BandMode::Points => 0.0,
        }
    }

    /// Distance between adjacent positions.
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.categories.len() < 2 {
            return (self.range.1 - self.range.0).abs();
        }
        (self.position_at(1) - self.position_at(0)).abs()
    }

    /// Center of a category's band (tick placement).
    #[must_use]
    pub fn center_at(&self, index: usize) -> f64 {
        match self.mode {
            BandMode::Bands => self.position_at(index) + self.band_width() / 2.0,
            BandMode::Points => self.position_at(index),
        }
    }
}

// ============================================================================
// Color scale
// ============================================================================

/// Sequential color scale interpolating over a stop list.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if `colors` is empty or the domain is collapsed.
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain(
                "Color scale requires at least one color".to_string(),
            ));
        }

        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain(
                "Domain min and max cannot be equal".to_string(),
            ));
        }

        Ok(Self {
            colors,
            domain_min: domain.0,
            domain_max: domain.1,
        })
    }

    /// Two-stop ramp, the heatmap's background-to-accent gradient.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is collapsed.
    pub fn ramp(from: Rgba, to: Rgba, domain: (f64, f64)) -> Result<Self> {
        Self::new(vec![from, to], domain)
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f64).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f64 - segment as f64;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (
            *self.colors.first().unwrap_or(&Rgba::BLACK),
            *self.colors.last().unwrap_or(&Rgba::WHITE),
        )
    }
}
