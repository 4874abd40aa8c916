//! Value and time formatting for ticks and tooltips.
//!
//! The defaults mirror common charting conventions: SI-prefix abbreviation on
//! value axes, granularity-sensitive labels on time axes, grouped integers in
//! tooltips.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// A named or custom formatter carried in chart configuration.
#[derive(Clone, Copy)]
pub enum TickFormat {
    /// Shortest decimal rendering ("2", "2.5").
    Plain,
    /// SI-prefix abbreviation ("12.35k").
    UnitSuffix,
    /// Granularity-sensitive time label (millisecond through year).
    MultiTime,
    /// Full date-time ("08/07/2026 14:03:59").
    Time,
    /// Plain percent of a unit fraction ("12.5%").
    Percent,
    /// Signed percent of a unit fraction ("+4.2%"), index-mode ticks.
    SignedPercent,
    /// Grouped integer ("1,234,567").
    GroupedInt,
    /// Caller-provided formatter.
    Custom(fn(f64) -> String),
}

impl std::fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Plain => "Plain",
            Self::UnitSuffix => "UnitSuffix",
            Self::MultiTime => "MultiTime",
            Self::Time => "Time",
            Self::Percent => "Percent",
            Self::SignedPercent => "SignedPercent",
            Self::GroupedInt => "GroupedInt",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

impl TickFormat {
    /// Format a value with this formatter.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Plain => plain(value),
            Self::UnitSuffix => unit_suffix(value),
            Self::MultiTime => multi_time(value),
            Self::Time => time(value),
            Self::Percent => percent(value),
            Self::SignedPercent => signed_percent(value),
            Self::GroupedInt => grouped_int(value),
            Self::Custom(f) => f(value),
        }
    }
}

/// Trim a fixed-decimal rendering to its shortest form ("12.50" -> "12.5").
fn trim_decimal(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Shortest decimal rendering with up to four decimals.
#[must_use]
pub fn plain(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    trim_decimal(&format!("{value:.4}"))
}

/// Format a number with an SI prefix, two decimals at most.
///
/// `12345.0` becomes `"12.35k"`, `0.0042` becomes `"4.2m"`.
#[must_use]
pub fn unit_suffix(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let exp3 = (value.abs().log10().floor() as i32).div_euclid(3) * 3;
    let exp3 = exp3.clamp(-9, 15);
    let symbol = match exp3 {
        -9 => "n",
        -6 => "\u{b5}",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        _ => "",
    };

    let scaled = value / 10f64.powi(exp3);
    format!("{}{symbol}", trim_decimal(&format!("{scaled:.2}")))
}

fn datetime(ms: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms as i64).single()
}

/// Granularity-sensitive time label for a millisecond timestamp.
///
/// The first boundary the timestamp does not sit on decides the label:
/// ".250" for sub-second, ":05" for seconds, "03:30" for minutes, "03 PM"
/// for hours, "Mon 15" for weekdays, "Aug 15" for days, "August" for month
/// starts, and the year for January 1st.
#[must_use]
pub fn multi_time(ms: f64) -> String {
    let Some(d) = datetime(ms) else {
        return String::new();
    };

    if d.timestamp_subsec_millis() != 0 {
        format!(".{:03}", d.timestamp_subsec_millis())
    } else if d.second() != 0 {
        format!(":{:02}", d.second())
    } else if d.minute() != 0 {
        d.format("%I:%M").to_string()
    } else if d.hour() != 0 {
        d.format("%I %p").to_string()
    } else if d.weekday().num_days_from_sunday() != 0 && d.day() != 1 {
        d.format("%a %d").to_string()
    } else if d.day() != 1 {
        d.format("%b %d").to_string()
    } else if d.month() != 1 {
        d.format("%B").to_string()
    } else {
        d.format("%Y").to_string()
    }
}

/// Full date-time label used in tooltip headers.
#[must_use]
pub fn time(ms: f64) -> String {
    datetime(ms).map_or_else(String::new, |d| d.format("%m/%d/%Y %H:%M:%S").to_string())
}

/// Percent of a unit fraction: `0.125` becomes `"12.5%"`.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{}%", trim_decimal(&format!("{:.2}", value * 100.0)))
}

/// Signed percent of a unit fraction: `0.042` becomes `"+4.2%"`.
#[must_use]
pub fn signed_percent(value: f64) -> String {
    let pct = value * 100.0;
    let body = trim_decimal(&format!("{pct:.2}"));
    if pct > 0.0 {
        format!("+{body}%")
    } else {
        format!("{body}%")
    }
}

/// Grouped integer: `1234567.0` becomes `"1,234,567"`.
#[must_use]
pub fn grouped_int(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms_of(y: i32, mo: u32, day: u32, h: u32, mi: u32, s: u32) -> f64 {
        Utc.with_ymd_and_hms(y, mo, day, h, mi, s)
            .single()
            .unwrap()
            .timestamp_millis() as f64
    }

    #[test]
    fn test_unit_suffix_thousands() {
        assert_eq!(unit_suffix(12_500.0), "12.5k");
        assert_eq!(unit_suffix(1_000.0), "1k");
        assert_eq!(unit_suffix(2_500_000.0), "2.5M");
        assert_eq!(unit_suffix(3_000_000_000.0), "3G");
    }

    #[test]
    fn test_unit_suffix_small_and_zero() {
        assert_eq!(unit_suffix(0.0), "0");
        assert_eq!(unit_suffix(42.0), "42");
        assert_eq!(unit_suffix(0.004), "4m");
    }

    #[test]
    fn test_unit_suffix_negative() {
        assert_eq!(unit_suffix(-12_500.0), "-12.5k");
    }

    #[test]
    fn test_multi_time_granularities() {
        assert_eq!(multi_time(ms_of(2023, 8, 15, 14, 30, 5)), ":05");
        assert_eq!(multi_time(ms_of(2023, 8, 15, 14, 30, 0)), "02:30");
        assert_eq!(multi_time(ms_of(2023, 8, 15, 14, 0, 0)), "02 PM");
        // 2023-08-15 is a Tuesday
        assert_eq!(multi_time(ms_of(2023, 8, 15, 0, 0, 0)), "Tue 15");
        // 2023-10-01 is a Sunday, so it falls through to the month-day rule...
        assert_eq!(multi_time(ms_of(2023, 10, 8, 0, 0, 0)), "Oct 08");
        // ...and month starts show the month name
        assert_eq!(multi_time(ms_of(2023, 8, 1, 0, 0, 0)), "August");
        assert_eq!(multi_time(ms_of(2023, 1, 1, 0, 0, 0)), "2023");
    }

    #[test]
    fn test_multi_time_millis() {
        let base = ms_of(2023, 8, 15, 14, 30, 5);
        assert_eq!(multi_time(base + 250.0), ".250");
    }

    #[test]
    fn test_time_format() {
        assert_eq!(time(ms_of(2023, 8, 15, 14, 30, 5)), "08/15/2023 14:30:05");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.125), "12.5%");
        assert_eq!(percent(1.0), "100%");
        assert_eq!(percent(0.0), "0%");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(0.042), "+4.2%");
        assert_eq!(signed_percent(-0.1), "-10%");
        assert_eq!(signed_percent(0.0), "0%");
    }

    #[test]
    fn test_grouped_int() {
        assert_eq!(grouped_int(1_234_567.0), "1,234,567");
        assert_eq!(grouped_int(999.0), "999");
        assert_eq!(grouped_int(1000.4), "1,000");
        assert_eq!(grouped_int(-1234.0), "-1,234");
        assert_eq!(grouped_int(0.0), "0");
    }

    #[test]
    fn test_plain() {
        assert_eq!(plain(2.0), "2");
        assert_eq!(plain(2.5), "2.5");
        assert_eq!(plain(-0.25), "-0.25");
    }

    #[test]
    fn test_tick_format_dispatch() {
        assert_eq!(TickFormat::UnitSuffix.format(1500.0), "1.5k");
        assert_eq!(TickFormat::Percent.format(0.5), "50%");
        assert_eq!(TickFormat::GroupedInt.format(1200.0), "1,200");
        fn double(v: f64) -> String {
            format!("{}", v * 2.0)
        }
        assert_eq!(TickFormat::Custom(double).format(2.0), "4");
    }
}
