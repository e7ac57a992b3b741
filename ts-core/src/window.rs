use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{CanonicalPoint, TimeKey};

/// Trailing span shown on the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::All => "all",
            Window::OneMonth => "1M",
            Window::ThreeMonths => "3M",
            Window::SixMonths => "6M",
            Window::OneYear => "1Y",
            Window::TwoYears => "2Y",
        }
    }

    /// Calendar months subtracted from "now"; `None` for `All`.
    pub fn months(&self) -> Option<u32> {
        match self {
            Window::All => None,
            Window::OneMonth => Some(1),
            Window::ThreeMonths => Some(3),
            Window::SixMonths => Some(6),
            Window::OneYear => Some(12),
            Window::TwoYears => Some(24),
        }
    }

    /// Earliest instant kept by this window. Days past the end of the target
    /// month clamp to its last day (May 31 minus 3M is Feb 29 in a leap year).
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.months()
            .and_then(|m| now.checked_sub_months(Months::new(m)))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWindowError;

impl fmt::Display for ParseWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown window (expected all, 1M, 3M, 6M, 1Y or 2Y)")
    }
}

impl std::error::Error for ParseWindowError {}

impl FromStr for Window {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Window::All),
            "1M" => Ok(Window::OneMonth),
            "3M" => Ok(Window::ThreeMonths),
            "6M" => Ok(Window::SixMonths),
            "1Y" => Ok(Window::OneYear),
            "2Y" => Ok(Window::TwoYears),
            _ => Err(ParseWindowError),
        }
    }
}

/// Restrict a series to `window` relative to the current time.
pub fn filter_by_window(points: &[CanonicalPoint], window: Window) -> Vec<CanonicalPoint> {
    filter_by_window_at(points, window, Utc::now())
}

/// Restrict a series to `window` relative to `now`.
///
/// Only daily points are trimmed; monthly and yearly points always pass.
pub fn filter_by_window_at(
    points: &[CanonicalPoint],
    window: Window,
    now: DateTime<Utc>,
) -> Vec<CanonicalPoint> {
    let Some(cutoff) = window.cutoff(now) else {
        return points.to_vec();
    };
    let cutoff_ms = cutoff.timestamp_millis();
    points
        .iter()
        .filter(|p| match p.key {
            TimeKey::Date(ts) => ts >= cutoff_ms,
            TimeKey::YearMonth(..) | TimeKey::Year(_) => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_date, Ohlc};
    use chrono::TimeZone;

    fn daily(date: &str, value: f64) -> CanonicalPoint {
        CanonicalPoint {
            key: TimeKey::Date(parse_date(date).unwrap()),
            label: date.to_string(),
            value,
            volume: 0.0,
            ohlc: Ohlc::default(),
            high: None,
            low: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn all_is_identity() {
        let points = vec![daily("2001-01-01", 1.0), daily("2024-06-01", 2.0)];
        assert_eq!(filter_by_window_at(&points, Window::All, now()), points);
        assert!(filter_by_window_at(&[], Window::All, now()).is_empty());
        assert_eq!(filter_by_window(&points, Window::All), points);
    }

    #[test]
    fn one_year_subtracts_a_calendar_year() {
        let points = vec![
            daily("2023-06-14", 1.0),
            daily("2023-06-16", 2.0),
            daily("2024-06-01", 3.0),
        ];
        let kept = filter_by_window_at(&points, Window::OneYear, now());
        let values: Vec<f64> = kept.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[test]
    fn month_windows_use_calendar_months() {
        let points = vec![
            daily("2024-03-14", 1.0),
            daily("2024-03-16", 2.0),
            daily("2024-05-20", 3.0),
        ];
        let kept = filter_by_window_at(&points, Window::ThreeMonths, now());
        assert_eq!(kept.len(), 2);
        let kept = filter_by_window_at(&points, Window::OneMonth, now());
        assert_eq!(kept.len(), 1);
        let kept = filter_by_window_at(&points, Window::TwoYears, now());
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn coarse_granularities_pass_through() {
        let points = vec![
            CanonicalPoint {
                key: TimeKey::YearMonth(1999, 1),
                label: "1999-01".into(),
                value: 1.0,
                volume: 0.0,
                ohlc: Ohlc::default(),
                high: None,
                low: None,
            },
            CanonicalPoint {
                key: TimeKey::Year(1990),
                label: "1990".into(),
                value: 2.0,
                volume: 0.0,
                ohlc: Ohlc::default(),
                high: None,
                low: None,
            },
        ];
        assert_eq!(filter_by_window_at(&points, Window::ThreeMonths, now()), points);
    }

    #[test]
    fn end_of_month_cutoff_clamps() {
        let may_31 = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        let cutoff = Window::ThreeMonths.cutoff(may_31).unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert!(Window::All.cutoff(may_31).is_none());
    }

    #[test]
    fn parses_window_labels() {
        assert_eq!("all".parse::<Window>(), Ok(Window::All));
        assert_eq!("ALL".parse::<Window>(), Ok(Window::All));
        assert_eq!("3M".parse::<Window>(), Ok(Window::ThreeMonths));
        assert_eq!("2y".parse::<Window>(), Ok(Window::TwoYears));
        assert!("5Y".parse::<Window>().is_err());
    }
}
