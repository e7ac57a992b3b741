use serde::Serialize;

use crate::{CanonicalPoint, TimeKey, DAY_MS};

pub const PRICE_CHANGE_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub percentage: f64,
    pub current: f64,
    pub old: f64,
    pub is_positive: bool,
}

/// Reported high and low of the most recent point. Either is `None` when the
/// series is empty or the latest record lacks it.
pub fn latest_high_low(points: &[CanonicalPoint]) -> (Option<f64>, Option<f64>) {
    points.last().map_or((None, None), |p| (p.high, p.low))
}

/// Change of the latest value against the point closest to `days` earlier.
///
/// Daily series only. Among equally close points the earliest one is used.
pub fn price_change(points: &[CanonicalPoint], days: i64) -> Option<PriceChange> {
    if points.len() < 2 {
        return None;
    }
    let latest = points.last()?;
    let TimeKey::Date(latest_ts) = latest.key else {
        return None;
    };
    let target = latest_ts - days * DAY_MS;

    let mut reference = &points[0];
    let mut best = distance(reference, target)?;
    for p in &points[1..] {
        let d = distance(p, target)?;
        if d < best {
            best = d;
            reference = p;
        }
    }

    let (current, old) = (latest.value, reference.value);
    if current == 0.0 || old == 0.0 {
        return None;
    }
    let percentage = (current - old) / old * 100.0;
    Some(PriceChange {
        percentage,
        current,
        old,
        is_positive: percentage >= 0.0,
    })
}

fn distance(point: &CanonicalPoint, target: i64) -> Option<u64> {
    point.key.timestamp().map(|ts| ts.abs_diff(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_date, Ohlc};

    fn daily(date: &str, value: f64) -> CanonicalPoint {
        CanonicalPoint {
            key: TimeKey::Date(parse_date(date).unwrap()),
            label: date.to_string(),
            value,
            volume: 0.0,
            ohlc: Ohlc {
                open: value,
                high: value + 1.0,
                low: value - 1.0,
                close: value,
            },
            high: Some(value + 1.0),
            low: Some(value - 1.0),
        }
    }

    #[test]
    fn high_low_of_latest_point() {
        let points = vec![daily("2024-01-01", 10.0), daily("2024-01-02", 20.0)];
        assert_eq!(latest_high_low(&points), (Some(21.0), Some(19.0)));
        assert_eq!(latest_high_low(&[]), (None, None));
    }

    #[test]
    fn absent_high_low_is_not_zero() {
        let mut latest = daily("2024-01-02", 20.0);
        latest.high = None;
        latest.low = Some(18.5);
        let points = vec![daily("2024-01-01", 10.0), latest];
        assert_eq!(latest_high_low(&points), (None, Some(18.5)));
    }

    #[test]
    fn change_against_closest_point_a_month_back() {
        let points = vec![
            daily("2024-01-01", 50.0),
            daily("2024-02-01", 100.0),
            daily("2024-02-20", 80.0),
            daily("2024-03-02", 110.0),
        ];
        let change = price_change(&points, PRICE_CHANGE_LOOKBACK_DAYS).unwrap();
        assert_eq!(change.old, 100.0);
        assert_eq!(change.current, 110.0);
        assert!((change.percentage - 10.0).abs() < 1e-9);
        assert!(change.is_positive);
    }

    #[test]
    fn equal_distance_prefers_earlier_point() {
        // Target is 2024-01-31; both neighbours are one day away.
        let points = vec![
            daily("2024-01-30", 200.0),
            daily("2024-02-01", 400.0),
            daily("2024-03-01", 100.0),
        ];
        let change = price_change(&points, 30).unwrap();
        assert_eq!(change.old, 200.0);
        assert!(!change.is_positive);
        assert!((change.percentage + 50.0).abs() < 1e-9);
    }

    #[test]
    fn no_change_for_short_coarse_or_zero_series() {
        assert!(price_change(&[daily("2024-01-01", 1.0)], 30).is_none());

        let yearly: Vec<CanonicalPoint> = [2020, 2021]
            .iter()
            .map(|&y| CanonicalPoint {
                key: TimeKey::Year(y),
                label: y.to_string(),
                value: 1.0,
                volume: 0.0,
                ohlc: Ohlc::default(),
                high: None,
                low: None,
            })
            .collect();
        assert!(price_change(&yearly, 30).is_none());

        let zero = vec![daily("2024-01-01", 0.0), daily("2024-02-01", 5.0)];
        assert!(price_change(&zero, 30).is_none());
    }
}
