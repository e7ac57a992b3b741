use std::ops::Range;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::fields::{
    lookup_int, lookup_number, CLOSE_FIELD, DATE_FIELD, HIGH_FIELD, LOW_FIELD, MONTH_FIELD,
    OPEN_FIELD, VOLUME_FIELD, YEAR_FIELD,
};
use crate::{CanonicalPoint, Granularity, Ohlc, RawPeriodRecord, TimeKey, Timestamp};

/// Range of the stand-in volume drawn when a batch carries no volume at all.
/// Presentation only: keeps the volume pane from rendering flat.
pub const PLACEHOLDER_VOLUME_RANGE: Range<f64> = 500_000.0..1_500_000.0;

/// Turn a batch of backend records into a time-ordered canonical series.
///
/// The output always has the same length as the input: records whose key is
/// missing or unparseable sort as key zero instead of being dropped, so
/// indicator arrays computed from the output stay aligned with the x-axis.
/// Ties keep their input order.
///
/// `value_field` is read through the alias table, falling back to 0.
pub fn normalize(
    records: &[RawPeriodRecord],
    granularity: Granularity,
    value_field: &str,
) -> Vec<CanonicalPoint> {
    let mut missing_value = 0usize;
    let mut missing_key = 0usize;

    let mut points: Vec<CanonicalPoint> = records
        .iter()
        .map(|record| {
            let (key, label, key_found) = extract_key(record, granularity);
            if !key_found {
                missing_key += 1;
            }
            let value = lookup_number(record, value_field).unwrap_or_else(|| {
                missing_value += 1;
                0.0
            });
            CanonicalPoint {
                key,
                label,
                value,
                volume: lookup_number(record, VOLUME_FIELD).unwrap_or(0.0),
                ohlc: project_ohlc(record),
                high: lookup_number(record, HIGH_FIELD),
                low: lookup_number(record, LOW_FIELD),
            }
        })
        .collect();

    // `sort_by_key` is stable.
    points.sort_by_key(|p| p.key);

    if missing_value > 0 {
        debug!(
            field = value_field,
            missing = missing_value,
            total = records.len(),
            "value field absent, projected as 0"
        );
    }
    if missing_key > 0 {
        debug!(
            %granularity,
            missing = missing_key,
            total = records.len(),
            "period key absent or unparseable, sorted as 0"
        );
    }
    points
}

/// Replace every volume with a random placeholder when the whole batch has none.
/// Returns true if placeholders were written.
pub fn fill_placeholder_volume<R: Rng + ?Sized>(points: &mut [CanonicalPoint], rng: &mut R) -> bool {
    if points.is_empty() || points.iter().any(|p| p.volume != 0.0) {
        return false;
    }
    for p in points.iter_mut() {
        p.volume = rng.gen_range(PLACEHOLDER_VOLUME_RANGE);
    }
    debug!(points = points.len(), "no volume in batch, using placeholder volume");
    true
}

/// Parse the date formats the backend has been seen to emit.
pub fn parse_date(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0)?;
        return Some(dt.and_utc().timestamp_millis());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    // Flask's jsonify renders datetimes as RFC 2822 ("Wed, 01 May 2024 00:00:00 GMT").
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    None
}

fn extract_key(record: &RawPeriodRecord, granularity: Granularity) -> (TimeKey, String, bool) {
    match granularity {
        Granularity::Daily => {
            let (ts, label) = match record.get(DATE_FIELD) {
                Some(Value::String(s)) => (parse_date(s), s.clone()),
                Some(Value::Number(n)) => {
                    let ts = n.as_i64();
                    let label = ts
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                        .map(|dt| dt.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    (ts, label)
                }
                _ => (None, String::new()),
            };
            (TimeKey::Date(ts.unwrap_or(0)), label, ts.is_some())
        }
        Granularity::Monthly => {
            let year = lookup_int(record, YEAR_FIELD).and_then(|y| i32::try_from(y).ok());
            let month = lookup_int(record, MONTH_FIELD).and_then(|m| u32::try_from(m).ok());
            let (y, m) = (year.unwrap_or(0), month.unwrap_or(0));
            (
                TimeKey::YearMonth(y, m),
                format!("{y}-{m:02}"),
                year.is_some() && month.is_some(),
            )
        }
        Granularity::Yearly => {
            let year = lookup_int(record, YEAR_FIELD).and_then(|y| i32::try_from(y).ok());
            let y = year.unwrap_or(0);
            (TimeKey::Year(y), y.to_string(), year.is_some())
        }
    }
}

fn project_ohlc(record: &RawPeriodRecord) -> Ohlc {
    Ohlc {
        open: lookup_number(record, OPEN_FIELD).unwrap_or(0.0),
        high: lookup_number(record, HIGH_FIELD).unwrap_or(0.0),
        low: lookup_number(record, LOW_FIELD).unwrap_or(0.0),
        close: lookup_number(record, CLOSE_FIELD).unwrap_or(0.0),
    }
}
