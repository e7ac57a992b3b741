use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod fields;
mod normalize;
pub mod shuffle;
pub mod summary;
mod window;

pub use normalize::{fill_placeholder_volume, normalize, parse_date, PLACEHOLDER_VOLUME_RANGE};
pub use shuffle::shuffle;
pub use window::{filter_by_window, filter_by_window_at, ParseWindowError, Window};

/// One backend record as returned by the API: field name to JSON value.
pub type RawPeriodRecord = serde_json::Map<String, serde_json::Value>;

/// Milliseconds since Unix epoch.
pub type Timestamp = i64;

/// Number of milliseconds in common units.
pub const MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Period resolution of a fetched batch. Also the path segment the backend expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGranularityError;

impl fmt::Display for ParseGranularityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown granularity (expected daily, monthly or yearly)")
    }
}

impl std::error::Error for ParseGranularityError {}

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "1d" => Ok(Granularity::Daily),
            "monthly" | "month" | "1mo" => Ok(Granularity::Monthly),
            "yearly" | "year" | "1y" => Ok(Granularity::Yearly),
            _ => Err(ParseGranularityError),
        }
    }
}

/// Ordering key of a canonical point.
///
/// Keys of one batch always share a variant. Missing or unparseable keys are
/// represented as zero (epoch / year 0) so they still sort deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeKey {
    Date(Timestamp),
    YearMonth(i32, u32),
    Year(i32),
}

impl TimeKey {
    pub fn granularity(&self) -> Granularity {
        match self {
            TimeKey::Date(_) => Granularity::Daily,
            TimeKey::YearMonth(..) => Granularity::Monthly,
            TimeKey::Year(_) => Granularity::Yearly,
        }
    }

    /// Timestamp for daily keys, `None` for coarser ones.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            TimeKey::Date(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Open/high/low/close projected from a record; absent fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A normalized `(key, value, volume)` sample, uniform across granularities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoint {
    pub key: TimeKey,
    /// X-axis label: raw date string, `YYYY-MM`, or `YYYY`.
    pub label: String,
    /// Value of the requested column.
    pub value: f64,
    pub volume: f64,
    pub ohlc: Ohlc,
    /// High and low as reported; `None` when the record lacks the field.
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

impl CanonicalPoint {
    pub fn granularity(&self) -> Granularity {
        self.key.granularity()
    }
}

/// Granularity of a normalized series, taken from its first key.
pub fn series_granularity(points: &[CanonicalPoint]) -> Option<Granularity> {
    points.first().map(CanonicalPoint::granularity)
}

pub fn values(points: &[CanonicalPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

pub fn close_values(points: &[CanonicalPoint]) -> Vec<f64> {
    points.iter().map(|p| p.ohlc.close).collect()
}

pub fn volumes(points: &[CanonicalPoint]) -> Vec<f64> {
    points.iter().map(|p| p.volume).collect()
}

pub fn labels(points: &[CanonicalPoint]) -> Vec<String> {
    points.iter().map(|p| p.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_path_segments() {
        assert_eq!("daily".parse::<Granularity>(), Ok(Granularity::Daily));
        assert_eq!(" Monthly ".parse::<Granularity>(), Ok(Granularity::Monthly));
        assert_eq!("yearly".parse::<Granularity>(), Ok(Granularity::Yearly));
        assert!("hourly".parse::<Granularity>().is_err());
        assert_eq!(Granularity::Monthly.to_string(), "monthly");
    }

    #[test]
    fn time_keys_order_within_variant() {
        assert!(TimeKey::YearMonth(2023, 12) < TimeKey::YearMonth(2024, 1));
        assert!(TimeKey::YearMonth(2024, 1) < TimeKey::YearMonth(2024, 2));
        assert!(TimeKey::Year(0) < TimeKey::Year(1999));
        assert!(TimeKey::Date(0) < TimeKey::Date(DAY_MS));
        assert_eq!(TimeKey::Year(2020).granularity(), Granularity::Yearly);
        assert_eq!(TimeKey::Date(5).timestamp(), Some(5));
        assert_eq!(TimeKey::Year(5).timestamp(), None);
    }
}
