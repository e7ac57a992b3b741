use serde::Serialize;
use std::fmt;

mod acquirer;
pub mod csv;
mod financial;
mod news;
pub mod samples;
pub mod strategy;

pub use acquirer::{AcquireRequest, Acquired, Acquirer};
pub use financial::{FinancialStatement, ParseQuarterError, Quarter, STATEMENT_METRICS};
pub use news::{NewsItem, Sentiment};
pub use samples::{sample_daily_records, ticker_name, TickerInfo, TOP_TICKERS};
pub use strategy::{first_success, Exhausted, Strategy, StrategyFailure, Success};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionStatus {
    Ok,
    /// Usable data, but not from the backend or not complete.
    Degraded,
    Failed,
}

/// Where the data of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    /// Strategy at this position (1-based among fallbacks).
    Fallback(usize),
    Synthetic,
}

impl Source {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Source::Primary
        } else {
            Source::Fallback(index)
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Primary => f.write_str("primary"),
            Source::Fallback(n) => write!(f, "fallback-{n}"),
            Source::Synthetic => f.write_str("synthetic"),
        }
    }
}

impl Serialize for Source {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one acquisition. `source` is `None` only when `status` is
/// `Failed`; `message` is the advisory or error text for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionResult<T> {
    pub status: AcquisitionStatus,
    pub data: T,
    pub source: Option<Source>,
    pub message: Option<String>,
}

impl<T> AcquisitionResult<T> {
    pub fn ok(data: T, source: Source) -> Self {
        Self {
            status: AcquisitionStatus::Ok,
            data,
            source: Some(source),
            message: None,
        }
    }

    pub fn degraded(data: T, source: Source, message: impl Into<String>) -> Self {
        Self {
            status: AcquisitionStatus::Degraded,
            data,
            source: Some(source),
            message: Some(message.into()),
        }
    }

    pub fn failed(data: T, message: impl Into<String>) -> Self {
        Self {
            status: AcquisitionStatus::Failed,
            data,
            source: None,
            message: Some(message.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == AcquisitionStatus::Failed
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AcquisitionResult<U> {
        AcquisitionResult {
            status: self.status,
            data: f(self.data),
            source: self.source,
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tags() {
        assert_eq!(Source::from_index(0).to_string(), "primary");
        assert_eq!(Source::from_index(3).to_string(), "fallback-3");
        assert_eq!(Source::Synthetic.to_string(), "synthetic");
    }

    #[test]
    fn results_serialize_with_tags() {
        let r = AcquisitionResult::degraded(vec![1], Source::Synthetic, "using sample data");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["source"], "synthetic");

        let failed: AcquisitionResult<Vec<u8>> = AcquisitionResult::failed(Vec::new(), "boom");
        assert!(failed.is_failed());
        assert!(failed.source.is_none());
        assert_eq!(serde_json::to_value(&failed).unwrap()["source"], serde_json::Value::Null);
    }
}
