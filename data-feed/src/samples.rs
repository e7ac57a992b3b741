//! Static data: curated tickers and the daily sample used when no backend
//! route answers.

use serde_json::{json, Value};
use ts_core::fields::TICKER_FIELD;
use ts_core::RawPeriodRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerInfo {
    pub code: &'static str,
    pub name: &'static str,
}

pub const TOP_TICKERS: [TickerInfo; 10] = [
    TickerInfo { code: "BBCA", name: "Bank Central Asia" },
    TickerInfo { code: "BBRI", name: "Bank Rakyat Indonesia" },
    TickerInfo { code: "BMRI", name: "Bank Mandiri" },
    TickerInfo { code: "TLKM", name: "Telkom Indonesia" },
    TickerInfo { code: "ASII", name: "Astra International" },
    TickerInfo { code: "UNVR", name: "Unilever Indonesia" },
    TickerInfo { code: "ICBP", name: "Indofood CBP" },
    TickerInfo { code: "INDF", name: "Indofood Sukses Makmur" },
    TickerInfo { code: "HMSP", name: "H.M. Sampoerna" },
    TickerInfo { code: "KLBF", name: "Kalbe Farma" },
];

/// Display name of a curated ticker, or the code itself.
pub fn ticker_name(code: &str) -> &str {
    TOP_TICKERS
        .iter()
        .find(|t| t.code == code)
        .map(|t| t.name)
        .unwrap_or(code)
}

// (date, open, high, low, close, volume)
const SAMPLE_DAILY: [(&str, f64, f64, f64, f64, f64); 5] = [
    ("2024-05-01", 9500.0, 9600.0, 9450.0, 9550.0, 9_500_000.0),
    ("2024-05-02", 9550.0, 9650.0, 9500.0, 9600.0, 9_600_000.0),
    ("2024-05-03", 9600.0, 9700.0, 9550.0, 9650.0, 9_700_000.0),
    ("2024-05-04", 9650.0, 9750.0, 9600.0, 9700.0, 9_700_000.0),
    ("2024-05-05", 9700.0, 9800.0, 9650.0, 9750.0, 9_800_000.0),
];

/// The five fixed daily records, labelled with `ticker`.
pub fn sample_daily_records(ticker: &str) -> Vec<RawPeriodRecord> {
    SAMPLE_DAILY
        .iter()
        .filter_map(|&(date, open, high, low, close, volume)| {
            match json!({
                "Date": date,
                TICKER_FIELD: ticker,
                "avg_open": open,
                "avg_high": high,
                "avg_low": low,
                "avg_close": close,
                "avg_volume": volume,
            }) {
                Value::Object(map) => Some(map),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_relabelled() {
        let records = sample_daily_records("TLKM");
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r["ticker"] == "TLKM"));
        assert_eq!(records[0]["Date"], "2024-05-01");
        assert_eq!(records[4]["avg_close"], 9750.0);
    }

    #[test]
    fn names_fall_back_to_code() {
        assert_eq!(ticker_name("BBCA"), "Bank Central Asia");
        assert_eq!(ticker_name("GOTO"), "GOTO");
    }
}
