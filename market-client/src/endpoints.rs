use reqwest::Url;

use crate::FetchError;

/// URL builders for the backend routes. Path segments are percent-encoded.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// `/api/{period}/{ticker}`: every column for one ticker.
    pub fn period_ticker(&self, period: &str, ticker: &str) -> String {
        self.path(&["api", period, ticker]).into()
    }

    /// `/api/stock-data?ticker=..&period=..`
    pub fn stock_data(&self, ticker: &str, period: &str) -> String {
        let mut url = self.path(&["api", "stock-data"]);
        url.query_pairs_mut()
            .append_pair("ticker", ticker)
            .append_pair("period", period);
        url.into()
    }

    /// `/api/{period}/{ticker}/{column}`: one column plus the period key.
    pub fn period_ticker_column(&self, period: &str, ticker: &str, column: &str) -> String {
        self.path(&["api", period, ticker, column]).into()
    }

    /// `/api/{period}_aggregation_ticker/{ticker}/{column}`
    pub fn aggregation_ticker_column(&self, period: &str, ticker: &str, column: &str) -> String {
        let collection = format!("{period}_aggregation_ticker");
        self.path(&["api", &collection, ticker, column]).into()
    }

    pub fn tickers(&self) -> String {
        self.path(&["api", "tickers"]).into()
    }

    pub fn daily_aggregation_ticker(&self) -> String {
        self.path(&["api", "daily_aggregation_ticker"]).into()
    }

    /// `/api/lapkeu{quarter}/{year}`, e.g. `/api/lapkeuQ1/2024`.
    pub fn financial_statements(&self, quarter: &str, year: i32) -> String {
        let collection = format!("lapkeu{quarter}");
        self.path(&["api", &collection, &year.to_string()]).into()
    }

    pub fn news(&self) -> String {
        self.path(&["api", "iqplusBerita"]).into()
    }

    pub fn health(&self) -> String {
        self.path(&["health"]).into()
    }

    fn path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("http://localhost:5000").unwrap()
    }

    #[test]
    fn stock_series_routes() {
        let e = endpoints();
        assert_eq!(e.period_ticker("daily", "BBCA"), "http://localhost:5000/api/daily/BBCA");
        assert_eq!(
            e.stock_data("BBCA", "monthly"),
            "http://localhost:5000/api/stock-data?ticker=BBCA&period=monthly"
        );
        assert_eq!(
            e.period_ticker_column("yearly", "BBCA", "avg_open"),
            "http://localhost:5000/api/yearly/BBCA/avg_open"
        );
        assert_eq!(
            e.aggregation_ticker_column("daily", "BBCA", "avg_close"),
            "http://localhost:5000/api/daily_aggregation_ticker/BBCA/avg_close"
        );
    }

    #[test]
    fn listing_routes() {
        let e = endpoints();
        assert_eq!(e.tickers(), "http://localhost:5000/api/tickers");
        assert_eq!(
            e.daily_aggregation_ticker(),
            "http://localhost:5000/api/daily_aggregation_ticker"
        );
        assert_eq!(
            e.financial_statements("Q3", 2024),
            "http://localhost:5000/api/lapkeuQ3/2024"
        );
        assert_eq!(e.news(), "http://localhost:5000/api/iqplusBerita");
        assert_eq!(e.health(), "http://localhost:5000/health");
    }

    #[test]
    fn base_path_and_encoding() {
        let e = Endpoints::new("https://host/backend/").unwrap();
        assert_eq!(e.tickers(), "https://host/backend/api/tickers");
        assert_eq!(e.period_ticker("daily", "A B"), "https://host/backend/api/daily/A%20B");
        assert_eq!(
            e.stock_data("A&B", "daily"),
            "https://host/backend/api/stock-data?ticker=A%26B&period=daily"
        );
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(Endpoints::new("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(Endpoints::new("mailto:x@y").is_err());
    }
}
