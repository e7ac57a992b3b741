use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use market_client::{ClientConfig, Endpoints, FetchError, HttpTransport, Transport};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use ts_core::fields::TICKER_FIELD;
use ts_core::{Granularity, RawPeriodRecord};

use crate::strategy::{first_success, non_empty_records, object_array, Strategy};
use crate::{
    csv, sample_daily_records, AcquisitionResult, FinancialStatement, NewsItem, Quarter, Source,
    TOP_TICKERS,
};

const SAMPLE_ADVISORY: &str = "Backend data unavailable, using sample data";
const NEWS_FETCH_ERROR: &str =
    "Failed to fetch news. Please check your connection or try again later.";

/// A resource the dashboard can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireRequest {
    StockSeries {
        ticker: String,
        period: Granularity,
        column: String,
    },
    Tickers {
        csv_symbols: Vec<String>,
    },
    Financials {
        ticker: String,
        quarter: Quarter,
    },
    News,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Acquired {
    Series(Vec<RawPeriodRecord>),
    Tickers(Vec<String>),
    Financials(Vec<FinancialStatement>),
    News(Vec<NewsItem>),
}

/// Fetches dashboard resources from the backend, falling back across
/// alternative routes and finally to static data.
#[derive(Clone)]
pub struct Acquirer {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    config: ClientConfig,
}

impl Acquirer {
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Result<Self, FetchError> {
        let endpoints = Endpoints::new(&config.base_url)?;
        Ok(Self {
            transport,
            endpoints,
            config,
        })
    }

    /// Acquirer over HTTP using `config` for the client too.
    pub fn http(config: ClientConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(&config)?;
        Self::new(Arc::new(transport), config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn acquire(&self, request: AcquireRequest) -> AcquisitionResult<Acquired> {
        match request {
            AcquireRequest::StockSeries {
                ticker,
                period,
                column,
            } => self
                .stock_series(&ticker, period, &column)
                .await
                .map(Acquired::Series),
            AcquireRequest::Tickers { csv_symbols } => self
                .ticker_list(&csv_symbols)
                .await
                .map(Acquired::Tickers),
            AcquireRequest::Financials { ticker, quarter } => self
                .financial_statements(&ticker, quarter)
                .await
                .map(Acquired::Financials),
            AcquireRequest::News => self.news().await.map(Acquired::News),
        }
    }

    /// Records for one ticker and period.
    ///
    /// Tries the all-columns route, the query route, then the two
    /// single-column routes. When all fail, daily requests get the sample
    /// series (degraded); other periods fail with an empty list.
    pub async fn stock_series(
        &self,
        ticker: &str,
        period: Granularity,
        column: &str,
    ) -> AcquisitionResult<Vec<RawPeriodRecord>> {
        let p = period.as_str();
        let e = &self.endpoints;
        let strategies = vec![
            Strategy::new("period-ticker", e.period_ticker(p, ticker), non_empty_records),
            Strategy::new("stock-data-query", e.stock_data(ticker, p), non_empty_records),
            Strategy::new(
                "period-ticker-column",
                e.period_ticker_column(p, ticker, column),
                non_empty_records,
            ),
            Strategy::new(
                "aggregation-ticker-column",
                e.aggregation_ticker_column(p, ticker, column),
                non_empty_records,
            ),
        ];

        match first_success(self.transport.as_ref(), strategies).await {
            Ok(won) => {
                let source = Source::from_index(won.index);
                info!(ticker, period = p, %source, records = won.data.len(), "stock series acquired");
                AcquisitionResult::ok(won.data, source)
            }
            Err(_) if period == Granularity::Daily => {
                warn!(ticker, "all stock series routes failed, using sample data");
                AcquisitionResult::degraded(
                    sample_daily_records(ticker),
                    Source::Synthetic,
                    SAMPLE_ADVISORY,
                )
            }
            Err(_) => {
                warn!(ticker, period = p, "all stock series routes failed");
                AcquisitionResult::failed(
                    Vec::new(),
                    format!(
                        "Failed to fetch {p} data for {ticker}. Please try a different ticker \
                         or period, or check your connection."
                    ),
                )
            }
        }
    }

    /// Sorted, de-duplicated union of backend tickers, curated tickers and
    /// `csv_symbols`. Falls back to the static lists when the backend fails.
    pub async fn ticker_list(&self, csv_symbols: &[String]) -> AcquisitionResult<Vec<String>> {
        let strategies = vec![
            Strategy::new("tickers", self.endpoints.tickers(), ticker_strings),
            Strategy::new(
                "daily-aggregation-tickers",
                self.endpoints.daily_aggregation_ticker(),
                tickers_from_records,
            ),
        ];
        match first_success(self.transport.as_ref(), strategies).await {
            Ok(won) => {
                let source = Source::from_index(won.index);
                let list = union_tickers(&won.data, csv_symbols);
                info!(%source, tickers = list.len(), "ticker list acquired");
                AcquisitionResult::ok(list, source)
            }
            Err(_) => {
                warn!("ticker routes failed, using curated and csv tickers");
                AcquisitionResult::degraded(
                    union_tickers(&[], csv_symbols),
                    Source::Synthetic,
                    "Ticker service unavailable, showing curated tickers",
                )
            }
        }
    }

    /// Symbols from the configured csv listing; empty when unset or unreachable.
    pub async fn load_csv_symbols(&self) -> Vec<String> {
        match &self.config.symbols_csv_url {
            Some(url) => self.csv_symbols(url).await,
            None => Vec::new(),
        }
    }

    pub async fn csv_symbols(&self, url: &str) -> Vec<String> {
        match self.transport.get_text(url).await {
            Ok(text) => {
                let symbols = csv::parse_symbols(&text);
                debug!(url, symbols = symbols.len(), "csv symbols loaded");
                symbols
            }
            Err(error) => {
                warn!(url, %error, "csv symbol listing unavailable");
                Vec::new()
            }
        }
    }

    /// Statements of `ticker` for `quarter` of the configured year.
    pub async fn financial_statements(
        &self,
        ticker: &str,
        quarter: Quarter,
    ) -> AcquisitionResult<Vec<FinancialStatement>> {
        let url = self
            .endpoints
            .financial_statements(quarter.as_str(), self.config.financial_year);
        let strategies = vec![Strategy::new("financial-statements", url, statements)];
        match first_success(self.transport.as_ref(), strategies).await {
            Ok(won) => {
                let rows: Vec<FinancialStatement> = won
                    .data
                    .into_iter()
                    .filter(|row| row.emiten == ticker)
                    .collect();
                info!(ticker, %quarter, rows = rows.len(), "financial statements acquired");
                AcquisitionResult::ok(rows, Source::Primary)
            }
            Err(exhausted) => {
                let year = self.config.financial_year;
                let message = match exhausted.last_error() {
                    Some(FetchError::ShapeMismatch(_)) => format!(
                        "Invalid financial statements format received for {ticker} \
                         ({quarter} {year}). Please check the ticker and quarter, or try again later."
                    ),
                    _ => format!(
                        "Failed to fetch financial statements for {ticker} ({quarter} {year}). \
                         Please check the ticker and quarter, or check your connection."
                    ),
                };
                AcquisitionResult::failed(Vec::new(), message)
            }
        }
    }

    /// Emitens with a statement in any quarter of `year`. Quarters are
    /// fetched concurrently; a failed quarter contributes nothing.
    pub async fn tickers_with_financials(&self, year: i32) -> BTreeSet<String> {
        let fetches = Quarter::ALL.iter().map(|quarter| {
            let url = self.endpoints.financial_statements(quarter.as_str(), year);
            async move {
                let rows = self
                    .transport
                    .get_json(&url)
                    .await
                    .and_then(object_array);
                (url, rows)
            }
        });
        let mut out = BTreeSet::new();
        for (url, rows) in join_all(fetches).await {
            match rows {
                Ok(rows) => out.extend(
                    rows.iter()
                        .filter_map(|r| r.get("emiten").and_then(Value::as_str))
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                ),
                Err(error) => warn!(url = %url, %error, "quarter unavailable"),
            }
        }
        out
    }

    pub async fn news(&self) -> AcquisitionResult<Vec<NewsItem>> {
        let strategies = vec![Strategy::new("news", self.endpoints.news(), news_items)];
        match first_success(self.transport.as_ref(), strategies).await {
            Ok(won) => {
                info!(items = won.data.len(), "news acquired");
                AcquisitionResult::ok(won.data, Source::Primary)
            }
            Err(_) => AcquisitionResult::failed(Vec::new(), NEWS_FETCH_ERROR),
        }
    }

    /// True when the backend reports itself healthy.
    pub async fn health(&self) -> bool {
        match self.transport.get_json(&self.endpoints.health()).await {
            Ok(json) => json.get("status").and_then(Value::as_str) == Some("healthy"),
            Err(error) => {
                debug!(%error, "health check failed");
                false
            }
        }
    }
}

fn ticker_strings(json: Value) -> Result<Vec<String>, FetchError> {
    let Value::Array(items) = json else {
        return Err(FetchError::ShapeMismatch("expected an array of tickers".to_string()));
    };
    let tickers: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if tickers.is_empty() {
        return Err(FetchError::EmptyResult("ticker list".to_string()));
    }
    Ok(tickers)
}

fn tickers_from_records(json: Value) -> Result<Vec<String>, FetchError> {
    let tickers: Vec<String> = non_empty_records(json)?
        .iter()
        .filter_map(|r| r.get(TICKER_FIELD).and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    if tickers.is_empty() {
        return Err(FetchError::EmptyResult("ticker field".to_string()));
    }
    Ok(tickers)
}

fn statements(json: Value) -> Result<Vec<FinancialStatement>, FetchError> {
    let rows = non_empty_records(json)?;
    let total = rows.len();
    let parsed: Vec<FinancialStatement> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(Value::Object(row)).ok())
        .collect();
    if parsed.len() < total {
        debug!(skipped = total - parsed.len(), "statement rows without emiten skipped");
    }
    Ok(parsed)
}

fn news_items(json: Value) -> Result<Vec<NewsItem>, FetchError> {
    let rows = non_empty_records(json)?;
    let total = rows.len();
    let items: Vec<NewsItem> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(Value::Object(row)).ok())
        .collect();
    if items.len() < total {
        debug!(skipped = total - items.len(), "malformed news items skipped");
    }
    Ok(items)
}

fn union_tickers(backend: &[String], csv_symbols: &[String]) -> Vec<String> {
    TOP_TICKERS
        .iter()
        .map(|t| t.code)
        .chain(backend.iter().map(String::as_str))
        .chain(csv_symbols.iter().map(String::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
