use std::sync::Arc;

use chart_traces::{assemble_plot_traces, PlotRequest, PlotTrace};
use chrono::Utc;
use data_feed::{ticker_name, Acquirer};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use ts_core::summary::{latest_high_low, price_change, PriceChange, PRICE_CHANGE_LOOKBACK_DAYS};
use ts_core::{filter_by_window, normalize, CanonicalPoint};

use crate::params::{DashboardEvent, DashboardParams, FetchIntent, Lane};
use crate::store::{Commit, DashboardState, DashboardStore, FinancialsSnapshot, SeriesSnapshot};
use crate::tokens::RequestToken;
use crate::views::column_label;

/// Header figures for the selected ticker over the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub ticker: String,
    pub name: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub price_change: Option<PriceChange>,
}

enum Fetched {
    Series(SeriesSnapshot),
    Financials(FinancialsSnapshot),
}

/// Drives the store: applies events, runs the fetches they need and commits
/// results that are still current.
///
/// The store lock is never held across a fetch, so events keep being
/// accepted while requests are in flight.
#[derive(Clone)]
pub struct Dashboard {
    acquirer: Acquirer,
    store: Arc<Mutex<DashboardStore>>,
}

impl Dashboard {
    pub fn new(acquirer: Acquirer) -> Self {
        Self::with_params(acquirer, DashboardParams::default())
    }

    pub fn with_params(acquirer: Acquirer, params: DashboardParams) -> Self {
        Self {
            acquirer,
            store: Arc::new(Mutex::new(DashboardStore::new(params))),
        }
    }

    pub fn acquirer(&self) -> &Acquirer {
        &self.acquirer
    }

    pub async fn state(&self) -> DashboardState {
        self.store.lock().await.state().clone()
    }

    /// Apply `event`, fetch what it invalidated, and commit each result.
    /// Returns one entry per fetch, in issue order.
    pub async fn apply(&self, event: DashboardEvent) -> Vec<Commit> {
        let issued = self.store.lock().await.dispatch(event);
        let fetches = issued
            .into_iter()
            .map(|(token, intent)| async move { (token, self.fetch(intent).await) });
        let outcomes = join_all(fetches).await;

        let mut store = self.store.lock().await;
        outcomes
            .into_iter()
            .map(|(token, fetched)| match fetched {
                Fetched::Series(snapshot) => store.commit(token, |s| s.series = Some(snapshot)),
                Fetched::Financials(snapshot) => {
                    store.commit(token, |s| s.financials = Some(snapshot))
                }
            })
            .collect()
    }

    async fn fetch(&self, intent: FetchIntent) -> Fetched {
        match intent {
            FetchIntent::Series {
                ticker,
                period,
                column,
            } => {
                let result = self
                    .acquirer
                    .stock_series(&ticker, period, &column)
                    .await
                    .map(|records| normalize(&records, period, &column));
                Fetched::Series(SeriesSnapshot {
                    ticker,
                    period,
                    column,
                    result,
                })
            }
            FetchIntent::Financials { ticker, quarter } => {
                let result = self.acquirer.financial_statements(&ticker, quarter).await;
                Fetched::Financials(FinancialsSnapshot {
                    ticker,
                    quarter,
                    result,
                })
            }
        }
    }

    async fn issue(&self, lane: Lane) -> RequestToken {
        self.store.lock().await.issue(lane)
    }

    /// Load the ticker list. Selects the first ticker when none is selected
    /// yet, which also loads its series and statements.
    pub async fn load_tickers(&self) -> Commit {
        let token = self.issue(Lane::Tickers).await;
        let csv = self.acquirer.load_csv_symbols().await;
        let result = self.acquirer.ticker_list(&csv).await;
        let first = result.data.first().cloned();

        let (commit, needs_selection) = {
            let mut store = self.store.lock().await;
            let commit = store.commit(token, |s| s.tickers = Some(result));
            (commit, store.params().ticker.is_none())
        };
        if commit == Commit::Applied && needs_selection {
            if let Some(ticker) = first {
                debug!(%ticker, "selecting first ticker");
                self.apply(DashboardEvent::SelectTicker(ticker)).await;
            }
        }
        commit
    }

    pub async fn load_news(&self) -> Commit {
        let token = self.issue(Lane::News).await;
        let result = self.acquirer.news().await;
        self.store
            .lock()
            .await
            .commit(token, |s| s.news = Some(result))
    }

    /// Reshuffle the general headlines with a time-based seed and reload news.
    pub async fn refresh_news(&self) -> Commit {
        let seed = Utc::now().timestamp_millis().unsigned_abs();
        self.apply(DashboardEvent::RefreshNews { seed }).await;
        self.load_news().await
    }

    pub async fn load_tickers_with_financials(&self) {
        let year = self.acquirer.config().financial_year;
        let tickers = self.acquirer.tickers_with_financials(year).await;
        info!(year, tickers = tickers.len(), "tickers with statements loaded");
        self.store.lock().await.set_tickers_with_financials(tickers);
    }

    /// Loaded series restricted to the selected window.
    pub async fn windowed_series(&self) -> Vec<CanonicalPoint> {
        self.store.lock().await.state().windowed_series()
    }

    pub async fn plot_traces(&self) -> Vec<PlotTrace> {
        self.store.lock().await.state().plot_traces()
    }

    pub async fn summary(&self) -> Option<DashboardSummary> {
        self.store.lock().await.state().summary()
    }
}

/// Views derived from one consistent state snapshot.
impl DashboardState {
    pub fn windowed_series(&self) -> Vec<CanonicalPoint> {
        match &self.series {
            Some(series) => filter_by_window(&series.result.data, self.params.window),
            None => Vec::new(),
        }
    }

    pub fn plot_traces(&self) -> Vec<PlotTrace> {
        let request = PlotRequest {
            chart_kind: self.params.chart_kind,
            indicators: self.params.indicators.clone(),
            theme: self.params.theme,
            value_label: column_label(&self.params.column),
        };
        assemble_plot_traces(&self.windowed_series(), &request)
    }

    pub fn summary(&self) -> Option<DashboardSummary> {
        let ticker = self.params.ticker.clone()?;
        let points = self.windowed_series();
        let (high, low) = latest_high_low(&points);
        Some(DashboardSummary {
            name: ticker_name(&ticker).to_string(),
            ticker,
            high,
            low,
            price_change: price_change(&points, PRICE_CHANGE_LOOKBACK_DAYS),
        })
    }
}
