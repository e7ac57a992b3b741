use std::collections::BTreeSet;

use data_feed::{AcquisitionResult, FinancialStatement, NewsItem, Quarter};
use serde::Serialize;
use tracing::debug;
use ts_core::{CanonicalPoint, Granularity};

use crate::params::{reduce, DashboardEvent, DashboardParams, FetchIntent, Lane};
use crate::tokens::{RequestToken, RequestTracker};

/// Series loaded for one (ticker, period, column) selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSnapshot {
    pub ticker: String,
    pub period: Granularity,
    pub column: String,
    pub result: AcquisitionResult<Vec<CanonicalPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialsSnapshot {
    pub ticker: String,
    pub quarter: Quarter,
    pub result: AcquisitionResult<Vec<FinancialStatement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub params: DashboardParams,
    pub tickers: Option<AcquisitionResult<Vec<String>>>,
    pub series: Option<SeriesSnapshot>,
    pub financials: Option<FinancialsSnapshot>,
    pub news: Option<AcquisitionResult<Vec<NewsItem>>>,
    pub tickers_with_financials: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer request of the same lane was issued meanwhile.
    Discarded,
}

/// Owns the dashboard state and the request tokens guarding it.
#[derive(Debug, Default)]
pub struct DashboardStore {
    state: DashboardState,
    tracker: RequestTracker,
}

impl DashboardStore {
    pub fn new(params: DashboardParams) -> Self {
        Self {
            state: DashboardState {
                params,
                ..DashboardState::default()
            },
            tracker: RequestTracker::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn params(&self) -> &DashboardParams {
        &self.state.params
    }

    /// Apply a user event and issue a token for each fetch it needs.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Vec<(RequestToken, FetchIntent)> {
        let (next, intents) = reduce(&self.state.params, event);
        self.state.params = next;
        intents
            .into_iter()
            .map(|intent| (self.tracker.issue(intent.lane()), intent))
            .collect()
    }

    pub fn issue(&mut self, lane: Lane) -> RequestToken {
        self.tracker.issue(lane)
    }

    pub fn set_tickers_with_financials(&mut self, tickers: BTreeSet<String>) {
        self.state.tickers_with_financials = tickers;
    }

    /// Run `f` on the state if `token` is still the newest of its lane.
    pub fn commit<F: FnOnce(&mut DashboardState)>(&mut self, token: RequestToken, f: F) -> Commit {
        if !self.tracker.is_latest(token) {
            debug!(lane = ?token.lane, seq = token.seq, "stale result discarded");
            return Commit::Discarded;
        }
        f(&mut self.state);
        Commit::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_feed::Source;

    fn series(ticker: &str) -> SeriesSnapshot {
        SeriesSnapshot {
            ticker: ticker.into(),
            period: Granularity::Daily,
            column: "avg_open".into(),
            result: AcquisitionResult::ok(Vec::new(), Source::Primary),
        }
    }

    #[test]
    fn dispatch_updates_params_and_issues_tokens() {
        let mut store = DashboardStore::default();
        let issued = store.dispatch(DashboardEvent::SelectTicker("BBCA".into()));
        assert_eq!(store.params().ticker.as_deref(), Some("BBCA"));
        let lanes: Vec<Lane> = issued.iter().map(|(t, _)| t.lane).collect();
        assert_eq!(lanes, vec![Lane::Series, Lane::Financials]);
    }

    #[test]
    fn out_of_order_results_keep_the_newest() {
        let mut store = DashboardStore::default();
        let (first, _) = store.dispatch(DashboardEvent::SelectTicker("AAAA".into()))[0].clone();
        let (second, _) = store.dispatch(DashboardEvent::SelectTicker("BBBB".into()))[0].clone();

        assert_eq!(store.commit(second, |s| s.series = Some(series("BBBB"))), Commit::Applied);
        assert_eq!(
            store.commit(first, |s| s.series = Some(series("AAAA"))),
            Commit::Discarded
        );
        assert_eq!(store.state().series.as_ref().map(|s| s.ticker.as_str()), Some("BBBB"));
    }

    #[test]
    fn other_lanes_do_not_invalidate_series() {
        let mut store = DashboardStore::default();
        let (token, _) = store.dispatch(DashboardEvent::SelectTicker("AAAA".into()))[0].clone();
        store.issue(Lane::News);
        store.dispatch(DashboardEvent::SetQuarter(Quarter::Q2));
        assert_eq!(store.commit(token, |s| s.series = Some(series("AAAA"))), Commit::Applied);
    }
}
