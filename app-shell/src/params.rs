use chart_traces::{ChartKind, Theme};
use data_feed::Quarter;
use serde::{Deserialize, Serialize};
use ta_engine::IndicatorKind;
use ts_core::fields::OPEN_FIELD;
use ts_core::{Granularity, Window};

/// Everything the user has chosen. Small enough to clone per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardParams {
    pub ticker: Option<String>,
    pub period: Granularity,
    pub column: String,
    pub window: Window,
    pub chart_kind: ChartKind,
    pub indicators: Vec<IndicatorKind>,
    pub quarter: Quarter,
    pub news_seed: u64,
    pub search: String,
    pub theme: Theme,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            ticker: None,
            period: Granularity::Daily,
            column: OPEN_FIELD.to_string(),
            window: Window::All,
            chart_kind: ChartKind::Line,
            indicators: Vec::new(),
            quarter: Quarter::Q1,
            news_seed: 0,
            search: String::new(),
            theme: Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SelectTicker(String),
    SetPeriod(Granularity),
    SetColumn(String),
    SetWindow(Window),
    SetChartKind(ChartKind),
    ToggleIndicator(IndicatorKind),
    SetQuarter(Quarter),
    RefreshNews { seed: u64 },
    Search(String),
    SetTheme(Theme),
}

/// Independent request channel with its own token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Series,
    Financials,
    News,
    Tickers,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::Series, Lane::Financials, Lane::News, Lane::Tickers];

    pub(crate) fn index(self) -> usize {
        match self {
            Lane::Series => 0,
            Lane::Financials => 1,
            Lane::News => 2,
            Lane::Tickers => 3,
        }
    }
}

/// Fetch work requested by a parameter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIntent {
    Series {
        ticker: String,
        period: Granularity,
        column: String,
    },
    Financials {
        ticker: String,
        quarter: Quarter,
    },
}

impl FetchIntent {
    pub fn lane(&self) -> Lane {
        match self {
            FetchIntent::Series { .. } => Lane::Series,
            FetchIntent::Financials { .. } => Lane::Financials,
        }
    }
}

/// Apply `event` to `params`.
///
/// Setting a value to what it already is changes nothing and fetches
/// nothing. Ticker, period and column changes need a new series; ticker and
/// quarter changes need new statements. Nothing is fetched while no ticker
/// is selected.
pub fn reduce(params: &DashboardParams, event: DashboardEvent) -> (DashboardParams, Vec<FetchIntent>) {
    let mut next = params.clone();
    let mut series = false;
    let mut financials = false;

    match event {
        DashboardEvent::SelectTicker(ticker) => {
            let ticker = ticker.trim().to_string();
            if !ticker.is_empty() && next.ticker.as_deref() != Some(ticker.as_str()) {
                next.ticker = Some(ticker);
                series = true;
                financials = true;
            }
        }
        DashboardEvent::SetPeriod(period) => {
            series = next.period != period;
            next.period = period;
        }
        DashboardEvent::SetColumn(column) => {
            series = next.column != column;
            next.column = column;
        }
        DashboardEvent::SetQuarter(quarter) => {
            financials = next.quarter != quarter;
            next.quarter = quarter;
        }
        DashboardEvent::SetWindow(window) => next.window = window,
        DashboardEvent::SetChartKind(kind) => next.chart_kind = kind,
        DashboardEvent::ToggleIndicator(kind) => {
            if let Some(pos) = next.indicators.iter().position(|k| *k == kind) {
                next.indicators.remove(pos);
            } else {
                next.indicators.push(kind);
            }
        }
        DashboardEvent::RefreshNews { seed } => next.news_seed = seed,
        DashboardEvent::Search(query) => next.search = query,
        DashboardEvent::SetTheme(theme) => next.theme = theme,
    }

    let mut intents = Vec::new();
    if let Some(ticker) = next.ticker.clone() {
        if series {
            intents.push(FetchIntent::Series {
                ticker: ticker.clone(),
                period: next.period,
                column: next.column.clone(),
            });
        }
        if financials {
            intents.push(FetchIntent::Financials {
                ticker,
                quarter: next.quarter,
            });
        }
    }
    (next, intents)
}
