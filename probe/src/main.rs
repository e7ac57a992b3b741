use std::sync::Arc;

use app_shell::views::{general_news, news_for_ticker};
use app_shell::{Dashboard, DashboardEvent};
use chart_traces::ChartKind;
use clap::Parser;
use data_feed::Acquirer;
use market_client::{ClientConfig, MemoryTransport};
use serde_json::json;
use ta_engine::IndicatorKind;
use tracing::{info, warn};
use ts_core::{Granularity, Window};

/// Load the dashboard once and print params, series status, summary, traces
/// and news as JSON.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version)]
struct ProbeArgs {
    /// Ticker to select; the first listed ticker when omitted
    #[arg(value_name = "TICKER", value_parser = ticker)]
    ticker: Option<String>,

    /// daily, monthly or yearly
    #[arg(long, default_value = "daily")]
    period: Granularity,

    /// Lookback window: all, 1M, 3M, 6M, 1Y, 2Y
    #[arg(long, default_value = "all")]
    window: Window,

    /// line, bar or candlestick
    #[arg(long = "chart", default_value = "line")]
    chart_kind: ChartKind,

    /// Comma-separated indicators, e.g. sma,rsi
    #[arg(long, value_delimiter = ',')]
    indicators: Vec<IndicatorKind>,

    /// Serve every request from an empty in-memory backend
    #[arg(long)]
    offline: bool,
}

fn ticker(raw: &str) -> Result<String, String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err("ticker must not be blank".to_string());
    }
    Ok(ticker)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = ProbeArgs::parse();
    let config = ClientConfig::from_env()?;
    let acquirer = if args.offline {
        Acquirer::new(Arc::new(MemoryTransport::new()), config)?
    } else {
        Acquirer::http(config)?
    };
    if !args.offline && !acquirer.health().await {
        warn!(base = acquirer.endpoints().base(), "backend not healthy, expect fallbacks");
    }

    let dashboard = Dashboard::new(acquirer);
    dashboard.apply(DashboardEvent::SetPeriod(args.period)).await;
    dashboard.apply(DashboardEvent::SetWindow(args.window)).await;
    dashboard.apply(DashboardEvent::SetChartKind(args.chart_kind)).await;
    for kind in &args.indicators {
        dashboard.apply(DashboardEvent::ToggleIndicator(*kind)).await;
    }
    if let Some(ticker) = &args.ticker {
        dashboard.apply(DashboardEvent::SelectTicker(ticker.clone())).await;
    }
    dashboard.load_tickers().await;
    dashboard.refresh_news().await;

    let state = dashboard.state().await;
    let news = state.news.as_ref().map(|r| r.data.as_slice()).unwrap_or_default();
    let ticker_news = news_for_ticker(news, state.params.ticker.as_deref());
    let headlines = general_news(news, state.params.news_seed);
    info!(
        ticker = state.params.ticker.as_deref().unwrap_or("-"),
        news = news.len(),
        "dashboard loaded"
    );

    let report = json!({
        "params": state.params,
        "series": state.series.as_ref().map(|s| json!({
            "status": s.result.status,
            "source": s.result.source,
            "message": s.result.message,
            "points": s.result.data.len(),
        })),
        "summary": dashboard.summary().await,
        "traces": dashboard.plot_traces().await,
        "financials": state.financials.as_ref().map(|f| &f.result),
        "ticker_news": ticker_news,
        "general_news": headlines,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
