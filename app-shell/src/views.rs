//! Pure projections of loaded data for display.

use std::collections::BTreeSet;

use data_feed::NewsItem;
use ts_core::fields::{CLOSE_FIELD, OPEN_FIELD};
use ts_core::shuffle;

pub const TICKER_NEWS_LIMIT: usize = 10;
pub const GENERAL_NEWS_LIMIT: usize = 4;

/// Legend label for a value column.
pub fn column_label(column: &str) -> String {
    match column {
        OPEN_FIELD => "Open Price".to_string(),
        CLOSE_FIELD => "Close Price".to_string(),
        other => other.to_string(),
    }
}

/// Tickers containing `query`, ignoring case. A blank query matches all.
pub fn filter_tickers<'a>(tickers: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    tickers
        .iter()
        .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

/// News mentioning `ticker`, or the first few articles when none is selected.
pub fn news_for_ticker<'a>(news: &'a [NewsItem], ticker: Option<&str>) -> Vec<&'a NewsItem> {
    match ticker {
        None => news.iter().take(TICKER_NEWS_LIMIT).collect(),
        Some(ticker) => news.iter().filter(|n| n.mentions(ticker)).collect(),
    }
}

/// A seeded pick of general headlines; the same seed gives the same pick.
pub fn general_news(news: &[NewsItem], seed: u64) -> Vec<NewsItem> {
    let mut picked = shuffle(news, seed);
    picked.truncate(GENERAL_NEWS_LIMIT);
    picked
}

pub fn tickers_with_news(news: &[NewsItem]) -> BTreeSet<String> {
    news.iter().flat_map(|n| n.tickers.iter().cloned()).collect()
}
