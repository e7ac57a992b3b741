use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_FINANCIAL_YEAR: i32 = 2024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "equity-dashboard-client/0.1";

pub const API_URL_ENV: &str = "DASHBOARD_API_URL";
pub const SYMBOLS_CSV_URL_ENV: &str = "DASHBOARD_SYMBOLS_CSV_URL";
pub const FINANCIAL_YEAR_ENV: &str = "DASHBOARD_FINANCIAL_YEAR";
pub const TIMEOUT_SECS_ENV: &str = "DASHBOARD_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub symbols_csv_url: Option<String>,
    pub financial_year: i32,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_TIMEOUT,
            symbols_csv_url: None,
            financial_year: DEFAULT_FINANCIAL_YEAR,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_symbols_csv_url(mut self, url: impl Into<String>) -> Self {
        self.symbols_csv_url = Some(url.into());
        self
    }

    pub fn with_financial_year(mut self, year: i32) -> Self {
        self.financial_year = year;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Read the `DASHBOARD_*` variables, rejecting malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::new(DEFAULT_BASE_URL);
        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty(API_URL_ENV));
            }
            cfg.base_url = url.to_string();
        }
        if let Some(url) = lookup(SYMBOLS_CSV_URL_ENV).filter(|u| !u.trim().is_empty()) {
            cfg.symbols_csv_url = Some(url.trim().to_string());
        }
        if let Some(raw) = lookup(FINANCIAL_YEAR_ENV) {
            cfg.financial_year =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        var: FINANCIAL_YEAR_ENV,
                        expected: "a year",
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = lookup(TIMEOUT_SECS_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: TIMEOUT_SECS_ENV,
                    expected: "a positive number of seconds",
                    value: raw.clone(),
                })?;
            cfg.request_timeout = Duration::from_secs(secs);
        }
        Ok(cfg)
    }
}

impl Default for ClientConfig {
    /// Environment-derived config; malformed values fall back to defaults.
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::new(DEFAULT_BASE_URL))
    }
}
