use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{ClientConfig, FetchError};

/// Fetches a URL. Any non-2xx status is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Serves canned bodies by exact URL; unknown URLs answer 404.
///
/// Used for offline runs and tests. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.routes.insert(url.into(), Canned::Body(body.to_string()));
        self
    }

    pub fn with_text(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Canned::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(url.into(), Canned::Status(status));
        self
    }

    /// Simulate a connection failure for `url`.
    pub fn with_unreachable(mut self, url: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Canned::Unreachable);
        self
    }

    /// URLs requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().await.push(url.to_string());
        match self.routes.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(Canned::Unreachable) => Err(FetchError::Network(format!("{url} unreachable"))),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_transport_serves_and_records() {
        let t = MemoryTransport::new()
            .with_json("http://a/json", json!([{"x": 1}]))
            .with_text("http://a/text", "not json")
            .with_status("http://a/500", 500)
            .with_unreachable("http://a/down");

        assert_eq!(t.get_json("http://a/json").await.unwrap(), json!([{"x": 1}]));
        assert!(matches!(
            t.get_json("http://a/text").await,
            Err(FetchError::InvalidJson(_))
        ));
        assert!(matches!(
            t.get_json("http://a/500").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            t.get_text("http://a/down").await,
            Err(FetchError::Network(_))
        ));
        assert!(matches!(
            t.get_text("http://a/missing").await,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(t.requests().await.len(), 5);
        assert_eq!(t.requests().await[0], "http://a/json");
    }

    #[test]
    fn http_transport_builds_from_config() {
        let cfg = ClientConfig::new("http://localhost:5000");
        assert!(HttpTransport::new(&cfg).is_ok());
    }
}
