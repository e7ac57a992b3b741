use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

/// A news article with its sentiment label and related tickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub headline: String,
    pub link: String,
    pub published_at: String,
    pub content: String,
    pub source: String,
    /// Label as delivered; see [`NewsItem::sentiment_kind`].
    pub sentiment: String,
    pub confidence: f64,
    pub reasoning: String,
    pub summary: String,
    pub tickers: Vec<String>,
}

impl NewsItem {
    pub fn sentiment_kind(&self) -> Sentiment {
        match self.sentiment.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Unknown,
        }
    }

    pub fn mentions(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }
}
