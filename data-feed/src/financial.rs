use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Reporting quarter; also part of the backend route (`lapkeuQ1`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    #[default]
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuarterError;

impl fmt::Display for ParseQuarterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown quarter (expected Q1..Q4)")
    }
}

impl std::error::Error for ParseQuarterError {}

impl FromStr for Quarter {
    type Err = ParseQuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" | "1" => Ok(Quarter::Q1),
            "Q2" | "2" => Ok(Quarter::Q2),
            "Q3" | "3" => Ok(Quarter::Q3),
            "Q4" | "4" => Ok(Quarter::Q4),
            _ => Err(ParseQuarterError),
        }
    }
}

/// Metrics shown in the financial tab, in display order.
pub const STATEMENT_METRICS: [(&str, &str); 10] = [
    ("revenue", "Revenue"),
    ("gross_profit", "Gross Profit"),
    ("operating_profit", "Operating Profit"),
    ("net_profit", "Net Profit"),
    ("total_assets", "Total Assets"),
    ("liabilities", "Liabilities"),
    ("total_equity", "Total Equity"),
    ("cash", "Cash"),
    ("cash_dari_operasi", "Operating Cash Flow"),
    ("cash_dari_investasi", "Investing Cash Flow"),
];

/// One quarterly statement row. Metric columns are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub emiten: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub report_date: Option<String>,
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
}

impl FinancialStatement {
    /// Numeric metric; numeric strings (including `"1.2E12"`) are accepted.
    pub fn metric(&self, name: &str) -> Option<f64> {
        match self.metrics.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metrics_accept_numbers_and_numeric_strings() {
        let row: FinancialStatement = serde_json::from_value(json!({
            "emiten": "BBCA",
            "entity_name": "Bank Central Asia Tbk",
            "revenue": "1.25E12",
            "net_profit": 5_000_000,
            "cash": "n/a"
        }))
        .unwrap();
        assert_eq!(row.emiten, "BBCA");
        assert_eq!(row.report_date, None);
        assert_eq!(row.metric("revenue"), Some(1.25e12));
        assert_eq!(row.metric("net_profit"), Some(5_000_000.0));
        assert_eq!(row.metric("cash"), None);
        assert_eq!(row.metric("liabilities"), None);
    }

    #[test]
    fn quarter_labels() {
        assert_eq!("q3".parse::<Quarter>(), Ok(Quarter::Q3));
        assert_eq!(Quarter::Q4.to_string(), "Q4");
        assert!("Q5".parse::<Quarter>().is_err());
    }
}
