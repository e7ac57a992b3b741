use market_client::{FetchError, Transport};
use serde_json::Value;
use tracing::{debug, warn};
use ts_core::RawPeriodRecord;

/// Checks and converts a payload; an `Err` moves on to the next strategy.
pub type Validator<T> = fn(Value) -> Result<T, FetchError>;

/// One way of obtaining a resource.
pub struct Strategy<T> {
    pub name: &'static str,
    pub url: String,
    pub validate: Validator<T>,
}

impl<T> Strategy<T> {
    pub fn new(name: &'static str, url: impl Into<String>, validate: Validator<T>) -> Self {
        Self {
            name,
            url: url.into(),
            validate,
        }
    }
}

#[derive(Debug)]
pub struct Success<T> {
    /// Position of the winning strategy.
    pub index: usize,
    pub name: &'static str,
    pub data: T,
}

#[derive(Debug)]
pub struct StrategyFailure {
    pub name: &'static str,
    pub url: String,
    pub error: FetchError,
}

/// Every strategy failed, in attempt order.
#[derive(Debug, Default)]
pub struct Exhausted {
    pub failures: Vec<StrategyFailure>,
}

impl Exhausted {
    pub fn last_error(&self) -> Option<&FetchError> {
        self.failures.last().map(|f| &f.error)
    }
}

/// Try `strategies` in order and stop at the first one whose payload
/// validates. No retries.
pub async fn first_success<T>(
    transport: &dyn Transport,
    strategies: Vec<Strategy<T>>,
) -> Result<Success<T>, Exhausted> {
    let mut exhausted = Exhausted::default();
    for (index, strategy) in strategies.into_iter().enumerate() {
        debug!(strategy = strategy.name, url = %strategy.url, "trying strategy");
        let outcome = match transport.get_json(&strategy.url).await {
            Ok(json) => (strategy.validate)(json),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(data) => {
                return Ok(Success {
                    index,
                    name: strategy.name,
                    data,
                })
            }
            Err(error) => {
                warn!(strategy = strategy.name, url = %strategy.url, %error, "strategy failed");
                exhausted.failures.push(StrategyFailure {
                    name: strategy.name,
                    url: strategy.url,
                    error,
                });
            }
        }
    }
    Err(exhausted)
}

/// JSON array of objects, possibly empty.
pub fn object_array(json: Value) -> Result<Vec<RawPeriodRecord>, FetchError> {
    let Value::Array(items) = json else {
        return Err(FetchError::ShapeMismatch("expected a JSON array".to_string()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(FetchError::ShapeMismatch(format!(
                "element {i} is not an object: {other}"
            ))),
        })
        .collect()
}

/// Non-empty JSON array of objects.
pub fn non_empty_records(json: Value) -> Result<Vec<RawPeriodRecord>, FetchError> {
    let records = object_array(json)?;
    if records.is_empty() {
        return Err(FetchError::EmptyResult("record list".to_string()));
    }
    Ok(records)
}
