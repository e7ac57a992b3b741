//! Field names used by the backend and the alias table that reconciles them.

use serde_json::Value;

use crate::RawPeriodRecord;

pub const DATE_FIELD: &str = "Date";
pub const YEAR_FIELD: &str = "Year";
pub const MONTH_FIELD: &str = "Month";
pub const TICKER_FIELD: &str = "ticker";

pub const OPEN_FIELD: &str = "avg_open";
pub const HIGH_FIELD: &str = "avg_high";
pub const LOW_FIELD: &str = "avg_low";
pub const CLOSE_FIELD: &str = "avg_close";
pub const VOLUME_FIELD: &str = "avg_volume";

/// Synonyms consulted, in order, after the exact field name.
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    (CLOSE_FIELD, &["close"]),
    (VOLUME_FIELD, &["volume"]),
];

/// Aliases registered for `field`, excluding the field itself.
pub fn aliases(field: &str) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, synonyms)| *synonyms)
        .unwrap_or(&[])
}

/// First numeric value among `field` and its aliases.
///
/// Only JSON numbers count; strings such as `"Column not available"` do not.
pub fn lookup_number(record: &RawPeriodRecord, field: &str) -> Option<f64> {
    std::iter::once(field)
        .chain(aliases(field).iter().copied())
        .find_map(|name| record.get(name).and_then(Value::as_f64))
}

/// Integer field; accepts whole floats such as `2024.0`.
pub fn lookup_int(record: &RawPeriodRecord, field: &str) -> Option<i64> {
    let value = record.get(field)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

pub fn lookup_str<'a>(record: &'a RawPeriodRecord, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawPeriodRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn exact_field_wins_over_alias() {
        let r = record(json!({"avg_close": 10.0, "close": 11.0}));
        assert_eq!(lookup_number(&r, CLOSE_FIELD), Some(10.0));
    }

    #[test]
    fn alias_used_when_exact_missing_or_not_numeric() {
        let r = record(json!({"close": 11.0}));
        assert_eq!(lookup_number(&r, CLOSE_FIELD), Some(11.0));

        let r = record(json!({"avg_close": "Column not available", "close": 12}));
        assert_eq!(lookup_number(&r, CLOSE_FIELD), Some(12.0));

        let r = record(json!({"volume": 300}));
        assert_eq!(lookup_number(&r, VOLUME_FIELD), Some(300.0));
    }

    #[test]
    fn fields_without_aliases_do_not_borrow_other_columns() {
        let r = record(json!({"close": 11.0, "open": 9.0}));
        assert_eq!(lookup_number(&r, OPEN_FIELD), None);
        assert_eq!(lookup_number(&r, "close"), Some(11.0));
        assert!(aliases("close").is_empty());
    }

    #[test]
    fn integer_lookup_accepts_whole_floats() {
        let r = record(json!({"Year": 2024.0, "Month": 3, "bad": 1.5}));
        assert_eq!(lookup_int(&r, YEAR_FIELD), Some(2024));
        assert_eq!(lookup_int(&r, MONTH_FIELD), Some(3));
        assert_eq!(lookup_int(&r, "bad"), None);
        assert_eq!(lookup_int(&r, "missing"), None);
    }
}
