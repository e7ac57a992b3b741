use tracing::warn;

const SYMBOL_COLUMN: &str = "symbol";

/// Symbols from a comma-separated listing whose header has a `symbol` column.
///
/// Returns an empty list when the header or the column is missing. Rows that
/// fail to parse or lack the column are skipped.
pub fn parse_symbols(text: &str) -> Vec<String> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let column = match reader.headers() {
        Ok(headers) if headers.is_empty() => {
            warn!("symbol csv is empty");
            return Vec::new();
        }
        Ok(headers) => {
            match headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(SYMBOL_COLUMN))
            {
                Some(column) => column,
                None => {
                    warn!(header = ?headers, "symbol column not found in csv");
                    return Vec::new();
                }
            }
        }
        Err(error) => {
            warn!(%error, "symbol csv header unreadable");
            return Vec::new();
        }
    };

    reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| record.get(column).map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect()
}
