use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Output of every indicator: one value per input sample, `NaN` where the
/// indicator is not yet defined.
pub type IndicatorSeries = Vec<f64>;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_BBANDS_PERIOD: usize = 20;
pub const DEFAULT_BBANDS_STDDEV: f64 = 2.0;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// SMA periods drawn for the `sma` overlay.
pub const SMA_PERIODS: [usize; 2] = [20, 50];
/// EMA periods drawn for the `ema` overlay.
pub const EMA_PERIODS: [usize; 2] = [12, 26];

/// Supported indicator types.
///
/// Outputs:
/// - Sma/Ema: two lines (overlay)
/// - Rsi: single line (separate pane)
/// - Macd: macd, signal (separate pane)
/// - Bbands: upper/lower (overlay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bbands,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Bbands,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Bbands => "bb",
        }
    }

    pub fn output(&self) -> OutputKind {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Bbands => OutputKind::Overlay,
            IndicatorKind::Rsi | IndicatorKind::Macd => OutputKind::SeparatePane,
        }
    }

    /// Legend names of the lines this indicator draws, in drawing order.
    pub fn line_names(&self) -> &'static [&'static str] {
        match self {
            IndicatorKind::Sma => &["SMA 20", "SMA 50"],
            IndicatorKind::Ema => &["EMA 12", "EMA 26"],
            IndicatorKind::Bbands => &["BB Upper", "BB Lower"],
            IndicatorKind::Rsi => &["RSI"],
            IndicatorKind::Macd => &["MACD", "MACD Signal"],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIndicatorKindError;

impl fmt::Display for ParseIndicatorKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown indicator kind")
    }
}

impl std::error::Error for ParseIndicatorKindError {}

impl FromStr for IndicatorKind {
    type Err = ParseIndicatorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "sma" | "ma" | "simple_ma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            "macd" => Ok(IndicatorKind::Macd),
            "bb" | "bbands" | "bollinger" | "bollinger_bands" => Ok(IndicatorKind::Bbands),
            _ => Err(ParseIndicatorKindError),
        }
    }
}

/// Where to draw the indicator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Overlay,
    SeparatePane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePattern {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub pattern: LinePattern,
}

impl LineStyle {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            pattern: LinePattern::Solid,
        }
    }
}

/// One style per entry of [`IndicatorKind::line_names`].
pub fn default_line_styles(kind: IndicatorKind) -> Vec<LineStyle> {
    match kind {
        IndicatorKind::Sma => vec![
            LineStyle::solid("#ff6b6b", 1.0),
            LineStyle::solid("#4ecdc4", 1.0),
        ],
        IndicatorKind::Ema => vec![
            LineStyle::solid("#45b7d1", 1.0),
            LineStyle::solid("#f9ca24", 1.0),
        ],
        IndicatorKind::Bbands => vec![
            LineStyle::solid("#dda0dd", 1.0),
            LineStyle::solid("#dda0dd", 1.0),
        ],
        IndicatorKind::Rsi => vec![LineStyle::solid("#ff9ff3", 1.0)],
        IndicatorKind::Macd => vec![
            LineStyle::solid("#4ade80", 1.0),
            LineStyle {
                color: "#f472b6".to_string(),
                width: 1.0,
                pattern: LinePattern::Dashed,
            },
        ],
    }
}

// ---------- moving averages -------------------------------------------------

/// Trailing simple moving average.
///
/// The first `period - 1` positions are `NaN`. A zero period, or one longer
/// than the input, yields all `NaN`.
pub fn sma(data: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 {
        return vec![f64::NAN; data.len()];
    }
    (0..data.len())
        .map(|i| {
            if i + 1 < period {
                f64::NAN
            } else {
                window_mean(&data[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Exponential moving average seeded with the first sample, so it has no
/// undefined prefix.
pub fn ema(data: &[f64], period: usize) -> IndicatorSeries {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(data.len());
    let mut prev: Option<f64> = None;
    for &x in data {
        let next = match prev {
            None => x,
            Some(p) => x * k + p * (1.0 - k),
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

// ---------- oscillators -----------------------------------------------------

/// Relative strength index using a simple average of the trailing `period`
/// gains and losses.
///
/// Position 0 is always `NaN` (no difference yet), followed by `period - 1`
/// more `NaN`. A window with gains and no losses reads 100; a flat window
/// (no gains, no losses) is `NaN`.
pub fn rsi(data: &[f64], period: usize) -> IndicatorSeries {
    if data.is_empty() {
        return Vec::new();
    }
    if period == 0 {
        return vec![f64::NAN; data.len()];
    }
    let (gains, losses): (Vec<f64>, Vec<f64>) = data
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut out = Vec::with_capacity(data.len());
    out.push(f64::NAN);
    for i in 0..gains.len() {
        if i + 1 < period {
            out.push(f64::NAN);
            continue;
        }
        let range = i + 1 - period..=i;
        let avg_gain = gains[range.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[range].iter().sum::<f64>() / period as f64;
        let rs = avg_gain / avg_loss;
        out.push(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub middle: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Bollinger bands: SMA middle line and `k` population standard deviations
/// above and below it.
pub fn bollinger_bands(data: &[f64], period: usize, k: f64) -> BollingerBands {
    let middle = sma(data, period);
    let mut upper = vec![f64::NAN; data.len()];
    let mut lower = vec![f64::NAN; data.len()];
    if period > 0 {
        for i in period.saturating_sub(1)..data.len() {
            let window = &data[i + 1 - period..=i];
            let mean = middle[i];
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            let sd = variance.sqrt();
            upper[i] = mean + sd * k;
            lower[i] = mean - sd * k;
        }
    }
    BollingerBands {
        middle,
        upper,
        lower,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    pub macd_line: IndicatorSeries,
    /// Signal line shifted right for display, same length as the input.
    pub signal_line: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// MACD with the standard 12/26/9 parameters.
pub fn macd(data: &[f64]) -> Macd {
    macd_with(
        data,
        DEFAULT_MACD_FAST,
        DEFAULT_MACD_SLOW,
        DEFAULT_MACD_SIGNAL,
    )
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// MACD line, signal line and histogram.
///
/// The signal is the EMA of the finite MACD values. For display it is
/// preceded by `signal - 1` `NaN` markers and cut to the input length. The
/// histogram subtracts the unshifted signal, reading missing or non-finite
/// values as 0.
pub fn macd_with(data: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let raw_signal = ema(&finite_values(&macd_line), signal);

    let pad = signal
        .saturating_sub(1)
        .min(data.len().saturating_sub(1));
    let signal_line: Vec<f64> = std::iter::repeat(f64::NAN)
        .take(pad)
        .chain(raw_signal.iter().copied())
        .take(data.len())
        .collect();

    let histogram = macd_line
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let s = raw_signal
                .get(i)
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0);
            m - s
        })
        .collect();

    Macd {
        macd_line,
        signal_line,
        histogram,
    }
}

fn normalized(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn sma_pads_prefix_and_averages_windows() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&data, 3);
        assert_eq!(out.len(), data.len());
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
        assert_close(out[4], 4.0);
    }

    #[test]
    fn sma_longer_than_input_is_all_nan() {
        assert!(sma(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
        assert!(sma(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn ema_starts_at_first_sample() {
        let data = [10.0, 11.0, 12.0];
        let out = ema(&data, 3);
        assert_eq!(out[0], 10.0);
        // k = 0.5
        assert_close(out[1], 10.5);
        assert_close(out[2], 11.25);
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn constant_series_collapses_bands() {
        let data = vec![100.0; 30];
        let bb = bollinger_bands(&data, 20, 2.0);
        assert_eq!(bb.upper.len(), 30);
        for i in 0..19 {
            assert!(bb.upper[i].is_nan() && bb.lower[i].is_nan() && bb.middle[i].is_nan());
        }
        for i in 19..30 {
            assert_eq!(bb.upper[i], bb.middle[i]);
            assert_eq!(bb.lower[i], bb.middle[i]);
            assert_eq!(bb.middle[i], 100.0);
        }
    }

    #[test]
    fn bands_use_population_deviation() {
        let bb = bollinger_bands(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 1.0);
        // mean 5, population sd 2
        assert_close(bb.middle[7], 5.0);
        assert_close(bb.upper[7], 7.0);
        assert_close(bb.lower[7], 3.0);
    }

    #[test]
    fn rsi_length_and_bounds() {
        let data: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 11) as f64 - (i % 3) as f64)
            .collect();
        let out = rsi(&data, DEFAULT_RSI_PERIOD);
        assert_eq!(out.len(), data.len());
        assert!(out[..DEFAULT_RSI_PERIOD].iter().all(|v| v.is_nan()));
        for v in &out[DEFAULT_RSI_PERIOD..] {
            assert!((0.0..=100.0).contains(v), "rsi out of range: {v}");
        }
    }

    #[test]
    fn rsi_strictly_increasing_is_100() {
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let out = rsi(&data, 14);
        assert!(out[13].is_nan());
        for v in &out[14..] {
            assert_eq!(*v, 100.0);
        }
    }

    #[test]
    fn signal_input_drops_infinities_and_nan() {
        let line = [1.0, f64::INFINITY, f64::NAN, f64::NEG_INFINITY, 2.0];
        assert_eq!(finite_values(&line), vec![1.0, 2.0]);
    }

    #[test]
    fn rsi_flat_window_is_nan_and_empty_is_empty() {
        let out = rsi(&[5.0; 20], 14);
        assert!(out.iter().all(|v| v.is_nan()));
        assert!(rsi(&[], 14).is_empty());
        assert_eq!(rsi(&[1.0], 14).len(), 1);
    }

    #[test]
    fn macd_signal_is_shifted_and_aligned() {
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let m = macd(&data);
        assert_eq!(m.macd_line.len(), 40);
        assert_eq!(m.signal_line.len(), 40);
        assert_eq!(m.histogram.len(), 40);
        assert!(m.signal_line[..8].iter().all(|v| v.is_nan()));
        // The first displayed signal value equals the first MACD value.
        assert_eq!(m.signal_line[8], m.macd_line[0]);
        assert_close(m.histogram[0], 0.0);
        let raw = ema(&m.macd_line, 9);
        assert_close(m.histogram[5], m.macd_line[5] - raw[5]);
    }

    #[test]
    fn macd_short_input_keeps_length() {
        let m = macd(&[1.0, 2.0, 3.0]);
        assert_eq!(m.signal_line.len(), 3);
        assert!(m.signal_line[..2].iter().all(|v| v.is_nan()));
        assert_eq!(m.signal_line[2], m.macd_line[0]);

        let empty = macd(&[]);
        assert!(empty.macd_line.is_empty());
        assert!(empty.signal_line.is_empty());
        assert!(empty.histogram.is_empty());
    }

    #[test]
    fn kinds_parse_from_aliases() {
        assert_eq!("BB".parse::<IndicatorKind>(), Ok(IndicatorKind::Bbands));
        assert_eq!("bollinger".parse::<IndicatorKind>(), Ok(IndicatorKind::Bbands));
        assert_eq!(" rsi ".parse::<IndicatorKind>(), Ok(IndicatorKind::Rsi));
        assert!("atr".parse::<IndicatorKind>().is_err());
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.as_str().parse::<IndicatorKind>(), Ok(kind));
            assert_eq!(default_line_styles(kind).len(), kind.line_names().len());
        }
        assert_eq!(IndicatorKind::Rsi.output(), OutputKind::SeparatePane);
    }
}
