use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use ta_engine::{IndicatorKind, LinePattern, LineStyle};

mod assemble;

pub use assemble::{assemble_plot_traces, assemble_plot_traces_with_rng};

/// Rendering style for the primary series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Candlestick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChartKindError;

impl fmt::Display for ParseChartKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown chart kind")
    }
}

impl std::error::Error for ParseChartKindError {}

impl FromStr for ChartKind {
    type Err = ParseChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "scatter" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "candlestick" | "candle" | "ohlc" => Ok(ChartKind::Candlestick),
            _ => Err(ParseChartKindError),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(ParseThemeError),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError;

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown theme (expected dark or light)")
    }
}

impl std::error::Error for ParseThemeError {}

/// Theme-dependent colors of the price and volume traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub price: &'static str,
    pub up: &'static str,
    pub down: &'static str,
    pub marker_outline: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                price: "#10b981",
                up: "#22c55e",
                down: "#ef4444",
                marker_outline: "#1e293b",
            },
            Theme::Light => Palette {
                price: "#059669",
                up: "#16a34a",
                down: "#dc2626",
                marker_outline: "#ffffff",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceKind {
    Line,
    Bar,
    BandUpper,
    BandLower,
    Candlestick,
}

/// Which y-axis a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Price,
    Volume,
    Oscillator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleColors {
    pub up: String,
    pub down: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStyle {
    pub color: String,
    pub width: f64,
    pub pattern: LinePattern,
    pub axis: Axis,
    /// Per-point colors (volume bars).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marker_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candle: Option<CandleColors>,
}

impl TraceStyle {
    fn from_line(line: LineStyle, axis: Axis) -> Self {
        Self {
            color: line.color,
            width: line.width,
            pattern: line.pattern,
            axis,
            marker_colors: Vec::new(),
            candle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcColumns {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// One drawable series. Built only by the assembler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotTrace {
    name: String,
    x: Vec<String>,
    y: Vec<f64>,
    kind: TraceKind,
    style: TraceStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    ohlc: Option<OhlcColumns>,
}

impl PlotTrace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &[String] {
        &self.x
    }

    /// Empty for candlestick traces, which carry [`PlotTrace::ohlc`] instead.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn kind(&self) -> TraceKind {
        self.kind
    }

    pub fn style(&self) -> &TraceStyle {
        &self.style
    }

    pub fn ohlc(&self) -> Option<&OhlcColumns> {
        self.ohlc.as_ref()
    }
}

/// What to draw for one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub chart_kind: ChartKind,
    /// Selected indicators, drawn in this order.
    pub indicators: Vec<IndicatorKind>,
    pub theme: Theme,
    /// Legend name of the primary line/bar trace, e.g. "Open Price".
    pub value_label: String,
}
