use rand::Rng;
use tracing::debug;

use ta_engine::{
    bollinger_bands, default_line_styles, ema, macd, rsi, sma, IndicatorKind, LinePattern,
    LineStyle, DEFAULT_BBANDS_PERIOD, DEFAULT_BBANDS_STDDEV, DEFAULT_RSI_PERIOD, EMA_PERIODS,
    SMA_PERIODS,
};
use ts_core::{fill_placeholder_volume, series_granularity, CanonicalPoint, Granularity};

use crate::{
    Axis, CandleColors, ChartKind, OhlcColumns, Palette, PlotRequest, PlotTrace, TraceKind,
    TraceStyle,
};

const PRICE_LINE_WIDTH: f64 = 2.0;
const OHLC_TRACE_NAME: &str = "OHLC";
const VOLUME_TRACE_NAME: &str = "Volume";

/// Build the traces for an already windowed series, using the thread RNG for
/// placeholder volume.
pub fn assemble_plot_traces(points: &[CanonicalPoint], request: &PlotRequest) -> Vec<PlotTrace> {
    assemble_plot_traces_with_rng(points, request, &mut rand::thread_rng())
}

/// Build, in order: one primary trace, the selected indicator traces, then
/// one volume trace.
///
/// Candlesticks and indicators need daily data; for coarser series the
/// primary trace falls back to a line (or bar) and indicators are skipped.
pub fn assemble_plot_traces_with_rng<R: Rng + ?Sized>(
    points: &[CanonicalPoint],
    request: &PlotRequest,
    rng: &mut R,
) -> Vec<PlotTrace> {
    if points.is_empty() {
        return Vec::new();
    }
    let palette = Palette::for_theme(request.theme);
    let daily = series_granularity(points) == Some(Granularity::Daily);
    let x = ts_core::labels(points);

    let mut traces = Vec::with_capacity(2 + 2 * request.indicators.len());
    traces.push(primary_trace(points, request, &palette, &x, daily));

    if daily {
        let closes = ts_core::close_values(points);
        for &kind in &request.indicators {
            push_indicator(&mut traces, kind, &closes, &x);
        }
    } else if !request.indicators.is_empty() {
        debug!(
            indicators = request.indicators.len(),
            "indicators skipped for non-daily series"
        );
    }

    traces.push(volume_trace(points, &palette, x, rng));
    debug!(traces = traces.len(), points = points.len(), "plot traces assembled");
    traces
}

fn primary_trace(
    points: &[CanonicalPoint],
    request: &PlotRequest,
    palette: &Palette,
    x: &[String],
    daily: bool,
) -> PlotTrace {
    let style = |width: f64| TraceStyle {
        color: palette.price.to_string(),
        width,
        pattern: LinePattern::Solid,
        axis: Axis::Price,
        marker_colors: Vec::new(),
        candle: None,
    };

    match request.chart_kind {
        ChartKind::Candlestick if daily => PlotTrace {
            name: OHLC_TRACE_NAME.to_string(),
            x: x.to_vec(),
            y: Vec::new(),
            kind: TraceKind::Candlestick,
            style: TraceStyle {
                candle: Some(CandleColors {
                    up: palette.up.to_string(),
                    down: palette.down.to_string(),
                }),
                ..style(1.0)
            },
            ohlc: Some(OhlcColumns {
                open: points.iter().map(|p| p.ohlc.open).collect(),
                high: points.iter().map(|p| p.ohlc.high).collect(),
                low: points.iter().map(|p| p.ohlc.low).collect(),
                close: points.iter().map(|p| p.ohlc.close).collect(),
            }),
        },
        ChartKind::Bar => PlotTrace {
            name: request.value_label.clone(),
            x: x.to_vec(),
            y: ts_core::values(points),
            kind: TraceKind::Bar,
            style: style(0.0),
            ohlc: None,
        },
        ChartKind::Line | ChartKind::Candlestick => PlotTrace {
            name: request.value_label.clone(),
            x: x.to_vec(),
            y: ts_core::values(points),
            kind: TraceKind::Line,
            style: style(PRICE_LINE_WIDTH),
            ohlc: None,
        },
    }
}

fn push_indicator(
    traces: &mut Vec<PlotTrace>,
    kind: IndicatorKind,
    closes: &[f64],
    x: &[String],
) {
    let axis = match kind.output() {
        ta_engine::OutputKind::Overlay => Axis::Price,
        ta_engine::OutputKind::SeparatePane => Axis::Oscillator,
    };
    let (series, kinds): (Vec<Vec<f64>>, Vec<TraceKind>) = match kind {
        IndicatorKind::Sma => (
            SMA_PERIODS.iter().map(|&p| sma(closes, p)).collect(),
            vec![TraceKind::Line; SMA_PERIODS.len()],
        ),
        IndicatorKind::Ema => (
            EMA_PERIODS.iter().map(|&p| ema(closes, p)).collect(),
            vec![TraceKind::Line; EMA_PERIODS.len()],
        ),
        IndicatorKind::Bbands => {
            let bb = bollinger_bands(closes, DEFAULT_BBANDS_PERIOD, DEFAULT_BBANDS_STDDEV);
            (
                vec![bb.upper, bb.lower],
                vec![TraceKind::BandUpper, TraceKind::BandLower],
            )
        }
        IndicatorKind::Rsi => (vec![rsi(closes, DEFAULT_RSI_PERIOD)], vec![TraceKind::Line]),
        IndicatorKind::Macd => {
            let m = macd(closes);
            (
                vec![m.macd_line, m.signal_line],
                vec![TraceKind::Line, TraceKind::Line],
            )
        }
    };

    let styles: Vec<LineStyle> = default_line_styles(kind);
    for (((name, y), trace_kind), line) in kind
        .line_names()
        .iter()
        .zip(series)
        .zip(kinds)
        .zip(styles)
    {
        traces.push(PlotTrace {
            name: (*name).to_string(),
            x: x.to_vec(),
            y,
            kind: trace_kind,
            style: TraceStyle::from_line(line, axis),
            ohlc: None,
        });
    }
}

fn volume_trace<R: Rng + ?Sized>(
    points: &[CanonicalPoint],
    palette: &Palette,
    x: Vec<String>,
    rng: &mut R,
) -> PlotTrace {
    let mut sized = points.to_vec();
    fill_placeholder_volume(&mut sized, rng);

    // Up when the primary value did not fall.
    let marker_colors = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let up = i == 0 || p.value >= points[i - 1].value;
            let color = if up { palette.up } else { palette.down };
            color.to_string()
        })
        .collect();

    PlotTrace {
        name: VOLUME_TRACE_NAME.to_string(),
        x,
        y: ts_core::volumes(&sized),
        kind: TraceKind::Bar,
        style: TraceStyle {
            color: palette.up.to_string(),
            width: 0.0,
            pattern: LinePattern::Solid,
            axis: Axis::Volume,
            marker_colors,
            candle: None,
        },
        ohlc: None,
    }
}
