//! Chart-ready projections of an [`AnalysisResult`].
//!
//! Each series is a pair of parallel arrays (ISO date labels and values) so
//! a plotting front end can consume it without knowing the domain types.

use serde::{Deserialize, Serialize};

use crate::metrics::MovingAverage;
use crate::pipeline::AnalysisResult;
use crate::{HistoricalSeries, Symbol};

/// One plottable line or bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Candlestick arrays, one entry per trading day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// All chart data for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub price: ChartSeries,
    pub volume: ChartSeries,
    pub moving_averages: Vec<ChartSeries>,
    pub candles: CandleSeries,
}

impl ChartData {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let symbol = result
            .symbol()
            .map(Symbol::as_str)
            .unwrap_or(result.raw_input());

        Self {
            title: format!("{} · {}", result.display_name(), result.period().label()),
            price: price_series(result.series(), symbol),
            volume: volume_series(result.series()),
            moving_averages: result
                .metrics()
                .moving_averages
                .values()
                .map(moving_average_series)
                .collect(),
            candles: candles(result.series()),
        }
    }
}

pub fn price_series(series: &HistoricalSeries, symbol: &str) -> ChartSeries {
    ChartSeries {
        label: format!("{symbol} close"),
        x: date_labels(series),
        y: series.closes(),
    }
}

pub fn volume_series(series: &HistoricalSeries) -> ChartSeries {
    ChartSeries {
        label: String::from("Volume"),
        x: date_labels(series),
        y: series.points().iter().map(|point| point.volume as f64).collect(),
    }
}

pub fn moving_average_series(average: &MovingAverage) -> ChartSeries {
    ChartSeries {
        label: format!("MA{}", average.window),
        x: average.values.iter().map(|value| value.date.to_string()).collect(),
        y: average.values.iter().map(|value| value.value).collect(),
    }
}

pub fn candles(series: &HistoricalSeries) -> CandleSeries {
    let points = series.points();
    CandleSeries {
        x: date_labels(series),
        open: points.iter().map(|point| point.open).collect(),
        high: points.iter().map(|point| point.high).collect(),
        low: points.iter().map(|point| point.low).collect(),
        close: points.iter().map(|point| point.close).collect(),
    }
}

// `Date`'s Display is ISO 8601 (YYYY-MM-DD).
fn date_labels(series: &HistoricalSeries) -> Vec<String> {
    series.dates().iter().map(ToString::to_string).collect()
}
