//! Derived series and scalar summaries over a [`HistoricalSeries`].
//!
//! Everything here is a pure function of its input. Values that cannot be
//! computed (too few points, division by a zero close) are `None` rather
//! than errors, so callers can render them as "N/A".

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::iso_date;
use crate::HistoricalSeries;

/// One value of a derived, date-indexed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub value: f64,
}

/// Trailing simple moving average of closes for one window size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    pub window: usize,
    /// One value per index `i >= window - 1`, dated at `i`.
    pub values: Vec<DatedValue>,
}

impl MovingAverage {
    pub fn last(&self) -> Option<f64> {
        self.values.last().map(|point| point.value)
    }
}

/// Summary figures for a price history. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub latest_close: Option<f64>,
    pub previous_close: Option<f64>,
    /// Last close minus first close.
    pub absolute_change: Option<f64>,
    /// `absolute_change / first close * 100`.
    pub percent_change: Option<f64>,
    /// Last close minus previous close.
    pub day_change: Option<f64>,
    pub day_change_percent: Option<f64>,
    pub min_close: Option<f64>,
    pub max_close: Option<f64>,
    /// Lowest low over the window.
    pub range_low: Option<f64>,
    /// Highest high over the window.
    pub range_high: Option<f64>,
    pub average_volume: Option<f64>,
    pub latest_volume: Option<u64>,
    #[serde(default)]
    pub moving_averages: BTreeMap<usize, MovingAverage>,
    /// Close-to-close percent returns, dated at the later point.
    #[serde(default)]
    pub daily_returns: Vec<DatedValue>,
}

impl DerivedMetrics {
    pub fn moving_average(&self, window: usize) -> Option<&MovingAverage> {
        self.moving_averages.get(&window)
    }

    /// True when no metric could be derived.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Derive metrics for `series`, computing one moving average per window.
///
/// Windows of zero and windows longer than the series are skipped.
pub fn derive(series: &HistoricalSeries, windows: &BTreeSet<usize>) -> DerivedMetrics {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return DerivedMetrics::default();
    };
    let points = series.points();
    let closes = series.closes();

    let previous_close = points
        .len()
        .checked_sub(2)
        .map(|index| points[index].close);
    let has_history = points.len() >= 2;

    let absolute_change = has_history.then(|| last.close - first.close);
    let percent_change = absolute_change.and_then(|change| percent_of(change, first.close));

    let day_change = previous_close.map(|previous| last.close - previous);
    let day_change_percent = day_change
        .zip(previous_close)
        .and_then(|(change, previous)| percent_of(change, previous));

    let total_volume: f64 = points.iter().map(|point| point.volume as f64).sum();

    let moving_averages = windows
        .iter()
        .filter_map(|&window| {
            moving_average(series, &closes, window).map(|average| (window, average))
        })
        .collect();

    DerivedMetrics {
        latest_close: Some(last.close),
        previous_close,
        absolute_change,
        percent_change,
        day_change,
        day_change_percent,
        min_close: closes.iter().copied().reduce(f64::min),
        max_close: closes.iter().copied().reduce(f64::max),
        range_low: points.iter().map(|point| point.low).reduce(f64::min),
        range_high: points.iter().map(|point| point.high).reduce(f64::max),
        average_volume: Some(total_volume / points.len() as f64),
        latest_volume: Some(last.volume),
        moving_averages,
        daily_returns: daily_returns(series),
    }
}

fn moving_average(series: &HistoricalSeries, closes: &[f64], window: usize) -> Option<MovingAverage> {
    if window == 0 || closes.len() < window {
        return None;
    }

    let values = closes
        .windows(window)
        .zip(&series.points()[window - 1..])
        .map(|(slice, point)| DatedValue {
            date: point.date,
            value: slice.iter().sum::<f64>() / window as f64,
        })
        .collect();

    Some(MovingAverage { window, values })
}

fn daily_returns(series: &HistoricalSeries) -> Vec<DatedValue> {
    series
        .points()
        .windows(2)
        .filter_map(|pair| {
            percent_of(pair[1].close - pair[0].close, pair[0].close).map(|value| DatedValue {
                date: pair[1].date,
                value,
            })
        })
        .collect()
}

fn percent_of(change: f64, base: f64) -> Option<f64> {
    (base != 0.0).then(|| change / base * 100.0)
}
