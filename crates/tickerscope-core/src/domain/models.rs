use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, ValidationError};

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// One trading-day OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < open.max(close) {
            return Err(ValidationError::InvalidPricePoint {
                field: "high",
                reason: "must be >= open and close",
            });
        }

        if low > open.min(close) {
            return Err(ValidationError::InvalidPricePoint {
                field: "low",
                reason: "must be <= open and close",
            });
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Date-ordered price history for one symbol and period.
///
/// Dates are strictly increasing. An empty series is a valid value meaning
/// the provider had no data for the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct HistoricalSeries {
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        let mut series = Self::with_capacity(points.len());
        for point in points {
            series.try_push(point)?;
        }
        Ok(series)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a point, rejecting dates that do not follow the current last date.
    pub fn try_push(&mut self, point: PricePoint) -> Result<(), ValidationError> {
        if let Some(last) = self.points.last() {
            if point.date <= last.date {
                return Err(ValidationError::NonIncreasingDate {
                    date: point.date.to_string(),
                    previous: last.date.to_string(),
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|point| point.date).collect()
    }
}

impl TryFrom<Vec<PricePoint>> for HistoricalSeries {
    type Error = ValidationError;

    fn try_from(value: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HistoricalSeries> for Vec<PricePoint> {
    fn from(value: HistoricalSeries) -> Self {
        value.points
    }
}

/// Instrument details and quote snapshot reported alongside a price history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMeta {
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub name: Option<String>,
    /// Latest regular-session price.
    pub market_price: Option<f64>,
    /// Prior session's close as quoted by the provider.
    pub previous_close: Option<f64>,
    /// Close before the first bar of the requested range.
    pub chart_previous_close: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}

impl InstrumentMeta {
    pub fn day_range(&self) -> Option<(f64, f64)> {
        self.day_low.zip(self.day_high)
    }

    pub fn fifty_two_week_range(&self) -> Option<(f64, f64)> {
        self.fifty_two_week_low.zip(self.fifty_two_week_high)
    }
}

/// Descriptive company details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub employees: Option<u64>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub summary: Option<String>,
}

/// Valuation and financial figures. Ratios are plain numbers; yields and
/// margins are fractions (`0.0052` is 0.52%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub volume: Option<u64>,
    pub average_volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub total_revenue: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
}

impl KeyStatistics {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("current_price", self.current_price),
            ("previous_close", self.previous_close),
            ("day_low", self.day_low),
            ("day_high", self.day_high),
            ("fifty_two_week_low", self.fifty_two_week_low),
            ("fifty_two_week_high", self.fifty_two_week_high),
            ("market_cap", self.market_cap),
            ("total_revenue", self.total_revenue),
            ("dividend_yield", self.dividend_yield),
        ] {
            validate_optional_non_negative(field, value)?;
        }

        for (field, value) in [
            ("enterprise_value", self.enterprise_value),
            ("trailing_pe", self.trailing_pe),
            ("forward_pe", self.forward_pe),
            ("price_to_book", self.price_to_book),
            ("price_to_sales", self.price_to_sales),
            ("beta", self.beta),
            ("trailing_eps", self.trailing_eps),
            ("profit_margin", self.profit_margin),
            ("operating_margin", self.operating_margin),
        ] {
            validate_optional_finite(field, value)?;
        }

        Ok(())
    }

    /// Current price minus previous close.
    pub fn price_change(&self) -> Option<f64> {
        Some(self.current_price? - self.previous_close?)
    }

    /// [`Self::price_change`] relative to the previous close, in percent.
    pub fn price_change_percent(&self) -> Option<f64> {
        let previous = self.previous_close.filter(|close| *close != 0.0)?;
        Some(self.price_change()? / previous * 100.0)
    }
}

/// Company profile and key statistics snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: Symbol,
    pub profile: CompanyProfile,
    pub statistics: KeyStatistics,
}

impl Fundamentals {
    pub fn new(
        symbol: Symbol,
        profile: CompanyProfile,
        statistics: KeyStatistics,
    ) -> Result<Self, ValidationError> {
        statistics.validate()?;
        Ok(Self {
            symbol,
            profile,
            statistics,
        })
    }
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Option<String> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());
    is_valid.then_some(normalized)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidPricePoint {
            field,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ValidationError::InvalidPricePoint {
            field,
            reason: "must be non-negative",
        });
    }
    Ok(())
}

fn validate_optional_non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    validate_optional_finite(field, value)?;
    if value.is_some_and(|value| value < 0.0) {
        return Err(ValidationError::InvalidFundamental {
            field,
            reason: "must be non-negative",
        });
    }
    Ok(())
}

fn validate_optional_finite(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    if value.is_some_and(|value| !value.is_finite()) {
        return Err(ValidationError::InvalidFundamental {
            field,
            reason: "must be finite",
        });
    }
    Ok(())
}
