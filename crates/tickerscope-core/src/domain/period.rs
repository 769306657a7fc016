use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Historical lookback window offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Self; 6] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
    ];

    /// Short code, identical to the provider's `range` parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    pub const fn provider_range(self) -> &'static str {
        self.as_str()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
            Self::TwoYears => "2 Years",
            Self::FiveYears => "5 Years",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period() {
        let period = Period::from_str("1Y").expect("must parse");
        assert_eq!(period, Period::OneYear);
    }

    #[test]
    fn rejects_invalid_period() {
        let err = Period::from_str("10y").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidPeriod { .. }));
    }

    #[test]
    fn every_period_round_trips_through_its_code() {
        for period in Period::ALL {
            assert_eq!(Period::from_str(period.as_str()), Ok(period));
        }
    }

    #[test]
    fn defaults_to_one_year() {
        assert_eq!(Period::default(), Period::OneYear);
        assert_eq!(Period::default().label(), "1 Year");
    }
}
