use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation and contract errors exposed by `tickerscope-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol '{value}' is invalid: {reason}")]
    InvalidFormat { value: String, reason: String },

    #[error("invalid period '{value}', expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y")]
    InvalidPeriod { value: String },

    #[error("price point field '{field}' is invalid: {reason}")]
    InvalidPricePoint {
        field: &'static str,
        reason: &'static str,
    },
    #[error("fundamental field '{field}' is invalid: {reason}")]
    InvalidFundamental {
        field: &'static str,
        reason: &'static str,
    },
    #[error("price point dated {date} does not follow {previous}")]
    NonIncreasingDate { date: String, previous: String },
}

/// Failure classification for a single provider fetch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("provider does not know symbol '{symbol}'")]
    UnknownSymbol { symbol: String },
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl FetchError {
    pub fn unknown_symbol(symbol: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            symbol: symbol.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether a caller-side retry policy may try again.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Display formatting failure. Never fatal to the pipeline.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("cannot format non-finite value")]
    NonFinite,
}

/// Structured error kind carried by an errored analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptySymbol,
    InvalidFormat,
    UnknownSymbol,
    TransportError,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySymbol => "EmptySymbol",
            Self::InvalidFormat => "InvalidFormat",
            Self::UnknownSymbol => "UnknownSymbol",
            Self::TransportError => "TransportError",
        }
    }

    /// User-facing message for this kind. `input` is the symbol as the user typed it.
    pub fn user_message(self, input: &str) -> String {
        let input = input.trim();
        match self {
            Self::EmptySymbol => String::from("Please enter a stock symbol (e.g. AAPL, GOOGL, TSLA)."),
            Self::InvalidFormat => format!(
                "'{input}' is not a valid ticker. Use 1-10 letters, digits, '.' or '-' (e.g. AAPL, BRK.B)."
            ),
            Self::UnknownSymbol => format!(
                "No market data provider recognises '{input}'. Check the ticker and try again."
            ),
            Self::TransportError => String::from(
                "Could not reach the market data provider. Please try again in a moment.",
            ),
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ValidationError> for ErrorKind {
    fn from(error: &ValidationError) -> Self {
        match error {
            ValidationError::EmptySymbol => Self::EmptySymbol,
            _ => Self::InvalidFormat,
        }
    }
}

impl From<&FetchError> for ErrorKind {
    fn from(error: &FetchError) -> Self {
        match error {
            FetchError::UnknownSymbol { .. } => Self::UnknownSymbol,
            FetchError::Transport { .. } => Self::TransportError,
        }
    }
}
