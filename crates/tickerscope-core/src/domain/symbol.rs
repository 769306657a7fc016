use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 10;

/// Normalized market symbol/ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trim, upper-case and validate a raw ticker.
    ///
    /// Accepts 1 to 10 characters from `[A-Z0-9.-]` after normalization, so
    /// exchange suffixes such as `BRK.B` or `RDS-A` pass while inner
    /// whitespace and control characters are rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();

        if let Some((index, ch)) = normalized
            .chars()
            .enumerate()
            .find(|(_, ch)| !(ch.is_ascii_uppercase() || ch.is_ascii_digit() || *ch == '.' || *ch == '-'))
        {
            return Err(ValidationError::InvalidFormat {
                value: trimmed.to_owned(),
                reason: format!("character {ch:?} at index {index} is not allowed"),
            });
        }

        let len = normalized.len();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::InvalidFormat {
                value: trimmed.to_owned(),
                reason: format!("length {len} exceeds max {MAX_SYMBOL_LEN}"),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate a raw ticker string. Alias of [`Symbol::parse`].
pub fn validate(raw: &str) -> Result<Symbol, ValidationError> {
    Symbol::parse(raw)
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
