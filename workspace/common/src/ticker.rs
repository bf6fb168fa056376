use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub const MAX_TICKER_LEN: usize = 15;

/// Reasons a raw string is not a usable ticker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker is empty")]
    Empty,

    #[error("ticker is {len} characters long, at most {max} are allowed")]
    TooLong { len: usize, max: usize },

    #[error("ticker must start with a letter, found '{ch}'")]
    InvalidStart { ch: char },

    #[error("invalid character '{ch}' at position {index}")]
    InvalidChar { ch: char, index: usize },
}

/// Trimmed, uppercased stock symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw user text into a ticker.
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(TickerError::Empty);
        }

        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(TickerError::TooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(TickerError::InvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-') {
                return Err(TickerError::InvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = TickerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_uppercases() {
        let ticker = Ticker::parse("aapl ").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(Ticker::parse("  brk.b").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert_eq!(Ticker::parse(""), Err(TickerError::Empty));
        assert_eq!(Ticker::parse("   \t"), Err(TickerError::Empty));
    }

    #[test]
    fn test_parse_rejects_malformed_symbols() {
        assert!(matches!(
            Ticker::parse("1ABC"),
            Err(TickerError::InvalidStart { ch: '1' })
        ));
        assert!(matches!(
            Ticker::parse("AB$"),
            Err(TickerError::InvalidChar { ch: '$', index: 2 })
        ));
        assert!(matches!(
            Ticker::parse("ABCDEFGHIJKLMNOP"),
            Err(TickerError::TooLong { len: 16, max: 15 })
        ));
    }

    #[test]
    fn test_serde_normalizes_on_deserialize() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"MSFT\"");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }
}
