use chrono::NaiveDate;
use thiserror::Error;
use tracing::trace;

use crate::ticker::Ticker;
use crate::wire::{ForecastPayload, ForecastRequestBody};

/// Horizon used by the UI.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Longest horizon the gateway accepts.
pub const MAX_HORIZON_DAYS: u32 = 30;

/// Format of the date labels on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("horizon must be at least one day")]
    ZeroHorizon,

    #[error("horizon of {days} days exceeds the maximum of {max}")]
    HorizonTooLong { days: u32, max: u32 },
}

/// Immutable request for a forecast of `horizon_days` days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    ticker: Ticker,
    horizon_days: u32,
}

impl ForecastRequest {
    pub fn new(ticker: Ticker, horizon_days: u32) -> Result<Self, RequestError> {
        Self::check_horizon(horizon_days)?;
        Ok(Self {
            ticker,
            horizon_days,
        })
    }

    /// Accepts horizons in `1..=MAX_HORIZON_DAYS`.
    pub fn check_horizon(horizon_days: u32) -> Result<(), RequestError> {
        if horizon_days == 0 {
            return Err(RequestError::ZeroHorizon);
        }
        if horizon_days > MAX_HORIZON_DAYS {
            return Err(RequestError::HorizonTooLong {
                days: horizon_days,
                max: MAX_HORIZON_DAYS,
            });
        }
        Ok(())
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// JSON body sent to the gateway and to the prediction service.
    pub fn to_body(&self) -> ForecastRequestBody {
        ForecastRequestBody {
            ticker: self.ticker.to_string(),
            days: self.horizon_days,
        }
    }
}

/// Ways an incoming payload can break the forecast invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultError {
    #[error("got {dates} dates but {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("expected {expected} forecast points, got {actual}")]
    WrongHorizon { expected: usize, actual: usize },

    #[error("date '{value}' at position {index} is not YYYY-MM-DD")]
    InvalidDate { index: usize, value: String },

    #[error("date at position {index} does not come after the previous one")]
    NotIncreasing { index: usize },

    #[error("value at position {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Validated forecast series.
///
/// `dates` and `values` always have the requested length and the dates are
/// strictly increasing. The only way to build one is [`ForecastResult::from_payload`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    ticker: Ticker,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ForecastResult {
    pub fn from_payload(
        request: &ForecastRequest,
        payload: ForecastPayload,
    ) -> Result<Self, ResultError> {
        let ForecastPayload {
            dates, forecast, ..
        } = payload;

        if dates.len() != forecast.len() {
            return Err(ResultError::LengthMismatch {
                dates: dates.len(),
                values: forecast.len(),
            });
        }

        let expected = request.horizon_days() as usize;
        if dates.len() != expected {
            return Err(ResultError::WrongHorizon {
                expected,
                actual: dates.len(),
            });
        }

        let mut parsed: Vec<NaiveDate> = Vec::with_capacity(dates.len());
        for (index, raw) in dates.into_iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| ResultError::InvalidDate { index, value: raw })?;
            if let Some(previous) = parsed.last() {
                if date <= *previous {
                    return Err(ResultError::NotIncreasing { index });
                }
            }
            parsed.push(date);
        }

        if let Some(index) = forecast.iter().position(|value| !value.is_finite()) {
            return Err(ResultError::NonFinite { index });
        }

        trace!(ticker = %request.ticker(), points = parsed.len(), "Forecast payload validated");

        Ok(Self {
            ticker: request.ticker().clone(),
            dates: parsed,
            values: forecast,
        })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date/value pairs in forecast order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    pub fn to_payload(&self) -> ForecastPayload {
        ForecastPayload {
            ticker: Some(self.ticker.to_string()),
            dates: self
                .dates
                .iter()
                .map(|date| date.format(DATE_FORMAT).to_string())
                .collect(),
            forecast: self.values.clone(),
        }
    }
}
