//! Client for the external prediction service.
//!
//! The service receives `POST {"ticker", "days"}` and answers with
//! `{"dates", "forecast"}`. Every response is classified into a validated
//! [`common::ForecastResult`] or a typed [`common::ForecastFailure`].

pub mod client;
pub mod error;

use std::time::Duration;

pub use client::{ForecastSource, HttpForecastClient};
pub use error::ClientError;

/// Prediction endpoint used when nothing is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:5000/forecast";

/// Bound on a single prediction call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

