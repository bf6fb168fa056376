//! Common transport-layer types shared between the gateway, the upstream
//! client and the frontend.
//!
//! The domain types ([`Ticker`], [`ForecastRequest`], [`ForecastResult`],
//! [`ForecastFailure`]) only exist in validated form. The wire types in
//! [`wire`] mirror the JSON bodies exchanged over HTTP and are converted into
//! domain types at every boundary.

mod failure;
mod forecast;
mod ticker;
pub mod wire;

pub use failure::{FailureKind, ForecastFailure};
pub use forecast::{
    DATE_FORMAT, DEFAULT_HORIZON_DAYS, ForecastRequest, ForecastResult, MAX_HORIZON_DAYS,
    RequestError, ResultError,
};
pub use ticker::{MAX_TICKER_LEN, Ticker, TickerError};
pub use wire::{FailurePayload, ForecastPayload, ForecastRequestBody, ForecastResponse};

/// Tickers offered as one-click presets in the UI.
pub const PRESET_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "TSLA", "AMZN"];

/// Ticker requested when the UI first mounts.
pub const DEFAULT_TICKER: &str = "AAPL";
