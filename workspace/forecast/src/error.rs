use common::{ForecastFailure, ResultError};
use thiserror::Error;
use tracing::{error, warn};

/// Error types for a single round trip to the prediction service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection failure, timeout or broken body
    #[error("Request to prediction service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status other than 404
    #[error("Prediction service answered with HTTP {0}")]
    Status(u16),

    /// The service reported that it has no data for the ticker
    #[error("{0}")]
    UnknownTicker(String),

    /// Body is not JSON or lacks the forecast fields
    #[error("Malformed prediction payload: {0}")]
    Decode(String),

    /// Body decoded but breaks the forecast invariants
    #[error("Invalid forecast: {0}")]
    Shape(#[from] ResultError),
}

impl From<ClientError> for ForecastFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(ref source) => {
                if source.is_timeout() {
                    warn!(?err, "Prediction service timed out");
                } else {
                    error!(?err, "Prediction service unreachable");
                }
                ForecastFailure::upstream_unreachable(err.to_string())
            }
            ClientError::Status(status) => {
                error!(status, "Prediction service returned an error status");
                ForecastFailure::upstream_unreachable(err.to_string())
            }
            ClientError::UnknownTicker(message) => {
                warn!(%message, "Prediction service does not know the ticker");
                ForecastFailure::not_found(message)
            }
            ClientError::Decode(_) | ClientError::Shape(_) => {
                error!(?err, "Prediction service sent an invalid forecast");
                ForecastFailure::invalid_response(err.to_string())
            }
        }
    }
}

/// Type alias for Result with ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
