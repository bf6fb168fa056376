//! JSON bodies of `POST /api/forecast` and of the prediction service.
//!
//! Success: `{ "dates": [...], "forecast": [...] }` (plus an optional `ticker`).
//! Failure: `{ "error": true, "kind": "...", "message": "..." }` where only the
//! `error` flag is guaranteed; older gateways sent nothing else.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::failure::{FailureKind, ForecastFailure};
use crate::forecast::{ForecastRequest, ForecastResult};

/// Request body for a forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ForecastRequestBody {
    /// Stock symbol, e.g. "AAPL"
    pub ticker: String,
    /// Number of future days to forecast
    pub days: u32,
}

/// Successful forecast body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastPayload {
    /// Normalized ticker the forecast belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// Forecast dates (YYYY-MM-DD), strictly increasing
    pub dates: Vec<String>,
    /// Predicted prices, one per date
    pub forecast: Vec<f64>,
}

/// Failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FailurePayload {
    /// Always true for failures
    pub error: bool,
    /// Failure classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    /// Human readable detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FailurePayload {
    /// Recover the typed failure. A bare `{"error": true}` is the legacy
    /// ticker-not-found signal.
    pub fn into_failure(self) -> ForecastFailure {
        if !self.error {
            return ForecastFailure::invalid_response(
                "response carried error=false without forecast data",
            );
        }
        let kind = self.kind.unwrap_or(FailureKind::NotFound);
        let message = self
            .message
            .unwrap_or_else(|| kind.default_message().to_string());
        ForecastFailure::new(kind, message)
    }
}

impl From<&ForecastFailure> for FailurePayload {
    fn from(failure: &ForecastFailure) -> Self {
        Self {
            error: true,
            kind: Some(failure.kind),
            message: Some(failure.message.clone()),
        }
    }
}

/// Either body the gateway can answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Failure(FailurePayload),
    Success(ForecastPayload),
}

impl ForecastResponse {
    /// Validate the body against the request that produced it.
    pub fn into_outcome(
        self,
        request: &ForecastRequest,
    ) -> Result<ForecastResult, ForecastFailure> {
        match self {
            ForecastResponse::Failure(payload) => Err(payload.into_failure()),
            ForecastResponse::Success(payload) => ForecastResult::from_payload(request, payload)
                .map_err(|e| ForecastFailure::invalid_response(e.to_string())),
        }
    }
}

impl From<Result<ForecastResult, ForecastFailure>> for ForecastResponse {
    fn from(outcome: Result<ForecastResult, ForecastFailure>) -> Self {
        match outcome {
            Ok(result) => ForecastResponse::Success(result.to_payload()),
            Err(failure) => ForecastResponse::Failure(FailurePayload::from(&failure)),
        }
    }
}
