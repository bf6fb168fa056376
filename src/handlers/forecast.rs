use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use common::{
    FailureKind, FailurePayload, ForecastFailure, ForecastPayload, ForecastRequest,
    ForecastResponse, ForecastResult, Ticker,
};
use tracing::{debug, info, instrument, trace, warn};
use validator::Validate;

use crate::schemas::{AppState, ForecastQuery};

/// Request a price forecast for a ticker
///
/// The body is validated here; the prediction service is only contacted for
/// well-formed requests. Success and failure bodies are relayed unchanged.
#[utoipa::path(
    post,
    path = "/api/forecast",
    tag = "forecast",
    request_body = ForecastQuery,
    responses(
        (status = 200, description = "Forecast computed", body = ForecastPayload),
        (status = 400, description = "Malformed request body", body = FailurePayload),
        (status = 404, description = "Ticker unknown to the prediction service", body = FailurePayload),
        (status = 502, description = "Prediction service unreachable or returned an invalid forecast", body = FailurePayload)
    )
)]
#[instrument(skip(state, payload))]
pub async fn handle_forecast_request(
    State(state): State<AppState>,
    payload: Result<Json<ForecastQuery>, JsonRejection>,
) -> (StatusCode, Json<ForecastResponse>) {
    trace!("Entering handle_forecast_request function");

    let request = match validate_request(payload) {
        Ok(request) => request,
        Err(failure) => {
            warn!("Rejected forecast request: {}", failure.message);
            let body = ForecastResponse::from(Err::<ForecastResult, _>(failure));
            return (StatusCode::BAD_REQUEST, Json(body));
        }
    };

    debug!(
        "Forwarding forecast request for {} ({} days)",
        request.ticker(),
        request.horizon_days()
    );

    let outcome = state.forecast.fetch_forecast(&request).await;
    let status = match &outcome {
        Ok(result) => {
            info!("Forecast for {} relayed with {} points", result.ticker(), result.len());
            StatusCode::OK
        }
        Err(failure) => {
            warn!("Forecast for {} failed: {}", request.ticker(), failure);
            status_for(failure)
        }
    };

    (status, Json(ForecastResponse::from(outcome)))
}

/// Turn the raw body into a [`ForecastRequest`] or an InvalidResponse failure.
fn validate_request(
    payload: Result<Json<ForecastQuery>, JsonRejection>,
) -> Result<ForecastRequest, ForecastFailure> {
    let Json(query) =
        payload.map_err(|rejection| ForecastFailure::invalid_response(rejection.body_text()))?;

    query
        .validate()
        .map_err(|e| ForecastFailure::invalid_response(e.to_string()))?;

    let ticker =
        Ticker::parse(&query.ticker).map_err(|e| ForecastFailure::invalid_response(e.to_string()))?;
    let days = u32::try_from(query.days)
        .map_err(|_| ForecastFailure::invalid_response("days must be a positive integer"))?;

    ForecastRequest::new(ticker, days).map_err(|e| ForecastFailure::invalid_response(e.to_string()))
}

pub(crate) fn status_for(failure: &ForecastFailure) -> StatusCode {
    match failure.kind {
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::UpstreamUnreachable | FailureKind::InvalidResponse => StatusCode::BAD_GATEWAY,
    }
}
