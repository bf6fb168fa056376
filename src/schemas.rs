use common::{FailureKind, FailurePayload, ForecastPayload, ForecastRequestBody};
use forecast::ForecastSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Prediction service client
    pub forecast: Arc<dyn ForecastSource>,
    /// Upstream URL, reported by the health check
    pub upstream_url: String,
    /// Bound on one upstream call
    pub upstream_timeout: Duration,
}

/// Body accepted by `POST /api/forecast`
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ForecastQuery {
    /// Stock symbol; trimmed, uppercased and length-checked by `Ticker::parse`
    #[validate(length(min = 1))]
    pub ticker: String,
    /// Forecast horizon in days
    #[validate(range(min = 1, max = 30))]
    pub days: i64,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Configured prediction service URL
    pub upstream: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::forecast::handle_forecast_request,
    ),
    components(
        schemas(
            ForecastQuery,
            ForecastRequestBody,
            ForecastPayload,
            FailurePayload,
            FailureKind,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forecast", description = "Stock price forecast endpoints"),
    ),
    info(
        title = "Stockcast API",
        description = "Gateway between the forecast dashboard and the prediction service",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
