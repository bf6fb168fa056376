use crate::handlers::forecast::{handle_forecast_request, status_for};
use crate::handlers::health::health_check;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use common::{ForecastFailure, ForecastResponse, ForecastResult};
use std::time::Duration;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Whole-request timeout is the upstream timeout plus this.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let request_timeout = state.upstream_timeout + REQUEST_TIMEOUT_SLACK;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Forecast gateway
        .route("/api/forecast", post(handle_forecast_request))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

/// Middleware errors still answer with the failure body.
async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ForecastResponse>) {
    let failure = if err.is::<Elapsed>() {
        warn!("Request exceeded the gateway deadline");
        ForecastFailure::upstream_unreachable("request to the prediction service timed out")
    } else {
        error!("Unhandled middleware error: {}", err);
        ForecastFailure::upstream_unreachable(format!("internal gateway error: {}", err))
    };

    let status = status_for(&failure);
    (status, Json(ForecastResponse::from(Err::<ForecastResult, _>(failure))))
}

/// Any origin when the list is empty, otherwise exactly the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid allowed origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        debug!("CORS: allowing any origin");
        return CorsLayer::permissive();
    }

    debug!("CORS: allowing {} configured origins", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
