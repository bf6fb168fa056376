use async_trait::async_trait;
use common::{ForecastFailure, ForecastPayload, ForecastRequest, ForecastResult};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

use crate::error::{ClientError, Result};

/// Anything that can turn a [`ForecastRequest`] into a validated forecast.
///
/// Implementations make exactly one attempt per call and keep no state
/// between calls, so a single instance may serve concurrent requests.
#[async_trait]
pub trait ForecastSource: Send + Sync + std::fmt::Debug {
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> std::result::Result<ForecastResult, ForecastFailure>;
}

/// Client for the HTTP prediction service.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpForecastClient {
    /// Create a client posting to `endpoint`; every call is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stockcast/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn round_trip(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        trace!("Posting forecast request to {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Prediction service responded");

        // A 404 only means an unknown ticker when the service says so; a bare
        // 404 is a wrong endpoint.
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| upstream_error(&value))
            {
                Some(message) => Err(ClientError::UnknownTicker(message)),
                None => Err(ClientError::Status(status.as_u16())),
            };
        }

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        if let Some(message) = upstream_error(&value) {
            return Err(ClientError::UnknownTicker(message));
        }

        let payload: ForecastPayload =
            serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(ForecastResult::from_payload(request, payload)?)
    }
}

/// Error carried by an otherwise successful body, e.g. `{"error": "No data found"}`.
fn upstream_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Bool(true) => Some("ticker not found".to_string()),
        _ => None,
    }
}

#[async_trait]
impl ForecastSource for HttpForecastClient {
    #[instrument(skip(self, request), fields(ticker = %request.ticker(), days = request.horizon_days()))]
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> std::result::Result<ForecastResult, ForecastFailure> {
        let result = self.round_trip(request).await?;
        info!(points = result.len(), "Forecast received");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use common::{FailureKind, ForecastRequestBody, Ticker};
    use serde_json::json;
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral port and return the forecast URL.
    async fn spawn_upstream(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/forecast", addr)
    }

    fn echo_payload(body: &ForecastRequestBody) -> Value {
        let dates: Vec<String> = (0..body.days)
            .map(|i| format!("2025-06-{:02}", i + 2))
            .collect();
        let forecast: Vec<f64> = (0..body.days).map(|i| 100.0 + i as f64).collect();
        json!({ "dates": dates, "forecast": forecast })
    }

    fn stable_upstream() -> Router {
        Router::new().route(
            "/forecast",
            post(|Json(body): Json<ForecastRequestBody>| async move { Json(echo_payload(&body)) }),
        )
    }

    fn request(ticker: &str, days: u32) -> ForecastRequest {
        ForecastRequest::new(Ticker::parse(ticker).unwrap(), days).unwrap()
    }

    fn client(url: String) -> HttpForecastClient {
        HttpForecastClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_forecast_is_normalized() {
        let url = spawn_upstream(stable_upstream()).await;

        let result = client(url).fetch_forecast(&request("aapl", 7)).await.unwrap();

        assert_eq!(result.ticker().as_str(), "AAPL");
        assert_eq!(result.len(), 7);
        assert_eq!(result.values().len(), 7);
        assert!(result.dates().windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn test_upstream_receives_ticker_and_days() {
        let router = Router::new().route(
            "/forecast",
            post(|Json(body): Json<ForecastRequestBody>| async move {
                assert_eq!(body.ticker, "MSFT");
                assert_eq!(body.days, 3);
                Json(echo_payload(&body))
            }),
        );
        let url = spawn_upstream(router).await;

        let result = client(url).fetch_forecast(&request("msft", 3)).await.unwrap();
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_not_found_status_maps_to_not_found() {
        let router = Router::new().route(
            "/forecast",
            post(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({ "error": "No data found for ticker: ZZZZ" })),
                )
            }),
        );
        let url = spawn_upstream(router).await;

        let failure = client(url).fetch_forecast(&request("ZZZZ", 7)).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.message, "No data found for ticker: ZZZZ");
    }

    #[tokio::test]
    async fn test_missing_route_maps_to_upstream_unreachable() {
        let router = Router::new().route("/other", post(|| async { "unrelated" }));
        let url = spawn_upstream(router).await;

        let failure = client(url).fetch_forecast(&request("AAPL", 7)).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::UpstreamUnreachable);
        assert!(failure.message.contains("404"), "{}", failure.message);
    }

    #[tokio::test]
    async fn test_not_found_with_html_body_maps_to_upstream_unreachable() {
        let router = Router::new().route(
            "/forecast",
            post(|| async { (AxumStatus::NOT_FOUND, "<html><body>Not Found</body></html>") }),
        );
        let url = spawn_upstream(router).await;

        let failure = client(url).fetch_forecast(&request("AAPL", 7)).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::UpstreamUnreachable);
    }

    #[tokio::test]
    async fn test_error_payload_with_ok_status_maps_to_not_found() {
        let router = Router::new().route(
            "/forecast",
            post(|| async { Json(json!({ "error": "unknown symbol" })) }),
        );
        let url = spawn_upstream(router).await;

        let failure = client(url).fetch_forecast(&request("ZZZZ", 7)).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_upstream_unreachable() {
        let router = Router::new().route(
            "/forecast",
            post(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "model crashed" })),
                )
            }),
        );
        let url = spawn_upstream(router).await;

        let failure = client(url).fetch_forecast(&request("AAPL", 7)).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::UpstreamUnreachable);
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_upstream_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let failure = client(format!("http://{}/forecast", addr))
            .fetch_forecast(&request("AAPL", 7))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::UpstreamUnreachable);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let router = Router::new().route(
            "/forecast",
            post(|Json(body): Json<ForecastRequestBody>| async move {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(echo_payload(&body))
            }),
        );
        let url = spawn_upstream(router).await;
        let client = HttpForecastClient::new(url, Duration::from_millis(200)).unwrap();

        let failure = client.fetch_forecast(&request("AAPL", 7)).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::UpstreamUnreachable);
    }

    #[tokio::test]
    async fn test_malformed_bodies_map_to_invalid_response() {
        let router = Router::new()
            .route(
                "/forecast",
                post(|| async {
                    Json(json!({ "dates": ["2025-06-02", "2025-06-03"], "forecast": [1.0] }))
                }),
            )
            .route("/missing", post(|| async { Json(json!({ "dates": [] })) }))
            .route("/text", post(|| async { "definitely not json" }));
        let url = spawn_upstream(router).await;
        let base = url.trim_end_matches("/forecast").to_string();

        let mismatched = client(url).fetch_forecast(&request("AAPL", 2)).await.unwrap_err();
        assert_eq!(mismatched.kind, FailureKind::InvalidResponse);

        let missing = client(format!("{}/missing", base))
            .fetch_forecast(&request("AAPL", 2))
            .await
            .unwrap_err();
        assert_eq!(missing.kind, FailureKind::InvalidResponse);

        let text = client(format!("{}/text", base))
            .fetch_forecast(&request("AAPL", 2))
            .await
            .unwrap_err();
        assert_eq!(text.kind, FailureKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_concurrent_requests_for_different_tickers() {
        let url = spawn_upstream(stable_upstream()).await;
        let client = client(url);
        let apple = request("AAPL", 7);
        let tesla = request("TSLA", 5);

        let (a, t) = tokio::join!(client.fetch_forecast(&apple), client.fetch_forecast(&tesla));

        let (a, t) = (a.unwrap(), t.unwrap());
        assert_eq!(a.ticker().as_str(), "AAPL");
        assert_eq!(a.len(), 7);
        assert_eq!(t.ticker().as_str(), "TSLA");
        assert_eq!(t.len(), 5);
    }
}
