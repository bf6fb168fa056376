use crate::config::{initialize_app_state, GatewayConfig};
use crate::router::create_router;
use crate::schemas::AppState;
use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::{Duration as DateDuration, NaiveDate};
use common::{DATE_FORMAT, ForecastFailure, ForecastPayload, ForecastRequest, ForecastResult};
use forecast::ForecastSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// How the stub prediction service answers
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    Stable,
    NotFound,
    Unreachable,
    Invalid,
}

/// In-process stand-in for the prediction service client
#[derive(Debug)]
pub struct StubForecastSource {
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubForecastSource {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of requests that reached the stub
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastSource for StubForecastSource {
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResult, ForecastFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            StubBehavior::Stable => Ok(sample_result(request)),
            StubBehavior::NotFound => Err(ForecastFailure::not_found(format!(
                "No data found for ticker: {}",
                request.ticker()
            ))),
            StubBehavior::Unreachable => Err(ForecastFailure::upstream_unreachable(
                "Request to prediction service failed: connection refused",
            )),
            StubBehavior::Invalid => Err(ForecastFailure::invalid_response(
                "Invalid forecast: got 7 dates but 6 values",
            )),
        }
    }
}

/// Deterministic forecast with one point per requested day
pub fn sample_result(request: &ForecastRequest) -> ForecastResult {
    let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let days = request.horizon_days() as i64;
    let payload = ForecastPayload {
        ticker: None,
        dates: (0..days)
            .map(|i| (start + DateDuration::days(i)).format(DATE_FORMAT).to_string())
            .collect(),
        forecast: (0..days).map(|i| 180.0 + i as f64 * 0.5).collect(),
    };
    ForecastResult::from_payload(request, payload).expect("sample forecast must be valid")
}

/// Create AppState for testing
pub fn setup_test_app_state(source: Arc<dyn ForecastSource>) -> AppState {
    AppState {
        forecast: source,
        upstream_url: "http://prediction.test/forecast".to_string(),
        upstream_timeout: Duration::from_secs(2),
    }
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from RUST_LOG and defaults to WARN.
fn init_test_tracing() {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| match level.to_uppercase().as_str() {
            "ERROR" => Some(Level::ERROR),
            "WARN" => Some(Level::WARN),
            "INFO" => Some(Level::INFO),
            "DEBUG" => Some(Level::DEBUG),
            "TRACE" => Some(Level::TRACE),
            _ => None,
        })
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    // Another test may have installed it already
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Create axum app for testing
pub fn setup_test_app(source: Arc<dyn ForecastSource>) -> Router {
    init_test_tracing();
    create_router(setup_test_app_state(source), &[])
}

/// Test server backed by a stub with the given behavior
pub fn setup_test_server(behavior: StubBehavior) -> (TestServer, Arc<StubForecastSource>) {
    let stub = StubForecastSource::new(behavior);
    let server = TestServer::new(setup_test_app(stub.clone())).unwrap();
    (server, stub)
}

/// Serve `router` as a prediction service on an ephemeral port; returns its forecast URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/forecast", addr)
}

/// Test server wired to the real HTTP client, talking to `upstream_url`
pub fn setup_live_server(upstream_url: String) -> TestServer {
    init_test_tracing();
    let config = GatewayConfig {
        bind_address: "127.0.0.1:0".to_string(),
        upstream_url,
        upstream_timeout: Duration::from_secs(2),
        allowed_origins: Vec::new(),
    };
    let state = initialize_app_state(&config).unwrap();
    TestServer::new(create_router(state, &config.allowed_origins)).unwrap()
}
