use anyhow::Result;
use forecast::HttpForecastClient;
use std::sync::Arc;
use std::time::Duration;
use crate::schemas::AppState;

/// Settings of the gateway process
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Prediction service endpoint
    pub upstream_url: String,
    /// Bound on a single prediction call
    pub upstream_timeout: Duration,
    /// Origins allowed by CORS; empty means any
    pub allowed_origins: Vec<String>,
}

/// Load `.env` into the process environment so clap `env` fallbacks see it
pub fn load_environment() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(_) => tracing::trace!("No .env file found"),
    }
}

/// Initialize application state from configuration
pub fn initialize_app_state(config: &GatewayConfig) -> Result<AppState> {
    tracing::info!(
        "Using prediction service at {} (timeout {:?})",
        config.upstream_url,
        config.upstream_timeout
    );
    let client = HttpForecastClient::new(config.upstream_url.clone(), config.upstream_timeout)?;

    Ok(AppState {
        upstream_url: client.endpoint().to_string(),
        forecast: Arc::new(client),
        upstream_timeout: config.upstream_timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_reports_client_endpoint() {
        let config = GatewayConfig {
            bind_address: "127.0.0.1:0".to_string(),
            upstream_url: "http://prediction.test/forecast".to_string(),
            upstream_timeout: Duration::from_secs(3),
            allowed_origins: Vec::new(),
        };

        let state = initialize_app_state(&config).unwrap();

        assert_eq!(state.upstream_url, "http://prediction.test/forecast");
        assert_eq!(state.upstream_timeout, Duration::from_secs(3));
    }
}
