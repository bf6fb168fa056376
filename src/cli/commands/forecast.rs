use anyhow::{Context, Result};
use common::{ForecastRequest, ForecastResponse, Ticker};
use forecast::{ForecastSource, HttpForecastClient};
use tracing::{debug, error, info};

use crate::cli::UpstreamArgs;

/// Ask the prediction service for one forecast and print the gateway-shaped JSON.
///
/// A failure is printed as well and then returned, so the process exits non-zero.
pub async fn forecast_once(ticker: &str, days: u32, upstream: &UpstreamArgs) -> Result<()> {
    let ticker = Ticker::parse(ticker).with_context(|| format!("invalid ticker '{}'", ticker))?;
    let request = ForecastRequest::new(ticker, days).context("invalid forecast horizon")?;
    debug!("Requesting {} day forecast for {}", days, request.ticker());

    let client = HttpForecastClient::new(upstream.upstream_url.clone(), upstream.timeout())?;
    let outcome = client.fetch_forecast(&request).await;

    let failure = outcome.as_ref().err().cloned();
    let body = serde_json::to_string_pretty(&ForecastResponse::from(outcome))?;
    println!("{}", body);

    match failure {
        Some(failure) => {
            error!("Forecast for {} failed: {}", request.ticker(), failure);
            Err(failure.into())
        }
        None => {
            info!("Forecast for {} printed", request.ticker());
            Ok(())
        }
    }
}
