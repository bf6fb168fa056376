use common::{ForecastFailure, ForecastRequest, ForecastResponse, ForecastResult};

/// Ask the gateway for a forecast.
pub async fn fetch_forecast(request: &ForecastRequest) -> Result<ForecastResult, ForecastFailure> {
    log::debug!(
        "Fetching {}-day forecast for {}",
        request.horizon_days(),
        request.ticker()
    );

    let response: ForecastResponse = super::post("/forecast", &request.to_body()).await?;
    let outcome = response.into_outcome(request);

    match &outcome {
        Ok(result) => log::info!("Received forecast for {} ({} points)", result.ticker(), result.len()),
        Err(failure) => log::warn!("Forecast for {} failed: {}", request.ticker(), failure),
    }
    outcome
}
