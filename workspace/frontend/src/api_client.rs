pub mod forecast;

use common::ForecastFailure;
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::AbortController;

use crate::settings;

/// POST `body` to the gateway and decode the answer.
///
/// The gateway reports failures as JSON with a non-2xx status, so the body is
/// decoded regardless of status. The call is aborted once the configured
/// request timeout elapses.
pub async fn post<T, B>(endpoint: &str, body: &B) -> Result<T, ForecastFailure>
where
    T: DeserializeOwned,
    B: Serialize,
{
    let settings = settings::get_settings();
    let url = settings.api_url(endpoint);
    log::debug!("POST request to: {}", url);

    let abort = AbortController::new().ok();
    let signal = abort.as_ref().map(|controller| controller.signal());
    // Dropping the timeout cancels it, so it lives until this call returns.
    let _deadline = abort.map(|controller| {
        let endpoint = endpoint.to_string();
        Timeout::new(settings.request_timeout_ms, move || {
            log::warn!("POST {} - Aborting after timeout", endpoint);
            controller.abort();
        })
    });

    let response = Request::post(&url)
        .abort_signal(signal.as_ref())
        .json(body)
        .map_err(|e| {
            let error_msg = format!("Failed to serialize request: {}", e);
            log::error!("POST {} - {}", endpoint, error_msg);
            ForecastFailure::invalid_response(error_msg)
        })?
        .send()
        .await
        .map_err(|e| {
            let error_msg = format!("Request failed: {}", e);
            log::error!("POST {} - {}", endpoint, error_msg);
            ForecastFailure::upstream_unreachable(error_msg)
        })?;

    let status = response.status();
    if !response.ok() {
        log::warn!("POST {} - Non-OK response: {}", endpoint, status);
    }

    let text = response.text().await.map_err(|e| {
        let error_msg = format!("Failed to read response: {}", e);
        log::error!("POST {} - {}", endpoint, error_msg);
        ForecastFailure::upstream_unreachable(error_msg)
    })?;

    log::trace!("POST {} - Response received, parsing JSON", endpoint);
    decode_body(status, &text).map_err(|failure| {
        log::error!("POST {} - {}", endpoint, failure);
        failure
    })
}

/// Decode a gateway body. Bodies that are not JSON count as an unreachable
/// gateway when the status already says so.
fn decode_body<T: DeserializeOwned>(status: u16, text: &str) -> Result<T, ForecastFailure> {
    serde_json::from_str(text).map_err(|e| {
        if (200..300).contains(&status) {
            ForecastFailure::invalid_response(format!("Failed to parse response: {}", e))
        } else {
            ForecastFailure::upstream_unreachable(format!("HTTP error: {}", status))
        }
    })
}
