//! State machine behind the forecast dashboard.
//!
//! The controller owns the [`ViewState`] and never performs I/O itself. Each
//! transition that needs a forecast returns a [`Dispatch`]; the caller performs
//! the gateway call and hands the outcome back through
//! [`ForecastController::resolve`] together with the dispatch token. Only the
//! most recently dispatched token is accepted, so a slow answer for a ticker
//! the user already moved away from is dropped.

use common::{
    DATE_FORMAT, DEFAULT_HORIZON_DAYS, DEFAULT_TICKER, FailureKind, ForecastFailure,
    ForecastRequest, ForecastResult, RequestError, Ticker,
};

pub const NOT_FOUND_MESSAGE: &str = "Ticker not found. Please try another.";
pub const RETRY_MESSAGE: &str = "Could not load the forecast. Please try again.";

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected_ticker: String,
    pub pending_input: String,
    pub is_loading: bool,
    pub result: Option<ForecastResult>,
    pub failure: Option<ForecastFailure>,
}

impl ViewState {
    fn initial() -> Self {
        Self {
            selected_ticker: DEFAULT_TICKER.to_string(),
            pending_input: String::new(),
            is_loading: false,
            result: None,
            failure: None,
        }
    }

    /// User-facing copy for the current failure.
    pub fn error_message(&self) -> Option<&'static str> {
        self.failure.as_ref().map(|failure| match failure.kind {
            FailureKind::NotFound => NOT_FOUND_MESSAGE,
            FailureKind::UpstreamUnreachable | FailureKind::InvalidResponse => RETRY_MESSAGE,
        })
    }

    /// Chart data for the current result, if any.
    pub fn chart_series(&self) -> Option<ChartSeries> {
        self.result.as_ref().map(ChartSeries::from_result)
    }
}

/// A single labeled line keyed by date.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub label: String,
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn from_result(result: &ForecastResult) -> Self {
        let ticker = result.ticker().to_string();
        let (dates, values) = result
            .points()
            .map(|(date, value)| (date.format(DATE_FORMAT).to_string(), value))
            .unzip();
        Self {
            title: format!("{}-Day Forecast for {}", result.len(), ticker),
            label: ticker,
            dates,
            values,
        }
    }
}

/// Identifies one dispatched request; later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// A gateway call the caller has to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub token: RequestToken,
    pub request: ForecastRequest,
}

#[derive(Debug)]
pub struct ForecastController {
    state: ViewState,
    horizon_days: u32,
    last_token: u64,
    in_flight: Option<RequestToken>,
}

impl Default for ForecastController {
    fn default() -> Self {
        Self {
            state: ViewState::initial(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            last_token: 0,
            in_flight: None,
        }
    }
}

impl ForecastController {
    /// Controller requesting `horizon_days` days per forecast.
    pub fn with_horizon(horizon_days: u32) -> Result<Self, RequestError> {
        ForecastRequest::check_horizon(horizon_days)?;
        Ok(Self {
            horizon_days,
            ..Self::default()
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// First load with the default ticker.
    pub fn mount(&mut self) -> Option<Dispatch> {
        let ticker = self.state.selected_ticker.clone();
        self.select_ticker(&ticker)
    }

    /// Preset button or any other direct ticker choice.
    pub fn select_ticker(&mut self, raw: &str) -> Option<Dispatch> {
        match Ticker::parse(raw) {
            Ok(ticker) => self.dispatch(ticker),
            Err(e) => {
                log::debug!("Ignoring ticker '{}': {}", raw, e);
                None
            }
        }
    }

    /// Text typed into the search box; kept uppercased.
    pub fn update_input(&mut self, raw: &str) {
        self.state.pending_input = raw.to_uppercase();
    }

    /// Search form submission. Blank or unusable input is a no-op.
    pub fn submit(&mut self) -> Option<Dispatch> {
        let ticker = match Ticker::parse(&self.state.pending_input) {
            Ok(ticker) => ticker,
            Err(e) => {
                log::debug!("Submit ignored for '{}': {}", self.state.pending_input, e);
                return None;
            }
        };
        self.state.pending_input.clear();
        self.dispatch(ticker)
    }

    /// Re-issue the request for the selected ticker.
    pub fn retry(&mut self) -> Option<Dispatch> {
        self.mount()
    }

    /// Apply the outcome of `token`. Returns false when the token was
    /// superseded and the outcome was dropped.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<ForecastResult, ForecastFailure>,
    ) -> bool {
        if self.in_flight != Some(token) {
            log::debug!("Dropping stale forecast response {:?} (current {:?})", token, self.in_flight);
            return false;
        }

        self.in_flight = None;
        self.state.is_loading = false;
        match outcome {
            Ok(result) => {
                log::info!("Forecast for {} loaded ({} points)", result.ticker(), result.len());
                self.state.result = Some(result);
                self.state.failure = None;
            }
            Err(failure) => {
                log::warn!("Forecast for {} failed: {}", self.state.selected_ticker, failure);
                self.state.failure = Some(failure);
                self.state.result = None;
            }
        }
        true
    }

    fn dispatch(&mut self, ticker: Ticker) -> Option<Dispatch> {
        let request = match ForecastRequest::new(ticker, self.horizon_days) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Cannot build forecast request: {}", e);
                return None;
            }
        };

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.in_flight = Some(token);

        self.state.selected_ticker = request.ticker().to_string();
        self.state.is_loading = true;
        self.state.failure = None;

        log::debug!("Dispatching {:?} for {}", token, request.ticker());
        Some(Dispatch { token, request })
    }
}
