use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::chart::ForecastChart;
use super::ticker_bar::TickerBar;
use crate::api_client::forecast::fetch_forecast;
use crate::common::error::ErrorDisplay;
use crate::common::loading::Loading;
use crate::controller::{Dispatch, ForecastController, ViewState};

const DISCLAIMER: &str =
    "Predictions are for informational purposes only and not financial advice.";

#[function_component(ForecastDashboard)]
pub fn forecast_dashboard() -> Html {
    let controller = use_mut_ref(ForecastController::default);
    let view = use_state(|| controller.borrow().state().clone());

    // Publishes the controller state and runs the gateway call, if any.
    let run = {
        let controller = controller.clone();
        let view = view.clone();
        Callback::from(move |dispatch: Option<Dispatch>| {
            view.set(controller.borrow().state().clone());
            if let Some(Dispatch { token, request }) = dispatch {
                let controller: Rc<RefCell<ForecastController>> = controller.clone();
                let view = view.clone();
                spawn_local(async move {
                    let outcome = fetch_forecast(&request).await;
                    let applied = controller.borrow_mut().resolve(token, outcome);
                    if applied {
                        view.set(controller.borrow().state().clone());
                    }
                });
            }
        })
    };

    {
        let controller = controller.clone();
        let run = run.clone();
        use_effect_with((), move |_| {
            log::debug!("Forecast dashboard mounted");
            let dispatch = controller.borrow_mut().mount();
            run.emit(dispatch);
            || ()
        });
    }

    let on_select = {
        let controller = controller.clone();
        let run = run.clone();
        Callback::from(move |ticker: String| {
            let dispatch = controller.borrow_mut().select_ticker(&ticker);
            run.emit(dispatch);
        })
    };

    let on_input = {
        let controller = controller.clone();
        let view = view.clone();
        Callback::from(move |raw: String| {
            controller.borrow_mut().update_input(&raw);
            view.set(controller.borrow().state().clone());
        })
    };

    let on_submit = {
        let controller = controller.clone();
        let run = run.clone();
        Callback::from(move |_: ()| {
            let dispatch = controller.borrow_mut().submit();
            run.emit(dispatch);
        })
    };

    let on_retry = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            let dispatch = controller.borrow_mut().retry();
            run.emit(dispatch);
        })
    };

    let state: &ViewState = &view;

    html! {
        <div class="container mx-auto p-6 max-w-5xl">
            <h1 class="text-3xl font-bold mb-6">{"Stock Price Forecast"}</h1>
            <TickerBar
                selected={state.selected_ticker.clone()}
                pending_input={state.pending_input.clone()}
                {on_select}
                {on_input}
                {on_submit}
            />
            {if state.is_loading {
                html! { <Loading text="Loading forecast..." /> }
            } else {
                html! {}
            }}
            {if let Some(message) = state.error_message() {
                html! { <ErrorDisplay {message} on_retry={Some(on_retry)} /> }
            } else {
                html! {}
            }}
            {if let Some(series) = state.chart_series() {
                html! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h3 class="card-title">{series.title.clone()}</h3>
                            <ForecastChart {series} />
                        </div>
                    </div>
                }
            } else {
                html! {}
            }}
            <footer class="text-center text-xs text-gray-500 mt-8">{DISCLAIMER}</footer>
        </div>
    }
}
