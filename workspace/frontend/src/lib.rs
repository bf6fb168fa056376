use yew::prelude::*;

mod components;
pub mod api_client;
pub mod common;
pub mod controller;
pub mod settings;

use components::forecast::ForecastDashboard;

#[function_component(App)]
pub fn app() -> Html {
    html! { <ForecastDashboard /> }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Stockcast Frontend Starting ===");
    log::info!("Application settings: {:?}", settings);
    log::debug!("API base URL: {}", settings.api_base_url());

    yew::Renderer::<App>::new().render();
    log::info!("Application initialized successfully");
}
