use plotly::common::{Fill, Line, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Scatter};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::controller::ChartSeries;

const CHART_DIV_ID: &str = "forecast-chart";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    fn newPlot(div_id: &str, data: JsValue, layout: JsValue);
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub series: ChartSeries,
}

/// Line chart of the forecast values keyed by date.
#[function_component(ForecastChart)]
pub fn forecast_chart(props: &Props) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.series.clone()),
        move |(container_ref, series)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(CHART_DIV_ID);
                match plot_arguments(series) {
                    Ok((data, layout)) => newPlot(CHART_DIV_ID, data, layout),
                    Err(e) => log::error!("Failed to render forecast chart: {:?}", e),
                }
            }
            || ()
        },
    );

    html! {
        <div ref={container_ref} style="width:100%; height:400px;"></div>
    }
}

fn trace_for(series: &ChartSeries) -> Box<Scatter<String, f64>> {
    Scatter::new(series.dates.clone(), series.values.clone())
        .mode(Mode::LinesMarkers)
        .name(&series.label)
        .fill(Fill::ToZeroY)
        .line(Line::new().color("rgb(59, 130, 246)").width(2.0))
}

fn layout_for(series: &ChartSeries) -> Layout {
    Layout::new()
        .title(Title::with_text(&series.title))
        .x_axis(Axis::new().title(Title::with_text("Date")))
        .y_axis(Axis::new().title(Title::with_text("Predicted Close")))
        .height(400)
}

fn plot_arguments(series: &ChartSeries) -> Result<(JsValue, JsValue), JsValue> {
    let trace_json = serde_json::to_string(&trace_for(series))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let layout_json = serde_json::to_string(&layout_for(series))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let data = js_sys::Array::new();
    data.push(&js_sys::JSON::parse(&trace_json)?);
    let layout = js_sys::JSON::parse(&layout_json)?;
    Ok((data.into(), layout))
}
