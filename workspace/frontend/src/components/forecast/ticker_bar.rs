use common::PRESET_TICKERS;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub selected: AttrValue,
    pub pending_input: AttrValue,
    pub on_select: Callback<String>,
    pub on_input: Callback<String>,
    pub on_submit: Callback<()>,
}

/// Preset ticker buttons plus the free-text search form.
#[function_component(TickerBar)]
pub fn ticker_bar(props: &Props) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <div class="flex flex-wrap justify-between items-center gap-4 mb-6">
            <div class="join">
                {for PRESET_TICKERS.iter().map(|ticker| {
                    let on_select = props.on_select.clone();
                    let ticker = ticker.to_string();
                    let active = props.selected.as_str() == ticker;
                    html! {
                        <button
                            class={classes!("btn", "join-item", active.then_some("btn-active"))}
                            onclick={Callback::from({
                                let ticker = ticker.clone();
                                move |_| on_select.emit(ticker.clone())
                            })}
                        >
                            {ticker}
                        </button>
                    }
                })}
            </div>
            <form class="join" {onsubmit}>
                <input
                    class="input input-bordered join-item"
                    type="text"
                    placeholder="Search ticker (e.g. NVDA)"
                    value={props.pending_input.clone()}
                    {oninput}
                />
                <button class="btn btn-primary join-item" type="submit">{"Search"}</button>
            </form>
        </div>
    }
}
