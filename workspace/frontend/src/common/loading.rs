use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    pub text: AttrValue,
}

/// Inline spinner shown while a forecast is in flight
#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex items-center justify-center gap-3 py-4" role="status" aria-live="polite">
            <span class="loading loading-spinner loading-md"></span>
            <p class="text-sm text-gray-500">{&props.text}</p>
        </div>
    }
}
