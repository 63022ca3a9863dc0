use yew::prelude::*;

pub fn render_header() -> Html {
    html! {
        <header>
            <h1>{"🌿 Vegetation and Soil Analyzer"}</h1>
            <p class="subtitle">{"Upload an image and get a prediction"}</p>
        </header>
    }
}
