use super::super::Model;
use shared::data_url;
use yew::prelude::*;

pub fn render_preview_area(model: &Model) -> Html {
    let input = model.session.image();
    let output = model
        .session
        .result_view()
        .and_then(|view| view.output_image)
        .map(data_url);

    if input.is_none() && output.is_none() {
        return html! {};
    }

    html! {
        <div class="image-panels">
            {
                if let Some(image) = input {
                    html! {
                        <div class="input-panel">
                            <h3>{"Input Image"}</h3>
                            <img src={image.preview_url.to_string()} alt={image.file.name()} />
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(src) = output {
                    html! {
                        <div class="output-panel">
                            <h3>{"Output Image"}</h3>
                            <img {src} alt="Result" />
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
