use super::super::Model;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(view) = model.session.result_view() else {
        return html! {};
    };

    html! {
        <div class={classes!("results-container", format!("result-{}", model.session.mode()))}>
            <h3>{"Prediction Results"}</h3>
            <hr />
            { for view.summary.iter().map(|line| html! {
                <p><b>{ format!("{}:", line.label) }</b>{ format!(" {}", line.value) }</p>
            }) }
        </div>
    }
}
