use super::super::{Model, Msg};
use shared::AnalysisMode;
use yew::prelude::*;

pub fn render_mode_selector(model: &Model, ctx: &Context<Model>) -> Html {
    let active = model.session.mode();

    html! {
        <div class="mode-selector">
            { for AnalysisMode::all().map(|mode| html! {
                <label key={mode.to_string()}>
                    <input type="radio" name="analysis_mode"
                           value={mode.to_string()}
                           checked={mode == active}
                           onchange={ctx.link().callback(move |_| Msg::SelectMode(mode))} />
                    <span class="radio-label-text">{ format!(" {}", mode.title()) }</span>
                </label>
            }) }
        </div>
    }
}
