use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use web_sys::FileList;
use yew::prelude::*;

/// Picker and drop both go through here, so they yield the same handle for
/// the same file. Extra files are ignored.
pub fn first_file(file_list: Option<FileList>) -> Option<GlooFile> {
    file_list?.item(0).map(GlooFile::from)
}

pub fn render_notice(model: &Model, ctx: &Context<Model>) -> Html {
    if let Some(notice) = model.session.notice() {
        html! {
            <div class="notice" role="alert">
                <p>{ notice.to_string() }</p>
                <button onclick={ctx.link().callback(|_| Msg::DismissNotice)}>{"Dismiss"}</button>
            </div>
        }
    } else {
        html! {}
    }
}
