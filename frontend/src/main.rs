mod api;
mod components;
mod config;

use components::handlers;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{AnalysisMode, ClientConfig, PredictionResult, Session, Ticket, TransportError};
use web_sys::DragEvent;
use yew::prelude::*;

// Models
struct SelectedImage {
    file: GlooFile,
    // Revoked on drop, so replacing the image releases the old preview.
    preview_url: ObjectUrl,
}

impl From<GlooFile> for SelectedImage {
    fn from(file: GlooFile) -> Self {
        let preview_url = ObjectUrl::from(file.clone());
        Self { file, preview_url }
    }
}

// Yew msg components
enum Msg {
    // Acquisition
    FileSelected(Option<GlooFile>),
    HandleDrop(DragEvent),
    SetDragging(bool),

    // Submission
    SelectMode(AnalysisMode),
    Submit,
    PredictionSettled(Ticket, Result<PredictionResult, TransportError>),

    // UI states
    DismissNotice,
}

// Main component
struct Model {
    session: Session<SelectedImage>,
    config: ClientConfig,
    is_dragging: bool,
    _drag_guards: Vec<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let config = config::load_config();
        log::info!(
            "Analyzer client targeting {} (mode: {})",
            config.api_base,
            config.default_mode
        );

        Self {
            session: Session::new(&config),
            config,
            is_dragging: false,
            _drag_guards: window_drag_guards(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Acquisition
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, event),
            Msg::SetDragging(is_dragging) => {
                let changed = self.is_dragging != is_dragging;
                self.is_dragging = is_dragging;
                changed
            }

            // Submission
            Msg::SelectMode(mode) => self.session.select_mode(mode),
            Msg::Submit => handlers::handle_submit(self, ctx),
            Msg::PredictionSettled(ticket, outcome) => {
                handlers::handle_prediction_settled(self, ticket, outcome)
            }

            // UI states
            Msg::DismissNotice => self.session.dismiss_notice(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let mode_class = format!("mode-{}", self.session.mode());

        html! {
            <div class={classes!("container", mode_class)}>
                { components::header::render_header() }

                <main class="main-content">
                { components::mode_selector::render_mode_selector(self, ctx) }
                { components::upload_section::render_upload_section(self, ctx) }
                { components::utils::render_notice(self, ctx) }
                { components::preview_area::render_preview_area(self) }
                { components::results::render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>
                        {"A project developed as part of Infosys Springboard Internship 6.0"}
                        <br />
                        {"Nihal Bathini"}
                    </p>
                </footer>
            </div>
        }
    }
}

// A file released outside the drop zone would otherwise make the browser
// navigate away from the app.
fn window_drag_guards() -> Vec<EventListener> {
    let Some(window) = web_sys::window() else {
        log::warn!("No global window, drag guards not installed");
        return Vec::new();
    };

    ["dragover", "drop"]
        .into_iter()
        .map(|event_type| {
            EventListener::new_with_options(
                &window,
                event_type,
                EventListenerOptions::enable_prevent_default(),
                |event| event.prevent_default(),
            )
        })
        .collect()
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
