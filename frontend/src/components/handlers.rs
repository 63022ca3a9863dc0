use super::super::{Model, SelectedImage};
use super::utils::first_file;
use crate::api::send_prediction_request;
use gloo_file::File as GlooFile;
use shared::{AcquireSource, Completion, PredictionResult, SubmitError, Ticket, TransportError};
use web_sys::DragEvent;
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, file: Option<GlooFile>) -> bool {
    acquire(model, AcquireSource::Picker, file)
}

pub fn handle_drop(model: &mut Model, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = first_file(event.data_transfer().and_then(|dt| dt.files()));
    acquire(model, AcquireSource::Drop, file);
    true
}

fn acquire(model: &mut Model, source: AcquireSource, file: Option<GlooFile>) -> bool {
    if let Some(file) = &file {
        log::info!("Selected {} ({} bytes) via {}", file.name(), file.size(), source);
    }
    model
        .session
        .acquire(source, file.map(SelectedImage::from))
}

pub fn handle_submit(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.session.submit() {
        Ok(ticket) => {
            if let Some(image) = model.session.image() {
                let url = model.config.endpoint_url(ticket.mode());
                send_prediction_request(ctx, url, ticket, image.file.clone());
            }
            true
        }
        Err(SubmitError::NoImage) => {
            log::warn!("Submit requested with no image selected");
            true
        }
        Err(SubmitError::AlreadyPending) => false,
    }
}

pub fn handle_prediction_settled(
    model: &mut Model,
    ticket: Ticket,
    outcome: Result<PredictionResult, TransportError>,
) -> bool {
    match model.session.complete(&ticket, outcome) {
        // Superseded re-enables the submit button.
        Completion::Applied | Completion::Superseded => true,
        Completion::Stale => false,
    }
}
