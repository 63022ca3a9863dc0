use super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{AnalysisMode, PredictionResult, Ticket, TransportError};
use wasm_bindgen_futures::spawn_local;
use web_sys::FormData;
use yew::prelude::*;

/// Posts the image to `url` and reports back with the ticket it was sent
/// under. No timeout beyond what the browser applies.
pub fn send_prediction_request(ctx: &Context<Model>, url: String, ticket: Ticket, file: GlooFile) {
    let link = ctx.link().clone();

    spawn_local(async move {
        log::debug!("POST {} ({})", url, ticket.request_id());
        let outcome = request_prediction(&url, ticket.mode(), &file).await;
        link.send_message(Msg::PredictionSettled(ticket, outcome));
    });
}

async fn request_prediction(
    url: &str,
    mode: AnalysisMode,
    file: &GlooFile,
) -> Result<PredictionResult, TransportError> {
    let form_data =
        FormData::new().map_err(|e| TransportError::Request(format!("{:?}", e)))?;
    form_data
        .append_with_blob_and_filename("file", file.as_ref(), &file.name())
        .map_err(|e| TransportError::Request(format!("{:?}", e)))?;

    let response = Request::post(url)
        .body(form_data)
        .map_err(|e| TransportError::Request(e.to_string()))?
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status { status, body });
    }

    let body = response
        .binary()
        .await
        .map_err(|e| TransportError::Malformed(e.to_string()))?;
    mode.spec().parse(&body)
}
