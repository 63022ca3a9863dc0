use derive_more::Display;
use thiserror::Error;

/// Why a dispatched prediction did not settle. Details go to the log only;
/// the user sees [`Notice::PredictionFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to build request: {0}")]
    Request(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Malformed(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("No image selected for analysis.")]
    NoImage,
    #[error("A prediction is already pending.")]
    AlreadyPending,
}

/// User-visible notices. Kept deliberately generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Notice {
    #[display(fmt = "Please upload an image first!")]
    NoImage,
    #[display(fmt = "Prediction failed. Check backend logs.")]
    PredictionFailed,
}
