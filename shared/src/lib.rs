//! Target-independent core of the analyzer client.
//!
//! Everything here compiles natively so the session state machine can be
//! tested without a browser; the `frontend` crate wires it to the DOM.

pub mod config;
pub mod error;
pub mod mode;
pub mod result;
pub mod session;
pub mod view;

pub use config::{ClientConfig, ModeSwitchPolicy, DEFAULT_API_BASE};
pub use error::{Notice, SubmitError, TransportError};
pub use mode::{AnalysisMode, ModeSpec};
pub use result::{PredictionResult, SoilBox, SoilResult, SummaryLine, VegetationResult};
pub use session::{AcquireSource, Completion, RequestState, Session, Ticket};
pub use view::{data_url, ResultView};
