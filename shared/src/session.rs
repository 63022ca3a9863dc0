//! Single-session state of the analyzer client.
//!
//! `Session` owns the selected image, the active mode and the lifecycle of
//! the one request that may be in flight. Every user or network event maps
//! to one method; the caller performs the side effects the method asks for
//! (sending the request described by a [`Ticket`]) and feeds completions back
//! through [`Session::complete`].

use strum_macros::Display;
use uuid::Uuid;

use crate::config::{ClientConfig, ModeSwitchPolicy};
use crate::error::{Notice, SubmitError, TransportError};
use crate::mode::AnalysisMode;
use crate::result::PredictionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AcquireSource {
    #[strum(serialize = "file picker")]
    Picker,
    #[strum(serialize = "drag and drop")]
    Drop,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Settled(PredictionResult),
    Failed(TransportError),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Settled(result) => Some(result),
            _ => None,
        }
    }
}

/// Captured when a request is dispatched and handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    sequence: u64,
    mode: AnalysisMode,
    request_id: Uuid,
}

impl Ticket {
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The outstanding request answered, but for an image that has since
    /// been replaced. The reply is dropped and submitting is possible again.
    Superseded,
    /// Not the outstanding request at all.
    Stale,
}

pub struct Session<I> {
    image: Option<I>,
    mode: AnalysisMode,
    mode_switch: ModeSwitchPolicy,
    request: RequestState,
    generation: u64,
    sequence: u64,
    // The open HTTP request, if any. Survives acquisitions until it answers.
    in_flight: Option<Ticket>,
    notice: Option<Notice>,
}

impl<I> Session<I> {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            image: None,
            mode: config.default_mode,
            mode_switch: config.mode_switch,
            request: RequestState::Idle,
            generation: 0,
            sequence: 0,
            in_flight: None,
            notice: None,
        }
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    /// True while any request is open, including one whose image has been
    /// replaced. Submitting is refused until it answers.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Bumped on every acquisition; responses computed for an older
    /// generation are never applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the selected image with the first file of a picker or drop
    /// event. An empty event changes nothing. The previous image is dropped
    /// here, which releases its preview.
    pub fn acquire(&mut self, source: AcquireSource, file: Option<I>) -> bool {
        let Some(file) = file else {
            log::debug!("No file in {} event, ignoring", source);
            return false;
        };

        self.image = Some(file);
        self.generation += 1;
        self.request = RequestState::Idle;
        self.notice = None;

        log::info!("Image acquired via {} (generation {})", source, self.generation);
        if let Some(ticket) = &self.in_flight {
            log::debug!("Prediction {} is now outstanding for a replaced image", ticket.request_id);
        }
        true
    }

    pub fn select_mode(&mut self, mode: AnalysisMode) -> bool {
        if self.mode == mode {
            return false;
        }

        self.mode = mode;
        if self.mode_switch == ModeSwitchPolicy::ClearResult
            && matches!(self.request, RequestState::Settled(_) | RequestState::Failed(_))
        {
            self.request = RequestState::Idle;
        }

        log::debug!("Analysis mode set to {}", mode);
        true
    }

    /// Starts a request for the current image and mode. The returned ticket
    /// describes what to send; nothing is sent when an error is returned.
    pub fn submit(&mut self) -> Result<Ticket, SubmitError> {
        if self.image.is_none() {
            self.notice = Some(Notice::NoImage);
            return Err(SubmitError::NoImage);
        }
        if self.is_busy() {
            return Err(SubmitError::AlreadyPending);
        }

        self.sequence += 1;
        let ticket = Ticket {
            generation: self.generation,
            sequence: self.sequence,
            mode: self.mode,
            request_id: Uuid::new_v4(),
        };

        self.request = RequestState::Pending;
        self.notice = None;
        self.in_flight = Some(ticket.clone());

        log::info!(
            "Dispatching {} prediction {} to {}",
            ticket.mode,
            ticket.request_id,
            ticket.mode.endpoint()
        );
        Ok(ticket)
    }

    /// Applies the outcome of the outstanding request, unless its image has
    /// been replaced since the ticket was issued.
    pub fn complete(
        &mut self,
        ticket: &Ticket,
        outcome: Result<PredictionResult, TransportError>,
    ) -> Completion {
        if self.in_flight.as_ref() != Some(ticket) {
            log::warn!(
                "Discarding stale response {} (generation {}, current {})",
                ticket.request_id,
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        if ticket.generation != self.generation {
            log::warn!(
                "Discarding response {} for replaced image (generation {}, current {})",
                ticket.request_id,
                ticket.generation,
                self.generation
            );
            return Completion::Superseded;
        }

        match outcome {
            Ok(mut result) => {
                if let Some(size) = result.check_encoded_image() {
                    log::debug!("Output image of {} bytes", size);
                }
                log::info!("Prediction {} settled", ticket.request_id);
                self.request = RequestState::Settled(result);
            }
            Err(err) => {
                log::error!("Prediction {} failed: {}", ticket.request_id, err);
                self.request = RequestState::Failed(err);
                self.notice = Some(Notice::PredictionFailed);
            }
        }

        Completion::Applied
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{SoilBox, SoilResult, VegetationResult};

    #[derive(Debug, Clone, PartialEq)]
    struct TestImage {
        name: &'static str,
        bytes: Vec<u8>,
    }

    fn image(name: &'static str) -> TestImage {
        TestImage {
            name,
            bytes: name.as_bytes().to_vec(),
        }
    }

    fn session() -> Session<TestImage> {
        Session::new(&ClientConfig::default())
    }

    fn vegetation() -> PredictionResult {
        PredictionResult::Vegetation(VegetationResult {
            coverage_percent: Some(42.5),
            segment_count: Some(7),
            processing_time_seconds: Some(1.23),
            annotated_image: None,
        })
    }

    fn soil() -> PredictionResult {
        PredictionResult::Soil(SoilResult {
            boxes: vec![SoilBox {
                label: Some("clay".into()),
                confidence: Some(0.876),
            }],
            overlay_image: None,
        })
    }

    #[test]
    fn picker_and_drop_produce_the_same_state() {
        let mut picked = session();
        let mut dropped = session();

        assert!(picked.acquire(AcquireSource::Picker, Some(image("field.png"))));
        assert!(dropped.acquire(AcquireSource::Drop, Some(image("field.png"))));

        assert_eq!(picked.image(), dropped.image());
        assert_eq!(picked.generation(), dropped.generation());
        assert_eq!(picked.request(), dropped.request());
        assert_eq!(picked.notice(), dropped.notice());
    }

    #[test]
    fn empty_event_is_a_no_op() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));

        assert!(!session.acquire(AcquireSource::Drop, None));
        assert_eq!(session.image().map(|i| i.name), Some("a.png"));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn new_image_clears_live_result() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();
        session.complete(&ticket, Ok(vegetation()));
        assert!(session.request().result().is_some());

        session.acquire(AcquireSource::Drop, Some(image("b.png")));
        assert_eq!(session.request(), &RequestState::Idle);
        assert_eq!(session.image().map(|i| i.bytes.clone()), Some(b"b.png".to_vec()));
    }

    #[test]
    fn submit_without_image_sends_nothing() {
        let mut session = session();

        assert_eq!(session.submit(), Err(SubmitError::NoImage));
        assert_eq!(session.request(), &RequestState::Idle);
        assert_eq!(session.notice(), Some(Notice::NoImage));
    }

    #[test]
    fn submit_without_image_keeps_previous_state() {
        let mut session: Session<TestImage> = session();
        assert_eq!(session.submit(), Err(SubmitError::NoImage));
        assert!(session.dismiss_notice());
        assert!(!session.dismiss_notice());
        assert_eq!(session.request(), &RequestState::Idle);
    }

    #[test]
    fn second_submit_while_pending_is_ignored() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));

        let first = session.submit();
        let second = session.submit();

        assert!(first.is_ok());
        assert_eq!(second, Err(SubmitError::AlreadyPending));
        assert!(session.is_pending());
    }

    #[test]
    fn mode_switch_keeps_image_and_result_by_default() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();
        session.complete(&ticket, Ok(vegetation()));

        assert!(session.select_mode(AnalysisMode::Soil));
        assert!(!session.select_mode(AnalysisMode::Soil));
        assert_eq!(session.image().map(|i| i.name), Some("a.png"));
        assert_eq!(session.request().result(), Some(&vegetation()));
    }

    #[test]
    fn clear_result_policy_drops_result_but_not_image() {
        let config = ClientConfig {
            mode_switch: ModeSwitchPolicy::ClearResult,
            ..ClientConfig::default()
        };
        let mut session = Session::new(&config);
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();
        session.complete(&ticket, Ok(vegetation()));

        session.select_mode(AnalysisMode::Soil);
        assert_eq!(session.request(), &RequestState::Idle);
        assert!(session.image().is_some());
    }

    #[test]
    fn mode_switch_while_pending_keeps_dispatch_mode() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();

        session.select_mode(AnalysisMode::Soil);
        assert!(session.is_pending());
        assert_eq!(ticket.mode(), AnalysisMode::Vegetation);
        assert_eq!(session.complete(&ticket, Ok(vegetation())), Completion::Applied);
    }

    #[test]
    fn ticket_uses_mode_at_submit() {
        let mut session = session();
        session.select_mode(AnalysisMode::Soil);
        session.acquire(AcquireSource::Drop, Some(image("a.png")));

        let ticket = session.submit().unwrap();
        assert_eq!(ticket.mode(), AnalysisMode::Soil);
        assert_eq!(ticket.generation(), 1);
    }

    #[test]
    fn success_settles() {
        let mut session = session();
        session.select_mode(AnalysisMode::Soil);
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();

        assert_eq!(session.complete(&ticket, Ok(soil())), Completion::Applied);
        assert_eq!(session.request(), &RequestState::Settled(soil()));
        assert_eq!(session.notice(), None);
    }

    #[test]
    fn failure_is_terminal_and_notified() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let ticket = session.submit().unwrap();

        let err = TransportError::Network("connection refused".into());
        session.complete(&ticket, Err(err.clone()));

        assert_eq!(session.request(), &RequestState::Failed(err));
        assert_eq!(session.notice(), Some(Notice::PredictionFailed));
        assert!(session.image().is_some());

        // retry is a fresh submit
        assert!(session.submit().is_ok());
        assert_eq!(session.notice(), None);
    }

    #[test]
    fn response_after_new_image_is_discarded() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let old = session.submit().unwrap();

        session.acquire(AcquireSource::Drop, Some(image("b.png")));
        assert_eq!(session.complete(&old, Ok(vegetation())), Completion::Superseded);
        assert_eq!(session.request(), &RequestState::Idle);
        assert!(!session.is_busy());
    }

    #[test]
    fn new_image_while_pending_blocks_a_second_request() {
        let mut session = session();
        session.acquire(AcquireSource::Picker, Some(image("a.png")));
        let old = session.submit().unwrap();

        session.acquire(AcquireSource::Picker, Some(image("b.png")));
        assert_eq!(session.request(), &RequestState::Idle);
        assert!(session.is_busy());
        assert_eq!(session.submit(), Err(SubmitError::AlreadyPending));
        assert_eq!(session.submit_label(), "Processing...");

        assert_eq!(
            session.complete(&old, Err(TransportError::Network("reset".into()))),
            Completion::Superseded
        );
        assert_eq!(session.request(), &RequestState::Idle);
        assert_eq!(session.notice(), None);

        let current = session.submit().unwrap();
        assert_eq!(current.generation(), 2);
        assert_eq!(session.complete(&current, Ok(vegetation())), Completion::Applied);
        assert_eq!(session.complete(&current, Ok(vegetation())), Completion::Stale);
    }
}
