use crate::mode::AnalysisMode;
use crate::result::{PredictionResult, SummaryLine};
use crate::session::Session;

/// What the result panels show for the live result under the active mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    pub summary: Vec<SummaryLine>,
    pub output_image: Option<&'a str>,
}

impl<'a> ResultView<'a> {
    pub fn of(result: &'a PredictionResult, mode: AnalysisMode) -> Self {
        let spec = mode.spec();
        Self {
            summary: spec.summarize(result),
            output_image: spec.output_image(result),
        }
    }
}

pub fn data_url(encoded_png: &str) -> String {
    format!("data:image/png;base64,{}", encoded_png.trim())
}

impl<I> Session<I> {
    pub fn result_view(&self) -> Option<ResultView<'_>> {
        self.request()
            .result()
            .map(|result| ResultView::of(result, self.mode()))
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            "Processing..."
        } else {
            "Run Prediction"
        }
    }
}
