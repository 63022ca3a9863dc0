use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TransportError;
use crate::mode::AnalysisMode;

/// Answer of `/predict/vegetation`. Every field is optional; whatever the
/// backend leaves out, or sends with the wrong type, renders blank.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VegetationResult {
    #[serde(rename = "coverage_pct", deserialize_with = "lenient_number")]
    pub coverage_percent: Option<f64>,
    #[serde(rename = "segments", deserialize_with = "lenient_count")]
    pub segment_count: Option<u64>,
    #[serde(rename = "processingTime", deserialize_with = "lenient_number")]
    pub processing_time_seconds: Option<f64>,
    #[serde(rename = "annotated_png_b64", deserialize_with = "lenient_text")]
    pub annotated_image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SoilBox {
    #[serde(deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(rename = "conf", deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
}

/// Answer of `/predict/soil`. Only the first box is ever summarized; the
/// rest are kept as received.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SoilResult {
    #[serde(deserialize_with = "lenient_boxes")]
    pub boxes: Vec<SoilBox>,
    #[serde(rename = "overlay_png_b64", deserialize_with = "lenient_text")]
    pub overlay_image: Option<String>,
}

// Field readers: a value of the wrong JSON type reads as absent.

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

// Numpy backends send counts as floats (`7.0`).
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as u64)
    }))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_boxes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SoilBox>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Reads a response body as a JSON object. Anything else (HTML error pages,
/// arrays, bare scalars) is malformed; the fields themselves are read by the
/// lenient shapes above.
pub(crate) fn parse_object<T>(body: &[u8]) -> Result<T, TransportError>
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_slice::<Value>(body)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(TransportError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PredictionResult {
    Vegetation(VegetationResult),
    Soil(SoilResult),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl SummaryLine {
    fn new(label: &'static str, value: Option<String>) -> Self {
        Self {
            label,
            value: value.unwrap_or_default(),
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

impl VegetationResult {
    pub fn summary(&self) -> Vec<SummaryLine> {
        vec![
            SummaryLine::new("Coverage", self.coverage_percent.map(|c| format!("{c:.2}%"))),
            SummaryLine::new("Segments", self.segment_count.map(|n| n.to_string())),
            SummaryLine::new(
                "Processing Time",
                self.processing_time_seconds.map(|t| format!("{t}s")),
            ),
        ]
    }
}

impl SoilResult {
    pub fn summary(&self) -> Vec<SummaryLine> {
        let Some(first) = self.boxes.first() else {
            return Vec::new();
        };

        vec![
            SummaryLine::new("Label", first.label.clone()),
            SummaryLine::new(
                "Confidence",
                first.confidence.map(|c| format!("{:.2}%", c * 100.0)),
            ),
        ]
    }
}

impl PredictionResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            PredictionResult::Vegetation(_) => AnalysisMode::Vegetation,
            PredictionResult::Soil(_) => AnalysisMode::Soil,
        }
    }

    pub fn encoded_image(&self) -> Option<&str> {
        self.mode().spec().output_image(self)
    }

    /// Drops an encoded image that is not valid base64 so the output panel
    /// stays empty instead of showing a broken picture. Returns the decoded
    /// size when the image is kept.
    pub fn check_encoded_image(&mut self) -> Option<usize> {
        let slot = match self {
            PredictionResult::Vegetation(v) => &mut v.annotated_image,
            PredictionResult::Soil(s) => &mut s.overlay_image,
        };

        let encoded = slot.as_deref()?;
        match decode_image(encoded) {
            Ok(bytes) => {
                // Wrapped base64 is stored unwrapped so the data URL is one line.
                *slot = Some(STANDARD.encode(&bytes));
                Some(bytes.len())
            }
            Err(err) => {
                log::warn!("Discarding undecodable output image: {}", err);
                *slot = None;
                None
            }
        }
    }
}

/// Decodes standard base64, ignoring line breaks and other ASCII whitespace
/// (`base64.encodebytes` wraps at 76 columns).
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact)
}
