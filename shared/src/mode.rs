use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::TransportError;
use crate::result::{parse_object, PredictionResult, SoilResult, SummaryLine, VegetationResult};

/// Remote analysis capability targeted by a submission.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AnalysisMode {
    #[default]
    Vegetation,
    Soil,
}

/// One row of the mode table: where a mode is sent and how its answer is read.
pub struct ModeSpec {
    pub mode: AnalysisMode,
    pub title: &'static str,
    pub endpoint: &'static str,
    parse: fn(&[u8]) -> Result<PredictionResult, TransportError>,
    summarize: fn(&PredictionResult) -> Vec<SummaryLine>,
    output_image: fn(&PredictionResult) -> Option<&str>,
}

// Indexed by discriminant; keep rows in declaration order.
static MODES: [ModeSpec; 2] = [
    ModeSpec {
        mode: AnalysisMode::Vegetation,
        title: "Vegetation",
        endpoint: "/predict/vegetation",
        parse: parse_vegetation,
        summarize: summarize_vegetation,
        output_image: vegetation_image,
    },
    ModeSpec {
        mode: AnalysisMode::Soil,
        title: "Soil",
        endpoint: "/predict/soil",
        parse: parse_soil,
        summarize: summarize_soil,
        output_image: soil_image,
    },
];

impl AnalysisMode {
    pub fn spec(self) -> &'static ModeSpec {
        &MODES[self as usize]
    }

    pub fn endpoint(self) -> &'static str {
        self.spec().endpoint
    }

    pub fn title(self) -> &'static str {
        self.spec().title
    }

    pub fn all() -> impl Iterator<Item = AnalysisMode> {
        AnalysisMode::iter()
    }
}

impl ModeSpec {
    /// Reads a response body as this mode's result shape. Absent or mistyped
    /// fields read as blank; only a body that is not a JSON object fails.
    pub fn parse(&self, body: &[u8]) -> Result<PredictionResult, TransportError> {
        (self.parse)(body)
    }

    /// Summary lines for the panel. A result of another mode's shape yields
    /// nothing, the same as a result with every field missing.
    pub fn summarize(&self, result: &PredictionResult) -> Vec<SummaryLine> {
        (self.summarize)(result)
    }

    pub fn output_image<'a>(&self, result: &'a PredictionResult) -> Option<&'a str> {
        (self.output_image)(result)
    }
}

fn parse_vegetation(body: &[u8]) -> Result<PredictionResult, TransportError> {
    let result: VegetationResult = parse_object(body)?;
    Ok(PredictionResult::Vegetation(result))
}

fn parse_soil(body: &[u8]) -> Result<PredictionResult, TransportError> {
    let result: SoilResult = parse_object(body)?;
    Ok(PredictionResult::Soil(result))
}

fn summarize_vegetation(result: &PredictionResult) -> Vec<SummaryLine> {
    match result {
        PredictionResult::Vegetation(v) => v.summary(),
        _ => Vec::new(),
    }
}

fn summarize_soil(result: &PredictionResult) -> Vec<SummaryLine> {
    match result {
        PredictionResult::Soil(s) => s.summary(),
        _ => Vec::new(),
    }
}

fn vegetation_image(result: &PredictionResult) -> Option<&str> {
    match result {
        PredictionResult::Vegetation(v) => v.annotated_image.as_deref(),
        _ => None,
    }
}

fn soil_image(result: &PredictionResult) -> Option<&str> {
    match result {
        PredictionResult::Soil(s) => s.overlay_image.as_deref(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn table_rows_match_their_modes() {
        for mode in AnalysisMode::all() {
            assert_eq!(mode.spec().mode, mode);
        }
        assert_eq!(AnalysisMode::all().count(), MODES.len());
    }

    #[test]
    fn endpoints_per_mode() {
        assert_eq!(AnalysisMode::Vegetation.endpoint(), "/predict/vegetation");
        assert_eq!(AnalysisMode::Soil.endpoint(), "/predict/soil");
    }

    #[test]
    fn modes_parse_from_query_strings() {
        assert_eq!(AnalysisMode::from_str("soil"), Ok(AnalysisMode::Soil));
        assert_eq!(AnalysisMode::from_str("Vegetation"), Ok(AnalysisMode::Vegetation));
        assert!(AnalysisMode::from_str("water").is_err());
        assert_eq!(AnalysisMode::Soil.to_string(), "soil");
    }

    #[test]
    fn parse_picks_the_shape_of_the_mode() {
        let body = br#"{"coverage_pct": 10.0, "segments": 2, "processingTime": 0.5}"#;
        let parsed = AnalysisMode::Vegetation.spec().parse(body).unwrap();
        assert_eq!(parsed.mode(), AnalysisMode::Vegetation);

        let body = br#"{"boxes": []}"#;
        let parsed = AnalysisMode::Soil.spec().parse(body).unwrap();
        assert_eq!(parsed.mode(), AnalysisMode::Soil);
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = AnalysisMode::Soil.spec().parse(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn tolerant_bodies_still_settle() {
        let parsed = AnalysisMode::Soil
            .spec()
            .parse(br#"{"boxes": null, "overlay_png_b64": "iVBORw0KGgo="}"#)
            .unwrap();
        assert!(AnalysisMode::Soil.spec().summarize(&parsed).is_empty());
        assert_eq!(parsed.encoded_image(), Some("iVBORw0KGgo="));

        let parsed = AnalysisMode::Vegetation
            .spec()
            .parse(br#"{"coverage_pct": 42.5, "segments": 7.0, "processingTime": 1.23}"#)
            .unwrap();
        let lines: Vec<String> = AnalysisMode::Vegetation
            .spec()
            .summarize(&parsed)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, vec!["Coverage: 42.50%", "Segments: 7", "Processing Time: 1.23s"]);
    }

    #[test]
    fn json_array_body_is_malformed() {
        let err = AnalysisMode::Vegetation.spec().parse(b"[]").unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn mismatched_shape_summarizes_to_nothing() {
        let soil = AnalysisMode::Soil.spec().parse(br#"{"boxes": [{"label": "clay", "conf": 0.5}]}"#).unwrap();
        assert!(AnalysisMode::Vegetation.spec().summarize(&soil).is_empty());
        assert_eq!(AnalysisMode::Soil.spec().summarize(&soil).len(), 2);
    }
}
