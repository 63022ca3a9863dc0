use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mode::AnalysisMode;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// What a mode switch does to a result that is already on screen.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModeSwitchPolicy {
    /// Leave the result visible so it can be compared across modes.
    #[default]
    KeepResult,
    ClearResult,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub default_mode: AnalysisMode,
    pub mode_switch: ModeSwitchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_mode: AnalysisMode::default(),
            mode_switch: ModeSwitchPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn endpoint_url(&self, mode: AnalysisMode) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), mode.endpoint())
    }

    /// Replaces the base address; blank values are ignored.
    pub fn override_api_base(&mut self, base: &str) -> bool {
        let base = base.trim();
        if base.is_empty() {
            return false;
        }
        self.api_base = base.to_string();
        true
    }

    pub fn override_mode(&mut self, raw: &str) -> bool {
        match AnalysisMode::from_str(raw.trim()) {
            Ok(mode) => {
                self.default_mode = mode;
                true
            }
            Err(_) => {
                log::warn!("Ignoring unknown analysis mode: {}", raw);
                false
            }
        }
    }
}
