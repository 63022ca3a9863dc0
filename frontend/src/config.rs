use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use serde_json::{Map, Value};
use shared::ClientConfig;
use web_sys::UrlSearchParams;

const STORAGE_KEY: &str = "agroscope_config";

/// Defaults, then the build-time `AGROSCOPE_API_URL`, then whatever is
/// stored under `agroscope_config`, then `?api=` / `?mode=`.
pub fn load_config() -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Some(base) = option_env!("AGROSCOPE_API_URL") {
        config.override_api_base(base);
    }

    match LocalStorage::get::<Map<String, Value>>(STORAGE_KEY) {
        Ok(stored) => config = merge_stored(config, stored),
        Err(StorageError::KeyNotFound(_)) => {}
        Err(e) => log::warn!("Ignoring stored config: {}", e),
    }

    if let Some(params) = query_params() {
        if let Some(api) = params.get("api") {
            if config.override_api_base(&api) {
                log::info!("API base overridden from query: {}", config.api_base);
            }
        }
        if let Some(mode) = params.get("mode") {
            config.override_mode(&mode);
        }
    }

    config
}

// Only the keys present in storage replace the current values.
fn merge_stored(config: ClientConfig, stored: Map<String, Value>) -> ClientConfig {
    let mut merged = match serde_json::to_value(&config) {
        Ok(Value::Object(map)) => map,
        _ => return config,
    };
    merged.extend(stored);

    match serde_json::from_value(Value::Object(merged)) {
        Ok(config) => {
            log::info!("Loaded stored config from {}", STORAGE_KEY);
            config
        }
        Err(e) => {
            log::warn!("Ignoring stored config: {}", e);
            config
        }
    }
}

fn query_params() -> Option<UrlSearchParams> {
    let search = web_sys::window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()
}
