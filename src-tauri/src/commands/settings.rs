use serde::Serialize;
use tauri::State;

use crate::core::{self, AppConfig};
use crate::state::AppState;

// ── Config & API Key ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInfo {
    #[serde(flatten)]
    pub config: AppConfig,
    pub has_api_key: bool,
}

#[tauri::command]
pub fn read_config(state: State<'_, AppState>) -> ConfigInfo {
    ConfigInfo {
        config: state.config.clone(),
        has_api_key: state.has_api_key,
    }
}

/// Store the identity service API key in the system keychain.  The key is
/// picked up on the next launch.
#[tauri::command]
pub fn save_api_key(key: &str) -> Result<(), String> {
    core::save_api_key(key).map_err(|e| e.to_string())
}

// ── Tests ───────────────────────────────────────────────────────────────────
