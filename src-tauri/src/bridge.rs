use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tracing::warn;

use crate::core::{AdapterError, AppConfig, ProfileSnapshot, ProfileView, SignRequest};
use crate::state::AppState;

// ── Webview Events ───────────────────────────────────────────────────────────

/// Carries a [`ProfileView`] after every controller state change.
pub const PROFILE_EVENT: &str = "profile://changed";
/// Carries `{ color }`; the webview assigns it to `document.body.style.background`.
pub const BACKGROUND_EVENT: &str = "ui://background";
/// Carries a [`SignRequest`]; answered with the `wallet_signature` command.
pub const SIGN_REQUEST_EVENT: &str = "wallet://sign-request";

#[derive(Debug, Clone, Serialize)]
struct BackgroundPayload<'a> {
    color: &'a str,
}

/// Build the app state with every outward effect routed to the webview.
pub fn build_state(
    app: &AppHandle,
    config: AppConfig,
    api_key: Option<String>,
) -> Result<AppState, AdapterError> {
    let sign_app = app.clone();
    let background_app = app.clone();
    let view_app = app.clone();

    AppState::new(
        config,
        api_key,
        move |request: &SignRequest| {
            sign_app
                .emit(SIGN_REQUEST_EVENT, request)
                .map_err(|e| e.to_string())
        },
        move |color: &str| {
            if let Err(e) = background_app.emit(BACKGROUND_EVENT, BackgroundPayload { color }) {
                warn!("failed to emit background change: {e}");
            }
        },
        Arc::new(move |snapshot: &ProfileSnapshot| {
            if let Err(e) = view_app.emit(PROFILE_EVENT, ProfileView::from(snapshot)) {
                warn!("failed to emit profile view: {e}");
            }
        }),
    )
}
