use tauri::State;

use crate::core::{Connector, ProfileView, WalletStatus};
use crate::state::AppState;

// ── Wallet ───────────────────────────────────────────────────────────────────

/// Called by the webview whenever the wallet widget reports a new account or
/// connectivity state.  A newly seen address is loaded before returning.
#[tauri::command]
pub async fn wallet_changed(
    state: State<'_, AppState>,
    status: WalletStatus,
) -> Result<ProfileView, String> {
    if status.address().is_some() {
        state.connector.select(Connector::Webview);
    }
    state.controller.wallet_changed(status).await;
    Ok(ProfileView::from(&state.controller.snapshot()))
}

/// Connect through the JSON-RPC wallet configured in `wallet_rpc_url`, for
/// windows that have no injected provider.  The first account becomes the
/// connected address and signs the sign-in message.
#[tauri::command]
pub async fn connect_rpc_wallet(state: State<'_, AppState>) -> Result<ProfileView, String> {
    let accounts = state
        .rpc_wallet
        .request_accounts()
        .await
        .map_err(|e| e.to_string())?;
    let address = accounts
        .into_iter()
        .find(|a| !a.is_empty())
        .ok_or_else(|| "Wallet returned no accounts".to_string())?;

    state.connector.select(Connector::Rpc);
    state
        .controller
        .wallet_changed(WalletStatus::connected(address))
        .await;
    Ok(ProfileView::from(&state.controller.snapshot()))
}

/// The webview's answer to a `wallet://sign-request` event.
#[tauri::command]
pub fn wallet_signature(
    state: State<'_, AppState>,
    id: String,
    signature: Option<String>,
    error: Option<String>,
) -> Result<(), String> {
    let outcome = match (signature, error) {
        (Some(signature), None) if !signature.is_empty() => Ok(signature),
        (_, Some(error)) => Err(error),
        _ => Err("wallet returned no signature".to_string()),
    };
    if state.signer.resolve(&id, outcome) {
        Ok(())
    } else {
        Err(format!("No pending sign request '{}'", id))
    }
}
