use tauri::State;

use crate::core::{ProfileField, ProfileView};
use crate::state::AppState;

// ── Profile ──────────────────────────────────────────────────────────────────

#[tauri::command]
pub fn get_profile_view(state: State<'_, AppState>) -> ProfileView {
    ProfileView::from(&state.controller.snapshot())
}

/// Re-fetch the profile for the connected address.  Failures are logged by
/// the controller and leave the view unchanged.
#[tauri::command]
pub async fn load_profile(state: State<'_, AppState>) -> Result<ProfileView, String> {
    let address = state.controller.snapshot().wallet.address().map(str::to_string);
    if let Some(address) = address {
        state.controller.load(&address).await;
    }
    Ok(ProfileView::from(&state.controller.snapshot()))
}

#[tauri::command]
pub fn edit_profile_field(
    state: State<'_, AppState>,
    field: ProfileField,
    value: String,
) -> ProfileView {
    ProfileView::from(&state.controller.edit(field, value))
}

#[tauri::command]
pub async fn save_profile(state: State<'_, AppState>) -> Result<ProfileView, String> {
    state.controller.save().await;
    Ok(ProfileView::from(&state.controller.snapshot()))
}
