pub mod core;
pub mod state;

mod bridge;
mod commands;

use tauri::Manager;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wallet_profile_lib=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ── App Entry ────────────────────────────────────────────────────────────────

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::*;

    tauri::Builder::default()
        .setup(|app| {
            let config = core::read_config().unwrap_or_else(|e| {
                error!("falling back to default config: {e}");
                core::AppConfig::default()
            });
            let api_key = core::resolve_api_key();
            if api_key.is_none() {
                warn!(
                    "no identity service API key; set {} or save one in the app's settings",
                    core::API_KEY_ENV
                );
            }
            info!("identity service at {}", config.api_url);

            let state = bridge::build_state(app.handle(), config, api_key)?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            wallet_changed,
            connect_rpc_wallet,
            wallet_signature,
            get_profile_view,
            load_profile,
            edit_profile_field,
            save_profile,
            read_config,
            save_api_key,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            error!("error while running tauri application: {e}");
            std::process::exit(1);
        });
}
