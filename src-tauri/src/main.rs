// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    wallet_profile_lib::init_tracing();

    // Tauri runs async IPC commands on this runtime.
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = rt.enter();
    tauri::async_runtime::set(rt.handle().clone());

    wallet_profile_lib::run();
}
