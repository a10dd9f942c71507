use std::path::Path;

const API_KEY_VAR: &str = "WALLET_PROFILE_API_KEY";

fn main() {
    // Forward WALLET_PROFILE_API_KEY to the compiler so that
    // option_env!("WALLET_PROFILE_API_KEY") works in core/config.rs.
    //   1. Shell environment (CI sets this directly and wins via option_env!)
    //   2. .env file in the workspace root (dev convenience)
    if std::env::var(API_KEY_VAR).is_err() {
        // .env lives one level up from src-tauri/
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join(".env");

        if let Ok(contents) = std::fs::read_to_string(&env_path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if key.trim() == API_KEY_VAR && !value.is_empty() {
                        println!("cargo:rustc-env={API_KEY_VAR}={value}");
                        break;
                    }
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=../.env");
    println!("cargo:rerun-if-env-changed={API_KEY_VAR}");

    tauri_build::build()
}
