use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::errors::ConfigError;

// ── Config (~/.wallet-profile/config.toml) ───────────────────────────────────

pub const API_KEY_ENV: &str = "WALLET_PROFILE_API_KEY";
const KEYRING_SERVICE: &str = "wallet_profile_desktop";
const KEYRING_USER: &str = "identity";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the identity service, including the API version segment.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// EIP-155 chain id placed in the sign-in message.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Domain the sign-in message claims to originate from.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Page background used when no favorite color is set.
    #[serde(default = "default_background")]
    pub default_background: String,
    /// JSON-RPC endpoint of a local wallet, used when the page has no
    /// injected provider.
    #[serde(default = "default_wallet_rpc_url")]
    pub wallet_rpc_url: String,
}

fn default_api_url() -> String {
    "https://api.identity.example/v0".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_domain() -> String {
    "wallet-profile.local".to_string()
}

fn default_background() -> String {
    "white".to_string()
}

fn default_wallet_rpc_url() -> String {
    "http://127.0.0.1:1248".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            chain_id: default_chain_id(),
            domain: default_domain(),
            default_background: default_background(),
            wallet_rpc_url: default_wallet_rpc_url(),
        }
    }
}

pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".wallet-profile"))
}

/// Read `~/.wallet-profile/config.toml`, falling back to defaults when the
/// file does not exist.
pub fn read_config() -> Result<AppConfig, ConfigError> {
    read_config_from(&get_config_dir()?.join("config.toml"))
}

pub fn read_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

// ── API Key ──────────────────────────────────────────────────────────────────

pub fn save_api_key(key: &str) -> Result<(), ConfigError> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(key)?;
    Ok(())
}

pub fn get_api_key() -> Result<String, ConfigError> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    Ok(entry.get_password()?)
}

/// Resolve the identity service API key.  Priority order:
///   1. `WALLET_PROFILE_API_KEY` in the runtime environment
///   2. the system keychain
///   3. a key baked in at compile time by build.rs
pub fn resolve_api_key() -> Option<String> {
    non_empty(std::env::var(API_KEY_ENV).ok())
        .or_else(|| match get_api_key() {
            Ok(key) => non_empty(Some(key)),
            Err(ConfigError::Keyring(keyring::Error::NoEntry)) => None,
            Err(e) => {
                warn!("could not read API key from keychain: {e}");
                None
            }
        })
        .or_else(|| non_empty(option_env!("WALLET_PROFILE_API_KEY").map(str::to_string)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = read_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_background, "white");
        assert_eq!(config.chain_id, 1);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://127.0.0.1:9000/v0\"\nchain_id = 5\n").unwrap();

        let config = read_config_from(&path).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000/v0");
        assert_eq!(config.chain_id, 5);
        assert_eq!(config.domain, "wallet-profile.local");
        assert_eq!(config.wallet_rpc_url, "http://127.0.0.1:1248");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chain_id = \"mainnet\"").unwrap();

        assert!(matches!(read_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" key ".into())), Some("key".into()));
        assert_eq!(non_empty(None), None);
    }
}
