use thiserror::Error;

/// Failures talking to the identity service or establishing a session.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("identity service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid identity service URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("session error: {0}")]
    Session(String),
    #[error("wallet declined to sign: {0}")]
    Signature(String),
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),
    #[error("no API key configured")]
    MissingApiKey,
    #[error("wallet RPC error [{code}]: {message}")]
    Rpc { code: i64, message: String },
    #[error("wallet RPC returned an empty response")]
    EmptyRpcResponse,
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

/// The two failure kinds the controller logs and swallows.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to load profile for {address}: {source}")]
    Load {
        address: String,
        #[source]
        source: AdapterError,
    },
    #[error("failed to save profile for {address}: {source}")]
    Save {
        address: String,
        #[source]
        source: AdapterError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find home directory")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}
