mod adapter;
mod background;
mod client;
mod config;
mod controller;
mod errors;
mod fields;
mod observer;
mod rpc_wallet;
mod session;
mod view;
mod wallet;

// Re-export the public API so callers can use `core::Name` directly.
pub use adapter::IdentityAdapter;
pub use background::{BackgroundFollower, BackgroundSink};
pub use client::HttpIdentityClient;
pub use config::{
    get_api_key, get_config_dir, read_config, read_config_from, resolve_api_key, save_api_key,
    AppConfig, API_KEY_ENV,
};
pub use controller::{LoadOutcome, ProfileController, SaveOutcome};
pub use errors::{AdapterError, ConfigError, SyncError};
pub use fields::{FieldEntry, FieldValue, Profile, ProfileField};
pub use observer::{Phase, ProfileObserver, ProfileSnapshot};
pub use rpc_wallet::{Connector, ConnectorSigner, RpcWallet};
pub use session::{siwe_message, MessageSigner, Session, SiweSession};
pub use view::{greeting, short_address, ProfileView, TITLE};
pub use wallet::{SignRequest, WalletStatus, WebviewSigner};
