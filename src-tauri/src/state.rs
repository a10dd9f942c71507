use std::sync::Arc;
use url::Url;

use crate::core::{
    AdapterError, AppConfig, BackgroundFollower, BackgroundSink, ConnectorSigner,
    HttpIdentityClient, ProfileController, ProfileObserver, RpcWallet, SignRequest, SiweSession,
    WebviewSigner,
};

// ── App State ────────────────────────────────────────────────────────────────
//
// Built once at startup from the loaded config and handed to Tauri's state
// manager.  Commands reach the identity service only through `controller`.

pub struct AppState {
    pub config: AppConfig,
    pub controller: Arc<ProfileController>,
    pub signer: Arc<WebviewSigner>,
    pub rpc_wallet: Arc<RpcWallet>,
    /// Routes sign-in signatures to the webview or the RPC wallet.
    pub connector: Arc<ConnectorSigner>,
    pub has_api_key: bool,
}

impl AppState {
    /// Wire session, client, controller and observers together.
    ///
    /// `emit_sign_request` forwards sign requests to the wallet,
    /// `background` receives page background changes and `on_change` sees
    /// every controller snapshot.
    pub fn new(
        config: AppConfig,
        api_key: Option<String>,
        emit_sign_request: impl Fn(&SignRequest) -> Result<(), String> + Send + Sync + 'static,
        background: impl BackgroundSink + 'static,
        on_change: Arc<dyn ProfileObserver>,
    ) -> Result<Self, AdapterError> {
        let api_url = Url::parse(&config.api_url)?;
        let rpc_url = Url::parse(&config.wallet_rpc_url)?;
        let http = HttpIdentityClient::http_client()?;
        let signer = Arc::new(WebviewSigner::new(emit_sign_request));
        let rpc_wallet = Arc::new(RpcWallet::new(http.clone(), rpc_url));
        let connector = Arc::new(ConnectorSigner::new(signer.clone(), rpc_wallet.clone()));

        let session = Arc::new(SiweSession::new(
            http.clone(),
            api_url.clone(),
            api_key.clone(),
            config.domain.clone(),
            config.chain_id,
            connector.clone(),
        ));
        let client = Arc::new(HttpIdentityClient::new(
            http,
            api_url,
            api_key.clone(),
            session,
        ));

        let controller = ProfileController::new(client)
            .with_observer(Arc::new(BackgroundFollower::new(
                background,
                config.default_background.clone(),
            )))
            .with_observer(on_change);

        Ok(Self {
            config,
            controller: Arc::new(controller),
            signer,
            rpc_wallet,
            connector,
            has_api_key: api_key.is_some(),
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
