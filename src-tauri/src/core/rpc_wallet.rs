//! Wallet reached over EIP-1193 JSON-RPC instead of an injected provider.
//!
//! Desktop webviews have no browser extension to inject `window.ethereum`,
//! so the app can also talk to a local wallet daemon (Frame listens on
//! `http://127.0.0.1:1248` by default) with plain JSON-RPC over HTTP.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::client::check_status;
use super::errors::AdapterError;
use super::session::MessageSigner;

const JSONRPC_VERSION: &str = "2.0";

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

// ── RPC Wallet ───────────────────────────────────────────────────────────────

pub struct RpcWallet {
    http: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl RpcWallet {
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.url
    }

    /// Issue one JSON-RPC call and deserialize its `result`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, AdapterError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("wallet rpc {method} (id {id})");
        let response: RpcResponse = check_status(
            self.http
                .post(self.url.clone())
                .json(&RpcRequest {
                    jsonrpc: JSONRPC_VERSION,
                    id,
                    method,
                    params,
                })
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        if let Some(error) = response.error {
            return Err(AdapterError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        let result = response.result.ok_or(AdapterError::EmptyRpcResponse)?;
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_requestAccounts`: the wallet's accounts, asking the user to
    /// approve the connection if needed.
    pub async fn request_accounts(&self) -> Result<Vec<String>, AdapterError> {
        self.call("eth_requestAccounts", Value::Array(Vec::new()))
            .await
    }
}

#[async_trait]
impl MessageSigner for RpcWallet {
    /// `personal_sign` with the message hex-encoded, as EIP-1193 wallets
    /// expect for UTF-8 text.
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, AdapterError> {
        let data = format!("0x{}", hex::encode(message.as_bytes()));
        let signature: String = self
            .call("personal_sign", serde_json::json!([data, address]))
            .await?;
        if signature.is_empty() {
            return Err(AdapterError::Signature("wallet returned no signature".into()));
        }
        Ok(signature)
    }
}

// ── Connector Routing ────────────────────────────────────────────────────────

/// Which wallet answers sign requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Connector {
    /// The provider injected into the page (`window.ethereum`).
    Webview,
    /// A wallet daemon reached over JSON-RPC.
    Rpc,
}

/// Forwards sign requests to whichever connector reported the address.
pub struct ConnectorSigner {
    webview: Arc<dyn MessageSigner>,
    rpc: Arc<dyn MessageSigner>,
    active: AtomicU8,
}

impl ConnectorSigner {
    pub fn new(webview: Arc<dyn MessageSigner>, rpc: Arc<dyn MessageSigner>) -> Self {
        Self {
            webview,
            rpc,
            active: AtomicU8::new(Connector::Webview as u8),
        }
    }

    pub fn select(&self, connector: Connector) {
        self.active.store(connector as u8, Ordering::SeqCst);
    }

    pub fn active(&self) -> Connector {
        if self.active.load(Ordering::SeqCst) == Connector::Rpc as u8 {
            Connector::Rpc
        } else {
            Connector::Webview
        }
    }
}

#[async_trait]
impl MessageSigner for ConnectorSigner {
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, AdapterError> {
        match self.active() {
            Connector::Webview => self.webview.sign_message(address, message).await,
            Connector::Rpc => self.rpc.sign_message(address, message).await,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
