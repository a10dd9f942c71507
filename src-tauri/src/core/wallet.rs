use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;
use tracing::debug;

use super::errors::AdapterError;
use super::session::MessageSigner;

// ── Wallet Status ────────────────────────────────────────────────────────────
//
// The wallet lives in the webview; Rust only ever reads what it reports.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_disconnected: bool,
}

impl Default for WalletStatus {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl WalletStatus {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            is_disconnected: false,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            address: None,
            is_disconnected: true,
        }
    }

    /// The connected address, treating an empty string as absent.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }
}

// ── Webview Signer ───────────────────────────────────────────────────────────

/// A sign request forwarded to the webview wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    pub id: String,
    pub address: String,
    pub message: String,
}

type Emit = Box<dyn Fn(&SignRequest) -> Result<(), String> + Send + Sync>;

/// [`MessageSigner`] that asks the webview wallet for a personal_sign.
///
/// Each request is emitted with a fresh id and parked until the webview
/// answers through [`WebviewSigner::resolve`].  There is no timeout: a
/// request the wallet never answers stays pending.
pub struct WebviewSigner {
    emit: Emit,
    pending: Mutex<HashMap<String, oneshot::Sender<Result<String, String>>>>,
}

impl WebviewSigner {
    pub fn new(emit: impl Fn(&SignRequest) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self {
            emit: Box::new(emit),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver the webview's answer for request `id`.  Returns `false` when
    /// no such request is pending.
    pub fn resolve(&self, id: &str, outcome: Result<String, String>) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl MessageSigner for WebviewSigner {
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, AdapterError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), tx);

        let request = SignRequest {
            id: id.clone(),
            address: address.to_string(),
            message: message.to_string(),
        };
        debug!("requesting signature {id} from {address}");
        if let Err(e) = (self.emit)(&request) {
            self.pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            return Err(AdapterError::Signature(e));
        }

        match rx.await {
            Ok(Ok(signature)) => Ok(signature),
            Ok(Err(reason)) => Err(AdapterError::Signature(reason)),
            Err(_) => Err(AdapterError::Signature("sign request dropped".into())),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
