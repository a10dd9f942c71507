//! Sign-in-with-Ethereum session.
//!
//! The identity service hands out access tokens in exchange for a signed
//! EIP-4361 message.  Signing itself belongs to the wallet, so the session
//! only builds the message and delegates the signature to a
//! [`MessageSigner`].

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};
use url::Url;

use super::client::{check_status, endpoint, API_KEY_HEADER};
use super::errors::AdapterError;

const STATEMENT: &str = "Sign in to store your profile.";

// ── Traits ───────────────────────────────────────────────────────────────────

/// Source of access tokens for the identity service.
#[async_trait]
pub trait Session: Send + Sync {
    /// A valid access token for `address`, authenticating first if needed.
    async fn token(&self, address: &str) -> Result<String, AdapterError>;

    /// Forget any cached token for `address`.
    fn invalidate(&self, address: &str);
}

/// The wallet side of the handshake: personal_sign over `message`.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, AdapterError>;
}

// ── Wire Types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct InitRequest<'a> {
    address: &'a str,
}

#[derive(Deserialize)]
struct InitResponse {
    nonce: String,
}

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    message: &'a str,
    signature: &'a str,
}

#[derive(Deserialize)]
struct AuthenticateResponse {
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

// ── SIWE Session ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |exp| exp > now)
    }
}

pub struct SiweSession {
    http: reqwest::Client,
    api_url: Url,
    api_key: Option<String>,
    domain: String,
    chain_id: u64,
    signer: Arc<dyn MessageSigner>,
    tokens: Mutex<HashMap<String, CachedToken>>,
    /// Held for the whole handshake so concurrent callers share one sign-in.
    sign_in: tokio::sync::Mutex<()>,
}

impl SiweSession {
    pub fn new(
        http: reqwest::Client,
        api_url: Url,
        api_key: Option<String>,
        domain: impl Into<String>,
        chain_id: u64,
        signer: Arc<dyn MessageSigner>,
    ) -> Self {
        Self {
            http,
            api_url,
            api_key,
            domain: domain.into(),
            chain_id,
            signer,
            tokens: Mutex::new(HashMap::new()),
            sign_in: tokio::sync::Mutex::new(()),
        }
    }

    fn cached(&self, address: &str) -> Option<String> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens
            .get(&cache_key(address))
            .filter(|t| t.is_live(Utc::now()))
            .map(|t| t.token.clone())
    }

    async fn authenticate(&self, address: &str) -> Result<CachedToken, AdapterError> {
        let api_key = self.api_key.as_deref().ok_or(AdapterError::MissingApiKey)?;
        debug!("starting sign-in for {address}");

        let init: InitResponse = check_status(
            self.http
                .post(endpoint(&self.api_url, &["auth", "siwe", "init"])?)
                .header(API_KEY_HEADER, api_key)
                .json(&InitRequest { address })
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        let message = siwe_message(
            &self.domain,
            address,
            self.chain_id,
            &init.nonce,
            Utc::now(),
        );
        let signature = self.signer.sign_message(address, &message).await?;

        let auth: AuthenticateResponse = check_status(
            self.http
                .post(endpoint(&self.api_url, &["auth", "siwe", "authenticate"])?)
                .header(API_KEY_HEADER, api_key)
                .json(&AuthenticateRequest {
                    message: &message,
                    signature: &signature,
                })
                .send()
                .await?,
        )
        .await?
        .json()
        .await?;

        if auth.token.is_empty() {
            return Err(AdapterError::Session("empty access token".into()));
        }
        info!("signed in as {address}");
        Ok(CachedToken {
            token: auth.token,
            expires_at: auth.expires_at,
        })
    }
}

#[async_trait]
impl Session for SiweSession {
    async fn token(&self, address: &str) -> Result<String, AdapterError> {
        if let Some(token) = self.cached(address) {
            return Ok(token);
        }
        let _guard = self.sign_in.lock().await;
        // Another caller may have finished signing in while we waited.
        if let Some(token) = self.cached(address) {
            return Ok(token);
        }
        let fresh = self.authenticate(address).await?;
        let token = fresh.token.clone();
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cache_key(address), fresh);
        Ok(token)
    }

    fn invalidate(&self, address: &str) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cache_key(address));
    }
}

/// Hex addresses are case-insensitive; checksummed and lowercase forms share
/// one session.
fn cache_key(address: &str) -> String {
    address.to_ascii_lowercase()
}

/// Build an EIP-4361 sign-in message.
pub fn siwe_message(
    domain: &str,
    address: &str,
    chain_id: u64,
    nonce: &str,
    issued_at: DateTime<Utc>,
) -> String {
    format!(
        "{domain} wants you to sign in with your Ethereum account:\n\
         {address}\n\
         \n\
         {STATEMENT}\n\
         \n\
         URI: https://{domain}\n\
         Version: 1\n\
         Chain ID: {chain_id}\n\
         Nonce: {nonce}\n\
         Issued At: {}",
        issued_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

// ── Tests ───────────────────────────────────────────────────────────────────
