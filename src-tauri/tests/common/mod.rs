//! In-process fake of the identity service used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

use wallet_profile_lib::core::{
    AdapterError, HttpIdentityClient, MessageSigner, ProfileController, SiweSession,
};

pub const API_KEY: &str = "test-key";
pub const NONCE: &str = "n0nce42";
pub const RPC_ACCOUNT: &str = "0xFeedC0ffee000000000000000000000000000001";

#[derive(Default)]
pub struct FakeService {
    pub data: Mutex<HashMap<String, HashMap<String, String>>>,
    pub sign_ins: AtomicUsize,
    pub data_requests: AtomicUsize,
    pub reject_next_token: AtomicBool,
    pub drop_color_on_put: AtomicBool,
    pub messages: Mutex<Vec<String>>,
    pub rpc_calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn seed(&self, address: &str, field: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    fn token(&self) -> String {
        format!("tok-{}", self.sign_ins.load(Ordering::SeqCst))
    }
}

type Shared = Arc<FakeService>;

fn authorize(svc: &FakeService, headers: &HeaderMap) -> Result<(), StatusCode> {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err(StatusCode::FORBIDDEN);
    }
    let expected = format!("Bearer {}", svc.token());
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if svc.reject_next_token.swap(false, Ordering::SeqCst) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

async fn siwe_init(
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return Err(StatusCode::FORBIDDEN);
    }
    if body["address"].as_str().unwrap_or_default().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "nonce": NONCE })))
}

async fn siwe_authenticate(
    State(svc): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let signature = body["signature"].as_str().unwrap_or_default();
    if !message.contains(&format!("Nonce: {NONCE}")) || signature != signature_for(&message) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    svc.messages.lock().unwrap().push(message);
    svc.sign_ins.fetch_add(1, Ordering::SeqCst);
    Ok(Json(json!({ "token": svc.token() })))
}

async fn get_data(
    State(svc): State<Shared>,
    Path(address): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    svc.data_requests.fetch_add(1, Ordering::SeqCst);
    authorize(&svc, &headers)?;
    let data = svc.data.lock().unwrap();
    let record = data.get(&address);
    let slots: Vec<Value> = query
        .get("fields")
        .map(|f| f.split(',').map(str::to_string).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|field| match record.and_then(|r| r.get(&field)) {
            Some(value) => json!({ "field_id": field, "value": value }),
            None => Value::Null,
        })
        .collect();
    Ok(Json(json!({ "data": slots })))
}

async fn put_data(
    State(svc): State<Shared>,
    Path(address): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    svc.data_requests.fetch_add(1, Ordering::SeqCst);
    authorize(&svc, &headers)?;
    let mut data = svc.data.lock().unwrap();
    let record = data.entry(address).or_default();
    let mut echoed = Vec::new();
    for entry in body["data"].as_array().cloned().unwrap_or_default() {
        let field = entry["field_id"].as_str().unwrap_or_default().to_string();
        let value = entry["value"].as_str().unwrap_or_default().trim().to_string();
        record.insert(field.clone(), value.clone());
        if field == "favorite-color" && svc.drop_color_on_put.load(Ordering::SeqCst) {
            continue;
        }
        echoed.push(json!({ "field_id": field, "value": value }));
    }
    Ok(Json(json!({ "data": echoed })))
}

/// Minimal EIP-1193 wallet daemon: one account, `personal_sign` over the
/// hex-encoded message.
async fn wallet_rpc(State(svc): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let method = body["method"].as_str().unwrap_or_default().to_string();
    svc.rpc_calls.lock().unwrap().push(method.clone());
    let id = body["id"].clone();
    let result = match method.as_str() {
        "eth_requestAccounts" => json!([RPC_ACCOUNT]),
        "personal_sign" => {
            let data = body["params"][0].as_str().unwrap_or_default();
            let bytes = hex::decode(data.trim_start_matches("0x")).unwrap_or_default();
            json!(signature_for(&String::from_utf8_lossy(&bytes)))
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {method} not found") }
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

/// Start the fake on an ephemeral port and return its `/v0` base URL.
pub async fn spawn_service() -> (Arc<FakeService>, Url) {
    let svc = Arc::new(FakeService::default());
    let router = Router::new()
        .route("/v0/auth/siwe/init", post(siwe_init))
        .route("/v0/auth/siwe/authenticate", post(siwe_authenticate))
        .route("/v0/users/:address/data", get(get_data).post(put_data))
        .route("/rpc", post(wallet_rpc))
        .with_state(svc.clone());

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let url = Url::parse(&format!("http://{addr}/v0")).unwrap();
    (svc, url)
}

/// Deterministic stand-in for a wallet signature.
pub fn signature_for(message: &str) -> String {
    format!("0xsig{}", message.len())
}

pub struct FakeWallet;

#[async_trait]
impl MessageSigner for FakeWallet {
    async fn sign_message(&self, _address: &str, message: &str) -> Result<String, AdapterError> {
        Ok(signature_for(message))
    }
}

/// Signs after a delay and counts how often it was asked.
#[derive(Default)]
pub struct SlowWallet {
    pub prompts: AtomicUsize,
}

#[async_trait]
impl MessageSigner for SlowWallet {
    async fn sign_message(&self, _address: &str, message: &str) -> Result<String, AdapterError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(signature_for(message))
    }
}

pub struct RefusingWallet;

#[async_trait]
impl MessageSigner for RefusingWallet {
    async fn sign_message(&self, _address: &str, _message: &str) -> Result<String, AdapterError> {
        Err(AdapterError::Signature("user rejected".into()))
    }
}

pub fn http_stack(
    url: &Url,
    api_key: Option<&str>,
    signer: Arc<dyn MessageSigner>,
) -> (Arc<SiweSession>, Arc<HttpIdentityClient>) {
    let http = HttpIdentityClient::http_client().unwrap();
    let session = Arc::new(SiweSession::new(
        http.clone(),
        url.clone(),
        api_key.map(str::to_string),
        "wallet-profile.test",
        1,
        signer,
    ));
    let client = Arc::new(HttpIdentityClient::new(
        http,
        url.clone(),
        api_key.map(str::to_string),
        session.clone(),
    ));
    (session, client)
}

/// The fake's JSON-RPC wallet endpoint, next to the `/v0` API.
pub fn rpc_url(url: &Url) -> Url {
    url.join("/rpc").unwrap()
}

pub fn controller(url: &Url) -> ProfileController {
    let (_, client) = http_stack(url, Some(API_KEY), Arc::new(FakeWallet));
    ProfileController::new(client)
}
