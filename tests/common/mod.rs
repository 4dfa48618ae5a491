// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the wardrobe backend.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wardrobe_client::config::Config;
use wardrobe_client::storage::{KeyValueStore, MemoryStore};
use wardrobe_client::WardrobeClient;

/// How the mock answers `POST /auth/refresh-token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    Succeed,
    Fail,
    Hang,
}

/// Observable state of the mock backend.
pub struct Backend {
    /// Access token protected routes currently accept
    pub accepted_access: Mutex<String>,
    /// Refresh token the refresh endpoint currently accepts
    pub accepted_refresh: Mutex<String>,
    /// Pair handed out by the next successful refresh
    pub next_pair: Mutex<(String, String)>,
    /// Pair handed out by login / OTP / OAuth
    pub login_pair: Mutex<(String, String)>,
    pub refresh_mode: Mutex<RefreshMode>,
    pub refresh_delay: Duration,
    pub refresh_calls: AtomicUsize,
    pub refresh_bodies: Mutex<Vec<String>>,
    /// (path, Authorization header) of every request seen
    pub seen: Mutex<Vec<(String, Option<String>)>>,
    /// (field, file name, content type, size) of analyzed uploads
    pub uploads: Mutex<Vec<(String, Option<String>, Option<String>, usize)>>,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::from_millis(0))
    }

    pub fn with_delay(refresh_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            accepted_access: Mutex::new(String::new()),
            accepted_refresh: Mutex::new(String::new()),
            next_pair: Mutex::new((String::new(), String::new())),
            login_pair: Mutex::new((String::new(), String::new())),
            refresh_mode: Mutex::new(RefreshMode::Succeed),
            refresh_delay,
            refresh_calls: AtomicUsize::new(0),
            refresh_bodies: Mutex::new(Vec::new()),
            seen: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn accept(&self, access: &str, refresh: &str) {
        *self.accepted_access.lock().unwrap() = access.to_string();
        *self.accepted_refresh.lock().unwrap() = refresh.to_string();
    }

    pub fn issue_on_refresh(&self, access: &str, refresh: &str) {
        *self.next_pair.lock().unwrap() = (access.to_string(), refresh.to_string());
    }

    pub fn issue_on_login(&self, access: &str, refresh: &str) {
        *self.login_pair.lock().unwrap() = (access.to_string(), refresh.to_string());
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self.refresh_mode.lock().unwrap() = mode;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Authorization headers seen for requests whose path starts with `prefix`.
    pub fn auth_headers(&self, prefix: &str) -> Vec<Option<String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(_, auth)| auth.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push((uri.path().to_string(), auth));
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let accepted = self.accepted_access.lock().unwrap().clone();
        let expected = format!("Bearer {}", accepted);
        !accepted.is_empty()
            && headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                == Some(expected.as_str())
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

fn data(value: Value) -> Response {
    Json(json!({ "data": value, "message": "ok" })).into_response()
}

fn pair_json(pair: &(String, String)) -> Value {
    json!({ "accessToken": pair.0, "refreshToken": pair.1 })
}

async fn refresh(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap, body: String) -> Response {
    b.record(&uri, &headers);
    b.refresh_calls.fetch_add(1, Ordering::SeqCst);
    b.refresh_bodies.lock().unwrap().push(body.clone());

    tokio::time::sleep(b.refresh_delay).await;

    let mode = *b.refresh_mode.lock().unwrap();
    match mode {
        RefreshMode::Fail => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "refresh store down").into_response()
        }
        RefreshMode::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            return unauthorized();
        }
        RefreshMode::Succeed => {}
    }

    let accepted = b.accepted_refresh.lock().unwrap().clone();
    let presented: Option<String> = serde_json::from_str(&body).ok();
    if presented.as_deref() != Some(accepted.as_str()) {
        return unauthorized();
    }

    let pair = b.next_pair.lock().unwrap().clone();
    b.accept(&pair.0, &pair.1);
    data(pair_json(&pair))
}

async fn sign_in(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record(&uri, &headers);
    if body.get("password").and_then(Value::as_str) == Some("wrong-password") {
        return unauthorized();
    }
    let pair = b.login_pair.lock().unwrap().clone();
    b.accept(&pair.0, &pair.1);
    data(pair_json(&pair))
}

async fn public_ack(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap) -> Response {
    b.record(&uri, &headers);
    data(Value::Null)
}

async fn logout(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap) -> Response {
    b.record(&uri, &headers);
    unauthorized()
}

async fn protected(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap) -> Response {
    b.record(&uri, &headers);
    if !b.is_authorized(&headers) {
        return unauthorized();
    }
    data(json!("ok"))
}

async fn always_unauthorized(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap) -> Response {
    b.record(&uri, &headers);
    unauthorized()
}

async fn server_error(State(b): State<Arc<Backend>>, uri: Uri, headers: HeaderMap) -> Response {
    b.record(&uri, &headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn user_items(
    State(b): State<Arc<Backend>>,
    Path(user_id): Path<u64>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    b.record(&uri, &headers);
    if !b.is_authorized(&headers) {
        return unauthorized();
    }
    data(json!([
        {
            "id": 1,
            "name": format!("Jacket of user {}", user_id),
            "category": "Outerwear",
            "color": "#1F3A5F",
            "seasons": ["autumn", "winter"],
            "createdAt": "2026-01-05T10:00:00Z"
        },
        {
            "id": 2,
            "name": "Striped tee",
            "category": "Tops",
            "color": "rgb(255, 255, 255)",
            "pattern": "striped",
            "createdAt": "2026-02-14T08:30:00Z"
        }
    ]))
}

async fn analyze(
    State(b): State<Arc<Backend>>,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    b.record(&uri, &headers);
    if !b.is_authorized(&headers) {
        return unauthorized();
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        b.uploads
            .lock()
            .unwrap()
            .push((name, file_name, content_type, size));
    }

    data(json!({
        "color": "#800020",
        "pattern": "solid",
        "fabric": "cotton",
        "category": "Tops",
        "seasons": ["summer"],
        "occasions": ["casual"]
    }))
}

fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/auth/refresh-token", post(refresh))
        .route("/auth/login", post(sign_in))
        .route("/auth/verify-otp", post(sign_in))
        .route("/auth/oauth-login", post(sign_in))
        .route("/auth/register", post(public_ack))
        .route("/auth/resend-otp", post(public_ack))
        .route("/auth/forgot-password", post(public_ack))
        .route("/auth/logout", post(logout))
        .route("/protected", get(protected))
        .route("/always-unauthorized", get(always_unauthorized))
        .route("/server-error", get(server_error))
        .route("/items/user/{user_id}", get(user_items))
        .route("/ai/analyze-image", post(analyze))
        .with_state(backend)
}

/// Serve the mock on an ephemeral port; returns its base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(backend))
            .await
            .expect("mock backend crashed");
    });
    format!("http://{}", addr)
}

/// Raw server that answers every request with 401 but drops the connection
/// on `POST /auth/refresh-token`, so the refresh fails at the transport level.
pub async fn spawn_dropping_refresh() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind raw backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                if head.starts_with(b"POST /auth/refresh-token") {
                    return;
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
            });
        }
    });
    format!("http://{}", addr)
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        refresh_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

/// Client over a fresh in-memory store.
pub fn test_client(config: &Config) -> (WardrobeClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = WardrobeClient::new(config, store.clone() as Arc<dyn KeyValueStore>)
        .expect("client should build");
    (client, store)
}

/// Mint an access token carrying `sub` = `user_id`.
pub fn create_test_jwt(user_id: u64, nonce: &str) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: String,
        jti: &'a str,
        exp: usize,
    }

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: user_id.to_string(),
            jti: nonce,
            exp: 4_102_444_800,
        },
        &EncodingKey::from_secret(b"test_jwt_key_32_bytes_minimum!!"),
    )
    .unwrap()
}
