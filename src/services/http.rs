// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP client for the wardrobe backend.
//!
//! Handles:
//! - Bearer token attachment (except for allow-listed auth endpoints)
//! - Transparent token refresh and replay on 401, at most once per request
//! - Single-flight refresh with a pending queue for concurrent 401s
//! - Credential teardown when the refresh itself fails

use crate::config::Config;
use crate::error::{ApiError, RefreshFailure};
use crate::models::{Envelope, ImageUpload, TokenPair};
use crate::services::endpoints;
use crate::services::refresh::{RefreshGate, RefreshOutcome, Role};
use crate::storage::TokenStore;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Replays allowed per request after a credential refresh.
const MAX_REPLAYS: u8 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Request description
// ─────────────────────────────────────────────────────────────────────────────

/// Owned description of a backend call, kept so it can be replayed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, upload: ImageUpload },
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::BadRequest(format!("Unserializable body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiClient
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client with bearer authentication and transparent refresh.
///
/// Clones share the same credential store and refresh gate, so at most one
/// refresh is in flight across all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    gate: Arc<RefreshGate>,
    refresh_timeout: Duration,
}

impl ApiClient {
    /// Create a client from configuration and a credential store.
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            gate: Arc::new(RefreshGate::new()),
            refresh_timeout: config.refresh_timeout,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform a request through the authentication pipeline.
    ///
    /// Returns the backend's response as-is, including error statuses; only a
    /// 401 on a protected, not-yet-replayed request is intercepted.
    pub async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let public = endpoints::is_public(&request.path);
        let mut token = if public {
            None
        } else {
            self.tokens.access_token()?
        };
        let mut replays: u8 = 0;

        loop {
            let response = self.dispatch(request, token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || public {
                return Ok(response);
            }

            if endpoints::is_logout(&request.path) {
                tracing::debug!("Logout returned 401, session already invalid");
                return Ok(response);
            }

            if replays >= MAX_REPLAYS {
                tracing::warn!(path = %request.path, "Request rejected again after token refresh");
                return Ok(response);
            }

            let fresh = self.recover_credential(token.as_deref()).await?;
            token = Some(fresh);
            replays += 1;
            tracing::debug!(path = %request.path, "Replaying request with refreshed token");
        }
    }

    /// Single network round trip.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Obtain a usable access token after `stale` was rejected.
    ///
    /// Either waits on the refresh already in flight, reuses a token another
    /// task stored after `stale` was sent, or performs the refresh itself.
    ///
    /// A leader that goes away without settling leaves the credentials
    /// untouched, so its followers re-enter the gate and one of them takes
    /// over the refresh.
    async fn recover_credential(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let leader = loop {
            match self.gate.enter() {
                Role::Leader(guard) => break guard,
                Role::Follower(rx) => {
                    let outcome = match tokio::time::timeout(self.refresh_timeout, rx).await {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(_)) => Err(RefreshFailure::Abandoned),
                        Err(_) => Err(RefreshFailure::TimedOut),
                    };
                    match outcome {
                        Err(RefreshFailure::Abandoned) => {
                            tracing::debug!("Refresh abandoned by its leader, re-entering gate");
                        }
                        outcome => return outcome.map_err(ApiError::SessionExpired),
                    }
                }
            }
        };

        // Another task may have refreshed between our dispatch and now.
        if let Some(current) = self.tokens.access_token()? {
            if stale != Some(current.as_str()) {
                leader.settle(&Ok(current.clone()));
                return Ok(current);
            }
        }

        tracing::info!("Access token rejected, refreshing session");

        let outcome: RefreshOutcome =
            match tokio::time::timeout(self.refresh_timeout, self.request_new_pair()).await {
                Ok(Ok(pair)) => match self.tokens.save(&pair) {
                    Ok(()) => Ok(pair.access_token),
                    Err(e) => Err(RefreshFailure::Storage(e.to_string())),
                },
                Ok(Err(failure)) => Err(failure),
                Err(_) => Err(RefreshFailure::TimedOut),
            };

        if let Err(failure) = &outcome {
            tracing::warn!(error = %failure, "Token refresh failed, clearing stored credentials");
            if let Err(e) = self.tokens.clear() {
                tracing::error!(error = %e, "Failed to clear credentials after refresh failure");
            }
        } else {
            tracing::info!("Session refreshed");
        }

        leader.settle(&outcome);
        outcome.map_err(ApiError::SessionExpired)
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// Goes straight to the HTTP client; the refresh call never runs through
    /// the pipeline itself.
    async fn request_new_pair(&self) -> Result<TokenPair, RefreshFailure> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .map_err(|e| RefreshFailure::Storage(e.to_string()))?
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        let response = self
            .http
            .post(self.url(endpoints::REFRESH_TOKEN))
            .json(&refresh_token)
            .send()
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshFailure::Rejected(status.as_u16()));
        }

        let envelope: Envelope<TokenPair> = response
            .json()
            .await
            .map_err(|e| RefreshFailure::Malformed(e.to_string()))?;

        Ok(envelope.data)
    }

    // ─── Typed helpers ───────────────────────────────────────────────────────

    /// Send and unwrap the `data` envelope of a successful response.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        check_response_json::<Envelope<T>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    /// Send and discard the body of a successful response.
    pub async fn execute(&self, request: &ApiRequest) -> Result<(), ApiError> {
        let response = self.send(request).await?;
        check_response(response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(&ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(&ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(&ApiRequest::delete(path)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<FormField>,
    ) -> Result<T, ApiError> {
        self.fetch(&ApiRequest::post(path).multipart(fields)).await
    }
}

fn build_form(fields: &[FormField]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name.clone(), value.clone()),
            FormField::File { name, upload } => {
                let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.mime_type)
                    .map_err(|e| {
                        ApiError::BadRequest(format!("Invalid MIME type {}: {}", upload.mime_type, e))
                    })?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Http { status, body })
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Http { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(format!("JSON parse error: {}", e)))
}
