// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed access to the stored credential pair and cached user id.

use super::{keys, KeyValueStore};
use crate::claims::decode_user_id;
use crate::error::StorageError;
use crate::models::TokenPair;
use std::sync::Arc;

/// Credential storage shared by the HTTP client and the endpoint services.
///
/// Access and refresh tokens are always written together and cleared
/// together with the cached user id.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    user_id_claim: String,
}

impl TokenStore {
    /// Wrap a key-value store; `user_id_claim` names the access-token claim
    /// holding the numeric user id.
    pub fn new(backend: Arc<dyn KeyValueStore>, user_id_claim: impl Into<String>) -> Self {
        Self {
            backend,
            user_id_claim: user_id_claim.into(),
        }
    }

    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.backend.get(keys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.backend.get(keys::REFRESH_TOKEN)
    }

    /// Both tokens, or `None` unless both are present.
    pub fn tokens(&self) -> Result<Option<TokenPair>, StorageError> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(TokenPair {
                access_token,
                refresh_token,
            })),
            _ => Ok(None),
        }
    }

    /// Persist a new credential pair.
    ///
    /// The user id is re-derived from the new access token in the same write;
    /// if the token carries no usable id, any previously cached id is dropped.
    pub fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        match decode_user_id(&pair.access_token, &self.user_id_claim) {
            Ok(user_id) => {
                let user_id = user_id.to_string();
                self.backend.multi_set(&[
                    (keys::ACCESS_TOKEN, pair.access_token.as_str()),
                    (keys::REFRESH_TOKEN, pair.refresh_token.as_str()),
                    (keys::USER_ID, user_id.as_str()),
                ])
            }
            Err(e) => {
                tracing::debug!(error = %e, "Access token carries no user id");
                self.backend.multi_set(&[
                    (keys::ACCESS_TOKEN, pair.access_token.as_str()),
                    (keys::REFRESH_TOKEN, pair.refresh_token.as_str()),
                ])?;
                self.backend.multi_remove(&[keys::USER_ID])
            }
        }
    }

    /// Numeric user id of the signed-in user.
    ///
    /// Served from the cached key; falls back to decoding the stored access
    /// token and caching the result.
    pub fn user_id(&self) -> Result<Option<u64>, StorageError> {
        if let Some(cached) = self.backend.get(keys::USER_ID)? {
            match cached.parse() {
                Ok(id) => return Ok(Some(id)),
                Err(_) => tracing::warn!(value = %cached, "Ignoring unparseable cached user id"),
            }
        }

        let Some(access_token) = self.access_token()? else {
            return Ok(None);
        };

        match decode_user_id(&access_token, &self.user_id_claim) {
            Ok(id) => {
                let cached = id.to_string();
                self.backend.multi_set(&[(keys::USER_ID, cached.as_str())])?;
                Ok(Some(id))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Could not derive user id from access token");
                Ok(None)
            }
        }
    }

    /// Remove access token, refresh token and cached user id.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend
            .multi_remove(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER_ID])
    }
}
