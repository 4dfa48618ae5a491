// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wardrobe client: networking core of the smart-wardrobe app
//!
//! This crate provides the authenticated HTTP client (bearer tokens with
//! transparent, single-flight refresh), credential storage, and typed
//! wrappers for the wardrobe backend's endpoints.

pub mod claims;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::ApiError;
use services::{ApiClient, AuthService, WardrobeService};
use std::sync::Arc;
use storage::{KeyValueStore, TokenStore};

/// Client handle bundling the endpoint services over one shared pipeline.
#[derive(Clone)]
pub struct WardrobeClient {
    pub api: ApiClient,
    pub auth: AuthService,
    pub wardrobe: WardrobeService,
}

impl WardrobeClient {
    /// Build a client whose credentials live in `store`.
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let tokens = TokenStore::new(store, config.user_id_claim.clone());
        let api = ApiClient::new(config, tokens)?;
        Ok(Self {
            auth: AuthService::new(api.clone()),
            wardrobe: WardrobeService::new(api.clone()),
            api,
        })
    }
}
