// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access layer.

pub mod auth;
pub mod endpoints;
pub mod http;
pub mod refresh;
pub mod wardrobe;

pub use auth::AuthService;
pub use http::{ApiClient, ApiRequest, FormField, RequestBody};
pub use wardrobe::WardrobeService;
