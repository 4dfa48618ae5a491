// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Request and response schemas for the wardrobe backend.

pub mod auth;
pub mod color;
pub mod item;
pub mod outfit;

pub use auth::{
    LoginRequest, OAuthLoginRequest, RegisterRequest, ResetPasswordRequest, Session, TokenPair,
    VerifyOtpRequest,
};
pub use color::Rgb;
pub use item::{ImageUpload, ItemAttributes, NewItem, WardrobeItem};
pub use outfit::{MetadataKind, NewOutfit, Outfit, Tag};

use serde::Deserialize;

/// Response envelope the backend wraps every payload in.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}
