// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Authentication schemas.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Access/refresh credential pair issued at login, registration and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Signed-in session returned to callers after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Numeric user id, when the access token carries one
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
}

/// OTP confirmation, used both for registration and password reset.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, max = 6, message = "OTP must be exactly 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, max = 6, message = "OTP must be exactly 6 digits"))]
    pub otp: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Sign-in with a third-party identity provider.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginRequest {
    /// Provider name, e.g. "google"
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,
    /// ID token issued by the provider
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

/// Body for endpoints that only take an email address.
#[derive(Debug, Clone, Serialize, Validate)]
pub(crate) struct EmailRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}
