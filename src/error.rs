// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

use reqwest::StatusCode;

/// Error returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Session expired: {0}")]
    SessionExpired(#[from] RefreshFailure),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// True when the session is gone and the user has to sign in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }

    /// True for any authorization failure, including a 401 surfaced after replay.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ApiError::Unauthorized | ApiError::SessionExpired(_) => true,
            ApiError::Http { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }
}

/// Why a token refresh failed.
///
/// Cloned to every request parked behind the refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshFailure {
    #[error("no refresh token stored")]
    MissingRefreshToken,

    #[error("refresh rejected with HTTP {0}")]
    Rejected(u16),

    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("malformed refresh response: {0}")]
    Malformed(String),

    #[error("refresh timed out")]
    TimedOut,

    #[error("could not persist refreshed tokens: {0}")]
    Storage(String),

    /// The leader went away without settling. Only seen by the gate's
    /// waiters, which retry instead of surfacing it.
    #[error("refresh abandoned before completion")]
    Abandoned,
}

/// Key-value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("corrupt credential store: {0}")]
    Corrupt(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
