// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, registration, password reset and logout.
//!
//! Every flow that ends in a credential pair stores it through the
//! `TokenStore` before returning, so later calls are authenticated.

use crate::error::ApiError;
use crate::models::auth::EmailRequest;
use crate::models::{
    LoginRequest, OAuthLoginRequest, RegisterRequest, ResetPasswordRequest, Session, TokenPair,
    VerifyOtpRequest,
};
use crate::services::endpoints;
use crate::services::http::{ApiClient, ApiRequest};
use validator::Validate;

/// Authentication endpoints.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        validate(request)?;
        let pair: TokenPair = self.client.post_json(endpoints::LOGIN, request).await?;
        let session = self.start_session(&pair)?;
        tracing::info!(user_id = ?session.user_id, "Signed in");
        Ok(session)
    }

    /// Create an account. The backend emails an OTP to confirm it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        validate(request)?;
        self.client
            .execute(&ApiRequest::post(endpoints::REGISTER).json(request)?)
            .await?;
        tracing::info!("Registration submitted, awaiting OTP");
        Ok(())
    }

    /// Confirm registration; the backend signs the user in on success.
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Session, ApiError> {
        validate(request)?;
        let pair: TokenPair = self.client.post_json(endpoints::VERIFY_OTP, request).await?;
        self.start_session(&pair)
    }

    pub async fn resend_otp(&self, email: &str) -> Result<(), ApiError> {
        self.post_email(endpoints::RESEND_OTP, email).await
    }

    /// Start a password reset; the backend emails an OTP.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.post_email(endpoints::FORGOT_PASSWORD, email).await
    }

    pub async fn verify_reset_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        validate(request)?;
        self.client
            .execute(&ApiRequest::post(endpoints::VERIFY_RESET_OTP).json(request)?)
            .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        validate(request)?;
        self.client
            .execute(&ApiRequest::post(endpoints::RESET_PASSWORD).json(request)?)
            .await
    }

    /// Sign in with an identity provider's ID token.
    pub async fn oauth_login(&self, request: &OAuthLoginRequest) -> Result<Session, ApiError> {
        validate(request)?;
        let pair: TokenPair = self.client.post_json(endpoints::OAUTH_LOGIN, request).await?;
        let session = self.start_session(&pair)?;
        tracing::info!(provider = %request.provider, user_id = ?session.user_id, "Signed in via OAuth");
        Ok(session)
    }

    /// Sign out. Local credentials are cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let refresh_token = self.client.tokens().refresh_token()?;
        let request = ApiRequest::post(endpoints::LOGOUT).json(&refresh_token)?;

        match self.client.send(&request).await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) if response.status() == reqwest::StatusCode::UNAUTHORIZED => {}
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Logout rejected by backend")
            }
            Err(e) => tracing::warn!(error = %e, "Logout request failed"),
        }

        self.client.tokens().clear()?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Numeric id of the signed-in user, if any.
    pub fn current_user_id(&self) -> Result<Option<u64>, ApiError> {
        Ok(self.client.tokens().user_id()?)
    }

    fn start_session(&self, pair: &TokenPair) -> Result<Session, ApiError> {
        let tokens = self.client.tokens();
        tokens.save(pair)?;
        Ok(Session {
            user_id: tokens.user_id()?,
        })
    }

    async fn post_email(&self, path: &str, email: &str) -> Result<(), ApiError> {
        let request = EmailRequest {
            email: email.to_string(),
        };
        validate(&request)?;
        self.client
            .execute(&ApiRequest::post(path).json(&request)?)
            .await
    }
}

/// Reject invalid input before it reaches the network.
pub(crate) fn validate<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
