// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend paths and the unauthenticated allow-list.

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const VERIFY_OTP: &str = "/auth/verify-otp";
pub const RESEND_OTP: &str = "/auth/resend-otp";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const VERIFY_RESET_OTP: &str = "/auth/verify-reset-otp";
pub const OAUTH_LOGIN: &str = "/auth/oauth-login";
pub const LOGOUT: &str = "/auth/logout";
pub const REFRESH_TOKEN: &str = "/auth/refresh-token";

pub const ITEMS: &str = "/items";
pub const ANALYZE_IMAGE: &str = "/ai/analyze-image";
pub const OUTFITS: &str = "/outfits";

/// Endpoints that must work without a credential. Requests to them never
/// carry a bearer token and never trigger a refresh.
const PUBLIC_ENDPOINTS: &[&str] = &[
    LOGIN,
    REGISTER,
    VERIFY_OTP,
    RESEND_OTP,
    FORGOT_PASSWORD,
    RESET_PASSWORD,
    VERIFY_RESET_OTP,
    OAUTH_LOGIN,
];

/// Allow-list check by substring containment, so query strings and API
/// prefixes ("/api/v1/auth/login") still match.
pub fn is_public(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|p| path.contains(p))
}

/// A 401 from logout means the server already dropped the session.
pub fn is_logout(path: &str) -> bool {
    path.contains(LOGOUT)
}
