// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session validation against the backend profile endpoint.

use crate::models::{AuthValidation, UserSummary};
use crate::session::SessionCookies;
use crate::AppState;
use axum_extra::extract::cookie::CookieJar;

/// Check the `token` cookie against the backend.
///
/// Fails closed: a missing token, a non-OK profile response, a transport
/// error or an unreadable body all mean "not authenticated". Every outcome
/// except the missing-token case clears the session cookies in the returned
/// jar. No network call is made when there is no token.
pub async fn validate_token(state: &AppState, jar: CookieJar) -> (CookieJar, AuthValidation) {
    let Some(token) = SessionCookies::token(&jar) else {
        return (jar, AuthValidation::invalid());
    };

    let response = match state.backend.fetch_profile(&token).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Token validation failed, clearing session");
            return (SessionCookies::clear_session(jar), AuthValidation::invalid());
        }
    };

    if !response.is_success() {
        tracing::info!(status = %response.status, "Backend rejected session token");
        return (SessionCookies::clear_session(jar), AuthValidation::invalid());
    }

    match UserSummary::from_backend(&response.body) {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "Session token validated");
            (jar, AuthValidation::valid(user))
        }
        None => {
            tracing::warn!("Profile response missing id or email, clearing session");
            (SessionCookies::clear_session(jar), AuthValidation::invalid())
        }
    }
}
