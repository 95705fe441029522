// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth proxy routes: sign-in, sign-up, logout, profile and session status.

use super::{parse_body, relay};
use crate::error::{AppError, Result};
use crate::middleware::BearerAuth;
use crate::models::forms::{ChangePasswordForm, SignInForm, SignUpForm};
use crate::models::{Session, UserSummary};
use crate::services::validate_token;
use crate::session::SessionCookies;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/profile", get(get_profile).put(update_profile))
        .route("/api/auth/profile/change-password", put(change_password))
        .route("/api/auth/session", get(session_status))
        .route("/api/auth/session/user", get(session_user))
}

/// Backend sign-in fields copied into our answer, as `(backend, ours)`.
const SIGN_IN_FIELDS: [(&str, &str); 7] = [
    ("token", "token"),
    ("refreshToken", "refreshToken"),
    ("userId", "id"),
    ("email", "email"),
    ("firstName", "firstName"),
    ("lastName", "lastName"),
    ("isOAuth2User", "isOAuth2User"),
];

/// Reshape a backend sign-in answer for the browser (`userId` becomes `id`).
fn reshape_sign_in(body: &Value) -> Value {
    let mut out = Map::new();
    for (from, to) in SIGN_IN_FIELDS {
        if let Some(value) = body.get(from).filter(|v| !v.is_null()) {
            out.insert(to.to_string(), value.clone());
        }
    }
    if !out.contains_key("id") {
        if let Some(id) = body.get("id").filter(|v| !v.is_null()) {
            out.insert("id".to_string(), id.clone());
        }
    }
    Value::Object(out)
}

/// Session carried by a reshaped sign-in answer, if it is complete.
fn session_from_sign_in(result: &Value) -> Option<Session> {
    let text = |key: &str| {
        result
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some(Session {
        token: text("token")?,
        refresh_token: text("refreshToken")?,
        user: UserSummary::from_backend(result)?,
    })
}

/// POST /api/auth/signin
async fn sign_in(State(state): State<Arc<AppState>>, jar: CookieJar, body: Bytes) -> Result<Response> {
    const UNEXPECTED: &str = "An unexpected error occurred during sign-in.";

    let form: SignInForm = parse_body(&body, UNEXPECTED)?;
    if !form.has_required_fields() {
        return Err(AppError::BadRequest(
            "Missing required fields: email or password.".to_string(),
        ));
    }
    form.validate()?;

    let payload = json!({ "email": form.email, "password": form.password });
    let response = state
        .backend
        .send_json(Method::POST, "/auth/signin", None, Some(&payload))
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?
        .ok_or_relay("Backend signin failed.")?;

    let result = reshape_sign_in(&response.body);
    let jar = match session_from_sign_in(&result) {
        Some(session) => {
            tracing::info!(user_id = %session.user.id, "User signed in");
            state.sessions.set_session(jar, &session)
        }
        None => {
            tracing::warn!("Sign-in answer incomplete, no session cookies set");
            jar
        }
    };

    Ok((jar, (response.status, Json(result))).into_response())
}

/// POST /api/auth/signup
async fn sign_up(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    const UNEXPECTED: &str = "An unexpected error occurred.";

    let form: SignUpForm = parse_body(&body, UNEXPECTED)?;
    if !form.has_required_fields() {
        return Err(AppError::BadRequest(
            "Missing required fields: firstName, lastName, email, or password.".to_string(),
        ));
    }
    form.validate()?;

    let payload = json!({
        "firstName": form.first_name,
        "lastName": form.last_name,
        "email": form.email,
        "password": form.password,
    });
    let response = state
        .backend
        .send_json(Method::POST, "/auth/signup", None, Some(&payload))
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?
        .ok_or_relay("Backend signup failed.")?;

    tracing::info!("User signed up");
    Ok(relay(response))
}

/// POST /api/auth/logout
///
/// Local only: the backend keeps no server-side session to end.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        SessionCookies::clear_session(jar),
        Json(json!({ "message": "Logout successful" })),
    )
}

/// GET /api/auth/profile
async fn get_profile(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    jar: CookieJar,
) -> Result<Response> {
    let response = state
        .backend
        .send_json(Method::GET, "/auth/profile", Some(&authorization), None)
        .await
        .map_err(|e| {
            AppError::unexpected("An unexpected error occurred while fetching profile.", e)
        })?;

    match response.ok_or_relay("Failed to fetch profile.") {
        Ok(response) => Ok(relay(response)),
        Err(err) if err.status() == StatusCode::UNAUTHORIZED => {
            Ok((SessionCookies::clear_session(jar), err).into_response())
        }
        Err(err) => Err(err),
    }
}

/// PUT /api/auth/profile
async fn update_profile(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response> {
    const UNEXPECTED: &str = "An unexpected error occurred while updating profile.";

    let payload: Value = parse_body(&body, UNEXPECTED)?;
    let response = state
        .backend
        .send_json(Method::PUT, "/auth/profile", Some(&authorization), Some(&payload))
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?
        .ok_or_relay("Failed to update profile.")?;

    let jar = match UserSummary::from_backend(&response.body) {
        Some(user) => {
            tracing::info!(user_id = %user.id, "Profile updated");
            state.sessions.set_user(jar, &user)
        }
        None => jar,
    };

    Ok((jar, relay(response)).into_response())
}

/// PUT /api/auth/profile/change-password
async fn change_password(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    body: Bytes,
) -> Result<Response> {
    const UNEXPECTED: &str = "An unexpected error occurred while changing password.";

    let form: ChangePasswordForm = parse_body(&body, UNEXPECTED)?;
    if !form.has_required_fields() {
        return Err(AppError::BadRequest(
            "Current password and new password are required.".to_string(),
        ));
    }

    let payload = json!({
        "currentPassword": form.current_password,
        "newPassword": form.new_password,
    });
    let response = state
        .backend
        .send_json(
            Method::PUT,
            "/auth/profile/change-password",
            Some(&authorization),
            Some(&payload),
        )
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?
        .ok_or_relay("Failed to change password.")?;

    Ok(relay(response))
}

/// GET /api/auth/session
///
/// Authoritative check of the session cookie against the backend.
async fn session_status(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, validation) = validate_token(&state, jar).await;
    (jar, Json(validation))
}

/// GET /api/auth/session/user
///
/// Cached user from the cookie, without a backend call; `null` when absent.
async fn session_user(jar: CookieJar) -> Json<Option<UserSummary>> {
    Json(SessionCookies::user_from_cookies(&jar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reshape_renames_user_id() {
        let result = reshape_sign_in(&json!({
            "token": "t",
            "refreshToken": "r",
            "userId": "42",
            "email": "a@b.com",
            "firstName": "A",
            "lastName": "B",
            "type": "Bearer",
        }));

        assert_eq!(result["id"], "42");
        assert!(result.get("userId").is_none());
        assert!(result.get("type").is_none());

        let session = session_from_sign_in(&result).unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.refresh_token, "r");
        assert_eq!(session.user.id, "42");
        assert_eq!(session.user.first_name, "A");
    }

    #[test]
    fn test_reshape_accepts_plain_id() {
        let result = reshape_sign_in(&json!({ "id": 7, "email": "a@b.com" }));
        assert_eq!(result["id"], 7);
    }

    #[test]
    fn test_incomplete_sign_in_has_no_session() {
        let result = reshape_sign_in(&json!({ "userId": "42", "email": "a@b.com" }));
        assert!(session_from_sign_in(&result).is_none());

        let result = reshape_sign_in(&json!({ "token": "t", "refreshToken": "r", "email": "a@b.com" }));
        assert!(session_from_sign_in(&result).is_none());
    }
}
