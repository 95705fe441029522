// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token extraction and the page route guard.

use crate::error::AppError;
use crate::models::UserSummary;
use crate::services::auth::validate_token;
use crate::session::SessionCookies;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub const SIGN_IN_PATH: &str = "/auth/signin";

/// `Authorization` value to forward to the backend.
///
/// Taken from the request header when present, otherwise built from the
/// `token` cookie.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub String);

fn authorization_from(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.trim().is_empty())
        .map(str::to_string);

    header.or_else(|| {
        let jar = CookieJar::from_headers(&parts.headers);
        SessionCookies::token(&jar).map(|token| format!("Bearer {token}"))
    })
}

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorization_from(parts)
            .map(BearerAuth)
            .ok_or(AppError::MissingAuthorization)
    }
}

/// User confirmed by the backend for this request, with the bearer value
/// page handlers use for their own backend calls.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserSummary,
    pub authorization: String,
}

/// Middleware guarding every authenticated page.
///
/// Validates the session against the backend; on failure the browser is sent
/// to the sign-in page with its session cookies removed.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = SessionCookies::token(&jar);
    let (jar, validation) = validate_token(&state, jar).await;

    match (validation.user, token) {
        (Some(user), Some(token)) if validation.is_valid => {
            request.extensions_mut().insert(CurrentUser {
                user,
                authorization: format!("Bearer {token}"),
            });
            let response = next.run(request).await;
            (jar, response).into_response()
        }
        _ => {
            tracing::info!(path = %request.uri().path(), "Redirecting unauthenticated page request");
            (jar, Redirect::temporary(SIGN_IN_PATH)).into_response()
        }
    }
}
