// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and session models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Cached copy of the backend user, kept in the `user` cookie.
///
/// Never the source of truth: it is refreshed by sign-in, the OAuth redirect
/// and profile edits, and may lag the backend in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "isOAuth2User")]
    pub is_oauth2_user: Option<bool>,
}

impl UserSummary {
    /// Build a summary from a backend user payload.
    ///
    /// The backend names the identifier `userId` on profile and sign-in
    /// responses and `id` elsewhere, sometimes as a number. Returns `None`
    /// when no usable id or email is present.
    pub fn from_backend(payload: &Value) -> Option<Self> {
        let id = payload
            .get("userId")
            .and_then(id_string)
            .or_else(|| payload.get("id").and_then(id_string))?;
        let email = non_empty_str(payload, "email")?;

        Some(Self {
            id,
            email,
            first_name: non_empty_str(payload, "firstName").unwrap_or_default(),
            last_name: non_empty_str(payload, "lastName").unwrap_or_default(),
            is_oauth2_user: payload.get("isOAuth2User").and_then(Value::as_bool),
        })
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Browser session: bearer token, refresh token and cached user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Result of checking the stored token against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthValidation {
    pub is_valid: bool,
    pub user: Option<UserSummary>,
}

impl AuthValidation {
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            user: None,
        }
    }

    pub fn valid(user: UserSummary) -> Self {
        Self {
            is_valid: true,
            user: Some(user),
        }
    }
}
