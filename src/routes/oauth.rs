// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-in via the backend's OAuth2 flow.
//!
//! The backend runs the provider exchange and sends the browser back to
//! `/oauth2/redirect` with the session in the query string. Empty query
//! values count as absent, and a query that cannot be parsed counts as
//! incomplete.

use crate::models::{Session, UserSummary};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

pub const DASHBOARD_PATH: &str = "/dashboard";
const SIGN_IN_ERROR_PATH: &str = "/signin";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/oauth2/authorization/google", get(start_google))
        .route("/oauth2/redirect", get(oauth_redirect))
}

/// Query parameters the backend appends to the redirect.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRedirectParams {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "isOAuth2User")]
    pub is_oauth2_user: Option<String>,
    pub error: Option<String>,
}

/// What the redirect handler should do with a set of parameters.
#[derive(Debug, PartialEq)]
pub enum OAuthOutcome {
    /// The provider or backend reported an error.
    Failed(String),
    Authenticated(Session),
    /// No error, but a required field is missing.
    Incomplete,
}

impl OAuthOutcome {
    /// Target of the browser redirect for this outcome.
    pub fn location(&self) -> String {
        match self {
            OAuthOutcome::Failed(error) => {
                format!("{SIGN_IN_ERROR_PATH}?error={}", urlencoding::encode(error))
            }
            OAuthOutcome::Authenticated(_) => DASHBOARD_PATH.to_string(),
            OAuthOutcome::Incomplete => {
                format!("{SIGN_IN_ERROR_PATH}?error=Incomplete%20OAuth%20data")
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Decide the outcome of an OAuth redirect. An error always wins.
pub fn resolve(params: OAuthRedirectParams) -> OAuthOutcome {
    if let Some(error) = non_empty(params.error) {
        return OAuthOutcome::Failed(error);
    }

    let (Some(token), Some(refresh_token), Some(id), Some(email)) = (
        non_empty(params.token),
        non_empty(params.refresh_token),
        non_empty(params.id),
        non_empty(params.email),
    ) else {
        return OAuthOutcome::Incomplete;
    };

    OAuthOutcome::Authenticated(Session {
        token,
        refresh_token,
        user: UserSummary {
            id,
            email,
            first_name: params.first_name.unwrap_or_default(),
            last_name: params.last_name.unwrap_or_default(),
            is_oauth2_user: params.is_oauth2_user.and_then(|v| v.parse().ok()),
        },
    })
}

/// GET /oauth2/authorization/google
///
/// Hands the browser to the backend, which starts the provider flow.
async fn start_google(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&format!(
        "{}/oauth2/authorization/google",
        state.config.backend_origin
    ))
}

/// GET /oauth2/redirect
async fn oauth_redirect(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    query: Result<Query<OAuthRedirectParams>, QueryRejection>,
) -> (CookieJar, Redirect) {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed OAuth redirect query");
            OAuthRedirectParams::default()
        }
    };
    let outcome = resolve(params);
    let location = outcome.location();

    let jar = match outcome {
        OAuthOutcome::Authenticated(session) => {
            tracing::info!(user_id = %session.user.id, "OAuth sign-in completed");
            state.sessions.set_session(jar, &session)
        }
        OAuthOutcome::Failed(error) => {
            tracing::warn!(error = %error, "OAuth sign-in failed");
            jar
        }
        OAuthOutcome::Incomplete => {
            tracing::warn!("OAuth redirect missing session fields");
            jar
        }
    };

    (jar, Redirect::temporary(&location))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> OAuthRedirectParams {
        OAuthRedirectParams {
            token: Some("T".to_string()),
            refresh_token: Some("R".to_string()),
            id: Some("U1".to_string()),
            email: Some("a@b.com".to_string()),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_error_wins() {
        let outcome = resolve(OAuthRedirectParams {
            error: Some("access_denied".to_string()),
            ..complete()
        });
        assert_eq!(outcome, OAuthOutcome::Failed("access_denied".to_string()));
        assert_eq!(outcome.location(), "/signin?error=access_denied");
    }

    #[test]
    fn test_error_is_percent_encoded() {
        let outcome = resolve(OAuthRedirectParams {
            error: Some("email not verified".to_string()),
            ..Default::default()
        });
        assert_eq!(outcome.location(), "/signin?error=email%20not%20verified");
    }

    #[test]
    fn test_complete_params_authenticate() {
        match resolve(complete()) {
            OAuthOutcome::Authenticated(session) => {
                assert_eq!(session.token, "T");
                assert_eq!(session.refresh_token, "R");
                assert_eq!(session.user.id, "U1");
                assert_eq!(session.user.first_name, "Ada");
                assert_eq!(session.user.last_name, "");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(resolve(complete()).location(), "/dashboard");
    }

    #[test]
    fn test_missing_or_empty_fields_are_incomplete() {
        let outcome = resolve(OAuthRedirectParams {
            refresh_token: None,
            ..complete()
        });
        assert_eq!(outcome, OAuthOutcome::Incomplete);
        assert_eq!(outcome.location(), "/signin?error=Incomplete%20OAuth%20data");

        let outcome = resolve(OAuthRedirectParams {
            email: Some(String::new()),
            error: Some(String::new()),
            ..complete()
        });
        assert_eq!(outcome, OAuthOutcome::Incomplete);
    }

    #[test]
    fn test_oauth_flag_is_parsed() {
        let outcome = resolve(OAuthRedirectParams {
            is_oauth2_user: Some("true".to_string()),
            ..complete()
        });
        match outcome {
            OAuthOutcome::Authenticated(session) => {
                assert_eq!(session.user.is_oauth2_user, Some(true))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
