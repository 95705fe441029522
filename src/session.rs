// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookie-backed browser session.
//!
//! The session is three cookies: `token` (bearer token, 1 day),
//! `refreshToken` (7 days) and `user` (JSON summary, 7 days). The jar
//! percent-encodes cookie values on write and decodes them on read, so a
//! script reading `user` decodes once and gets JSON.
//! All reads and writes go through [`SessionCookies`] so every route applies
//! the same names, lifetimes and attributes.

use crate::config::Config;
use crate::models::{Session, UserSummary};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const TOKEN_COOKIE: &str = "token";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const USER_COOKIE: &str = "user";

const TOKEN_MAX_AGE: Duration = Duration::days(1);
const REFRESH_TOKEN_MAX_AGE: Duration = Duration::days(7);
const USER_MAX_AGE: Duration = Duration::days(7);

/// Session cookie policy shared by every route.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    secure: bool,
}

impl SessionCookies {
    pub fn new(config: &Config) -> Self {
        Self {
            secure: config.secure_cookies(),
        }
    }

    /// Raw bearer token, if the browser sent one.
    pub fn token(jar: &CookieJar) -> Option<String> {
        jar.get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Cached user summary for optimistic rendering.
    ///
    /// No network call. Missing or malformed cookies yield `None`.
    pub fn user_from_cookies(jar: &CookieJar) -> Option<UserSummary> {
        match serde_json::from_str(jar.get(USER_COOKIE)?.value()) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed user cookie");
                None
            }
        }
    }

    /// Full session, only when all three cookies are present and readable.
    pub fn get_session(jar: &CookieJar) -> Option<Session> {
        Some(Session {
            token: Self::token(jar)?,
            refresh_token: jar.get(REFRESH_TOKEN_COOKIE)?.value().to_string(),
            user: Self::user_from_cookies(jar)?,
        })
    }

    /// Write all three session cookies.
    pub fn set_session(&self, jar: CookieJar, session: &Session) -> CookieJar {
        let jar = jar
            .add(self.build(TOKEN_COOKIE, session.token.clone(), TOKEN_MAX_AGE, true))
            .add(self.build(
                REFRESH_TOKEN_COOKIE,
                session.refresh_token.clone(),
                REFRESH_TOKEN_MAX_AGE,
                true,
            ));
        self.set_user(jar, &session.user)
    }

    /// Overwrite the cached user, e.g. after a profile edit.
    pub fn set_user(&self, jar: CookieJar, user: &UserSummary) -> CookieJar {
        match serde_json::to_string(user) {
            Ok(json) => jar.add(self.build(USER_COOKIE, json, USER_MAX_AGE, false)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize user cookie");
                jar
            }
        }
    }

    /// Remove every session cookie the browser sent. Idempotent.
    pub fn clear_session(jar: CookieJar) -> CookieJar {
        [TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, USER_COOKIE]
            .into_iter()
            .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
    }

    fn build(
        &self,
        name: &'static str,
        value: String,
        max_age: Duration,
        http_only: bool,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(http_only)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .build()
    }
}
