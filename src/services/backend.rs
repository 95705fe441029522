// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the FolioFlow backend API.
//!
//! One attempt per call, no retries. Callers decide how a non-OK status is
//! surfaced; this module only reports transport and decoding failures as
//! errors.

use crate::error::AppError;
use axum::http::{HeaderValue, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Backend call failure that never produced a usable response.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned a non-JSON body (status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON answer from the backend, whatever its status.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    /// `Value::Null` when the backend sent an empty body.
    pub body: Value,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The backend's `message` field, if it sent a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Pass success through; turn anything else into a relayed error whose
    /// message falls back to `fallback`.
    pub fn ok_or_relay(self, fallback: &str) -> Result<Self, AppError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(AppError::Upstream {
            status: self.status,
            message: self.message().unwrap_or(fallback).to_string(),
        })
    }
}

/// Binary answer from the backend (PDF downloads).
#[derive(Debug)]
pub struct BackendDownload {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub content_disposition: Option<HeaderValue>,
    pub bytes: axum::body::Bytes,
}

/// FolioFlow backend client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a JSON request and decode the JSON answer.
    ///
    /// `authorization` is forwarded verbatim as the `Authorization` header.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        authorization: Option<&str>,
        body: Option<&Value>,
    ) -> Result<BackendResponse, BackendError> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "Forwarding to backend");

        let mut request = self
            .http
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(auth) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode { status, source })?
        };

        Ok(BackendResponse { status, body })
    }

    /// `GET /auth/profile` with a bearer token.
    pub async fn fetch_profile(&self, token: &str) -> Result<BackendResponse, BackendError> {
        self.send_json(
            Method::GET,
            "/auth/profile",
            Some(&format!("Bearer {token}")),
            None,
        )
        .await
    }

    /// Fetch a binary resource, keeping the headers a browser download needs.
    pub async fn download(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<BackendDownload, BackendError> {
        let mut request = self.http.get(self.url(path));
        if let Some(auth) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(reqwest::header::CONTENT_TYPE).cloned();
        let content_disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .cloned();
        let bytes = response.bytes().await?;

        Ok(BackendDownload {
            status,
            content_type,
            content_disposition,
            bytes,
        })
    }
}
