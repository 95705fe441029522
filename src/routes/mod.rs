// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod oauth;
pub mod pages;
pub mod portfolios;

use crate::error::{AppError, Result};
use crate::middleware::auth::require_session;
use crate::services::BackendResponse;
use crate::AppState;
use axum::body::Bytes;
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes: API proxies carry their own bearer checks
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(portfolios::routes())
        .merge(oauth::routes())
        .merge(pages::public_routes());

    // Authenticated pages, all behind the same session guard
    let guarded_pages = pages::guarded_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(guarded_pages)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// ─── Proxy helpers ───────────────────────────────────────────

/// Send a successful backend answer on with the backend's status.
pub(crate) fn relay(response: BackendResponse) -> Response {
    if response.body.is_null() {
        response.status.into_response()
    } else {
        (response.status, Json(response.body)).into_response()
    }
}

/// Decode a request body.
///
/// Syntactically broken JSON is reported like any other unexpected failure
/// (500 with `unexpected`); JSON of the wrong shape is a 400.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes, unexpected: &'static str) -> Result<T> {
    let value: Value = serde_json::from_slice(body).map_err(|e| AppError::unexpected(unexpected, e))?;
    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// Percent-encode a value taken from our own path before reusing it upstream.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
