// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio and generated-PDF proxy routes.
//!
//! Every route needs a bearer token, forwards to the backend and relays the
//! backend's status. Failure messages fall back to a fixed text per route.

use super::{parse_body, relay, segment};
use crate::error::{AppError, Result};
use crate::middleware::BearerAuth;
use crate::models::forms::{CreatePortfolioForm, UpdatePortfolioForm};
use crate::models::portfolio::encode_sections;
use crate::models::PdfStyleOptions;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

const UNEXPECTED: &str = "An unexpected error occurred.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/portfolios/{portfolio_id}",
            get(get_portfolio).put(update_portfolio).delete(delete_portfolio),
        )
        .route(
            "/api/users/{user_id}/portfolios",
            get(list_portfolios).post(create_portfolio),
        )
        .route("/api/portfolios/{portfolio_id}/generate-pdf", post(generate_pdf))
        .route(
            "/api/portfolios/{portfolio_id}/download-pdf/{filename}",
            get(download_pdf),
        )
        .route("/api/users/{user_id}/generated-pdfs", get(list_generated_pdfs))
        .route(
            "/api/portfolios/{portfolio_id}/generated-pdfs/{filename}",
            delete(delete_generated_pdf),
        )
}

/// Forward one JSON call and relay the answer.
async fn forward(
    state: &AppState,
    method: Method,
    path: String,
    authorization: &str,
    body: Option<&Value>,
    fallback: &str,
) -> Result<Response> {
    let response = state
        .backend
        .send_json(method, &path, Some(authorization), body)
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?
        .ok_or_relay(fallback)?;
    Ok(relay(response))
}

/// GET /api/portfolios/{portfolio_id}
async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(portfolio_id): Path<String>,
) -> Result<Response> {
    forward(
        &state,
        Method::GET,
        format!("/portfolios/{}", segment(&portfolio_id)),
        &authorization,
        None,
        "Failed to fetch portfolio.",
    )
    .await
}

/// PUT /api/portfolios/{portfolio_id}
///
/// Sections arrive structured and are stored by the backend as JSON strings.
async fn update_portfolio(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(portfolio_id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let form: UpdatePortfolioForm = parse_body(&body, UNEXPECTED)?;
    form.validate()?;

    let payload = match serde_json::to_value(&form) {
        Ok(Value::Object(map)) => Value::Object(encode_sections(map)),
        Ok(_) => return Err(AppError::BadRequest("Invalid portfolio.".to_string())),
        Err(e) => return Err(AppError::unexpected(UNEXPECTED, e)),
    };

    tracing::info!(portfolio_id = %portfolio_id, "Updating portfolio");
    forward(
        &state,
        Method::PUT,
        format!("/portfolios/{}", segment(&portfolio_id)),
        &authorization,
        Some(&payload),
        "Failed to update portfolio.",
    )
    .await
}

/// DELETE /api/portfolios/{portfolio_id}
async fn delete_portfolio(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(portfolio_id): Path<String>,
) -> Result<Response> {
    tracing::info!(portfolio_id = %portfolio_id, "Deleting portfolio");
    forward(
        &state,
        Method::DELETE,
        format!("/portfolios/{}", segment(&portfolio_id)),
        &authorization,
        None,
        "Failed to delete portfolio.",
    )
    .await
}

/// GET /api/users/{user_id}/portfolios
async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(user_id): Path<String>,
) -> Result<Response> {
    forward(
        &state,
        Method::GET,
        format!("/users/{}/portfolios", segment(&user_id)),
        &authorization,
        None,
        "Failed to fetch portfolios.",
    )
    .await
}

/// POST /api/users/{user_id}/portfolios
async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let mut form: CreatePortfolioForm = parse_body(&body, UNEXPECTED)?;
    form.title = form.title.trim().to_string();
    form.validate()?;

    let payload = serde_json::json!({ "title": form.title });
    forward(
        &state,
        Method::POST,
        format!("/users/{}/portfolios", segment(&user_id)),
        &authorization,
        Some(&payload),
        "Failed to create portfolio.",
    )
    .await
}

/// POST /api/portfolios/{portfolio_id}/generate-pdf
///
/// An empty body means default styling.
async fn generate_pdf(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(portfolio_id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let options: PdfStyleOptions = if body.iter().all(u8::is_ascii_whitespace) {
        PdfStyleOptions::default()
    } else {
        parse_body(&body, UNEXPECTED)?
    };
    options.validate()?;
    let options = options.normalized();

    let payload = serde_json::to_value(&options).map_err(|e| AppError::unexpected(UNEXPECTED, e))?;
    tracing::info!(portfolio_id = %portfolio_id, "Requesting PDF generation");
    forward(
        &state,
        Method::POST,
        format!("/portfolios/{}/generate-pdf", segment(&portfolio_id)),
        &authorization,
        Some(&payload),
        "Failed to generate PDF.",
    )
    .await
}

/// GET /api/portfolios/{portfolio_id}/download-pdf/{filename}
///
/// Streams the backend's bytes back as an attachment; anything that is not a
/// PDF is refused.
async fn download_pdf(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path((portfolio_id, filename)): Path<(String, String)>,
) -> Result<Response> {
    let path = format!(
        "/portfolios/{}/download-pdf/{}",
        segment(&portfolio_id),
        segment(&filename)
    );
    let download = state
        .backend
        .download(&path, Some(&authorization))
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))?;

    if !download.status.is_success() {
        let message = serde_json::from_slice::<Value>(&download.bytes)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Failed to download PDF.".to_string());
        return Err(AppError::Upstream {
            status: download.status,
            message,
        });
    }

    let content_type = match download.content_type {
        Some(value)
            if value
                .to_str()
                .is_ok_and(|v| v.starts_with("application/pdf")) =>
        {
            value
        }
        _ => {
            tracing::warn!(portfolio_id = %portfolio_id, filename = %filename, "Backend download is not a PDF");
            return Err(AppError::BadGateway(
                "Downloaded file is not a PDF.".to_string(),
            ));
        }
    };

    let disposition = match download.content_disposition {
        Some(value) => value,
        None => HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            filename.replace(['"', '\\'], "")
        ))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("private, no-store")),
        ],
        download.bytes,
    )
        .into_response())
}

/// GET /api/users/{user_id}/generated-pdfs
async fn list_generated_pdfs(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path(user_id): Path<String>,
) -> Result<Response> {
    forward(
        &state,
        Method::GET,
        format!("/users/{}/generated-pdfs", segment(&user_id)),
        &authorization,
        None,
        "Failed to fetch generated PDFs.",
    )
    .await
}

/// DELETE /api/portfolios/{portfolio_id}/generated-pdfs/{filename}
async fn delete_generated_pdf(
    State(state): State<Arc<AppState>>,
    BearerAuth(authorization): BearerAuth,
    Path((portfolio_id, filename)): Path<(String, String)>,
) -> Result<Response> {
    tracing::info!(portfolio_id = %portfolio_id, filename = %filename, "Deleting generated PDF");
    forward(
        &state,
        Method::DELETE,
        format!(
            "/portfolios/{}/generated-pdfs/{}",
            segment(&portfolio_id),
            segment(&filename)
        ),
        &authorization,
        None,
        "Failed to delete PDF.",
    )
    .await
}
