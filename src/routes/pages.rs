// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page view models.
//!
//! Public pages only look at the `token` cookie to decide whether to bounce a
//! signed-in browser to the dashboard. Guarded pages run behind
//! [`require_session`](crate::middleware::require_session) and read the
//! validated user from [`CurrentUser`].

use super::{oauth::DASHBOARD_PATH, segment};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::forms::{
    AVAILABLE_FONTS, AVAILABLE_PAGE_SIZES, PORTFOLIO_TITLE_MAX, PORTFOLIO_TITLE_MIN,
};
use crate::models::portfolio::decode_sections;
use crate::models::{GeneratedPdfSummary, PdfStyleOptions, PortfolioSummary, UserSummary};
use crate::services::dashboard::{activity_series, parse_timestamp, ActivityPoint, TimeRange};
use crate::services::BackendResponse;
use crate::session::SessionCookies;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const UNEXPECTED: &str = "An unexpected error occurred.";
const RECENT_PORTFOLIOS: usize = 3;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/auth/signin", get(sign_in_page))
        .route("/signin", get(sign_in_page))
        .route("/auth/signup", get(sign_up_page))
}

pub fn guarded_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
        .route("/portfolios/create", get(create_portfolio_page))
        .route("/portfolios/showcase", get(showcase))
        .route("/portfolios/select-for-pdf", get(select_for_pdf))
        .route("/portfolios/{portfolio_id}/edit", get(edit_portfolio))
        .route("/portfolios/{portfolio_id}/generate-pdf", get(generate_pdf_page))
}

// ─── Backend reads ───────────────────────────────────────────

async fn backend_get(state: &AppState, authorization: &str, path: &str) -> Result<BackendResponse> {
    state
        .backend
        .send_json(Method::GET, path, Some(authorization), None)
        .await
        .map_err(|e| AppError::unexpected(UNEXPECTED, e))
}

/// Fetch a list; a 404 means the user has none yet.
async fn fetch_list<T: DeserializeOwned>(
    state: &AppState,
    authorization: &str,
    path: &str,
    fallback: &str,
) -> Result<Vec<T>> {
    let response = backend_get(state, authorization, path).await?;
    if response.status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    let response = response.ok_or_relay(fallback)?;
    if response.body.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(response.body).map_err(|e| AppError::unexpected(UNEXPECTED, e))
}

async fn fetch_portfolios(state: &AppState, current: &CurrentUser) -> Result<Vec<PortfolioSummary>> {
    fetch_list(
        state,
        &current.authorization,
        &format!("/users/{}/portfolios", segment(&current.user.id)),
        "Failed to fetch portfolios.",
    )
    .await
}

async fn fetch_generated_pdfs(
    state: &AppState,
    current: &CurrentUser,
) -> Result<Vec<GeneratedPdfSummary>> {
    fetch_list(
        state,
        &current.authorization,
        &format!("/users/{}/generated-pdfs", segment(&current.user.id)),
        "Failed to fetch generated PDFs.",
    )
    .await
}

/// Fetch one portfolio; `None` when the backend does not know it.
async fn fetch_portfolio(
    state: &AppState,
    current: &CurrentUser,
    portfolio_id: &str,
) -> Result<Option<Value>> {
    let response = backend_get(
        state,
        &current.authorization,
        &format!("/portfolios/{}", segment(portfolio_id)),
    )
    .await?;
    if response.status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    Ok(Some(response.ok_or_relay("Failed to fetch portfolio.")?.body))
}

// ─── Public pages ────────────────────────────────────────────

/// GET /
async fn landing(jar: CookieJar) -> Response {
    if SessionCookies::token(&jar).is_some() {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }
    Json(json!({
        "name": "FolioFlow",
        "signInUrl": "/auth/signin",
        "signUpUrl": "/auth/signup",
        "googleSignInUrl": "/oauth2/authorization/google",
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct AuthPageQuery {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthPage {
    error: Option<String>,
}

fn auth_page(jar: &CookieJar, query: AuthPageQuery) -> Response {
    if SessionCookies::token(jar).is_some() {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }
    Json(AuthPage {
        error: query.error.filter(|e| !e.is_empty()),
    })
    .into_response()
}

/// GET /auth/signin and /signin
async fn sign_in_page(jar: CookieJar, Query(query): Query<AuthPageQuery>) -> Response {
    auth_page(&jar, query)
}

/// GET /auth/signup
async fn sign_up_page(jar: CookieJar, Query(query): Query<AuthPageQuery>) -> Response {
    auth_page(&jar, query)
}

// ─── Guarded pages ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    range: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardPage {
    user: UserSummary,
    total_portfolios: usize,
    generated_pdfs: usize,
    recent_portfolios: Vec<PortfolioSummary>,
    range: TimeRange,
    activity: Vec<ActivityPoint>,
}

fn parse_range(raw: Option<&str>) -> Result<TimeRange> {
    match raw.filter(|r| !r.is_empty()) {
        None => Ok(TimeRange::default()),
        Some("week") => Ok(TimeRange::Week),
        Some("month") => Ok(TimeRange::Month),
        Some("quarter") => Ok(TimeRange::Quarter),
        Some(other) => Err(AppError::BadRequest(format!("Unknown range: {other}"))),
    }
}

/// Most recently updated first, falling back to creation time.
fn recent(mut portfolios: Vec<PortfolioSummary>) -> Vec<PortfolioSummary> {
    let key = |p: &PortfolioSummary| {
        p.updated_at
            .as_deref()
            .or(p.created_at.as_deref())
            .and_then(parse_timestamp)
    };
    portfolios.sort_by(|a, b| key(b).cmp(&key(a)));
    portfolios.truncate(RECENT_PORTFOLIOS);
    portfolios
}

/// GET /dashboard
async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardPage>> {
    let range = parse_range(query.range.as_deref())?;
    let (portfolios, pdfs) = tokio::try_join!(
        fetch_portfolios(&state, &current),
        fetch_generated_pdfs(&state, &current),
    )?;

    let activity = activity_series(&portfolios, range, chrono::Utc::now());
    Ok(Json(DashboardPage {
        total_portfolios: portfolios.len(),
        generated_pdfs: pdfs.len(),
        recent_portfolios: recent(portfolios),
        range,
        activity,
        user: current.user,
    }))
}

/// GET /profile
async fn profile(Extension(current): Extension<CurrentUser>) -> Json<UserSummary> {
    Json(current.user)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePortfolioPage {
    user: UserSummary,
    title_min_length: usize,
    title_max_length: usize,
}

/// GET /portfolios/create
async fn create_portfolio_page(
    Extension(current): Extension<CurrentUser>,
) -> Json<CreatePortfolioPage> {
    Json(CreatePortfolioPage {
        user: current.user,
        title_min_length: PORTFOLIO_TITLE_MIN,
        title_max_length: PORTFOLIO_TITLE_MAX,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowcasePage {
    portfolios: Vec<PortfolioSummary>,
    generated_pdfs: Vec<GeneratedPdfSummary>,
}

/// GET /portfolios/showcase
async fn showcase(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ShowcasePage>> {
    let (portfolios, generated_pdfs) = tokio::try_join!(
        fetch_portfolios(&state, &current),
        fetch_generated_pdfs(&state, &current),
    )?;
    Ok(Json(ShowcasePage {
        portfolios,
        generated_pdfs,
    }))
}

/// GET /portfolios/select-for-pdf
async fn select_for_pdf(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let portfolios = fetch_portfolios(&state, &current).await?;
    Ok(Json(json!({ "portfolios": portfolios })))
}

/// GET /portfolios/{portfolio_id}/edit
///
/// Sections come back decoded; an unknown portfolio sends the browser back
/// to the dashboard.
async fn edit_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(portfolio_id): Path<String>,
) -> Result<Response> {
    match fetch_portfolio(&state, &current, &portfolio_id).await? {
        Some(portfolio) => Ok(Json(decode_sections(portfolio)).into_response()),
        None => {
            tracing::info!(portfolio_id = %portfolio_id, "Edit requested for unknown portfolio");
            Ok(Redirect::temporary(DASHBOARD_PATH).into_response())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioRef {
    portfolio_id: String,
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePdfPage {
    portfolio: PortfolioRef,
    defaults: PdfStyleOptions,
    fonts: &'static [&'static str],
    page_sizes: &'static [&'static str],
}

/// GET /portfolios/{portfolio_id}/generate-pdf
async fn generate_pdf_page(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(portfolio_id): Path<String>,
) -> Result<Json<GeneratePdfPage>> {
    let Some(portfolio) = fetch_portfolio(&state, &current, &portfolio_id).await? else {
        return Err(AppError::Upstream {
            status: StatusCode::NOT_FOUND,
            message: "Portfolio not found.".to_string(),
        });
    };

    let title = portfolio
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(Json(GeneratePdfPage {
        portfolio: PortfolioRef {
            portfolio_id,
            title,
        },
        defaults: PdfStyleOptions::default(),
        fonts: &AVAILABLE_FONTS,
        page_sizes: &AVAILABLE_PAGE_SIZES,
    }))
}
