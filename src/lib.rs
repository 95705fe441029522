// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! FolioFlow web gateway
//!
//! This crate provides the browser-facing tier of FolioFlow: it owns the
//! session cookies, relays auth and portfolio requests to the FolioFlow
//! backend, handles the OAuth2 redirect, and guards the authenticated pages.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use services::BackendClient;
use session::SessionCookies;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub sessions: SessionCookies,
}

impl AppState {
    /// Build state from configuration.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config.backend_api_url, config.backend_timeout)?;
        let sessions = SessionCookies::new(&config);
        Ok(Self {
            config,
            backend,
            sessions,
        })
    }
}
