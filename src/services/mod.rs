// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access and session logic.

pub mod auth;
pub mod backend;
pub mod dashboard;

pub use auth::validate_token;
pub use backend::{BackendClient, BackendError, BackendResponse};
