// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod forms;
pub mod portfolio;
pub mod user;

pub use forms::PdfStyleOptions;
pub use portfolio::{GeneratedPdfSummary, PortfolioSummary};
pub use user::{AuthValidation, Session, UserSummary};
