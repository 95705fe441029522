// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio and generated-PDF records as the backend returns them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Portfolio section fields that travel as JSON-encoded strings.
pub const SECTION_FIELDS: [&str; 5] = [
    "personalInformation",
    "employmentHistory",
    "educationalBackground",
    "skills",
    "projectShowcases",
];

/// Portfolio list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Style options recorded with a generated PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfStyleSnapshot {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_family: Option<String>,
    #[serde(default)]
    pub include_footer: bool,
    pub page_size: Option<String>,
}

/// Generated PDF list entry. Display data only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeneratedPdfSummary {
    pub id: String,
    pub portfolio_id: String,
    #[serde(default)]
    pub custom_display_name: Option<String>,
    #[serde(default)]
    pub original_portfolio_title: String,
    pub filename: String,
    pub download_url: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub style_options: Option<PdfStyleSnapshot>,
}

/// Replace JSON-string sections of a backend portfolio with parsed JSON.
///
/// Values that are already structured are left alone; strings that do not
/// parse become `null` so the editor starts from an empty section.
pub fn decode_sections(mut portfolio: Value) -> Value {
    if let Some(object) = portfolio.as_object_mut() {
        for field in SECTION_FIELDS {
            if let Some(Value::String(raw)) = object.get(field) {
                let parsed = serde_json::from_str(raw).unwrap_or_else(|e| {
                    tracing::warn!(field, error = %e, "Unparseable portfolio section");
                    Value::Null
                });
                object.insert(field.to_string(), parsed);
            }
        }
    }
    portfolio
}

/// Encode structured sections as JSON strings for the backend.
///
/// `null` sections stay `null`.
pub fn encode_sections(mut payload: Map<String, Value>) -> Map<String, Value> {
    for field in SECTION_FIELDS {
        if let Some(value) = payload.get_mut(field) {
            if !value.is_null() && !value.is_string() {
                *value = Value::String(value.to_string());
            }
        }
    }
    payload
}
