// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request bodies accepted from the browser, with their form rules.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const AVAILABLE_FONTS: [&str; 4] = ["Arial", "Verdana", "Times New Roman", "Helvetica"];
pub const AVAILABLE_PAGE_SIZES: [&str; 2] = ["A4", "Letter"];
/// Bounds of a new portfolio's title; must match [`CreatePortfolioForm`].
pub const PORTFOLIO_TITLE_MIN: usize = 1;
pub const PORTFOLIO_TITLE_MAX: usize = 100;

/// Treat `""` like an absent field, as the browser forms do.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

// ─── Auth ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: Option<String>,
}

impl SignInForm {
    pub fn has_required_fields(&self) -> bool {
        present(&self.email) && present(&self.password)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match"))]
pub struct SignUpForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// The confirmation is optional, but must match when the form sends it.
fn passwords_match(form: &SignUpForm) -> Result<(), ValidationError> {
    match &form.confirm_password {
        Some(confirm) if form.password.as_ref() != Some(confirm) => {
            Err(ValidationError::new("must_match").with_message("Passwords do not match.".into()))
        }
        _ => Ok(()),
    }
}

impl SignUpForm {
    pub fn has_required_fields(&self) -> bool {
        present(&self.first_name)
            && present(&self.last_name)
            && present(&self.email)
            && present(&self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordForm {
    pub fn has_required_fields(&self) -> bool {
        present(&self.current_password) && present(&self.new_password)
    }
}

// ─── Portfolios ──────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePortfolioForm {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters."
    ))]
    pub title: String,
}

fn blank_or_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Url::parse(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Invalid URL.".into()))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInformation {
    #[validate(length(min = 1, max = 100, message = "Full name is required."))]
    pub full_name: String,
    #[validate(
        email(message = "Invalid email address."),
        length(max = 100, message = "Email is too long.")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Phone number is required."))]
    pub phone: String,
    #[validate(length(min = 1, max = 255, message = "Address is required."))]
    pub address: String,
    #[validate(length(min = 1, max = 1000, message = "Professional summary is required."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "blank_or_url"))]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "blank_or_url"))]
    pub github_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "blank_or_url"))]
    pub website_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Company name is required."))]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "Position is required."))]
    pub position: String,
    /// `YYYY-MM`
    #[validate(length(min = 1, max = 7, message = "Start date is required."))]
    pub start_date: String,
    /// `YYYY-MM` or `Present`
    #[serde(default)]
    #[validate(length(max = 7))]
    pub end_date: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Institution name is required."))]
    pub institution: String,
    #[validate(length(min = 1, max = 100, message = "Degree is required."))]
    pub degree: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub field_of_study: Option<String>,
    #[serde(default)]
    #[validate(length(max = 4))]
    pub graduation_year: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub gpa: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SkillItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Skill name is required."))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SkillCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category name is required."))]
    pub category: String,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<SkillItem>,
}

fn technology_names(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|t| !t.is_empty() && t.chars().count() <= 50) {
        Ok(())
    } else {
        Err(ValidationError::new("length")
            .with_message("Technologies must be 1 to 50 characters.".into()))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectShowcase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Project title is required."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "technology_names"))]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "blank_or_url"))]
    pub link: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "blank_or_url"))]
    pub image_url: Option<String>,
}

/// Portfolio editor submission.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolioForm {
    #[validate(length(min = 1, max = 100, message = "Portfolio title is required."))]
    pub title: String,
    #[validate(nested)]
    pub personal_information: PersonalInformation,
    #[serde(default)]
    #[validate(nested)]
    pub employment_history: Option<Vec<EmploymentEntry>>,
    #[serde(default)]
    #[validate(nested)]
    pub educational_background: Option<Vec<EducationEntry>>,
    #[serde(default)]
    #[validate(nested)]
    pub skills: Option<Vec<SkillCategory>>,
    #[serde(default)]
    #[validate(nested)]
    pub project_showcases: Option<Vec<ProjectShowcase>>,
}

// ─── PDF generation ──────────────────────────────────────────

fn hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or("");
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color").with_message("Colors must be #rrggbb.".into()))
    }
}

fn known_font(value: &str) -> Result<(), ValidationError> {
    if AVAILABLE_FONTS.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("font").with_message("Unsupported font family.".into()))
    }
}

fn known_page_size(value: &str) -> Result<(), ValidationError> {
    if AVAILABLE_PAGE_SIZES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("page_size").with_message("Unsupported page size.".into()))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required")
            .with_message("PDF Label / Version Name is required.".into()))
    } else {
        Ok(())
    }
}

/// PDF styling submitted to the generate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PdfStyleOptions {
    #[validate(custom(function = "hex_color"))]
    pub primary_color: String,
    #[validate(custom(function = "hex_color"))]
    pub secondary_color: String,
    #[validate(custom(function = "known_font"))]
    pub font_family: String,
    pub include_footer: bool,
    #[validate(custom(function = "known_page_size"))]
    pub page_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub custom_pdf_name: Option<String>,
}

impl Default for PdfStyleOptions {
    fn default() -> Self {
        Self {
            primary_color: "#2d5f9a".to_string(),
            secondary_color: "#4a7fb5".to_string(),
            font_family: "Arial".to_string(),
            include_footer: true,
            page_size: "A4".to_string(),
            custom_pdf_name: None,
        }
    }
}

impl PdfStyleOptions {
    /// Trim the label before it is sent on.
    pub fn normalized(mut self) -> Self {
        self.custom_pdf_name = self.custom_pdf_name.map(|n| n.trim().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_in_required_fields() {
        let form: SignInForm = serde_json::from_value(json!({ "email": "a@b.com" })).unwrap();
        assert!(!form.has_required_fields());

        let form: SignInForm =
            serde_json::from_value(json!({ "email": "a@b.com", "password": "" })).unwrap();
        assert!(!form.has_required_fields());

        let form: SignInForm =
            serde_json::from_value(json!({ "email": "a@b.com", "password": "x" })).unwrap();
        assert!(form.has_required_fields());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_sign_up_rules() {
        let form: SignUpForm = serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "short"
        }))
        .unwrap();
        assert!(form.has_required_fields());
        assert!(form.validate().is_err());

        let form: SignUpForm = serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "long enough",
            "confirmPassword": "different"
        }))
        .unwrap();
        assert!(form.validate().is_err());

        let form: SignUpForm = serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "long enough",
            "confirmPassword": "long enough"
        }))
        .unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_create_portfolio_title_bounds() {
        let form = |len: usize| CreatePortfolioForm {
            title: "x".repeat(len),
        };
        assert!(form(PORTFOLIO_TITLE_MIN).validate().is_ok());
        assert!(form(PORTFOLIO_TITLE_MAX).validate().is_ok());
        assert!(form(PORTFOLIO_TITLE_MIN - 1).validate().is_err());
        assert!(form(PORTFOLIO_TITLE_MAX + 1).validate().is_err());
    }

    #[test]
    fn test_update_portfolio_nested_rules() {
        let form: UpdatePortfolioForm = serde_json::from_value(json!({
            "title": "Engineering",
            "personalInformation": {
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "address": "1 Main St",
                "summary": "Builder",
                "linkedinUrl": "",
                "githubUrl": "https://github.com/jane"
            },
            "skills": [{ "category": "Languages", "items": [{ "name": "Rust" }] }],
            "projectShowcases": [{ "title": "Gateway", "technologies": ["axum"], "link": "" }]
        }))
        .unwrap();
        assert!(form.validate().is_ok());

        let form: UpdatePortfolioForm = serde_json::from_value(json!({
            "title": "Engineering",
            "personalInformation": {
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "address": "1 Main St",
                "summary": "Builder"
            },
            "skills": [{ "category": "Languages", "items": [{ "name": "" }] }],
            "projectShowcases": [{ "title": "Gateway", "link": "not a url" }]
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().contains_key("skills"));
        assert!(errors.errors().contains_key("project_showcases"));
    }

    #[test]
    fn test_update_portfolio_requires_personal_information() {
        let missing = serde_json::from_value::<UpdatePortfolioForm>(json!({
            "title": "Engineering",
            "skills": []
        }));
        assert!(missing.is_err());

        let form: UpdatePortfolioForm = serde_json::from_value(json!({
            "title": "Engineering",
            "personalInformation": {
                "fullName": "",
                "email": "jane@example.com",
                "phone": "555-0100",
                "address": "1 Main St",
                "summary": "Builder"
            }
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().contains_key("personal_information"));
    }

    #[test]
    fn test_pdf_style_defaults_are_valid() {
        let options: PdfStyleOptions = serde_json::from_value(json!({})).unwrap();
        assert!(options.validate().is_ok());
        assert_eq!(options.page_size, "A4");
        assert!(options.include_footer);
    }

    #[test]
    fn test_pdf_style_rejects_bad_values() {
        let options: PdfStyleOptions = serde_json::from_value(json!({
            "primaryColor": "blue",
            "fontFamily": "Comic Sans",
            "pageSize": "A3",
            "customPdfName": "   "
        }))
        .unwrap();
        let errors = options.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("primary_color"));
        assert!(fields.contains_key("font_family"));
        assert!(fields.contains_key("page_size"));
        assert!(fields.contains_key("custom_pdf_name"));
    }
}
