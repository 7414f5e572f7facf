//! Input validation helpers
//!
//! Centralized text length constants and required-field checks. Every
//! create payload declares its required fields by calling [`require`] /
//! [`require_text`] in field order, so the first missing field is the one
//! named in the error.

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, category, menu item, customer
pub const MAX_NAME_LEN: usize = 200;

/// Notes, details, contact messages
pub const MAX_NOTE_LEN: usize = 2000;

/// Short values: time/date strings, protein type
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Required fields ─────────────────────────────────────────────────

/// Unwrap a required field or fail with `Missing required field: <field>`
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation(format!("Missing required field: {field}")))
}

/// Required text: present, non-blank and within the length limit. Returns the trimmed value.
pub fn require_text(value: Option<String>, field: &str, max_len: usize) -> Result<String, AppError> {
    let value = require(value, field)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("Missing required field: {field}")));
    }
    validate_len(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_len(v, field, max_len)?;
    }
    Ok(())
}

/// Amounts and prices must be finite and non-negative
pub fn validate_amount(value: f64, field: &str) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}

/// Parse a numeric form field
pub fn parse_amount(value: &str, field: &str) -> Result<f64, AppError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("{field} must be a number")))?;
    validate_amount(parsed, field)
}

/// Run `validator` derive rules and flatten the result into a single message
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(describe(&e)))
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
