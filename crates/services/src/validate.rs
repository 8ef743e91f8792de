//! # Field Validation
//!
//! Helpers shared by the service layer. Each helper pushes failures into a
//! caller-owned list so one response can report every bad field at once;
//! [`finish`] turns the accumulated list into a validation error.

use chrono::{Datelike, Utc};
use domains::{AppError, FieldError, Result};

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const NAME_MAX: usize = 256;
pub const SLUG_MAX: usize = 50;

pub fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub fn username(errors: &mut Vec<FieldError>, value: &str) {
    if value.is_empty() || value.chars().count() > USERNAME_MAX {
        errors.push(FieldError::new(
            "username",
            format!("must be 1 to {USERNAME_MAX} characters"),
        ));
        return;
    }
    if value == "me" {
        errors.push(FieldError::new("username", "'me' is reserved"));
        return;
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
    {
        errors.push(FieldError::new(
            "username",
            "may only contain letters, digits and .@+-_",
        ));
    }
}

pub fn email(errors: &mut Vec<FieldError>, value: &str) {
    let well_formed = value.chars().count() <= EMAIL_MAX
        && value
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
}

pub fn name(errors: &mut Vec<FieldError>, value: &str) {
    if value.is_empty() || value.chars().count() > NAME_MAX {
        errors.push(FieldError::new(
            "name",
            format!("must be 1 to {NAME_MAX} characters"),
        ));
    }
}

pub fn slug(errors: &mut Vec<FieldError>, value: &str) {
    if value.is_empty() || value.len() > SLUG_MAX {
        errors.push(FieldError::new(
            "slug",
            format!("must be 1 to {SLUG_MAX} characters"),
        ));
        return;
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
    {
        errors.push(FieldError::new(
            "slug",
            "may only contain lowercase letters, digits, '-' and '_'",
        ));
    }
}

/// Titles cannot be dated in the future.
pub fn year(errors: &mut Vec<FieldError>, value: i32) {
    let current = Utc::now().year();
    if value < 1 || value > current {
        errors.push(FieldError::new(
            "year",
            format!("must be between 1 and {current}"),
        ));
    }
}

pub fn text(errors: &mut Vec<FieldError>, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new("text", "must not be empty"));
    }
}
