//! Client-side form validation.
//!
//! These checks run before any request is sent; the session manager and
//! the checkout flow assume their inputs already passed them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{UpskillError, UpskillResult};
use crate::models::engagement::ContactSubmission;

pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn validate_email(email: &str) -> UpskillResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(UpskillError::validation("Email is required"));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(UpskillError::validation("Please enter a valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> UpskillResult<()> {
    if password.is_empty() {
        return Err(UpskillError::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UpskillError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Sign-in form: email shape and a non-empty password.
pub fn validate_sign_in(email: &str, password: &str) -> UpskillResult<()> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(UpskillError::validation("Password is required"));
    }
    Ok(())
}

/// Sign-up form: email, password policy, optional name and terms.
pub fn validate_sign_up(
    email: &str,
    password: &str,
    name: Option<&str>,
    accepted_terms: bool,
) -> UpskillResult<()> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(UpskillError::validation("Name cannot be blank"));
        }
    }
    validate_email(email)?;
    validate_password(password)?;
    if !accepted_terms {
        return Err(UpskillError::validation(
            "Please accept the terms and conditions",
        ));
    }
    Ok(())
}

pub fn validate_contact(input: &ContactSubmission) -> UpskillResult<()> {
    if input.first_name.trim().is_empty() {
        return Err(UpskillError::validation("First name is required"));
    }
    if input.last_name.trim().is_empty() {
        return Err(UpskillError::validation("Last name is required"));
    }
    validate_email(&input.email)?;
    if input.message.trim().is_empty() {
        return Err(UpskillError::validation("Message is required"));
    }
    Ok(())
}
