// src/core/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

const MAX_EMAIL_LEN: usize = 254;
const MIN_DOMAIN_LEN: usize = 4;

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Input problems caught before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid corporate email.")]
    InvalidEmail,
    #[error("Email address is too long.")]
    TooLong,
    #[error("Invalid characters in email.")]
    ControlCharacters,
    #[error("Please agree to the authorization terms.")]
    MissingConsent,
}

/// A validated submission, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub consent: bool,
}

/// Validates an email address and returns it trimmed.
pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim();
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong);
    }
    if email.chars().any(|c| c.is_ascii_control()) {
        return Err(ValidationError::ControlCharacters);
    }
    if !RE_EMAIL.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    // The regex guarantees exactly one '@'.
    match email.split('@').nth(1) {
        Some(domain) if domain.chars().count() >= MIN_DOMAIN_LEN => Ok(email.to_string()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

/// Validates the whole form. The email is checked first, then consent.
pub fn validate_submission(email: &str, consent: bool) -> Result<Submission, ValidationError> {
    let email = validate_email(email)?;
    if !consent {
        return Err(ValidationError::MissingConsent);
    }
    Ok(Submission { email, consent })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_is_trimmed() {
        assert_eq!(validate_email("  ops@example.com "), Ok("ops@example.com".to_string()));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in ["", "   ", "no-at-sign", "a@b", "two@@example.com", "a b@example.com", "a@b.c"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad:?}");
        }
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(validate_email("ops\u{7f}@example.com"), Err(ValidationError::ControlCharacters));
        assert_eq!(validate_email("ops\u{1}@example.com"), Err(ValidationError::ControlCharacters));
    }

    #[test]
    fn test_rejects_long_addresses() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::TooLong));
    }

    #[test]
    fn test_consent_is_required() {
        assert_eq!(
            validate_submission("ops@example.com", false),
            Err(ValidationError::MissingConsent)
        );
        assert_eq!(
            validate_submission("bad", false),
            Err(ValidationError::InvalidEmail)
        );
        let ok = validate_submission("ops@example.com", true).unwrap();
        assert!(ok.consent);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::TooLong.to_string(), "Email address is too long.");
        assert_eq!(
            ValidationError::MissingConsent.to_string(),
            "Please agree to the authorization terms."
        );
    }
}
