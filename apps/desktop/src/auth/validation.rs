//! Client-side registration validation. Runs before any network call; a
//! non-empty result means the request is rejected locally with field errors.

use crate::errors::FieldError;
use crate::models::user::RegisterRequest;

const MIN_PASSWORD_CHARS: usize = 8;

/// Validates a registration form. Mirrors the server's rules for the checks
/// worth failing fast on: email present and well-formed, password at least
/// 8 characters. The full name is free-form.
pub fn validate_registration(request: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }

    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if request.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }

    errors
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // The domain must contain a dot with something on both sides.
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Test User".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_registration(&request("user@example.com", "longenough")).is_empty());
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = validate_registration(&request("user@example.com", "short"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert!(errors[0].message.contains("8 characters"));
    }

    #[test]
    fn test_seven_chars_rejected_eight_accepted() {
        assert!(!validate_registration(&request("user@example.com", "1234567")).is_empty());
        assert!(validate_registration(&request("user@example.com", "12345678")).is_empty());
    }

    #[test]
    fn test_missing_email_rejected() {
        let errors = validate_registration(&request("", "longenough"));
        assert_eq!(errors[0].field, "email");
        assert!(errors[0].message.contains("required"));
    }

    #[test]
    fn test_malformed_email_rejected() {
        for bad in ["no-at-sign", "@example.com", "user@", "user@nodot", "user@.com"] {
            let errors = validate_registration(&request(bad, "longenough"));
            assert_eq!(errors.len(), 1, "expected rejection for {bad:?}");
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn test_multiple_errors_collected() {
        let errors = validate_registration(&request("", "short"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_password_length_counts_chars_not_bytes() {
        // 8 multibyte characters are enough even though they exceed 8 bytes.
        assert!(validate_registration(&request("user@example.com", "пароль78")).is_empty());
    }
}
