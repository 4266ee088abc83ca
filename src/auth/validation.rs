//! Checks the forms run before any request leaves the client.

use std::sync::LazyLock;

use regex::Regex;

use super::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn has_min_password_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

fn required(value: &str, field: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    required(email, "Email")?;
    required(password, "Password")?;
    if !is_valid_email(email) {
        return Err(AuthError::Validation("Enter a valid email address".into()));
    }
    Ok(())
}

pub fn validate_registration(
    email: &str,
    password: &str,
    password_confirm: &str,
) -> Result<(), AuthError> {
    validate_login(email, password)?;
    if !has_min_password_length(password) {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password != password_confirm {
        return Err(AuthError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@x.io"));
        assert!(!is_valid_email("a@@x.io"));
        assert!(!is_valid_email("a@.io"));
        assert!(!is_valid_email("a@x."));
    }

    #[test]
    fn email_matches_whole_input() {
        assert!(!is_valid_email("a@x@y.io"));
        assert!(!is_valid_email("ada@example.com\tbob"));
        assert!(!is_valid_email(" ada@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration("a@b.io", "password1", "password1").is_ok());
        assert!(matches!(
            validate_registration("a@b.io", "short", "short"),
            Err(AuthError::Validation(_))
        ));
        let mismatch = validate_registration("a@b.io", "password1", "password2").unwrap_err();
        assert_eq!(mismatch.to_string(), "Passwords do not match");
        assert_eq!(
            validate_login(" ", "x").unwrap_err().to_string(),
            "Email is required"
        );
    }
}
