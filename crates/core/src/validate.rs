//! Email and password validation for registration input.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"))
}

/// Validate an email address.
///
/// Returns `Ok(())` when the email is acceptable, or `Err` with a
/// human-readable explanation.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty.".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email address.".to_string());
    }
    Ok(())
}

/// Validate that a password meets minimum strength requirements:
/// length, one uppercase letter, one digit, one symbol.
///
/// Returns all failed requirements so the client can show them at once.
pub fn validate_password(password: &str) -> Result<(), Vec<String>> {
    if password.is_empty() {
        return Err(vec!["Password cannot be empty".to_string()]);
    }

    let mut errors = Vec::new();
    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long."
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number.".to_string());
    }
    if !password.chars().any(|c| r##"!@#$%^&*()_+-=[]{};':"\|,.<>/?"##.contains(c)) {
        errors.push("Password must contain at least one symbol.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.domain.co").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("Sufficient1!").is_ok());
    }

    #[test]
    fn test_empty_password() {
        let errors = validate_password("").unwrap_err();
        assert_eq!(errors, vec!["Password cannot be empty".to_string()]);
    }

    #[test]
    fn test_weak_password_collects_all_errors() {
        // Short, no uppercase, no digit, no symbol.
        let errors = validate_password("abc").unwrap_err();
        assert_eq!(errors.len(), 4, "every failed requirement is reported");
    }

    #[test]
    fn test_password_missing_only_symbol() {
        let errors = validate_password("Password1").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("symbol"));
    }
}
