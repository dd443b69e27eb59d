//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate display name
pub fn validate_display_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 128 {
        return Err("Name must be at most 128 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Alice").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"x".repeat(129)).is_err());
    }
}
