use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length accepted by the provider
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Hardcoded pattern, a failure here is a source bug
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Password strength as the provider enforces it: length only
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Lowercased, trimmed form used as the account key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
