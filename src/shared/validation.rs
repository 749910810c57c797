use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters,
    /// dots and underscores
    /// - Valid: "john_doe", "user123", "_admin", "budi.santoso"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_.]*$").unwrap();
}

/// Validator hook for `#[validate(custom(function = "not_blank"))]`
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Validator hook rejecting `/`, which separates the parts of a card number
pub fn no_slash(value: &str) -> Result<(), validator::ValidationError> {
    if value.contains('/') {
        return Err(validator::ValidationError::new("contains_slash"));
    }
    Ok(())
}
