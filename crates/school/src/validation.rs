//! Field validators shared by the aggregate and by presentation layers.
//!
//! These are pure predicates; the aggregate turns a `false` into a
//! `DomainError::Validation` with a field-specific message.

use std::sync::LazyLock;

use regex::Regex;

use roster_core::{DomainError, DomainResult};

/// `local-part@domain.tld`, domain containing at least one dot and a
/// letters-only suffix of two or more characters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
});

/// Whether `email` looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether `age` is a non-negative integer.
pub fn validate_age(age: i64) -> bool {
    age >= 0
}

/// Parse user-typed age text (`" 20 "` is fine, `"-1"` and `"twenty"` are not).
pub fn parse_age(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

/// Reject empty or whitespace-only text for a required field.
pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}
