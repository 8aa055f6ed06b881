//! Password strength policy applied before encrypting
//!
//! Rejection messages never include the candidate password.

use crate::error::{CryptError, Result};

/// Characters that count as "special"
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_+.,<>{}=[]\\|~`/'\"?;:";

/// Check `candidate` against the policy
pub fn validate(candidate: &str, minimum_length: usize) -> Result<()> {
    if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(weak("at least one uppercase letter is required"));
    }

    if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(weak("at least one lowercase letter is required"));
    }

    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Err(weak("at least one number is required"));
    }

    if !candidate.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(weak("at least one special character is required"));
    }

    if candidate.chars().count() < minimum_length {
        return Err(CryptError::WeakPassword(format!(
            "must be at least {} characters long",
            minimum_length
        )));
    }

    Ok(())
}

fn weak(reason: &str) -> CryptError {
    CryptError::WeakPassword(reason.to_string())
}
