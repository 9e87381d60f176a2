//! Shared-secret credential check.
//!
//! Used by the ingress gateway and by the authenticated proxy routes.
//! Fails closed: no configured secret, no credential, or any mismatch
//! is a rejection.

/// Why a credential was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The server has no shared secret configured.
    #[error("shared secret is not configured")]
    NotConfigured,

    /// The credential is missing or does not match.
    #[error("invalid or missing credential")]
    Rejected,
}

/// Check a presented credential against the configured secret.
pub fn authorize(expected: Option<&str>, presented: Option<&str>) -> Result<(), AuthError> {
    let expected = expected
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::NotConfigured)?;
    let presented = presented.ok_or(AuthError::Rejected)?;
    if constant_time_eq::constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::Rejected)
    }
}
