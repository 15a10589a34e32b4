/// Error taxonomy for the HMS services.
///
/// Every service failure is one of these variants; the REST layer maps them
/// onto HTTP status codes in one place. The mapping intentionally mirrors the
/// behaviour callers already depend on: conflicts and authorization failures
/// both surface as 400, not 409/403.
#[derive(Debug, thiserror::Error)]
pub enum HmsError {
    /// A referenced entity does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Malformed input or a business-rule violation (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// The operation would duplicate a unique record (HTTP 400).
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a missing/invalid access token (HTTP 401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Acting on a resource owned by someone else (HTTP 400, preserved as-is).
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected failure inside the system (HTTP 500).
    #[error("internal error: {0}")]
    Internal(String),
}

pub type HmsResult<T> = std::result::Result<T, HmsError>;
