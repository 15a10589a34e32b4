//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services as `Arc<CoreConfig>`. Request handlers never read process-wide
//! environment variables, which keeps behaviour consistent across
//! multi-threaded runtimes and test harnesses.

use crate::{HmsError, HmsResult};
use chrono::Duration;
use hms_types::NonEmptyText;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    jwt_secret: NonEmptyText,
    token_ttl: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `token_ttl_hours` is the access-token lifetime; it must be positive.
    pub fn new(jwt_secret: NonEmptyText, token_ttl_hours: i64) -> HmsResult<Self> {
        if token_ttl_hours <= 0 {
            return Err(HmsError::Validation(
                "token ttl must be a positive number of hours".into(),
            ));
        }

        Ok(Self {
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        })
    }

    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_str()
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

/// Parse the token lifetime from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns the 24-hour default.
pub fn token_ttl_hours_from_env_value(value: Option<String>) -> HmsResult<i64> {
    const DEFAULT_TTL_HOURS: i64 = 24;

    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match value {
        None => Ok(DEFAULT_TTL_HOURS),
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            HmsError::Validation(format!("invalid token ttl value: {raw}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ttl() {
        let secret = NonEmptyText::new("secret").expect("non-empty secret");
        let err = CoreConfig::new(secret, 0).expect_err("zero ttl should fail");
        assert!(matches!(err, HmsError::Validation(_)));
    }

    #[test]
    fn ttl_from_env_defaults_when_unset() {
        assert_eq!(
            token_ttl_hours_from_env_value(None).expect("default should parse"),
            24
        );
        assert_eq!(
            token_ttl_hours_from_env_value(Some("  ".into())).expect("blank should default"),
            24
        );
    }

    #[test]
    fn ttl_from_env_parses_explicit_value() {
        assert_eq!(
            token_ttl_hours_from_env_value(Some("8".into())).expect("valid value"),
            8
        );
        assert!(token_ttl_hours_from_env_value(Some("soon".into())).is_err());
    }
}
