//! Signed access tokens.
//!
//! Tokens are HS256 JWTs whose subject is the user's email address; every
//! authenticated route resolves the caller's profile from that subject, so
//! the token carries identity, not a session.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::error::{HmsError, HmsResult};
use crate::model::Role;
use hms_types::EmailAddress;

/// Claims carried in an access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// The user's email address.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    cfg: Arc<CoreConfig>,
}

impl TokenService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Issues a token for the given identity, valid for the configured TTL.
    pub fn issue(&self, email: &EmailAddress, role: Role) -> HmsResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: email.as_str().to_owned(),
            role,
            iat: now.timestamp(),
            exp: (now + self.cfg.token_ttl()).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret().as_bytes()),
        )
        .map_err(|e| HmsError::Internal(format!("token signing failed: {e}")))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> HmsResult<AccessTokenClaims> {
        decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| HmsError::Unauthenticated("Invalid or expired token".into()))
    }
}
