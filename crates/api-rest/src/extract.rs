//! Authenticated-caller extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use hms_core::{model::Role, HmsError};
use hms_types::EmailAddress;

use crate::response::ApiError;
use crate::AppState;

/// The identity carried by a verified bearer token.
///
/// Handlers take this as an argument to require authentication; the email is
/// the token subject and is what the services resolve to a profile. Routes
/// scoped to one role do not gate on `role` up front: a caller of the wrong
/// role simply fails profile resolution with 404, which is the behaviour
/// callers already rely on.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: EmailAddress,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(HmsError::Unauthenticated(
                    "Missing authorization token".into(),
                ))
            })?;

        let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(HmsError::Unauthenticated(
                "Authorization header must be a bearer token".into(),
            ))
        })?;

        let claims = state.tokens.verify(token)?;
        let email = EmailAddress::parse(&claims.sub)
            .map_err(|_| HmsError::Unauthenticated("Invalid or expired token".into()))?;

        Ok(AuthUser {
            email,
            role: claims.role,
        })
    }
}
