//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, response::Json};
use hms_core::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Email already registered or invalid input", body = ErrorBody)
    )
)]
/// Register a new user (patient or doctor).
///
/// Creates the user and the role-specific profile in one atomic unit and
/// returns a signed access token.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let auth = state.auth.register(request)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Registration successful", auth)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
/// Authenticate a user and return a fresh access token.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let auth = state.auth.login(request)?;
    Ok(Json(ApiResponse::new("Login successful", auth)))
}
