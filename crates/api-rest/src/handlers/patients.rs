//! Patient profile endpoints.

use axum::{extract::State, response::Json};
use hms_core::dto::{PatientResponse, PatientUpdateRequest};

use crate::extract::AuthUser;
use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/patients/profile",
    responses(
        (status = 200, description = "Patient profile retrieved", body = PatientResponse),
        (status = 404, description = "Caller has no patient profile", body = ErrorBody)
    )
)]
/// The calling patient's own profile.
#[axum::debug_handler]
pub async fn patient_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<PatientResponse>>, ApiError> {
    let profile = state.patients.get_profile(&user.email)?;
    Ok(Json(ApiResponse::new("Profile retrieved", profile)))
}

#[utoipa::path(
    put,
    path = "/api/patients/profile",
    request_body = PatientUpdateRequest,
    responses(
        (status = 200, description = "Patient profile updated", body = PatientResponse),
        (status = 404, description = "Caller has no patient profile", body = ErrorBody)
    )
)]
/// Update the calling patient's profile; omitted fields are unchanged.
#[axum::debug_handler]
pub async fn update_patient_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PatientUpdateRequest>,
) -> Result<Json<ApiResponse<PatientResponse>>, ApiError> {
    let profile = state.patients.update_profile(&user.email, request)?;
    Ok(Json(ApiResponse::new("Profile updated", profile)))
}
