//! Doctor directory and profile endpoints.

use axum::{
    extract::{Path, State},
    response::Json,
};
use hms_core::dto::{AvailabilityRequest, DoctorResponse, DoctorUpdateRequest};
use uuid::Uuid;

use crate::extract::AuthUser;
use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "All doctors, available or not", body = [DoctorResponse])
    )
)]
/// List every doctor, including those not accepting appointments.
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DoctorResponse>>>, ApiError> {
    let doctors = state.doctors.list_all()?;
    Ok(Json(ApiResponse::new("Doctors retrieved", doctors)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/available",
    responses(
        (status = 200, description = "Doctors accepting appointments", body = [DoctorResponse])
    )
)]
/// List only the doctors currently accepting appointments.
#[axum::debug_handler]
pub async fn list_available_doctors(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DoctorResponse>>>, ApiError> {
    let doctors = state.doctors.list_available()?;
    Ok(Json(ApiResponse::new("Doctors retrieved", doctors)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/specialization/{specialization}",
    params(("specialization" = String, Path, description = "Specialization, case-insensitive")),
    responses(
        (status = 200, description = "Available doctors with the specialization", body = [DoctorResponse])
    )
)]
/// Available doctors matching a specialization, case-insensitively.
#[axum::debug_handler]
pub async fn doctors_by_specialization(
    State(state): State<AppState>,
    Path(specialization): Path<String>,
) -> Result<Json<ApiResponse<Vec<DoctorResponse>>>, ApiError> {
    let doctors = state.doctors.list_by_specialization(&specialization)?;
    Ok(Json(ApiResponse::new("Doctors retrieved", doctors)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/profile",
    responses(
        (status = 200, description = "Doctor profile retrieved", body = DoctorResponse),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// The calling doctor's own profile.
#[axum::debug_handler]
pub async fn doctor_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    let profile = state.doctors.get_profile(&user.email)?;
    Ok(Json(ApiResponse::new("Profile retrieved", profile)))
}

#[utoipa::path(
    put,
    path = "/api/doctors/profile",
    request_body = DoctorUpdateRequest,
    responses(
        (status = 200, description = "Doctor profile updated", body = DoctorResponse),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// Update the calling doctor's profile; omitted fields are unchanged.
#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<DoctorUpdateRequest>,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    let profile = state.doctors.update_profile(&user.email, request)?;
    Ok(Json(ApiResponse::new("Profile updated", profile)))
}

#[utoipa::path(
    put,
    path = "/api/doctors/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = DoctorResponse),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// Toggle whether the calling doctor accepts new appointments.
#[axum::debug_handler]
pub async fn update_doctor_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    let profile = state
        .doctors
        .update_availability(&user.email, request.available)?;
    Ok(Json(ApiResponse::new("Availability updated", profile)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor retrieved", body = DoctorResponse),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
/// Fetch one doctor by id. Public, like the listings.
#[axum::debug_handler]
pub async fn doctor_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DoctorResponse>>, ApiError> {
    let doctor = state.doctors.get_by_id(id)?;
    Ok(Json(ApiResponse::new("Doctor retrieved", doctor)))
}
