//! Prescription endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hms_core::dto::{PrescriptionRequest, PrescriptionResponse};
use uuid::Uuid;

use crate::extract::AuthUser;
use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = PrescriptionRequest,
    responses(
        (status = 201, description = "Prescription created", body = PrescriptionResponse),
        (status = 400, description = "Not the owning doctor, wrong status, or duplicate", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
/// Issue a prescription (doctor action).
///
/// A CONFIRMED appointment is advanced to COMPLETED as part of the same
/// operation.
#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PrescriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrescriptionResponse>>), ApiError> {
    let prescription = state.prescriptions.create(&user.email, request)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Prescription created", prescription)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/appointment/{appointment_id}",
    params(("appointment_id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Prescription retrieved", body = PrescriptionResponse),
        (status = 404, description = "No prescription for the appointment", body = ErrorBody)
    )
)]
/// Fetch the prescription issued for an appointment.
#[axum::debug_handler]
pub async fn prescription_by_appointment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PrescriptionResponse>>, ApiError> {
    let prescription = state.prescriptions.get_by_appointment(appointment_id)?;
    Ok(Json(ApiResponse::new(
        "Prescription retrieved",
        prescription,
    )))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/patient",
    responses(
        (status = 200, description = "Prescriptions retrieved", body = [PrescriptionResponse]),
        (status = 404, description = "Caller has no patient profile", body = ErrorBody)
    )
)]
/// The calling patient's prescriptions, most recently issued first.
#[axum::debug_handler]
pub async fn patient_prescriptions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponse>>>, ApiError> {
    let prescriptions = state.prescriptions.list_for_patient(&user.email)?;
    Ok(Json(ApiResponse::new(
        "Prescriptions retrieved",
        prescriptions,
    )))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/doctor",
    responses(
        (status = 200, description = "Prescriptions retrieved", body = [PrescriptionResponse]),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// Prescriptions issued by the calling doctor, most recent first.
#[axum::debug_handler]
pub async fn doctor_prescriptions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponse>>>, ApiError> {
    let prescriptions = state.prescriptions.list_for_doctor(&user.email)?;
    Ok(Json(ApiResponse::new(
        "Prescriptions retrieved",
        prescriptions,
    )))
}
