//! Appointment booking and management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hms_core::dto::{AppointmentRequest, AppointmentResponse, StatusUpdateRequest};
use uuid::Uuid;

use crate::extract::AuthUser;
use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = AppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Doctor unavailable or date not in the future", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
/// Book an appointment (patient action).
///
/// The patient is resolved from the caller's token; the appointment starts
/// PENDING.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentResponse>>), ApiError> {
    let appointment = state.appointments.book(&user.email, request)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Appointment booked successfully", appointment)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/appointments/patient",
    responses(
        (status = 200, description = "Appointments retrieved", body = [AppointmentResponse]),
        (status = 404, description = "Caller has no patient profile", body = ErrorBody)
    )
)]
/// The calling patient's appointments, newest first.
#[axum::debug_handler]
pub async fn patient_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ApiError> {
    let appointments = state.appointments.list_for_patient(&user.email)?;
    Ok(Json(ApiResponse::new("Appointments retrieved", appointments)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/doctor",
    responses(
        (status = 200, description = "Appointments retrieved", body = [AppointmentResponse]),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// The calling doctor's appointments, newest first.
#[axum::debug_handler]
pub async fn doctor_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ApiError> {
    let appointments = state.appointments.list_for_doctor(&user.email)?;
    Ok(Json(ApiResponse::new("Appointments retrieved", appointments)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/doctor/today",
    responses(
        (status = 200, description = "Today's appointments retrieved", body = [AppointmentResponse]),
        (status = 404, description = "Caller has no doctor profile", body = ErrorBody)
    )
)]
/// The calling doctor's appointments for the current day.
#[axum::debug_handler]
pub async fn doctor_today_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ApiError> {
    let appointments = state.appointments.list_doctor_today(&user.email)?;
    Ok(Json(ApiResponse::new(
        "Today's appointments retrieved",
        appointments,
    )))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment retrieved", body = AppointmentResponse),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
/// Fetch one appointment by id.
///
/// Any authenticated caller may fetch any appointment by id; there is no
/// ownership check. Preserved as-is.
#[axum::debug_handler]
pub async fn appointment_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    let appointment = state.appointments.get_by_id(id)?;
    Ok(Json(ApiResponse::new("Appointment retrieved", appointment)))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Appointment status updated", body = AppointmentResponse),
        (status = 400, description = "Not the owning doctor, or invalid status token", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
/// Set an appointment's status (doctor action).
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ApiError> {
    let appointment = state
        .appointments
        .update_status(id, &request.status, &user.email)?;
    Ok(Json(ApiResponse::new(
        "Appointment status updated",
        appointment,
    )))
}
