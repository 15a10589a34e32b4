//! Payment endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hms_core::dto::{PaymentRequest, PaymentResponse};
use uuid::Uuid;

use crate::extract::AuthUser;
use crate::response::{ApiError, ApiResponse, ErrorBody};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Payment successful", body = PaymentResponse),
        (status = 400, description = "Wrong appointment status or already paid", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
/// Record a payment for a confirmed or completed appointment.
#[axum::debug_handler]
pub async fn make_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    let payment = state.payments.make_payment(request)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Payment successful", payment)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/payments/appointment/{appointment_id}",
    params(("appointment_id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Payment retrieved", body = PaymentResponse),
        (status = 404, description = "No payment for the appointment", body = ErrorBody)
    )
)]
/// Fetch the payment recorded for an appointment.
#[axum::debug_handler]
pub async fn payment_by_appointment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PaymentResponse>>, ApiError> {
    let payment = state.payments.get_by_appointment(appointment_id)?;
    Ok(Json(ApiResponse::new("Payment retrieved", payment)))
}
