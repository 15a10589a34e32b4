//! # API REST
//!
//! REST API implementation for the hospital management system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - bearer-token authentication of callers
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelope, status mapping, CORS)
//!
//! All business rules live in `hms-core`; this crate only routes, extracts
//! and shapes responses.

#![warn(rust_2018_idioms)]

pub mod extract;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hms_core::{
    dto, model, AppointmentService, AuthService, CoreConfig, Datastore, DoctorService,
    PatientService, PaymentService, PrescriptionService, TokenService,
};

/// Application state shared across REST API handlers.
///
/// One service per controller plus the token verifier used by the
/// authentication extractor. Everything is cheap to clone; the services
/// share one datastore handle.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub prescriptions: PrescriptionService,
    pub payments: PaymentService,
    pub tokens: TokenService,
}

impl AppState {
    /// Wires every service to the given datastore and configuration.
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn Datastore>) -> Self {
        let tokens = TokenService::new(cfg);
        Self {
            auth: AuthService::new(store.clone(), tokens.clone()),
            doctors: DoctorService::new(store.clone()),
            patients: PatientService::new(store.clone()),
            appointments: AppointmentService::new(store.clone()),
            prescriptions: PrescriptionService::new(store.clone()),
            payments: PaymentService::new(store),
            tokens,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::appointments::book_appointment,
        handlers::appointments::patient_appointments,
        handlers::appointments::doctor_appointments,
        handlers::appointments::doctor_today_appointments,
        handlers::appointments::appointment_by_id,
        handlers::appointments::update_appointment_status,
        handlers::doctors::list_doctors,
        handlers::doctors::list_available_doctors,
        handlers::doctors::doctors_by_specialization,
        handlers::doctors::doctor_profile,
        handlers::doctors::update_doctor_profile,
        handlers::doctors::update_doctor_availability,
        handlers::doctors::doctor_by_id,
        handlers::patients::patient_profile,
        handlers::patients::update_patient_profile,
        handlers::payments::make_payment,
        handlers::payments::payment_by_appointment,
        handlers::prescriptions::create_prescription,
        handlers::prescriptions::prescription_by_appointment,
        handlers::prescriptions::patient_prescriptions,
        handlers::prescriptions::doctor_prescriptions,
    ),
    components(schemas(
        handlers::health::HealthRes,
        response::ErrorBody,
        dto::RegisterRequest,
        dto::LoginRequest,
        dto::AuthResponse,
        dto::AppointmentRequest,
        dto::StatusUpdateRequest,
        dto::AppointmentResponse,
        dto::DoctorResponse,
        dto::DoctorUpdateRequest,
        dto::AvailabilityRequest,
        dto::PatientResponse,
        dto::PatientUpdateRequest,
        dto::PaymentRequest,
        dto::PaymentResponse,
        dto::PrescriptionRequest,
        dto::PrescriptionResponse,
        model::Role,
        model::Gender,
        model::AppointmentStatus,
        model::PaymentMethod,
        model::PaymentStatus,
    ))
)]
struct ApiDoc;

/// Builds the full application router.
///
/// Mounted surface: the `/api` routes, `/health`, and Swagger UI at
/// `/swagger-ui` backed by `/api-docs/openapi.json`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/appointments",
            post(handlers::appointments::book_appointment),
        )
        .route(
            "/api/appointments/patient",
            get(handlers::appointments::patient_appointments),
        )
        .route(
            "/api/appointments/doctor",
            get(handlers::appointments::doctor_appointments),
        )
        .route(
            "/api/appointments/doctor/today",
            get(handlers::appointments::doctor_today_appointments),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointments::appointment_by_id),
        )
        .route(
            "/api/appointments/:id/status",
            put(handlers::appointments::update_appointment_status),
        )
        .route("/api/doctors", get(handlers::doctors::list_doctors))
        .route(
            "/api/doctors/available",
            get(handlers::doctors::list_available_doctors),
        )
        .route(
            "/api/doctors/specialization/:specialization",
            get(handlers::doctors::doctors_by_specialization),
        )
        .route(
            "/api/doctors/profile",
            get(handlers::doctors::doctor_profile).put(handlers::doctors::update_doctor_profile),
        )
        .route(
            "/api/doctors/availability",
            put(handlers::doctors::update_doctor_availability),
        )
        .route("/api/doctors/:id", get(handlers::doctors::doctor_by_id))
        .route(
            "/api/patients/profile",
            get(handlers::patients::patient_profile)
                .put(handlers::patients::update_patient_profile),
        )
        .route("/api/payments", post(handlers::payments::make_payment))
        .route(
            "/api/payments/appointment/:appointment_id",
            get(handlers::payments::payment_by_appointment),
        )
        .route(
            "/api/prescriptions",
            post(handlers::prescriptions::create_prescription),
        )
        .route(
            "/api/prescriptions/appointment/:appointment_id",
            get(handlers::prescriptions::prescription_by_appointment),
        )
        .route(
            "/api/prescriptions/patient",
            get(handlers::prescriptions::patient_prescriptions),
        )
        .route(
            "/api/prescriptions/doctor",
            get(handlers::prescriptions::doctor_prescriptions),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
