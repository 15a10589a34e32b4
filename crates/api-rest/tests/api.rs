//! End-to-end tests driving the full router over HTTP semantics.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_rest::AppState;
use hms_core::{CoreConfig, Datastore, MemoryStore};
use hms_types::NonEmptyText;

fn app() -> Router {
    let cfg = Arc::new(
        CoreConfig::new(NonEmptyText::new("integration-test-secret").unwrap(), 1).unwrap(),
    );
    let store: Arc<dyn Datastore> = Arc::new(MemoryStore::new());
    api_rest::router(AppState::new(cfg, store))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_doctor(app: &Router, email: &str, specialization: &str, fee: f64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Dr. Strange",
            "email": email,
            "password": "password",
            "role": "DOCTOR",
            "specialization": specialization,
            "qualification": "MD",
            "consultationFee": fee,
            "bio": "Consultant"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register doctor: {body}");
    body["data"]["token"].as_str().unwrap().to_owned()
}

async fn register_patient(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Jane Doe",
            "email": email,
            "password": "password",
            "role": "PATIENT",
            "age": 32,
            "gender": "FEMALE"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register patient: {body}");
    body["data"]["token"].as_str().unwrap().to_owned()
}

/// Full clinical flow: register both roles, book, confirm, pay, prescribe.
#[tokio::test]
async fn booking_payment_and_prescription_flow() {
    let app = app();

    let doctor_token = register_doctor(&app, "doc@example.com", "Cardiology", 500.0).await;
    let patient_token = register_patient(&app, "pat@example.com").await;

    // Patient finds the doctor through the public directory.
    let (status, body) = send(&app, "GET", "/api/doctors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let doctor_id = body["data"][0]["id"].as_str().unwrap().to_owned();

    // Book for tomorrow; the appointment starts PENDING.
    let tomorrow = (chrono::Utc::now() + chrono::Duration::days(1)).to_rfc3339();
    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&patient_token),
        Some(json!({
            "doctorId": doctor_id,
            "appointmentDateTime": tomorrow,
            "reason": "chest pain"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "book: {body}");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["consultationFee"], 500.0);
    let appointment_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Paying a PENDING appointment is rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&patient_token),
        Some(json!({
            "appointmentId": appointment_id,
            "amount": 500.0,
            "paymentMethod": "CARD"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Doctor confirms.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{appointment_id}/status"),
        Some(&doctor_token),
        Some(json!({"status": "CONFIRMED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "confirm: {body}");
    assert_eq!(body["data"]["status"], "CONFIRMED");

    // Patient pays; payment is immediately COMPLETED with a TXN- id.
    let (status, body) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&patient_token),
        Some(json!({
            "appointmentId": appointment_id,
            "amount": 500.0,
            "paymentMethod": "CARD"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "pay: {body}");
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert!(body["data"]["transactionId"]
        .as_str()
        .unwrap()
        .starts_with("TXN-"));

    // A second payment conflicts.
    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&patient_token),
        Some(json!({
            "appointmentId": appointment_id,
            "amount": 500.0,
            "paymentMethod": "CARD"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Doctor issues a prescription; the appointment auto-completes.
    let (status, body) = send(
        &app,
        "POST",
        "/api/prescriptions",
        Some(&doctor_token),
        Some(json!({
            "appointmentId": appointment_id,
            "diagnosis": "Angina",
            "medications": "GTN spray as needed",
            "notes": "Follow up in two weeks"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "prescribe: {body}");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/appointments/{appointment_id}"),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["hasPrescription"], true);
    assert_eq!(body["data"]["hasPayment"], true);

    // A second prescription conflicts.
    let (status, body) = send(
        &app,
        "POST",
        "/api/prescriptions",
        Some(&doctor_token),
        Some(json!({
            "appointmentId": appointment_id,
            "diagnosis": "Angina",
            "medications": "GTN spray as needed"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Prescription already exists for this appointment"
    );

    // Patient sees the prescription in their listing.
    let (status, body) = send(
        &app,
        "GET",
        "/api/prescriptions/patient",
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["diagnosis"], "Angina");
}

#[tokio::test]
async fn doctor_directory_is_public_and_filters_by_specialization() {
    let app = app();

    let cardio_token = register_doctor(&app, "cardio@example.com", "Cardiology", 500.0).await;
    register_doctor(&app, "derm@example.com", "Dermatology", 300.0).await;

    // The cardiologist goes unavailable.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/doctors/availability",
        Some(&cardio_token),
        Some(json!({"available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Unauthenticated directory listing includes unavailable doctors.
    let (status, body) = send(&app, "GET", "/api/doctors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // The specialization filter matches case-insensitively and only returns
    // available doctors, so the unavailable cardiologist disappears.
    let (status, body) = send(
        &app,
        "GET",
        "/api/doctors/specialization/cardiology",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        "GET",
        "/api/doctors/specialization/DERMATOLOGY",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["email"], "derm@example.com");
}

#[tokio::test]
async fn register_and_login_round_trip() {
    let app = app();
    register_doctor(&app, "doc@example.com", "Cardiology", 500.0).await;

    // Duplicate email registration is a 400, not 409.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Impostor",
            "email": "doc@example.com",
            "password": "password",
            "role": "DOCTOR"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already registered");

    // Login works with the registered credentials.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "doc@example.com", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_owned();

    // The token opens the doctor's own profile, which round-trips the
    // registration fields.
    let (status, body) = send(&app, "GET", "/api/doctors/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["specialization"], "Cardiology");
    assert_eq!(body["data"]["consultationFee"], 500.0);
    assert_eq!(body["data"]["bio"], "Consultant");

    // Wrong password is a 401.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "doc@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();

    let (status, _) = send(&app, "GET", "/api/appointments/patient", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "GET",
        "/api/appointments/patient",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_mismatch_fails_profile_resolution_with_404() {
    let app = app();
    let patient_token = register_patient(&app, "pat@example.com").await;

    // A patient token on a doctor-scoped route fails to resolve a doctor
    // profile rather than being rejected up front.
    let (status, body) = send(
        &app,
        "GET",
        "/api/doctors/profile",
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Doctor profile not found");
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}
