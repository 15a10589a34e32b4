//! Request-facing services.
//!
//! Each service owns one slice of the domain and holds a shared handle to the
//! datastore. Caller identity arrives as the authenticated email address from
//! the access token; resolution of that email to a profile is centralised
//! here so no service re-derives it.

pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod patients;
pub mod payments;
pub mod prescriptions;

pub use appointments::AppointmentService;
pub use auth::AuthService;
pub use doctors::DoctorService;
pub use patients::PatientService;
pub use payments::PaymentService;
pub use prescriptions::PrescriptionService;

use crate::error::{HmsError, HmsResult};
use crate::model::{Doctor, Patient, User};
use crate::store::Datastore;
use hms_types::EmailAddress;

/// Resolves an authenticated email to its user and doctor profile.
pub(crate) fn resolve_doctor(
    store: &dyn Datastore,
    email: &EmailAddress,
) -> HmsResult<(User, Doctor)> {
    let user = store
        .user_by_email(email)
        .ok_or_else(|| HmsError::NotFound("User not found".into()))?;
    let doctor = store
        .doctor_by_user(user.id)
        .ok_or_else(|| HmsError::NotFound("Doctor profile not found".into()))?;
    Ok((user, doctor))
}

/// Resolves an authenticated email to its user and patient profile.
pub(crate) fn resolve_patient(
    store: &dyn Datastore,
    email: &EmailAddress,
) -> HmsResult<(User, Patient)> {
    let user = store
        .user_by_email(email)
        .ok_or_else(|| HmsError::NotFound("User not found".into()))?;
    let patient = store
        .patient_by_user(user.id)
        .ok_or_else(|| HmsError::NotFound("Patient profile not found".into()))?;
    Ok((user, patient))
}

/// Looks up the user row backing a profile.
///
/// Profiles are created together with their user in one atomic unit, so a
/// missing user here is a broken referential invariant, not a caller error.
pub(crate) fn user_for_profile(store: &dyn Datastore, user_id: uuid::Uuid) -> HmsResult<User> {
    store
        .user_by_id(user_id)
        .ok_or_else(|| HmsError::Internal(format!("no user record for profile owner {user_id}")))
}
