//! Datastore abstraction.
//!
//! Services depend on the [`Datastore`] trait, never on a concrete backend.
//! Operations that must be atomic with respect to concurrent requests are
//! single trait methods, so each implementation can put them inside its own
//! transaction boundary (the in-memory backend uses one write lock; a
//! relational backend would use a database transaction).

mod memory;

pub use memory::MemoryStore;

use crate::error::HmsResult;
use crate::model::{Appointment, Doctor, Patient, Payment, Prescription, User};
use chrono::{DateTime, Utc};
use hms_types::EmailAddress;
use uuid::Uuid;

/// Persistent storage for every HMS record family.
///
/// List operations return the orderings the callers render: appointments by
/// `date_time` descending, prescriptions by `issued_at` descending, a
/// doctor's day schedule ascending.
pub trait Datastore: Send + Sync {
    // ---- users ------------------------------------------------------------

    fn user_by_id(&self, id: Uuid) -> Option<User>;
    fn user_by_email(&self, email: &EmailAddress) -> Option<User>;

    /// Creates a user together with their doctor profile.
    ///
    /// The email-uniqueness check and both inserts are one atomic unit;
    /// a taken email is a conflict and nothing is written.
    fn create_user_with_doctor(&self, user: User, doctor: Doctor) -> HmsResult<()>;

    /// Creates a user together with their patient profile. Same atomicity
    /// contract as [`Datastore::create_user_with_doctor`].
    fn create_user_with_patient(&self, user: User, patient: Patient) -> HmsResult<()>;

    fn update_user(&self, user: User) -> HmsResult<()>;

    // ---- profiles ---------------------------------------------------------

    fn doctor_by_id(&self, id: Uuid) -> Option<Doctor>;
    fn doctor_by_user(&self, user_id: Uuid) -> Option<Doctor>;
    fn doctors(&self) -> Vec<Doctor>;
    fn update_doctor(&self, doctor: Doctor) -> HmsResult<()>;

    fn patient_by_id(&self, id: Uuid) -> Option<Patient>;
    fn patient_by_user(&self, user_id: Uuid) -> Option<Patient>;
    fn update_patient(&self, patient: Patient) -> HmsResult<()>;

    // ---- appointments -----------------------------------------------------

    fn insert_appointment(&self, appointment: Appointment) -> HmsResult<()>;
    fn appointment_by_id(&self, id: Uuid) -> Option<Appointment>;
    fn update_appointment(&self, appointment: Appointment) -> HmsResult<()>;
    fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment>;
    fn appointments_for_doctor(&self, doctor_id: Uuid) -> Vec<Appointment>;

    /// Appointments for a doctor in the half-open range `[from, to)`.
    fn appointments_for_doctor_between(
        &self,
        doctor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Appointment>;

    // ---- payments ---------------------------------------------------------

    /// Inserts a payment, enforcing at most one payment per appointment.
    ///
    /// The existence check and the insert are one atomic unit; a second
    /// payment for the same appointment is a conflict.
    fn insert_payment(&self, payment: Payment) -> HmsResult<Payment>;
    fn payment_by_appointment(&self, appointment_id: Uuid) -> Option<Payment>;
    fn has_payment(&self, appointment_id: Uuid) -> bool;

    // ---- prescriptions ----------------------------------------------------

    /// Inserts a prescription, enforcing at most one per appointment, and
    /// advances the owning appointment CONFIRMED → COMPLETED in the same
    /// atomic unit. Returns the stored prescription and the appointment as
    /// it stands afterwards.
    fn insert_prescription_completing(
        &self,
        prescription: Prescription,
    ) -> HmsResult<(Prescription, Appointment)>;
    fn prescription_by_appointment(&self, appointment_id: Uuid) -> Option<Prescription>;
    fn prescriptions_for_patient(&self, patient_id: Uuid) -> Vec<Prescription>;
    fn prescriptions_for_doctor(&self, doctor_id: Uuid) -> Vec<Prescription>;
    fn has_prescription(&self, appointment_id: Uuid) -> bool;
}
