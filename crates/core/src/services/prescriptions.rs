//! Prescription issuance and queries.
//!
//! Creating a prescription is the only operation in the system that moves an
//! appointment to COMPLETED: a CONFIRMED appointment is advanced as part of
//! the same atomic datastore operation that inserts the prescription.

use std::sync::Arc;

use chrono::Utc;
use hms_types::EmailAddress;
use uuid::Uuid;

use crate::dto::{PrescriptionRequest, PrescriptionResponse};
use crate::error::{HmsError, HmsResult};
use crate::model::Prescription;
use crate::services::{resolve_doctor, resolve_patient, user_for_profile};
use crate::store::Datastore;

#[derive(Clone)]
pub struct PrescriptionService {
    store: Arc<dyn Datastore>,
}

impl PrescriptionService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Issues a prescription for an appointment (doctor action).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the appointment or the caller's doctor profile is
    ///   missing
    /// - `Forbidden` if the appointment belongs to another doctor
    /// - `Validation` unless the appointment is CONFIRMED or COMPLETED
    /// - `Conflict` if a prescription already exists for the appointment
    pub fn create(
        &self,
        doctor_email: &EmailAddress,
        request: PrescriptionRequest,
    ) -> HmsResult<PrescriptionResponse> {
        let (_, doctor) = resolve_doctor(self.store.as_ref(), doctor_email)?;

        let appointment = self
            .store
            .appointment_by_id(request.appointment_id)
            .ok_or_else(|| {
                HmsError::NotFound(format!(
                    "Appointment not found with id: {}",
                    request.appointment_id
                ))
            })?;

        if appointment.doctor_id != doctor.id {
            return Err(HmsError::Forbidden(
                "You can only create prescriptions for your own appointments".into(),
            ));
        }
        if !appointment.status.allows_fulfilment() {
            return Err(HmsError::Validation(
                "Prescriptions can only be issued for confirmed or completed appointments".into(),
            ));
        }

        let prescription = Prescription {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            doctor_id: doctor.id,
            patient_id: appointment.patient_id,
            diagnosis: request.diagnosis,
            medications: request.medications,
            notes: request.notes,
            issued_at: Utc::now(),
        };

        // Duplicate check and CONFIRMED → COMPLETED flip happen inside the
        // store, under its transaction boundary.
        let (prescription, appointment) =
            self.store.insert_prescription_completing(prescription)?;

        tracing::info!(
            prescription_id = %prescription.id,
            appointment_id = %appointment.id,
            appointment_status = ?appointment.status,
            "prescription issued"
        );

        self.to_response(&prescription)
    }

    pub fn get_by_appointment(&self, appointment_id: Uuid) -> HmsResult<PrescriptionResponse> {
        let prescription = self
            .store
            .prescription_by_appointment(appointment_id)
            .ok_or_else(|| {
                HmsError::NotFound(format!(
                    "Prescription not found for appointment id: {appointment_id}"
                ))
            })?;
        self.to_response(&prescription)
    }

    /// The calling patient's prescriptions, most recently issued first.
    pub fn list_for_patient(
        &self,
        patient_email: &EmailAddress,
    ) -> HmsResult<Vec<PrescriptionResponse>> {
        let (_, patient) = resolve_patient(self.store.as_ref(), patient_email)?;
        self.store
            .prescriptions_for_patient(patient.id)
            .iter()
            .map(|p| self.to_response(p))
            .collect()
    }

    /// Prescriptions issued by the calling doctor, most recent first.
    pub fn list_for_doctor(
        &self,
        doctor_email: &EmailAddress,
    ) -> HmsResult<Vec<PrescriptionResponse>> {
        let (_, doctor) = resolve_doctor(self.store.as_ref(), doctor_email)?;
        self.store
            .prescriptions_for_doctor(doctor.id)
            .iter()
            .map(|p| self.to_response(p))
            .collect()
    }

    fn to_response(&self, prescription: &Prescription) -> HmsResult<PrescriptionResponse> {
        let appointment = self
            .store
            .appointment_by_id(prescription.appointment_id)
            .ok_or_else(|| {
                HmsError::Internal(format!(
                    "no appointment record for prescription {}",
                    prescription.id
                ))
            })?;
        let doctor = self
            .store
            .doctor_by_id(prescription.doctor_id)
            .ok_or_else(|| {
                HmsError::Internal(format!(
                    "no doctor record for prescription {}",
                    prescription.id
                ))
            })?;
        let patient = self
            .store
            .patient_by_id(prescription.patient_id)
            .ok_or_else(|| {
                HmsError::Internal(format!(
                    "no patient record for prescription {}",
                    prescription.id
                ))
            })?;
        let doctor_user = user_for_profile(self.store.as_ref(), doctor.user_id)?;
        let patient_user = user_for_profile(self.store.as_ref(), patient.user_id)?;

        Ok(PrescriptionResponse {
            id: prescription.id,
            appointment_id: prescription.appointment_id,
            doctor_name: doctor_user.name,
            doctor_specialization: doctor.specialization,
            patient_name: patient_user.name,
            diagnosis: prescription.diagnosis.clone(),
            medications: prescription.medications.clone(),
            notes: prescription.notes.clone(),
            issued_at: prescription.issued_at,
            appointment_date_time: appointment.date_time,
        })
    }
}
