//! Appointment booking and status transitions.
//!
//! The status lifecycle is deliberately permissive: `update_status` checks
//! that the caller owns the appointment and that the token names one of the
//! five statuses, and nothing else. Any status may replace any other; the
//! only transition with an enforced precondition (CONFIRMED → COMPLETED) is
//! triggered by prescription creation, not here. Tightening this table is a
//! known open product question; do not add transition checks without
//! guidance.

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use hms_types::EmailAddress;
use uuid::Uuid;

use crate::dto::{AppointmentRequest, AppointmentResponse};
use crate::error::{HmsError, HmsResult};
use crate::model::{Appointment, AppointmentStatus};
use crate::services::{resolve_doctor, resolve_patient, user_for_profile};
use crate::store::Datastore;

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn Datastore>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Books a new appointment for the calling patient.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the doctor does not exist (or the caller has no
    ///   patient profile)
    /// - `Validation` if the doctor is unavailable or the requested time is
    ///   not strictly in the future
    pub fn book(
        &self,
        patient_email: &EmailAddress,
        request: AppointmentRequest,
    ) -> HmsResult<AppointmentResponse> {
        let (_, patient) = resolve_patient(self.store.as_ref(), patient_email)?;

        let doctor = self.store.doctor_by_id(request.doctor_id).ok_or_else(|| {
            HmsError::NotFound(format!("Doctor not found with id: {}", request.doctor_id))
        })?;

        if !doctor.available {
            return Err(HmsError::Validation(
                "Doctor is not available for appointments".into(),
            ));
        }
        if request.appointment_date_time <= Utc::now() {
            return Err(HmsError::Validation(
                "Appointment date must be in the future".into(),
            ));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            date_time: request.appointment_date_time,
            status: AppointmentStatus::Pending,
            reason: request.reason,
            notes: None,
            created_at: Utc::now(),
        };
        self.store.insert_appointment(appointment.clone())?;

        tracing::info!(
            appointment_id = %appointment.id,
            doctor_id = %doctor.id,
            patient_id = %patient.id,
            "appointment booked"
        );

        self.to_response(&appointment)
    }

    /// The calling patient's appointments, newest first.
    pub fn list_for_patient(
        &self,
        patient_email: &EmailAddress,
    ) -> HmsResult<Vec<AppointmentResponse>> {
        let (_, patient) = resolve_patient(self.store.as_ref(), patient_email)?;
        self.store
            .appointments_for_patient(patient.id)
            .iter()
            .map(|a| self.to_response(a))
            .collect()
    }

    /// The calling doctor's appointments, newest first.
    pub fn list_for_doctor(
        &self,
        doctor_email: &EmailAddress,
    ) -> HmsResult<Vec<AppointmentResponse>> {
        let (_, doctor) = resolve_doctor(self.store.as_ref(), doctor_email)?;
        self.store
            .appointments_for_doctor(doctor.id)
            .iter()
            .map(|a| self.to_response(a))
            .collect()
    }

    /// The calling doctor's appointments in `[start-of-today, start-of-tomorrow)`.
    pub fn list_doctor_today(
        &self,
        doctor_email: &EmailAddress,
    ) -> HmsResult<Vec<AppointmentResponse>> {
        let (_, doctor) = resolve_doctor(self.store.as_ref(), doctor_email)?;

        let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let end_of_day = start_of_day + Duration::days(1);

        self.store
            .appointments_for_doctor_between(doctor.id, start_of_day, end_of_day)
            .iter()
            .map(|a| self.to_response(a))
            .collect()
    }

    /// Fetches an appointment by id.
    ///
    /// Any authenticated caller may fetch any appointment; there is no
    /// ownership check here. Preserved as-is.
    pub fn get_by_id(&self, id: Uuid) -> HmsResult<AppointmentResponse> {
        let appointment = self
            .store
            .appointment_by_id(id)
            .ok_or_else(|| HmsError::NotFound(format!("Appointment not found with id: {id}")))?;
        self.to_response(&appointment)
    }

    /// Sets an appointment's status (doctor action).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the appointment or the caller's doctor profile is
    ///   missing
    /// - `Forbidden` if the appointment belongs to another doctor
    /// - `Validation` if `status` is not one of the five status tokens
    pub fn update_status(
        &self,
        id: Uuid,
        status: &str,
        doctor_email: &EmailAddress,
    ) -> HmsResult<AppointmentResponse> {
        let mut appointment = self
            .store
            .appointment_by_id(id)
            .ok_or_else(|| HmsError::NotFound(format!("Appointment not found with id: {id}")))?;

        let (_, doctor) = resolve_doctor(self.store.as_ref(), doctor_email)?;
        if appointment.doctor_id != doctor.id {
            return Err(HmsError::Forbidden(
                "You can only update your own appointments".into(),
            ));
        }

        let new_status = AppointmentStatus::parse(status)
            .ok_or_else(|| HmsError::Validation(format!("Invalid appointment status: {status}")))?;

        let old_status = appointment.status;
        appointment.status = new_status;
        self.store.update_appointment(appointment.clone())?;

        tracing::info!(
            appointment_id = %appointment.id,
            ?old_status,
            ?new_status,
            "appointment status updated"
        );

        self.to_response(&appointment)
    }

    fn to_response(&self, appointment: &Appointment) -> HmsResult<AppointmentResponse> {
        let patient = self
            .store
            .patient_by_id(appointment.patient_id)
            .ok_or_else(|| {
                HmsError::Internal(format!(
                    "no patient record for appointment {}",
                    appointment.id
                ))
            })?;
        let doctor = self
            .store
            .doctor_by_id(appointment.doctor_id)
            .ok_or_else(|| {
                HmsError::Internal(format!(
                    "no doctor record for appointment {}",
                    appointment.id
                ))
            })?;
        let patient_user = user_for_profile(self.store.as_ref(), patient.user_id)?;
        let doctor_user = user_for_profile(self.store.as_ref(), doctor.user_id)?;

        Ok(AppointmentResponse {
            id: appointment.id,
            patient_id: patient.id,
            patient_name: patient_user.name,
            doctor_id: doctor.id,
            doctor_name: doctor_user.name,
            doctor_specialization: doctor.specialization,
            appointment_date_time: appointment.date_time,
            status: appointment.status,
            reason: appointment.reason.clone(),
            notes: appointment.notes.clone(),
            consultation_fee: doctor.consultation_fee,
            created_at: appointment.created_at,
            has_prescription: self.store.has_prescription(appointment.id),
            has_payment: self.store.has_payment(appointment.id),
        })
    }
}
