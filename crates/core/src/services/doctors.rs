//! Doctor directory and profile management.

use std::sync::Arc;

use hms_types::EmailAddress;
use uuid::Uuid;

use crate::dto::{DoctorResponse, DoctorUpdateRequest};
use crate::error::{HmsError, HmsResult};
use crate::model::Doctor;
use crate::services::{resolve_doctor, user_for_profile};
use crate::store::Datastore;

#[derive(Clone)]
pub struct DoctorService {
    store: Arc<dyn Datastore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// All doctors, available or not.
    pub fn list_all(&self) -> HmsResult<Vec<DoctorResponse>> {
        self.store
            .doctors()
            .iter()
            .map(|d| self.to_response(d))
            .collect()
    }

    /// Only doctors currently accepting appointments.
    pub fn list_available(&self) -> HmsResult<Vec<DoctorResponse>> {
        self.store
            .doctors()
            .iter()
            .filter(|d| d.available)
            .map(|d| self.to_response(d))
            .collect()
    }

    /// Available doctors whose specialization matches case-insensitively.
    pub fn list_by_specialization(&self, specialization: &str) -> HmsResult<Vec<DoctorResponse>> {
        let wanted = specialization.trim().to_lowercase();
        self.store
            .doctors()
            .iter()
            .filter(|d| d.available && d.specialization.to_lowercase() == wanted)
            .map(|d| self.to_response(d))
            .collect()
    }

    pub fn get_by_id(&self, id: Uuid) -> HmsResult<DoctorResponse> {
        let doctor = self
            .store
            .doctor_by_id(id)
            .ok_or_else(|| HmsError::NotFound(format!("Doctor not found with id: {id}")))?;
        self.to_response(&doctor)
    }

    /// The calling doctor's own profile.
    pub fn get_profile(&self, email: &EmailAddress) -> HmsResult<DoctorResponse> {
        let (_, doctor) = resolve_doctor(self.store.as_ref(), email)?;
        self.to_response(&doctor)
    }

    /// Applies a partial profile update; `None` fields are left unchanged.
    /// Name and phone live on the user record, the rest on the profile.
    pub fn update_profile(
        &self,
        email: &EmailAddress,
        update: DoctorUpdateRequest,
    ) -> HmsResult<DoctorResponse> {
        let (mut user, mut doctor) = resolve_doctor(self.store.as_ref(), email)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(specialization) = update.specialization {
            doctor.specialization = specialization;
        }
        if let Some(qualification) = update.qualification {
            doctor.qualification = Some(qualification);
        }
        if let Some(experience_years) = update.experience_years {
            doctor.experience_years = Some(experience_years);
        }
        if let Some(consultation_fee) = update.consultation_fee {
            doctor.consultation_fee = Some(consultation_fee);
        }
        if let Some(bio) = update.bio {
            doctor.bio = Some(bio);
        }
        if let Some(available) = update.available {
            doctor.available = available;
        }

        self.store.update_user(user)?;
        self.store.update_doctor(doctor.clone())?;
        self.to_response(&doctor)
    }

    pub fn update_availability(
        &self,
        email: &EmailAddress,
        available: bool,
    ) -> HmsResult<DoctorResponse> {
        let (_, mut doctor) = resolve_doctor(self.store.as_ref(), email)?;
        doctor.available = available;
        self.store.update_doctor(doctor.clone())?;

        tracing::info!(doctor_id = %doctor.id, available, "doctor availability changed");

        self.to_response(&doctor)
    }

    fn to_response(&self, doctor: &Doctor) -> HmsResult<DoctorResponse> {
        let user = user_for_profile(self.store.as_ref(), doctor.user_id)?;
        Ok(DoctorResponse {
            id: doctor.id,
            user_id: user.id,
            name: user.name,
            email: user.email.as_str().to_owned(),
            phone: user.phone,
            specialization: doctor.specialization.clone(),
            qualification: doctor.qualification.clone(),
            experience_years: doctor.experience_years,
            consultation_fee: doctor.consultation_fee,
            available: doctor.available,
            bio: doctor.bio.clone(),
        })
    }
}
