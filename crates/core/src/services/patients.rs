//! Patient profile management.

use std::sync::Arc;

use hms_types::EmailAddress;

use crate::dto::{PatientResponse, PatientUpdateRequest};
use crate::error::{HmsError, HmsResult};
use crate::model::{Gender, Patient};
use crate::services::{resolve_patient, user_for_profile};
use crate::store::Datastore;

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn Datastore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// The calling patient's own profile.
    pub fn get_profile(&self, email: &EmailAddress) -> HmsResult<PatientResponse> {
        let (_, patient) = resolve_patient(self.store.as_ref(), email)?;
        self.to_response(&patient)
    }

    /// Applies a partial profile update; `None` fields are left unchanged.
    pub fn update_profile(
        &self,
        email: &EmailAddress,
        update: PatientUpdateRequest,
    ) -> HmsResult<PatientResponse> {
        let (mut user, mut patient) = resolve_patient(self.store.as_ref(), email)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(age) = update.age {
            patient.age = Some(age);
        }
        if let Some(gender) = update.gender.as_deref() {
            patient.gender = Some(
                Gender::parse(gender)
                    .ok_or_else(|| HmsError::Validation(format!("Invalid gender: {gender}")))?,
            );
        }
        if let Some(blood_group) = update.blood_group {
            patient.blood_group = Some(blood_group);
        }
        if let Some(address) = update.address {
            patient.address = Some(address);
        }
        if let Some(emergency_contact) = update.emergency_contact {
            patient.emergency_contact = Some(emergency_contact);
        }

        self.store.update_user(user)?;
        self.store.update_patient(patient.clone())?;
        self.to_response(&patient)
    }

    fn to_response(&self, patient: &Patient) -> HmsResult<PatientResponse> {
        let user = user_for_profile(self.store.as_ref(), patient.user_id)?;
        Ok(PatientResponse {
            id: patient.id,
            user_id: user.id,
            name: user.name,
            email: user.email.as_str().to_owned(),
            phone: user.phone,
            age: patient.age,
            gender: patient.gender.map(|g| g.as_str().to_owned()),
            blood_group: patient.blood_group.clone(),
            address: patient.address.clone(),
            emergency_contact: patient.emergency_contact.clone(),
        })
    }
}
