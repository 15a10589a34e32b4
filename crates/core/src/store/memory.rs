//! In-memory datastore.
//!
//! All tables live behind a single `RwLock`; taking the write lock is the
//! transaction boundary. That serialises the create-if-absent checks for
//! payments and prescriptions against concurrent requests, which is the one
//! concurrency-sensitive invariant in the system.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use hms_types::EmailAddress;
use uuid::Uuid;

use crate::error::{HmsError, HmsResult};
use crate::model::{
    Appointment, AppointmentStatus, Doctor, Patient, Payment, Prescription, User,
};
use crate::store::Datastore;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
    appointments: HashMap<Uuid, Appointment>,
    payments: HashMap<Uuid, Payment>,
    prescriptions: HashMap<Uuid, Prescription>,
}

/// Process-local [`Datastore`] backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another request panicked mid-write; the
    // tables themselves are always left in a consistent state because every
    // write validates before mutating.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn by_date_time_desc(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| b.date_time.cmp(&a.date_time));
}

fn by_issued_at_desc(prescriptions: &mut [Prescription]) {
    prescriptions.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
}

impl Datastore for MemoryStore {
    fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    fn user_by_email(&self, email: &EmailAddress) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned()
    }

    fn create_user_with_doctor(&self, user: User, doctor: Doctor) -> HmsResult<()> {
        let mut tables = self.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(HmsError::Conflict("Email is already registered".into()));
        }
        tables.users.insert(user.id, user);
        tables.doctors.insert(doctor.id, doctor);
        Ok(())
    }

    fn create_user_with_patient(&self, user: User, patient: Patient) -> HmsResult<()> {
        let mut tables = self.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(HmsError::Conflict("Email is already registered".into()));
        }
        tables.users.insert(user.id, user);
        tables.patients.insert(patient.id, patient);
        Ok(())
    }

    fn update_user(&self, user: User) -> HmsResult<()> {
        let mut tables = self.write();
        if !tables.users.contains_key(&user.id) {
            return Err(HmsError::NotFound("User not found".into()));
        }
        tables.users.insert(user.id, user);
        Ok(())
    }

    fn doctor_by_id(&self, id: Uuid) -> Option<Doctor> {
        self.read().doctors.get(&id).cloned()
    }

    fn doctor_by_user(&self, user_id: Uuid) -> Option<Doctor> {
        self.read()
            .doctors
            .values()
            .find(|d| d.user_id == user_id)
            .cloned()
    }

    fn doctors(&self) -> Vec<Doctor> {
        self.read().doctors.values().cloned().collect()
    }

    fn update_doctor(&self, doctor: Doctor) -> HmsResult<()> {
        let mut tables = self.write();
        if !tables.doctors.contains_key(&doctor.id) {
            return Err(HmsError::NotFound("Doctor profile not found".into()));
        }
        tables.doctors.insert(doctor.id, doctor);
        Ok(())
    }

    fn patient_by_id(&self, id: Uuid) -> Option<Patient> {
        self.read().patients.get(&id).cloned()
    }

    fn patient_by_user(&self, user_id: Uuid) -> Option<Patient> {
        self.read()
            .patients
            .values()
            .find(|p| p.user_id == user_id)
            .cloned()
    }

    fn update_patient(&self, patient: Patient) -> HmsResult<()> {
        let mut tables = self.write();
        if !tables.patients.contains_key(&patient.id) {
            return Err(HmsError::NotFound("Patient profile not found".into()));
        }
        tables.patients.insert(patient.id, patient);
        Ok(())
    }

    fn insert_appointment(&self, appointment: Appointment) -> HmsResult<()> {
        self.write()
            .appointments
            .insert(appointment.id, appointment);
        Ok(())
    }

    fn appointment_by_id(&self, id: Uuid) -> Option<Appointment> {
        self.read().appointments.get(&id).cloned()
    }

    fn update_appointment(&self, appointment: Appointment) -> HmsResult<()> {
        let mut tables = self.write();
        if !tables.appointments.contains_key(&appointment.id) {
            return Err(HmsError::NotFound(format!(
                "Appointment not found with id: {}",
                appointment.id
            )));
        }
        tables.appointments.insert(appointment.id, appointment);
        Ok(())
    }

    fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self
            .read()
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        by_date_time_desc(&mut rows);
        rows
    }

    fn appointments_for_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self
            .read()
            .appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect();
        by_date_time_desc(&mut rows);
        rows
    }

    fn appointments_for_doctor_between(
        &self,
        doctor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self
            .read()
            .appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.date_time >= from && a.date_time < to)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date_time.cmp(&b.date_time));
        rows
    }

    fn insert_payment(&self, payment: Payment) -> HmsResult<Payment> {
        let mut tables = self.write();
        if tables
            .payments
            .values()
            .any(|p| p.appointment_id == payment.appointment_id)
        {
            return Err(HmsError::Conflict(
                "Payment has already been made for this appointment".into(),
            ));
        }
        tables.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn payment_by_appointment(&self, appointment_id: Uuid) -> Option<Payment> {
        self.read()
            .payments
            .values()
            .find(|p| p.appointment_id == appointment_id)
            .cloned()
    }

    fn has_payment(&self, appointment_id: Uuid) -> bool {
        self.read()
            .payments
            .values()
            .any(|p| p.appointment_id == appointment_id)
    }

    fn insert_prescription_completing(
        &self,
        prescription: Prescription,
    ) -> HmsResult<(Prescription, Appointment)> {
        let mut tables = self.write();
        if tables
            .prescriptions
            .values()
            .any(|p| p.appointment_id == prescription.appointment_id)
        {
            return Err(HmsError::Conflict(
                "Prescription already exists for this appointment".into(),
            ));
        }

        let appointment = tables
            .appointments
            .get_mut(&prescription.appointment_id)
            .ok_or_else(|| {
                HmsError::NotFound(format!(
                    "Appointment not found with id: {}",
                    prescription.appointment_id
                ))
            })?;
        if appointment.status == AppointmentStatus::Confirmed {
            appointment.status = AppointmentStatus::Completed;
        }
        let appointment = appointment.clone();

        tables
            .prescriptions
            .insert(prescription.id, prescription.clone());
        Ok((prescription, appointment))
    }

    fn prescription_by_appointment(&self, appointment_id: Uuid) -> Option<Prescription> {
        self.read()
            .prescriptions
            .values()
            .find(|p| p.appointment_id == appointment_id)
            .cloned()
    }

    fn prescriptions_for_patient(&self, patient_id: Uuid) -> Vec<Prescription> {
        let mut rows: Vec<Prescription> = self
            .read()
            .prescriptions
            .values()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect();
        by_issued_at_desc(&mut rows);
        rows
    }

    fn prescriptions_for_doctor(&self, doctor_id: Uuid) -> Vec<Prescription> {
        let mut rows: Vec<Prescription> = self
            .read()
            .prescriptions
            .values()
            .filter(|p| p.doctor_id == doctor_id)
            .cloned()
            .collect();
        by_issued_at_desc(&mut rows);
        rows
    }

    fn has_prescription(&self, appointment_id: Uuid) -> bool {
        self.read()
            .prescriptions
            .values()
            .any(|p| p.appointment_id == appointment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, PaymentStatus, Role};
    use chrono::Duration;

    fn user(email: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".into(),
            email: EmailAddress::parse(email).expect("valid email"),
            password_hash: "hash".into(),
            phone: None,
            role,
            created_at: Utc::now(),
        }
    }

    fn doctor(user_id: Uuid) -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            user_id,
            specialization: "Cardiology".into(),
            qualification: None,
            experience_years: None,
            consultation_fee: Some(500.0),
            available: true,
            bio: None,
        }
    }

    fn appointment(
        patient_id: Uuid,
        doctor_id: Uuid,
        status: AppointmentStatus,
        date_time: DateTime<Utc>,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            date_time,
            status,
            reason: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn payment(appointment_id: Uuid) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            appointment_id,
            amount: 500.0,
            method: PaymentMethod::Card,
            status: PaymentStatus::Completed,
            transaction_id: "TXN-AAAAAAAA".into(),
            paid_at: Utc::now(),
        }
    }

    fn prescription(appointment_id: Uuid, doctor_id: Uuid, patient_id: Uuid) -> Prescription {
        Prescription {
            id: Uuid::new_v4(),
            appointment_id,
            doctor_id,
            patient_id,
            diagnosis: "Hypertension".into(),
            medications: "Amlodipine 5mg".into(),
            notes: None,
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_email_is_rejected_atomically() {
        let store = MemoryStore::new();
        let first = user("doc@example.com", Role::Doctor);
        let first_profile = doctor(first.id);
        store
            .create_user_with_doctor(first, first_profile)
            .expect("first registration should succeed");

        let second = user("DOC@example.com", Role::Doctor);
        let second_id = second.id;
        let second_profile = doctor(second.id);
        let err = store
            .create_user_with_doctor(second, second_profile)
            .expect_err("same email should conflict");
        assert!(matches!(err, HmsError::Conflict(_)));

        // Neither row of the failed registration may exist.
        assert!(store.user_by_id(second_id).is_none());
        assert!(store.doctor_by_user(second_id).is_none());
    }

    #[test]
    fn second_payment_for_same_appointment_conflicts() {
        let store = MemoryStore::new();
        let appointment_id = Uuid::new_v4();
        store
            .insert_payment(payment(appointment_id))
            .expect("first payment should insert");
        let err = store
            .insert_payment(payment(appointment_id))
            .expect_err("second payment should conflict");
        assert!(matches!(err, HmsError::Conflict(_)));
    }

    #[test]
    fn prescription_insert_completes_confirmed_appointment() {
        let store = MemoryStore::new();
        let appt = appointment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            AppointmentStatus::Confirmed,
            Utc::now() + Duration::days(1),
        );
        store
            .insert_appointment(appt.clone())
            .expect("insert appointment");

        let (_, after) = store
            .insert_prescription_completing(prescription(appt.id, appt.doctor_id, appt.patient_id))
            .expect("prescription should insert");
        assert_eq!(after.status, AppointmentStatus::Completed);

        let stored = store
            .appointment_by_id(appt.id)
            .expect("appointment still present");
        assert_eq!(stored.status, AppointmentStatus::Completed);
    }

    #[test]
    fn prescription_insert_leaves_completed_appointment_alone() {
        let store = MemoryStore::new();
        let appt = appointment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            AppointmentStatus::Completed,
            Utc::now() + Duration::days(1),
        );
        store
            .insert_appointment(appt.clone())
            .expect("insert appointment");

        let (_, after) = store
            .insert_prescription_completing(prescription(appt.id, appt.doctor_id, appt.patient_id))
            .expect("prescription should insert");
        assert_eq!(after.status, AppointmentStatus::Completed);
    }

    #[test]
    fn second_prescription_conflicts_and_does_not_touch_status() {
        let store = MemoryStore::new();
        let appt = appointment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            AppointmentStatus::Confirmed,
            Utc::now() + Duration::days(1),
        );
        store
            .insert_appointment(appt.clone())
            .expect("insert appointment");
        store
            .insert_prescription_completing(prescription(appt.id, appt.doctor_id, appt.patient_id))
            .expect("first prescription should insert");

        let err = store
            .insert_prescription_completing(prescription(appt.id, appt.doctor_id, appt.patient_id))
            .expect_err("second prescription should conflict");
        assert!(matches!(err, HmsError::Conflict(_)));
    }

    #[test]
    fn appointments_for_patient_are_newest_first() {
        let store = MemoryStore::new();
        let patient_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();
        let now = Utc::now();

        for days in [1, 3, 2] {
            store
                .insert_appointment(appointment(
                    patient_id,
                    doctor_id,
                    AppointmentStatus::Pending,
                    now + Duration::days(days),
                ))
                .expect("insert appointment");
        }

        let rows = store.appointments_for_patient(patient_id);
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].date_time >= w[1].date_time));
    }

    #[test]
    fn doctor_day_range_is_half_open() {
        let store = MemoryStore::new();
        let doctor_id = Uuid::new_v4();
        let from = Utc::now();
        let to = from + Duration::days(1);

        let inside = appointment(
            Uuid::new_v4(),
            doctor_id,
            AppointmentStatus::Pending,
            from,
        );
        let at_boundary = appointment(
            Uuid::new_v4(),
            doctor_id,
            AppointmentStatus::Pending,
            to,
        );
        store
            .insert_appointment(inside.clone())
            .expect("insert appointment");
        store
            .insert_appointment(at_boundary)
            .expect("insert appointment");

        let rows = store.appointments_for_doctor_between(doctor_id, from, to);
        assert_eq!(rows.len(), 1, "upper boundary must be exclusive");
        assert_eq!(rows[0].id, inside.id);
    }
}
