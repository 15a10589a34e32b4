//! Payment recording.
//!
//! There is no payment gateway: a payment is recorded once, unconditionally
//! COMPLETED, as billing history for a confirmed or completed appointment.

use std::sync::Arc;

use chrono::Utc;
use hms_types::EmailAddress;
use uuid::Uuid;

use crate::dto::{PaymentRequest, PaymentResponse};
use crate::error::{HmsError, HmsResult};
use crate::model::{Payment, PaymentMethod, PaymentStatus};
use crate::services::user_for_profile;
use crate::store::Datastore;

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn Datastore>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Records a payment for an appointment.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the appointment is missing
    /// - `Validation` unless the appointment is CONFIRMED or COMPLETED, or
    ///   if the method token is unknown
    /// - `Conflict` if the appointment has already been paid for
    pub fn make_payment(&self, request: PaymentRequest) -> HmsResult<PaymentResponse> {
        let appointment = self
            .store
            .appointment_by_id(request.appointment_id)
            .ok_or_else(|| {
                HmsError::NotFound(format!(
                    "Appointment not found with id: {}",
                    request.appointment_id
                ))
            })?;

        if !appointment.status.allows_fulfilment() {
            return Err(HmsError::Validation(
                "Payment can only be made for confirmed or completed appointments".into(),
            ));
        }

        let method = PaymentMethod::parse(&request.payment_method).ok_or_else(|| {
            HmsError::Validation(format!("Invalid payment method: {}", request.payment_method))
        })?;

        let payment = Payment {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            amount: request.amount,
            method,
            status: PaymentStatus::Completed,
            transaction_id: new_transaction_id(),
            paid_at: Utc::now(),
        };

        // The duplicate check happens inside the store, under its
        // transaction boundary; randomness alone is not trusted for the
        // one-payment-per-appointment invariant.
        let payment = self.store.insert_payment(payment)?;

        tracing::info!(
            payment_id = %payment.id,
            appointment_id = %appointment.id,
            transaction_id = %payment.transaction_id,
            "payment recorded"
        );

        self.to_response(&payment)
    }

    pub fn get_by_appointment(&self, appointment_id: Uuid) -> HmsResult<PaymentResponse> {
        let payment = self
            .store
            .payment_by_appointment(appointment_id)
            .ok_or_else(|| {
                HmsError::NotFound(format!(
                    "Payment not found for appointment id: {appointment_id}"
                ))
            })?;
        self.to_response(&payment)
    }

    fn to_response(&self, payment: &Payment) -> HmsResult<PaymentResponse> {
        let appointment = self
            .store
            .appointment_by_id(payment.appointment_id)
            .ok_or_else(|| {
                HmsError::Internal(format!("no appointment record for payment {}", payment.id))
            })?;
        let doctor = self
            .store
            .doctor_by_id(appointment.doctor_id)
            .ok_or_else(|| {
                HmsError::Internal(format!("no doctor record for payment {}", payment.id))
            })?;
        let patient = self
            .store
            .patient_by_id(appointment.patient_id)
            .ok_or_else(|| {
                HmsError::Internal(format!("no patient record for payment {}", payment.id))
            })?;
        let doctor_user = user_for_profile(self.store.as_ref(), doctor.user_id)?;
        let patient_user = user_for_profile(self.store.as_ref(), patient.user_id)?;

        Ok(PaymentResponse {
            id: payment.id,
            appointment_id: payment.appointment_id,
            doctor_name: doctor_user.name,
            patient_name: patient_user.name,
            amount: payment.amount,
            payment_method: payment.method,
            status: payment.status,
            transaction_id: payment.transaction_id.clone(),
            paid_at: payment.paid_at,
        })
    }
}

/// Display-grade transaction identifier: `TXN-` plus the first eight hex
/// characters of a v4 UUID, uppercased.
fn new_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TXN-{}", hex[..8].to_uppercase())
}
