//! Domain entities and closed enumerations.
//!
//! Entities are plain records owned by the datastore; the REST layer never
//! sees them directly and instead works with the response types in
//! [`crate::dto`]. All ids are v4 UUIDs and all timestamps are UTC.

use chrono::{DateTime, Utc};
use hms_types::EmailAddress;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The role a user account was created with. Immutable after registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Parses a role token case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "PATIENT" => Some(Self::Patient),
            "DOCTOR" => Some(Self::Doctor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Doctor => "DOCTOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }
}

/// Lifecycle of an appointment.
///
/// Only one transition carries an enforced precondition anywhere in the
/// system: CONFIRMED → COMPLETED, triggered exclusively by prescription
/// creation. Every other assignment is caller-driven through the status
/// update operation, which checks ownership but deliberately not the
/// transition itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Rejected,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Parses a status token case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "REJECTED" => Some(Self::Rejected),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// True for the statuses that permit billing and prescribing.
    pub fn allows_fulfilment(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Upi,
    Cash,
    NetBanking,
}

impl PaymentMethod {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "CARD" => Some(Self::Card),
            "UPI" => Some(Self::Upi),
            "CASH" => Some(Self::Cash),
            "NET_BANKING" => Some(Self::NetBanking),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Base identity record. Exactly one `Doctor` or `Patient` profile extends it.
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization: String,
    pub qualification: Option<String>,
    pub experience_years: Option<u32>,
    pub consultation_fee: Option<f64>,
    pub available: bool,
    pub bio: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

/// A booking between one patient and one doctor at a point in time.
///
/// The aggregation root of the clinical flow: a payment and a prescription
/// each belong to exactly one appointment.
#[derive(Clone, Debug)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Payment {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Prescription {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub diagnosis: String,
    pub medications: String,
    pub notes: Option<String>,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(
            AppointmentStatus::parse("confirmed"),
            Some(AppointmentStatus::Confirmed)
        );
        assert_eq!(
            AppointmentStatus::parse(" CANCELLED "),
            Some(AppointmentStatus::Cancelled)
        );
        assert_eq!(AppointmentStatus::parse("archived"), None);
    }

    #[test]
    fn only_confirmed_and_completed_allow_fulfilment() {
        assert!(AppointmentStatus::Confirmed.allows_fulfilment());
        assert!(AppointmentStatus::Completed.allows_fulfilment());
        assert!(!AppointmentStatus::Pending.allows_fulfilment());
        assert!(!AppointmentStatus::Rejected.allows_fulfilment());
        assert!(!AppointmentStatus::Cancelled.allows_fulfilment());
    }

    #[test]
    fn payment_method_parse_accepts_all_tokens() {
        assert_eq!(PaymentMethod::parse("card"), Some(PaymentMethod::Card));
        assert_eq!(
            PaymentMethod::parse("NET_BANKING"),
            Some(PaymentMethod::NetBanking)
        );
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn role_round_trips_through_display() {
        for role in [Role::Patient, Role::Doctor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }
}
