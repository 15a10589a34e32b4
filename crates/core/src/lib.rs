//! # HMS Core
//!
//! Core business logic for the hospital management system:
//! - identity, doctor and patient profiles
//! - appointment booking and its status lifecycle
//! - prescription issuance (the only trigger for auto-completion)
//! - one-shot payment recording with an idempotency guard
//!
//! **No API concerns**: HTTP routing, token extraction and response shaping
//! belong in `api-rest`.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod services;
pub mod store;

pub use auth::{AccessTokenClaims, TokenService};
pub use config::CoreConfig;
pub use error::{HmsError, HmsResult};
pub use services::{
    AppointmentService, AuthService, DoctorService, PatientService, PaymentService,
    PrescriptionService,
};
pub use store::{Datastore, MemoryStore};
