//! Registration and login.

use std::sync::Arc;

use chrono::Utc;
use hms_types::EmailAddress;
use uuid::Uuid;

use crate::auth::{password, TokenService};
use crate::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{HmsError, HmsResult};
use crate::model::{Doctor, Gender, Patient, Role, User};
use crate::store::Datastore;

const MIN_PASSWORD_LEN: usize = 6;

/// Handles user registration and credential login.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Datastore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn Datastore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Registers a new user.
    ///
    /// Creates the `User` record and the role-matching profile in one atomic
    /// datastore operation, then issues an access token bound to the user's
    /// email.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank name, malformed email, short password, or
    ///   unknown role/gender token
    /// - `Conflict` if the email is already registered
    pub fn register(&self, request: RegisterRequest) -> HmsResult<AuthResponse> {
        if request.name.trim().is_empty() {
            return Err(HmsError::Validation("Name is required".into()));
        }
        let email = EmailAddress::parse(&request.email)
            .map_err(|_| HmsError::Validation("Invalid email format".into()))?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(HmsError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        let role = Role::parse(&request.role)
            .ok_or_else(|| HmsError::Validation(format!("Invalid role: {}", request.role)))?;

        let user = User {
            id: Uuid::new_v4(),
            name: request.name.trim().to_owned(),
            email: email.clone(),
            password_hash: password::hash(&request.password)?,
            phone: request.phone.clone(),
            role,
            created_at: Utc::now(),
        };

        match role {
            Role::Patient => {
                let gender = request
                    .gender
                    .as_deref()
                    .map(|g| {
                        Gender::parse(g)
                            .ok_or_else(|| HmsError::Validation(format!("Invalid gender: {g}")))
                    })
                    .transpose()?;
                let patient = Patient {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    age: request.age,
                    gender,
                    blood_group: request.blood_group,
                    address: request.address,
                    emergency_contact: request.emergency_contact,
                };
                self.store.create_user_with_patient(user.clone(), patient)?;
            }
            Role::Doctor => {
                let doctor = Doctor {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    specialization: request.specialization.unwrap_or_default(),
                    qualification: request.qualification,
                    experience_years: request.experience_years,
                    consultation_fee: request.consultation_fee,
                    available: true,
                    bio: request.bio,
                };
                self.store.create_user_with_doctor(user.clone(), doctor)?;
            }
        }

        tracing::info!(email = %email, %role, "registered new user");

        let token = self.tokens.issue(&email, role)?;
        Ok(auth_response(token, &user))
    }

    /// Authenticates a user and issues a fresh access token.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for an unknown email or a wrong password; the two
    /// cases are indistinguishable to the caller.
    pub fn login(&self, request: LoginRequest) -> HmsResult<AuthResponse> {
        let invalid = || HmsError::Unauthenticated("Invalid email or password".into());

        let email = EmailAddress::parse(&request.email).map_err(|_| invalid())?;
        let user = self.store.user_by_email(&email).ok_or_else(invalid)?;
        if !password::verify(&request.password, &user.password_hash) {
            return Err(invalid());
        }

        tracing::debug!(email = %email, "login succeeded");

        let token = self.tokens.issue(&user.email, user.role)?;
        Ok(auth_response(token, &user))
    }
}

fn auth_response(token: String, user: &User) -> AuthResponse {
    AuthResponse {
        token,
        token_type: "Bearer".into(),
        user_id: user.id,
        name: user.name.clone(),
        email: user.email.as_str().to_owned(),
        role: user.role.as_str().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::store::MemoryStore;
    use hms_types::NonEmptyText;

    fn service() -> AuthService {
        let cfg = Arc::new(
            CoreConfig::new(NonEmptyText::new("test-secret").expect("secret"), 1)
                .expect("config should build"),
        );
        AuthService::new(Arc::new(MemoryStore::new()), TokenService::new(cfg))
    }

    fn doctor_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace Hopper".into(),
            email: email.into(),
            password: "password".into(),
            phone: Some("0123456789".into()),
            role: "DOCTOR".into(),
            age: None,
            gender: None,
            blood_group: None,
            address: None,
            emergency_contact: None,
            specialization: Some("Cardiology".into()),
            qualification: Some("MD".into()),
            experience_years: Some(10),
            consultation_fee: Some(500.0),
            bio: None,
        }
    }

    fn patient_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".into(),
            email: email.into(),
            password: "password".into(),
            phone: None,
            role: "patient".into(),
            age: Some(30),
            gender: Some("female".into()),
            blood_group: Some("O+".into()),
            address: None,
            emergency_contact: None,
            specialization: None,
            qualification: None,
            experience_years: None,
            consultation_fee: None,
            bio: None,
        }
    }

    #[test]
    fn register_issues_token_and_reports_role() {
        let auth = service();
        let response = auth
            .register(doctor_request("grace@example.com"))
            .expect("registration should succeed");

        assert!(!response.token.is_empty());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.email, "grace@example.com");
        assert_eq!(response.role, "DOCTOR");
    }

    #[test]
    fn register_rejects_duplicate_email_case_insensitively() {
        let auth = service();
        auth.register(patient_request("ada@example.com"))
            .expect("first registration should succeed");
        let err = auth
            .register(patient_request("ADA@example.com"))
            .expect_err("duplicate email should conflict");
        assert!(matches!(err, HmsError::Conflict(_)));
    }

    #[test]
    fn register_rejects_short_password() {
        let auth = service();
        let mut request = patient_request("ada@example.com");
        request.password = "tiny".into();
        let err = auth
            .register(request)
            .expect_err("short password should fail");
        assert!(matches!(err, HmsError::Validation(_)));
    }

    #[test]
    fn register_rejects_unknown_role_and_gender() {
        let auth = service();

        let mut request = patient_request("ada@example.com");
        request.role = "ADMIN".into();
        assert!(matches!(
            auth.register(request),
            Err(HmsError::Validation(_))
        ));

        let mut request = patient_request("ada@example.com");
        request.gender = Some("unknown".into());
        assert!(matches!(
            auth.register(request),
            Err(HmsError::Validation(_))
        ));
    }

    #[test]
    fn login_round_trips_registered_credentials() {
        let auth = service();
        auth.register(patient_request("ada@example.com"))
            .expect("registration should succeed");

        let response = auth
            .login(LoginRequest {
                email: "Ada@Example.com".into(),
                password: "password".into(),
            })
            .expect("login should succeed");
        assert_eq!(response.role, "PATIENT");
    }

    #[test]
    fn login_rejects_wrong_password_and_unknown_email() {
        let auth = service();
        auth.register(patient_request("ada@example.com"))
            .expect("registration should succeed");

        let wrong_password = auth.login(LoginRequest {
            email: "ada@example.com".into(),
            password: "nope-nope".into(),
        });
        assert!(matches!(wrong_password, Err(HmsError::Unauthenticated(_))));

        let unknown_email = auth.login(LoginRequest {
            email: "ghost@example.com".into(),
            password: "password".into(),
        });
        assert!(matches!(unknown_email, Err(HmsError::Unauthenticated(_))));
    }
}
