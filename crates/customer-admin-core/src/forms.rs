//! Typed validators for the login, registration and update forms.
//!
//! Each validator returns a [`Validation`] and runs before the client builds
//! a request, so invalid input never reaches the network.

use crate::api::ApiError;
use crate::models::{CustomerRegistrationRequest, CustomerUpdateRequest, LoginRequest};

/// Maximum length of a customer name
pub const MAX_NAME_LENGTH: usize = 15;

/// Maximum length of a login password
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Minimum customer age
pub const MIN_AGE: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Vec<FieldError>),
}

impl Validation {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid(errors) => errors,
        }
    }

    /// Convert into the client's error type, joining field messages.
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(ApiError::ValidationError(joined))
            }
        }
    }
}

/// Loose address check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Required"));
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "name",
            format!("Must be {} characters or less", MAX_NAME_LENGTH),
        ));
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
}

fn check_age(age: u32, errors: &mut Vec<FieldError>) {
    if age < MIN_AGE {
        errors.push(FieldError::new("age", format!("Must be {} or more", MIN_AGE)));
    }
}

pub fn validate_login(request: &LoginRequest) -> Validation {
    let mut errors = Vec::new();
    if request.username.trim().is_empty() {
        errors.push(FieldError::new("username", "Email required"));
    } else if !is_valid_email(&request.username) {
        errors.push(FieldError::new("username", "Must be a valid email"));
    }
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password required"));
    } else if request.password.chars().count() > MAX_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Must be at most {} characters", MAX_PASSWORD_LENGTH),
        ));
    }
    Validation::from_errors(errors)
}

pub fn validate_registration(request: &CustomerRegistrationRequest) -> Validation {
    let mut errors = Vec::new();
    check_name(&request.name, &mut errors);
    check_email(&request.email, &mut errors);
    check_age(request.age, &mut errors);
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Required"));
    }
    Validation::from_errors(errors)
}

pub fn validate_update(request: &CustomerUpdateRequest) -> Validation {
    if request.is_empty() {
        return Validation::Invalid(vec![FieldError::new("update", "No changes provided")]);
    }
    let mut errors = Vec::new();
    if let Some(ref name) = request.name {
        check_name(name, &mut errors);
    }
    if let Some(ref email) = request.email {
        check_email(email, &mut errors);
    }
    if let Some(age) = request.age {
        check_age(age, &mut errors);
    }
    Validation::from_errors(errors)
}
