pub mod search;

use crate::core::merge::replace_if_present;
use crate::core::validation::{
    ValidationError, validate_birthdate, validate_email, validate_first_name, validate_last_name,
};
use chrono::NaiveDate;

/// A registered user. `id` stays `None` until the repository stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: NaiveDate,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            email: email.into(),
        }
    }
}

/// Candidate for a new user. Every field may be missing so that incomplete
/// input reaches validation instead of failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUser {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
}

impl CreateUser {
    /// Checks the fields in declaration order and stops at the first violation.
    /// A carried `id` is kept so the caller can reject it.
    pub fn validate(self, today: NaiveDate) -> Result<User, ValidationError> {
        validate_first_name(self.first_name.as_deref())?;
        validate_last_name(self.last_name.as_deref())?;
        validate_birthdate(self.birthdate, today)?;
        validate_email(self.email.as_deref())?;

        match (self.first_name, self.last_name, self.birthdate, self.email) {
            (Some(first_name), Some(last_name), Some(birthdate), Some(email)) => Ok(User {
                id: self.id,
                first_name,
                last_name,
                birthdate,
                email,
            }),
            (None, ..) => Err(ValidationError::FirstNameRequired),
            (_, None, ..) => Err(ValidationError::LastNameRequired),
            (_, _, None, _) => Err(ValidationError::BirthdateRequired),
            (.., None) => Err(ValidationError::EmailRequired),
        }
    }
}

/// Changes requested for an existing user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.first_name.is_some() {
            validate_first_name(self.first_name.as_deref())?;
        }
        if self.last_name.is_some() {
            validate_last_name(self.last_name.as_deref())?;
        }
        if self.birthdate.is_some() {
            validate_birthdate(self.birthdate, today)?;
        }
        if self.email.is_some() {
            validate_email(self.email.as_deref())?;
        }
        Ok(())
    }

    pub fn apply_to(self, user: &mut User) {
        replace_if_present(&mut user.first_name, self.first_name);
        replace_if_present(&mut user.last_name, self.last_name);
        replace_if_present(&mut user.birthdate, self.birthdate);
        replace_if_present(&mut user.email, self.email);
    }
}
