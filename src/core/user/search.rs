// Sparse user search.
//
// Each criterion is optional. A user matches when every criterion that is set
// equals the corresponding field; unset criteria never exclude anyone.

use crate::core::user::User;
use crate::core::validation::{
    ValidationError, validate_birthdate, validate_email, validate_first_name, validate_last_name,
};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
}

pub fn validate_search(search: &UserSearch, today: NaiveDate) -> Result<(), ValidationError> {
    if search.first_name.is_some() {
        validate_first_name(search.first_name.as_deref())?;
    }
    if search.last_name.is_some() {
        validate_last_name(search.last_name.as_deref())?;
    }
    if search.email.is_some() {
        validate_email(search.email.as_deref())?;
    }
    if search.birthdate.is_some() {
        validate_birthdate(search.birthdate, today)?;
    }
    Ok(())
}

fn criterion_holds<T: PartialEq + ?Sized>(criterion: Option<&T>, actual: &T) -> bool {
    criterion.is_none_or(|expected| expected == actual)
}

pub fn matches(user: &User, search: &UserSearch) -> bool {
    criterion_holds(search.first_name.as_deref(), user.first_name.as_str())
        && criterion_holds(search.last_name.as_deref(), user.last_name.as_str())
        && criterion_holds(search.birthdate.as_ref(), &user.birthdate)
        && criterion_holds(search.email.as_deref(), user.email.as_str())
}
