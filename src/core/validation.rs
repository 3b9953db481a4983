// Field validators shared by user creation, user updates and user search.
//
// Purpose
// - Decide whether a single raw value satisfies the rule for its field.
//
// Responsibilities
// - Report the first violated rule as a ValidationError with a human readable reason.
// - Never perform input or output. The only ambient input is the local calendar date.

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("First name is required.")]
    FirstNameRequired,

    #[error("First name contains invalid characters.")]
    FirstNameInvalid,

    #[error("Last name is required.")]
    LastNameRequired,

    #[error("Last name contains invalid characters.")]
    LastNameInvalid,

    #[error("Birthdate is required.")]
    BirthdateRequired,

    #[error("Birthdate must be a date in the past.")]
    BirthdateInFuture,

    #[error("Email is required.")]
    EmailRequired,

    #[error("Invalid email format.")]
    EmailInvalid,

    #[error("Email fragment is required.")]
    EmailFragmentRequired,

    #[error("Email fragment contains invalid characters.")]
    EmailFragmentInvalid,

    #[error("Start time is required.")]
    StartTimeRequired,

    #[error("End time is required.")]
    EndTimeRequired,

    #[error("Activity type is required.")]
    ActivityTypeRequired,

    #[error("Distance must not be negative.")]
    NegativeDistance,

    #[error("Average speed must not be negative.")]
    NegativeAverageSpeed,

    #[error("{0} does not exist in the local time zone.")]
    NonexistentLocalTime(&'static str),
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_FRAGMENT_RE: OnceLock<Regex> = OnceLock::new();

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("validation regex failed to compile: {error}"))
    })
}

// Word characters are ASCII only, the same as the email shapes accepted by the
// persisted data. Names accept any Unicode letter.
fn name_regex() -> &'static Regex {
    compile(&NAME_RE, r"^[\p{L} .'-]+$")
}

fn email_regex() -> &'static Regex {
    compile(&EMAIL_RE, r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[a-zA-Z]{2,}$")
}

fn email_fragment_regex() -> &'static Regex {
    compile(&EMAIL_FRAGMENT_RE, r"^[A-Za-z0-9_.@-]+$")
}

pub fn is_valid_name(value: &str) -> bool {
    name_regex().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn is_valid_email_fragment(value: &str) -> bool {
    email_fragment_regex().is_match(value)
}

/// Today's date in the system time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A date is acceptable when it is not strictly after `today`.
pub fn is_not_future(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

fn check_text(
    value: Option<&str>,
    is_valid: fn(&str) -> bool,
    missing: ValidationError,
    invalid: ValidationError,
) -> Result<(), ValidationError> {
    match value {
        None => Err(missing),
        Some(v) if v.trim().is_empty() => Err(missing),
        Some(v) if !is_valid(v) => Err(invalid),
        Some(_) => Ok(()),
    }
}

pub fn validate_first_name(value: Option<&str>) -> Result<(), ValidationError> {
    check_text(
        value,
        is_valid_name,
        ValidationError::FirstNameRequired,
        ValidationError::FirstNameInvalid,
    )
}

pub fn validate_last_name(value: Option<&str>) -> Result<(), ValidationError> {
    check_text(
        value,
        is_valid_name,
        ValidationError::LastNameRequired,
        ValidationError::LastNameInvalid,
    )
}

pub fn validate_email(value: Option<&str>) -> Result<(), ValidationError> {
    check_text(
        value,
        is_valid_email,
        ValidationError::EmailRequired,
        ValidationError::EmailInvalid,
    )
}

pub fn validate_email_fragment(value: Option<&str>) -> Result<(), ValidationError> {
    check_text(
        value,
        is_valid_email_fragment,
        ValidationError::EmailFragmentRequired,
        ValidationError::EmailFragmentInvalid,
    )
}

pub fn validate_birthdate(value: Option<NaiveDate>, today: NaiveDate) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::BirthdateRequired),
        Some(date) if !is_not_future(date, today) => Err(ValidationError::BirthdateInFuture),
        Some(_) => Ok(()),
    }
}
