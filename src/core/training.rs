use crate::core::merge::{replace_if_positive, replace_if_present};
use crate::core::user::User;
use crate::core::validation::ValidationError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    Swimming,
    Tennis,
}

impl ActivityType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Walking => "Walking",
            ActivityType::Swimming => "Swimming",
            ActivityType::Tennis => "Tennis",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A recorded exercise session. The owner is referenced by id and resolved
/// through the user side whenever a training is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub id: Option<i64>,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

/// A training joined with the current state of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedTraining {
    pub training: Training,
    pub user: User,
}

/// Input for creating or updating a training. Times are local wall clock
/// values; `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingRequest {
    pub user_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub activity_type: Option<ActivityType>,
    pub distance: Option<f64>,
    pub average_speed: Option<f64>,
}

/// Resolves a local wall clock time in the system time zone. An ambiguous
/// time (clocks turned back) resolves to its earliest instant.
pub fn to_instant(
    local: NaiveDateTime,
    field: &'static str,
) -> Result<DateTime<Utc>, ValidationError> {
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
        .ok_or(ValidationError::NonexistentLocalTime(field))
}

/// First instant at or after `local` that exists in `zone`, scanning forward
/// minute by minute across a gap.
pub fn first_instant_at_or_after<Tz: TimeZone>(
    zone: &Tz,
    local: NaiveDateTime,
) -> Option<DateTime<Utc>> {
    (0..=24 * 60)
        .filter_map(|minute| local.checked_add_signed(TimeDelta::minutes(minute)))
        .find_map(|candidate| zone.from_local_datetime(&candidate).earliest())
        .map(|instant| instant.with_timezone(&Utc))
}

/// Start of `date` in the system time zone. A date whose midnight falls in a
/// daylight saving gap starts when the clocks resume.
pub fn start_of_day(date: NaiveDate) -> Result<DateTime<Utc>, ValidationError> {
    first_instant_at_or_after(&Local, date.and_time(NaiveTime::MIN))
        .ok_or(ValidationError::NonexistentLocalTime("Date"))
}

fn to_optional_instant(
    local: Option<NaiveDateTime>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    local.map(|value| to_instant(value, field)).transpose()
}

impl TrainingRequest {
    pub fn into_training(self, user_id: i64) -> Result<Training, ValidationError> {
        let start_time = self.start_time.ok_or(ValidationError::StartTimeRequired)?;
        let end_time = self.end_time.ok_or(ValidationError::EndTimeRequired)?;
        let activity_type = self
            .activity_type
            .ok_or(ValidationError::ActivityTypeRequired)?;
        let distance = self.distance.unwrap_or_default();
        if distance < 0.0 {
            return Err(ValidationError::NegativeDistance);
        }
        let average_speed = self.average_speed.unwrap_or_default();
        if average_speed < 0.0 {
            return Err(ValidationError::NegativeAverageSpeed);
        }

        Ok(Training {
            id: None,
            user_id,
            start_time: to_instant(start_time, "Start time")?,
            end_time: to_instant(end_time, "End time")?,
            activity_type,
            distance,
            average_speed,
        })
    }

    /// Merges the request into `training`. Conversions run first, so a failure
    /// leaves `training` untouched.
    pub fn apply_to(self, training: &mut Training, user_id: i64) -> Result<(), ValidationError> {
        let start_time = to_optional_instant(self.start_time, "Start time")?;
        let end_time = to_optional_instant(self.end_time, "End time")?;

        training.user_id = user_id;
        replace_if_present(&mut training.start_time, start_time);
        replace_if_present(&mut training.end_time, end_time);
        replace_if_present(&mut training.activity_type, self.activity_type);
        replace_if_positive(&mut training.distance, self.distance);
        replace_if_positive(&mut training.average_speed, self.average_speed);
        Ok(())
    }
}
