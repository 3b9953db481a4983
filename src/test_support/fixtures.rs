// Shared builders producing valid commands for tests.
//
// Each builder starts from a known-good value so a test only spells out the
// fields it is about.

use crate::core::training::{ActivityType, TrainingRequest};
use crate::core::user::CreateUser;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct CreateUserBuilder {
    inner: CreateUser,
}

impl Default for CreateUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CreateUserBuilder {
    pub fn new() -> Self {
        Self {
            inner: CreateUser {
                id: None,
                first_name: Some("Michael".to_string()),
                last_name: Some("Jackson".to_string()),
                birthdate: NaiveDate::from_ymd_opt(1958, 8, 29),
                email: Some("michael.jackson@neverland.tx".to_string()),
            },
        }
    }

    pub fn id(mut self, v: i64) -> Self {
        self.inner.id = Some(v);
        self
    }

    pub fn first_name(mut self, v: impl Into<String>) -> Self {
        self.inner.first_name = Some(v.into());
        self
    }

    pub fn no_first_name(mut self) -> Self {
        self.inner.first_name = None;
        self
    }

    pub fn last_name(mut self, v: impl Into<String>) -> Self {
        self.inner.last_name = Some(v.into());
        self
    }

    pub fn no_last_name(mut self) -> Self {
        self.inner.last_name = None;
        self
    }

    pub fn birthdate(mut self, v: NaiveDate) -> Self {
        self.inner.birthdate = Some(v);
        self
    }

    pub fn no_birthdate(mut self) -> Self {
        self.inner.birthdate = None;
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.inner.email = Some(v.into());
        self
    }

    pub fn no_email(mut self) -> Self {
        self.inner.email = None;
        self
    }

    pub fn build(self) -> CreateUser {
        self.inner
    }
}

pub struct TrainingRequestBuilder {
    inner: TrainingRequest,
}

impl Default for TrainingRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(h, min, 0))
}

#[allow(dead_code)]
impl TrainingRequestBuilder {
    pub fn new() -> Self {
        Self {
            inner: TrainingRequest {
                user_id: Some(1),
                start_time: local(2024, 1, 19, 8, 0),
                end_time: local(2024, 1, 19, 10, 0),
                activity_type: Some(ActivityType::Running),
                distance: Some(10.5),
                average_speed: Some(8.2),
            },
        }
    }

    pub fn user_id(mut self, v: i64) -> Self {
        self.inner.user_id = Some(v);
        self
    }

    pub fn start_time(mut self, v: NaiveDateTime) -> Self {
        self.inner.start_time = Some(v);
        self
    }

    pub fn end_time(mut self, v: NaiveDateTime) -> Self {
        self.inner.end_time = Some(v);
        self
    }

    pub fn activity_type(mut self, v: ActivityType) -> Self {
        self.inner.activity_type = Some(v);
        self
    }

    pub fn distance(mut self, v: f64) -> Self {
        self.inner.distance = Some(v);
        self
    }

    pub fn average_speed(mut self, v: f64) -> Self {
        self.inner.average_speed = Some(v);
        self
    }

    pub fn build(self) -> TrainingRequest {
        self.inner
    }
}
