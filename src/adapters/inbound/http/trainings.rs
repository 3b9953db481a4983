use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::inbound::http::errors::rejected_body;
use crate::adapters::inbound::http::users::UserDto;
use crate::application::errors::ApplicationError;
use crate::core::training::{ActivityType, OwnedTraining, TrainingRequest};
use crate::shell::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDto {
    pub id: Option<i64>,
    pub user: UserDto,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

impl From<OwnedTraining> for TrainingDto {
    fn from(OwnedTraining { training: t, user }: OwnedTraining) -> Self {
        Self {
            id: t.id,
            user: user.into(),
            start_time: t.start_time,
            end_time: t.end_time,
            activity_type: t.activity_type,
            distance: t.distance,
            average_speed: t.average_speed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequestBody {
    pub user_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub activity_type: Option<ActivityType>,
    pub distance: Option<f64>,
    pub average_speed: Option<f64>,
}

impl From<TrainingRequestBody> for TrainingRequest {
    fn from(b: TrainingRequestBody) -> Self {
        Self {
            user_id: b.user_id,
            start_time: b.start_time,
            end_time: b.end_time,
            activity_type: b.activity_type,
            distance: b.distance,
            average_speed: b.average_speed,
        }
    }
}

#[derive(Deserialize)]
pub struct ActivityTypeParams {
    #[serde(rename = "activityType")]
    pub activity_type: ActivityType,
}

fn to_dtos(trainings: Vec<OwnedTraining>) -> Json<Vec<TrainingDto>> {
    Json(trainings.into_iter().map(TrainingDto::from).collect())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trainings", get(find_all).post(create))
        .route("/v1/trainings/activityType", get(find_by_activity_type))
        .route("/v1/trainings/finished/{date}", get(find_finished_after))
        .route("/v1/trainings/{id}", get(find_by_user_id).put(update))
}

pub async fn find_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingDto>>, ApplicationError> {
    Ok(to_dtos(state.trainings.find_all().await?))
}

/// The path segment on GET is the owner's user id, on PUT the training id.
pub async fn find_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<TrainingDto>>, ApplicationError> {
    Ok(to_dtos(state.trainings.find_by_user_id(user_id).await?))
}

pub async fn find_finished_after(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<TrainingDto>>, ApplicationError> {
    Ok(to_dtos(state.trainings.find_finished_after(date).await?))
}

pub async fn find_by_activity_type(
    State(state): State<AppState>,
    Query(params): Query<ActivityTypeParams>,
) -> Result<Json<Vec<TrainingDto>>, ApplicationError> {
    Ok(to_dtos(
        state
            .trainings
            .find_by_activity_type(params.activity_type)
            .await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TrainingRequestBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    match state.trainings.create(body.into()).await {
        Ok(training) => (StatusCode::CREATED, Json(TrainingDto::from(training))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<TrainingRequestBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    match state.trainings.update(id, body.into()).await {
        Ok(training) => Json(TrainingDto::from(training)).into_response(),
        Err(error) => error.into_response(),
    }
}
