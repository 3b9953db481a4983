use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::inbound::http::errors::rejected_body;
use crate::application::errors::ApplicationError;
use crate::application::user_service::{UserProvider, UserService};
use crate::core::user::search::UserSearch;
use crate::core::user::{CreateUser, User, UserPatch};
use crate::shell::state::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: Some(u.first_name),
            last_name: Some(u.last_name),
            birthdate: Some(u.birthdate),
            email: Some(u.email),
        }
    }
}

impl From<UserDto> for CreateUser {
    fn from(d: UserDto) -> Self {
        Self {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
            birthdate: d.birthdate,
            email: d.email,
        }
    }
}

impl From<UserDto> for UserPatch {
    fn from(d: UserDto) -> Self {
        Self {
            first_name: d.first_name,
            last_name: d.last_name,
            birthdate: d.birthdate,
            email: d.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSimpleDto {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSimpleDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEmailDto {
    pub id: Option<i64>,
    pub email: String,
}

impl From<User> for UserEmailDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
}

impl From<UserSearchBody> for UserSearch {
    fn from(b: UserSearchBody) -> Self {
        Self {
            first_name: b.first_name,
            last_name: b.last_name,
            birthdate: b.birthdate,
            email: b.email,
        }
    }
}

#[derive(Deserialize)]
pub struct EmailParams {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct PartialEmailParams {
    #[serde(rename = "partialEmail")]
    pub partial_email: Option<String>,
}

fn to_dtos<T: From<User>>(users: Vec<User>) -> Json<Vec<T>> {
    Json(users.into_iter().map(T::from).collect())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users", get(find_all).post(create))
        .route("/v1/users/simple", get(find_all_simple))
        .route("/v1/users/email", get(get_by_email))
        .route("/v1/users/partial-email", get(find_by_partial_email))
        .route("/v1/users/older/{date}", get(find_older_than))
        .route("/v1/users/matching-users", post(find_matching))
        .route(
            "/v1/users/{id}",
            get(get_by_id).put(update).delete(delete),
        )
}

pub async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApplicationError> {
    Ok(to_dtos(state.users.find_all().await?))
}

pub async fn find_all_simple(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSimpleDto>>, ApplicationError> {
    Ok(to_dtos(state.users.find_all().await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<UserDto>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    match state.users.create(body.into()).await {
        Ok(user) => (StatusCode::CREATED, Json(UserDto::from(user))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApplicationError> {
    state
        .users
        .get_by_id(Some(id))
        .await?
        .map(|user| Json(user.into()))
        .ok_or(ApplicationError::UserNotFound(id))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<Json<Vec<UserDto>>, ApplicationError> {
    let found = state.users.get_by_email(params.email.as_deref()).await?;
    Ok(to_dtos(found.into_iter().collect()))
}

pub async fn find_by_partial_email(
    State(state): State<AppState>,
    Query(params): Query<PartialEmailParams>,
) -> Result<Json<Vec<UserDto>>, ApplicationError> {
    let users = state
        .users
        .find_matching_users_by_partial_email(params.partial_email.as_deref())
        .await?;
    Ok(to_dtos(users))
}

pub async fn find_older_than(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<UserDto>>, ApplicationError> {
    Ok(to_dtos(state.users.find_older_than(Some(date)).await?))
}

pub async fn find_matching(
    State(state): State<AppState>,
    body: Result<Json<UserSearchBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    match state.users.find_matching(&body.into()).await {
        Ok(users) => to_dtos::<UserEmailDto>(users).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<UserDto>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };
    match state.users.update(id, body.into()).await {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApplicationError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
