use axum::Router;
use tower_http::trace::TraceLayer;

use crate::adapters::inbound::http::{trainings, users};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(users::routes())
        .merge(trainings::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
