use axum::Json;
use axum::Router;
use axum::routing::{get, patch, post};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod courses;
mod rounds;
mod stats;
mod users;

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rounds", post(rounds::create).get(rounds::list))
        .route("/rounds/{round_id}", get(rounds::detail).delete(rounds::delete))
        .route(
            "/rounds/{round_id}/hole/{hole_number}",
            patch(rounds::record_hole),
        )
        .route("/rounds/{round_id}/finalize", post(rounds::finalize))
        .route("/my/handicap", get(stats::handicap))
        .route("/my/stats", get(stats::dashboard))
        .route("/my/profile", get(stats::profile))
        .route("/my/info", get(users::me))
        .route("/logout", post(users::logout))
        .route("/user/{user_id}", get(users::by_id))
        .route("/courses/{course_id}/tees", get(courses::tees))
        .route("/courses/{course_id}/holes", get(courses::holes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
