use axum::Json;
use axum::extract::State;
use golf_core::domain::DEFAULT_WINDOW_DAYS;
use golf_core::models::{DashboardStats, HandicapReport, ProfileStats};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ValidatedQuery;
use crate::state::{AppState, blocking};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

pub async fn handicap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<HandicapReport>, ApiError> {
    let statistics = state.statistics.clone();
    let report = blocking(move || statistics.get_handicap(user_id)).await?;
    Ok(Json(report))
}

pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedQuery(query): ValidatedQuery<WindowQuery>,
) -> Result<Json<DashboardStats>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let statistics = state.statistics.clone();
    let stats = blocking(move || statistics.get_dashboard(user_id, days)).await?;
    Ok(Json(stats))
}

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileStats>, ApiError> {
    let statistics = state.statistics.clone();
    let stats = blocking(move || statistics.get_profile(user_id)).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::Local;
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    async fn completed_round(app: &TestApp, token: &str) -> i64 {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let (_, created) = app
            .send(
                Method::POST,
                "/rounds",
                Some(token),
                Some(json!({ "courseId": 1, "date": today, "holesPlayed": 9, "teeId": 1 })),
            )
            .await;
        let round_id = created["roundId"].as_i64().unwrap();

        app.send(
            Method::PATCH,
            &format!("/rounds/{}/hole/1", round_id),
            Some(token),
            Some(json!({ "strokes": 6, "par": 4, "putts": 3, "fairwayHit": false })),
        )
        .await;
        app.send(
            Method::PATCH,
            &format!("/rounds/{}/hole/2", round_id),
            Some(token),
            Some(json!({ "strokes": 3, "par": 4, "putts": 1, "fairwayHit": true })),
        )
        .await;
        app.send(
            Method::POST,
            &format!("/rounds/{}/finalize", round_id),
            Some(token),
            Some(json!({ "totalScore": 45 })),
        )
        .await;

        round_id
    }

    #[tokio::test]
    async fn test_empty_history_reports_no_data() {
        let app = TestApp::new();
        let token = app.login("new@example.com");

        let (status, handicap) = app
            .send(Method::GET, "/my/handicap", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(handicap, json!({ "handicap": 0, "roundsCount": 0 }));

        let (status, stats) = app.send(Method::GET, "/my/stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["avgScore"], 0);
        assert_eq!(stats["totalRounds"], 0);
        assert_eq!(stats["leaks"]["threePutts"], 0);

        let (status, profile) = app
            .send(Method::GET, "/my/profile", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["career"]["rounds"], 0);
        assert_eq!(profile["eclectic"], json!({}));
    }

    #[tokio::test]
    async fn test_statistics_after_a_completed_round() {
        let app = TestApp::new();
        let token = app.login("stats@example.com");
        completed_round(&app, &token).await;

        let (_, handicap) = app
            .send(Method::GET, "/my/handicap", Some(&token), None)
            .await;
        assert_eq!(handicap["handicap"], "34.56");
        assert_eq!(handicap["roundsCount"], 1);

        let (_, stats) = app
            .send(Method::GET, "/my/stats?days=7", Some(&token), None)
            .await;
        assert_eq!(stats["avgScore"], "45.0");
        assert_eq!(stats["avgPutts"], "4.0");
        assert_eq!(stats["totalRounds"], 1);
        assert_eq!(stats["rounds"].as_array().unwrap().len(), 1);
        assert_eq!(stats["leaks"]["threePutts"], "1.0");
        assert_eq!(stats["leaks"]["doubleBogeys"], "1.0");
        assert_eq!(stats["leaks"]["missedFairways"], "1.0");

        let (_, profile) = app
            .send(Method::GET, "/my/profile", Some(&token), None)
            .await;
        assert_eq!(profile["career"]["rounds"], 1);
        assert_eq!(profile["career"]["birdies"], 1);
        assert_eq!(profile["career"]["pars"], 0);
        assert_eq!(profile["eclectic"]["1"]["1"], 6);
        assert_eq!(profile["eclectic"]["1"]["2"], 3);
    }

    #[tokio::test]
    async fn test_negative_window_rejected() {
        let app = TestApp::new();
        let token = app.login("window@example.com");

        let (status, _) = app
            .send(Method::GET, "/my/stats?days=-1", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(Method::GET, "/my/stats?days=month", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
