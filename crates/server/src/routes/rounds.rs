use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::NaiveDate;
use golf_core::models::{
    FairwayHit, HoleScoreInput, HolesPlayed, NewRound, Round, RoundDetail, RoundId,
};
use serde::{Deserialize, Serialize};

use super::Success;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::state::{AppState, blocking};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundRequest {
    pub course_id: i64,
    pub date: NaiveDate,
    pub holes_played: u8,
    pub tee_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundResponse {
    pub round_id: RoundId,
    pub holes_played: HolesPlayed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleRequest {
    /// Optional echo of the path segment; must agree with it when present
    pub hole_number: Option<u8>,
    pub strokes: u8,
    pub par: Option<u8>,
    pub putts: Option<u8>,
    pub notes: Option<String>,
    pub fairway_hit: Option<FairwayHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub total_score: i32,
    pub notes: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateRoundRequest>,
) -> Result<(StatusCode, Json<CreateRoundResponse>), ApiError> {
    let holes_played = HolesPlayed::try_from(req.holes_played)?;
    let mut new_round = NewRound::new(user_id, req.course_id, req.date, holes_played);
    if let Some(tee_id) = req.tee_id {
        new_round = new_round.with_tee(tee_id);
    }

    let rounds = state.rounds.clone();
    let round = blocking(move || rounds.create(&new_round)).await?;
    tracing::info!(user_id, round_id = round.id, "round started");

    Ok((
        StatusCode::CREATED,
        Json(CreateRoundResponse {
            round_id: round.id,
            holes_played: round.holes_played,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Round>>, ApiError> {
    let rounds = state.rounds.clone();
    Ok(Json(blocking(move || rounds.list(user_id)).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedPath(round_id): ValidatedPath<RoundId>,
) -> Result<Json<RoundDetail>, ApiError> {
    let rounds = state.rounds.clone();
    Ok(Json(blocking(move || rounds.get(user_id, round_id)).await?))
}

pub async fn record_hole(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedPath((round_id, hole_number)): ValidatedPath<(RoundId, u8)>,
    ValidatedJson(req): ValidatedJson<HoleRequest>,
) -> Result<Json<Success>, ApiError> {
    if let Some(body_hole) = req.hole_number
        && body_hole != hole_number
    {
        return Err(ApiError::BadRequest(format!(
            "holeNumber {} does not match hole {} in the path",
            body_hole, hole_number
        )));
    }

    let input = HoleScoreInput {
        hole_number,
        strokes: req.strokes,
        par: req.par,
        putts: req.putts,
        notes: req.notes,
        fairway_hit: req.fairway_hit,
    };

    let rounds = state.rounds.clone();
    blocking(move || rounds.record_hole(user_id, round_id, &input)).await?;

    Ok(Success::ok())
}

pub async fn finalize(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedPath(round_id): ValidatedPath<RoundId>,
    ValidatedJson(req): ValidatedJson<FinalizeRequest>,
) -> Result<Json<Success>, ApiError> {
    let rounds = state.rounds.clone();
    blocking(move || {
        rounds.finalize(user_id, round_id, req.total_score, req.notes.as_deref())
    })
    .await?;
    tracing::info!(user_id, round_id, total_score = req.total_score, "round finalized");

    Ok(Success::ok())
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedPath(round_id): ValidatedPath<RoundId>,
) -> Result<Json<Success>, ApiError> {
    let rounds = state.rounds.clone();
    blocking(move || rounds.delete(user_id, round_id)).await?;
    tracing::info!(user_id, round_id, "round deleted");

    Ok(Success::ok())
}
