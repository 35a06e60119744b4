use axum::Json;
use axum::extract::State;
use golf_core::Error;
use golf_core::models::{HoleDefinition, Tee};

use crate::error::ApiError;
use crate::extract::ValidatedPath;
use crate::state::{AppState, blocking};

pub async fn tees(
    State(state): State<AppState>,
    ValidatedPath(course_id): ValidatedPath<i64>,
) -> Result<Json<Vec<Tee>>, ApiError> {
    let courses = state.courses.clone();
    let tees = blocking(move || {
        require_course(&courses, course_id)?;
        courses.get_tees(course_id)
    })
    .await?;

    Ok(Json(tees))
}

pub async fn holes(
    State(state): State<AppState>,
    ValidatedPath(course_id): ValidatedPath<i64>,
) -> Result<Json<Vec<HoleDefinition>>, ApiError> {
    let courses = state.courses.clone();
    let holes = blocking(move || {
        require_course(&courses, course_id)?;
        courses.get_hole_definitions(course_id)
    })
    .await?;

    Ok(Json(holes))
}

fn require_course(courses: &golf_core::db::CoursesDao, course_id: i64) -> golf_core::Result<()> {
    courses
        .get_course(course_id)?
        .map(|_| ())
        .ok_or_else(|| Error::NotFound(format!("Course {} does not exist", course_id)))
}
