// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    exam::{grader, results, sampler},
    models::attempt::SubmitExamRequest,
    state::Repo,
    utils::jwt::Claims,
};

/// Query parameters for sampling a paper.
#[derive(Debug, Deserialize)]
pub struct QuestionParams {
    /// Kept as text so malformed values fall back to the default instead of failing.
    pub count: Option<String>,
}

/// Returns a freshly sampled exam paper without answer keys.
pub async fn get_questions(
    State(repo): State<Repo>,
    Query(params): Query<QuestionParams>,
) -> Result<impl IntoResponse, AppError> {
    let count = sampler::requested_count(params.count.as_deref());
    let paper = sampler::sample_paper(repo.as_ref(), count).await?;

    Ok(Json(paper))
}

/// Grades a submission and stores it as a new attempt.
///
/// * Unknown question ids are skipped and excluded from the total.
/// * Responds with the attempt summary only.
pub async fn submit_exam(
    State(repo): State<Repo>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SubmitExamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    let user_id = claims.user_id()?;

    let graded = grader::grade_answers(repo.as_ref(), &req.answers).await?;
    let summary =
        results::record_attempt(repo.as_ref(), user_id, graded, req.time_spent.unwrap_or(0))
            .await?;

    Ok(Json(json!({
        "message": "Exam submitted successfully",
        "result": summary,
    })))
}

/// Returns the detailed review of one of the caller's attempts.
/// An id that is not a number cannot name an attempt and is reported as not found.
pub async fn get_result(
    State(repo): State<Repo>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path.map_err(|_| AppError::NotFound("Exam result not found".to_string()))?;
    let user_id = claims.user_id()?;
    let detail = results::load_result(repo.as_ref(), id, user_id).await?;

    Ok(Json(json!({ "result": detail })))
}

/// Lists the caller's most recent attempts.
pub async fn get_history(
    State(repo): State<Repo>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let history = results::recent_attempts(repo.as_ref(), user_id).await?;

    Ok(Json(json!({ "results": history })))
}
