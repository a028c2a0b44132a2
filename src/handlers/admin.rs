// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, NewQuestion},
    state::Repo,
};

/// Creates a new question.
/// Admin only. Rejects questions without a correct option.
pub async fn create_question(
    State(repo): State<Repo>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let new_question = NewQuestion::try_from(payload)?;

    let question = repo.insert_question(new_question).await?;
    tracing::info!("Question {} created", question.id);

    Ok((StatusCode::CREATED, Json(question)))
}

/// Deletes a question.
/// Admin only. Attempts that reference it keep their outcome records.
pub async fn delete_question(
    State(repo): State<Repo>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !repo.delete_question(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    tracing::info!("Question {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}
