// src/exam/sampler.rs

use crate::{
    config::{DEFAULT_QUESTION_COUNT, EXAM_DURATION_MINUTES},
    error::AppError,
    models::{attempt::ExamPaper, question::PublicQuestion},
    repository::ExamRepository,
};

/// Interprets the `count` query parameter.
/// Missing, non-numeric, zero or negative values fall back to the default.
pub fn requested_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_QUESTION_COUNT)
}

/// Draws a fresh paper of up to `count` questions with correctness flags removed.
/// Every call samples independently; nothing is pinned per user.
pub async fn sample_paper(repo: &dyn ExamRepository, count: i64) -> Result<ExamPaper, AppError> {
    let questions: Vec<PublicQuestion> = repo
        .sample_questions(count)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    if (questions.len() as i64) < count {
        tracing::debug!(
            "Requested {} questions, only {} available",
            count,
            questions.len()
        );
    }

    Ok(ExamPaper {
        total_questions: questions.len(),
        questions,
        exam_duration: EXAM_DURATION_MINUTES,
    })
}
