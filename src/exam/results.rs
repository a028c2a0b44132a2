// src/exam/results.rs

use crate::{
    config::HISTORY_LIMIT,
    error::AppError,
    models::{
        attempt::{AttemptSummary, ExamAttempt, NewAttempt, QuestionOutcome, QuestionReview, ResultDetail},
        question::Question,
    },
    repository::ExamRepository,
};

use super::grader::GradedExam;

/// Persists a graded submission for `user_id` and returns its summary.
pub async fn record_attempt(
    repo: &dyn ExamRepository,
    user_id: i64,
    graded: GradedExam,
    time_spent: i64,
) -> Result<AttemptSummary, AppError> {
    let percentage = graded.percentage();
    let attempt = repo
        .insert_attempt(NewAttempt {
            user_id,
            outcomes: graded.outcomes,
            score: graded.score,
            total_questions: graded.total,
            percentage,
            time_spent,
        })
        .await?;

    tracing::info!(
        "Recorded attempt {} for user {}: {}/{} ({}%)",
        attempt.id,
        user_id,
        attempt.score,
        attempt.total_questions,
        attempt.percentage
    );

    Ok(attempt.summary())
}

/// Ownership guard for attempts.
///
/// An attempt owned by someone else is reported exactly like a missing one,
/// so callers cannot probe for other users' attempt ids.
pub fn authorize_owner(attempt: Option<ExamAttempt>, user_id: i64) -> Result<ExamAttempt, AppError> {
    match attempt {
        Some(attempt) if attempt.user_id == user_id => Ok(attempt),
        _ => Err(AppError::NotFound("Exam result not found".to_string())),
    }
}

/// Builds the review line for one outcome.
/// A missing question yields a partial record flagged `question_removed`.
pub fn review_outcome(outcome: &QuestionOutcome, question: Option<&Question>) -> QuestionReview {
    match question {
        Some(question) => QuestionReview {
            question_id: outcome.question_id,
            question: Some(question.prompt.clone()),
            options: question.option_texts(),
            selected_option: outcome.selected_option,
            correct_option: question.correct_option_index(),
            is_correct: outcome.is_correct,
            question_removed: false,
        },
        None => QuestionReview {
            question_id: outcome.question_id,
            question: None,
            options: Vec::new(),
            selected_option: outcome.selected_option,
            correct_option: -1,
            is_correct: outcome.is_correct,
            question_removed: true,
        },
    }
}

/// Loads attempt `attempt_id` for `user_id` and reconstructs the full review.
pub async fn load_result(
    repo: &dyn ExamRepository,
    attempt_id: i64,
    user_id: i64,
) -> Result<ResultDetail, AppError> {
    let attempt = authorize_owner(repo.find_attempt(attempt_id).await?, user_id)?;

    let mut questions = Vec::with_capacity(attempt.outcomes.len());
    for outcome in &attempt.outcomes {
        let question = repo.find_question(outcome.question_id).await?;
        if question.is_none() {
            tracing::warn!(
                "Attempt {} references removed question {}",
                attempt.id,
                outcome.question_id
            );
        }
        questions.push(review_outcome(outcome, question.as_ref()));
    }

    Ok(ResultDetail {
        summary: attempt.summary(),
        questions,
    })
}

/// The user's most recent attempts, newest first, summaries only.
pub async fn recent_attempts(
    repo: &dyn ExamRepository,
    user_id: i64,
) -> Result<Vec<AttemptSummary>, AppError> {
    repo.list_attempts(user_id, HISTORY_LIMIT).await
}
