// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::config::PASSING_PERCENTAGE;

use super::question::PublicQuestion;

/// Selected-option value meaning "no option chosen".
pub const UNANSWERED: i32 = -1;

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percentage(percentage: i32) -> Self {
        match percentage {
            p if p >= 90 => Grade::APlus,
            p if p >= 80 => Grade::A,
            p if p >= 70 => Grade::B,
            p if p >= 60 => Grade::C,
            p if p >= 50 => Grade::D,
            _ => Grade::F,
        }
    }
}

/// One answer as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: i64,
    /// Missing or null means unanswered. Any value is accepted, see [`selection_index`].
    #[serde(default, deserialize_with = "lenient_selection")]
    pub selected_option: Option<i32>,
}

fn lenient_selection<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(selection_index))
}

/// Maps a raw selected-option value onto an option index.
///
/// Integral numbers keep their value, saturating at `i32::MAX` so that huge
/// indices stay out of range. Negative numbers, fractions, strings and any
/// other JSON become [`UNANSWERED`]. Neither case can ever grade as correct.
pub fn selection_index(value: &Value) -> i32 {
    let index = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        _ => None,
    };

    match index {
        Some(i) if i >= 0 => i32::try_from(i).unwrap_or(i32::MAX),
        _ => UNANSWERED,
    }
}

impl AnswerSubmission {
    pub fn selected(&self) -> i32 {
        self.selected_option.unwrap_or(UNANSWERED)
    }
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamRequest {
    pub answers: Vec<AnswerSubmission>,

    /// Seconds the user spent on the exam.
    #[validate(range(min = 0))]
    pub time_spent: Option<i64>,
}

/// Graded outcome for a single question, as persisted with the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub selected_option: i32,
    pub is_correct: bool,
}

/// Represents the 'exam_attempts' table in the database.
/// Written once on submission and never updated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAttempt {
    pub id: i64,
    pub user_id: i64,
    pub outcomes: Vec<QuestionOutcome>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub time_spent: i64,
    pub completed_at: DateTime<Utc>,
}

impl ExamAttempt {
    pub fn summary(&self) -> AttemptSummary {
        AttemptSummary::new(
            self.id,
            self.score,
            self.total_questions,
            self.percentage,
            self.time_spent,
            self.completed_at,
        )
    }
}

/// Attempt data before the store assigns an id and completion time.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: i64,
    pub outcomes: Vec<QuestionOutcome>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub time_spent: i64,
}

impl NewAttempt {
    pub fn into_attempt(self, id: i64, completed_at: DateTime<Utc>) -> ExamAttempt {
        ExamAttempt {
            id,
            user_id: self.user_id,
            outcomes: self.outcomes,
            score: self.score,
            total_questions: self.total_questions,
            percentage: self.percentage,
            time_spent: self.time_spent,
            completed_at,
        }
    }
}

/// Summary view of an attempt, without per-question detail.
/// Used for the submit response and for history listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub time_spent: i64,
    pub completed_at: DateTime<Utc>,
    pub grade: Grade,
    pub passed: bool,
}

impl AttemptSummary {
    pub fn new(
        id: i64,
        score: i32,
        total_questions: i32,
        percentage: i32,
        time_spent: i64,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            score,
            total_questions,
            percentage,
            time_spent,
            completed_at,
            grade: Grade::from_percentage(percentage),
            passed: percentage >= PASSING_PERCENTAGE,
        }
    }
}

/// Per-question review line in a detailed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_id: i64,
    /// `None` when the question was deleted after the attempt.
    pub question: Option<String>,
    pub options: Vec<String>,
    pub selected_option: i32,
    pub correct_option: i32,
    pub is_correct: bool,
    pub question_removed: bool,
}

/// Full result view returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetail {
    #[serde(flatten)]
    pub summary: AttemptSummary,
    pub questions: Vec<QuestionReview>,
}

/// DTO for returning a freshly sampled exam paper.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaper {
    pub questions: Vec<PublicQuestion>,
    pub total_questions: usize,
    /// Minutes.
    pub exam_duration: u32,
}
