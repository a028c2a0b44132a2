// src/repository/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, prelude::FromRow, types::Json};

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptSummary, ExamAttempt, NewAttempt, QuestionOutcome},
        question::{NewQuestion, Question, QuestionOption},
    },
};

use super::ExamRepository;

/// Row shape of the 'questions' table.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    prompt: String,
    options: Json<Vec<QuestionOption>>,
    category: String,
    difficulty: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            prompt: row.prompt,
            options: row.options.0,
            category: row.category,
            difficulty: row.difficulty.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Row shape of the 'exam_attempts' table.
#[derive(FromRow)]
struct AttemptRow {
    id: i64,
    user_id: i64,
    outcomes: Json<Vec<QuestionOutcome>>,
    score: i32,
    total_questions: i32,
    percentage: i32,
    time_spent: i64,
    completed_at: DateTime<Utc>,
}

impl From<AttemptRow> for ExamAttempt {
    fn from(row: AttemptRow) -> Self {
        ExamAttempt {
            id: row.id,
            user_id: row.user_id,
            outcomes: row.outcomes.0,
            score: row.score,
            total_questions: row.total_questions,
            percentage: row.percentage,
            time_spent: row.time_spent,
            completed_at: row.completed_at,
        }
    }
}

/// History rows skip the outcomes column entirely.
#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    score: i32,
    total_questions: i32,
    percentage: i32,
    time_spent: i64,
    completed_at: DateTime<Utc>,
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamRepository for PgRepository {
    async fn sample_questions(&self, count: i64) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, prompt, options, category, difficulty, created_at
            FROM questions
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sample questions: {:?}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(Question::try_from).collect()
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, prompt, options, category, difficulty, created_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Question::try_from).transpose()
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO questions (prompt, options, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, prompt, options, category, difficulty, created_at
            "#,
        )
        .bind(question.prompt())
        .bind(Json(question.options().to_vec()))
        .bind(question.category())
        .bind(question.difficulty().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert question: {:?}", e);
            AppError::from(e)
        })?;

        Question::try_from(row)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<ExamAttempt, AppError> {
        let (id, completed_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO exam_attempts
                (user_id, outcomes, score, total_questions, percentage, time_spent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, completed_at
            "#,
        )
        .bind(attempt.user_id)
        .bind(Json(&attempt.outcomes))
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(attempt.percentage)
        .bind(attempt.time_spent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert exam attempt: {:?}", e);
            AppError::from(e)
        })?;

        Ok(attempt.into_attempt(id, completed_at))
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<ExamAttempt>, AppError> {
        let row = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, user_id, outcomes, score, total_questions, percentage, time_spent, completed_at
            FROM exam_attempts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ExamAttempt::from))
    }

    async fn list_attempts(&self, user_id: i64, limit: i64) -> Result<Vec<AttemptSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, score, total_questions, percentage, time_spent, completed_at
            FROM exam_attempts
            WHERE user_id = $1
            ORDER BY completed_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch exam history: {:?}", e);
            AppError::from(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|r| {
                AttemptSummary::new(
                    r.id,
                    r.score,
                    r.total_questions,
                    r.percentage,
                    r.time_spent,
                    r.completed_at,
                )
            })
            .collect())
    }
}
