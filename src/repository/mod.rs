// src/repository/mod.rs

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptSummary, ExamAttempt, NewAttempt},
        question::{NewQuestion, Question},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Storage seam for questions and exam attempts.
///
/// Attempts are append-only: there is no update operation.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Draws up to `count` distinct questions uniformly at random.
    /// Returns fewer when the store holds fewer.
    async fn sample_questions(&self, count: i64) -> Result<Vec<Question>, AppError>;

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError>;

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError>;

    /// Returns `false` when no such question existed.
    async fn delete_question(&self, id: i64) -> Result<bool, AppError>;

    /// Persists an attempt, stamping it with the current time.
    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<ExamAttempt, AppError>;

    /// Looks an attempt up by id regardless of owner.
    async fn find_attempt(&self, id: i64) -> Result<Option<ExamAttempt>, AppError>;

    /// Most recent attempts of `user_id`, newest first.
    async fn list_attempts(&self, user_id: i64, limit: i64) -> Result<Vec<AttemptSummary>, AppError>;
}
