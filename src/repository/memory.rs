// src/repository/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptSummary, ExamAttempt, NewAttempt},
        question::{NewQuestion, Question},
    },
};

use super::ExamRepository;

#[derive(Default)]
struct Tables {
    questions: BTreeMap<i64, Question>,
    attempts: Vec<ExamAttempt>,
    next_question_id: i64,
    next_attempt_id: i64,
}

/// In-process store. Used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExamRepository for MemoryRepository {
    async fn sample_questions(&self, count: i64) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        let wanted = usize::try_from(count).unwrap_or(0);
        let all: Vec<&Question> = tables.questions.values().collect();

        let mut rng = rand::thread_rng();
        let mut picked: Vec<Question> = all
            .choose_multiple(&mut rng, wanted)
            .map(|q| (*q).clone())
            .collect();
        // choose_multiple does not randomize order
        picked.shuffle(&mut rng);

        Ok(picked)
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let id = tables.next_question_id;

        let question = question.into_question(id, Utc::now());
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.questions.remove(&id).is_some())
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<ExamAttempt, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_attempt_id += 1;
        let id = tables.next_attempt_id;

        let attempt = attempt.into_attempt(id, Utc::now());
        tables.attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<ExamAttempt>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.attempts.iter().find(|a| a.id == id).cloned())
    }

    async fn list_attempts(&self, user_id: i64, limit: i64) -> Result<Vec<AttemptSummary>, AppError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<&ExamAttempt> = tables
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(owned
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(ExamAttempt::summary)
            .collect())
    }
}
