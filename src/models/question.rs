// src/models/question.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::AppError, utils::html::clean_html};

/// Question difficulty. Stored as its name ("Easy", "Medium", "Hard").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(AppError::Internal(format!("Unknown difficulty '{}'", other))),
        }
    }
}

/// One answer option together with its correctness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

/// Represents the 'questions' table in the database.
/// Options are stored as a JSON array, their array position is the option index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Whether `selected` points at an option flagged correct.
    /// The unanswered sentinel and out-of-range indices are never correct.
    pub fn is_correct_choice(&self, selected: i32) -> bool {
        usize::try_from(selected)
            .ok()
            .and_then(|index| self.options.get(index))
            .is_some_and(|option| option.is_correct)
    }

    /// Index of the first correct option, or -1 if none is flagged.
    pub fn correct_option_index(&self) -> i32 {
        self.options
            .iter()
            .position(|option| option.is_correct)
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(-1)
    }

    pub fn option_texts(&self) -> Vec<String> {
        self.options.iter().map(|option| option.text.clone()).collect()
    }
}

/// Option as shown to an exam taker: position and text only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicOption {
    pub index: usize,
    pub text: String,
}

/// DTO for sending a question to the client (excludes correctness flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<PublicOption>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl From<Question> for PublicQuestion {
    fn from(question: Question) -> Self {
        let options = question
            .options
            .into_iter()
            .enumerate()
            .map(|(index, option)| PublicOption {
                index,
                text: option.text,
            })
            .collect();

        Self {
            id: question.id,
            prompt: question.prompt,
            options,
            category: question.category,
            difficulty: question.difficulty,
        }
    }
}

/// A question that passed write-time validation and is ready to be stored.
/// Only constructible through [`NewQuestion::new`], which guarantees at least
/// one correct option.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    prompt: String,
    options: Vec<QuestionOption>,
    category: String,
    difficulty: Difficulty,
}

impl NewQuestion {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<QuestionOption>,
        category: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, AppError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(AppError::Validation("Question text cannot be empty".to_string()));
        }
        if options.is_empty() {
            return Err(AppError::Validation("Question needs at least one option".to_string()));
        }
        if !options.iter().any(|option| option.is_correct) {
            return Err(AppError::Validation(
                "Question needs at least one correct option".to_string(),
            ));
        }

        Ok(Self {
            prompt: prompt.trim().to_string(),
            options,
            category: category.into(),
            difficulty,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Attaches storage-assigned identity.
    pub fn into_question(self, id: i64, created_at: DateTime<Utc>) -> Question {
        Question {
            id,
            prompt: self.prompt,
            options: self.options,
            category: self.category,
            difficulty: self.difficulty,
            created_at,
        }
    }
}

// Serialize is required: validator attaches the field value to custom-validation errors.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[serde(rename = "question")]
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<CreateOptionRequest>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

fn validate_options(options: &[CreateOptionRequest]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("too_few_options"));
    }
    if options.len() > 10 {
        return Err(validator::ValidationError::new("too_many_options"));
    }
    for opt in options {
        if opt.validate().is_err() {
            return Err(validator::ValidationError::new("invalid_option_text"));
        }
    }
    if !options.iter().any(|opt| opt.is_correct) {
        return Err(validator::ValidationError::new("no_correct_option"));
    }
    Ok(())
}

impl TryFrom<CreateQuestionRequest> for NewQuestion {
    type Error = AppError;

    /// Validates the request and sanitizes all admin-supplied text.
    fn try_from(req: CreateQuestionRequest) -> Result<Self, Self::Error> {
        req.validate()?;

        let options = req
            .options
            .into_iter()
            .map(|opt| QuestionOption {
                text: clean_html(&opt.text),
                is_correct: opt.is_correct,
            })
            .collect();

        NewQuestion::new(
            clean_html(&req.prompt),
            options,
            req.category.map(|c| clean_html(&c)).unwrap_or_else(|| "General".to_string()),
            req.difficulty.unwrap_or_default(),
        )
    }
}
