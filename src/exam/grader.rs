// src/exam/grader.rs

use crate::{
    error::AppError,
    models::{
        attempt::{AnswerSubmission, QuestionOutcome},
        question::Question,
    },
    repository::ExamRepository,
};

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedExam {
    /// One entry per graded answer, in submission order.
    pub outcomes: Vec<QuestionOutcome>,
    pub score: i32,
    pub total: i32,
}

impl GradedExam {
    pub fn percentage(&self) -> i32 {
        percentage(self.score, self.total)
    }
}

/// `score / total * 100`, rounded half up. An empty exam scores 0.
pub fn percentage(score: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    let score = i64::from(score);
    let total = i64::from(total);
    ((score * 100 * 2 + total) / (total * 2)) as i32
}

/// Grades a single answer against its question.
pub fn grade_answer(question: &Question, selected: i32) -> QuestionOutcome {
    QuestionOutcome {
        question_id: question.id,
        selected_option: selected,
        is_correct: question.is_correct_choice(selected),
    }
}

/// Grades a submission, looking each question up in turn.
///
/// Answers that reference an unknown question are skipped: they produce no
/// outcome and do not count toward the total.
pub async fn grade_answers(
    repo: &dyn ExamRepository,
    answers: &[AnswerSubmission],
) -> Result<GradedExam, AppError> {
    let mut outcomes = Vec::with_capacity(answers.len());
    let mut score = 0;

    for answer in answers {
        let Some(question) = repo.find_question(answer.question_id).await? else {
            tracing::warn!(
                "Skipping answer for unknown question {}",
                answer.question_id
            );
            continue;
        };

        let outcome = grade_answer(&question, answer.selected());
        if outcome.is_correct {
            score += 1;
        }
        outcomes.push(outcome);
    }

    let total = i32::try_from(outcomes.len())
        .map_err(|_| AppError::Validation("Too many answers submitted".to_string()))?;

    Ok(GradedExam {
        outcomes,
        score,
        total,
    })
}
