//! Knowledge-entry form validation.
//!
//! Client-side rules only; the store accepts whatever it is given. Boundary
//! values follow the admin form: question ≥ 5 chars, answer ≥ 10 chars, at
//! least one keyword, category required.

use thiserror::Error;

use crate::core::i18n::{pick_localized, Language};

pub const MIN_QUESTION_CHARS: usize = 5;
pub const MIN_ANSWER_CHARS: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("question must be at least {MIN_QUESTION_CHARS} characters")]
    QuestionTooShort,

    #[error("answer must be at least {MIN_ANSWER_CHARS} characters")]
    AnswerTooShort,

    #[error("at least one keyword is required")]
    NoKeywords,

    #[error("category is required")]
    NoCategory,
}

pub type Result<T> = std::result::Result<T, ValidationError>;

impl ValidationError {
    /// Message shown in the form, in the operator's display language.
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            ValidationError::QuestionTooShort => pick_localized(
                lang,
                "Câu hỏi phải có ít nhất 5 ký tự",
                "Question must be at least 5 characters",
            ),
            ValidationError::AnswerTooShort => pick_localized(
                lang,
                "Câu trả lời phải có ít nhất 10 ký tự",
                "Answer must be at least 10 characters",
            ),
            ValidationError::NoKeywords => pick_localized(
                lang,
                "Nhập ít nhất 1 từ khóa",
                "Enter at least 1 keyword",
            ),
            ValidationError::NoCategory => {
                pick_localized(lang, "Chọn danh mục", "Choose a category")
            }
        }
    }
}

/// A knowledge entry as typed into the form, keywords still comma-separated.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeDraft {
    pub question: String,
    pub answer: String,
    pub keywords: String,
    pub category: String,
}

impl KnowledgeDraft {
    /// Validate all fields, returning the parsed keyword list on success.
    /// Errors report the first failing rule in form order.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.question.trim().chars().count() < MIN_QUESTION_CHARS {
            return Err(ValidationError::QuestionTooShort);
        }
        if self.answer.trim().chars().count() < MIN_ANSWER_CHARS {
            return Err(ValidationError::AnswerTooShort);
        }
        let keywords = parse_keywords(&self.keywords);
        if keywords.is_empty() {
            return Err(ValidationError::NoKeywords);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::NoCategory);
        }
        Ok(keywords)
    }
}

/// Split a comma-separated keyword string into trimmed, lowercased keywords.
/// Empty segments are dropped so a stray comma cannot create a keyword that
/// matches every query.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
