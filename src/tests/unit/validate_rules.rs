//! Knowledge form validation boundaries, parameterized with rstest.
//!
//! Length rules count characters, not bytes; the Vietnamese cases exist to
//! catch a regression to byte counting.

use rstest::rstest;

use crate::core::validate::{parse_keywords, KnowledgeDraft, ValidationError};

fn draft(question: &str, answer: &str, keywords: &str, category: &str) -> KnowledgeDraft {
    KnowledgeDraft {
        question: question.to_string(),
        answer: answer.to_string(),
        keywords: keywords.to_string(),
        category: category.to_string(),
    }
}

const GOOD_QUESTION: &str = "Lịch tàu đi Singapore?";
const GOOD_ANSWER: &str = "Tàu chạy thứ 2 và thứ 5 hàng tuần.";

#[rstest]
#[case::question_one_under("bốn.", GOOD_ANSWER, "lịch tàu", "Lịch tàu", Some(ValidationError::QuestionTooShort))]
#[case::question_at_minimum("đúng5", GOOD_ANSWER, "lịch tàu", "Lịch tàu", None)]
#[case::question_whitespace_not_counted("  ab  ", GOOD_ANSWER, "lịch tàu", "Lịch tàu", Some(ValidationError::QuestionTooShort))]
#[case::answer_one_under(GOOD_QUESTION, "123456789", "lịch tàu", "Lịch tàu", Some(ValidationError::AnswerTooShort))]
#[case::answer_at_minimum(GOOD_QUESTION, "1234567890", "lịch tàu", "Lịch tàu", None)]
// 7 chars but 11 bytes; byte counting would wrongly accept it
#[case::answer_counts_chars_not_bytes(GOOD_QUESTION, "đẹp quá", "lịch tàu", "Lịch tàu", Some(ValidationError::AnswerTooShort))]
#[case::keywords_empty(GOOD_QUESTION, GOOD_ANSWER, "", "Lịch tàu", Some(ValidationError::NoKeywords))]
#[case::keywords_only_commas(GOOD_QUESTION, GOOD_ANSWER, " , ,, ", "Lịch tàu", Some(ValidationError::NoKeywords))]
#[case::category_blank(GOOD_QUESTION, GOOD_ANSWER, "lịch tàu", "   ", Some(ValidationError::NoCategory))]
#[case::all_valid(GOOD_QUESTION, GOOD_ANSWER, "lịch tàu, giá", "Lịch tàu", None)]
fn validation_boundaries(
    #[case] question: &str,
    #[case] answer: &str,
    #[case] keywords: &str,
    #[case] category: &str,
    #[case] expected: Option<ValidationError>,
) {
    let result = draft(question, answer, keywords, category).validate();
    match expected {
        Some(err) => assert_eq!(result, Err(err)),
        None => assert!(result.is_ok(), "expected valid draft, got {result:?}"),
    }
}

/// Rules are reported in form order: the question error masks everything
/// below it.
#[rstest]
fn first_failing_rule_wins() {
    let result = draft("?", "", "", "").validate();
    assert_eq!(result, Err(ValidationError::QuestionTooShort));
}

#[rstest]
#[case::lowercases("Lịch Tàu, GIÁ", vec!["lịch tàu", "giá"])]
#[case::trims_and_drops_empties(" a ,, b, ", vec!["a", "b"])]
#[case::single("container", vec!["container"])]
#[case::empty("", vec![])]
fn keyword_parsing(#[case] raw: &str, #[case] expected: Vec<&str>) {
    assert_eq!(parse_keywords(raw), expected);
}
