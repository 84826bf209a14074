//! Property tests for knowledge retrieval.
//!
//! Matching is plain substring containment in two directions: keyword in
//! query, or query in question. These properties pin both directions and
//! the first-match-wins scan order.

use proptest::prelude::*;

use crate::core::knowledge::find_best_match;
use crate::core::storage::KnowledgeItem;

/// Keywords as stored: lowercase, non-empty, no commas.
fn arb_keyword() -> impl Strategy<Value = String> {
    "[a-z0-9]{2,12}"
}

/// ASCII-only question text so slicing and case folding stay trivial.
fn arb_question() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{5,60}"
}

fn item(question: &str, keywords: Vec<String>) -> KnowledgeItem {
    KnowledgeItem::new(question, "câu trả lời đủ dài để hợp lệ", keywords, "Dịch vụ")
}

proptest! {
    /// A stored keyword embedded anywhere in the query matches its entry.
    #[test]
    fn prop_keyword_in_query_matches(
        keyword in arb_keyword(),
        prefix in "[A-Z ]{0,20}",
        suffix in "[A-Z ]{0,20}",
    ) {
        let items = vec![item("Một câu hỏi bất kỳ?", vec![keyword.clone()])];
        let query = format!("{prefix}{keyword}{suffix}");
        prop_assert!(find_best_match(&query, &items).is_some());
    }

    /// A query that is the entry's question matches even with no keywords,
    /// whatever the query's casing.
    #[test]
    fn prop_question_match_is_case_insensitive(question in arb_question()) {
        let items = vec![item(&question, Vec::new())];
        prop_assert!(find_best_match(&question.to_uppercase(), &items).is_some());
        prop_assert!(find_best_match(&question.to_lowercase(), &items).is_some());
    }

    /// Uppercased stored keywords still match a lowercase query.
    #[test]
    fn prop_keyword_match_is_case_insensitive(keyword in arb_keyword()) {
        let items = vec![item("Một câu hỏi bất kỳ?", vec![keyword.to_uppercase()])];
        prop_assert!(find_best_match(&keyword, &items).is_some());
    }

    /// The scan returns the first matching entry, never a later one.
    #[test]
    fn prop_first_matching_entry_wins(keyword in arb_keyword()) {
        let items = vec![
            item("Câu hỏi thứ nhất?", vec![keyword.clone()]),
            item("Câu hỏi thứ hai?", vec![keyword.clone()]),
        ];
        let found = find_best_match(&keyword, &items);
        prop_assert_eq!(
            found.map(|i| i.question.as_str()),
            Some("Câu hỏi thứ nhất?")
        );
    }

    /// A digits-only query cannot match a letters-only entry in either
    /// direction.
    #[test]
    fn prop_disjoint_alphabets_never_match(
        query in "[0-9]{1,20}",
        keyword in "[a-z]{2,10}",
    ) {
        let items = vec![item("chỉ toàn chữ cái", vec![keyword])];
        prop_assert!(find_best_match(&query, &items).is_none());
    }
}
