//! Knowledge retrieval for the AI reply pipeline.
//!
//! Deliberately plain string matching: no scoring, no stemming, no fuzzing.
//! The retrieval scan runs in store iteration order and the first matching
//! entry wins.

use crate::core::storage::models::{KnowledgeDocument, KnowledgeItem};

/// Context returned when no knowledge documents exist.
pub const EMPTY_KNOWLEDGE_PLACEHOLDER: &str = "Chưa có dữ liệu knowledge base.";

/// Find the first entry matching a user query.
///
/// The query is lowercased once. An entry matches if any of its keywords is a
/// substring of the query, or the query is a substring of the entry's
/// question. Note the two clauses run in opposite containment directions.
pub fn find_best_match<'a>(query: &str, items: &'a [KnowledgeItem]) -> Option<&'a KnowledgeItem> {
    let query = query.to_lowercase();

    items.iter().find(|item| {
        let keyword_match = item
            .keywords
            .iter()
            .any(|keyword| query.contains(&keyword.to_lowercase()));
        let question_match = item.question.to_lowercase().contains(&query);
        keyword_match || question_match
    })
}

/// Concatenate all knowledge documents into one context blob.
///
/// Format: `=== {title} ===\n{content}` per document, blank line between
/// documents, iteration order preserved. No truncation; token budgeting is
/// the remote side's problem. Returns [`EMPTY_KNOWLEDGE_PLACEHOLDER`] when
/// there are no documents, never an empty string.
pub fn build_context(documents: &[KnowledgeDocument]) -> String {
    if documents.is_empty() {
        return EMPTY_KNOWLEDGE_PLACEHOLDER.to_string();
    }

    documents
        .iter()
        .map(|doc| format!("=== {} ===\n{}", doc.title, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format the matched entry as the related-question block appended to the
/// AI context.
pub fn related_question_block(item: &KnowledgeItem) -> String {
    format!(
        "Câu hỏi liên quan: {}\nCâu trả lời: {}",
        item.question, item.answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(question: &str, keywords: &[&str]) -> KnowledgeItem {
        KnowledgeItem::new(
            question,
            "answer text long enough",
            keywords.iter().map(|k| k.to_string()).collect(),
            "Lịch tàu",
        )
    }

    fn doc(title: &str, content: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(title, content, "Chung")
    }

    #[test]
    fn test_keyword_contained_in_query_matches() {
        let items = vec![item("Lịch tàu từ Hải Phòng đi Singapore như thế nào?", &["lịch tàu", "singapore"])];
        let found = find_best_match("cho tôi xem LỊCH TÀU tuần này", &items);
        assert!(found.is_some());
    }

    #[test]
    fn test_query_contained_in_question_matches() {
        // Reverse direction: the whole query is a fragment of the question.
        let items = vec![item("Làm thế nào để tra cứu container?", &["nosuchkeyword"])];
        let found = find_best_match("tra cứu container", &items);
        assert!(found.is_some());
    }

    #[test]
    fn test_question_contained_in_query_does_not_match() {
        // The question clause only runs query-into-question. A query that
        // merely contains the question's words scattered does not match.
        let items = vec![item("Giá cước đi Mỹ?", &["báo giá"])];
        let found = find_best_match("giá tốt nhất cước rẻ nhất đi đâu cũng được Mỹ", &items);
        assert!(found.is_none());
    }

    #[test]
    fn test_first_match_wins_in_iteration_order() {
        let items = vec![
            item("Câu hỏi một?", &["container"]),
            item("Câu hỏi hai?", &["container"]),
        ];
        let found = find_best_match("container của tôi ở đâu", &items).unwrap();
        assert_eq!(found.question, "Câu hỏi một?");
    }

    #[test]
    fn test_no_match_returns_none() {
        let items = vec![item("Lịch tàu đi Singapore?", &["lịch tàu"])];
        assert!(find_best_match("thời tiết hôm nay thế nào", &items).is_none());
        assert!(find_best_match("anything", &[]).is_none());
    }

    #[test]
    fn test_match_is_case_insensitive_both_ways() {
        let items = vec![item("Tra Cứu Container?", &["Bill Of Lading"])];
        assert!(find_best_match("số BILL OF LADING của tôi", &items).is_some());
        assert!(find_best_match("tra cứu container", &items).is_some());
    }

    #[test]
    fn test_build_context_empty_returns_placeholder() {
        assert_eq!(build_context(&[]), EMPTY_KNOWLEDGE_PLACEHOLDER);
        assert!(!build_context(&[]).is_empty());
    }

    #[test]
    fn test_build_context_format_and_order() {
        let docs = vec![doc("A", "x"), doc("B", "y")];
        assert_eq!(build_context(&docs), "=== A ===\nx\n\n=== B ===\ny");
    }

    #[test]
    fn test_build_context_preserves_multiline_content() {
        let docs = vec![doc("Tuyến đường", "Hải Phòng - Singapore\nHải Phòng - Hong Kong")];
        assert_eq!(
            build_context(&docs),
            "=== Tuyến đường ===\nHải Phòng - Singapore\nHải Phòng - Hong Kong"
        );
    }

    #[test]
    fn test_related_question_block_format() {
        let matched = item("Lịch tàu đi Singapore?", &["lịch tàu"]);
        let block = related_question_block(&matched);
        assert_eq!(
            block,
            "Câu hỏi liên quan: Lịch tàu đi Singapore?\nCâu trả lời: answer text long enough"
        );
    }
}
