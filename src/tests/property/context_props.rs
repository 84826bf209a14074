//! Property tests for AI context assembly.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::core::knowledge::{build_context, EMPTY_KNOWLEDGE_PLACEHOLDER};
use crate::core::storage::KnowledgeDocument;

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,30}"
}

fn arb_body() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,]{1,120}"
}

fn documents(parts: Vec<(String, String)>) -> Vec<KnowledgeDocument> {
    parts
        .into_iter()
        .map(|(title, body)| KnowledgeDocument::new(title, body, "Dịch vụ"))
        .collect()
}

proptest! {
    /// The context is never an empty string: no documents yields the fixed
    /// placeholder, anything else yields the concatenation.
    #[test]
    fn prop_context_never_empty(parts in vec((arb_title(), arb_body()), 0..6)) {
        let context = build_context(&documents(parts));
        prop_assert!(!context.is_empty());
    }

    /// Every title renders as a header line and every body appears
    /// verbatim; the placeholder never leaks into a non-empty set.
    #[test]
    fn prop_context_carries_every_document(parts in vec((arb_title(), arb_body()), 1..6)) {
        let docs = documents(parts);
        let context = build_context(&docs);
        for doc in &docs {
            prop_assert!(context.contains(&format!("=== {} ===", doc.title)));
            prop_assert!(context.contains(&doc.content));
        }
        prop_assert!(!context.contains(EMPTY_KNOWLEDGE_PLACEHOLDER));
    }

    /// Headers appear in list order. Titles are suffixed with their index
    /// so they stay distinct whatever the generator produces.
    #[test]
    fn prop_context_preserves_order(titles in vec("[a-z]{4,12}", 2..5)) {
        let docs: Vec<KnowledgeDocument> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| KnowledgeDocument::new(format!("{t}{i}"), "thân tài liệu", "Dịch vụ"))
            .collect();
        let context = build_context(&docs);

        let mut cursor = 0usize;
        for doc in &docs {
            let header = format!("=== {} ===", doc.title);
            match context[cursor..].find(&header) {
                Some(offset) => cursor += offset + header.len(),
                None => prop_assert!(false, "header missing or out of order: {}", header),
            }
        }
    }
}
