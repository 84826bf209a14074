//! Store fixtures and record builders.

#![allow(dead_code)]

use fake::faker::lorem::en::Sentence;
use fake::Fake;
use tempfile::TempDir;

use crate::core::storage::{KnowledgeDocument, KnowledgeItem, SupportStore};

/// Open a fresh embedded store under a temp directory.
///
/// The directory must outlive the store, so both are returned; dropping the
/// `TempDir` removes the database files.
pub async fn open_test_store() -> (SupportStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SupportStore::open(dir.path().join("store"))
        .await
        .expect("Failed to open store");
    (store, dir)
}

/// A well-formed Q&A entry about sailing schedules. Keywords are stored
/// lowercased, matching what `parse_keywords` produces.
pub fn schedule_item() -> KnowledgeItem {
    KnowledgeItem::new(
        "Lịch tàu từ Hải Phòng đi Singapore như thế nào?",
        "Tàu khởi hành thứ 2 và thứ 5 hàng tuần, thời gian vận chuyển 5-7 ngày.",
        vec!["lịch tàu".to_string(), "singapore".to_string()],
        "Lịch tàu",
    )
}

/// A well-formed Q&A entry about freight quotes, for multi-entry tests.
pub fn pricing_item() -> KnowledgeItem {
    KnowledgeItem::new(
        "Cước vận chuyển container 20ft đi Mỹ bao nhiêu?",
        "Cước dao động 2.500-4.000 USD tùy hãng tàu và thời điểm đặt chỗ.",
        vec!["cước".to_string(), "báo giá".to_string()],
        "Báo giá",
    )
}

/// Knowledge document with generated filler content under a fixed title.
pub fn filler_document(title: &str) -> KnowledgeDocument {
    let content: String = Sentence(5..12).fake();
    KnowledgeDocument::new(title, content, "Dịch vụ")
}
