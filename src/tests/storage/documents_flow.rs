//! Knowledge document CRUD against the embedded store.

use crate::core::storage::{
    delete_document, get_document, list_documents, new_document_id, upsert_document,
    KnowledgeDocument,
};
use crate::tests::common::{filler_document, open_test_store};

#[tokio::test]
async fn test_upsert_then_get_round_trips() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    let id = new_document_id();
    let doc = KnowledgeDocument::new("Giới thiệu HaiAn", "Dịch vụ vận tải container.", "Dịch vụ");
    upsert_document(db, &id, &doc).await.unwrap();

    let stored = get_document(db, &id).await.unwrap().expect("document exists");
    assert_eq!(stored.id.as_deref(), Some(id.as_str()));
    assert_eq!(stored.title, "Giới thiệu HaiAn");
    assert_eq!(stored.content, "Dịch vụ vận tải container.");
    assert!(stored.created_at.is_some());
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn test_upsert_preserves_created_at_across_edits() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    let id = new_document_id();
    upsert_document(db, &id, &filler_document("Lịch tàu tháng 8"))
        .await
        .unwrap();
    let first = get_document(db, &id).await.unwrap().expect("first write");

    let edited = KnowledgeDocument::new("Lịch tàu tháng 8", "Nội dung đã sửa", "Lịch tàu");
    upsert_document(db, &id, &edited).await.unwrap();
    let second = get_document(db, &id).await.unwrap().expect("second write");

    assert_eq!(second.content, "Nội dung đã sửa");
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let (store, _dir) = open_test_store().await;
    let found = get_document(store.db(), "doc_khong_ton_tai").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_list_returns_every_document() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    // Caller-chosen ids; clock-based ids could collide inside one test
    for id in ["doc_a", "doc_b", "doc_c"] {
        upsert_document(db, id, &filler_document(id)).await.unwrap();
    }

    let docs = list_documents(db).await.unwrap();
    assert_eq!(docs.len(), 3);
    for id in ["doc_a", "doc_b", "doc_c"] {
        assert!(docs.iter().any(|d| d.id.as_deref() == Some(id)));
    }
}

#[tokio::test]
async fn test_delete_leaves_others_untouched() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    upsert_document(db, "doc_keep", &filler_document("Giữ lại")).await.unwrap();
    upsert_document(db, "doc_drop", &filler_document("Xóa đi")).await.unwrap();

    delete_document(db, "doc_drop").await.unwrap();

    let docs = list_documents(db).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id.as_deref(), Some("doc_keep"));
}
