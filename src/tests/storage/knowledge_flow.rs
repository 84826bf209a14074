//! Knowledge Q&A entry CRUD against the embedded store.

use crate::core::storage::{
    count_knowledge_items, create_knowledge_item, delete_knowledge_item, list_knowledge_items,
    list_knowledge_items_by_category, update_knowledge_item, KnowledgeItem,
};
use crate::tests::common::{open_test_store, pricing_item, schedule_item};

#[tokio::test]
async fn test_create_assigns_id_and_lists_back() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    let id = create_knowledge_item(db, &schedule_item()).await.unwrap();
    assert!(!id.is_empty());

    let items = list_knowledge_items(db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_deref(), Some(id.as_str()));
    assert_eq!(items[0].keywords, vec!["lịch tàu", "singapore"]);
    assert!(items[0].created_at.is_some());
}

#[tokio::test]
async fn test_update_rewrites_fields_in_place() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    let id = create_knowledge_item(db, &schedule_item()).await.unwrap();

    let mut edited = schedule_item();
    edited.answer = "Lịch đã đổi: tàu chạy thứ 3 và thứ 6.".to_string();
    edited.keywords.push("thứ 6".to_string());
    update_knowledge_item(db, &id, &edited).await.unwrap();

    let items = list_knowledge_items(db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].answer, "Lịch đã đổi: tàu chạy thứ 3 và thứ 6.");
    assert_eq!(items[0].keywords.len(), 3);
}

#[tokio::test]
async fn test_count_tracks_creates_and_deletes() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    assert_eq!(count_knowledge_items(db).await.unwrap(), 0);

    let first = create_knowledge_item(db, &schedule_item()).await.unwrap();
    create_knowledge_item(db, &pricing_item()).await.unwrap();
    assert_eq!(count_knowledge_items(db).await.unwrap(), 2);

    delete_knowledge_item(db, &first).await.unwrap();
    assert_eq!(count_knowledge_items(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_admin_list_groups_by_category() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    // Insert out of category order
    create_knowledge_item(db, &schedule_item()).await.unwrap(); // Lịch tàu
    create_knowledge_item(db, &pricing_item()).await.unwrap(); // Báo giá
    let mut second_schedule = schedule_item();
    second_schedule.question = "Lịch tàu đi Rotterdam thế nào?".to_string();
    create_knowledge_item(db, &second_schedule).await.unwrap();

    let items = list_knowledge_items_by_category(db).await.unwrap();
    let categories: Vec<&str> = items.iter().map(|i| i.category.as_str()).collect();
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_unicode_content_survives_round_trip() {
    let (store, _dir) = open_test_store().await;
    let db = store.db();

    let item = KnowledgeItem::new(
        "Phụ phí nhiên liệu (BAF) là gì?",
        "BAF là phụ phí nhiên liệu, điều chỉnh theo giá dầu — thường 5-10% cước biển.",
        vec!["phụ phí".to_string(), "baf".to_string()],
        "Kiến thức",
    );
    create_knowledge_item(db, &item).await.unwrap();

    let items = list_knowledge_items(db).await.unwrap();
    assert_eq!(items[0].question, item.question);
    assert_eq!(items[0].answer, item.answer);
}
