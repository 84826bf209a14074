//! Reply orchestration for the support chat.
//!
//! One turn: gather the knowledge context from the store, attach the related
//! Q&A block when the retrieval finds a match, relay everything to the
//! gateway, hand the reply back verbatim.

use std::sync::Arc;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::gateway::{Gateway, GatewayResult};
use super::knowledge::{build_context, find_best_match, related_question_block};
use super::storage::{list_documents, list_knowledge_items};

/// Context sent instead of document text when the store cannot be read.
pub const NO_CONTEXT_FALLBACK: &str = "Không có dữ liệu cụ thể trong hệ thống.";

/// Builds the knowledge context for each user message and relays it to the
/// gateway. Cloning shares the underlying gateway handle.
#[derive(Clone)]
pub struct Assistant {
    gateway: Arc<dyn Gateway>,
}

impl Assistant {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Send one chat turn.
    ///
    /// Store failures never abort the send; the gateway gets the fixed
    /// fallback context instead. Gateway errors propagate so the caller can
    /// append its fallback bubble and toast.
    pub async fn send_message(&self, db: &Surreal<Db>, user_text: &str) -> GatewayResult<String> {
        let context = self.knowledge_context(db, user_text).await;
        self.gateway.chat(user_text, &context).await
    }

    async fn knowledge_context(&self, db: &Surreal<Db>, user_text: &str) -> String {
        let mut context = match list_documents(db).await {
            Ok(documents) => build_context(&documents),
            Err(e) => {
                log::error!("Failed to load knowledge documents: {e}");
                NO_CONTEXT_FALLBACK.to_string()
            }
        };

        match list_knowledge_items(db).await {
            Ok(items) => {
                if let Some(item) = find_best_match(user_text, &items) {
                    context.push_str("\n\n");
                    context.push_str(&related_question_block(item));
                }
            }
            Err(e) => log::error!("Failed to load knowledge items: {e}"),
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::client::MockGateway;
    use crate::core::gateway::GatewayError;
    use crate::core::knowledge::EMPTY_KNOWLEDGE_PLACEHOLDER;
    use crate::core::storage::{
        create_knowledge_item, upsert_document, KnowledgeDocument, KnowledgeItem, SupportStore,
    };

    async fn test_store() -> (tempfile::TempDir, SupportStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SupportStore::open(dir.path().join("db")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_empty_store_sends_placeholder_context() {
        let (_dir, store) = test_store().await;

        let mut gateway = MockGateway::new();
        gateway
            .expect_chat()
            .withf(|message, context| {
                message == "Xin chào" && context == EMPTY_KNOWLEDGE_PLACEHOLDER
            })
            .returning(|_, _| Ok("Chào bạn!".to_string()));

        let assistant = Assistant::new(Arc::new(gateway));
        let reply = assistant.send_message(store.db(), "Xin chào").await.unwrap();
        assert_eq!(reply, "Chào bạn!");
    }

    #[tokio::test]
    async fn test_context_carries_documents_and_related_block() {
        let (_dir, store) = test_store().await;

        let doc = KnowledgeDocument::new(
            "Lịch tàu".to_string(),
            "Tuyến Hải Phòng đi Singapore chạy hàng tuần.".to_string(),
            "Vận tải".to_string(),
        );
        upsert_document(store.db(), "doc_1", &doc).await.unwrap();

        let item = KnowledgeItem::new(
            "Thời gian vận chuyển đi Singapore?".to_string(),
            "Khoảng 3-5 ngày tùy lịch tàu.".to_string(),
            vec!["singapore".to_string()],
            "Vận tải".to_string(),
        );
        create_knowledge_item(store.db(), &item).await.unwrap();

        let mut gateway = MockGateway::new();
        gateway
            .expect_chat()
            .withf(|_, context| {
                context.contains("=== Lịch tàu ===")
                    && context.contains("Tuyến Hải Phòng đi Singapore chạy hàng tuần.")
                    && context.contains("Câu hỏi liên quan: Thời gian vận chuyển đi Singapore?")
                    && context.contains("Câu trả lời: Khoảng 3-5 ngày tùy lịch tàu.")
            })
            .returning(|_, _| Ok("ok".to_string()));

        let assistant = Assistant::new(Arc::new(gateway));
        assistant
            .send_message(store.db(), "ship hàng đi singapore")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_related_block_without_match() {
        let (_dir, store) = test_store().await;

        let item = KnowledgeItem::new(
            "Cước phí container 40ft?".to_string(),
            "Liên hệ phòng kinh doanh.".to_string(),
            vec!["cước phí".to_string()],
            "Báo giá".to_string(),
        );
        create_knowledge_item(store.db(), &item).await.unwrap();

        let mut gateway = MockGateway::new();
        gateway
            .expect_chat()
            .withf(|_, context| !context.contains("Câu hỏi liên quan"))
            .returning(|_, _| Ok("ok".to_string()));

        let assistant = Assistant::new(Arc::new(gateway));
        assistant
            .send_message(store.db(), "thời tiết hôm nay")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let (_dir, store) = test_store().await;

        let mut gateway = MockGateway::new();
        gateway
            .expect_chat()
            .returning(|_, _| Err(GatewayError::Unavailable("down".to_string())));

        let assistant = Assistant::new(Arc::new(gateway));
        let result = assistant.send_message(store.db(), "hello").await;
        assert!(matches!(result, Err(GatewayError::Unavailable(_))));
    }
}
