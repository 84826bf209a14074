//! SurrealDB-backed support store.
//!
//! One embedded database holds every collection the console works with:
//!
//! - `knowledge_item` - Q&A entries for substring retrieval
//! - `knowledge_document` - long-form text concatenated into AI context
//! - `settings` - the chatbot/hero/landing singletons
//! - `chat_message` / `chat_session` / `chat_rating` - transcripts and
//!   feedback
//!
//! # Modules
//!
//! - `surrealdb` - [`SupportStore`] wrapper owning the connection and schema
//! - `error` - error types for storage operations
//! - `models` - record structs and the hard-coded default site content
//! - `knowledge_items` / `documents` - CRUD per collection
//! - `settings` - singleton load/save with merge-with-defaults
//! - `chat` - transcript writes, session lifecycle, analytics aggregation
//! - `seed` - sample data installation for an empty knowledge base

pub mod chat;
pub mod documents;
pub mod error;
pub mod knowledge_items;
pub mod models;
pub mod seed;
pub mod settings;
pub mod surrealdb;

pub use error::{StoreError, StoreResult};
pub use surrealdb::SupportStore;

pub use models::{
    ChatMessage, ChatRating, ChatSession, ChatbotSettings, CtaSettings, HeroFeature, HeroSettings,
    KnowledgeDocument, KnowledgeItem, LandingSettings, QuickAction, ServiceCard, ServicesSettings,
    MAX_HERO_FEATURES, MAX_SERVICE_CARDS,
};

pub use knowledge_items::{
    count_knowledge_items, create_knowledge_item, delete_knowledge_item, list_knowledge_items,
    list_knowledge_items_by_category, update_knowledge_item,
};

pub use documents::{delete_document, get_document, list_documents, new_document_id, upsert_document};

pub use settings::{
    load_chatbot_settings, load_hero_settings, load_landing_settings, save_chatbot_settings,
    save_hero_settings, save_landing_settings, CHATBOT_SETTINGS_ID, HERO_SETTINGS_ID,
    LANDING_SETTINGS_ID,
};

pub use chat::{
    chat_analytics, chat_history, end_session, list_sessions, save_chat_message, start_session,
    submit_rating, ChatAnalytics, DailyStats,
};

pub use seed::{sample_knowledge_items, seed_knowledge_base, SeedOutcome};
