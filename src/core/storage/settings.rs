//! Settings singletons: chatbot behavior, hero copy, landing copy.
//!
//! Each family lives in one fixed record of the `settings` table. Loads
//! merge the stored (possibly partial) document over hard-coded defaults and
//! never fail: a read error logs and yields defaults, because the chat widget
//! and the site must render regardless. Saves are merge-writes so unrelated
//! stored fields survive.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::core::merge::merge_with_defaults;

use super::error::StoreError;
use super::models::{ChatbotSettings, HeroSettings, LandingSettings};

/// Record id of the chatbot settings singleton.
pub const CHATBOT_SETTINGS_ID: &str = "chatbot";
/// Record id of the hero settings singleton.
pub const HERO_SETTINGS_ID: &str = "hero";
/// Record id of the landing settings singleton.
pub const LANDING_SETTINGS_ID: &str = "landing";

/// Read one settings record as raw JSON, without its record id.
async fn load_settings_value(db: &Surreal<Db>, id: &str) -> Result<Option<Value>, StoreError> {
    let value: Option<Value> = db
        .query("SELECT * OMIT id FROM type::thing('settings', $id)")
        .bind(("id", id.to_string()))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(value)
}

/// Merge-write one settings record (creates it when absent).
async fn save_settings_value<T: Serialize>(
    db: &Surreal<Db>,
    id: &str,
    settings: &T,
) -> Result<(), StoreError> {
    let data = serde_json::to_value(settings)?;

    db.query("UPSERT type::thing('settings', $id) MERGE $data")
        .bind(("id", id.to_string()))
        .bind(("data", data))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(())
}

/// Load the chatbot settings, falling back to defaults field by field.
pub async fn load_chatbot_settings(db: &Surreal<Db>) -> ChatbotSettings {
    match load_settings_value(db, CHATBOT_SETTINGS_ID).await {
        Ok(Some(stored)) => merge_with_defaults(stored, &ChatbotSettings::default()),
        Ok(None) => ChatbotSettings::default(),
        Err(e) => {
            log::error!("Failed to load chatbot settings: {e}");
            ChatbotSettings::default()
        }
    }
}

/// Persist the chatbot settings.
pub async fn save_chatbot_settings(
    db: &Surreal<Db>,
    settings: &ChatbotSettings,
) -> Result<(), StoreError> {
    save_settings_value(db, CHATBOT_SETTINGS_ID, settings).await
}

/// Load the hero copy, falling back to defaults field by field.
pub async fn load_hero_settings(db: &Surreal<Db>) -> HeroSettings {
    match load_settings_value(db, HERO_SETTINGS_ID).await {
        Ok(Some(stored)) => merge_with_defaults(stored, &HeroSettings::default()),
        Ok(None) => HeroSettings::default(),
        Err(e) => {
            log::error!("Failed to load hero settings: {e}");
            HeroSettings::default()
        }
    }
}

/// Persist the hero copy.
pub async fn save_hero_settings(
    db: &Surreal<Db>,
    settings: &HeroSettings,
) -> Result<(), StoreError> {
    save_settings_value(db, HERO_SETTINGS_ID, settings).await
}

/// Load the landing copy. The merge is section-wise: stored `services`
/// fields overlay default services independently of `cta`.
pub async fn load_landing_settings(db: &Surreal<Db>) -> LandingSettings {
    match load_settings_value(db, LANDING_SETTINGS_ID).await {
        Ok(Some(stored)) => {
            let defaults = LandingSettings::default();
            LandingSettings {
                services: merge_section(&stored, "services", &defaults.services),
                cta: merge_section(&stored, "cta", &defaults.cta),
            }
        }
        Ok(None) => LandingSettings::default(),
        Err(e) => {
            log::error!("Failed to load landing settings: {e}");
            LandingSettings::default()
        }
    }
}

/// Persist the landing copy.
pub async fn save_landing_settings(
    db: &Surreal<Db>,
    settings: &LandingSettings,
) -> Result<(), StoreError> {
    save_settings_value(db, LANDING_SETTINGS_ID, settings).await
}

fn merge_section<T>(stored: &Value, key: &str, defaults: &T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    match stored.get(key) {
        Some(section) => merge_with_defaults(section.clone(), defaults),
        None => defaults.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::SupportStore;
    use tempfile::TempDir;

    async fn test_store() -> (SupportStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SupportStore::open(dir.path().join("store"))
            .await
            .expect("Failed to open store");
        (store, dir)
    }

    #[tokio::test]
    async fn test_load_without_record_yields_defaults() {
        let (store, _dir) = test_store().await;
        let settings = load_chatbot_settings(store.db()).await;
        assert_eq!(settings, ChatbotSettings::default());
    }

    #[tokio::test]
    async fn test_partial_record_merges_under_defaults() {
        let (store, _dir) = test_store().await;

        // A document carrying a single field, as an older editor would write
        store
            .db()
            .query("UPSERT settings:chatbot MERGE { assistant_name: 'HaiAn Bot' }")
            .await
            .unwrap();

        let settings = load_chatbot_settings(store.db()).await;
        assert_eq!(settings.assistant_name, "HaiAn Bot");
        assert_eq!(
            settings.placeholder_vi,
            ChatbotSettings::default().placeholder_vi
        );
        assert_eq!(settings.quick_actions.len(), 4);
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let (store, _dir) = test_store().await;

        let mut settings = ChatbotSettings::default();
        settings.assistant_name = "Trợ lý HAIAN".to_string();
        settings.quick_actions.truncate(2);

        save_chatbot_settings(store.db(), &settings).await.unwrap();

        let loaded = load_chatbot_settings(store.db()).await;
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_save_preserves_unknown_fields() {
        let (store, _dir) = test_store().await;

        // Field written by a newer version of the editor
        store
            .db()
            .query("UPSERT settings:hero MERGE { experimental_flag: true }")
            .await
            .unwrap();

        save_hero_settings(store.db(), &HeroSettings::default())
            .await
            .unwrap();

        let raw = load_settings_value(store.db(), HERO_SETTINGS_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw.get("experimental_flag"), Some(&serde_json::json!(true)));
    }

    #[tokio::test]
    async fn test_landing_merge_is_section_wise() {
        let (store, _dir) = test_store().await;

        store
            .db()
            .query("UPSERT settings:landing MERGE { cta: { title_vi: 'Chat ngay' } }")
            .await
            .unwrap();

        let settings = load_landing_settings(store.db()).await;
        // Stored cta field wins; everything else comes from defaults
        assert_eq!(settings.cta.title_vi, "Chat ngay");
        assert_eq!(
            settings.cta.title_en,
            LandingSettings::default().cta.title_en
        );
        assert_eq!(settings.services, LandingSettings::default().services);
    }
}
