use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::assistant::Assistant;
use crate::core::gateway::{Gateway, GatewayClient};
use crate::core::i18n::Language;
use crate::core::logging::{GatewayConfigError, StoreOpenError};
use crate::core::storage::SupportStore;

use super::events::AppEvent;

/// Centralized handle to all backend services.
///
/// Created once at startup, then passed (by ref or clone) to views
/// that need backend access. The store and assistant are Clone, so
/// spawned tasks take their own handles.
pub struct Services {
    pub store: SupportStore,
    pub gateway: Arc<dyn Gateway>,
    pub assistant: Assistant,
    /// Console display language, from config. Bilingual copy renders in
    /// this language; languages without dedicated copy fall back to English.
    pub language: Language,
    /// Identity stored on chat messages and sessions written by this console.
    pub operator: String,
    pub config: AppConfig,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize all services from config.
    ///
    /// Failures here are fatal — the console cannot run without its store
    /// and a well-formed gateway config.
    pub async fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> miette::Result<Self> {
        let data_dir = config.data_dir();
        log::info!("Initializing services with data dir: {}", data_dir.display());

        // SurrealDB (embedded RocksDB)
        let store_path = data_dir.join("store");
        let store = SupportStore::open(&store_path)
            .await
            .map_err(|e| StoreOpenError::new(store_path.display().to_string(), e.to_string()))?;
        log::info!("Support store opened");

        // Gateway HTTP client
        let gateway: Arc<dyn Gateway> = Arc::new(
            GatewayClient::new(&config.gateway)
                .map_err(|e| GatewayConfigError::new(&config.gateway.base_url, e.to_string()))?,
        );
        log::info!("Gateway client ready for {}", config.gateway.base_url);

        let assistant = Assistant::new(Arc::clone(&gateway));

        let language = match config.tui.language.parse::<Language>() {
            Ok(lang) => lang,
            Err(e) => {
                log::warn!("Config language not usable ({e}); falling back to vi");
                Language::Vi
            }
        };

        Ok(Self {
            store,
            gateway,
            assistant,
            language,
            operator: config.data.operator.clone(),
            config: config.clone(),
            event_tx,
        })
    }
}
