use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::entries::gateway::EntryGateway;
use crate::storage::{DocumentStore, RailEngineStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(RailEngineStore::new(&config.store)?) as Arc<dyn DocumentStore>;
        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<crate::storage::memory::MemoryStore>) -> Self {
        use crate::config::{StoreConfig, DEFAULT_GOALS};

        let config = Arc::new(AppConfig {
            store: StoreConfig {
                api_url: "http://fake.local".into(),
                engine_id: "fake".into(),
                pat: "fake".into(),
                ingest_url: "http://fake.local/ingest".into(),
                ingest_key: "fake".into(),
            },
            page_size: 100,
            ingest_settle: std::time::Duration::ZERO,
            utc_offset: time::UtcOffset::UTC,
            goals: DEFAULT_GOALS,
        });
        Self::from_parts(config, store as Arc<dyn DocumentStore>)
    }
}

impl FromRef<AppState> for EntryGateway {
    fn from_ref(state: &AppState) -> Self {
        EntryGateway::new(
            state.store.clone(),
            state.config.page_size,
            state.config.ingest_settle,
        )
    }
}
