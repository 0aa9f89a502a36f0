use crate::config::AppConfig;
use crate::recs::Recommender;
use crate::storage::{self, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recommender: Arc<Recommender>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = storage::init(&config).await;
        let recommender = Arc::new(Recommender::new(&config.llm));
        Ok(Self {
            store,
            recommender,
            config,
        })
    }

    /// Seeded in-memory state for tests. The recommender points at an
    /// unreachable endpoint so every chat call exercises the fallback path.
    #[cfg(test)]
    pub fn demo() -> Self {
        use crate::config::{JwtConfig, LlmConfig};
        use crate::storage::MemStore;

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "sazon".into(),
                audience: "sazon-admin".into(),
                ttl_hours: 24,
            },
            llm: LlmConfig {
                api_key: String::new(),
                model: "gpt-4o".into(),
                base_url: "http://127.0.0.1:1".into(),
            },
        });
        let store = Arc::new(MemStore::seeded()) as Arc<dyn Store>;
        let recommender = Arc::new(Recommender::new(&config.llm));
        Self {
            store,
            recommender,
            config,
        }
    }
}
