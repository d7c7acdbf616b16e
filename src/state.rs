use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::openai::OpenAiClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, OpenAiReviewService, ReviewService, SeaOrmAuthService, SeaOrmUserService,
    UserService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across all HTTP-based services to enable connection pooling
/// and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("critiq/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub review_service: Arc<dyn ReviewService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.openai.request_timeout_seconds.into())?;
        let openai = Arc::new(OpenAiClient::with_shared_client(http_client));

        let config_arc = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config_arc.clone()))
            as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), config_arc.clone()))
            as Arc<dyn UserService>;

        let review_service = Arc::new(OpenAiReviewService::new(config_arc.clone(), openai))
            as Arc<dyn ReviewService>;

        Ok(Self {
            config: config_arc,
            store,
            auth_service,
            user_service,
            review_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
