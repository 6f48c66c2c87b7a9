use std::sync::Arc;

use crate::clients::{
    ChatClient, ChatCompleter, DetectLanguageClient, LanguageDetector, TranslateClient,
    Translator, WikipediaClient, WikipediaSource,
};
use crate::config::{Config, ServicesConfig};
use crate::db::Store;
use crate::services::{
    AuthService, AvatarStorage, ProfileService, SeaOrmAuthService, SeaOrmProfileService,
    SearchService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Wikilens/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// The outbound providers used by search, chat and translation.
#[derive(Clone)]
pub struct Adapters {
    pub detector: Arc<dyn LanguageDetector>,
    pub wikipedia: Arc<dyn WikipediaSource>,
    pub chat: Arc<dyn ChatCompleter>,
    pub translator: Arc<dyn Translator>,
}

impl Adapters {
    /// HTTP-backed adapters sharing one pooled client.
    pub fn from_config(services: &ServicesConfig) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(services.request_timeout_seconds)?;

        Ok(Self {
            detector: Arc::new(DetectLanguageClient::with_shared_client(
                http_client.clone(),
                services.language_detection_url.clone(),
                services.language_detection_api_key.clone(),
            )),
            wikipedia: Arc::new(WikipediaClient::with_shared_client(
                http_client.clone(),
                services.wikipedia_url.clone(),
            )),
            chat: Arc::new(ChatClient::with_shared_client(
                http_client.clone(),
                services.chat_url.clone(),
                services.chat_api_key.clone(),
                services.chat_model.clone(),
            )),
            translator: Arc::new(TranslateClient::with_shared_client(
                http_client,
                services.translate_url.clone(),
                services.translate_api_key.clone(),
            )),
        })
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub chat: Arc<dyn ChatCompleter>,

    pub translator: Arc<dyn Translator>,

    pub avatars: AvatarStorage,

    pub search_service: Arc<SearchService>,

    pub auth_service: Arc<dyn AuthService>,

    pub profile_service: Arc<dyn ProfileService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let adapters = Adapters::from_config(&config.services)?;
        Self::with_adapters(config, adapters).await
    }

    /// Opens the store from `config` and wires the services around `adapters`.
    pub async fn with_adapters(config: Config, adapters: Adapters) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let avatars = AvatarStorage::new(&config.storage.avatars_path);

        let search_service = Arc::new(SearchService::new(
            store.clone(),
            adapters.detector,
            adapters.wikipedia,
            adapters.chat.clone(),
            config.search.clone(),
        ));

        let auth_service =
            Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService + 'static>;

        let profile_service = Arc::new(SeaOrmProfileService::new(
            store.clone(),
            avatars.clone(),
            config.storage.max_avatar_bytes,
        )) as Arc<dyn ProfileService + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            chat: adapters.chat,
            translator: adapters.translator,
            avatars,
            search_service,
            auth_service,
            profile_service,
        })
    }
}
