use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub search: SearchConfig,

    pub services: ServicesConfig,

    pub storage: StorageConfig,

    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            services: ServicesConfig::default(),
            storage: StorageConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/wikilens.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_idle_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8040,
            cors_allowed_origins: vec![
                "http://localhost:8040".to_string(),
                "http://127.0.0.1:8040".to_string(),
            ],
            secure_cookies: true,
            session_idle_minutes: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub cache_ttl_hours: i64,

    /// Extracts longer than this are cut back to their first sentence.
    pub extract_max_chars: usize,

    /// Length of the hard cut applied when the first sentence is still too long.
    pub hard_truncate_chars: usize,

    /// Number of words of the generated summary kept on the popularity row.
    pub summary_words: usize,

    /// Image source returned when Wikipedia has no lead image for a keyword.
    pub placeholder_image: String,

    pub top_limit: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 24,
            extract_max_chars: 390,
            hard_truncate_chars: 300,
            summary_words: 10,
            placeholder_image: "/images/placeholder.png".to_string(),
            top_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Request timeout in seconds for every outbound call
    pub request_timeout_seconds: u64,

    pub language_detection_url: String,

    pub language_detection_api_key: String,

    /// `{lang}` is replaced by the detected language code.
    pub wikipedia_url: String,

    pub chat_url: String,

    pub chat_api_key: String,

    pub chat_model: String,

    pub translate_url: String,

    pub translate_api_key: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 60,
            language_detection_url: "https://ws.detectlanguage.com/0.2/detect".to_string(),
            language_detection_api_key: String::new(),
            wikipedia_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            chat_url: "https://api.openai.com/v1/chat/completions".to_string(),
            chat_api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            translate_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
            translate_api_key: String::new(),
        }
    }
}

impl ServicesConfig {
    /// Fills empty API keys from the environment (`.env` is loaded at startup).
    pub fn apply_env_overrides(&mut self) {
        let pairs = [
            (&mut self.language_detection_api_key, "DETECT_LANGUAGE_API_KEY"),
            (&mut self.chat_api_key, "OPENAI_API_KEY"),
            (&mut self.translate_api_key, "TRANSLATE_API_KEY"),
        ];

        for (slot, var) in pairs {
            if slot.is_empty()
                && let Ok(value) = std::env::var(var)
            {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory avatar uploads are written to, served under `/avatars`.
    pub avatars_path: String,

    pub max_avatar_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            avatars_path: "data/avatars".to_string(),
            max_avatar_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = paths
            .iter()
            .find(|path| path.exists())
            .map_or_else(
                || {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                },
                |path| {
                    info!("Loading config from: {}", path.display());
                    Self::load_from_path(path)
                },
            )?;

        config.services.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("wikilens").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".wikilens").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.cache_ttl_hours <= 0 {
            anyhow::bail!("search.cache_ttl_hours must be > 0");
        }

        if self.search.hard_truncate_chars == 0
            || self.search.hard_truncate_chars > self.search.extract_max_chars
        {
            anyhow::bail!(
                "search.hard_truncate_chars must be between 1 and extract_max_chars ({})",
                self.search.extract_max_chars
            );
        }

        if self.search.summary_words == 0 {
            anyhow::bail!("search.summary_words must be > 0");
        }

        if !self.services.wikipedia_url.contains("{lang}") {
            anyhow::bail!("services.wikipedia_url must contain a {{lang}} placeholder");
        }

        Ok(())
    }
}
