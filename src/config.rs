use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub openai: OpenAiConfig,

    pub review: ReviewConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/critiq.db".to_string(),
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
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Default: true for production safety. Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Session inactivity expiry in minutes.
    pub session_timeout_minutes: i64,

    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6160,
            cors_allowed_origins: vec![
                "http://localhost:6160".to_string(),
                "http://127.0.0.1:6160".to_string(),
            ],
            secure_cookies: true,
            session_timeout_minutes: 60,
            metrics_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of the chat-completions API. Any OpenAI-compatible
    /// endpoint works (OpenRouter, local proxies).
    pub base_url: String,

    pub model: String,

    pub temperature: f32,

    /// Request timeout in seconds (default: 60). Review calls can be slow.
    pub request_timeout_seconds: u32,

    /// API key for the upstream service. Never written back to disk;
    /// populated from the OPENAI_API_KEY environment variable at startup.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            request_timeout_seconds: 60,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Maximum number of characters accepted per review. Submissions
    /// above the cap are rejected before any upstream call.
    pub max_code_chars: usize,

    /// File extensions accepted by the upload control.
    pub allowed_extensions: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_code_chars: 6000,
            allowed_extensions: ["py", "sh", "tf", "yaml", "yml", "json", "txt", "rs"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Minimum accepted password length for new accounts and password changes.
    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            min_password_length: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            openai: OpenAiConfig::default(),
            review: ReviewConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // .env is optional; when present it supplies OPENAI_API_KEY.
        let _ = dotenvy::dotenv();

        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.openai.api_key = Some(key);
        }

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
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("critiq").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".critiq").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.review.max_code_chars == 0 {
            anyhow::bail!("review.max_code_chars must be > 0");
        }

        if self.openai.base_url.is_empty() {
            anyhow::bail!("openai.base_url cannot be empty");
        }

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            anyhow::bail!("openai.temperature must be between 0.0 and 2.0");
        }

        Ok(())
    }

    #[must_use]
    pub fn extension_allowed(&self, extension: &str) -> bool {
        self.review
            .allowed_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.review.max_code_chars, 6000);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert!((config.openai.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.security.min_password_length, 8);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[openai]"));
        assert!(toml_str.contains("[review]"));
        // The API key must never round-trip to disk.
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [review]
            max_code_chars = 4000
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.review.max_code_chars, 4000);

        assert_eq!(config.server.port, 6160);
    }

    #[test]
    fn test_extension_allowed_is_case_insensitive() {
        let config = Config::default();
        assert!(config.extension_allowed("py"));
        assert!(config.extension_allowed("YAML"));
        assert!(!config.extension_allowed("exe"));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let mut config = Config::default();
        config.review.max_code_chars = 0;
        assert!(config.validate().is_err());
    }
}
