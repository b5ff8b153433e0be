use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub history: HistoryConfig,
    pub openai: OpenAIConfig,
    pub grok: GrokConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrokConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file for agent records; `:memory:` keeps them in process
    pub database_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Self::defaults()?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Built-in defaults only, ignoring files and environment
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("history.max_length", 10_i64)?
            .set_default("openai.base_url", "https://api.openai.com/v1")?
            .set_default("openai.model", "gpt-4o-mini")?
            .set_default("openai.max_tokens", 1024_i64)?
            .set_default("openai.temperature", 0.7_f64)?
            .set_default("openai.max_retries", 3_i64)?
            .set_default("openai.retry_base_delay_ms", 1000_i64)?
            .set_default("grok.base_url", "https://api.x.ai/v1")?
            .set_default("grok.model", "grok-2-latest")?
            .set_default("server.bind", "127.0.0.1:8080")?
            .set_default("storage.database_path", "agents.db")?
            .set_default("logging.level", "info")
    }

    pub fn openai_api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }

    /// Grok accepts unauthenticated deployments, so the key is optional
    pub fn grok_api_key() -> Option<String> {
        env::var("GROK_API_KEY").ok().filter(|key| !key.is_empty())
    }
}
