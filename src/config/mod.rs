mod settings;

pub use settings::{
    GrokConfig, HistoryConfig, LoggingConfig, OpenAIConfig, ServerConfig, Settings, StorageConfig,
};
