use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use pantry_inventory::{NonPositiveAdd, ReconcilerOptions, ShelfLife};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:pantry.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// OpenAI-compatible chat completion endpoint used for intent parsing and small talk.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after the first failed request.
    #[serde(default = "default_llm_retries")]
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_llm_api_url(),
            api_key: String::new(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            timeout_secs: default_llm_timeout_secs(),
            retries: default_llm_retries(),
        }
    }
}

fn default_llm_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.3
}

fn default_llm_timeout_secs() -> u64 {
    20
}

fn default_llm_retries() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    #[serde(default)]
    pub non_positive_add: NonPositiveAdd,
    /// Classifier results below this confidence are treated as small talk.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_expiry_window_days")]
    pub expiry_window_days: i64,
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: i64,
    #[serde(default)]
    pub shelf_life: ShelfLife,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            non_positive_add: NonPositiveAdd::default(),
            min_confidence: default_min_confidence(),
            expiry_window_days: default_expiry_window_days(),
            stats_window_days: default_stats_window_days(),
            shelf_life: ShelfLife::default(),
        }
    }
}

impl InventoryConfig {
    pub fn reconciler_options(&self) -> ReconcilerOptions {
        ReconcilerOptions {
            non_positive_add: self.non_positive_add,
            shelf_life: self.shelf_life.clone(),
        }
    }
}

fn default_min_confidence() -> f64 {
    0.5
}

fn default_expiry_window_days() -> i64 {
    3
}

fn default_stats_window_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MigrationConfig {
    /// Rebuild tables whose header mismatches even when they hold rows.
    #[serde(default)]
    pub allow_destructive_header_rewrite: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PANTRY__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        );

        // Legacy environment variables without prefix
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(api_key) = env::var("CHATLLM_API_KEY") {
            builder = builder.set_override("llm.api_key", api_key)?;
        }
        if let Ok(api_url) = env::var("CHATLLM_API_URL") {
            builder = builder.set_override("llm.api_url", api_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.llm.timeout_secs == 0 {
            return Err("LLM timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.inventory.min_confidence) {
            return Err("Inventory min_confidence must be between 0 and 1".to_string());
        }
        Ok(())
    }
}
