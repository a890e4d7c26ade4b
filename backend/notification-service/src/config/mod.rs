use anyhow::{Context, Result};
use db_pool::{env_utils::parse_env_with_default, DbConfig};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DbConfig,
    pub kafka: KafkaConfig,
    pub expo: ExpoConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    /// Port of the health/metrics listener
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
}

#[derive(Clone)]
pub struct ExpoConfig {
    pub access_token: Option<String>,
    pub chunk_size: usize,
}

impl std::fmt::Debug for ExpoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpoConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                port: env::var("APP_PORT")
                    .unwrap_or_else(|_| "8001".to_string())
                    .parse()
                    .context("Invalid APP_PORT")?,
            },
            database: DbConfig::from_env("notification-service")
                .map_err(anyhow::Error::msg)
                .context("Invalid database configuration")?,
            kafka: KafkaConfig::from_env()?,
            expo: ExpoConfig {
                access_token: env::var("EXPO_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
                chunk_size: parse_env_with_default(
                    "EXPO_CHUNK_SIZE",
                    expo_push_shared::EXPO_CHUNK_LIMIT,
                ),
            },
        })
    }
}

impl KafkaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            brokers: env::var("KAFKA_BROKERS").context("KAFKA_BROKERS must be set")?,
            topic: env::var("KAFKA_NOTIFICATION_TOPIC")
                .unwrap_or_else(|_| "devotion.notifications".to_string()),
            group_id: env::var("KAFKA_GROUP_ID")
                .unwrap_or_else(|_| "notification-service".to_string()),
            batch_size: parse_env_with_default("KAFKA_BATCH_SIZE", 50),
            flush_interval_ms: parse_env_with_default("KAFKA_FLUSH_INTERVAL_MS", 1000),
        })
    }
}
