use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: String,

    /// When unset the board cache runs in-process instead of on Redis.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Latest-price fallback used at startup and whenever a take drains the
    /// opposing side.
    #[serde(default = "default_price")]
    pub default_price: i64,

    #[serde(default = "default_board_cache_ttl_ms")]
    pub board_cache_ttl_ms: u64,

    /// Deadline for the matching transaction.
    #[serde(default = "default_take_timeout_secs")]
    pub take_timeout_secs: u64,

    #[serde(default = "default_notification_queue_size")]
    pub notification_queue_size: usize,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_price() -> i64 {
    10
}

fn default_board_cache_ttl_ms() -> u64 {
    crate::cache::keys::ttl::BOARD_MS
}

fn default_take_timeout_secs() -> u64 {
    5
}

fn default_notification_queue_size() -> usize {
    1024
}

impl AppConfig {
    /// Load from environment variables (a `.env` file is merged in by the
    /// caller before this runs).
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }

    pub fn board_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.board_cache_ttl_ms)
    }

    pub fn take_timeout(&self) -> Duration {
        Duration::from_secs(self.take_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
