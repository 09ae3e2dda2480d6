//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
///
/// 所有项均可缺省：没有 MQTT URL 或显式开启 mock 时，网关以 Mock 模式
/// 启动；没有数据库 URL 时事件日志只保留内存环形缓冲。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: Option<String>,
    pub mqtt_url: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_reconnect_seconds: u64,
    pub mqtt_mock: bool,
    pub mock_interval_ms: u64,
    pub offline_timeout_seconds: u64,
    pub offline_sweep_seconds: u64,
    pub seed_demo: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("CUVERIE_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".to_string());
        let database_url = read_optional("CUVERIE_DATABASE_URL");
        let mqtt_url = read_optional("CUVERIE_MQTT_URL");
        let mqtt_username = read_optional("CUVERIE_MQTT_USERNAME");
        let mqtt_password = read_optional("CUVERIE_MQTT_PASSWORD");
        let mqtt_reconnect_seconds = read_u64_with_default("CUVERIE_MQTT_RECONNECT_SECONDS", 2)?;
        let mqtt_mock = read_bool_with_default("CUVERIE_MQTT_MOCK", true);
        let mock_interval_ms = read_u64_with_default("CUVERIE_MOCK_INTERVAL_MS", 5_000)?;
        let offline_timeout_seconds =
            read_u64_with_default("CUVERIE_OFFLINE_TIMEOUT_SECONDS", 60)?;
        let offline_sweep_seconds = read_u64_with_default("CUVERIE_OFFLINE_SWEEP_SECONDS", 10)?;
        let seed_demo = read_bool_with_default("CUVERIE_SEED_DEMO", true);

        Ok(Self {
            http_addr,
            database_url,
            mqtt_url,
            mqtt_username,
            mqtt_password,
            mqtt_reconnect_seconds,
            mqtt_mock,
            mock_interval_ms,
            offline_timeout_seconds,
            offline_sweep_seconds,
            seed_demo,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
