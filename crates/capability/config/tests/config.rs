use cuverie_config::AppConfig;

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("CUVERIE_HTTP_ADDR", "127.0.0.1:4100");
        std::env::set_var("CUVERIE_MQTT_URL", "mqtt://localhost:1883");
        std::env::set_var("CUVERIE_MQTT_RECONNECT_SECONDS", "5");
        std::env::set_var("CUVERIE_MQTT_MOCK", "off");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:4100");
    assert_eq!(config.mqtt_url.as_deref(), Some("mqtt://localhost:1883"));
    assert_eq!(config.mqtt_reconnect_seconds, 5);
    assert!(!config.mqtt_mock);
    // 未设置的键保持默认值
    assert_eq!(config.offline_timeout_seconds, 60);
    assert_eq!(config.offline_sweep_seconds, 10);
    assert_eq!(config.mock_interval_ms, 5_000);
}
