//! Live 模式总线接入
//!
//! rumqttc 事件循环：连接确认后订阅全局 topic 与当前已知储罐的字段
//! topic，收到消息交给共享处理路径。连接错误按固定周期无限重试，
//! 对调用方只体现为可观测的连接状态，从不向外抛错。

use crate::decode::{CONFIG_TOPIC, MODE_TOPIC_PATTERN};
use crate::{GatewayError, GatewayShared};
use cuverie_storage::{FacilityStore, TankStore};
use domain::configured_indices;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

/// 总线连接参数。
#[derive(Debug, Clone)]
pub(crate) struct BusConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reconnect: Duration,
}

/// 解析 broker URL（`mqtt://host:port`，端口缺省 1883）。
pub(crate) fn parse_broker_url(url: &str) -> Result<(String, u16), GatewayError> {
    let stripped = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);
    let stripped = stripped.trim_end_matches('/');
    if stripped.is_empty() {
        return Err(GatewayError::InvalidUrl(url.to_string()));
    }
    match stripped.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| GatewayError::InvalidUrl(url.to_string()))?;
            Ok((host.to_string(), port))
        }
        None => Ok((stripped.to_string(), 1883)),
    }
}

/// 创建 MQTT 客户端与事件循环。
pub(crate) fn connect(config: &BusConfig) -> Result<(AsyncClient, EventLoop), GatewayError> {
    let (host, port) = parse_broker_url(&config.url)?;
    let client_id = format!("cuverie-gateway-{}", now_epoch_ms());
    let mut options = MqttOptions::new(client_id, host, port);
    options.set_keep_alive(Duration::from_secs(30));
    if let (Some(username), Some(password)) =
        (config.username.as_ref(), config.password.as_ref())
    {
        options.set_credentials(username, password);
    }
    // 请求通道要容得下一轮整车间的字段订阅
    Ok(AsyncClient::new(options, 64))
}

/// 总线事件循环任务。
pub(crate) fn spawn_bus_loop(
    shared: Arc<GatewayShared>,
    client: AsyncClient,
    mut eventloop: EventLoop,
    reconnect: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(target: "cuverie.gateway", "mqtt connected");
                    shared.connected.store(true, Ordering::Relaxed);
                    // 订阅在独立任务中进行：事件循环必须继续 poll，
                    // 否则订阅请求无人消费
                    spawn_subscribe_all(shared.clone(), client.clone());
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    GatewayShared::handle_bus_message(
                        &shared,
                        &client,
                        &publish.topic,
                        &publish.payload,
                    )
                    .await;
                }
                Ok(_) => {}
                Err(err) => {
                    shared.connected.store(false, Ordering::Relaxed);
                    cuverie_telemetry::record_reconnect();
                    warn!(target: "cuverie.gateway", "mqtt connection error: {}; retrying", err);
                    tokio::time::sleep(reconnect).await;
                }
            }
        }
    })
}

/// 订阅全局 topic 与当前储罐字段 topic（独立任务）。
fn spawn_subscribe_all(shared: Arc<GatewayShared>, client: AsyncClient) {
    tokio::spawn(async move {
        for topic in [CONFIG_TOPIC, MODE_TOPIC_PATTERN] {
            if let Err(err) = client.subscribe(topic, QoS::AtLeastOnce).await {
                warn!(target: "cuverie.gateway", "subscribe {} failed: {}", topic, err);
            }
        }
        subscribe_tank_topics(&shared, &client).await;
    });
}

/// 在独立任务中重新订阅储罐字段 topic。
///
/// 对账可能扩大储罐集合，每次成功对账后都要调用。
pub(crate) fn spawn_subscribe_tank_topics(shared: Arc<GatewayShared>, client: AsyncClient) {
    tokio::spawn(async move {
        subscribe_tank_topics(&shared, &client).await;
    });
}

/// 为每个当前可见储罐订阅四个字段 topic。
async fn subscribe_tank_topics(shared: &GatewayShared, client: &AsyncClient) {
    let facilities = match shared.facilities.list().await {
        Ok(facilities) => facilities,
        Err(err) => {
            warn!(target: "cuverie.gateway", "facility list failed: {}", err);
            return;
        }
    };
    let configured = configured_indices(&facilities);
    let tanks = match shared.tanks.list().await {
        Ok(tanks) => tanks,
        Err(err) => {
            warn!(target: "cuverie.gateway", "tank list failed: {}", err);
            return;
        }
    };
    for tank in tanks {
        if !tank.is_visible(&configured) {
            continue;
        }
        for field in ["temp", "setpoint", "state", "contents"] {
            let topic = format!("tank/{}/{}", tank.index, field);
            if let Err(err) = client.subscribe(&topic, QoS::AtLeastOnce).await {
                warn!(target: "cuverie.gateway", "subscribe {} failed: {}", topic, err);
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::parse_broker_url;

    #[test]
    fn broker_url_parses() {
        assert_eq!(
            parse_broker_url("mqtt://broker.local:1884").expect("url"),
            ("broker.local".to_string(), 1884)
        );
        assert_eq!(
            parse_broker_url("tcp://10.0.0.5").expect("url"),
            ("10.0.0.5".to_string(), 1883)
        );
        assert!(parse_broker_url("mqtt://").is_err());
        assert!(parse_broker_url("mqtt://host:notaport").is_err());
    }
}
