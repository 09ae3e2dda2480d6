//! 总线报文解码
//!
//! 纯函数：topic + payload → 封闭的解码结果枚举，不做任何 I/O。
//! 未知 topic 一律返回 `Decoded::Unrecognized`，网关静默忽略即可；
//! 只有配置 topic 上的坏 JSON 才构成 `DecodeError`（记日志后丢弃）。

use domain::{FacilityConfig, GeneralMode, TankSlot, TankStatus};
use serde_json::Value;

/// 配置快照 topic（固定）。
pub const CONFIG_TOPIC: &str = "global/config/fleet";

/// 酒库总体模式 topic 前缀（通配订阅 `global/prod/+/mode`）。
pub const MODE_TOPIC_PATTERN: &str = "global/prod/+/mode";

/// 单罐遥测字段更新。
///
/// 与储罐实体字段一一对应；None 表示该字段本次未携带。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankUpdate {
    pub temperature: Option<f64>,
    pub setpoint: Option<f64>,
    pub status: Option<TankStatus>,
    pub is_running: Option<bool>,
    /// 内容物主描述符（总线只传 grape，其余字段本地保留）。
    pub contents_grape: Option<String>,
}

impl TankUpdate {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.setpoint.is_none()
            && self.status.is_none()
            && self.is_running.is_none()
            && self.contents_grape.is_none()
    }
}

/// 解码结果（封闭和类型）。
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// 配置快照（可为空：零酒库也是合法配置）
    ConfigSnapshot(Vec<FacilityConfig>),
    /// 酒库总体模式变更
    ModeChange {
        facility_id: String,
        mode: GeneralMode,
    },
    /// 单罐字段遥测；解码成功即构成一次心跳
    TankField { index: u32, update: TankUpdate },
    /// 无关流量，静默忽略
    Unrecognized,
}

/// 解码错误（仅限配置报文格式损坏）。
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid config payload: {0}")]
    InvalidConfig(String),
    #[error("config payload is not utf-8")]
    NotUtf8,
}

/// 解码入口。
pub fn decode(topic: &str, payload: &[u8]) -> Result<Decoded, DecodeError> {
    if topic == CONFIG_TOPIC {
        return Ok(Decoded::ConfigSnapshot(parse_config_snapshot(payload)?));
    }

    if let Some(decoded) = decode_mode_topic(topic, payload) {
        return Ok(decoded);
    }

    if let Some(decoded) = decode_tank_topic(topic, payload) {
        return Ok(decoded);
    }

    Ok(decode_legacy(topic, payload))
}

/// 酒库名规范化为稳定的 slug 形式 id。
///
/// 空名或 "default"（不分大小写）映射到规范 id `default`；
/// 其余小写化、去重音、去非词字符、空白折叠为 `-`。
pub fn normalize_facility_id(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default") {
        return "default".to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut pending_dash = false;
    for ch in trimmed.to_lowercase().chars() {
        let folded = fold_accent(ch);
        if folded.is_whitespace() {
            pending_dash = !out.is_empty();
            continue;
        }
        match folded {
            'a'..='z' | '0'..='9' | '_' | '-' => {
                if pending_dash {
                    out.push('-');
                    pending_dash = false;
                }
                out.push(folded);
            }
            _ => {}
        }
    }
    out
}

/// 常见拉丁重音字符折叠（配置名多为法语）。
fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// 展示 id：`tank-NN` 或 `<facility>-tank-NN`。
fn format_tank_id(facility_id: &str, base: u64) -> String {
    if facility_id == "default" {
        format!("tank-{base:02}")
    } else {
        format!("{facility_id}-tank-{base:02}")
    }
}

fn parse_config_snapshot(payload: &[u8]) -> Result<Vec<FacilityConfig>, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
    let value: Value =
        serde_json::from_str(text).map_err(|err| DecodeError::InvalidConfig(err.to_string()))?;
    let entries = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut facilities = Vec::new();
    for entry in entries {
        // 非对象成员跳过，不视为致命错误
        let Some(object) = entry.as_object() else {
            continue;
        };
        let name = object
            .get("facilityName")
            .and_then(Value::as_str)
            .unwrap_or("default");
        let facility_id = normalize_facility_id(name);
        let raw_tanks = object
            .get("tanks")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut tanks = Vec::new();
        for (position, raw) in raw_tanks.iter().enumerate() {
            let Some(tank) = raw.as_object() else {
                continue;
            };
            let local_id = tank.get("localId").and_then(Value::as_u64);
            let local_index = tank.get("localIndex").and_then(Value::as_u64);
            let index = local_index.or(local_id).unwrap_or(position as u64);
            let base = local_id.or(local_index).unwrap_or(position as u64 + 1);
            let display_name = tank
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Cuve {}", position + 1));
            tanks.push(TankSlot {
                id: format_tank_id(&facility_id, base),
                index: index as u32,
                display_name,
                order: local_id.unwrap_or(position as u64) as u32,
            });
        }

        facilities.push(FacilityConfig {
            id: facility_id,
            name: name.to_string(),
            tanks,
        });
    }
    Ok(facilities)
}

fn decode_mode_topic(topic: &str, payload: &[u8]) -> Option<Decoded> {
    if !topic.starts_with("global/prod/") || !topic.ends_with("/mode") {
        return None;
    }
    let segments: Vec<&str> = topic.split('/').collect();
    let facility_name = segments.get(2)?;
    if facility_name.is_empty() {
        return Some(Decoded::Unrecognized);
    }
    let text = std::str::from_utf8(payload).ok()?;
    // 无法识别的取值按 no-op 丢弃
    match GeneralMode::parse(text) {
        Some(mode) => Some(Decoded::ModeChange {
            facility_id: normalize_facility_id(facility_name),
            mode,
        }),
        None => Some(Decoded::Unrecognized),
    }
}

fn decode_tank_topic(topic: &str, payload: &[u8]) -> Option<Decoded> {
    let rest = topic.strip_prefix("tank/")?;
    let mut segments = rest.split('/');
    let index: u32 = segments.next()?.parse().ok()?;
    let field = segments.next()?;
    if segments.next().is_some() {
        // tank/<ix>/set/... 是命令方向，不在订阅解码范围内
        return Some(Decoded::Unrecognized);
    }
    let text = std::str::from_utf8(payload).ok()?.trim();

    let mut update = TankUpdate::default();
    match field {
        "temp" => match text.parse::<f64>() {
            Ok(value) => update.temperature = Some(value),
            Err(_) => return Some(Decoded::Unrecognized),
        },
        "setpoint" => match text.parse::<f64>() {
            Ok(value) => update.setpoint = Some(value),
            Err(_) => return Some(Decoded::Unrecognized),
        },
        "state" => {
            let state = text.to_ascii_uppercase();
            let status = match state.as_str() {
                "COLD" => TankStatus::Cooling,
                "HOT" => TankStatus::Heating,
                "WAIT" | "STOP" => TankStatus::Idle,
                _ => return Some(Decoded::Unrecognized),
            };
            update.status = Some(status);
            update.is_running = Some(matches!(state.as_str(), "COLD" | "HOT"));
        }
        "contents" => {
            if text.is_empty() {
                return Some(Decoded::Unrecognized);
            }
            update.contents_grape = Some(text.to_string());
        }
        _ => return Some(Decoded::Unrecognized),
    }
    Some(Decoded::TankField { index, update })
}

/// 遗留格式兜底：JSON 载荷自带 index/id，topic 第二段作最后手段。
fn decode_legacy(topic: &str, payload: &[u8]) -> Decoded {
    let Ok(text) = std::str::from_utf8(payload) else {
        return Decoded::Unrecognized;
    };
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Decoded::Unrecognized;
    };
    let Some(object) = value.as_object() else {
        return Decoded::Unrecognized;
    };

    let index = object
        .get("index")
        .and_then(Value::as_u64)
        .or_else(|| object.get("id").and_then(Value::as_u64))
        .or_else(|| topic.split('/').nth(1).and_then(|s| s.parse().ok()));
    let Some(index) = index else {
        return Decoded::Unrecognized;
    };

    let update = TankUpdate {
        temperature: object.get("temperature").and_then(Value::as_f64),
        setpoint: object.get("setpoint").and_then(Value::as_f64),
        is_running: object.get("isRunning").and_then(Value::as_bool),
        ..Default::default()
    };
    if update.is_empty() {
        return Decoded::Unrecognized;
    }
    Decoded::TankField {
        index: index as u32,
        update,
    }
}
