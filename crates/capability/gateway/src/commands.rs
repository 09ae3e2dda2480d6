//! 出站命令编码
//!
//! 领域命令 → (topic, 线路编码) 的纯映射：
//! - 设定点：`tank/<ix>/set/setpoint`，裸十进制字符串（18.0 → "18"）
//! - 启停：`tank/<ix>/set/running`，字面量 "true" / "false"
//! - 内容物：`tank/<ix>/set/contents`，仅主描述符（设备只认 grape，
//!   年份/体积/备注只在本地保存，不上线路）
//! - 酒库模式：`global/prod/<facilityName>/mode`，裸枚举名

use domain::GeneralMode;

/// 单罐出站命令。
#[derive(Debug, Clone, PartialEq)]
pub enum TankCommand {
    Setpoint(f64),
    Running(bool),
    Contents(String),
}

/// 编码单罐命令。
pub fn encode_tank_command(index: u32, command: &TankCommand) -> (String, String) {
    match command {
        TankCommand::Setpoint(value) => {
            (format!("tank/{index}/set/setpoint"), value.to_string())
        }
        TankCommand::Running(value) => {
            (format!("tank/{index}/set/running"), value.to_string())
        }
        TankCommand::Contents(grape) => {
            (format!("tank/{index}/set/contents"), grape.clone())
        }
    }
}

/// 编码酒库总体模式命令。
///
/// 注意 topic 使用酒库原始名（设备侧订阅的是名字，不是 slug id）。
pub fn encode_general_mode(facility_name: &str, mode: GeneralMode) -> (String, String) {
    (
        format!("global/prod/{facility_name}/mode"),
        mode.as_str().to_string(),
    )
}
