use api_contract::{PushMessageDto, TankDto};

fn tank_dto(index: u32) -> TankDto {
    TankDto {
        index,
        id: format!("tank-{index:02}"),
        name: format!("Cuve {index}"),
        status: "idle".to_string(),
        temperature: None,
        setpoint: None,
        capacity_liters: 0.0,
        fill_level_percent: 0.0,
        contents: None,
        is_running: false,
        last_updated_at_ms: 0,
        history: Vec::new(),
        alarms: Vec::new(),
        facility_id: Some("default".to_string()),
        is_deleted: false,
    }
}

#[test]
fn tank_dto_serializes_camel_case_with_null_sentinels() {
    let value = serde_json::to_value(tank_dto(101)).expect("serialize");
    assert_eq!(value["index"], 101);
    assert!(value["temperature"].is_null());
    assert!(value["setpoint"].is_null());
    assert!(value.get("lastUpdatedAtMs").is_some());
    assert!(value.get("last_updated_at_ms").is_none());
}

#[test]
fn push_message_carries_type_tag() {
    let message = PushMessageDto::TanksUpdate {
        tank: tank_dto(101),
        source: "mock".to_string(),
    };
    let value = serde_json::to_value(message).expect("serialize");
    assert_eq!(value["type"], "tanks:update");
    assert_eq!(value["source"], "mock");

    let init = PushMessageDto::TanksInit { tanks: vec![] };
    let value = serde_json::to_value(init).expect("serialize");
    assert_eq!(value["type"], "tanks:init");
}
