use cuverie_gateway::{CONFIG_TOPIC, Decoded, TankUpdate, decode, normalize_facility_id};
use domain::{GeneralMode, TankStatus};

#[test]
fn config_snapshot_array_is_decoded() {
    let payload = br#"[
        {
            "facilityName": "Chai Nord",
            "tanks": [
                { "localId": 1, "localIndex": 101, "name": "Cuve 01" },
                { "localId": 2, "localIndex": 102, "name": "Cuve 02" }
            ]
        }
    ]"#;
    let decoded = decode(CONFIG_TOPIC, payload).expect("decode");
    let Decoded::ConfigSnapshot(facilities) = decoded else {
        panic!("expected config snapshot");
    };
    assert_eq!(facilities.len(), 1);
    let facility = &facilities[0];
    assert_eq!(facility.id, "chai-nord");
    assert_eq!(facility.name, "Chai Nord");
    assert_eq!(facility.tanks.len(), 2);
    assert_eq!(facility.tanks[0].index, 101);
    assert_eq!(facility.tanks[0].id, "chai-nord-tank-01");
    assert_eq!(facility.tanks[0].display_name, "Cuve 01");
}

#[test]
fn config_snapshot_single_object_and_defaults() {
    // 单对象载荷、缺省 facilityName、缺省 index 回落到数组位置
    let payload = br#"{ "tanks": [ { "name": "Cuve A" }, { "localIndex": 7 } ] }"#;
    let Decoded::ConfigSnapshot(facilities) = decode(CONFIG_TOPIC, payload).expect("decode")
    else {
        panic!("expected config snapshot");
    };
    let facility = &facilities[0];
    assert_eq!(facility.id, "default");
    assert_eq!(facility.tanks[0].index, 0);
    assert_eq!(facility.tanks[0].id, "tank-01");
    assert_eq!(facility.tanks[1].index, 7);
    assert_eq!(facility.tanks[1].display_name, "Cuve 2");
}

#[test]
fn config_snapshot_skips_malformed_entries() {
    let payload = br#"[ 42, "noise", { "facilityName": "Sud", "tanks": [null, { "localIndex": 5 }] } ]"#;
    let Decoded::ConfigSnapshot(facilities) = decode(CONFIG_TOPIC, payload).expect("decode")
    else {
        panic!("expected config snapshot");
    };
    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].tanks.len(), 1);
    assert_eq!(facilities[0].tanks[0].index, 5);
}

#[test]
fn config_snapshot_empty_array_is_valid() {
    let Decoded::ConfigSnapshot(facilities) = decode(CONFIG_TOPIC, b"[]").expect("decode") else {
        panic!("expected config snapshot");
    };
    assert!(facilities.is_empty());
}

#[test]
fn config_snapshot_bad_json_is_an_error() {
    assert!(decode(CONFIG_TOPIC, b"{ not json").is_err());
}

#[test]
fn facility_name_normalization() {
    assert_eq!(normalize_facility_id("Chai Nord"), "chai-nord");
    assert_eq!(normalize_facility_id("Cuvée d'été"), "cuvee-dete");
    assert_eq!(normalize_facility_id(""), "default");
    assert_eq!(normalize_facility_id("  "), "default");
    assert_eq!(normalize_facility_id("Default"), "default");
    assert_eq!(normalize_facility_id("A  B"), "a-b");
}

#[test]
fn mode_topic_is_decoded_case_insensitively() {
    let decoded = decode("global/prod/Chai Nord/mode", b"heat").expect("decode");
    assert_eq!(
        decoded,
        Decoded::ModeChange {
            facility_id: "chai-nord".to_string(),
            mode: GeneralMode::Heat,
        }
    );
}

#[test]
fn mode_topic_unknown_value_is_noop() {
    let decoded = decode("global/prod/default/mode", b"FROID").expect("decode");
    assert_eq!(decoded, Decoded::Unrecognized);
}

#[test]
fn tank_temp_topic_is_decoded() {
    let decoded = decode("tank/101/temp", b"18.4").expect("decode");
    assert_eq!(
        decoded,
        Decoded::TankField {
            index: 101,
            update: TankUpdate {
                temperature: Some(18.4),
                ..TankUpdate::default()
            },
        }
    );
}

#[test]
fn tank_temp_non_numeric_is_ignored() {
    assert_eq!(
        decode("tank/101/temp", b"warm").expect("decode"),
        Decoded::Unrecognized
    );
}

#[test]
fn tank_state_topic_maps_fixed_table() {
    let cases = [
        ("COLD", TankStatus::Cooling, true),
        ("hot", TankStatus::Heating, true),
        ("WAIT", TankStatus::Idle, false),
        ("STOP", TankStatus::Idle, false),
    ];
    for (wire, status, running) in cases {
        let decoded = decode("tank/101/state", wire.as_bytes()).expect("decode");
        assert_eq!(
            decoded,
            Decoded::TankField {
                index: 101,
                update: TankUpdate {
                    status: Some(status),
                    is_running: Some(running),
                    ..TankUpdate::default()
                },
            }
        );
    }
    // 表外取值忽略
    assert_eq!(
        decode("tank/101/state", b"MELTING").expect("decode"),
        Decoded::Unrecognized
    );
}

#[test]
fn tank_contents_topic_carries_primary_descriptor() {
    let decoded = decode("tank/101/contents", b"Chardonnay").expect("decode");
    assert_eq!(
        decoded,
        Decoded::TankField {
            index: 101,
            update: TankUpdate {
                contents_grape: Some("Chardonnay".to_string()),
                ..TankUpdate::default()
            },
        }
    );
}

#[test]
fn unknown_topics_are_unrecognized_not_errors() {
    assert_eq!(
        decode("some/other/topic", b"payload").expect("decode"),
        Decoded::Unrecognized
    );
    assert_eq!(
        decode("tank/abc/temp", b"18").expect("decode"),
        Decoded::Unrecognized
    );
    // 命令方向的 set topic 不属于入站解码
    assert_eq!(
        decode("tank/101/set/setpoint", b"18").expect("decode"),
        Decoded::Unrecognized
    );
}

#[test]
fn legacy_json_payload_resolves_index() {
    let decoded = decode("fleet/telemetry", br#"{"index":101,"temperature":19.2}"#)
        .expect("decode");
    assert_eq!(
        decoded,
        Decoded::TankField {
            index: 101,
            update: TankUpdate {
                temperature: Some(19.2),
                ..TankUpdate::default()
            },
        }
    );

    // topic 段作为最后手段的 index 来源
    let decoded = decode("fleet/102/telemetry", br#"{"setpoint":17.0}"#).expect("decode");
    assert_eq!(
        decoded,
        Decoded::TankField {
            index: 102,
            update: TankUpdate {
                setpoint: Some(17.0),
                ..TankUpdate::default()
            },
        }
    );
}
