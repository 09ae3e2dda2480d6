use domain::{FacilityConfig, GeneralMode, Tank, TankSlot, configured_indices};

fn slot(index: u32) -> TankSlot {
    TankSlot {
        id: format!("tank-{index:02}"),
        index,
        display_name: format!("Cuve {index}"),
        order: index,
    }
}

#[test]
fn visible_requires_configuration_and_not_deleted() {
    let facilities = vec![FacilityConfig {
        id: "default".to_string(),
        name: "Default".to_string(),
        tanks: vec![slot(101), slot(102)],
    }];
    let configured = configured_indices(&facilities);

    let tank = Tank::from_slot("default", &slot(101), 0);
    assert!(tank.is_visible(&configured));

    let mut deleted = Tank::from_slot("default", &slot(102), 0);
    deleted.is_deleted = true;
    assert!(!deleted.is_visible(&configured));

    // 已知但不在当前配置集合中的储罐不可见
    let stray = Tank::from_slot("default", &slot(999), 0);
    assert!(!stray.is_visible(&configured));
}

#[test]
fn empty_configuration_hides_everything() {
    let configured = configured_indices(&[]);
    let tank = Tank::from_slot("default", &slot(101), 0);
    assert!(!tank.is_visible(&configured));
}

#[test]
fn general_mode_parse_is_case_insensitive() {
    assert_eq!(GeneralMode::parse("heat"), Some(GeneralMode::Heat));
    assert_eq!(GeneralMode::parse(" COOL "), Some(GeneralMode::Cool));
    assert_eq!(GeneralMode::parse("Stop"), Some(GeneralMode::Stop));
    assert_eq!(GeneralMode::parse("ARRET"), None);
}
