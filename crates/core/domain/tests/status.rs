use domain::{AisleMode, DeclaredStatus, EffectiveStatus};

#[test]
fn only_online_is_controllable() {
    assert!(EffectiveStatus::Online.is_controllable());
    for status in [
        EffectiveStatus::Offline,
        EffectiveStatus::Stale,
        EffectiveStatus::Fault,
        EffectiveStatus::Maintenance,
    ] {
        assert!(!status.is_controllable(), "{status} must not be controllable");
    }
}

#[test]
fn declared_status_uses_lowercase_wire_names() {
    let json = serde_json::to_string(&DeclaredStatus::Maintenance).expect("serialize");
    assert_eq!(json, "\"maintenance\"");
    let status: DeclaredStatus = serde_json::from_str("\"fault\"").expect("deserialize");
    assert_eq!(status, DeclaredStatus::Fault);
    assert!(serde_json::from_str::<DeclaredStatus>("\"rebooting\"").is_err());
}

#[test]
fn aisle_mode_accepts_only_defined_range() {
    assert_eq!(AisleMode::try_from(0).expect("0"), AisleMode::Closed);
    assert_eq!(AisleMode::try_from(1).expect("1"), AisleMode::Open);
    assert_eq!(AisleMode::try_from(2).expect("2"), AisleMode::ClosedLeftFlap);
    assert_eq!(AisleMode::try_from(3).expect("3"), AisleMode::ClosedRightFlap);
    assert!(AisleMode::try_from(4).is_err());
    assert!(AisleMode::try_from(-1).is_err());
}

#[test]
fn aisle_mode_serializes_as_integer() {
    let json = serde_json::to_string(&AisleMode::ClosedLeftFlap).expect("serialize");
    assert_eq!(json, "2");
    let mode: AisleMode = serde_json::from_str("1").expect("deserialize");
    assert_eq!(mode, AisleMode::Open);
    assert!(serde_json::from_str::<AisleMode>("9").is_err());
}
