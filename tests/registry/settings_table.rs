use tcp_h2_describe::registry::Registry;
use tcp_h2_describe::RegistryError;

#[test]
fn builtin_standard_settings_are_named() {
    let registry = Registry::new();
    assert_eq!(registry.setting_name(0x1), "SETTINGS_HEADER_TABLE_SIZE");
    assert_eq!(registry.setting_name(0x8), "SETTINGS_ENABLE_CONNECT_PROTOCOL");
}

#[test]
fn unregistered_id_is_unknown() {
    let registry = Registry::new();
    assert_eq!(registry.setting_name(0xfe03), "UNKNOWN");
}

#[test]
fn grpc_style_extension_setting_can_be_registered_and_looked_up() {
    let registry = Registry::new();
    registry.register_setting(0xfe03, "GRPC_ALLOW_TRUE_BINARY_METADATA").unwrap();
    assert_eq!(registry.setting_name(0xfe03), "GRPC_ALLOW_TRUE_BINARY_METADATA");
}

#[test]
fn duplicate_registration_is_rejected() {
    let registry = Registry::new();
    let err = registry.register_setting(0x1, "ANYTHING").unwrap_err();
    assert!(matches!(err, RegistryError::SettingAlreadyRegistered(0x1)));
}

#[test]
fn locked_registry_rejects_further_registration() {
    let registry = Registry::new();
    registry.lock();
    let err = registry.register_setting(0xfe03, "ANYTHING").unwrap_err();
    assert!(matches!(err, RegistryError::Locked));
}

#[test]
fn clones_share_the_same_underlying_table() {
    let registry = Registry::new();
    let clone = registry.clone();
    clone.register_setting(0xfe03, "GRPC_ALLOW_TRUE_BINARY_METADATA").unwrap();
    assert_eq!(registry.setting_name(0xfe03), "GRPC_ALLOW_TRUE_BINARY_METADATA");
}
