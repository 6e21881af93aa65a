use super::*;

#[test]
fn unknown_names_are_unset() {
    assert_eq!(build_env("HOME"), None);
}

#[test]
fn loaded_config_is_normalized() {
    let config = load();
    assert!(config.api_base_url.ends_with('/'));
    assert!(!config.realtime_url.ends_with('/'));
}
