use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = RelayConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, RelayConfig::default());
    assert_eq!(config.port, 3000);
    assert!(!config.echo);
    assert_eq!(config.client_queue_capacity, 256);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn reads_all_variables() {
    let config = RelayConfig::from_lookup(lookup_from(&[
        ("BIND_ADDR", "127.0.0.1"),
        ("PORT", "8080"),
        ("RELAY_ECHO", "true"),
        ("CLIENT_QUEUE_CAPACITY", "16"),
        ("STATIC_DIR", "./pkg"),
    ]))
    .unwrap();

    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    assert!(config.echo);
    assert_eq!(config.client_queue_capacity, 16);
    assert_eq!(config.static_dir, Some(PathBuf::from("./pkg")));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = RelayConfig::from_lookup(lookup_from(&[("PORT", "  "), ("STATIC_DIR", "")])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(config.static_dir.is_none());
}

#[test]
fn invalid_port_is_rejected() {
    let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".into() });
}

#[test]
fn invalid_echo_is_rejected() {
    let err = RelayConfig::from_lookup(lookup_from(&[("RELAY_ECHO", "yes")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "RELAY_ECHO", .. }));
}

#[test]
fn zero_queue_capacity_is_rejected() {
    let err = RelayConfig::from_lookup(lookup_from(&[("CLIENT_QUEUE_CAPACITY", "0")])).unwrap_err();
    assert_eq!(err, ConfigError::ZeroQueueCapacity);
}
