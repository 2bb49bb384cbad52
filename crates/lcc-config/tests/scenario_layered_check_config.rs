//! Layered check:data config: merge order, hashing and the unused-key guard.

use lcc_config::{load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy};

const BASE_YAML: &str = r#"
online_url: "http://localhost:8080"
network:
  blockchain: "Bitcoin"
  network: "Testnet3"
data:
  balance_tracking_disabled: false
  reconciliation_disabled: false
  results_output_file: "results/check_data.json"
"#;

const BASE_YAML_REORDERED: &str = r#"
data:
  results_output_file: "results/check_data.json"
  reconciliation_disabled: false
  balance_tracking_disabled: false
network:
  network: "Testnet3"
  blockchain: "Bitcoin"
online_url: "http://localhost:8080"
"#;

const OVERLAY_YAML: &str = r#"
data:
  reconciliation_disabled: true
  ignore_reconciliation_error: true
"#;

#[test]
fn overlay_flags_reach_typed_config() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let cfg = loaded.check_config().unwrap();

    assert_eq!(cfg.network.blockchain, "Bitcoin");
    assert_eq!(cfg.network.network, "Testnet3");
    assert!(!cfg.data.balance_tracking_disabled);
    assert!(cfg.data.reconciliation_disabled);
    assert!(cfg.data.ignore_reconciliation_error);
    assert_eq!(cfg.data.results_output_file, "results/check_data.json");
}

#[test]
fn hash_ignores_key_order_but_tracks_values() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    let c = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_ne!(a.config_hash, c.config_hash);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn wrong_type_is_rejected_by_typed_config() {
    let loaded =
        load_layered_yaml_from_strings(&["data:\n  reconciliation_disabled: \"maybe\"\n"]).unwrap();
    assert!(loaded.check_config().is_err());
}

#[test]
fn misspelled_key_is_reported_as_unused() {
    let yaml = r#"
data:
  reconcilliation_disabled: true
  results_output_file: "out.json"
"#;
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/data/reconcilliation_disabled".to_string()]
    );

    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap_err();
    assert!(err.to_string().contains("CONFIG_UNUSED_KEYS"));
}

#[test]
fn fully_consumed_config_is_clean() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
}
