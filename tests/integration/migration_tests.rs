//! End-to-end configuration migration over a real (temporary) filesystem.

use std::fs;

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use ledlink::migrate::{MigrationOutcome, Migrator};

fn diff_of(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

/// The shipped template applied to a previous-generation document: list
/// brokers gain the new flag, existing values survive, version advances,
/// and exactly one backup generation is left behind.
#[test]
fn boot_migration_upgrades_previous_generation_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let stored = json!({
        "Version": "6.2",
        "Wifi-config": { "SSID": "home", "PW": "secret", "country": "AT" },
        "MQTT-config": [
            { "broker": "10.0.0.2", "port": 1883 },
            { "broker": "10.0.0.3", "port": 1883, "publish_in_json": true },
        ],
    });
    fs::write(&path, serde_json::to_vec(&stored).unwrap()).unwrap();

    let migrator = Migrator::new(&path, ledlink::config::schema_diff())
        .with_target_version(ledlink::config::TARGET_SCHEMA_VERSION);
    assert_eq!(migrator.run().unwrap(), MigrationOutcome::Migrated);

    let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["Version"], json!(ledlink::config::TARGET_SCHEMA_VERSION));
    // Existing values untouched, including the broker that already had the
    // new flag set to a non-default value.
    assert_eq!(doc["Wifi-config"]["SSID"], json!("home"));
    assert_eq!(doc["Wifi-config"]["country"], json!("AT"));
    assert_eq!(doc["MQTT-config"][0]["publish_in_json"], json!(false));
    assert_eq!(doc["MQTT-config"][1]["publish_in_json"], json!(true));
    // New sections materialised.
    assert_eq!(doc["Wifi-config"]["Hostname"], json!("ledlink"));
    assert_eq!(doc["LightControl_settings"]["autostart"], json!(true));

    // One backup generation holds the pre-migration document; no temp file.
    let bak: Value =
        serde_json::from_slice(&fs::read(dir.path().join("config.json.bak")).unwrap()).unwrap();
    assert_eq!(bak, stored);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn second_boot_is_gated_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, b"{}").unwrap();

    let migrator = Migrator::new(&path, ledlink::config::schema_diff())
        .with_target_version(ledlink::config::TARGET_SCHEMA_VERSION);
    assert_eq!(migrator.run().unwrap(), MigrationOutcome::Migrated);

    let after_first = fs::read(&path).unwrap();
    fs::remove_file(dir.path().join("config.json.bak")).unwrap();

    assert_eq!(migrator.run().unwrap(), MigrationOutcome::UpToDate);
    assert_eq!(fs::read(&path).unwrap(), after_first);
    assert!(!dir.path().join("config.json.bak").exists());
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn corrupt_config_is_rebuilt_from_template_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, b"\xff\xfe garbage").unwrap();

    let migrator = Migrator::new(&path, diff_of(json!({ "Wifi-config": { "SSID": "default" } })))
        .with_target_version("6.4");
    assert_eq!(migrator.run().unwrap(), MigrationOutcome::Migrated);

    let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["Wifi-config"]["SSID"], json!("default"));
    assert_eq!(doc["Version"], json!("6.4"));
}

#[test]
fn migration_survives_interrupted_commit_via_restore() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    // A crash between backup rotation and the final rename leaves the old
    // generation in .bak and a complete new document in .tmp.
    fs::write(dir.path().join("config.json.bak"), br#"{"Version":"6.2"}"#).unwrap();
    fs::write(dir.path().join("config.json.tmp"), br#"{"Version":"6.4"}"#).unwrap();

    ledlink::storage::restore(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), br#"{"Version":"6.2"}"#.as_slice());

    // The next boot migrates the restored document forward again.
    let migrator = Migrator::new(&path, diff_of(json!({ "a": 1 })))
        .with_target_version("6.4");
    assert_eq!(migrator.run().unwrap(), MigrationOutcome::Migrated);
    let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["Version"], json!("6.4"));
}
