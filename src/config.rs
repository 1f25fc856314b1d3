//! Device configuration identity.
//!
//! Central place for the on-disk paths, the well-known version key, the
//! schema version this firmware release expects, and the schema-diff
//! template that brings an older `config.json` up to that shape.
//!
//! The configuration document itself is a dynamic JSON tree (see
//! [`migrate`](crate::migrate)); this module only pins down the identity of
//! the current release.

use serde_json::{json, Map, Value};

/// Persisted configuration document on the data partition.
pub const CONFIG_PATH: &str = "/params/config.json";

/// Directory holding the replaceable runtime modules.
pub const MODULE_DIR: &str = "/app";

/// Entry-point module of the scripting runtime. Replacing this one forces a
/// device restart; any other module is hot-swapped.
pub const ENTRY_MODULE: &str = "main.py";

/// Key inside the configuration document that carries the schema version.
pub const VERSION_KEY: &str = "Version";

/// Schema version this firmware release migrates the document to.
pub const TARGET_SCHEMA_VERSION: &str = "6.4";

/// Schema-diff template for the current release.
///
/// Strictly additive: only fields missing from the stored document are
/// created. The `"*"` key applies its nested template to every broker entry
/// in the `MQTT-config` list.
pub fn schema_diff() -> Map<String, Value> {
    let template = json!({
        "Wifi-config": {
            "country": "DE",
            "Hostname": "ledlink",
        },
        "MQTT-config": {
            "*": {
                "publish_in_json": false,
            },
        },
        "LightControl_settings": {
            "autostart": true,
            "bytes_per_pixel": 3,
        },
    });
    match template {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
