//! Schema-diff engine.
//!
//! Merges a diff template into a live configuration document in place,
//! adding only what is missing. The template mirrors the nesting shape of
//! the document; the literal key `"*"` applies its nested template to every
//! mapping element of a sequence target.
//!
//! The merge is strictly additive. The one permitted overwrite is
//! initialising a missing nested container: a scalar cannot host nested
//! fields, so it is replaced by an empty mapping before descending.
//!
//! Pure tree surgery — no I/O, the template is never mutated.

use log::warn;

use serde_json::{Map, Value};

/// Template key that fans out over every element of a sequence target.
pub const WILDCARD_KEY: &str = "*";

/// Apply `diff` to `target`, returning `true` iff any field was added or any
/// container initialised anywhere in the subtree.
///
/// Schema-authoring mistakes (wildcard against a non-sequence, descending
/// into a non-mapping) are logged and skipped; the rest of the walk
/// continues.
pub fn apply_diff(target: &mut Value, diff: &Map<String, Value>) -> bool {
    let mut changed = false;

    for (key, template) in diff {
        if key == WILDCARD_KEY {
            let Some(item_template) = template.as_object() else {
                warn!("DIFF | wildcard template must be a mapping, skipping");
                continue;
            };
            match target {
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        if item.is_object() {
                            changed |= apply_diff(item, item_template);
                        }
                    }
                }
                _ => warn!("DIFF | wildcard '*' only applies to sequence targets, skipping"),
            }
        } else if let Value::Object(nested) = template {
            let Value::Object(map) = target else {
                warn!("DIFF | cannot add '{key}' to a non-mapping target, skipping");
                continue;
            };
            // A present mapping or sequence is descended into as-is; anything
            // else (absent, scalar placeholder) becomes an empty mapping.
            let needs_init = !matches!(
                map.get(key),
                Some(Value::Object(_)) | Some(Value::Array(_))
            );
            if needs_init {
                map.insert(key.clone(), Value::Object(Map::new()));
                changed = true;
            }
            if let Some(child) = map.get_mut(key) {
                changed |= apply_diff(child, nested);
            }
        } else {
            let Value::Object(map) = target else {
                warn!("DIFF | cannot add '{key}' to a non-mapping target, skipping");
                continue;
            };
            if !map.contains_key(key) {
                map.insert(key.clone(), template.clone());
                changed = true;
            }
        }
    }

    changed
}

// ── Tests ─────────────────────────────────────────────────────
