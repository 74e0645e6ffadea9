//! Config tree aliases and helpers for the `extends` directive.

use serde_json::{Map, Value};

/// A parsed config document: scalar, sequence, or mapping.
pub type ConfigTree = Value;

/// The mapping case of a [`ConfigTree`]. Keys keep insertion order.
pub type ConfigMap = Map<String, Value>;

/// Reserved top-level key naming the parent documents of a config.
pub const EXTENDS_KEY: &str = "extends";

/// Split the `extends` directive off a document.
///
/// Returns the directive value (if any) and the remaining local tree.
/// Key order of the remaining entries is preserved. An explicit
/// `extends: null` counts as no directive.
pub fn split_extends(document: &ConfigMap) -> (Option<Value>, ConfigMap) {
    let mut local = ConfigMap::new();
    let mut extends = None;
    for (key, value) in document {
        if key == EXTENDS_KEY {
            extends = Some(value.clone()).filter(|v| !v.is_null());
        } else {
            local.insert(key.clone(), value.clone());
        }
    }
    (extends, local)
}
