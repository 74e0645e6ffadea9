//! Deep merge for config trees with `+`-prefixed list appends.
//!
//! Provides override-wins merge semantics for config mappings:
//! - Mappings merge recursively: overlay keys override base keys
//! - Sequences merge via [`merge_lists`] (replace, append, or both)
//! - Scalars and type mismatches take the overlay value
//!
//! Inputs are only ever borrowed, so a parent tree can be merged under any
//! number of children without being disturbed.

use crate::error::{ConfigError, Result, value_kind};
use crate::tree::ConfigMap;
use serde_json::Value;

/// Prefix marking a list item (or a key of a mapping item) as an append.
pub const APPEND_PREFIX: char = '+';

/// Merge `overlay` on top of `base`, returning a new tree.
///
/// Both arguments must be mappings; anything else is an
/// [`ConfigError::InvalidMergeInput`].
///
/// # Examples
/// ```
/// use serde_json::json;
/// use agent_config::merge::deep_merge;
///
/// let base = json!({"a": 1, "b": {"c": 2}, "tags": ["x"]});
/// let overlay = json!({"b": {"d": 3}, "tags": ["+y"]});
/// let merged = deep_merge(&base, &overlay).unwrap();
/// assert_eq!(merged, json!({"a": 1, "b": {"c": 2, "d": 3}, "tags": ["x", "y"]}));
/// ```
pub fn deep_merge(base: &Value, overlay: &Value) -> Result<Value> {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Ok(Value::Object(merge_maps(base_map, overlay_map)))
        }
        _ => Err(ConfigError::InvalidMergeInput {
            base: value_kind(base),
            overlay: value_kind(overlay),
        }),
    }
}

/// Merge two mappings. Keys already in `base` keep their position; keys
/// only in `overlay` are appended in overlay order.
pub fn merge_maps(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();
    for (key, overlay_value) in overlay {
        let value = match (base.get(key), overlay_value) {
            (Some(Value::Object(b)), Value::Object(o)) => Value::Object(merge_maps(b, o)),
            (Some(Value::Array(b)), Value::Array(o)) => Value::Array(merge_lists(b, o)),
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// How an overlay list item participates in a list merge.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// Added after whatever the merged list starts with. Prefix already stripped.
    Append(Value),
    /// Part of the list that replaces the base list.
    Replace(Value),
}

/// Classify one overlay list item.
///
/// A string starting with `+` is an append item with one `+` stripped.
/// A mapping with at least one `+key` is an append item; every `+key`
/// loses its prefix and the other keys are kept as they are.
pub fn classify_item(item: &Value) -> ListItem {
    match item {
        Value::String(s) => match s.strip_prefix(APPEND_PREFIX) {
            Some(rest) => ListItem::Append(Value::String(rest.to_string())),
            None => ListItem::Replace(item.clone()),
        },
        Value::Object(map) if map.keys().any(|k| k.starts_with(APPEND_PREFIX)) => {
            let mut normalized = ConfigMap::new();
            for (key, value) in map {
                let key = key.strip_prefix(APPEND_PREFIX).unwrap_or(key);
                normalized.insert(key.to_string(), value.clone());
            }
            ListItem::Append(Value::Object(normalized))
        }
        _ => ListItem::Replace(item.clone()),
    }
}

/// Merge an overlay list onto a base list.
///
/// 1. If the overlay holds any replacement items, the result starts as
///    exactly those items and `base` is discarded.
/// 2. Otherwise the result starts as a copy of `base`.
/// 3. Append items are then added in overlay order.
///
/// An empty overlay therefore leaves `base` unchanged instead of clearing
/// it. Existing configs rely on this, so it is kept deliberately.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use agent_config::merge::merge_lists;
///
/// let base = vec![json!("a")];
/// assert_eq!(merge_lists(&base, &[json!("x"), json!("+y")]), vec![json!("x"), json!("y")]);
/// assert_eq!(merge_lists(&base, &[]), base);
/// ```
pub fn merge_lists(base: &[Value], overlay: &[Value]) -> Vec<Value> {
    let mut replacements = Vec::new();
    let mut appends = Vec::new();
    for item in overlay {
        match classify_item(item) {
            ListItem::Append(v) => appends.push(v),
            ListItem::Replace(v) => replacements.push(v),
        }
    }

    let mut merged = if replacements.is_empty() {
        base.to_vec()
    } else {
        replacements
    };
    merged.extend(appends);
    merged
}
