//! Reading config documents from disk.
//!
//! `.json` files are parsed as JSON; everything else as YAML.

use crate::error::{ConfigError, Result};
use crate::tree::{ConfigMap, ConfigTree};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

/// Read a config document and return its top-level mapping.
///
/// Blank files and documents that parse to `null` yield an empty mapping.
pub fn read_document(path: &Path) -> Result<ConfigMap> {
    let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_document(&raw, path)
}

/// Parse document text. `path` picks the format and labels errors.
///
/// YAML merge keys (`<<: *anchor`) are expanded before conversion. The
/// tree is JSON-shaped, so the YAML floats `.inf`, `-.inf` and `.nan`
/// have no representation and load as `null`.
pub fn parse_document(raw: &str, path: &Path) -> Result<ConfigMap> {
    if raw.trim().is_empty() {
        return Ok(ConfigMap::new());
    }

    let tree: ConfigTree = if is_json(path) {
        serde_json::from_str(raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_yaml(raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    match tree {
        Value::Null => Ok(ConfigMap::new()),
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

fn parse_yaml(raw: &str) -> std::result::Result<ConfigTree, serde_yaml::Error> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(raw)?;
    value.apply_merge()?;
    serde_yaml::from_value(value)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_yaml_mapping() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("c.yaml");
        std::fs::write(&path, "agent:\n  tools:\n    bundles: [a, b]\n").unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(Value::Object(doc), json!({"agent": {"tools": {"bundles": ["a", "b"]}}}));
    }

    #[test]
    fn test_read_json_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("c.json");
        std::fs::write(&path, r#"{"a": {"b": [1, 2]}}"#).unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(Value::Object(doc), json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn test_blank_and_null_documents_are_empty() {
        let path = Path::new("blank.yaml");
        assert!(parse_document("", path).unwrap().is_empty());
        assert!(parse_document("  \n\t\n", path).unwrap().is_empty());
        assert!(parse_document("~\n", path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yaml");
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_non_mapping_top_level() {
        let path = Path::new("list.yaml");
        assert!(matches!(
            parse_document("- a\n- b\n", path).unwrap_err(),
            ConfigError::NotAMapping { .. }
        ));
        assert!(matches!(
            parse_document("just a string", path).unwrap_err(),
            ConfigError::NotAMapping { .. }
        ));
        assert!(matches!(
            parse_document("[1, 2, 3]", Path::new("list.json")).unwrap_err(),
            ConfigError::NotAMapping { .. }
        ));
    }

    #[test]
    fn test_invalid_yaml_errors() {
        let err = parse_document("a: [unclosed", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("Invalid YAML"));
    }

    #[test]
    fn test_invalid_json_errors() {
        let err = parse_document("not valid json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_yaml_key_order_is_preserved() {
        let doc = parse_document("z: 1\na: 2\nm: 3\n", Path::new("o.yaml")).unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_yaml_merge_keys_are_expanded() {
        let raw = "d: &d\n  a: 1\ne:\n  <<: *d\n  b: 2\n";
        let doc = parse_document(raw, Path::new("anchors.yaml")).unwrap();
        assert_eq!(
            Value::Object(doc),
            json!({"d": {"a": 1}, "e": {"a": 1, "b": 2}})
        );
    }

    #[test]
    fn test_yaml_merge_key_local_value_wins() {
        let raw = "base: &base\n  model: small\n  temperature: 0.5\nagent:\n  <<: *base\n  model: large\n";
        let doc = parse_document(raw, Path::new("anchors.yaml")).unwrap();
        assert_eq!(doc["agent"], json!({"model": "large", "temperature": 0.5}));
    }

    #[test]
    fn test_invalid_merge_key_errors() {
        let err = parse_document("e:\n  <<: 3\n", Path::new("bad_merge.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_non_finite_yaml_floats_load_as_null() {
        let doc = parse_document("t: .inf\nu: -.inf\nv: .nan\n", Path::new("f.yaml")).unwrap();
        assert_eq!(Value::Object(doc), json!({"t": null, "u": null, "v": null}));
    }
}
