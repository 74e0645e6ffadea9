//! Path resolution for config references.
//!
//! Every location that takes part in inheritance is canonicalized so it can
//! be compared exactly during cycle detection.

use std::path::{Component, Path, PathBuf};

/// Resolve a config reference to a canonical path.
///
/// Rules, in order:
/// 1. Absolute references are used as-is.
/// 2. With an `anchor` (the referring document), the reference is relative
///    to the anchor's directory.
/// 3. Without an anchor, try the working directory, then `base_dir`, and
///    if neither exists fall back to the working directory so the later
///    read reports the missing file.
pub fn resolve_reference(reference: &Path, anchor: Option<&Path>, base_dir: &Path) -> PathBuf {
    if reference.is_absolute() {
        return canonicalize(reference);
    }

    if let Some(anchor) = anchor {
        let dir = anchor.parent().unwrap_or_else(|| Path::new(""));
        return canonicalize(&dir.join(reference));
    }

    let cwd_candidate = absolutize(reference);
    if cwd_candidate.exists() {
        return canonicalize(&cwd_candidate);
    }
    let base_candidate = base_dir.join(reference);
    if base_candidate.exists() {
        return canonicalize(&base_candidate);
    }
    canonicalize(&cwd_candidate)
}

/// Canonicalize a path that may not exist.
///
/// Existing paths resolve through the filesystem (symlinks included).
/// Missing paths are made absolute, normalized lexically, and rebuilt on
/// top of their deepest existing ancestor. Never fails.
pub fn canonicalize(path: &Path) -> PathBuf {
    if let Ok(real) = std::fs::canonicalize(path) {
        return real;
    }

    let normalized = normalize_lexically(&absolutize(path));
    let mut tail = Vec::new();
    let mut current = normalized.as_path();
    while let (Some(parent), Some(name)) = (current.parent(), current.file_name()) {
        tail.push(name);
        if let Ok(real) = std::fs::canonicalize(parent) {
            return tail.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        current = parent;
    }
    normalized
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
