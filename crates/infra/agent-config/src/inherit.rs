//! Resolution of `extends` chains.
//!
//! A document's parents are resolved depth-first, folded left to right
//! (later parents win), and the document's own keys are merged on top.
//! The [`ResolutionStack`] holds the documents currently being resolved on
//! the active path; meeting one of them again is a cycle.

use crate::error::{ConfigError, Result, value_kind};
use crate::merge::merge_maps;
use crate::paths::{canonicalize, resolve_reference};
use crate::store::read_document;
use crate::tree::{ConfigMap, split_extends};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Canonical paths of the documents on the current resolution path.
///
/// Owned by a single top-level load and unwound as recursion returns, so
/// independent loads never share one.
#[derive(Debug, Default)]
pub struct ResolutionStack {
    active: Vec<PathBuf>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `path`, failing if it is already being resolved.
    pub fn enter(&mut self, path: &Path) -> Result<()> {
        if self.contains(path) {
            return Err(ConfigError::CircularInheritance {
                path: path.to_path_buf(),
            });
        }
        self.active.push(path.to_path_buf());
        Ok(())
    }

    pub fn leave(&mut self, path: &Path) {
        if let Some(pos) = self.active.iter().rposition(|p| p == path) {
            self.active.remove(pos);
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.active.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Where the document at a location comes from.
enum Source<'a> {
    File,
    InMemory(&'a ConfigMap),
}

/// Resolves `extends` chains relative to a base directory.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    base_dir: &'a Path,
}

impl<'a> Resolver<'a> {
    pub fn new(base_dir: &'a Path) -> Self {
        Self { base_dir }
    }

    /// Load the document at `path` and resolve its full ancestry.
    pub fn resolve_file(&self, path: &Path, stack: &mut ResolutionStack) -> Result<ConfigMap> {
        self.resolve_at(&canonicalize(path), Source::File, stack)
    }

    /// Resolve an in-memory document as if it were stored at `location`.
    ///
    /// `location` need not exist; it anchors relative `extends` entries and
    /// takes part in cycle detection like any file.
    pub fn resolve_document(
        &self,
        document: &ConfigMap,
        location: &Path,
        stack: &mut ResolutionStack,
    ) -> Result<ConfigMap> {
        self.resolve_at(&canonicalize(location), Source::InMemory(document), stack)
    }

    fn resolve_at(
        &self,
        location: &Path,
        source: Source<'_>,
        stack: &mut ResolutionStack,
    ) -> Result<ConfigMap> {
        stack.enter(location)?;
        let resolved = self.resolve_entered(location, source, stack);
        stack.leave(location);
        resolved
    }

    fn resolve_entered(
        &self,
        location: &Path,
        source: Source<'_>,
        stack: &mut ResolutionStack,
    ) -> Result<ConfigMap> {
        debug!(path = %location.display(), depth = stack.len(), "resolving config");
        let (extends, local) = match source {
            Source::File => split_extends(&read_document(location)?),
            Source::InMemory(document) => split_extends(document),
        };
        let Some(extends) = extends else {
            return Ok(local);
        };

        let mut merged = ConfigMap::new();
        for reference in parent_references(&extends, location)? {
            let parent_path = resolve_reference(Path::new(reference), Some(location), self.base_dir);
            debug!(
                child = %location.display(),
                parent = %parent_path.display(),
                "resolved parent config"
            );
            let parent = self.resolve_file(&parent_path, stack)?;
            merged = merge_maps(&merged, &parent);
        }
        trace!(path = %location.display(), "merging local config over parents");
        Ok(merge_maps(&merged, &local))
    }
}

/// Normalize an `extends` value into its list of references.
fn parent_references<'v>(extends: &'v Value, location: &Path) -> Result<Vec<&'v str>> {
    match extends {
        Value::String(reference) => Ok(vec![reference.as_str()]),
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.as_str().ok_or_else(|| ConfigError::InvalidExtendsEntry {
                    path: location.to_path_buf(),
                    index,
                })
            })
            .collect(),
        other => Err(ConfigError::InvalidExtendsValue {
            path: location.to_path_buf(),
            found: value_kind(other),
        }),
    }
}
