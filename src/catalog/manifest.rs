//! Patch manifest parsing (manifest.yaml)
//!
//! Manifests are parsed in two stages: first into an untyped YAML tree,
//! then projected into a [`PatchManifest`]. Shape problems in the tree
//! become `ManifestInvalid`, bad field values become `ManifestFieldInvalid`.

use serde_yaml_ng::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::{BuildError, Result};

/// Manifest file name inside every patch directory
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// A validated patch manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchManifest {
    /// Patch name, trimmed and non-empty
    pub name: String,

    /// Patch version, trimmed and non-empty
    pub version: String,

    /// Raw description; may still be blank
    pub description: Option<String>,
}

impl PatchManifest {
    /// Load the manifest of a patch directory
    pub fn from_dir(patch_dir: &Path) -> Result<Self> {
        let path = manifest_path(patch_dir);
        let patch = patch_label(patch_dir);

        if !path.is_file() {
            return Err(BuildError::ManifestMissing { patch, path });
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| BuildError::ManifestInvalid {
                patch: patch.clone(),
                path: path.clone(),
                reason: format!("failed to read file: {e}"),
            })?;

        Self::from_yaml(&content, &patch, &path)
    }

    /// Parse manifest content; `patch` and `path` are only used for diagnostics
    pub fn from_yaml(content: &str, patch: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| BuildError::ManifestInvalid {
            patch: patch.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        let tree: Value =
            serde_yaml_ng::from_str(content).map_err(|e| invalid(format!("invalid YAML: {e}")))?;

        match tree {
            Value::Mapping(map) => Self::from_mapping(&map, path),
            other => Err(invalid(format!(
                "expected a YAML mapping at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn from_mapping(map: &Mapping, path: &Path) -> Result<Self> {
        let name = required_string(map, "name", path)?;
        let version = required_string(map, "version", path)?;

        let description = match map.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(BuildError::ManifestFieldInvalid {
                    field: "description",
                    path: path.to_path_buf(),
                    reason: format!("expected a string, found {}", kind_of(other)),
                })
            }
        };

        Ok(Self {
            name,
            version,
            description,
        })
    }
}

fn required_string(map: &Mapping, field: &'static str, path: &Path) -> Result<String> {
    let field_error = |reason: String| BuildError::ManifestFieldInvalid {
        field,
        path: path.to_path_buf(),
        reason,
    };

    match map.get(field) {
        None | Some(Value::Null) => Err(field_error("missing".to_string())),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(field_error("must not be blank".to_string()))
            } else if !is_plain_component(trimmed) {
                Err(field_error("must not contain path separators".to_string()))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(field_error(format!(
            "expected a string, found {}",
            kind_of(other)
        ))),
    }
}

/// `name` and `version` become part of the archive file name
fn is_plain_component(value: &str) -> bool {
    !value.contains(['/', '\\']) && value != "." && value != ".."
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Directory name used to identify a patch in diagnostics
pub fn patch_label(patch_dir: &Path) -> String {
    patch_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| patch_dir.display().to_string())
}

/// Manifest path for a patch directory
pub fn manifest_path(patch_dir: &Path) -> PathBuf {
    patch_dir.join(MANIFEST_FILE)
}
