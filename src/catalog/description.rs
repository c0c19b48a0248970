//! Description resolution for registry entries
//!
//! Precedence: manifest `description`, then the first content line of the
//! patch README, then a synthesized `Patch <name>`.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

use super::PatchManifest;

/// README file consulted when the manifest carries no description
pub const README_FILE: &str = "README.md";

/// Stands in for the patch name when none is available
pub const UNKNOWN_NAME: &str = "unknown";

/// Where a resolved description came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSource {
    Manifest,
    Readme,
    Default,
}

impl DescriptionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionSource::Manifest => "manifest",
            DescriptionSource::Readme => "readme",
            DescriptionSource::Default => "default",
        }
    }
}

/// Resolve the description for a patch.
///
/// Never fails: an unreadable README is logged and skipped.
pub fn resolve_description(patch_dir: &Path, manifest: &PatchManifest) -> String {
    resolve_with_source(patch_dir, manifest).0
}

/// Like [`resolve_description`], also reporting which step produced the text
pub fn resolve_with_source(
    patch_dir: &Path,
    manifest: &PatchManifest,
) -> (String, DescriptionSource) {
    if let Some(desc) = manifest.description.as_deref().map(str::trim) {
        if !desc.is_empty() {
            return (desc.to_string(), DescriptionSource::Manifest);
        }
    }

    let readme = patch_dir.join(README_FILE);
    if readme.is_file() {
        match first_content_line(&readme) {
            Ok(Some(line)) => return (line, DescriptionSource::Readme),
            Ok(None) => debug!("No usable description line in {:?}", readme),
            Err(e) => warn!("Could not read description from {:?}: {}", readme, e),
        }
    }

    (default_description(&manifest.name), DescriptionSource::Default)
}

/// `Patch <name>`, with a placeholder for a blank name
pub fn default_description(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        format!("Patch {UNKNOWN_NAME}")
    } else {
        format!("Patch {name}")
    }
}

/// First trimmed line that is neither empty nor a markdown heading
fn first_content_line(path: &Path) -> std::io::Result<Option<String>> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            return Ok(Some(trimmed.to_string()));
        }
    }
    Ok(None)
}
