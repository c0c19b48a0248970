//! Patch catalog - manifests, descriptions, archives and the registry
//!
//! # Layout
//!
//! ```text
//! <root>/
//!     ├── patches/<patch>/manifest.yaml  ← name, version, description?
//!     ├── patches/<patch>/README.md      ← optional description fallback
//!     ├── dist/<name>-<version>.zip      ← one archive per patch
//!     └── generated/patches.json         ← the registry
//! ```

pub mod archive;
pub mod description;
pub mod manifest;
pub mod registry;

pub use archive::build_archive;
pub use description::{resolve_description, DescriptionSource};
pub use manifest::{PatchManifest, MANIFEST_FILE};
pub use registry::{download_url, write_registry, PatchDescriptor};
