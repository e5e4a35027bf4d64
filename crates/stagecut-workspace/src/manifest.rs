//! Package manifest discovery.
//!
//! Packages declare themselves with a `pkg.toml` at their root:
//!
//! ```toml
//! name = "motion-core"
//! build_depends = ["geometry"]
//! exec_depends = ["runtime-assets"]
//! test_depends = ["test-fixtures"]
//! ```
//!
//! Discovery walks the workspace root and returns one raw record per
//! manifest found. The records carry plain name lists; resolving them
//! against the workspace (and deciding which names are even in the
//! workspace) is the model's job, not the reader's.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{WorkspaceError, WorkspaceResult};

/// File name that marks a package root.
pub const MANIFEST_FILE: &str = "pkg.toml";

/// A discovered package, as declared by its manifest.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub name: String,
    /// Package directory, relative to the workspace root.
    pub path: PathBuf,
    pub build_depends: Vec<String>,
    pub exec_depends: Vec<String>,
    pub test_depends: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    #[serde(default)]
    build_depends: Vec<String>,
    #[serde(default)]
    exec_depends: Vec<String>,
    #[serde(default)]
    test_depends: Vec<String>,
}

/// Find every `pkg.toml` beneath `root` and parse it.
///
/// Hidden directories (including `.git`) are not descended into.
pub fn discover_manifests(root: &Path) -> WorkspaceResult<Vec<PackageManifest>> {
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_default();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk aborted"));
            WorkspaceError::Io { path, source }
        })?;

        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
            continue;
        }

        let manifest_path = entry.path();
        let content = std::fs::read_to_string(manifest_path).map_err(|source| {
            WorkspaceError::Io {
                path: manifest_path.to_path_buf(),
                source,
            }
        })?;
        let raw: RawManifest =
            toml::from_str(&content).map_err(|source| WorkspaceError::Manifest {
                path: manifest_path.to_path_buf(),
                source,
            })?;

        let package_dir = manifest_path.parent().unwrap_or(root);
        let relative = package_dir.strip_prefix(root).unwrap_or(package_dir);

        tracing::debug!(name = %raw.name, path = %relative.display(), "found package manifest");

        manifests.push(PackageManifest {
            name: raw.name,
            path: relative.to_path_buf(),
            build_depends: raw.build_depends,
            exec_depends: raw.exec_depends,
            test_depends: raw.test_depends,
        });
    }

    tracing::info!(count = manifests.len(), "discovered packages");
    Ok(manifests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let raw: RawManifest = toml::from_str(r#"name = "solo""#).unwrap();
        assert_eq!(raw.name, "solo");
        assert!(raw.build_depends.is_empty());
        assert!(raw.test_depends.is_empty());
    }

    #[test]
    fn parses_dependency_lists() {
        let raw: RawManifest = toml::from_str(
            r#"
name = "motion-core"
build_depends = ["geometry", "kinematics"]
test_depends = ["test-fixtures"]
"#,
        )
        .unwrap();
        assert_eq!(raw.build_depends.len(), 2);
        assert_eq!(raw.exec_depends.len(), 0);
        assert_eq!(raw.test_depends, vec!["test-fixtures"]);
    }
}
