//! stagecut-workspace — the package/repository dependency model.
//!
//! Builds the graph the planner reduces:
//!
//! ```text
//! Workspace
//!   ├── manifest discovery (pkg.toml beneath the root)
//!   ├── repository detection (upward walk to the .git boundary)
//!   ├── Package index (name → declared dependency sets)
//!   └── Repository index (name → lifted repository-level sets)
//! ```
//!
//! Repository-level dependency sets only ever contain in-workspace
//! repository names, and [`Workspace::drop_repository`] keeps that
//! referentially intact as the stage reducer consumes the graph.

pub mod error;
pub mod manifest;
pub mod workspace;

pub use error::{WorkspaceError, WorkspaceResult};
pub use manifest::{MANIFEST_FILE, PackageManifest, discover_manifests};
pub use workspace::{Package, PackageRecord, Repository, Workspace};
