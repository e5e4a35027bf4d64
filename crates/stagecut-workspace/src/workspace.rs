//! The workspace model: packages, repositories, and the dependency
//! graph between them.
//!
//! A workspace is loaded once from discovered package manifests and is
//! immutable afterwards except for [`Workspace::drop_repository`],
//! which removes a repository and scrubs every reference to it from
//! the remaining graph. The stage reducer relies on that invariant:
//! after a drop there are no dangling names anywhere.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::manifest::{self, PackageManifest};

/// A named buildable unit with its own dependency declarations.
///
/// Dependency sets hold package names and may reference packages
/// outside the workspace; such names are dropped when dependencies are
/// lifted to repository level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Package directory, relative to the workspace root.
    pub path: PathBuf,
    /// Name of the repository that contains this package.
    pub repository: String,
    pub build_depends: BTreeSet<String>,
    pub exec_depends: BTreeSet<String>,
    pub test_depends: BTreeSet<String>,
}

/// A version-control-bounded collection of packages; the unit the
/// scheduler stages.
///
/// The three dependency sets hold *repository* names: the union over
/// all contained packages of the owning repository of every
/// in-workspace dependency, minus the repository itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    /// Repository root, relative to the workspace root.
    pub path: PathBuf,
    /// Names of the packages this repository contains.
    pub packages: BTreeSet<String>,
    pub build_depends: BTreeSet<String>,
    pub exec_depends: BTreeSet<String>,
    pub test_depends: BTreeSet<String>,
}

impl Repository {
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

/// A package with its repository membership already resolved.
///
/// [`Workspace::from_records`] accepts these directly, bypassing
/// filesystem discovery; embedders (and tests) that know repository
/// membership up front can build a workspace from plain data.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub name: String,
    pub path: PathBuf,
    pub repository: String,
    pub build_depends: Vec<String>,
    pub exec_depends: Vec<String>,
    pub test_depends: Vec<String>,
}

/// The package and repository indices of one source workspace.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    root: PathBuf,
    packages: BTreeMap<String, Package>,
    repositories: BTreeMap<String, Repository>,
}

impl Workspace {
    /// Discover manifests beneath `root` and build the full model.
    pub fn discover(root: &Path) -> WorkspaceResult<Self> {
        let manifests = manifest::discover_manifests(root)?;
        Self::from_manifests(root, manifests)
    }

    /// Build the model from already-discovered manifests, resolving
    /// each package's repository by walking upward from its directory
    /// to the nearest version-control boundary.
    pub fn from_manifests(
        root: &Path,
        manifests: Vec<PackageManifest>,
    ) -> WorkspaceResult<Self> {
        let mut records = Vec::with_capacity(manifests.len());
        for m in manifests {
            let repository = repository_name(root, &m.path)?;
            records.push(PackageRecord {
                name: m.name,
                path: m.path,
                repository,
                build_depends: m.build_depends,
                exec_depends: m.exec_depends,
                test_depends: m.test_depends,
            });
        }
        let mut ws = Self::from_records(records)?;
        ws.root = root.to_path_buf();
        Ok(ws)
    }

    /// Build the model from pre-resolved package records.
    pub fn from_records(records: Vec<PackageRecord>) -> WorkspaceResult<Self> {
        let mut packages: BTreeMap<String, Package> = BTreeMap::new();
        for r in records {
            let package = Package {
                name: r.name.clone(),
                path: r.path,
                repository: r.repository,
                build_depends: r.build_depends.into_iter().collect(),
                exec_depends: r.exec_depends.into_iter().collect(),
                test_depends: r.test_depends.into_iter().collect(),
            };
            if packages.insert(r.name.clone(), package).is_some() {
                return Err(WorkspaceError::DuplicatePackage(r.name));
            }
        }

        let mut repositories: BTreeMap<String, Repository> = BTreeMap::new();
        for package in packages.values() {
            let repo = repositories
                .entry(package.repository.clone())
                .or_insert_with(|| Repository {
                    name: package.repository.clone(),
                    path: PathBuf::from(&package.repository),
                    packages: BTreeSet::new(),
                    build_depends: BTreeSet::new(),
                    exec_depends: BTreeSet::new(),
                    test_depends: BTreeSet::new(),
                });
            repo.packages.insert(package.name.clone());
        }

        // Lift package-level dependencies to repository level: keep
        // only in-workspace names, map them to their owning repository,
        // and drop self-references.
        let owner_of: BTreeMap<String, String> = packages
            .values()
            .map(|p| (p.name.clone(), p.repository.clone()))
            .collect();
        for repo in repositories.values_mut() {
            for pkg_name in repo.packages.clone() {
                let package = &packages[&pkg_name];
                lift_depends(&package.build_depends, &owner_of, &repo.name, &mut repo.build_depends);
                lift_depends(&package.exec_depends, &owner_of, &repo.name, &mut repo.exec_depends);
                lift_depends(&package.test_depends, &owner_of, &repo.name, &mut repo.test_depends);
            }
        }

        tracing::debug!(
            packages = packages.len(),
            repositories = repositories.len(),
            "workspace model built"
        );

        Ok(Self {
            root: PathBuf::new(),
            packages,
            repositories,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn repositories(&self) -> &BTreeMap<String, Repository> {
        &self.repositories
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Look up a package by name.
    pub fn package(&self, name: &str) -> WorkspaceResult<&Package> {
        self.packages
            .get(name)
            .ok_or_else(|| WorkspaceError::NotFound(name.to_string()))
    }

    /// Look up a repository by name.
    pub fn repository(&self, name: &str) -> WorkspaceResult<&Repository> {
        self.repositories
            .get(name)
            .ok_or_else(|| WorkspaceError::NotFound(name.to_string()))
    }

    /// All packages owned by the named repository.
    pub fn packages_in_repository(&self, name: &str) -> WorkspaceResult<Vec<&Package>> {
        let repo = self.repository(name)?;
        Ok(repo
            .packages
            .iter()
            .filter_map(|p| self.packages.get(p))
            .collect())
    }

    /// Remove a repository, all its packages, and every reference to
    /// either from the remaining graph.
    pub fn drop_repository(&mut self, name: &str) -> WorkspaceResult<()> {
        let repo = self
            .repositories
            .remove(name)
            .ok_or_else(|| WorkspaceError::NotFound(name.to_string()))?;

        for pkg_name in &repo.packages {
            self.packages.remove(pkg_name);
        }
        for package in self.packages.values_mut() {
            for dropped in &repo.packages {
                package.build_depends.remove(dropped);
                package.exec_depends.remove(dropped);
                package.test_depends.remove(dropped);
            }
        }
        for other in self.repositories.values_mut() {
            other.build_depends.remove(name);
            other.exec_depends.remove(name);
            other.test_depends.remove(name);
        }

        tracing::debug!(repository = name, packages = repo.packages.len(), "dropped repository");
        Ok(())
    }

    /// Every repository the named repository transitively depends on,
    /// over build and exec edges.
    ///
    /// Iterative traversal with an explicit work stack; cycles in the
    /// graph are tolerated (each node is visited once).
    pub fn transitive_dependencies(&self, name: &str) -> WorkspaceResult<BTreeSet<String>> {
        self.repository(name)?;

        let mut visited: BTreeSet<String> = BTreeSet::from([name.to_string()]);
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(repo) = self.repositories.get(&current) {
                for dep in repo.build_depends.iter().chain(&repo.exec_depends) {
                    if visited.insert(dep.clone()) {
                        stack.push(dep.clone());
                    }
                }
            }
        }
        visited.remove(name);
        Ok(visited)
    }

    /// Every repository that transitively depends on the named one,
    /// over build and exec edges. Same traversal shape as
    /// [`Workspace::transitive_dependencies`], following edges in
    /// reverse.
    pub fn transitive_dependents(&self, name: &str) -> WorkspaceResult<BTreeSet<String>> {
        self.repository(name)?;

        let mut visited: BTreeSet<String> = BTreeSet::from([name.to_string()]);
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            for repo in self.repositories.values() {
                if (repo.build_depends.contains(&current) || repo.exec_depends.contains(&current))
                    && visited.insert(repo.name.clone())
                {
                    stack.push(repo.name.clone());
                }
            }
        }
        visited.remove(name);
        Ok(visited)
    }
}

fn lift_depends(
    package_deps: &BTreeSet<String>,
    owner_of: &BTreeMap<String, String>,
    self_name: &str,
    out: &mut BTreeSet<String>,
) {
    for dep in package_deps {
        if let Some(owner) = owner_of.get(dep)
            && owner != self_name
        {
            out.insert(owner.clone());
        }
    }
}

/// Derive the repository name for a package directory: the nearest
/// enclosing directory containing a `.git` marker, expressed relative
/// to the workspace root.
fn repository_name(root: &Path, package_path: &Path) -> WorkspaceResult<String> {
    let start = root.join(package_path);
    let mut dir = start.as_path();
    loop {
        if dir.join(".git").is_dir() {
            let relative = dir.strip_prefix(root).unwrap_or(dir);
            let name = relative.to_string_lossy().replace('\\', "/");
            return Ok(if name.is_empty() { ".".to_string() } else { name });
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                return Err(WorkspaceError::NotInRepository {
                    path: start.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, repo: &str, build: &[&str], exec: &[&str], test: &[&str]) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            path: PathBuf::from(format!("{repo}/{name}")),
            repository: repo.to_string(),
            build_depends: build.iter().map(|s| s.to_string()).collect(),
            exec_depends: exec.iter().map(|s| s.to_string()).collect(),
            test_depends: test.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> Workspace {
        Workspace::from_records(vec![
            record("core", "core-repo", &[], &[], &[]),
            record("core-extras", "core-repo", &["core"], &[], &[]),
            record("motion", "motion-repo", &["core", "libexternal"], &[], &["testkit"]),
            record("viz", "viz-repo", &[], &["motion"], &[]),
            record("testkit", "tools-repo", &[], &[], &[]),
        ])
        .unwrap()
    }

    #[test]
    fn lifts_dependencies_to_repositories() {
        let ws = sample();
        let motion = ws.repository("motion-repo").unwrap();

        // In-workspace package deps map to their owning repository;
        // out-of-workspace names (libexternal) are dropped.
        assert_eq!(
            motion.build_depends,
            BTreeSet::from(["core-repo".to_string()])
        );
        assert_eq!(
            motion.test_depends,
            BTreeSet::from(["tools-repo".to_string()])
        );

        let viz = ws.repository("viz-repo").unwrap();
        assert_eq!(viz.exec_depends, BTreeSet::from(["motion-repo".to_string()]));
    }

    #[test]
    fn intra_repository_dependencies_are_not_self_edges() {
        let ws = sample();
        let core = ws.repository("core-repo").unwrap();
        assert!(core.build_depends.is_empty());
        assert_eq!(core.package_count(), 2);
    }

    #[test]
    fn duplicate_package_rejected() {
        let err = Workspace::from_records(vec![
            record("core", "a", &[], &[], &[]),
            record("core", "b", &[], &[], &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, WorkspaceError::DuplicatePackage(_)));
    }

    #[test]
    fn drop_repository_scrubs_all_references() {
        let mut ws = sample();
        ws.drop_repository("core-repo").unwrap();

        assert!(ws.repository("core-repo").is_err());
        assert!(ws.package("core").is_err());
        assert!(ws.package("core-extras").is_err());

        for repo in ws.repositories().values() {
            assert!(!repo.build_depends.contains("core-repo"));
            assert!(!repo.test_depends.contains("core-repo"));
            assert!(!repo.exec_depends.contains("core-repo"));
        }
        for package in ws.packages().values() {
            assert!(!package.build_depends.contains("core"));
            assert!(!package.build_depends.contains("core-extras"));
        }
    }

    #[test]
    fn drop_unknown_repository_fails() {
        let mut ws = sample();
        let err = ws.drop_repository("nope").unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound(_)));
    }

    #[test]
    fn transitive_dependencies_follow_build_and_exec() {
        let ws = sample();
        let deps = ws.transitive_dependencies("viz-repo").unwrap();
        // viz -> motion (exec) -> core (build); test edges do not count.
        assert_eq!(
            deps,
            BTreeSet::from(["motion-repo".to_string(), "core-repo".to_string()])
        );
    }

    #[test]
    fn transitive_dependents_reverse_the_edges() {
        let ws = sample();
        let dependents = ws.transitive_dependents("core-repo").unwrap();
        assert_eq!(
            dependents,
            BTreeSet::from(["motion-repo".to_string(), "viz-repo".to_string()])
        );
    }

    #[test]
    fn closure_queries_terminate_on_cycles() {
        let ws = Workspace::from_records(vec![
            record("a", "ra", &["b"], &[], &[]),
            record("b", "rb", &["c"], &[], &[]),
            record("c", "rc", &["a"], &[], &[]),
        ])
        .unwrap();

        let deps = ws.transitive_dependencies("ra").unwrap();
        assert_eq!(deps, BTreeSet::from(["rb".to_string(), "rc".to_string()]));

        let dependents = ws.transitive_dependents("ra").unwrap();
        assert_eq!(
            dependents,
            BTreeSet::from(["rb".to_string(), "rc".to_string()])
        );
    }

    #[test]
    fn packages_in_repository_lists_siblings() {
        let ws = sample();
        let mut names: Vec<&str> = ws
            .packages_in_repository("core-repo")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["core", "core-extras"]);
    }
}
