//! Filesystem discovery tests.
//!
//! Builds real directory trees with nested `.git` markers and checks
//! that manifest discovery and repository detection agree with the
//! model built from them.

use std::fs;
use std::path::Path;

use stagecut_workspace::{Workspace, WorkspaceError};

fn write_manifest(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("pkg.toml"), content).unwrap();
}

fn mark_repository(dir: &Path) {
    fs::create_dir_all(dir.join(".git")).unwrap();
}

#[test]
fn discovers_packages_and_repositories() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    mark_repository(&root.join("repo-a"));
    write_manifest(&root.join("repo-a/one"), r#"name = "one""#);
    write_manifest(
        &root.join("repo-a/nested/two"),
        r#"
name = "two"
build_depends = ["one"]
"#,
    );

    mark_repository(&root.join("repo-b"));
    write_manifest(
        &root.join("repo-b"),
        r#"
name = "three"
build_depends = ["two", "not-in-workspace"]
test_depends = ["one"]
"#,
    );

    let ws = Workspace::discover(root).unwrap();

    assert_eq!(ws.packages().len(), 3);
    assert_eq!(ws.repositories().len(), 2);

    assert_eq!(ws.package("one").unwrap().repository, "repo-a");
    assert_eq!(ws.package("two").unwrap().repository, "repo-a");
    assert_eq!(ws.package("three").unwrap().repository, "repo-b");

    let repo_b = ws.repository("repo-b").unwrap();
    assert!(repo_b.build_depends.contains("repo-a"));
    assert!(repo_b.test_depends.contains("repo-a"));
    assert!(!repo_b.build_depends.contains("not-in-workspace"));

    // Both of repo-a's packages live in the same repository, so the
    // one -> two edge never becomes a repository-level dependency.
    let repo_a = ws.repository("repo-a").unwrap();
    assert!(repo_a.build_depends.is_empty());
    assert_eq!(repo_a.package_count(), 2);
}

#[test]
fn package_without_enclosing_repository_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    write_manifest(&root.join("loose"), r#"name = "stray""#);

    let err = Workspace::discover(root).unwrap_err();
    assert!(matches!(err, WorkspaceError::NotInRepository { .. }));
}

#[test]
fn hidden_directories_are_not_descended() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    mark_repository(&root.join("repo"));
    write_manifest(&root.join("repo/pkg"), r#"name = "visible""#);
    write_manifest(&root.join("repo/.cache/pkg"), r#"name = "shadow""#);

    let ws = Workspace::discover(root).unwrap();
    assert_eq!(ws.packages().len(), 1);
    assert!(ws.package("shadow").is_err());
}

#[test]
fn malformed_manifest_reports_path() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    mark_repository(&root.join("repo"));
    write_manifest(&root.join("repo/pkg"), "name = ");

    let err = Workspace::discover(root).unwrap_err();
    match err {
        WorkspaceError::Manifest { path, .. } => {
            assert!(path.ends_with("repo/pkg/pkg.toml"));
        }
        other => panic!("expected Manifest error, got {other:?}"),
    }
}
