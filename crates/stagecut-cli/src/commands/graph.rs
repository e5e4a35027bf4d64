use std::path::Path;

use stagecut_workspace::Workspace;

pub fn run(path: &str) -> anyhow::Result<()> {
    let ws = Workspace::discover(Path::new(path))?;
    print!("{}", render_dot(&ws));
    Ok(())
}

/// Graphviz DOT rendering of the repository build-dependency graph.
fn render_dot(ws: &Workspace) -> String {
    let mut out = String::from("digraph workspace {\n");
    for repo in ws.repositories().values() {
        out.push_str(&format!("  \"{}\";\n", repo.name));
        for dep in &repo.build_depends {
            out.push_str(&format!("  \"{}\" -> \"{}\";\n", repo.name, dep));
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecut_workspace::PackageRecord;
    use std::path::PathBuf;

    #[test]
    fn renders_edges_and_lone_nodes() {
        let ws = Workspace::from_records(vec![
            PackageRecord {
                name: "app".into(),
                path: PathBuf::from("app"),
                repository: "app-repo".into(),
                build_depends: vec!["lib".into()],
                exec_depends: vec![],
                test_depends: vec![],
            },
            PackageRecord {
                name: "lib".into(),
                path: PathBuf::from("lib"),
                repository: "lib-repo".into(),
                build_depends: vec![],
                exec_depends: vec![],
                test_depends: vec![],
            },
        ])
        .unwrap();

        let dot = render_dot(&ws);
        assert!(dot.starts_with("digraph workspace {"));
        assert!(dot.contains("\"app-repo\" -> \"lib-repo\";"));
        assert!(dot.contains("  \"lib-repo\";\n"));
    }
}
