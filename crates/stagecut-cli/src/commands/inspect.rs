use std::collections::BTreeSet;
use std::path::Path;

use stagecut_workspace::{Package, Workspace};

pub fn run(package: &str, path: &str) -> anyhow::Result<()> {
    let ws = Workspace::discover(Path::new(path))?;
    print!("{}", render(&ws, package)?);
    Ok(())
}

fn render(ws: &Workspace, name: &str) -> anyhow::Result<String> {
    let package = ws.package(name)?;

    let mut out = String::new();
    out.push_str(&format!("package {name} (repository {})\n\n", package.repository));

    push_section(&mut out, "build deps", ws, &package.build_depends);
    push_section(&mut out, "exec deps", ws, &package.exec_depends);
    push_section(&mut out, "test deps", ws, &package.test_depends);

    let siblings: Vec<&str> = ws
        .packages_in_repository(&package.repository)?
        .iter()
        .map(|p: &&Package| p.name.as_str())
        .filter(|sibling| *sibling != name)
        .collect();
    out.push_str(&format!("others in repository {}\n", package.repository));
    if siblings.is_empty() {
        out.push_str("  (none)\n");
    }
    for sibling in siblings {
        out.push_str(&format!("  {sibling}\n"));
    }

    Ok(out)
}

/// Lists only in-workspace dependencies; external names are not part
/// of the graph and would only be noise here.
fn push_section(out: &mut String, title: &str, ws: &Workspace, deps: &BTreeSet<String>) {
    out.push_str(&format!("{title}\n"));
    let known: Vec<&String> = deps.iter().filter(|d| ws.package(d.as_str()).is_ok()).collect();
    if known.is_empty() {
        out.push_str("  (none)\n");
    }
    for dep in known {
        out.push_str(&format!("  {dep}\n"));
    }
    out.push('\n');
}
