use std::path::Path;

use stagecut_core::{Plan, PlanConfig};
use stagecut_workspace::Workspace;

/// Configuration file looked up in the workspace root when --config is
/// not given.
const CONFIG_FILE: &str = "stagecut.toml";

pub fn run(path: &str, config: Option<&str>, format: &str) -> anyhow::Result<()> {
    let root = Path::new(path);
    let config = load_config(root, config)?;
    let ws = Workspace::discover(root)?;
    let plan = stagecut_planner::plan(&ws, &config)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        _ => {
            print!("{}", render_text(&plan));
        }
    }

    tracing::info!(digest = %plan.digest(), "plan emitted");
    Ok(())
}

fn load_config(root: &Path, explicit: Option<&str>) -> anyhow::Result<PlanConfig> {
    match explicit {
        Some(path) => Ok(PlanConfig::from_file(Path::new(path))?),
        None => {
            let default = root.join(CONFIG_FILE);
            if default.is_file() {
                Ok(PlanConfig::from_file(&default)?)
            } else {
                Ok(PlanConfig::default())
            }
        }
    }
}

/// Order-preserving key/value emission, one block per worker, keyed by
/// stage and worker ordinal. This is the text handed to the pipeline
/// configuration templating.
fn render_text(plan: &Plan) -> String {
    let mut out = String::new();
    for stage in &plan.stages {
        for worker in &stage.workers {
            let repos = worker
                .repositories
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("stage{}-worker{}:\n", stage.index, worker.id));
            out.push_str(&format!("  repositories: {}\n", worker.repository_count()));
            out.push_str(&format!("  packages: {}\n", worker.packages));
            out.push_str(&format!("  jobs: [{repos}]\n"));
            if let Some(isolation) = &worker.isolation {
                out.push_str(&format!("  isolation: \"{isolation}\"\n"));
            }
        }
    }
    out
}
