//! Plan assembly: reducer → bond/isolation resolver → balancer.

use stagecut_core::{Plan, PlanConfig, StagePlan, Worker};
use stagecut_workspace::{Repository, Workspace};
use tracing::info;

use crate::balance::balance;
use crate::error::PlanResult;
use crate::stages::Stages;
use crate::tasks::resolve_tasks;

/// Compute the full stage/worker plan for a workspace.
///
/// The workspace is copied; the caller's instance stays intact.
pub fn plan(ws: &Workspace, config: &PlanConfig) -> PlanResult<Plan> {
    let mut stages = Vec::new();

    for (index, stage) in Stages::new(ws.clone(), config).enumerate() {
        let stage = stage?;
        stages.push(plan_stage(index, &stage, config));
    }

    let plan = Plan { stages };
    info!(
        stages = plan.stages.len(),
        repositories = plan.repository_count(),
        packages = plan.package_count(),
        "plan computed"
    );
    Ok(plan)
}

fn plan_stage(index: usize, stage: &[Repository], config: &PlanConfig) -> StagePlan {
    let tasks = resolve_tasks(stage, config);

    // Isolated repositories each claim a dedicated worker out of the
    // stage budget; whatever remains is shared by the regular tasks.
    let budget = config.worker_budget(index) as usize;
    let regular_budget = budget.saturating_sub(tasks.isolated.len()).max(1);
    let bins = balance(tasks.regular, regular_budget);

    let mut workers = Vec::new();
    for bin in bins {
        let repositories: Vec<String> = bin
            .iter()
            .flat_map(|task| task.repository_names())
            .collect();
        let packages = bin.iter().map(|task| task.weight()).sum();
        workers.push(Worker {
            id: workers.len(),
            repositories,
            packages,
            isolation: None,
        });
    }
    for task in tasks.isolated {
        workers.push(Worker {
            id: workers.len(),
            repositories: vec![task.repository.name.clone()],
            packages: task.repository.package_count(),
            isolation: Some(task.configuration),
        });
    }

    info!(
        stage = index,
        workers = workers.len(),
        repositories = stage.len(),
        "stage planned"
    );
    StagePlan { index, workers }
}
