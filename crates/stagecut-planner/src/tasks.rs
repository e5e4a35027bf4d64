//! Bond and isolation resolution.
//!
//! Splits one stage's repositories into the units the load balancer
//! works with: isolated repositories become dedicated tasks carrying
//! their worker configuration, everything else is grouped bond-aware.
//! Every repository of the stage lands in exactly one task.

use std::collections::BTreeMap;

use stagecut_core::PlanConfig;
use stagecut_workspace::Repository;
use tracing::warn;

/// A unit of assignable work: one repository, or one whole bond.
#[derive(Debug, Clone)]
pub struct Task {
    pub repositories: Vec<Repository>,
}

impl Task {
    /// Load estimate: total package count across the task.
    pub fn weight(&self) -> usize {
        self.repositories.iter().map(Repository::package_count).sum()
    }

    pub fn repository_names(&self) -> Vec<String> {
        self.repositories.iter().map(|r| r.name.clone()).collect()
    }
}

/// A repository forced onto its own worker by an isolation override.
#[derive(Debug, Clone)]
pub struct IsolatedTask {
    pub repository: Repository,
    /// Worker configuration string from the override table.
    pub configuration: String,
}

/// The tasks of one stage, ready for balancing.
#[derive(Debug, Clone)]
pub struct StageTasks {
    pub regular: Vec<Task>,
    pub isolated: Vec<IsolatedTask>,
}

/// Resolve a stage's repositories into tasks.
pub fn resolve_tasks(stage: &[Repository], config: &PlanConfig) -> StageTasks {
    let mut isolated = Vec::new();
    let mut candidates: BTreeMap<&str, &Repository> = BTreeMap::new();

    for repo in stage {
        match config.isolation.get(&repo.name) {
            Some(configuration) => isolated.push(IsolatedTask {
                repository: repo.clone(),
                configuration: configuration.clone(),
            }),
            None => {
                candidates.insert(repo.name.as_str(), repo);
            }
        }
    }

    let mut regular = Vec::new();
    while let Some(name) = candidates.keys().next().copied() {
        let members = match config.bond_of(name) {
            Some(bond) => {
                let present: Vec<Repository> = bond
                    .iter()
                    .filter_map(|m| candidates.remove(m.as_str()))
                    .cloned()
                    .collect();
                if present.len() < bond.len() {
                    // Members staged elsewhere or pulled out by an
                    // isolation override; the bond cannot be kept
                    // atomic for them.
                    warn!(
                        bond = %bond.join(","),
                        present = present.len(),
                        "bond is not fully present in this stage"
                    );
                }
                present
            }
            None => candidates
                .remove(name)
                .map(|r| vec![r.clone()])
                .unwrap_or_default(),
        };
        if !members.is_empty() {
            regular.push(Task {
                repositories: members,
            });
        }
    }

    StageTasks { regular, isolated }
}
