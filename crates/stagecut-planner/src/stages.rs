//! The stage reducer.
//!
//! Peels a workspace into dependency-ordered stages: each call to
//! [`Iterator::next`] computes the set of repositories whose gating
//! dependencies are all satisfied, yields it, and removes it from a
//! private working copy of the graph. The caller's workspace is never
//! touched; [`Stages::new`] takes ownership of its own copy.

use stagecut_core::PlanConfig;
use stagecut_workspace::{Repository, Workspace};
use tracing::{debug, warn};

use crate::error::{PlanError, PlanResult};

/// Iterator over the stages of a workspace, in build order.
///
/// Yields `Err(PlanError::UnresolvableCycle)` exactly once if the
/// remaining graph has no eligible repositories, and nothing after
/// that: there is no valid build order past an unbroken cycle.
pub struct Stages {
    ws: Workspace,
    config: PlanConfig,
    fused: bool,
}

impl Stages {
    /// Start reducing the given workspace copy.
    pub fn new(ws: Workspace, config: &PlanConfig) -> Self {
        Self {
            ws,
            config: config.clone(),
            fused: false,
        }
    }

    /// Repositories eligible for the next stage.
    fn eligible(&self) -> Vec<Repository> {
        // Bootstrap repositories define the build environment itself,
        // so while any remain they preempt dependency order entirely.
        let bootstrap: Vec<Repository> = self
            .config
            .bootstrap
            .iter()
            .filter_map(|name| self.ws.repositories().get(name))
            .cloned()
            .collect();
        if !bootstrap.is_empty() {
            return bootstrap;
        }

        self.ws
            .repositories()
            .values()
            .filter(|repo| self.bond_satisfied(repo))
            .cloned()
            .collect()
    }

    /// Whether `repo` and (if bonded) every member of its bond have
    /// empty gating dependency sets.
    fn bond_satisfied(&self, repo: &Repository) -> bool {
        match self.config.bond_of(&repo.name) {
            Some(members) => members.iter().all(|member| {
                // Members already staged (or never in the workspace)
                // cannot block the rest of the bond.
                match self.ws.repositories().get(member) {
                    Some(m) => self.gating_satisfied(m),
                    None => true,
                }
            }),
            None => self.gating_satisfied(repo),
        }
    }

    fn gating_satisfied(&self, repo: &Repository) -> bool {
        repo.build_depends.is_empty()
            && repo.test_depends.is_empty()
            && (!self.config.exec_gates_staging || repo.exec_depends.is_empty())
    }
}

impl Iterator for Stages {
    type Item = PlanResult<Vec<Repository>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.ws.is_empty() {
            return None;
        }

        let stage = self.eligible();
        if stage.is_empty() {
            self.fused = true;
            let remaining: Vec<Repository> =
                self.ws.repositories().values().cloned().collect();
            warn!(
                remaining = remaining.len(),
                "no eligible repositories left, dependency cycle"
            );
            return Some(Err(PlanError::UnresolvableCycle { remaining }));
        }

        for repo in &stage {
            if let Err(e) = self.ws.drop_repository(&repo.name) {
                self.fused = true;
                return Some(Err(e.into()));
            }
        }

        debug!(
            repositories = stage.len(),
            remaining = self.ws.repositories().len(),
            "stage computed"
        );
        Some(Ok(stage))
    }
}
