//! Planner error types.

use stagecut_workspace::{Repository, WorkspaceError};
use thiserror::Error;

/// Result type alias for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while computing a build plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Repositories remain but none is eligible for the next stage.
    /// Carries the full remaining graph so the cycle can be diagnosed;
    /// no partial build order exists past this point.
    #[error(
        "unresolvable dependency cycle, {} repositories remain:\n{}",
        .remaining.len(),
        format_remaining(.remaining)
    )]
    UnresolvableCycle { remaining: Vec<Repository> },

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

fn format_remaining(remaining: &[Repository]) -> String {
    let mut out = String::new();
    for repo in remaining {
        out.push_str(&format!(
            "{}: build {:?} / test {:?} / exec {:?}\n",
            repo.name,
            repo.build_depends,
            repo.test_depends,
            repo.exec_depends,
        ));
    }
    out
}
