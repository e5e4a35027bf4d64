//! stagecut-planner — turns a workspace dependency graph into a
//! stage/worker build plan.
//!
//! # Architecture
//!
//! ```text
//! Workspace (stagecut-workspace)
//!   └── Stages            dependency-ordered reduction, bootstrap- and
//!       │                 bond-aware, cycle detection
//!       └── resolve_tasks isolation overrides + bond grouping
//!           └── balance   greedy LPT bin packing per worker budget
//!               └── Plan  (stagecut-core) consumed by CI templating
//! ```
//!
//! The planner never mutates the caller's workspace; the reducer runs
//! on its own copy.

pub mod balance;
pub mod error;
pub mod plan;
pub mod stages;
pub mod tasks;

pub use error::{PlanError, PlanResult};
pub use plan::plan;
pub use stages::Stages;
pub use tasks::{IsolatedTask, StageTasks, Task, resolve_tasks};
