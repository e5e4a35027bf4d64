//! stagecut.toml configuration parser.
//!
//! Everything the operator supplies by hand lives here: bootstrap
//! repositories, per-stage worker budgets, bonds, and isolation
//! overrides. Nothing in this file is discovered from the workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Operator-supplied inputs to the stage reducer and load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Repositories that define the build environment itself. While any
    /// of these remain unstaged, the next stage consists of exactly the
    /// remaining bootstrap set, regardless of declared dependencies.
    pub bootstrap: Vec<String>,

    /// Worker budget per stage index; the last entry repeats for all
    /// later stages. The first stage builds environment prerequisites
    /// and cannot be parallelized, hence the `[1, 10]` default.
    pub workers: Vec<u32>,

    /// Whether exec-depends block staging in addition to build/test.
    /// Exec dependencies are runtime requirements, so the default is to
    /// treat them as informational only.
    pub exec_gates_staging: bool,

    /// Named groups of repositories that must be staged together and
    /// assigned to the same worker.
    pub bonds: BTreeMap<String, Vec<String>>,

    /// Repository name → worker configuration string. A repository
    /// listed here always runs in its own exclusive worker with the
    /// given configuration attached (an empty string isolates without
    /// extra configuration).
    pub isolation: BTreeMap<String, String>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            bootstrap: Vec::new(),
            workers: vec![1, 10],
            exec_gates_staging: false,
            bonds: BTreeMap::new(),
            isolation: BTreeMap::new(),
        }
    }
}

impl PlanConfig {
    /// Load and validate a configuration from a `stagecut.toml` file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: PlanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Worker budget for the given stage index.
    ///
    /// Falls back to the last configured entry, so a two-entry list
    /// covers any number of stages.
    pub fn worker_budget(&self, stage: usize) -> u32 {
        self.workers
            .get(stage)
            .or_else(|| self.workers.last())
            .copied()
            .unwrap_or(1)
    }

    /// The bond (including `repository` itself) that `repository`
    /// belongs to, if any.
    pub fn bond_of(&self, repository: &str) -> Option<&[String]> {
        self.bonds
            .values()
            .find(|members| members.iter().any(|m| m == repository))
            .map(|members| members.as_slice())
    }

    fn validate(&self) -> ConfigResult<()> {
        for (stage, budget) in self.workers.iter().enumerate() {
            if *budget == 0 {
                return Err(ConfigError::ZeroWorkerBudget { stage });
            }
        }

        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (bond, members) in &self.bonds {
            if members.len() < 2 {
                return Err(ConfigError::DegenerateBond(bond.clone()));
            }
            for member in members {
                if let Some(first) = seen.insert(member.as_str(), bond.as_str()) {
                    return Err(ConfigError::OverlappingBonds {
                        repository: member.clone(),
                        first: first.to_string(),
                        second: bond.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
