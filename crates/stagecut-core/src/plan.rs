//! The emitted stage/worker plan.
//!
//! This is the structured output handed to downstream pipeline
//! generation: an ordered list of stages, each an ordered list of
//! workers. All types serialize to JSON so consumers can either parse
//! the structure directly or diff plans by digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One worker slot within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Ordinal position within the stage, starting at 0.
    pub id: usize,
    /// Repositories assigned to this worker.
    pub repositories: Vec<String>,
    /// Total package count across the assigned repositories.
    pub packages: usize,
    /// Worker configuration string, present only for workers produced
    /// from an isolation override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation: Option<String>,
}

impl Worker {
    pub fn repository_count(&self) -> usize {
        self.repositories.len()
    }
}

/// One stage of the plan: workers that may run in parallel once all
/// earlier stages have completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    /// Position in the build order, starting at 0.
    pub index: usize,
    pub workers: Vec<Worker>,
}

impl StagePlan {
    /// Total package count across all workers in this stage.
    pub fn package_count(&self) -> usize {
        self.workers.iter().map(|w| w.packages).sum()
    }

    /// Total repository count across all workers in this stage.
    pub fn repository_count(&self) -> usize {
        self.workers.iter().map(|w| w.repository_count()).sum()
    }
}

/// The complete dependency-ordered build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub stages: Vec<StagePlan>,
}

impl Plan {
    /// Hex-encoded SHA-256 over the canonical JSON form.
    ///
    /// Downstream CI configuration is regenerated only when this
    /// changes, so the serialization must stay order-preserving.
    pub fn digest(&self) -> String {
        let canonical =
            serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }

    pub fn package_count(&self) -> usize {
        self.stages.iter().map(|s| s.package_count()).sum()
    }

    pub fn repository_count(&self) -> usize {
        self.stages.iter().map(|s| s.repository_count()).sum()
    }
}
