//! Worker load balancing.
//!
//! Multiway number partitioning: assign weighted tasks to at most `W`
//! workers so the heaviest worker is as light as possible. Optimal
//! partitioning is NP-hard; the classic greedy longest-processing-time
//! heuristic is enough here since load estimates are package counts,
//! not measured build times.

use tracing::debug;

use crate::tasks::Task;

/// Partition `tasks` into at most `workers` non-empty bins.
///
/// Tasks are taken largest-first and always assigned to the currently
/// lightest bin. Bins that stay empty are dropped: the budget is an
/// upper bound, not a quota. A task is never split.
///
/// Ties (equal weights, equally light bins) are broken by repository
/// name and bin position so the same input always yields the same
/// plan.
pub fn balance(mut tasks: Vec<Task>, workers: usize) -> Vec<Vec<Task>> {
    let workers = workers.max(1);
    if tasks.is_empty() {
        return Vec::new();
    }

    tasks.sort_by(|a, b| {
        b.weight()
            .cmp(&a.weight())
            .then_with(|| a.repository_names().cmp(&b.repository_names()))
    });

    let mut bins: Vec<(usize, Vec<Task>)> = vec![(0, Vec::new()); workers.min(tasks.len())];
    for task in tasks {
        let mut lightest = 0;
        for (i, (load, _)) in bins.iter().enumerate() {
            if *load < bins[lightest].0 {
                lightest = i;
            }
        }
        bins[lightest].0 += task.weight();
        bins[lightest].1.push(task);
    }

    let filled: Vec<Vec<Task>> = bins
        .into_iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(_, tasks)| tasks)
        .collect();

    debug!(workers = filled.len(), budget = workers, "balanced stage tasks");
    filled
}
