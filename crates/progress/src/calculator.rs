//! Task-based progress derivation.

use fynkr_core::{Task, TaskStatus, TaskType};
use serde::Serialize;

/// Percentage of `tasks` that are completed, rounded half-up.
///
/// An empty collection is 0%. Integer arithmetic only: 1 of 3 is 33,
/// 2 of 3 is 67, 1 of 2 is 50.
pub fn compute_progress(tasks: &[Task]) -> u8 {
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    percentage(completed, tasks.len())
}

/// `round_half_up(100 * part / whole)`, 0 when `whole` is 0.
///
/// Below 200 tasks only an empty share is 0% and only a full share is 100%.
/// Larger boards round like any other share: 199 of 200 is 100.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

/// Task counts by column, plus open bugs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Bugs not yet completed
    pub open_bugs: usize,
}

impl TaskBreakdown {
    /// Count a task collection.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            match task.status {
                TaskStatus::Todo => acc.todo += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Completed => acc.completed += 1,
            }
            if task.kind == TaskType::Bug && task.status != TaskStatus::Completed {
                acc.open_bugs += 1;
            }
            acc
        })
    }

    /// Completion percentage of the counted tasks.
    pub fn progress(&self) -> u8 {
        percentage(self.completed, self.total)
    }
}
