//! Kanban task board.
//!
//! `TaskBoard` edits a project's task list in place. It does not persist and
//! does not touch `Project::progress`; `ProjectService` does both.

use fynkr_core::{Task, TaskId, TaskPriority, TaskStatus, TaskType, ValidationError};
use tracing::debug;

/// Mutable view over one project's tasks.
pub struct TaskBoard<'a> {
    tasks: &'a mut Vec<Task>,
}

impl<'a> TaskBoard<'a> {
    /// Wrap a task list.
    pub fn new(tasks: &'a mut Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Current tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    /// Append a new `todo` task.
    ///
    /// Empty or whitespace-only titles are rejected and leave the list as is.
    pub fn add_task(
        &mut self,
        title: &str,
        kind: TaskType,
        priority: TaskPriority,
    ) -> Result<Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        let task = Task::new(title, kind, priority);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Move a task to `status`. Every transition is allowed.
    ///
    /// An unknown id leaves the list untouched.
    pub fn change_status(&mut self, id: TaskId, status: TaskStatus) -> &[Task] {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task.set_status(status),
            None => debug!(task_id = %id, "status change for unknown task ignored"),
        }
        self.tasks.as_slice()
    }

    /// Apply a board shortcut; same as `change_status` to its target.
    pub fn apply(&mut self, id: TaskId, action: KanbanAction) -> &[Task] {
        self.change_status(id, action.target())
    }

    /// Remove the first task with `id`. An unknown id is a no-op.
    pub fn delete_task(&mut self, id: TaskId) -> &[Task] {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tasks.remove(index);
            }
            None => debug!(task_id = %id, "delete of unknown task ignored"),
        }
        self.tasks.as_slice()
    }
}

/// Card buttons on the board. Each is an unconstrained status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KanbanAction {
    /// Move to in-progress
    Start,
    /// Move back to todo
    Back,
    /// Move to completed
    Done,
    /// Move a completed task back to in-progress
    Reopen,
}

impl KanbanAction {
    /// Status the action writes.
    pub fn target(&self) -> TaskStatus {
        match self {
            KanbanAction::Start | KanbanAction::Reopen => TaskStatus::InProgress,
            KanbanAction::Back => TaskStatus::Todo,
            KanbanAction::Done => TaskStatus::Completed,
        }
    }

    /// Buttons shown on a card in `status`.
    pub fn offered_for(status: TaskStatus) -> &'static [KanbanAction] {
        match status {
            TaskStatus::Todo => &[KanbanAction::Start],
            TaskStatus::InProgress => &[KanbanAction::Back, KanbanAction::Done],
            TaskStatus::Completed => &[KanbanAction::Reopen],
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            KanbanAction::Start => "Start",
            KanbanAction::Back => "Back",
            KanbanAction::Done => "Done",
            KanbanAction::Reopen => "Reopen",
        }
    }
}

/// The three board columns, each in source order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KanbanColumns<'a> {
    /// Not started
    pub todo: Vec<&'a Task>,
    /// Being worked on
    pub in_progress: Vec<&'a Task>,
    /// Done
    pub completed: Vec<&'a Task>,
}

impl<'a> KanbanColumns<'a> {
    /// Column for `status`.
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    /// `(todo, in_progress, completed)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.todo.len(), self.in_progress.len(), self.completed.len())
    }
}

/// Split tasks into board columns, preserving relative order.
pub fn partition_by_status(tasks: &[Task]) -> KanbanColumns<'_> {
    let mut columns = KanbanColumns::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => columns.todo.push(task),
            TaskStatus::InProgress => columns.in_progress.push(task),
            TaskStatus::Completed => columns.completed.push(task),
        }
    }
    columns
}
