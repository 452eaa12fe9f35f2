//! Task model - a card on a project's kanban board.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::TaskId;
use crate::Time;

/// A unit of work belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Display title, never empty
    pub title: String,

    /// Kanban column the task sits in
    pub status: TaskStatus,

    /// Classification (no behavioral effect)
    #[serde(rename = "type")]
    pub kind: TaskType,

    /// Display/sort hint
    pub priority: TaskPriority,

    /// Creation timestamp, immutable
    pub created_at: Time,

    /// When the task last entered `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Time>,
}

impl Task {
    /// Create a new `todo` task stamped with the current time.
    ///
    /// Callers are expected to have validated `title`; see `TaskBoard::add_task`.
    pub fn new(title: impl Into<String>, kind: TaskType, priority: TaskPriority) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            status: TaskStatus::Todo,
            kind,
            priority,
            created_at: chrono::Utc::now(),
            completed_at: None,
        }
    }

    /// Whether the task is in the `completed` column.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Write a new status.
    ///
    /// Any status is reachable from any other. `completed_at` is stamped on
    /// entry into `completed` and cleared on exit, so leaving and re-entering
    /// the same status restores every other field.
    pub fn set_status(&mut self, status: TaskStatus) {
        match (self.status, status) {
            (TaskStatus::Completed, TaskStatus::Completed) => {}
            (_, TaskStatus::Completed) => self.completed_at = Some(chrono::Utc::now()),
            _ => self.completed_at = None,
        }
        self.status = status;
    }
}

/// Kanban column of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Finished (can be reopened)
    Completed,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Column heading shown on the board.
    pub fn column_title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::unknown("task status", other)),
        }
    }
}

/// Task classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// New functionality
    Feature,
    /// Defect fix
    Bug,
    /// Enhancement of existing work
    Improvement,
}

impl TaskType {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Feature => "feature",
            TaskType::Bug => "bug",
            TaskType::Improvement => "improvement",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feature" => Ok(TaskType::Feature),
            "bug" => Ok(TaskType::Bug),
            "improvement" => Ok(TaskType::Improvement),
            other => Err(ValidationError::unknown("task type", other)),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    Medium,
    /// Do first.
    High,
}

impl TaskPriority {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(ValidationError::unknown("task priority", other)),
        }
    }
}
