//! Project model - a client engagement with its board and ledger.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::{PaymentId, ProjectId, TaskId};
use crate::money::Money;
use crate::payment::Payment;
use crate::task::Task;
use crate::Time;

/// A project owns its tasks and payments exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Client label
    pub client: String,

    /// Engagement status
    pub status: ProjectStatus,

    /// Agreed budget, never negative
    pub budget: Money,

    /// Percentage of completed tasks (0-100), derived from `tasks`
    pub progress: u8,

    /// Kanban tasks in insertion order
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Invoices in insertion order
    #[serde(default)]
    pub payments: Vec<Payment>,

    /// Live deployment link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,

    /// Short description for the client view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When created
    pub created_at: Time,
}

impl Project {
    /// Create an active project with no tasks.
    pub fn new(name: impl Into<String>, client: impl Into<String>, budget: Money) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            client: client.into(),
            status: ProjectStatus::Active,
            budget,
            progress: 0,
            tasks: Vec::new(),
            payments: Vec::new(),
            deployment_url: None,
            description: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Look up a task.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a payment.
    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }
}

/// Engagement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Work ongoing
    Active,
    /// Delivered
    Completed,
    /// Paused
    OnHold,
}

impl ProjectStatus {
    /// All statuses in display order.
    pub const ALL: [ProjectStatus; 3] = [ProjectStatus::Active, ProjectStatus::Completed, ProjectStatus::OnHold];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "on-hold" | "on_hold" | "onhold" => Ok(ProjectStatus::OnHold),
            other => Err(ValidationError::unknown("project status", other)),
        }
    }
}

/// Input for creating a project; every field is raw form text.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Required
    pub name: String,
    /// Required
    pub client: String,
    /// Decimal amount, zero or more
    pub budget: String,
    /// Blank counts as unset
    pub deployment_url: Option<String>,
    /// Blank counts as unset
    pub description: Option<String>,
}

impl NewProject {
    /// Validate and build the project.
    pub fn build(self) -> Result<Project, ValidationError> {
        let name = required("name", &self.name)?;
        let client = required("client", &self.client)?;
        let budget: Money = required("budget", &self.budget)?.parse()?;
        if budget.is_negative() {
            return Err(ValidationError::NegativeBudget);
        }

        let mut project = Project::new(name, client, budget);
        project.deployment_url = non_blank(self.deployment_url);
        project.description = non_blank(self.description);
        Ok(project)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
