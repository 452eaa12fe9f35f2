//! Read-only project page shared with an invited client.

use fynkr_core::{Project, ProjectStatus, Task};
use fynkr_progress::TaskBreakdown;
use serde::Serialize;
use crate::ledger::{totals, PaymentTotals};

/// What a client sees of a project. Nothing here can be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProjectView {
    /// Project name
    pub name: String,
    /// Client name
    pub client: String,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Completion percentage
    pub progress: u8,
    /// Task counts by column
    pub breakdown: TaskBreakdown,
    /// Tasks in insertion order
    pub tasks: Vec<Task>,
    /// Invoice sums
    pub payments: PaymentTotals,
    /// Live preview, when deployed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    /// Free-text summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClientProjectView {
    /// Build the view from the stored project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client: project.client.clone(),
            status: project.status,
            progress: project.progress,
            breakdown: TaskBreakdown::from_tasks(&project.tasks),
            tasks: project.tasks.clone(),
            payments: totals(&project.payments),
            deployment_url: project.deployment_url.clone(),
            description: project.description.clone(),
        }
    }
}
