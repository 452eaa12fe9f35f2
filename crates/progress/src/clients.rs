//! Client directory derived from the project list.

use std::collections::BTreeMap;
use fynkr_core::{Money, Project, ProjectStatus};
use serde::Serialize;

/// One client with its engagement figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// Client label as written on the projects
    pub name: String,
    /// Number of projects for this client
    pub projects: usize,
    /// Projects still active
    pub active_projects: usize,
    /// Sum of project budgets
    pub total_value: Money,
    /// Derived relationship status
    pub status: ProjectStatus,
}

/// Group projects by client label, sorted by name.
///
/// A client is `active` while any project is active, `completed` once every
/// project is completed, and `on-hold` otherwise.
pub fn client_directory(projects: &[Project]) -> Vec<ClientSummary> {
    let mut grouped: BTreeMap<&str, Vec<&Project>> = BTreeMap::new();
    for project in projects {
        grouped.entry(project.client.trim()).or_default().push(project);
    }

    grouped
        .into_iter()
        .map(|(name, projects)| {
            let active_projects = projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count();
            let status = if active_projects > 0 {
                ProjectStatus::Active
            } else if projects.iter().all(|p| p.status == ProjectStatus::Completed) {
                ProjectStatus::Completed
            } else {
                ProjectStatus::OnHold
            };
            ClientSummary {
                name: name.to_string(),
                projects: projects.len(),
                active_projects,
                total_value: projects.iter().map(|p| p.budget).sum(),
                status,
            }
        })
        .collect()
}
