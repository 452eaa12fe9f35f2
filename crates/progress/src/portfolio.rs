//! Portfolio-level statistics and project filtering.

use fynkr_core::{Money, Project, ProjectStatus};
use serde::Serialize;
use crate::calculator::percentage;

/// Aggregate figures across all projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    /// Number of projects
    pub projects: usize,

    /// Projects per status
    pub active: usize,
    pub completed: usize,
    pub on_hold: usize,

    /// Sum of all budgets
    pub total_budget: Money,

    /// Mean project progress, rounded half-up, 0 with no projects
    pub average_progress: u8,

    /// Tasks across all projects
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

impl PortfolioStats {
    /// Compute statistics for a set of projects.
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut stats = Self {
            projects: projects.len(),
            ..Self::default()
        };
        let mut progress_sum = 0usize;

        for project in projects {
            match project.status {
                ProjectStatus::Active => stats.active += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::OnHold => stats.on_hold += 1,
            }
            stats.total_budget += project.budget;
            stats.total_tasks += project.tasks.len();
            stats.completed_tasks += project.tasks.iter().filter(|t| t.is_completed()).count();
            progress_sum += usize::from(project.progress);
        }

        if !projects.is_empty() {
            // mean of percentages, not a share: plain half-up rounding
            let n = projects.len();
            stats.average_progress = ((2 * progress_sum + n) / (2 * n)) as u8;
        }
        stats
    }

    /// Share of all tasks that are completed.
    pub fn task_completion(&self) -> u8 {
        percentage(self.completed_tasks, self.total_tasks)
    }
}

/// Search term plus status tab, as used by project listings.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Case-insensitive substring of the project name or client
    pub term: Option<String>,

    /// `None` is the "all" tab
    pub status: Option<ProjectStatus>,
}

impl ProjectQuery {
    /// Whether `project` passes both the search and the tab.
    pub fn matches(&self, project: &Project) -> bool {
        let matches_tab = self.status.map_or(true, |s| project.status == s);
        let matches_term = match self.term.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                project.name.to_lowercase().contains(&needle)
                    || project.client.to_lowercase().contains(&needle)
            }
        };
        matches_tab && matches_term
    }

    /// Filter `projects`, keeping their order.
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, client: &str, status: ProjectStatus, budget: i64, progress: u8) -> Project {
        let mut p = Project::new(name, client, Money::from_units(budget));
        p.status = status;
        p.progress = progress;
        p
    }

    fn demo() -> Vec<Project> {
        vec![
            project("E-commerce Platform", "TechCorp Inc.", ProjectStatus::Active, 12_500, 85),
            project("Mobile Banking App", "FinanceFlow", ProjectStatus::Active, 18_000, 60),
            project("Brand Identity Package", "Creative Studio", ProjectStatus::Completed, 5_500, 100),
            project("Marketing Website", "StartupX", ProjectStatus::OnHold, 8_000, 25),
        ]
    }

    #[test]
    fn test_stats() {
        let stats = PortfolioStats::from_projects(&demo());
        assert_eq!(stats.projects, 4);
        assert_eq!((stats.active, stats.completed, stats.on_hold), (2, 1, 1));
        assert_eq!(stats.total_budget, Money::from_units(44_000));
        // (85 + 60 + 100 + 25) / 4 = 67.5
        assert_eq!(stats.average_progress, 68);
    }

    #[test]
    fn test_stats_without_projects() {
        let stats = PortfolioStats::from_projects(&[]);
        assert_eq!(stats.average_progress, 0);
        assert_eq!(stats.task_completion(), 0);
    }

    #[test]
    fn test_query_matches_name_or_client() {
        let projects = demo();
        let by_client = ProjectQuery { term: Some("financeflow".into()), status: None };
        let names: Vec<_> = by_client.apply(&projects).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mobile Banking App"]);

        let active_with_app = ProjectQuery {
            term: Some("a".into()),
            status: Some(ProjectStatus::Active),
        };
        assert_eq!(active_with_app.apply(&projects).len(), 2);

        assert_eq!(ProjectQuery::default().apply(&projects).len(), 4);
    }
}
