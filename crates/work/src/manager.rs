//! Project service.
//!
//! Owns the in-memory portfolio and the store it persists to. Every mutation
//! runs through [`ProjectService::update_project`]: it edits a copy, refreshes
//! the derived progress, writes the whole collection, and only then replaces
//! the in-memory project. A failed write leaves memory exactly as it was.

use chrono::NaiveDate;
use fynkr_core::{
    NewProject, Payment, PaymentId, PaymentMethod, Project, ProjectId, ProjectStatus, Task,
    TaskId, TaskPriority, TaskStatus, TaskType, ValidationError,
};
use fynkr_progress::{client_directory, compute_progress, ClientSummary, PortfolioStats, ProjectQuery};
use fynkr_storage::{keys, load_collection, save_collection, KvStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::board::{KanbanAction, TaskBoard};
use crate::gateway::PaymentGateway;
use crate::ledger::{totals, PaymentLedger, PaymentTotals};
use crate::seed::demo_projects;
use crate::view::ClientProjectView;
use crate::{Result, WorkError};

/// The dashboard's single writer for projects, tasks and payments.
pub struct ProjectService<S: KvStore> {
    store: S,
    projects: Vec<Project>,
}

impl<S: KvStore> ProjectService<S> {
    /// Load the stored portfolio. Absent or malformed data starts empty.
    pub async fn open(store: S) -> Self {
        let projects: Vec<Project> = load_collection(&store, keys::PROJECTS).await;
        debug!(count = projects.len(), "projects loaded");
        Self { store, projects }
    }

    /// Like [`open`](Self::open), but writes the demo portfolio when nothing
    /// has been stored yet. Unreadable data opens empty and is left untouched.
    pub async fn open_or_seed(store: S) -> Result<Self> {
        let absent = match store.load(keys::PROJECTS).await {
            Ok(stored) => stored.is_none(),
            Err(e) => {
                warn!(error = %e, "stored projects unreadable, not seeding");
                false
            }
        };
        let mut service = Self::open(store).await;
        if absent {
            let seeded = demo_projects();
            save_collection(&mut service.store, keys::PROJECTS, &seeded).await?;
            info!(count = seeded.len(), "seeded demo projects");
            service.projects = seeded;
        }
        Ok(service)
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All projects in insertion order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Look up a project.
    pub fn project(&self, id: ProjectId) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(WorkError::ProjectNotFound(id))
    }

    /// Projects matching a search term and status tab.
    pub fn search(&self, query: &ProjectQuery) -> Vec<&Project> {
        query.apply(&self.projects)
    }

    /// Portfolio-wide counters.
    pub fn stats(&self) -> PortfolioStats {
        PortfolioStats::from_projects(&self.projects)
    }

    /// Per-client summaries.
    pub fn clients(&self) -> Vec<ClientSummary> {
        client_directory(&self.projects)
    }

    /// Read-only page for the project's client.
    pub fn client_view(&self, id: ProjectId) -> Result<ClientProjectView> {
        self.project(id).map(ClientProjectView::from_project)
    }

    /// Invoice totals of one project.
    pub fn totals(&self, id: ProjectId) -> Result<PaymentTotals> {
        self.project(id).map(|p| totals(&p.payments))
    }

    /// Validate and add a new project.
    pub async fn create_project(&mut self, input: NewProject) -> Result<Project> {
        let project = input.build()?;
        let snapshot: Vec<&Project> = self.projects.iter().chain(std::iter::once(&project)).collect();
        save_collection(&mut self.store, keys::PROJECTS, &snapshot).await?;

        info!(project_id = %project.id, name = %project.name, "project created");
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Change a project's engagement status.
    pub async fn set_project_status(&mut self, id: ProjectId, status: ProjectStatus) -> Result<&Project> {
        self.update_project(id, |project| {
            project.status = status;
            Ok(())
        })
        .await?;
        info!(project_id = %id, %status, "project status changed");
        self.project(id)
    }

    /// Add a `todo` task to a project.
    pub async fn add_task(
        &mut self,
        id: ProjectId,
        title: &str,
        kind: TaskType,
        priority: TaskPriority,
    ) -> Result<Task> {
        let task = self
            .update_project(id, |project| TaskBoard::new(&mut project.tasks).add_task(title, kind, priority))
            .await?;
        info!(project_id = %id, task_id = %task.id, "task added");
        Ok(task)
    }

    /// Move a task to another column. Unknown task ids change nothing.
    pub async fn change_status(&mut self, id: ProjectId, task_id: TaskId, status: TaskStatus) -> Result<&Project> {
        self.update_project(id, |project| {
            TaskBoard::new(&mut project.tasks).change_status(task_id, status);
            Ok(())
        })
        .await?;
        info!(project_id = %id, %task_id, %status, "task moved");
        self.project(id)
    }

    /// Apply a board shortcut.
    pub async fn apply_action(&mut self, id: ProjectId, task_id: TaskId, action: KanbanAction) -> Result<&Project> {
        self.change_status(id, task_id, action.target()).await
    }

    /// Remove a task. Unknown task ids change nothing.
    pub async fn delete_task(&mut self, id: ProjectId, task_id: TaskId) -> Result<&Project> {
        self.update_project(id, |project| {
            TaskBoard::new(&mut project.tasks).delete_task(task_id);
            Ok(())
        })
        .await?;
        info!(project_id = %id, %task_id, "task deleted");
        self.project(id)
    }

    /// Issue a pending invoice from raw form text.
    pub async fn create_invoice(
        &mut self,
        id: ProjectId,
        amount: &str,
        description: &str,
        due_date: &str,
    ) -> Result<Payment> {
        let payment = self
            .update_project(id, |project| {
                PaymentLedger::new(&mut project.payments).create_invoice(amount, description, due_date)
            })
            .await?;
        info!(project_id = %id, payment_id = %payment.id, amount = %payment.amount, "invoice created");
        Ok(payment)
    }

    /// Charge an invoice through `gateway` and record the settlement.
    ///
    /// Returns `Ok(None)` for an unknown payment id. An invoice that is
    /// already paid is returned as is without charging again. If `cancel`
    /// fires before the gateway answers, nothing is recorded and
    /// [`WorkError::Cancelled`] is returned.
    pub async fn settle_invoice(
        &mut self,
        id: ProjectId,
        payment_id: PaymentId,
        method: PaymentMethod,
        gateway: &dyn PaymentGateway,
        cancel: &CancellationToken,
    ) -> Result<Option<Payment>> {
        let payment = match self.project(id)?.payment(payment_id) {
            Some(payment) => payment.clone(),
            None => {
                debug!(project_id = %id, %payment_id, "settlement for unknown payment ignored");
                return Ok(None);
            }
        };
        if payment.is_paid() {
            debug!(%payment_id, "invoice already paid");
            return Ok(Some(payment));
        }

        let settlement = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(%payment_id, "payment cancelled");
                return Err(WorkError::Cancelled);
            }
            result = gateway.process(&payment, method) => result?,
        };

        let settled = self
            .update_project(id, |project| {
                PaymentLedger::new(&mut project.payments).mark_paid_at(
                    payment_id,
                    settlement.method,
                    settlement.settled_at,
                );
                Ok(project.payment(payment_id).cloned())
            })
            .await?;
        info!(project_id = %id, %payment_id, reference = %settlement.reference, "invoice paid");
        Ok(settled)
    }

    /// Flag every pending invoice due before `today` as overdue, across all
    /// projects. Returns the number flagged.
    pub async fn flag_overdue(&mut self, today: NaiveDate) -> Result<usize> {
        let mut updated = self.projects.clone();
        let flagged: usize = updated
            .iter_mut()
            .map(|p| PaymentLedger::new(&mut p.payments).flag_overdue(today))
            .sum();
        if flagged == 0 {
            return Ok(0);
        }

        save_collection(&mut self.store, keys::PROJECTS, &updated).await?;
        self.projects = updated;
        info!(flagged, %today, "invoices flagged overdue");
        Ok(flagged)
    }

    /// Apply `edit` to a copy of the project, recompute progress, persist,
    /// then commit. Validation failures return before anything is written.
    async fn update_project<T, F>(&mut self, id: ProjectId, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Project) -> std::result::Result<T, ValidationError>,
    {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(WorkError::ProjectNotFound(id))?;

        let mut updated = self.projects[index].clone();
        let output = edit(&mut updated)?;
        updated.progress = compute_progress(&updated.tasks);

        let snapshot: Vec<&Project> = self
            .projects
            .iter()
            .enumerate()
            .map(|(i, p)| if i == index { &updated } else { p })
            .collect();
        save_collection(&mut self.store, keys::PROJECTS, &snapshot).await?;

        self.projects[index] = updated;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use async_trait::async_trait;
    use fynkr_core::{Money, PaymentStatus};
    use fynkr_storage::{MemoryStore, StorageError};
    use crate::gateway::SimulatedGateway;

    /// Memory store whose writes can be switched off.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl KvStore for FlakyStore {
        async fn load(&self, key: &str) -> fynkr_storage::Result<Option<String>> {
            self.inner.load(key).await
        }

        async fn save(&mut self, key: &str, value: &str) -> fynkr_storage::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Other("disk full".into()));
            }
            self.inner.save(key, value).await
        }
    }

    /// Store whose reads always fail, like a file that is not valid UTF-8.
    #[derive(Clone, Default)]
    struct UnreadableStore {
        written: MemoryStore,
    }

    #[async_trait]
    impl KvStore for UnreadableStore {
        async fn load(&self, _key: &str) -> fynkr_storage::Result<Option<String>> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            )))
        }

        async fn save(&mut self, key: &str, value: &str) -> fynkr_storage::Result<()> {
            self.written.save(key, value).await
        }
    }

    async fn service_with_project() -> (ProjectService<MemoryStore>, ProjectId) {
        let mut service = ProjectService::open(MemoryStore::new()).await;
        let project = service
            .create_project(NewProject {
                name: "E-commerce Platform".into(),
                client: "TechCorp Inc.".into(),
                budget: "12500".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        (service, project.id)
    }

    async fn persisted(store: &MemoryStore) -> Vec<Project> {
        load_collection(store, keys::PROJECTS).await
    }

    #[tokio::test]
    async fn test_progress_follows_task_changes() {
        let (mut service, id) = service_with_project().await;
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(service.add_task(id, title, TaskType::Feature, TaskPriority::Medium).await.unwrap().id);
        }
        assert_eq!(service.project(id).unwrap().progress, 0);

        let project = service.change_status(id, ids[0], TaskStatus::Completed).await.unwrap();
        assert_eq!(project.progress, 33);

        service.add_task(id, "d", TaskType::Bug, TaskPriority::High).await.unwrap();
        assert_eq!(service.project(id).unwrap().progress, 25);

        let project = service.delete_task(id, ids[0]).await.unwrap();
        assert_eq!(project.progress, 0);
        assert_eq!(project.tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_persisted_progress_matches_tasks() {
        let (mut service, id) = service_with_project().await;
        let task = service.add_task(id, "a", TaskType::Feature, TaskPriority::Low).await.unwrap();
        service.add_task(id, "b", TaskType::Feature, TaskPriority::Low).await.unwrap();
        service.apply_action(id, task.id, KanbanAction::Done).await.unwrap();

        let stored = persisted(service.store()).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].progress, 50);
        assert_eq!(stored[0].progress, compute_progress(&stored[0].tasks));
        assert_eq!(stored.as_slice(), service.projects());
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let (mut service, id) = service_with_project().await;
        let before = persisted(service.store()).await;

        let err = service.add_task(id, "  ", TaskType::Bug, TaskPriority::High).await.unwrap_err();
        assert!(matches!(err, WorkError::Validation(ValidationError::Required { field: "title" })));
        let err = service.create_invoice(id, "-5", "Refund", "2024-06-01").await.unwrap_err();
        assert!(matches!(err, WorkError::Validation(ValidationError::NonPositiveAmount)));

        assert_eq!(persisted(service.store()).await, before);
        assert!(service.project(id).unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let (mut service, _) = service_with_project().await;
        let missing = ProjectId::new();

        assert!(matches!(service.project(missing), Err(WorkError::ProjectNotFound(_))));
        let err = service
            .add_task(missing, "a", TaskType::Feature, TaskPriority::Low)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkError::ProjectNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_unchanged() {
        let store = FlakyStore::default();
        let failing = store.failing.clone();
        let mut service = ProjectService::open(store).await;
        let project = service
            .create_project(NewProject {
                name: "SaaS Dashboard".into(),
                client: "DataViz Pro".into(),
                budget: "22000".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let task = service
            .add_task(project.id, "Charts", TaskType::Feature, TaskPriority::High)
            .await
            .unwrap();
        let before = service.projects().to_vec();

        failing.store(true, Ordering::SeqCst);
        let err = service
            .change_status(project.id, task.id, TaskStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkError::Storage(_)));
        assert!(service.add_task(project.id, "More", TaskType::Bug, TaskPriority::Low).await.is_err());
        assert!(service
            .create_project(NewProject {
                name: "x".into(),
                client: "y".into(),
                budget: "1".into(),
                ..Default::default()
            })
            .await
            .is_err());

        assert_eq!(service.projects(), before.as_slice());
    }

    #[tokio::test]
    async fn test_malformed_store_opens_empty() {
        let store = MemoryStore::new();
        store.insert(keys::PROJECTS, "{not json").await;

        let service = ProjectService::open(store).await;
        assert!(service.projects().is_empty());
    }

    #[tokio::test]
    async fn test_open_or_seed_only_seeds_once() {
        let store = MemoryStore::new();
        let mut service = ProjectService::open_or_seed(store.clone()).await.unwrap();
        assert_eq!(service.projects().len(), 5);
        assert_eq!(persisted(&store).await.len(), 5);

        let first = service.projects()[0].id;
        service.set_project_status(first, ProjectStatus::OnHold).await.unwrap();

        let reopened = ProjectService::open_or_seed(store).await.unwrap();
        assert_eq!(reopened.projects().len(), 5);
        assert_eq!(reopened.project(first).unwrap().status, ProjectStatus::OnHold);
    }

    #[tokio::test]
    async fn test_open_or_seed_leaves_unreadable_data_alone() {
        let store = UnreadableStore::default();
        let service = ProjectService::open_or_seed(store.clone()).await.unwrap();
        assert!(service.projects().is_empty());
        assert!(store.written.is_empty().await);
    }

    #[tokio::test]
    async fn test_open_or_seed_keeps_malformed_data() {
        let store = MemoryStore::new();
        store.insert(keys::PROJECTS, "{not json").await;

        let service = ProjectService::open_or_seed(store.clone()).await.unwrap();
        assert!(service.projects().is_empty());
        assert_eq!(store.load(keys::PROJECTS).await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_invoice_settlement_updates_totals() {
        let (mut service, id) = service_with_project().await;
        let invoice = service.create_invoice(id, "1000", "Milestone 2", "2024-06-01").await.unwrap();
        assert_eq!(service.totals(id).unwrap().pending, Money::from_units(1000));

        let gateway = SimulatedGateway::new(Duration::ZERO);
        let paid = service
            .settle_invoice(id, invoice.id, PaymentMethod::Stripe, &gateway, &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.method, Some(PaymentMethod::Stripe));
        assert!(paid.paid_at.is_some());
        let totals = service.totals(id).unwrap();
        assert_eq!(totals.paid, Money::from_units(1000));
        assert_eq!(totals.pending, Money::ZERO);
        assert_eq!(persisted(service.store()).await[0].payments[0], paid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_settlement_leaves_invoice_pending() {
        let (mut service, id) = service_with_project().await;
        let invoice = service.create_invoice(id, "1500", "Milestone 2", "2024-02-28").await.unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let gateway = SimulatedGateway::default();
        let err = service
            .settle_invoice(id, invoice.id, PaymentMethod::Paypal, &gateway, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkError::Cancelled));
        let stored = &persisted(service.store()).await[0];
        assert_eq!(stored.payments[0].status, PaymentStatus::Pending);
        assert_eq!(service.project(id).unwrap().payments[0].status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_settle_unknown_or_paid_invoice() {
        let (mut service, id) = service_with_project().await;
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let cancel = CancellationToken::new();

        let none = service
            .settle_invoice(id, PaymentId::new(), PaymentMethod::Stripe, &gateway, &cancel)
            .await
            .unwrap();
        assert!(none.is_none());

        let invoice = service.create_invoice(id, "10", "Final", "2024-03-15").await.unwrap();
        let first = service
            .settle_invoice(id, invoice.id, PaymentMethod::Stripe, &gateway, &cancel)
            .await
            .unwrap();
        let second = service
            .settle_invoice(id, invoice.id, PaymentMethod::Paypal, &gateway, &cancel)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_flag_overdue_across_projects() {
        let mut service = ProjectService::open_or_seed(MemoryStore::new()).await.unwrap();
        let today = fynkr_core::parse_due_date("2024-03-01").unwrap();

        // Milestone 2 (Feb 28), SaaS design phase (Feb 15) and banking kickoff (Jan 31)
        assert_eq!(service.flag_overdue(today).await.unwrap(), 3);
        assert_eq!(service.flag_overdue(today).await.unwrap(), 0);

        let ecommerce = &persisted(service.store()).await[0];
        assert_eq!(ecommerce.payments[1].status, PaymentStatus::Overdue);
        assert_eq!(ecommerce.payments[2].status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_search_and_stats() {
        let service = ProjectService::open_or_seed(MemoryStore::new()).await.unwrap();

        let query = ProjectQuery {
            term: Some("techcorp".into()),
            status: None,
        };
        let found = service.search(&query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "E-commerce Platform");

        let stats = service.stats();
        assert_eq!(stats.projects, 5);
        assert_eq!(stats.active, 3);
        assert_eq!(service.clients().len(), 5);
    }
}
