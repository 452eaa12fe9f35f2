//! Fynkr CLI - freelancer project dashboard.

mod config;
mod render;

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use fynkr_core::{
    parse_due_date, AccessLevel, NewProject, PaymentId, PaymentMethod, ProjectId, ProjectStatus,
    TaskId, TaskPriority, TaskStatus, TaskType, UserProfile,
};
use fynkr_progress::ProjectQuery;
use fynkr_storage::JsonFileStore;
use fynkr_work::{
    sample_message, AppContext, InvitationService, InviteRequest, InviteTimings, KanbanAction,
    ProjectService, SimulatedGateway,
};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "fynkr")]
#[command(about = "Freelancer project dashboard", long_about = None)]
struct Cli {
    /// Directory holding stored data (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage a project's kanban board
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage a project's invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Client directory and client views
    #[command(subcommand)]
    Client(ClientCommand),
    /// Invite clients to their dashboard
    #[command(subcommand)]
    Invite(InviteCommand),
    /// Show portfolio status
    Stats,
    /// View or change preferences
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Write a config file with default values
    ConfigInit {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// List projects
    List {
        /// Match name or client (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Status tab (active, completed, on-hold)
        #[arg(long)]
        status: Option<ProjectStatus>,
    },
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        client: String,
        #[arg(long)]
        budget: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show project details
    Show { project: ProjectId },
    /// Change a project's status
    Status { project: ProjectId, status: ProjectStatus },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to the todo column
    Add {
        project: ProjectId,
        title: String,
        #[arg(long = "type", default_value = "feature")]
        kind: TaskType,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
    },
    /// Move a task to any column
    Move { project: ProjectId, task: TaskId, status: TaskStatus },
    /// Move a task to in-progress
    Start { project: ProjectId, task: TaskId },
    /// Move a task back to todo
    Back { project: ProjectId, task: TaskId },
    /// Move a task to completed
    Done { project: ProjectId, task: TaskId },
    /// Move a completed task back to in-progress
    Reopen { project: ProjectId, task: TaskId },
    /// Delete a task
    Delete { project: ProjectId, task: TaskId },
    /// Show the kanban board
    Board { project: ProjectId },
}

#[derive(Subcommand)]
enum InvoiceCommand {
    /// Issue a pending invoice
    Create {
        project: ProjectId,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,
    },
    /// Pay an invoice through the simulated processor
    Pay {
        project: ProjectId,
        payment: PaymentId,
        #[arg(long, default_value = "stripe")]
        method: PaymentMethod,
    },
    /// List a project's invoices
    List { project: ProjectId },
    /// Flag pending invoices past their due date
    FlagOverdue {
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
enum ClientCommand {
    /// List clients
    List,
    /// Print the client-facing view of a project as JSON
    View { project: ProjectId },
}

#[derive(Subcommand)]
enum InviteCommand {
    /// Send an invitation
    Send {
        #[arg(long)]
        client_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        project: String,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long, default_value = "view-only")]
        access: AccessLevel,
    },
    /// List sent invitations
    List,
    /// Print a sample invitation message
    Sample {
        #[arg(long, default_value = "")]
        client_name: String,
        #[arg(long, default_value = "")]
        project: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show preferences
    Show,
    /// Toggle dark mode
    DarkMode,
    /// Set or clear the current user
    User {
        #[arg(long, required_unless_present = "clear")]
        name: Option<String>,
        #[arg(long, required_unless_present = "clear")]
        email: Option<String>,
        #[arg(long, conflicts_with_all = ["name", "email"])]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    if let Commands::ConfigInit { force } = cli.command {
        if config_path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", config_path.display());
        }
        CliConfig::default().save_to(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }
    let config = CliConfig::load_from(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let store = JsonFileStore::new(&data_dir).await?;
    info!(data_dir = %store.root().display(), "opened store");

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Project(cmd) => project_command(cmd, store).await,
        Commands::Task(cmd) => task_command(cmd, store).await,
        Commands::Invoice(cmd) => invoice_command(cmd, store, &config, &cancel).await,
        Commands::Client(cmd) => client_command(cmd, store).await,
        Commands::Invite(cmd) => invite_command(cmd, store, &config, &cancel).await,
        Commands::Stats => {
            let service = ProjectService::open_or_seed(store).await?;
            render::stats(&service.stats());
            Ok(())
        }
        Commands::Settings(cmd) => settings_command(cmd, store).await,
        Commands::ConfigInit { .. } => Ok(()),
    }
}

async fn project_command(cmd: ProjectCommand, store: JsonFileStore) -> Result<()> {
    let mut service = ProjectService::open_or_seed(store).await?;
    match cmd {
        ProjectCommand::List { search, status } => {
            let projects = service.search(&ProjectQuery { term: search, status });
            println!("Projects ({})", projects.len());
            for project in projects {
                render::project_line(project);
            }
        }
        ProjectCommand::Create { name, client, budget, url, description } => {
            let project = service
                .create_project(NewProject {
                    name,
                    client,
                    budget,
                    deployment_url: url,
                    description,
                })
                .await?;
            println!("Created project: {} - {}", project.id, project.name);
        }
        ProjectCommand::Show { project } => render::project(service.project(project)?),
        ProjectCommand::Status { project, status } => {
            let project = service.set_project_status(project, status).await?;
            println!("{} is now {}", project.name, project.status);
        }
    }
    Ok(())
}

async fn task_command(cmd: TaskCommand, store: JsonFileStore) -> Result<()> {
    let mut service = ProjectService::open_or_seed(store).await?;
    let (project, task, action) = match cmd {
        TaskCommand::Add { project, title, kind, priority } => {
            let task = service.add_task(project, &title, kind, priority).await?;
            println!("Added task: {} - {}", task.id, task.title);
            println!("Progress: {}%", service.project(project)?.progress);
            return Ok(());
        }
        TaskCommand::Move { project, task, status } => {
            let updated = service.change_status(project, task, status).await?;
            println!("Progress: {}%", updated.progress);
            return Ok(());
        }
        TaskCommand::Delete { project, task } => {
            let updated = service.delete_task(project, task).await?;
            println!("{} tasks left, progress: {}%", updated.tasks.len(), updated.progress);
            return Ok(());
        }
        TaskCommand::Board { project } => {
            render::board(service.project(project)?);
            return Ok(());
        }
        TaskCommand::Start { project, task } => (project, task, KanbanAction::Start),
        TaskCommand::Back { project, task } => (project, task, KanbanAction::Back),
        TaskCommand::Done { project, task } => (project, task, KanbanAction::Done),
        TaskCommand::Reopen { project, task } => (project, task, KanbanAction::Reopen),
    };

    let updated = service.apply_action(project, task, action).await?;
    println!("{}: progress {}%", action.label(), updated.progress);
    Ok(())
}

async fn invoice_command(
    cmd: InvoiceCommand,
    store: JsonFileStore,
    config: &CliConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut service = ProjectService::open_or_seed(store).await?;
    match cmd {
        InvoiceCommand::Create { project, amount, description, due } => {
            let payment = service.create_invoice(project, &amount, &description, &due).await?;
            println!("Created invoice: {} - {} due {}", payment.id, payment.amount, payment.due_date);
        }
        InvoiceCommand::Pay { project, payment, method } => {
            let gateway = SimulatedGateway::new(Duration::from_millis(config.payment_delay_ms));
            println!("Processing payment via {method}...");
            match service.settle_invoice(project, payment, method, &gateway, cancel).await? {
                Some(paid) => {
                    println!("Payment received:");
                    render::payment_line(&paid);
                }
                None => println!("Invoice not found"),
            }
        }
        InvoiceCommand::List { project } => render::payments(&service.project(project)?.payments),
        InvoiceCommand::FlagOverdue { today } => {
            let today = match today {
                Some(raw) => parse_due_date(&raw)?,
                None => today_local(),
            };
            let flagged = service.flag_overdue(today).await?;
            println!("Flagged {flagged} overdue invoice(s)");
        }
    }
    Ok(())
}

fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn client_command(cmd: ClientCommand, store: JsonFileStore) -> Result<()> {
    let service = ProjectService::open_or_seed(store).await?;
    match cmd {
        ClientCommand::List => render::clients(&service.clients()),
        ClientCommand::View { project } => {
            let view = service.client_view(project)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

async fn invite_command(
    cmd: InviteCommand,
    store: JsonFileStore,
    config: &CliConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let delays = &config.invite_stage_delays_ms;
    let mut service = InvitationService::new(store, config.invite_base_url.as_str()).with_timings(InviteTimings {
        preparing: Duration::from_millis(delays.preparing),
        generating_link: Duration::from_millis(delays.generating_link),
        sending: Duration::from_millis(delays.sending),
    });

    match cmd {
        InviteCommand::Send { client_name, email, project, message, access } => {
            let mut stages = service.subscribe();
            let progress = tokio::spawn(async move {
                while stages.changed().await.is_ok() {
                    let stage = *stages.borrow_and_update();
                    eprintln!("{stage}");
                }
            });

            let result = service
                .send(
                    InviteRequest {
                        client_name,
                        client_email: email,
                        project_name: project,
                        message,
                        access_level: access,
                    },
                    cancel,
                )
                .await;
            drop(service);
            join_stage_printer(progress).await;

            let invitation = result?;
            println!(
                "Invitation sent! {} will receive access instructions via email",
                invitation.client_name
            );
            render::invitation(&invitation);
        }
        InviteCommand::List => {
            let invitations = service.list().await;
            println!("Invitations ({})", invitations.len());
            for invitation in &invitations {
                render::invitation(invitation);
            }
        }
        InviteCommand::Sample { client_name, project } => {
            println!("{}", sample_message(&client_name, &project));
        }
    }
    Ok(())
}

/// Wait for the stage printer; a panic in it is logged, not raised.
async fn join_stage_printer(printer: tokio::task::JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "invite progress printer failed");
            false
        }
    }
}

async fn settings_command(cmd: SettingsCommand, store: JsonFileStore) -> Result<()> {
    let mut context = AppContext::load(store).await;
    match cmd {
        SettingsCommand::Show => render::settings(&context.snapshot()),
        SettingsCommand::DarkMode => {
            let on = context.toggle_dark_mode().await?;
            println!("Dark mode {}", if on { "enabled" } else { "disabled" });
        }
        SettingsCommand::User { name, email, clear } => {
            let user = match (clear, name, email) {
                (false, Some(name), Some(email)) => Some(UserProfile { name, email }),
                _ => None,
            };
            render::settings(&context.set_current_user(user).await?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_printer_failure_is_reported() {
        assert!(join_stage_printer(tokio::spawn(async {})).await);

        let failing = tokio::spawn(async { panic!("stdout closed") });
        assert!(!join_stage_printer(failing).await);
    }

    #[test]
    fn test_parse_task_add_defaults() {
        let id = ProjectId::new();
        let cli = Cli::try_parse_from(["fynkr", "task", "add", &id.to_string(), "Fix navigation bug"]).unwrap();
        match cli.command {
            Commands::Task(TaskCommand::Add { project, title, kind, priority }) => {
                assert_eq!(project, id);
                assert_eq!(title, "Fix navigation bug");
                assert_eq!(kind, TaskType::Feature);
                assert_eq!(priority, TaskPriority::Medium);
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let id = ProjectId::new().to_string();
        assert!(Cli::try_parse_from(["fynkr", "project", "status", &id, "archived"]).is_err());
        assert!(Cli::try_parse_from(["fynkr", "project", "status", &id, "on-hold"]).is_ok());
    }

    #[test]
    fn test_parse_global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["fynkr", "stats", "--data-dir", "/tmp/fynkr"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/fynkr")));
    }

    #[test]
    fn test_parse_settings_user_requires_fields_or_clear() {
        assert!(Cli::try_parse_from(["fynkr", "settings", "user"]).is_err());
        assert!(Cli::try_parse_from(["fynkr", "settings", "user", "--clear"]).is_ok());
        assert!(Cli::try_parse_from(["fynkr", "settings", "user", "--name", "Alex", "--email", "a@b.co"]).is_ok());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
