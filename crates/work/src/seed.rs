//! Demo portfolio written on first launch.

use chrono::{NaiveDate, TimeZone, Utc};
use fynkr_core::{
    Money, Payment, PaymentMethod, Project, ProjectStatus, Task, TaskPriority, TaskStatus,
    TaskType, Time,
};
use fynkr_progress::compute_progress;

fn at(y: i32, m: u32, d: u32) -> Time {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn task(title: &str, status: TaskStatus, kind: TaskType, priority: TaskPriority, created: Time) -> Task {
    let mut task = Task::new(title, kind, priority);
    task.created_at = created;
    task.set_status(status);
    if let Some(done) = task.completed_at.as_mut() {
        *done = created;
    }
    task
}

fn invoice(units: i64, description: &str, due: NaiveDate) -> Payment {
    Payment::new(Money::from_units(units), description, due)
}

struct Details<'a> {
    name: &'a str,
    client: &'a str,
    budget: i64,
    status: ProjectStatus,
    started: Time,
    deployment_url: Option<&'a str>,
    description: &'a str,
}

fn project(details: Details<'_>, tasks: Vec<Task>, payments: Vec<Payment>) -> Project {
    let mut project = Project::new(details.name, details.client, Money::from_units(details.budget));
    project.status = details.status;
    project.created_at = details.started;
    project.deployment_url = details.deployment_url.map(str::to_string);
    project.description = Some(details.description.to_string());
    project.progress = compute_progress(&tasks);
    project.tasks = tasks;
    project.payments = payments;
    project
}

/// Five sample projects covering every project, task and payment state.
pub fn demo_projects() -> Vec<Project> {
    use TaskPriority::*;
    use TaskStatus::*;
    use TaskType::*;

    let mut deposit = invoice(2_500, "Initial project payment (50%)", day(2024, 1, 30));
    deposit.settle(PaymentMethod::Stripe, at(2024, 1, 28));

    let ecommerce = project(
        Details {
            name: "E-commerce Platform",
            client: "TechCorp Inc.",
            budget: 12_500,
            status: ProjectStatus::Active,
            started: at(2024, 1, 1),
            deployment_url: Some("https://demo-ecommerce.vercel.app"),
            description: "Modern e-commerce platform with advanced features",
        },
        vec![
            task("Set up project structure", Completed, Feature, High, at(2024, 1, 16)),
            task("Design user interface", Completed, Feature, High, at(2024, 1, 18)),
            task("Implement core functionality", InProgress, Feature, High, at(2024, 1, 22)),
            task("Add responsive design", Todo, Improvement, Medium, at(2024, 2, 1)),
            task("Fix navigation bug", Todo, Bug, Low, at(2024, 2, 5)),
        ],
        vec![
            deposit,
            invoice(1_500, "Milestone 2 payment (30%)", day(2024, 2, 28)),
            invoice(1_000, "Final payment (20%)", day(2024, 3, 15)),
        ],
    );

    let banking = project(
        Details {
            name: "Mobile Banking App",
            client: "FinanceFlow",
            budget: 18_000,
            status: ProjectStatus::Active,
            started: at(2024, 1, 15),
            deployment_url: None,
            description: "Secure mobile banking application with biometric authentication",
        },
        vec![
            task("Biometric login flow", Completed, Feature, High, at(2024, 1, 16)),
            task("Account overview screen", Completed, Feature, High, at(2024, 1, 19)),
            task("Transfer between accounts", Completed, Feature, High, at(2024, 1, 24)),
            task("Push notifications", InProgress, Feature, Medium, at(2024, 1, 29)),
            task("Session timeout ignored on resume", Todo, Bug, High, at(2024, 2, 2)),
        ],
        vec![invoice(9_000, "Kickoff payment (50%)", day(2024, 1, 31))],
    );

    let brand = project(
        Details {
            name: "Brand Identity Package",
            client: "Creative Studio",
            budget: 5_500,
            status: ProjectStatus::Completed,
            started: at(2023, 12, 1),
            deployment_url: None,
            description: "Complete brand identity design including logo, guidelines, and assets",
        },
        vec![
            task("Logo concepts", Completed, Feature, High, at(2023, 12, 2)),
            task("Brand guidelines", Completed, Feature, Medium, at(2023, 12, 10)),
            task("Asset export", Completed, Improvement, Low, at(2024, 1, 5)),
        ],
        Vec::new(),
    );

    let saas = project(
        Details {
            name: "SaaS Dashboard",
            client: "DataViz Pro",
            budget: 22_000,
            status: ProjectStatus::Active,
            started: at(2024, 1, 20),
            deployment_url: Some("https://demo-saas.vercel.app"),
            description: "Analytics dashboard with real-time data visualization",
        },
        vec![
            task("Data ingestion pipeline", Completed, Feature, High, at(2024, 1, 21)),
            task("Real-time charts", Completed, Feature, High, at(2024, 1, 25)),
            task("Team workspaces", InProgress, Feature, Medium, at(2024, 2, 1)),
            task("Export to CSV", Todo, Improvement, Low, at(2024, 2, 3)),
            task("Chart tooltips overflow", Todo, Bug, Medium, at(2024, 2, 4)),
        ],
        vec![invoice(6_600, "Design phase payment (30%)", day(2024, 2, 15))],
    );

    let marketing = project(
        Details {
            name: "Marketing Website",
            client: "StartupX",
            budget: 8_000,
            status: ProjectStatus::OnHold,
            started: at(2024, 1, 25),
            deployment_url: None,
            description: "Marketing website with lead generation features",
        },
        vec![
            task("Landing page copy", Completed, Feature, Medium, at(2024, 1, 26)),
            task("Lead capture form", Todo, Feature, Medium, at(2024, 1, 29)),
            task("Blog section", Todo, Feature, Low, at(2024, 2, 1)),
            task("SEO metadata", Todo, Improvement, Low, at(2024, 2, 2)),
        ],
        Vec::new(),
    );

    vec![ecommerce, banking, brand, saas, marketing]
}
