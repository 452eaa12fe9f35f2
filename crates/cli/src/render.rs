//! Terminal output.

use fynkr_core::{ClientInvitation, Payment, Project, Settings, Task, TaskStatus};
use fynkr_progress::{ClientSummary, PortfolioStats};
use fynkr_work::{partition_by_status, totals, KanbanAction};

pub fn project_line(project: &Project) {
    println!(
        "  {} | {:<9} | {:>3}% | {:>12} | {} ({})",
        project.id,
        project.status,
        project.progress,
        project.budget.to_string(),
        project.name,
        project.client,
    );
}

pub fn project(project: &Project) {
    println!("Project: {}", project.name);
    println!("  ID: {}", project.id);
    println!("  Client: {}", project.client);
    println!("  Status: {}", project.status);
    println!("  Budget: {}", project.budget);
    println!("  Progress: {}%", project.progress);
    if let Some(url) = &project.deployment_url {
        println!("  Deployment: {url}");
    }
    if let Some(description) = &project.description {
        println!("  Description: {description}");
    }
    println!("  Created: {}", project.created_at.format("%Y-%m-%d"));
    println!("  Tasks: {}", project.tasks.len());
    payments(&project.payments);
}

fn task_line(task: &Task) {
    let actions: Vec<_> = KanbanAction::offered_for(task.status)
        .iter()
        .map(|a| a.label())
        .collect();
    println!(
        "    {} | {:<11} | {:<6} | {} [{}]",
        task.id,
        task.kind,
        task.priority,
        task.title,
        actions.join(", "),
    );
}

pub fn board(project: &Project) {
    let columns = partition_by_status(&project.tasks);
    println!("{} - {}% complete", project.name, project.progress);
    for status in TaskStatus::ALL {
        let column = columns.column(status);
        println!("  {} ({})", status.column_title(), column.len());
        for task in column {
            task_line(task);
        }
    }
}

pub fn payment_line(payment: &Payment) {
    let settled = match (payment.method, payment.paid_at) {
        (Some(method), Some(at)) => format!(" via {} on {}", method, at.format("%Y-%m-%d")),
        _ => String::new(),
    };
    println!(
        "    {} | {:<7} | {:>12} | due {} | {}{}",
        payment.id,
        payment.status,
        payment.amount.to_string(),
        payment.due_date,
        payment.description,
        settled,
    );
}

pub fn payments(payments: &[Payment]) {
    let totals = totals(payments);
    println!(
        "  Payments: {} total, {} paid, {} pending",
        totals.total, totals.paid, totals.pending
    );
    for payment in payments {
        payment_line(payment);
    }
}

pub fn stats(stats: &PortfolioStats) {
    println!("Fynkr Status");
    println!("  Projects: {}", stats.projects);
    println!("    active: {}", stats.active);
    println!("    completed: {}", stats.completed);
    println!("    on-hold: {}", stats.on_hold);
    println!("  Total budget: {}", stats.total_budget);
    println!("  Average progress: {}%", stats.average_progress);
    println!(
        "  Tasks: {}/{} completed ({}%)",
        stats.completed_tasks,
        stats.total_tasks,
        stats.task_completion()
    );
}

pub fn clients(clients: &[ClientSummary]) {
    println!("Clients ({})", clients.len());
    for client in clients {
        println!(
            "  {:<20} | {:<9} | {} projects ({} active) | {}",
            client.name, client.status, client.projects, client.active_projects, client.total_value,
        );
    }
}

pub fn invitation(invitation: &ClientInvitation) {
    println!(
        "  {} | {} <{}> | {} | {} | expires {}",
        invitation.id,
        invitation.client_name,
        invitation.client_email,
        invitation.project_name,
        invitation.access_level,
        invitation.expires_at.format("%Y-%m-%d"),
    );
    println!("    {}", invitation.invite_link);
}

pub fn settings(settings: &Settings) {
    println!("Settings");
    println!("  Dark mode: {}", if settings.dark_mode { "on" } else { "off" });
    match &settings.current_user {
        Some(user) => println!("  User: {} <{}>", user.name, user.email),
        None => println!("  User: (not set)"),
    }
}
