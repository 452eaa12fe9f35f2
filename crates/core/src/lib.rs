//! Fynkr core data models.
//!
//! This crate defines the records behind the freelancer dashboard: projects,
//! their kanban tasks and invoices, client invitations and user settings.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;
mod money;

// Project management
mod project;
mod task;
mod payment;

// Clients & preferences
mod invitation;
mod settings;

// Re-exports
pub use id::*;
pub use error::{ValidationError, Result};
pub use money::Money;

pub use project::{Project, ProjectStatus, NewProject};
pub use task::{Task, TaskStatus, TaskType, TaskPriority};
pub use payment::{Payment, PaymentStatus, PaymentMethod, parse_due_date};

pub use invitation::{ClientInvitation, AccessLevel, InvitationStatus, INVITE_VALIDITY_DAYS};
pub use settings::{Settings, UserProfile};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
