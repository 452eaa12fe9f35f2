//! Work Management
//!
//! Kanban board, invoice ledger, project service, client invitations and
//! the application context.

#![warn(missing_docs)]

pub mod board;
pub mod context;
pub mod error;
pub mod gateway;
pub mod invite;
pub mod ledger;
pub mod manager;
pub mod seed;
pub mod view;

pub use board::{partition_by_status, KanbanAction, KanbanColumns, TaskBoard};
pub use context::AppContext;
pub use error::{Result, WorkError};
pub use gateway::{PaymentGateway, Settlement, SimulatedGateway};
pub use invite::{sample_message, InvitationService, InviteRequest, InviteStage, InviteTimings};
pub use ledger::{totals, PaymentLedger, PaymentTotals};
pub use manager::ProjectService;
pub use seed::demo_projects;
pub use view::ClientProjectView;
