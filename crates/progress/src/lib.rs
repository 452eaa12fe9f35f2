//! Progress Tracking
//!
//! Task-based completion percentages, portfolio statistics and the client
//! directory. Everything here is a pure function of the project list.

pub mod calculator;
pub mod portfolio;
pub mod clients;

pub use calculator::{compute_progress, percentage, TaskBreakdown};
pub use portfolio::{PortfolioStats, ProjectQuery};
pub use clients::{client_directory, ClientSummary};
