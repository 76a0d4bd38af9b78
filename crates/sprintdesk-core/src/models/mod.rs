//! Data models for plans, clients and their tasks.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures apart from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use sprintdesk_core::models::{SprintNumber, TaskStatus};
//!
//! let sprint = SprintNumber::new(3)?;
//! assert_eq!(sprint.key().to_string(), "sprint-3");
//! assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Done));
//! # Ok::<(), sprintdesk_core::TrackerError>(())
//! ```

pub mod board;
pub mod client;
pub mod plan;
pub mod requests;
pub mod sprint;
pub mod status;
pub mod task;

#[cfg(test)]
mod tests;

pub use board::SprintBoard;
pub use client::Client;
pub use plan::{Plan, PlanTask, PlanTaskStep};
pub use requests::{ClientTaskDraft, ClientTaskStepDraft};
pub use sprint::{calendar_week_key, SprintKey, SprintNumber};
pub use status::{CreatedBy, TaskStatus};
pub use task::{ClientTask, ClientTaskStep};
