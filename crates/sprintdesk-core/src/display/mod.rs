//! Display formatting for domain models and operation results.
//!
//! Models implement [`std::fmt::Display`] directly (see [`models`]) and
//! produce markdown that the CLI renders in the terminal. The wrappers in
//! this module add context on top of that: a list of clients prints
//! differently from a single client, and a creation result prints a
//! confirmation line before the resource.
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌─────────────┐
//! │  Domain Models   │    │ Wrappers & Board │    │  Formatted  │
//! │ (Plan, Client,   │───▶│  Result Types    │───▶│   Output    │
//! │  ClientTask)     │    │                  │    │ (Terminal)  │
//! └──────────────────┘    └──────────────────┘    └─────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: collection wrappers (Plans, PlanTasks, Clients, ClientTasks)
//! - [`results`]: operation results (CreateResult, UpdateResult, DeleteResult)
//! - [`status`]: confirmation messages (OperationStatus)
//! - [`board`]: the sprint board and the plain-text weekly summary
//! - [`outcomes`]: generation, advance and dashboard output
//! - [`datetime`]: timestamp formatting
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage
//!
//! ```rust
//! use sprintdesk_core::{display::CreateResult, models::Client};
//! use jiff::Timestamp;
//!
//! let client = Client {
//!     id: 7,
//!     name: "Acme".to_string(),
//!     slug: "acme".to_string(),
//!     plan_id: None,
//!     current_sprint: None,
//!     created_at: Timestamp::now(),
//! };
//!
//! let output = CreateResult::new(client).to_string();
//! assert!(output.starts_with("Created client with ID: 7"));
//! assert!(output.contains("acme"));
//! ```

pub mod board;
pub mod collections;
pub mod datetime;
pub mod models;
pub mod outcomes;
pub mod results;
pub mod status;

pub use board::SprintSummary;
pub use collections::{ClientTasks, Clients, PlanTasks, Plans};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
