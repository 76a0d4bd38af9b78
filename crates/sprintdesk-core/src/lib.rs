//! Core library for the sprintdesk agency board.
//!
//! Plans hold per-sprint task templates. Clients are assigned a plan and move
//! through sprints 0 to 15. Each sprint, the plan's templates are expanded
//! into concrete client tasks ("demandas") which then follow a small status
//! lifecycle from the backlog to delivery.
//!
//! - [`generation`]: idempotent expansion of templates into client tasks
//! - [`lifecycle`]: the status transition table and its side effects
//! - [`models`]: sprint numbers and keys, plans, clients and tasks
//! - [`db`]: SQLite storage
//! - [`tracker`]: the async facade used by the CLI
//! - [`metrics`]: dashboard aggregates
//! - [`auth`]: signed admin session tokens and the admin route gate
//! - [`display`]: markdown formatting of all of the above
//!
//! # Quick Start
//!
//! ```rust
//! use sprintdesk_core::{
//!     params::{AssignPlan, CreateClient, CreatePlan, CreatePlanTask, Id},
//!     TrackerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("desk.db"))
//!     .build()
//!     .await?;
//!
//! let plan = tracker
//!     .create_plan(&CreatePlan {
//!         name: "Gold".to_string(),
//!         description: None,
//!     })
//!     .await?;
//! tracker
//!     .create_plan_task(&CreatePlanTask {
//!         plan_id: plan.id,
//!         sprint: 0,
//!         title: "Kickoff".to_string(),
//!         details: None,
//!     })
//!     .await?;
//!
//! let client = tracker
//!     .create_client(&CreateClient {
//!         name: "Acme".to_string(),
//!         slug: "acme".to_string(),
//!     })
//!     .await?;
//! tracker
//!     .assign_plan(&AssignPlan {
//!         client_id: client.id,
//!         plan_id: Some(plan.id),
//!     })
//!     .await?;
//!
//! let outcome = tracker.generate_current_sprint(&Id { id: client.id }).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod db;
pub mod display;
pub mod error;
pub mod generation;
pub mod lifecycle;
pub mod metrics;
pub mod models;
pub mod params;
pub mod tracker;

pub use db::Database;
pub use display::{
    ClientTasks, Clients, CreateResult, DeleteResult, LocalDateTime, OperationStatus, PlanTasks,
    Plans, SprintSummary, UpdateResult,
};
pub use error::{GenerationStage, Result, TrackerError};
pub use generation::{AdvanceOutcome, GenerationOutcome};
pub use metrics::BoardMetrics;
pub use models::{
    Client, ClientTask, ClientTaskStep, CreatedBy, Plan, PlanTask, PlanTaskStep, SprintBoard,
    SprintKey, SprintNumber, TaskStatus,
};
pub use tracker::{Tracker, TrackerBuilder};
