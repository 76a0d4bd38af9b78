//! High-level async API over the store.
//!
//! [`Tracker`] is the entry point front ends use. Every operation opens its
//! own [`Database`] connection on a blocking thread, so a `Tracker` is cheap
//! to share and holds nothing but the database path.
//!
//! ## Submodules
//!
//! - [`builder`]: creates [`Tracker`] instances, resolving the XDG default path
//! - `plan_ops`: plans, task templates and template steps
//! - `client_ops`: clients, slug resolution and plan assignment
//! - `task_ops`: client requests and status changes
//! - `sprint_ops`: generation, advancing, boards and dashboard metrics
//!
//! ```rust
//! use sprintdesk_core::{params::{CreateClient, CreatePlan}, TrackerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("sprintdesk.db"))
//!     .build()
//!     .await?;
//!
//! let plan = tracker
//!     .create_plan(&CreatePlan { name: "Gold".into(), description: None })
//!     .await?;
//! let client = tracker
//!     .create_client(&CreateClient { name: "Acme".into(), slug: "acme".into() })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{Result, TrackerError},
};

pub mod builder;
mod client_ops;
mod plan_ops;
mod sprint_ops;
mod task_ops;

#[cfg(test)]
mod tests;

pub use builder::TrackerBuilder;

/// Main tracker interface.
#[derive(Debug, Clone)]
pub struct Tracker {
    pub(crate) db_path: PathBuf,
}

impl Tracker {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the database file this tracker works on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(TrackerError::join)?
    }
}
