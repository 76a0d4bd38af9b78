//! Client task model definitions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{CreatedBy, SprintKey, TaskStatus};

/// A concrete unit of work for one client (a "demanda").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientTask {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the owning client
    pub client_id: u64,

    /// Brief title of the task
    pub title: String,

    /// Detailed description of the request
    pub details: Option<String>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Sprint the task is scheduled in; unset while in the backlog
    pub sprint_key: Option<SprintKey>,

    /// How many times the task has entered `alteration`
    pub alteration_count: u32,

    /// Why staff rejected the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_rejection_reason: Option<String>,

    /// Where the delivered work can be found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_completion_link: Option<String>,

    /// Template the task was generated from; unset for client requests
    pub template_plan_task_id: Option<u64>,

    /// Who created the task
    pub created_by: CreatedBy,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,

    /// Checklist, ordered by `step_order`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ClientTaskStep>,
}

impl ClientTask {
    /// Number of checklist items marked done.
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|step| step.done).count()
    }
}

/// Checklist item of a [`ClientTask`], copied from a template step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientTaskStep {
    pub id: u64,
    pub task_id: u64,
    pub step_order: i64,
    pub title: String,
    pub done: bool,
}
