//! Insert drafts handed to the store.

use super::{SprintKey, TaskStatus};

/// A client task about to be inserted by sprint generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientTaskDraft {
    pub client_id: u64,
    pub title: String,
    pub details: Option<String>,
    pub status: TaskStatus,
    pub sprint_key: SprintKey,
    pub template_plan_task_id: u64,
    /// Checklist copied from the template, in order
    pub steps: Vec<ClientTaskStepDraft>,
}

/// A checklist item about to be attached to a freshly inserted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTaskStepDraft {
    pub step_order: i64,
    pub title: String,
}
