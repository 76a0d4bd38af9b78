//! Plan and template models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SprintNumber;

/// A named offering sold to clients, holding per-sprint task templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Name of the plan
    pub name: String,

    /// Optional description of what the plan includes
    pub description: Option<String>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Task templates, ordered by sprint then title (lazy-loaded)
    #[serde(default)]
    pub tasks: Vec<PlanTask>,
}

impl Plan {
    /// Templates grouped by sprint, in sprint order.
    pub fn tasks_by_sprint(&self) -> Vec<(SprintNumber, Vec<&PlanTask>)> {
        let mut groups: Vec<(SprintNumber, Vec<&PlanTask>)> = Vec::new();
        for task in &self.tasks {
            match groups.iter_mut().find(|(sprint, _)| *sprint == task.sprint_number) {
                Some((_, tasks)) => tasks.push(task),
                None => groups.push((task.sprint_number, vec![task])),
            }
        }
        groups.sort_by_key(|(sprint, _)| *sprint);
        groups
    }
}

/// Template: in sprint N of a plan, clients receive a task with this title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanTask {
    /// Unique identifier for the template
    pub id: u64,

    /// ID of the owning plan
    pub plan_id: u64,

    /// Sprint the template belongs to (0 is onboarding)
    pub sprint_number: SprintNumber,

    /// Title copied onto generated client tasks
    pub title: String,

    /// Details copied onto generated client tasks
    pub details: Option<String>,

    /// Timestamp when the template was created (UTC)
    pub created_at: Timestamp,

    /// Checklist copied onto generated client tasks, ordered by `step_order`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<PlanTaskStep>,
}

/// Template checklist item of a [`PlanTask`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanTaskStep {
    pub id: u64,
    pub plan_task_id: u64,
    /// Display order; not necessarily contiguous
    pub step_order: i64,
    pub title: String,
}
