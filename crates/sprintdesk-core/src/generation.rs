//! Sprint task generation.
//!
//! Expands the task templates a plan defines for a sprint into concrete
//! client tasks. A template is skipped when the client already has a task
//! with the same title under that sprint, whichever template (or client)
//! produced it, so running generation twice creates nothing the second time.
//!
//! The store side lives in `db::generation_queries`; this module holds the
//! outcome types and the pure selection step.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{
    ClientTaskDraft, ClientTaskStepDraft, PlanTask, PlanTaskStep, SprintNumber, TaskStatus,
};

/// Result of generating one sprint for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Number of client tasks inserted
    pub created: usize,
    /// Human-readable summary
    pub message: String,
}

impl GenerationOutcome {
    /// The plan defines no templates for the sprint.
    pub fn no_templates() -> Self {
        Self {
            created: 0,
            message: "no tasks configured for this sprint".into(),
        }
    }

    /// Every template title is already present for the sprint.
    pub fn already_generated() -> Self {
        Self {
            created: 0,
            message: "all tasks for this sprint already created".into(),
        }
    }

    pub fn created(created: usize) -> Self {
        if created == 0 {
            return Self::already_generated();
        }
        Self {
            created,
            message: format!("{created} task(s) created"),
        }
    }
}

/// Result of moving a client to its next sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    /// Sprint the client was in
    pub previous: SprintNumber,
    /// Sprint the client is in now
    pub current: SprintNumber,
    /// False when the client was already at the last sprint
    pub advanced: bool,
    /// Tasks generated for the new sprint
    pub created: usize,
    pub message: String,
}

impl AdvanceOutcome {
    /// The client is at [`SprintNumber::LAST`]; nothing was written.
    pub fn at_ceiling(current: SprintNumber) -> Self {
        Self {
            previous: current,
            current,
            advanced: false,
            created: 0,
            message: format!("client is already at sprint {current} (the last sprint)"),
        }
    }

    pub fn advanced(
        previous: SprintNumber,
        current: SprintNumber,
        generated: GenerationOutcome,
    ) -> Self {
        Self {
            previous,
            current,
            advanced: true,
            created: generated.created,
            message: format!(
                "moved from sprint {previous} to sprint {current}: {}",
                generated.message
            ),
        }
    }
}

/// Picks the templates that still need a client task and builds their drafts.
///
/// `existing_titles` holds the titles the client already has under the
/// sprint. Templates sharing a title within one batch collapse to the first
/// by id. Steps are copied in the order given, which callers keep as
/// `step_order` ascending.
pub fn pending_drafts(
    templates: &[PlanTask],
    existing_titles: &HashSet<String>,
    steps_by_template: &HashMap<u64, Vec<PlanTaskStep>>,
    client_id: u64,
    sprint: SprintNumber,
) -> Vec<ClientTaskDraft> {
    let mut ordered: Vec<&PlanTask> = templates.iter().collect();
    ordered.sort_by_key(|template| template.id);

    let mut seen: HashSet<&str> = HashSet::new();
    ordered
        .into_iter()
        .filter(|template| !existing_titles.contains(&template.title))
        .filter(|template| seen.insert(template.title.as_str()))
        .map(|template| ClientTaskDraft {
            client_id,
            title: template.title.clone(),
            details: template.details.clone(),
            status: TaskStatus::Queued,
            sprint_key: sprint.key(),
            template_plan_task_id: template.id,
            steps: steps_by_template
                .get(&template.id)
                .map(|steps| {
                    steps
                        .iter()
                        .map(|step| ClientTaskStepDraft {
                            step_order: step.step_order,
                            title: step.title.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

/// Groups template steps by their parent, keeping the incoming order.
pub fn group_steps(steps: Vec<PlanTaskStep>) -> HashMap<u64, Vec<PlanTaskStep>> {
    let mut grouped: HashMap<u64, Vec<PlanTaskStep>> = HashMap::new();
    for step in steps {
        grouped.entry(step.plan_task_id).or_default().push(step);
    }
    grouped
}
