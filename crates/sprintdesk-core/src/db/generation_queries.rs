//! Sprint generation and advancing against the store.

use std::collections::HashSet;

use jiff::Timestamp;
use rusqlite::{params, Transaction, TransactionBehavior};

use super::{
    client_queries::{select_client, update_current_sprint},
    plan_queries::{select_plan_tasks_for_sprint, select_template_steps_for},
    task_queries::select_client_task_titles,
};
use crate::{
    error::{DatabaseResultExt, GenerationResultExt, GenerationStage, Result, TrackerError},
    generation::{group_steps, pending_drafts, AdvanceOutcome, GenerationOutcome},
    models::{Client, CreatedBy, SprintNumber},
};

const INSERT_GENERATED_TASK_SQL: &str = "INSERT INTO client_tasks (client_id, title, details, status, sprint_key, alteration_count, template_plan_task_id, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?8) ON CONFLICT DO NOTHING";
const INSERT_GENERATED_STEP_SQL: &str =
    "INSERT INTO client_task_steps (task_id, step_order, title, done) VALUES (?1, ?2, ?3, 0)";

/// Runs generation inside an open transaction.
fn generate_in_tx(
    tx: &Transaction<'_>,
    client_id: u64,
    plan_id: u64,
    sprint: SprintNumber,
) -> Result<GenerationOutcome> {
    let templates = select_plan_tasks_for_sprint(tx, plan_id, sprint)
        .at_stage(GenerationStage::FetchTemplates)?;
    if templates.is_empty() {
        log::debug!("Plan {plan_id} has no templates for sprint {sprint}");
        return Ok(GenerationOutcome::no_templates());
    }

    let existing: HashSet<String> = select_client_task_titles(tx, client_id, sprint.key())
        .at_stage(GenerationStage::FetchExisting)?
        .into_iter()
        .collect();

    let missing: Vec<u64> = templates
        .iter()
        .filter(|t| !existing.contains(&t.title))
        .map(|t| t.id)
        .collect();
    if missing.is_empty() {
        return Ok(GenerationOutcome::already_generated());
    }

    let steps = group_steps(
        select_template_steps_for(tx, &missing).at_stage(GenerationStage::FetchSteps)?,
    );
    let drafts = pending_drafts(&templates, &existing, &steps, client_id, sprint);

    let now = Timestamp::now().to_string();
    let mut created = 0;
    for draft in drafts {
        let inserted = tx
            .execute(
                INSERT_GENERATED_TASK_SQL,
                params![
                    draft.client_id as i64,
                    &draft.title,
                    &draft.details,
                    draft.status.as_str(),
                    draft.sprint_key.to_string(),
                    draft.template_plan_task_id as i64,
                    CreatedBy::Admin.as_str(),
                    &now
                ],
            )
            .at_stage(GenerationStage::InsertTasks)?;

        if inserted == 0 {
            log::debug!(
                "'{}' already generated for client {client_id} in sprint {sprint}",
                draft.title
            );
            continue;
        }
        created += 1;

        let task_id = tx.last_insert_rowid();
        for step in &draft.steps {
            tx.execute(
                INSERT_GENERATED_STEP_SQL,
                params![task_id, step.step_order, &step.title],
            )
            .at_stage(GenerationStage::InsertSteps)?;
        }
    }

    log::info!("Generated {created} task(s) for client {client_id} in sprint {sprint}");
    Ok(GenerationOutcome::created(created))
}

fn require_client(tx: &Transaction<'_>, client_id: u64) -> Result<Client> {
    select_client(tx, client_id)?.ok_or(TrackerError::ClientNotFound { id: client_id })
}

fn require_plan(client: &Client) -> Result<u64> {
    client.plan_id.ok_or_else(|| {
        TrackerError::invalid_input("plan_id").with_reason(format!(
            "Client '{}' has no plan assigned",
            client.name
        ))
    })
}

/// Templates may only be copied from the plan the client is on.
fn require_client_plan(client: &Client, plan_id: u64) -> Result<()> {
    if client.plan_id == Some(plan_id) {
        return Ok(());
    }
    Err(TrackerError::invalid_input("plan_id").with_reason(format!(
        "Plan {plan_id} is not the plan of client '{}'",
        client.name
    )))
}

impl super::Database {
    /// Materializes a plan's templates for one sprint as client tasks.
    ///
    /// `plan_id` must be the client's assigned plan. Titles the client
    /// already has under the sprint are skipped, and the whole run commits
    /// or rolls back as one unit.
    pub fn generate_sprint_tasks(
        &mut self,
        client_id: u64,
        plan_id: u64,
        sprint: SprintNumber,
    ) -> Result<GenerationOutcome> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let client = require_client(&tx, client_id)?;
        require_client_plan(&client, plan_id)?;
        let outcome = generate_in_tx(&tx, client_id, plan_id, sprint)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(outcome)
    }

    /// Generates the client's current sprint from the client's own plan.
    pub fn generate_current_sprint(&mut self, client_id: u64) -> Result<GenerationOutcome> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let client = require_client(&tx, client_id)?;
        let plan_id = require_plan(&client)?;
        let outcome = generate_in_tx(&tx, client_id, plan_id, client.sprint())?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(outcome)
    }

    /// Moves a client to the next sprint and generates its tasks.
    ///
    /// At the last sprint nothing is written.
    pub fn advance_to_next_sprint(&mut self, client_id: u64) -> Result<AdvanceOutcome> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let client = require_client(&tx, client_id)?;
        let plan_id = require_plan(&client)?;
        let previous = client.sprint();

        let Some(next) = previous.next() else {
            log::info!("Client {client_id} is already at the last sprint");
            return Ok(AdvanceOutcome::at_ceiling(previous));
        };

        update_current_sprint(&tx, client_id, next).db_context("Failed to update client sprint")?;
        let generated = generate_in_tx(&tx, client_id, plan_id, next)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(AdvanceOutcome::advanced(previous, next, generated))
    }
}
