//! Client task operations and status transitions.
//!
//! Every status write reads the persisted status inside the same IMMEDIATE
//! transaction before deciding what to write, so rework counting never works
//! from a stale read.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::{id_at, parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    lifecycle::plan_transition,
    models::{ClientTask, ClientTaskStep, CreatedBy, SprintKey, SprintNumber, TaskStatus},
};

const TASK_COLUMNS: &str = "id, client_id, title, details, status, sprint_key, alteration_count, admin_rejection_reason, admin_completion_link, template_plan_task_id, created_by, created_at, updated_at";
const STEP_COLUMNS: &str = "id, task_id, step_order, title, done";
const CHECK_CLIENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?1)";
const INSERT_TASK_SQL: &str = "INSERT INTO client_tasks (client_id, title, details, status, sprint_key, alteration_count, template_plan_task_id, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, NULL, 0, NULL, ?5, ?6, ?6)";
const SELECT_STATUS_SQL: &str = "SELECT t.status, c.current_sprint FROM client_tasks t JOIN clients c ON c.id = t.client_id WHERE t.id = ?1";
const UPDATE_STATUS_SQL: &str = "UPDATE client_tasks SET status = ?1, alteration_count = alteration_count + ?2, sprint_key = COALESCE(?3, sprint_key), updated_at = ?4 WHERE id = ?5";
const UPDATE_REJECTION_REASON_SQL: &str =
    "UPDATE client_tasks SET admin_rejection_reason = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_COMPLETION_LINK_SQL: &str =
    "UPDATE client_tasks SET admin_completion_link = ?1, updated_at = ?2 WHERE id = ?3";
const SELECT_TITLES_SQL: &str =
    "SELECT title FROM client_tasks WHERE client_id = ?1 AND sprint_key = ?2";
const UPDATE_STEP_DONE_SQL: &str = "UPDATE client_task_steps SET done = ?1 WHERE id = ?2";
const TOUCH_TASK_BY_STEP_SQL: &str = "UPDATE client_tasks SET updated_at = ?1 WHERE id = (SELECT task_id FROM client_task_steps WHERE id = ?2)";
const DELETE_TASK_SQL: &str = "DELETE FROM client_tasks WHERE id = ?1";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientTask> {
    let status: String = row.get(4)?;
    let sprint_key = match row.get::<_, Option<String>>(5)? {
        Some(raw) => Some(raw.parse::<SprintKey>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
        })?),
        None => None,
    };

    Ok(ClientTask {
        id: id_at(row, 0)?,
        client_id: id_at(row, 1)?,
        title: row.get(2)?,
        details: row.get(3)?,
        status: TaskStatus::from_stored(&status),
        sprint_key,
        alteration_count: row.get::<_, i64>(6)?.max(0) as u32,
        admin_rejection_reason: row.get(7)?,
        admin_completion_link: row.get(8)?,
        template_plan_task_id: row.get::<_, Option<i64>>(9)?.map(|id| id as u64),
        created_by: parsed_at::<CreatedBy>(row, 10)?,
        created_at: timestamp_at(row, 11)?,
        updated_at: timestamp_at(row, 12)?,
        steps: Vec::new(),
    })
}

fn step_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientTaskStep> {
    Ok(ClientTaskStep {
        id: id_at(row, 0)?,
        task_id: id_at(row, 1)?,
        step_order: row.get(2)?,
        title: row.get(3)?,
        done: row.get::<_, i64>(4)? != 0,
    })
}

/// Titles a client already has under a sprint key.
pub(crate) fn select_client_task_titles(
    conn: &Connection,
    client_id: u64,
    sprint_key: SprintKey,
) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(SELECT_TITLES_SQL)?;
    let titles = stmt
        .query_map(params![client_id as i64, sprint_key.to_string()], |row| {
            row.get(0)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(titles)
}

fn select_task(conn: &Connection, id: u64) -> Result<Option<ClientTask>> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM client_tasks WHERE id = ?1");
    let mut task = conn
        .query_row(&sql, params![id as i64], task_from_row)
        .optional()
        .db_context("Failed to query task")?;

    if let Some(ref mut task) = task {
        task.steps = select_steps(conn, task.id)?;
    }
    Ok(task)
}

fn select_steps(conn: &Connection, task_id: u64) -> Result<Vec<ClientTaskStep>> {
    let sql = format!(
        "SELECT {STEP_COLUMNS} FROM client_task_steps WHERE task_id = ?1 ORDER BY step_order, id"
    );
    let mut stmt = conn.prepare(&sql).db_context("Failed to prepare query")?;

    let steps = stmt
        .query_map(params![task_id as i64], step_from_row)
        .db_context("Failed to query task steps")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to fetch task steps")?;

    Ok(steps)
}

fn select_tasks(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<ClientTask>> {
    let mut stmt = conn.prepare(sql).db_context("Failed to prepare query")?;

    let mut tasks = stmt
        .query_map(args, task_from_row)
        .db_context("Failed to query tasks")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to fetch tasks")?;

    for task in &mut tasks {
        task.steps = select_steps(conn, task.id)?;
    }
    Ok(tasks)
}

/// Reads the persisted status of a task and its client's sprint cursor.
fn current_status(tx: &Transaction<'_>, id: u64) -> Result<(TaskStatus, SprintNumber)> {
    let row: Option<(String, Option<i64>)> = tx
        .query_row(SELECT_STATUS_SQL, params![id as i64], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()
        .db_context("Failed to read task status")?;

    let (status, sprint) = row.ok_or(TrackerError::TaskNotFound { id })?;
    let sprint = match sprint {
        Some(raw) => SprintNumber::new(raw)?,
        None => SprintNumber::ONBOARDING,
    };
    Ok((TaskStatus::from_stored(&status), sprint))
}

/// Applies a validated status change inside `tx`.
fn write_transition(tx: &Transaction<'_>, id: u64, to: TaskStatus) -> Result<()> {
    let (from, sprint) = current_status(tx, id)?;
    let effect = plan_transition(from, to)?;

    if from == to {
        log::debug!("Task {id} already '{to}', nothing to write");
        return Ok(());
    }

    let sprint_key = effect.assigns_sprint.then(|| sprint.key().to_string());
    tx.execute(
        UPDATE_STATUS_SQL,
        params![
            to.as_str(),
            i64::from(effect.increments_alteration),
            sprint_key,
            Timestamp::now().to_string(),
            id as i64
        ],
    )
    .db_context("Failed to update task status")?;

    log::info!("Task {id} moved from '{from}' to '{to}'");
    Ok(())
}

impl super::Database {
    /// Files a request from a client into their backlog as `suggested`.
    pub fn submit_task(
        &mut self,
        client_id: u64,
        title: &str,
        details: Option<&str>,
    ) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_CLIENT_EXISTS_SQL, params![client_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check client existence")?;
        if !exists {
            return Err(TrackerError::ClientNotFound { id: client_id });
        }

        let now = Timestamp::now();
        tx.execute(
            INSERT_TASK_SQL,
            params![
                client_id as i64,
                title,
                details,
                TaskStatus::Suggested.as_str(),
                CreatedBy::Client.as_str(),
                now.to_string()
            ],
        )
        .db_context("Failed to insert task")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ClientTask {
            id,
            client_id,
            title: title.into(),
            details: details.map(String::from),
            status: TaskStatus::Suggested,
            sprint_key: None,
            alteration_count: 0,
            admin_rejection_reason: None,
            admin_completion_link: None,
            template_plan_task_id: None,
            created_by: CreatedBy::Client,
            created_at: now,
            updated_at: now,
            steps: Vec::new(),
        })
    }

    /// Retrieves a task with its checklist.
    pub fn get_task(&self, id: u64) -> Result<Option<ClientTask>> {
        select_task(&self.connection, id)
    }

    /// Lists a client's tasks, newest first.
    pub fn list_client_tasks(&self, client_id: u64) -> Result<Vec<ClientTask>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM client_tasks WHERE client_id = ?1 ORDER BY id DESC"
        );
        select_tasks(&self.connection, &sql, params![client_id as i64])
    }

    /// Lists every client task, newest first.
    pub fn list_all_tasks(&self) -> Result<Vec<ClientTask>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM client_tasks ORDER BY id DESC");
        select_tasks(&self.connection, &sql, [])
    }

    /// Titles a client already has under a sprint key.
    pub fn list_client_task_titles(
        &self,
        client_id: u64,
        sprint_key: SprintKey,
    ) -> Result<Vec<String>> {
        select_client_task_titles(&self.connection, client_id, sprint_key)
            .db_context("Failed to query task titles")
    }

    /// Approves a suggested task into the client's active sprint.
    pub fn approve_task(&mut self, id: u64) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let (from, _) = current_status(&tx, id)?;
        if from != TaskStatus::Suggested {
            return Err(TrackerError::invalid_input("status").with_reason(format!(
                "Only suggested tasks can be approved; task {id} is '{from}'"
            )));
        }
        write_transition(&tx, id, TaskStatus::Queued)?;

        let task = select_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Moves a task to `status`, counting rework when it enters alteration.
    pub fn set_task_status(&mut self, id: u64, status: TaskStatus) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        write_transition(&tx, id, status)?;

        let task = select_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Rejects a task, optionally recording why.
    pub fn reject_task(&mut self, id: u64, reason: Option<&str>) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        write_transition(&tx, id, TaskStatus::Rejected)?;
        if let Some(reason) = reason {
            tx.execute(
                UPDATE_REJECTION_REASON_SQL,
                params![reason, Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to record rejection reason")?;
        }

        let task = select_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Records why a rejected task was rejected.
    pub fn set_rejection_reason(&mut self, id: u64, reason: &str) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let (status, _) = current_status(&tx, id)?;
        if status != TaskStatus::Rejected {
            return Err(
                TrackerError::invalid_input("admin_rejection_reason").with_reason(format!(
                    "Task {id} is '{status}'; only rejected tasks carry a reason"
                )),
            );
        }

        tx.execute(
            UPDATE_REJECTION_REASON_SQL,
            params![reason, Timestamp::now().to_string(), id as i64],
        )
        .db_context("Failed to record rejection reason")?;

        let task = select_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Sets or clears where a delivered task's work can be found.
    pub fn set_completion_link(&mut self, id: u64, link: Option<&str>) -> Result<ClientTask> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let (status, _) = current_status(&tx, id)?;
        if !status.is_delivered() {
            return Err(
                TrackerError::invalid_input("admin_completion_link").with_reason(format!(
                    "Task {id} is '{status}'; only delivered tasks carry a link"
                )),
            );
        }

        tx.execute(
            UPDATE_COMPLETION_LINK_SQL,
            params![link, Timestamp::now().to_string(), id as i64],
        )
        .db_context("Failed to record completion link")?;

        let task = select_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Ticks or unticks a checklist item.
    pub fn set_step_done(&mut self, step_id: u64, done: bool) -> Result<ClientTaskStep> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(UPDATE_STEP_DONE_SQL, params![i64::from(done), step_id as i64])
            .db_context("Failed to update task step")?;
        if rows == 0 {
            return Err(TrackerError::TaskStepNotFound { id: step_id });
        }

        tx.execute(
            TOUCH_TASK_BY_STEP_SQL,
            params![Timestamp::now().to_string(), step_id as i64],
        )
        .db_context("Failed to update task timestamp")?;

        let sql = format!("SELECT {STEP_COLUMNS} FROM client_task_steps WHERE id = ?1");
        let step = tx
            .query_row(&sql, params![step_id as i64], step_from_row)
            .db_context("Failed to query task step")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(step)
    }

    /// Deletes a task together with its checklist.
    pub fn delete_task(&mut self, id: u64) -> Result<()> {
        let rows = self
            .connection
            .execute(DELETE_TASK_SQL, params![id as i64])
            .db_context("Failed to delete task")?;

        if rows == 0 {
            return Err(TrackerError::TaskNotFound { id });
        }
        Ok(())
    }
}
