//! Plan, plan task template and template step operations.

use jiff::Timestamp;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{id_at, placeholders, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{Plan, PlanTask, PlanTaskStep, SprintNumber},
};

const INSERT_PLAN_SQL: &str =
    "INSERT INTO plans (name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_PLAN_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM plans WHERE id = ?1";
const SELECT_PLANS_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM plans ORDER BY name COLLATE NOCASE, id";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const UPDATE_PLAN_SQL: &str = "UPDATE plans SET name = COALESCE(?1, name), description = CASE WHEN ?2 THEN ?3 ELSE description END, updated_at = ?4 WHERE id = ?5";
const TOUCH_PLAN_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";

const PLAN_TASK_COLUMNS: &str = "id, plan_id, sprint_number, title, details, created_at";
const INSERT_PLAN_TASK_SQL: &str = "INSERT INTO plan_tasks (plan_id, sprint_number, title, details, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_PLAN_TASK_SQL: &str = "UPDATE plan_tasks SET sprint_number = COALESCE(?1, sprint_number), title = COALESCE(?2, title), details = CASE WHEN ?3 THEN ?4 ELSE details END WHERE id = ?5";
const DELETE_PLAN_TASK_SQL: &str = "DELETE FROM plan_tasks WHERE id = ?1";

const STEP_COLUMNS: &str = "id, plan_task_id, step_order, title";
const NEXT_STEP_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(step_order), 0) + 1 FROM plan_task_steps WHERE plan_task_id = ?1";
const INSERT_STEP_SQL: &str =
    "INSERT INTO plan_task_steps (plan_task_id, step_order, title) VALUES (?1, ?2, ?3)";
const SELECT_STEP_PARENT_SQL: &str = "SELECT plan_task_id FROM plan_task_steps WHERE id = ?1";
const DELETE_STEP_SQL: &str = "DELETE FROM plan_task_steps WHERE id = ?1";

fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: timestamp_at(row, 3)?,
        updated_at: timestamp_at(row, 4)?,
        tasks: Vec::new(),
    })
}

fn plan_task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanTask> {
    let sprint: i64 = row.get(2)?;
    let sprint_number = SprintNumber::new(sprint).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Integer,
            e.to_string().into(),
        )
    })?;

    Ok(PlanTask {
        id: id_at(row, 0)?,
        plan_id: id_at(row, 1)?,
        sprint_number,
        title: row.get(3)?,
        details: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
        steps: Vec::new(),
    })
}

fn step_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanTaskStep> {
    Ok(PlanTaskStep {
        id: id_at(row, 0)?,
        plan_task_id: id_at(row, 1)?,
        step_order: row.get(2)?,
        title: row.get(3)?,
    })
}

/// Templates a plan defines for one sprint, by id.
pub(crate) fn select_plan_tasks_for_sprint(
    conn: &Connection,
    plan_id: u64,
    sprint: SprintNumber,
) -> rusqlite::Result<Vec<PlanTask>> {
    let sql = format!(
        "SELECT {PLAN_TASK_COLUMNS} FROM plan_tasks WHERE plan_id = ?1 AND sprint_number = ?2 ORDER BY id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params![plan_id as i64, i64::from(sprint.get())], plan_task_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

/// Steps of the given templates, ordered by `step_order` then id.
pub(crate) fn select_template_steps_for(
    conn: &Connection,
    plan_task_ids: &[u64],
) -> rusqlite::Result<Vec<PlanTaskStep>> {
    if plan_task_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {STEP_COLUMNS} FROM plan_task_steps WHERE plan_task_id IN ({}) ORDER BY step_order, id",
        placeholders(plan_task_ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let steps = stmt
        .query_map(
            params_from_iter(plan_task_ids.iter().map(|id| *id as i64)),
            step_from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(steps)
}

fn plan_exists(conn: &Connection, id: u64) -> Result<bool> {
    conn.query_row(CHECK_PLAN_EXISTS_SQL, params![id as i64], |row| row.get(0))
        .db_context("Failed to check plan existence")
}

fn select_plan_task(conn: &Connection, id: u64) -> Result<Option<PlanTask>> {
    let sql = format!("SELECT {PLAN_TASK_COLUMNS} FROM plan_tasks WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], plan_task_from_row)
        .optional()
        .db_context("Failed to query plan task")
}

/// Attaches ordered steps to each template.
fn attach_steps(conn: &Connection, tasks: &mut [PlanTask]) -> Result<()> {
    let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    let steps = select_template_steps_for(conn, &ids).db_context("Failed to query template steps")?;
    for step in steps {
        if let Some(task) = tasks.iter_mut().find(|t| t.id == step.plan_task_id) {
            task.steps.push(step);
        }
    }
    Ok(())
}

impl super::Database {
    /// Creates a new plan with no templates.
    pub fn create_plan(&mut self, name: &str, description: Option<&str>) -> Result<Plan> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(INSERT_PLAN_SQL, params![name, description, &now_str, &now_str])
            .db_context("Failed to insert plan")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Plan {
            id,
            name: name.into(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
            tasks: Vec::new(),
        })
    }

    /// Retrieves a plan with its templates and their steps.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        let mut plan = self
            .connection
            .query_row(SELECT_PLAN_SQL, params![id as i64], plan_from_row)
            .optional()
            .db_context("Failed to query plan")?;

        if let Some(ref mut plan) = plan {
            plan.tasks = self.list_plan_tasks(plan.id)?;
        }

        Ok(plan)
    }

    /// Lists all plans by name, without templates.
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PLANS_SQL)
            .db_context("Failed to prepare query")?;

        let plans = stmt
            .query_map([], plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch plans")?;

        Ok(plans)
    }

    /// Renames a plan and/or replaces its description.
    ///
    /// `description` of `Some(None)` clears it; `None` leaves it as is.
    pub fn update_plan(
        &mut self,
        id: u64,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Plan> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let rows = tx
            .execute(
                UPDATE_PLAN_SQL,
                params![
                    name,
                    description.is_some(),
                    description.flatten(),
                    &now,
                    id as i64
                ],
            )
            .db_context("Failed to update plan")?;

        if rows == 0 {
            return Err(TrackerError::PlanNotFound { id });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan(id)?.ok_or(TrackerError::PlanNotFound { id })
    }

    /// Deletes a plan with its templates. Clients on the plan are left
    /// without one and generated tasks are kept.
    pub fn delete_plan(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if !plan_exists(&tx, id)? {
            return Err(TrackerError::PlanNotFound { id });
        }

        tx.execute(DELETE_PLAN_SQL, params![id as i64])
            .db_context("Failed to delete plan")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Adds a task template to a plan's sprint.
    pub fn create_plan_task(
        &mut self,
        plan_id: u64,
        sprint: SprintNumber,
        title: &str,
        details: Option<&str>,
    ) -> Result<PlanTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if !plan_exists(&tx, plan_id)? {
            return Err(TrackerError::PlanNotFound { id: plan_id });
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_PLAN_TASK_SQL,
            params![
                plan_id as i64,
                i64::from(sprint.get()),
                title,
                details,
                &now_str
            ],
        )
        .db_context("Failed to insert plan task")?;
        let id = tx.last_insert_rowid() as u64;

        tx.execute(TOUCH_PLAN_SQL, params![&now_str, plan_id as i64])
            .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(PlanTask {
            id,
            plan_id,
            sprint_number: sprint,
            title: title.into(),
            details: details.map(String::from),
            created_at: now,
            steps: Vec::new(),
        })
    }

    /// Retrieves a template with its steps.
    pub fn get_plan_task(&self, id: u64) -> Result<Option<PlanTask>> {
        let mut task = select_plan_task(&self.connection, id)?;
        if let Some(ref mut task) = task {
            attach_steps(&self.connection, std::slice::from_mut(task))?;
        }
        Ok(task)
    }

    /// Lists a plan's templates ordered by sprint then title, with steps.
    pub fn list_plan_tasks(&self, plan_id: u64) -> Result<Vec<PlanTask>> {
        let sql = format!(
            "SELECT {PLAN_TASK_COLUMNS} FROM plan_tasks WHERE plan_id = ?1 ORDER BY sprint_number, title, id"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let mut tasks = stmt
            .query_map(params![plan_id as i64], plan_task_from_row)
            .db_context("Failed to query plan tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch plan tasks")?;

        attach_steps(&self.connection, &mut tasks)?;
        Ok(tasks)
    }

    /// Templates a plan defines for one sprint, without steps.
    pub fn list_plan_tasks_for_sprint(
        &self,
        plan_id: u64,
        sprint: SprintNumber,
    ) -> Result<Vec<PlanTask>> {
        select_plan_tasks_for_sprint(&self.connection, plan_id, sprint)
            .db_context("Failed to query plan tasks for sprint")
    }

    /// Every template of every plan, without steps.
    pub fn list_all_plan_tasks(&self) -> Result<Vec<PlanTask>> {
        let sql = format!("SELECT {PLAN_TASK_COLUMNS} FROM plan_tasks ORDER BY id");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let tasks = stmt
            .query_map([], plan_task_from_row)
            .db_context("Failed to query plan tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch plan tasks")?;

        Ok(tasks)
    }

    /// Template steps of the given templates, ordered by `step_order`.
    pub fn list_template_steps_for(&self, plan_task_ids: &[u64]) -> Result<Vec<PlanTaskStep>> {
        select_template_steps_for(&self.connection, plan_task_ids)
            .db_context("Failed to query template steps")
    }

    /// Moves a template to another sprint and/or edits its text.
    ///
    /// Tasks already generated from the template are not touched.
    pub fn update_plan_task(
        &mut self,
        id: u64,
        sprint: Option<SprintNumber>,
        title: Option<&str>,
        details: Option<Option<&str>>,
    ) -> Result<PlanTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(
                UPDATE_PLAN_TASK_SQL,
                params![
                    sprint.map(|s| i64::from(s.get())),
                    title,
                    details.is_some(),
                    details.flatten(),
                    id as i64
                ],
            )
            .db_context("Failed to update plan task")?;

        if rows == 0 {
            return Err(TrackerError::PlanTaskNotFound { id });
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            "UPDATE plans SET updated_at = ?1 WHERE id = (SELECT plan_id FROM plan_tasks WHERE id = ?2)",
            params![&now, id as i64],
        )
        .db_context("Failed to update plan timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan_task(id)?
            .ok_or(TrackerError::PlanTaskNotFound { id })
    }

    /// Deletes a template and its steps.
    pub fn delete_plan_task(&mut self, id: u64) -> Result<()> {
        let rows = self
            .connection
            .execute(DELETE_PLAN_TASK_SQL, params![id as i64])
            .db_context("Failed to delete plan task")?;

        if rows == 0 {
            return Err(TrackerError::PlanTaskNotFound { id });
        }
        Ok(())
    }

    /// Adds a checklist step to a template, appending after the last step
    /// unless an order is given.
    pub fn add_template_step(
        &mut self,
        plan_task_id: u64,
        title: &str,
        step_order: Option<i64>,
    ) -> Result<PlanTaskStep> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if select_plan_task(&tx, plan_task_id)?.is_none() {
            return Err(TrackerError::PlanTaskNotFound { id: plan_task_id });
        }

        let step_order = match step_order {
            Some(order) => order,
            None => tx
                .query_row(NEXT_STEP_ORDER_SQL, params![plan_task_id as i64], |row| {
                    row.get(0)
                })
                .db_context("Failed to get next step order")?,
        };

        tx.execute(
            INSERT_STEP_SQL,
            params![plan_task_id as i64, step_order, title],
        )
        .db_context("Failed to insert template step")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(PlanTaskStep {
            id,
            plan_task_id,
            step_order,
            title: title.into(),
        })
    }

    /// Removes a checklist step from a template.
    pub fn remove_template_step(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let parent: Option<i64> = tx
            .query_row(SELECT_STEP_PARENT_SQL, params![id as i64], |row| row.get(0))
            .optional()
            .db_context("Failed to query template step")?;
        if parent.is_none() {
            return Err(TrackerError::TemplateStepNotFound { id });
        }

        tx.execute(DELETE_STEP_SQL, params![id as i64])
            .db_context("Failed to delete template step")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use crate::{error::TrackerError, models::SprintNumber};

    fn sprint(n: i64) -> SprintNumber {
        SprintNumber::new(n).unwrap()
    }

    #[test]
    fn test_templates_are_ordered_by_sprint_then_title() {
        let mut db = Database::in_memory().unwrap();
        let plan = db.create_plan("Social", None).unwrap();
        db.create_plan_task(plan.id, sprint(2), "Zeta", None).unwrap();
        db.create_plan_task(plan.id, sprint(1), "Beta", None).unwrap();
        db.create_plan_task(plan.id, sprint(1), "Alpha", None).unwrap();

        let titles: Vec<String> = db
            .list_plan_tasks(plan.id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_template_steps_append_in_order() {
        let mut db = Database::in_memory().unwrap();
        let plan = db.create_plan("Social", None).unwrap();
        let task = db.create_plan_task(plan.id, sprint(0), "Kickoff", None).unwrap();

        let first = db.add_template_step(task.id, "Agenda", None).unwrap();
        let second = db.add_template_step(task.id, "Reunião", None).unwrap();
        db.add_template_step(task.id, "Antes de tudo", Some(0)).unwrap();

        assert_eq!(first.step_order, 1);
        assert_eq!(second.step_order, 2);

        let loaded = db.get_plan_task(task.id).unwrap().unwrap();
        let titles: Vec<&str> = loaded.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Antes de tudo", "Agenda", "Reunião"]);
    }

    #[test]
    fn test_update_plan_keeps_unset_fields() {
        let mut db = Database::in_memory().unwrap();
        let plan = db.create_plan("Social", Some("Monthly posts")).unwrap();

        let renamed = db.update_plan(plan.id, Some("Social+"), None).unwrap();
        assert_eq!(renamed.name, "Social+");
        assert_eq!(renamed.description.as_deref(), Some("Monthly posts"));

        let cleared = db.update_plan(plan.id, None, Some(None)).unwrap();
        assert_eq!(cleared.name, "Social+");
        assert_eq!(cleared.description, None);
    }

    #[test]
    fn test_missing_ids_are_reported() {
        let mut db = Database::in_memory().unwrap();
        assert!(matches!(
            db.delete_plan(42),
            Err(TrackerError::PlanNotFound { id: 42 })
        ));
        assert!(matches!(
            db.create_plan_task(42, sprint(1), "x", None),
            Err(TrackerError::PlanNotFound { id: 42 })
        ));
        assert!(matches!(
            db.remove_template_step(5),
            Err(TrackerError::TemplateStepNotFound { id: 5 })
        ));
    }

    #[test]
    fn test_deleting_plan_cascades_to_templates() {
        let mut db = Database::in_memory().unwrap();
        let plan = db.create_plan("Social", None).unwrap();
        let task = db.create_plan_task(plan.id, sprint(1), "Post", None).unwrap();
        db.add_template_step(task.id, "Draft", None).unwrap();

        db.delete_plan(plan.id).unwrap();

        assert!(db.get_plan_task(task.id).unwrap().is_none());
        assert!(db.list_template_steps_for(&[task.id]).unwrap().is_empty());
    }
}
