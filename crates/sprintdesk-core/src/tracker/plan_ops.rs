//! Plan and template operations for the Tracker.

use super::Tracker;
use crate::{
    error::{Result, TrackerError},
    models::{Plan, PlanTask, PlanTaskStep},
    params::{AddTemplateStep, CreatePlan, CreatePlanTask, Id, UpdatePlan, UpdatePlanTask},
};

impl Tracker {
    /// Creates a plan.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        params.validate()?;
        let name = params.name.trim().to_string();
        let description = params.description.clone();

        self.with_db(move |db| db.create_plan(&name, description.as_deref()))
            .await
    }

    /// Retrieves a plan with its templates.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let id = params.id;
        self.with_db(move |db| db.get_plan(id)).await
    }

    /// Lists plans by name.
    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        self.with_db(|db| db.list_plans()).await
    }

    /// Renames a plan or replaces its description.
    pub async fn update_plan(&self, params: &UpdatePlan) -> Result<Plan> {
        params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.update_plan(
                params.id,
                params.name.as_deref().map(str::trim),
                params.description_change(),
            )
        })
        .await
    }

    /// Deletes a plan and its templates.
    pub async fn delete_plan(&self, params: &Id) -> Result<Plan> {
        let id = params.id;
        self.with_db(move |db| {
            let plan = db.get_plan(id)?.ok_or(TrackerError::PlanNotFound { id })?;
            db.delete_plan(id)?;
            Ok(plan)
        })
        .await
    }

    /// Adds a task template to a plan's sprint.
    pub async fn create_plan_task(&self, params: &CreatePlanTask) -> Result<PlanTask> {
        let sprint = params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.create_plan_task(
                params.plan_id,
                sprint,
                params.title.trim(),
                params.details.as_deref(),
            )
        })
        .await
    }

    /// Lists a plan's templates.
    pub async fn list_plan_tasks(&self, params: &Id) -> Result<Vec<PlanTask>> {
        let plan_id = params.id;
        self.with_db(move |db| {
            if db.get_plan(plan_id)?.is_none() {
                return Err(TrackerError::PlanNotFound { id: plan_id });
            }
            db.list_plan_tasks(plan_id)
        })
        .await
    }

    /// Retrieves one template with its steps.
    pub async fn get_plan_task(&self, params: &Id) -> Result<Option<PlanTask>> {
        let id = params.id;
        self.with_db(move |db| db.get_plan_task(id)).await
    }

    /// Edits a template.
    pub async fn update_plan_task(&self, params: &UpdatePlanTask) -> Result<PlanTask> {
        let sprint = params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.update_plan_task(
                params.id,
                sprint,
                params.title.as_deref().map(str::trim),
                params.details_change(),
            )
        })
        .await
    }

    /// Deletes a template.
    pub async fn delete_plan_task(&self, params: &Id) -> Result<PlanTask> {
        let id = params.id;
        self.with_db(move |db| {
            let task = db
                .get_plan_task(id)?
                .ok_or(TrackerError::PlanTaskNotFound { id })?;
            db.delete_plan_task(id)?;
            Ok(task)
        })
        .await
    }

    /// Adds a checklist step to a template.
    pub async fn add_template_step(&self, params: &AddTemplateStep) -> Result<PlanTaskStep> {
        params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.add_template_step(params.plan_task_id, params.title.trim(), params.step_order)
        })
        .await
    }

    /// Removes a checklist step from a template.
    pub async fn remove_template_step(&self, params: &Id) -> Result<()> {
        let id = params.id;
        self.with_db(move |db| db.remove_template_step(id)).await
    }
}
