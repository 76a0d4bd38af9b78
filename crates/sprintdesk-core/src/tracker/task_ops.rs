//! Client task operations for the Tracker.

use super::Tracker;
use crate::{
    error::{Result, TrackerError},
    models::{ClientTask, ClientTaskStep},
    params::{
        Id, RejectTask, SetCompletionLink, SetRejectionReason, SetStepDone, SetTaskStatus,
        SubmitTask,
    },
};

impl Tracker {
    /// Files a client request into their backlog.
    pub async fn submit_task(&self, params: &SubmitTask) -> Result<ClientTask> {
        params.validate()?;
        let params = params.clone();

        self.with_db(move |db| {
            db.submit_task(params.client_id, params.title.trim(), params.details.as_deref())
        })
        .await
    }

    /// Retrieves a task with its checklist.
    pub async fn get_task(&self, params: &Id) -> Result<Option<ClientTask>> {
        let id = params.id;
        self.with_db(move |db| db.get_task(id)).await
    }

    /// Lists a client's tasks, newest first.
    pub async fn list_client_tasks(&self, params: &Id) -> Result<Vec<ClientTask>> {
        let client_id = params.id;
        self.with_db(move |db| {
            if db.get_client(client_id)?.is_none() {
                return Err(TrackerError::ClientNotFound { id: client_id });
            }
            db.list_client_tasks(client_id)
        })
        .await
    }

    /// Approves a suggested task into its client's active sprint.
    pub async fn approve_task(&self, params: &Id) -> Result<ClientTask> {
        let id = params.id;
        self.with_db(move |db| db.approve_task(id)).await
    }

    /// Moves a task to another status.
    pub async fn set_task_status(&self, params: &SetTaskStatus) -> Result<ClientTask> {
        let status = params.validate()?;
        let id = params.id;
        self.with_db(move |db| db.set_task_status(id, status)).await
    }

    /// Rejects a task.
    pub async fn reject_task(&self, params: &RejectTask) -> Result<ClientTask> {
        let id = params.id;
        let reason = params
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);

        self.with_db(move |db| db.reject_task(id, reason.as_deref()))
            .await
    }

    /// Records why a task was rejected.
    pub async fn set_rejection_reason(&self, params: &SetRejectionReason) -> Result<ClientTask> {
        params.validate()?;
        let id = params.id;
        let reason = params.reason.trim().to_string();

        self.with_db(move |db| db.set_rejection_reason(id, &reason))
            .await
    }

    /// Sets or clears the delivery link of a delivered task.
    pub async fn set_completion_link(&self, params: &SetCompletionLink) -> Result<ClientTask> {
        let link = params.validate()?.map(String::from);
        let id = params.id;

        self.with_db(move |db| db.set_completion_link(id, link.as_deref()))
            .await
    }

    /// Ticks or unticks a checklist item.
    pub async fn set_step_done(&self, params: &SetStepDone) -> Result<ClientTaskStep> {
        let (step_id, done) = (params.step_id, params.done);
        self.with_db(move |db| db.set_step_done(step_id, done)).await
    }

    /// Deletes a task and its checklist.
    pub async fn delete_task(&self, params: &Id) -> Result<ClientTask> {
        let id = params.id;
        self.with_db(move |db| {
            let task = db.get_task(id)?.ok_or(TrackerError::TaskNotFound { id })?;
            db.delete_task(id)?;
            Ok(task)
        })
        .await
    }
}
