//! Sprint generation, boards and dashboard metrics for the Tracker.

use super::Tracker;
use crate::{
    error::{Result, TrackerError},
    generation::{AdvanceOutcome, GenerationOutcome},
    metrics::BoardMetrics,
    models::SprintBoard,
    params::{GenerateSprintTasks, Id},
};

impl Tracker {
    /// Generates a plan's templates for one sprint of one client.
    pub async fn generate_sprint_tasks(
        &self,
        params: &GenerateSprintTasks,
    ) -> Result<GenerationOutcome> {
        let sprint = params.validate()?;
        let (client_id, plan_id) = (params.client_id, params.plan_id);

        self.with_db(move |db| db.generate_sprint_tasks(client_id, plan_id, sprint))
            .await
    }

    /// Generates the client's current sprint from their own plan.
    pub async fn generate_current_sprint(&self, params: &Id) -> Result<GenerationOutcome> {
        let client_id = params.id;
        self.with_db(move |db| db.generate_current_sprint(client_id))
            .await
    }

    /// Moves a client to the next sprint and generates it.
    pub async fn advance_to_next_sprint(&self, params: &Id) -> Result<AdvanceOutcome> {
        let client_id = params.id;
        self.with_db(move |db| db.advance_to_next_sprint(client_id))
            .await
    }

    /// A client's backlog and active sprint.
    pub async fn sprint_board(&self, params: &Id) -> Result<SprintBoard> {
        let client_id = params.id;
        self.with_db(move |db| {
            let client = db
                .get_client(client_id)?
                .ok_or(TrackerError::ClientNotFound { id: client_id })?;
            let tasks = db.list_client_tasks(client_id)?;
            Ok(SprintBoard::from_tasks(client, tasks))
        })
        .await
    }

    /// Agency-wide dashboard figures.
    pub async fn dashboard_metrics(&self) -> Result<BoardMetrics> {
        self.with_db(|db| {
            let clients = db.list_clients()?;
            let tasks = db.list_all_tasks()?;
            let plan_tasks = db.list_all_plan_tasks()?;
            Ok(BoardMetrics::compute(&clients, &tasks, &plan_tasks))
        })
        .await
    }
}
