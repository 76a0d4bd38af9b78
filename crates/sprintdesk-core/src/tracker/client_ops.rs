//! Client operations for the Tracker.

use super::Tracker;
use crate::{
    error::Result,
    models::Client,
    params::{AssignPlan, CreateClient, Id, ResolveClient, SetSprint},
};

impl Tracker {
    /// Creates a client with a unique access code.
    pub async fn create_client(&self, params: &CreateClient) -> Result<Client> {
        let slug = params.validate()?.to_string();
        let name = params.name.trim().to_string();

        self.with_db(move |db| db.create_client(&name, &slug)).await
    }

    /// Retrieves a client by ID.
    pub async fn get_client(&self, params: &Id) -> Result<Option<Client>> {
        let id = params.id;
        self.with_db(move |db| db.get_client(id)).await
    }

    /// Lists clients by name.
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.with_db(|db| db.list_clients()).await
    }

    /// Finds the client an access code belongs to.
    pub async fn resolve_client(&self, params: &ResolveClient) -> Result<Client> {
        let slug = params.validate()?.to_string();
        self.with_db(move |db| db.resolve_client(&slug)).await
    }

    /// Puts a client on a plan, or takes them off one.
    pub async fn assign_plan(&self, params: &AssignPlan) -> Result<Client> {
        let (client_id, plan_id) = (params.client_id, params.plan_id);
        self.with_db(move |db| db.assign_plan(client_id, plan_id))
            .await
    }

    /// Moves a client's sprint cursor without generating tasks.
    pub async fn set_current_sprint(&self, params: &SetSprint) -> Result<Client> {
        let sprint = params.validate()?;
        let client_id = params.client_id;
        self.with_db(move |db| db.set_current_sprint(client_id, sprint))
            .await
    }
}
