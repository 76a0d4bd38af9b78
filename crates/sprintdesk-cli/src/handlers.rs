//! Command handlers: run tracker operations and render their results.

use anyhow::{anyhow, bail, Context, Result};
use jiff::Timestamp;
use log::debug;
use sprintdesk_core::{
    auth::{verify_token_at, AdminCredentials, AdminGate, AuthError, GateDecision},
    display::{ClientTasks, Clients, PlanTasks, Plans},
    params::Id,
    CreateResult, DeleteResult, LocalDateTime, OperationStatus, SprintSummary, Tracker,
    UpdateResult,
};

use crate::{
    cli::{
        AdminCommands, AdminConfigArgs, ClientCommands, DeleteArgs, PlanCommands, SprintCommands,
        TaskCommands, TemplateCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    tracker: Tracker,
    renderer: TerminalRenderer,
}

fn require_confirmation(args: &DeleteArgs, what: &str) -> Result<Id> {
    if !args.confirm {
        bail!("Deleting {what} {} cannot be undone; pass --confirm to proceed", args.id);
    }
    Ok(Id { id: args.id })
}

impl Cli {
    pub fn new(tracker: Tracker, renderer: TerminalRenderer) -> Self {
        Self { tracker, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .tracker
                    .create_plan(&args.into())
                    .await
                    .context("Failed to create plan")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::List => {
                let plans = self.tracker.list_plans().await.context("Failed to list plans")?;
                self.renderer.render(&format!("# Plans\n\n{}", Plans(plans)))
            }
            PlanCommands::Show(args) => {
                let id = args.id;
                let plan = self
                    .tracker
                    .get_plan(&args.into())
                    .await
                    .context("Failed to get plan")?
                    .ok_or_else(|| anyhow!("Plan with ID {id} not found"))?;
                self.renderer.render(&plan.to_string())
            }
            PlanCommands::Update(args) => {
                let mut changes = Vec::new();
                if let Some(name) = &args.name {
                    changes.push(format!("Name: {name}"));
                }
                if let Some(description) = &args.description {
                    if description.trim().is_empty() {
                        changes.push("Description cleared".to_string());
                    } else {
                        changes.push("Description updated".to_string());
                    }
                }
                let plan = self
                    .tracker
                    .update_plan(&args.into())
                    .await
                    .context("Failed to update plan")?;
                self.renderer
                    .render(&UpdateResult::with_changes(plan, changes).to_string())
            }
            PlanCommands::Delete(args) => {
                let id = require_confirmation(&args, "plan")?;
                let plan = self
                    .tracker
                    .delete_plan(&id)
                    .await
                    .context("Failed to delete plan")?;
                self.renderer.render(&DeleteResult::new(plan).to_string())
            }
        }
    }

    pub async fn handle_template_command(&self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::Add(args) => {
                let template = self
                    .tracker
                    .create_plan_task(&args.into())
                    .await
                    .context("Failed to create task template")?;
                self.renderer.render(&CreateResult::new(template).to_string())
            }
            TemplateCommands::List(args) => {
                let templates = self
                    .tracker
                    .list_plan_tasks(&args.into())
                    .await
                    .context("Failed to list task templates")?;
                self.renderer.render(&PlanTasks(templates).to_string())
            }
            TemplateCommands::Show(args) => {
                let id = args.id;
                let template = self
                    .tracker
                    .get_plan_task(&args.into())
                    .await
                    .context("Failed to get task template")?
                    .ok_or_else(|| anyhow!("Task template with ID {id} not found"))?;
                self.renderer.render(&template.to_string())
            }
            TemplateCommands::Update(args) => {
                let mut changes = Vec::new();
                if let Some(sprint) = args.sprint {
                    changes.push(format!("Sprint: {sprint}"));
                }
                if let Some(title) = &args.title {
                    changes.push(format!("Title: {title}"));
                }
                if args.details.is_some() {
                    changes.push("Details updated".to_string());
                }
                let template = self
                    .tracker
                    .update_plan_task(&args.into())
                    .await
                    .context("Failed to update task template")?;
                self.renderer
                    .render(&UpdateResult::with_changes(template, changes).to_string())
            }
            TemplateCommands::Delete(args) => {
                let id = require_confirmation(&args, "task template")?;
                let template = self
                    .tracker
                    .delete_plan_task(&id)
                    .await
                    .context("Failed to delete task template")?;
                self.renderer.render(&DeleteResult::new(template).to_string())
            }
            TemplateCommands::AddStep(args) => {
                let step = self
                    .tracker
                    .add_template_step(&args.into())
                    .await
                    .context("Failed to add template step")?;
                self.renderer.render(&CreateResult::new(step).to_string())
            }
            TemplateCommands::RemoveStep(args) => {
                let id = args.id;
                self.tracker
                    .remove_template_step(&args.into())
                    .await
                    .context("Failed to remove template step")?;
                let status = OperationStatus::success(format!("Removed template step {id}"));
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn handle_client_command(&self, command: ClientCommands) -> Result<()> {
        match command {
            ClientCommands::Create(args) => {
                let client = self
                    .tracker
                    .create_client(&args.into())
                    .await
                    .context("Failed to create client")?;
                self.renderer.render(&CreateResult::new(client).to_string())
            }
            ClientCommands::List => self.list_clients().await,
            ClientCommands::Show(args) => {
                let id = args.id;
                let client = self
                    .tracker
                    .get_client(&args.into())
                    .await
                    .context("Failed to get client")?
                    .ok_or_else(|| anyhow!("Client with ID {id} not found"))?;
                self.renderer.render(&client.to_string())
            }
            ClientCommands::Resolve(args) => {
                let client = self
                    .tracker
                    .resolve_client(&args.into())
                    .await
                    .context("Failed to resolve client")?;
                self.renderer.render(&client.to_string())
            }
            ClientCommands::AssignPlan(args) => {
                let change = match args.plan_id.filter(|_| !args.none) {
                    Some(plan_id) => format!("Plan: {plan_id}"),
                    None => "Plan removed".to_string(),
                };
                let client = self
                    .tracker
                    .assign_plan(&args.into())
                    .await
                    .context("Failed to assign plan")?;
                self.renderer
                    .render(&UpdateResult::with_changes(client, vec![change]).to_string())
            }
            ClientCommands::SetSprint(args) => {
                let change = format!("Sprint: {}", args.sprint);
                let client = self
                    .tracker
                    .set_current_sprint(&args.into())
                    .await
                    .context("Failed to set sprint")?;
                self.renderer
                    .render(&UpdateResult::with_changes(client, vec![change]).to_string())
            }
        }
    }

    pub async fn handle_sprint_command(&self, command: SprintCommands) -> Result<()> {
        match command {
            SprintCommands::Generate(args) => {
                let outcome = self
                    .tracker
                    .generate_sprint_tasks(&args.into())
                    .await
                    .context("Failed to generate sprint tasks")?;
                self.renderer
                    .render(&OperationStatus::success(outcome.message).to_string())
            }
            SprintCommands::Current(args) => {
                let outcome = self
                    .tracker
                    .generate_current_sprint(&args.into())
                    .await
                    .context("Failed to generate current sprint")?;
                self.renderer
                    .render(&OperationStatus::success(outcome.message).to_string())
            }
            SprintCommands::Advance(args) => {
                let outcome = self
                    .tracker
                    .advance_to_next_sprint(&args.into())
                    .await
                    .context("Failed to advance sprint")?;
                self.renderer.render(&outcome.to_string())
            }
            SprintCommands::Board(args) => {
                let board = self
                    .tracker
                    .sprint_board(&args.into())
                    .await
                    .context("Failed to load sprint board")?;
                self.renderer.render(&board.to_string())
            }
            SprintCommands::Summary(args) => {
                let board = self
                    .tracker
                    .sprint_board(&args.into())
                    .await
                    .context("Failed to load sprint board")?;
                self.renderer.raw(&SprintSummary(&board).to_string());
                Ok(())
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Submit(args) => {
                let task = self
                    .tracker
                    .submit_task(&args.into())
                    .await
                    .context("Failed to submit task")?;
                self.renderer.render(&CreateResult::new(task).to_string())
            }
            TaskCommands::List(args) => {
                let tasks = self
                    .tracker
                    .list_client_tasks(&args.into())
                    .await
                    .context("Failed to list tasks")?;
                self.renderer.render(&ClientTasks(tasks).to_string())
            }
            TaskCommands::Show(args) => {
                let id = args.id;
                let task = self
                    .tracker
                    .get_task(&args.into())
                    .await
                    .context("Failed to get task")?
                    .ok_or_else(|| anyhow!("Task with ID {id} not found"))?;
                self.renderer.render(&task.to_string())
            }
            TaskCommands::Approve(args) => {
                let task = self
                    .tracker
                    .approve_task(&args.into())
                    .await
                    .context("Failed to approve task")?;
                let change = format!("Approved into {}", sprint_label(&task));
                self.renderer
                    .render(&UpdateResult::with_changes(task, vec![change]).to_string())
            }
            TaskCommands::Status(args) => {
                let change = format!("Status: {}", args.status);
                let task = self
                    .tracker
                    .set_task_status(&args.into())
                    .await
                    .context("Failed to update task status")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, vec![change]).to_string())
            }
            TaskCommands::Reject(args) => {
                let task = self
                    .tracker
                    .reject_task(&args.into())
                    .await
                    .context("Failed to reject task")?;
                self.renderer.render(
                    &UpdateResult::with_changes(task, vec!["Rejected".to_string()]).to_string(),
                )
            }
            TaskCommands::Reason(args) => {
                let task = self
                    .tracker
                    .set_rejection_reason(&args.into())
                    .await
                    .context("Failed to record rejection reason")?;
                self.renderer.render(
                    &UpdateResult::with_changes(task, vec!["Rejection reason updated".to_string()])
                        .to_string(),
                )
            }
            TaskCommands::Link(args) => {
                let change = if args.clear {
                    "Delivery link removed"
                } else {
                    "Delivery link updated"
                };
                let task = self
                    .tracker
                    .set_completion_link(&args.into())
                    .await
                    .context("Failed to update delivery link")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, vec![change.to_string()]).to_string())
            }
            TaskCommands::Step(args) => {
                let step = self
                    .tracker
                    .set_step_done(&args.into())
                    .await
                    .context("Failed to update checklist step")?;
                self.renderer.render(&UpdateResult::new(step).to_string())
            }
            TaskCommands::Delete(args) => {
                let id = require_confirmation(&args, "task")?;
                let task = self
                    .tracker
                    .delete_task(&id)
                    .await
                    .context("Failed to delete task")?;
                self.renderer.render(&DeleteResult::new(task).to_string())
            }
        }
    }

    pub async fn dashboard(&self) -> Result<()> {
        let metrics = self
            .tracker
            .dashboard_metrics()
            .await
            .context("Failed to compute dashboard")?;
        self.renderer.render(&metrics.to_string())
    }

    pub async fn list_clients(&self) -> Result<()> {
        let clients = self
            .tracker
            .list_clients()
            .await
            .context("Failed to list clients")?;
        self.renderer
            .render(&format!("# Clients\n\n{}", Clients(clients)))
    }
}

fn sprint_label(task: &sprintdesk_core::ClientTask) -> String {
    task.sprint_key
        .map_or_else(|| "the backlog".to_string(), |key| key.label())
}

fn admin_secret(config: &AdminConfigArgs) -> Result<String, AuthError> {
    config
        .auth_secret
        .clone()
        .filter(|secret| !secret.is_empty())
        .ok_or(AuthError::MissingConfig("ADMIN_AUTH_SECRET"))
}

/// Admin commands need no database.
pub fn handle_admin_command(
    config: &AdminConfigArgs,
    command: AdminCommands,
    renderer: &TerminalRenderer,
) -> Result<()> {
    match command {
        AdminCommands::Login(args) => {
            let admin = AdminCredentials::new(
                config.admin_email.clone().unwrap_or_default(),
                config.admin_password.clone().unwrap_or_default(),
                config.auth_secret.clone().unwrap_or_default(),
            )
            .context("Admin account is not configured")?;
            let token = admin
                .login(&args.email, &args.password)
                .context("Login failed")?;
            debug!("Issued admin session for {}", admin.email());
            renderer.raw(&token);
            Ok(())
        }
        AdminCommands::Verify(args) => {
            let secret = admin_secret(config)?;
            let session = verify_token_at(&args.token, secret.as_bytes(), Timestamp::now())
                .context("Session rejected")?;
            let issued = Timestamp::from_second(session.iat)
                .context("Session carries an out-of-range issue time")?;
            renderer.render(
                &OperationStatus::success(format!(
                    "Valid session for {} issued {}",
                    session.email,
                    LocalDateTime(&issued)
                ))
                .to_string(),
            )
        }
        AdminCommands::Gate(args) => {
            let gate = AdminGate::new(admin_secret(config)?);
            match gate.check(&args.path, args.cookie.as_deref()) {
                GateDecision::Allow => renderer.raw("allow"),
                GateDecision::Redirect(location) => renderer.raw(&format!("redirect {location}")),
            }
            Ok(())
        }
    }
}
