//! Command-line argument definitions using clap.
//!
//! Every command has a clap `Args` wrapper that converts into the matching
//! core parameter struct:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Tracker
//! ```
//!
//! Core parameter types stay free of clap attributes. Help text, aliases and
//! flag spellings live here; business validation stays in the core.

use clap::{Args, Subcommand, ValueEnum};
use sprintdesk_core::params::*;

// ============================================================================
// Plans
// ============================================================================

/// Create a new plan
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Name of the plan
    pub name: String,
    /// Optional description of what the plan includes
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan {
            name: val.name,
            description: val.description,
        }
    }
}

/// Rename a plan or change its description
#[derive(Args)]
pub struct UpdatePlanArgs {
    #[arg(help = "Unique identifier of the plan to update")]
    pub id: u64,
    #[arg(short, long, help = "New name for the plan")]
    pub name: Option<String>,
    #[arg(
        short,
        long,
        help = "New description; pass an empty string to clear it"
    )]
    pub description: Option<String>,
}

impl From<UpdatePlanArgs> for UpdatePlan {
    fn from(val: UpdatePlanArgs) -> Self {
        UpdatePlan {
            id: val.id,
            name: val.name,
            description: val.description,
        }
    }
}

/// Target a resource by ID
#[derive(Args)]
pub struct IdArgs {
    #[arg(help = "Unique identifier of the resource")]
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Permanently delete a resource
#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Unique identifier of the resource to delete")]
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List all plans
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a plan with its templates grouped by sprint
    #[command(alias = "s")]
    Show(IdArgs),
    /// Rename a plan or change its description
    #[command(alias = "u")]
    Update(UpdatePlanArgs),
    /// Delete a plan and its templates
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
}

// ============================================================================
// Templates
// ============================================================================

/// Add a task template to one sprint of a plan
#[derive(Args)]
pub struct AddTemplateArgs {
    #[arg(help = "Plan the template belongs to")]
    pub plan_id: u64,
    #[arg(help = "Sprint the template is generated in (0 to 15)")]
    pub sprint: i64,
    /// Title clients will see on the generated task
    pub title: String,
    #[arg(short, long, help = "Details copied onto the generated task")]
    pub details: Option<String>,
}

impl From<AddTemplateArgs> for CreatePlanTask {
    fn from(val: AddTemplateArgs) -> Self {
        CreatePlanTask {
            plan_id: val.plan_id,
            sprint: val.sprint,
            title: val.title,
            details: val.details,
        }
    }
}

/// Edit a task template
///
/// Changes only affect tasks generated afterwards.
#[derive(Args)]
pub struct UpdateTemplateArgs {
    #[arg(help = "Unique identifier of the template to update")]
    pub id: u64,
    #[arg(short, long, help = "Move the template to another sprint (0 to 15)")]
    pub sprint: Option<i64>,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New details; pass an empty string to clear them")]
    pub details: Option<String>,
}

impl From<UpdateTemplateArgs> for UpdatePlanTask {
    fn from(val: UpdateTemplateArgs) -> Self {
        UpdatePlanTask {
            id: val.id,
            sprint: val.sprint,
            title: val.title,
            details: val.details,
        }
    }
}

/// Add a checklist step to a template
#[derive(Args)]
pub struct AddStepArgs {
    #[arg(help = "Template the step belongs to")]
    pub template_id: u64,
    /// Title of the step
    pub title: String,
    #[arg(
        short,
        long,
        help = "Position in the checklist; defaults to after the last step"
    )]
    pub order: Option<i64>,
}

impl From<AddStepArgs> for AddTemplateStep {
    fn from(val: AddStepArgs) -> Self {
        AddTemplateStep {
            plan_task_id: val.template_id,
            title: val.title,
            step_order: val.order,
        }
    }
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Add a task template to a plan
    #[command(alias = "a")]
    Add(AddTemplateArgs),
    /// List the templates of a plan
    #[command(aliases = ["l", "ls"])]
    List(IdArgs),
    /// Show a template with its checklist
    #[command(alias = "s")]
    Show(IdArgs),
    /// Edit a template
    #[command(alias = "u")]
    Update(UpdateTemplateArgs),
    /// Delete a template
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
    /// Add a checklist step to a template
    AddStep(AddStepArgs),
    /// Remove a checklist step from a template
    RemoveStep(IdArgs),
}

// ============================================================================
// Clients
// ============================================================================

/// Create a client
#[derive(Args)]
pub struct CreateClientArgs {
    /// Display name of the client
    pub name: String,
    /// Access code the client uses to open their board
    pub slug: String,
}

impl From<CreateClientArgs> for CreateClient {
    fn from(val: CreateClientArgs) -> Self {
        CreateClient {
            name: val.name,
            slug: val.slug,
        }
    }
}

/// Find a client by access code
#[derive(Args)]
pub struct ResolveClientArgs {
    /// Access code to look up
    pub slug: String,
}

impl From<ResolveClientArgs> for ResolveClient {
    fn from(val: ResolveClientArgs) -> Self {
        ResolveClient { slug: val.slug }
    }
}

/// Put a client on a plan
#[derive(Args)]
pub struct AssignPlanArgs {
    pub client_id: u64,
    #[arg(
        required_unless_present = "none",
        help = "Plan to assign to the client"
    )]
    pub plan_id: Option<u64>,
    /// Take the client off their current plan
    #[arg(long, conflicts_with = "plan_id")]
    pub none: bool,
}

impl From<AssignPlanArgs> for AssignPlan {
    fn from(val: AssignPlanArgs) -> Self {
        AssignPlan {
            client_id: val.client_id,
            plan_id: if val.none { None } else { val.plan_id },
        }
    }
}

/// Move a client's sprint cursor without generating tasks
#[derive(Args)]
pub struct SetSprintArgs {
    pub client_id: u64,
    #[arg(help = "Sprint to move the client to (0 to 15)")]
    pub sprint: i64,
}

impl From<SetSprintArgs> for SetSprint {
    fn from(val: SetSprintArgs) -> Self {
        SetSprint {
            client_id: val.client_id,
            sprint: val.sprint,
        }
    }
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Create a client
    #[command(alias = "c")]
    Create(CreateClientArgs),
    /// List clients
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a client
    #[command(alias = "s")]
    Show(IdArgs),
    /// Find a client by access code
    #[command(alias = "r")]
    Resolve(ResolveClientArgs),
    /// Put a client on a plan, or take them off with --none
    AssignPlan(AssignPlanArgs),
    /// Move a client's sprint cursor without generating tasks
    SetSprint(SetSprintArgs),
}

// ============================================================================
// Sprints
// ============================================================================

/// Generate a plan's templates for one sprint of one client
#[derive(Args)]
pub struct GenerateArgs {
    pub client_id: u64,
    pub plan_id: u64,
    #[arg(help = "Sprint to generate (0 to 15)")]
    pub sprint: i64,
}

impl From<GenerateArgs> for GenerateSprintTasks {
    fn from(val: GenerateArgs) -> Self {
        GenerateSprintTasks {
            client_id: val.client_id,
            plan_id: val.plan_id,
            sprint: val.sprint,
        }
    }
}

/// Target a client by ID
#[derive(Args)]
pub struct ClientIdArgs {
    pub client_id: u64,
}

impl From<ClientIdArgs> for Id {
    fn from(val: ClientIdArgs) -> Self {
        Id { id: val.client_id }
    }
}

#[derive(Subcommand)]
pub enum SprintCommands {
    /// Generate tasks for a given plan and sprint
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Generate the client's current sprint from their own plan
    #[command(alias = "c")]
    Current(ClientIdArgs),
    /// Move the client to the next sprint and generate it
    #[command(alias = "a")]
    Advance(ClientIdArgs),
    /// Show the client's backlog and active sprint
    #[command(alias = "b")]
    Board(ClientIdArgs),
    /// Print the plain-text weekly summary for the client
    #[command(alias = "s")]
    Summary(ClientIdArgs),
}

// ============================================================================
// Tasks
// ============================================================================

/// File a request into a client's backlog
#[derive(Args)]
pub struct SubmitTaskArgs {
    pub client_id: u64,
    /// Brief title of the request
    pub title: String,
    #[arg(short, long, help = "What the client is asking for")]
    pub details: Option<String>,
}

impl From<SubmitTaskArgs> for SubmitTask {
    fn from(val: SubmitTaskArgs) -> Self {
        SubmitTask {
            client_id: val.client_id,
            title: val.title,
            details: val.details,
        }
    }
}

/// Move a task to another status
#[derive(Args)]
pub struct SetStatusArgs {
    pub id: u64,
    pub status: TaskStatusArg,
}

impl From<SetStatusArgs> for SetTaskStatus {
    fn from(val: SetStatusArgs) -> Self {
        SetTaskStatus {
            id: val.id,
            status: val.status.to_string(),
        }
    }
}

/// Reject a task
#[derive(Args)]
pub struct RejectTaskArgs {
    pub id: u64,
    #[arg(short, long, help = "Why the task was rejected")]
    pub reason: Option<String>,
}

impl From<RejectTaskArgs> for RejectTask {
    fn from(val: RejectTaskArgs) -> Self {
        RejectTask {
            id: val.id,
            reason: val.reason,
        }
    }
}

/// Record why a rejected task was rejected
#[derive(Args)]
pub struct RejectionReasonArgs {
    pub id: u64,
    pub reason: String,
}

impl From<RejectionReasonArgs> for SetRejectionReason {
    fn from(val: RejectionReasonArgs) -> Self {
        SetRejectionReason {
            id: val.id,
            reason: val.reason,
        }
    }
}

/// Set or clear where a delivered task's work can be found
#[derive(Args)]
pub struct CompletionLinkArgs {
    pub id: u64,
    #[arg(required_unless_present = "clear", help = "http:// or https:// link")]
    pub link: Option<String>,
    /// Remove the current link
    #[arg(long, conflicts_with = "link")]
    pub clear: bool,
}

impl From<CompletionLinkArgs> for SetCompletionLink {
    fn from(val: CompletionLinkArgs) -> Self {
        SetCompletionLink {
            id: val.id,
            link: if val.clear { None } else { val.link },
        }
    }
}

/// Tick or untick a checklist step
#[derive(Args)]
pub struct StepDoneArgs {
    pub step_id: u64,
    /// Mark the step as not done
    #[arg(long)]
    pub undo: bool,
}

impl From<StepDoneArgs> for SetStepDone {
    fn from(val: StepDoneArgs) -> Self {
        SetStepDone {
            step_id: val.step_id,
            done: !val.undo,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// File a request into a client's backlog
    Submit(SubmitTaskArgs),
    /// List a client's tasks, newest first
    #[command(aliases = ["l", "ls"])]
    List(ClientIdArgs),
    /// Show a task with its checklist
    #[command(alias = "s")]
    Show(IdArgs),
    /// Approve a suggested task into the client's active sprint
    #[command(alias = "a")]
    Approve(IdArgs),
    /// Move a task to another status
    Status(SetStatusArgs),
    /// Reject a task
    Reject(RejectTaskArgs),
    /// Record why a rejected task was rejected
    Reason(RejectionReasonArgs),
    /// Set or clear the delivery link of a delivered task
    Link(CompletionLinkArgs),
    /// Tick or untick a checklist step
    Step(StepDoneArgs),
    /// Delete a task and its checklist
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
}

/// Statuses a task can be moved to from the command line
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum TaskStatusArg {
    Queued,
    InProgress,
    Alteration,
    #[value(alias = "completed")]
    Done,
    Rejected,
}

impl std::fmt::Display for TaskStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatusArg::Queued => write!(f, "queued"),
            TaskStatusArg::InProgress => write!(f, "in_progress"),
            TaskStatusArg::Alteration => write!(f, "alteration"),
            TaskStatusArg::Done => write!(f, "done"),
            TaskStatusArg::Rejected => write!(f, "rejected"),
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

/// The configured admin account, usually taken from the environment
#[derive(Args)]
pub struct AdminConfigArgs {
    #[arg(long, env = "ADMIN_EMAIL", hide_env_values = true)]
    pub admin_email: Option<String>,
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
    #[arg(long, env = "ADMIN_AUTH_SECRET", hide_env_values = true)]
    pub auth_secret: Option<String>,
}

/// Log in as the admin and print a session token
#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    #[arg(long)]
    pub password: String,
}

/// Check a session token
#[derive(Args)]
pub struct VerifyArgs {
    pub token: String,
}

/// Decide whether a request path would be let through
#[derive(Args)]
pub struct GateArgs {
    /// Request path, e.g. /admin/clientes
    pub path: String,
    #[arg(long, help = "Value of the session cookie, if the request has one")]
    pub cookie: Option<String>,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Log in and print a session token
    Login(LoginArgs),
    /// Check a session token
    Verify(VerifyArgs),
    /// Decide whether a request path would be let through
    Gate(GateArgs),
}
