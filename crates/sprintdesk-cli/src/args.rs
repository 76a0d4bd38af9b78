use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    AdminCommands, AdminConfigArgs, ClientCommands, PlanCommands, SprintCommands, TaskCommands,
    TemplateCommands,
};

/// Sprint board for agency clients
///
/// sprintdesk keeps the plans an agency sells, the clients on them, and the
/// tasks ("demandas") each client receives sprint by sprint. Plans define
/// task templates per sprint; generating a sprint copies those templates onto
/// the client's board without duplicating what is already there.
#[derive(Parser)]
#[command(version, about, name = "sprintdesk")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/sprintdesk/sprintdesk.db
    #[arg(long, global = true, env = "SPRINTDESK_DATABASE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the sprintdesk CLI
///
/// Without a command, the client list is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage the task templates of a plan
    #[command(alias = "tpl")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Manage clients
    #[command(alias = "c")]
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Generate, advance and review client sprints
    #[command(alias = "s")]
    Sprint {
        #[command(subcommand)]
        command: SprintCommands,
    },
    /// Manage client tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show agency-wide figures
    #[command(alias = "d")]
    Dashboard,
    /// Issue and check admin session tokens
    Admin {
        #[command(flatten)]
        config: AdminConfigArgs,
        #[command(subcommand)]
        command: AdminCommands,
    },
}
