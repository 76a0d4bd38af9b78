//! sprintdesk CLI application
//!
//! Command-line board for agency plans, clients and their sprint tasks.

mod args;
mod cli;
mod handlers;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handlers::{handle_admin_command, Cli};
use log::info;
use renderer::TerminalRenderer;
use sprintdesk_core::TrackerBuilder;
use Commands::*;

async fn connect(database_file: Option<PathBuf>, renderer: TerminalRenderer) -> Result<Cli> {
    let tracker = TrackerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize tracker")?;

    info!("sprintdesk started with {}", tracker.database_path().display());
    Ok(Cli::new(tracker, renderer))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        Some(Plan { command }) => {
            connect(database_file, renderer)
                .await?
                .handle_plan_command(command)
                .await
        }
        Some(Template { command }) => {
            connect(database_file, renderer)
                .await?
                .handle_template_command(command)
                .await
        }
        Some(Client { command }) => {
            connect(database_file, renderer)
                .await?
                .handle_client_command(command)
                .await
        }
        Some(Sprint { command }) => {
            connect(database_file, renderer)
                .await?
                .handle_sprint_command(command)
                .await
        }
        Some(Task { command }) => {
            connect(database_file, renderer)
                .await?
                .handle_task_command(command)
                .await
        }
        Some(Dashboard) => connect(database_file, renderer).await?.dashboard().await,
        Some(Admin { config, command }) => handle_admin_command(&config, command, &renderer),
        None => connect(database_file, renderer).await?.list_clients().await,
    }
}
