//! Gantt CLI Application
//!
//! Command-line front end for the hierarchical Gantt chart core.

mod args;
mod cli;
mod demo;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use gantt_core::ChartStoreBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let store = ChartStoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize chart store")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Gantt started with database {}", store.db_path().display());

    let cli = Cli::new(store, renderer);
    match command {
        Some(Show) | None => cli.show().await,
        Some(Tree) => cli.tree().await,
        Some(Demo(args)) => cli.demo(args).await,
        Some(Expand(args)) => cli.expand(args).await,
        Some(Collapse(args)) => cli.collapse(args).await,
        Some(Toggle(args)) => cli.toggle(args).await,
        Some(Export) => cli.export().await,
        Some(Config { command }) => cli.handle_config_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
    }
}
