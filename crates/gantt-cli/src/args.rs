use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ConfigCommands, DemoArgs, StepCommands, StepRefArgs};

/// Hierarchical Gantt chart on the command line
///
/// Keeps a chart of nested steps in a local SQLite database and shows its
/// visible rows: root steps are always listed, child steps only below an
/// expanded parent. Steps are referenced by identifier, by a unique
/// identifier prefix, or by visible row as `@N`.
#[derive(Parser)]
#[command(version, about, name = "gantt")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/gantt/gantt.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Gantt CLI
///
/// Without a command the visible rows are shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the visible rows of the chart
    #[command(aliases = ["s", "ls"])]
    Show,
    /// Show every step as a nested outline, ignoring expand state
    #[command(alias = "t")]
    Tree,
    /// Load the demo dataset
    Demo(DemoArgs),
    /// Expand a step so its children become visible
    #[command(alias = "e")]
    Expand(StepRefArgs),
    /// Collapse a step, hiding all of its descendants
    #[command(alias = "c")]
    Collapse(StepRefArgs),
    /// Expand a collapsed step or collapse an expanded one
    Toggle(StepRefArgs),
    /// Print the chart as JSON
    Export,
    /// Show or change chart settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage individual steps
    #[command(alias = "st")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
}
