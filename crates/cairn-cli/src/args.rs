use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Main command-line interface for the Cairn plan tracking tool
///
/// Cairn tracks long-running implementation work as a directory of
/// markdown plan documents with checklists, context manifests, and
/// per-plan execution history. The CLI scans a plan directory, reports
/// which plan the next execution step should target, and records the
/// cost of completed steps.
#[derive(Parser)]
#[command(version, about, name = "cairn")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Cairn CLI
#[derive(Subcommand)]
pub enum Commands {
    /// List the plans in a directory
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show one plan with its checklist, context files, and subplans
    Show(ShowArgs),
    /// Report the plan the next execution step should target
    Next(NextArgs),
    /// Extract cost data from command output and append it to a plan's
    /// history
    Record(RecordArgs),
    /// Print a plan's execution history
    History(HistoryArgs),
}

/// List the plans in a directory
#[derive(ClapArgs)]
pub struct ListArgs {
    /// Plan directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Emit machine-readable JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

/// Show details of a specific plan
#[derive(ClapArgs)]
pub struct ShowArgs {
    /// Path to the plan file
    pub plan: PathBuf,

    /// Emit machine-readable JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

/// Report the next execution target per root plan
#[derive(ClapArgs)]
pub struct NextArgs {
    /// Plan directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Also list the files an execution step should receive
    #[arg(long)]
    pub files: bool,
}

/// Record one execution step against a plan
#[derive(ClapArgs)]
pub struct RecordArgs {
    /// Path to the plan file the step was executed against
    pub plan: PathBuf,

    /// Read the command output from a file instead of stdin
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

/// Print a plan's execution history
#[derive(ClapArgs)]
pub struct HistoryArgs {
    /// Path to the plan file
    pub plan: PathBuf,
}
