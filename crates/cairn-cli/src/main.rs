//! Cairn CLI Application
//!
//! Command-line interface for the cairn plan tracking tool.

mod args;
mod cli;
mod renderer;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::Renderer;

fn main() -> Result<()> {
    env_logger::init();

    let Args { no_color, command } = Args::parse();
    let cli = Cli::new(Renderer::new(!no_color));

    info!("Cairn started");

    match command {
        Commands::List(args) => cli.list(&args),
        Commands::Show(args) => cli.show(&args),
        Commands::Next(args) => cli.next(&args),
        Commands::Record(args) => cli.record(&args),
        Commands::History(args) => cli.history(&args),
    }
}
