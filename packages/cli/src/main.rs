mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    compose, elements, init, insert, inspect, watch, ComposeArgs, ElementsArgs, InitArgs,
    InsertArgs, InspectArgs, WatchArgs,
};
use tracing_subscriber::EnvFilter;

/// Atelier CLI - compose, inspect and edit HTML/CSS/JS projects
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Atelier project
    Init(InitArgs),

    /// Compose the project into one standalone document
    Compose(ComposeArgs),

    /// Insert a library element into index.html
    Insert(InsertArgs),

    /// Show the styles and script references for an element
    Inspect(InspectArgs),

    /// List the element library
    Elements(ElementsArgs),

    /// Recompose on every source change
    Watch(WatchArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Compose(args) => compose(args, &cwd),
            Command::Insert(args) => insert(args, &cwd),
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Elements(args) => elements(args),
            Command::Watch(args) => watch(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
