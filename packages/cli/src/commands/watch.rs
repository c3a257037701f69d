use crate::commands::compose::{compose_project, write_output, Settings};
use crate::commands::project_dir;
use anyhow::Result;
use atelier_workspace::{Config, ProjectWatcher};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

/// Events arriving this close together are one save
const SETTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Project directory (defaults to the configured source directory)
    pub path: Option<String>,

    /// Interaction mode (selection, interaction)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// CSS framework (pure, tailwind, bootstrap)
    #[arg(short, long)]
    pub framework: Option<String>,
}

pub fn watch(args: WatchArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = project_dir(args.path.as_deref(), &config, cwd);
    let settings = Settings::resolve(&config, args.mode.as_deref(), args.framework.as_deref())?;
    let output = config.get_output(&dir);

    let watcher = ProjectWatcher::new(dir.clone())?;

    rebuild(&dir, &output, &settings);
    println!("\n{}", "👀 Watching for changes...".bright_blue());

    while let Some(mut kinds) = watcher.next_change() {
        while let Some(more) = watcher.next_change_timeout(SETTLE) {
            kinds.extend(more);
        }
        kinds.sort_by_key(|kind| kind.file_name());
        kinds.dedup();

        let names: Vec<_> = kinds.iter().map(|kind| kind.file_name()).collect();
        println!("{} {}", "↻".bright_blue(), names.join(", "));
        rebuild(&dir, &output, &settings);
    }

    Ok(())
}

/// Compose errors are reported and watching goes on
fn rebuild(dir: &Path, output: &Path, settings: &Settings) {
    let result = compose_project(dir, settings).and_then(|document| write_output(output, &document));
    match result {
        Ok(()) => println!("  {} {}", "✓".green(), output.display()),
        Err(e) => eprintln!("  {} {}", "✗".red(), e.to_string().red()),
    }
}
