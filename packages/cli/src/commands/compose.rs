use crate::commands::project_dir;
use anyhow::Result;
use atelier_composer::{compose as compose_document, ComposeOptions, CssFramework};
use atelier_editor::SourceDocument;
use atelier_protocol::InteractionMode;
use atelier_workspace::Config;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// Project directory (defaults to the configured source directory)
    pub path: Option<String>,

    /// Interaction mode (selection, interaction)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// CSS framework (pure, tailwind, bootstrap)
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output file (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Mode and framework after applying command-line overrides
pub struct Settings {
    pub mode: InteractionMode,
    pub framework: CssFramework,
}

impl Settings {
    pub fn resolve(config: &Config, mode: Option<&str>, framework: Option<&str>) -> Result<Self> {
        let mode = match mode {
            Some(mode) => mode.parse::<InteractionMode>()?,
            None => config.mode,
        };
        let framework = match framework {
            Some(framework) => framework.parse::<CssFramework>().map_err(anyhow::Error::msg)?,
            None => config.framework,
        };
        Ok(Self { mode, framework })
    }
}

pub fn compose(args: ComposeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = project_dir(args.path.as_deref(), &config, cwd);
    let settings = Settings::resolve(&config, args.mode.as_deref(), args.framework.as_deref())?;

    let document = compose_project(&dir, &settings)?;

    if args.stdout {
        println!("{}", document);
        return Ok(());
    }

    let output = match &args.output {
        Some(output) => cwd.join(output),
        None => config.get_output(&dir),
    };
    write_output(&output, &document)?;

    println!(
        "{} Composed {} → {} ({} mode, {})",
        "✓".green(),
        dir.display(),
        output.display(),
        settings.mode,
        settings.framework
    );
    Ok(())
}

/// Load the project buffers and compose them into one document
pub fn compose_project(dir: &Path, settings: &Settings) -> Result<String> {
    let project = SourceDocument::load(dir)?;
    let options = ComposeOptions::with_framework(settings.framework);
    Ok(compose_document(project.buffers(), settings.mode, &options)?)
}

pub fn write_output(output: &Path, document: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, document)?;
    Ok(())
}
