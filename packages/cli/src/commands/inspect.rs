use crate::commands::project_dir;
use anyhow::{anyhow, Result};
use atelier_editor::SourceDocument;
use atelier_protocol::{PropertyMap, SelectedElement};
use atelier_styles::TextualMatcher;
use atelier_workspace::{inspect as inspect_element, Config, Inspection};
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Project directory (defaults to the configured source directory)
    pub path: Option<String>,

    /// Tag of the element to inspect
    #[arg(short, long)]
    pub tag: String,

    /// Attribute as name=value; repeatable
    #[arg(short, long = "attr", value_name = "NAME=VALUE")]
    pub attrs: Vec<String>,

    /// Inner HTML of the element
    #[arg(short, long, default_value = "")]
    pub content: String,
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = project_dir(args.path.as_deref(), &config, cwd);
    let project = SourceDocument::load(&dir)?;

    let inspection = run(&args, &project)?;
    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}

fn run(args: &InspectArgs, project: &SourceDocument) -> Result<Inspection> {
    let element = SelectedElement {
        tag: args.tag.to_ascii_lowercase(),
        properties: parse_attributes(&args.attrs)?,
        content: args.content.clone(),
    };
    Ok(inspect_element(
        &element,
        project.css(),
        project.javascript(),
        &TextualMatcher,
    ))
}

fn parse_attributes(pairs: &[String]) -> Result<PropertyMap> {
    pairs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Attribute must be NAME=VALUE, got {:?}", pair))?;
            Ok((name.trim().to_string(), value.to_string()))
        })
        .collect()
}
