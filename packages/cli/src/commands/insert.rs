use crate::commands::project_dir;
use anyhow::Result;
use atelier_editor::{EditSession, SourceDocument};
use atelier_workspace::Config;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Library element tag, e.g. `section` or `button`
    pub tag: String,

    /// Project directory (defaults to the configured source directory)
    pub path: Option<String>,
}

pub fn insert(args: InsertArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = project_dir(args.path.as_deref(), &config, cwd);

    let mut session = EditSession::new(SourceDocument::load(&dir)?);
    let insertion = session.insert_element(&args.tag)?;

    if !insertion.edit.changed {
        println!("{} index.html unchanged", "⚠️".yellow());
        return Ok(());
    }

    session.document_mut().save()?;

    println!(
        "{} Inserted <{}> into {} ({})",
        "✓".green(),
        insertion.preselection.tag,
        dir.join("index.html").display(),
        session.strategy_name().dimmed()
    );
    println!("{}", serde_json::to_string_pretty(&insertion.preselection)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_insert_before_last_div() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<div>A</div>").unwrap();

        insert(
            InsertArgs {
                tag: "canvas".to_string(),
                path: None,
            },
            dir.path(),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            "<div>A  <canvas></canvas>\n</div>"
        );
    }

    #[test]
    fn test_insert_unknown_tag() {
        let dir = tempfile::tempdir().unwrap();
        let result = insert(
            InsertArgs {
                tag: "marquee".to_string(),
                path: None,
            },
            dir.path(),
        );
        assert!(result.is_err());
    }
}
