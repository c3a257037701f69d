use anyhow::Result;
use atelier_editor::library;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ElementsArgs {
    /// Filter by tag or description (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Print the matching definitions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn elements(args: ElementsArgs) -> Result<()> {
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&library::search(&args.search))?
        );
        return Ok(());
    }

    let groups = library::grouped(&args.search);
    if groups.is_empty() {
        println!("{} No element matches {:?}", "⚠️".yellow(), args.search);
        return Ok(());
    }

    for (category, definitions) in groups {
        println!("{}", category.label().bright_blue().bold());
        for definition in definitions {
            let tag = format!("<{}>", definition.tag);
            println!("  {:<14} {}", tag.green(), definition.description);
        }
        println!();
    }

    Ok(())
}
