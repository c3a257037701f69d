use anyhow::Result;
use atelier_editor::SourceKind;
use atelier_workspace::{Config, DEFAULT_CONFIG_NAME};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

const DEFAULT_HTML: &str = r#"<div class="container">
  <h1>My Website</h1>
  <p>Welcome to my site, built with Atelier.</p>
</div>"#;

const DEFAULT_CSS: &str = r#"body {
  font-family: 'Poppins', sans-serif;
  line-height: 1.6;
  color: #333;
  background-color: #f8f9fa;
  margin: 0;
  padding: 0;
}

.container {
  width: 80%;
  max-width: 1200px;
  margin: 0 auto;
  padding: 2rem;
}

h1 {
  color: #4a5568;
  margin-bottom: 1rem;
}

p {
  margin-bottom: 1.5rem;
}"#;

const DEFAULT_JS: &str = r#"// Your JavaScript here
document.addEventListener('DOMContentLoaded', () => {
  console.log('The site is loaded!');
});"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = ".")]
    pub src_dir: String,

    /// Force overwrite existing config and project files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Atelier project...".bright_blue().bold());

    let src_dir = cwd.join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    for kind in SourceKind::ALL {
        let path = src_dir.join(kind.file_name());
        if path.exists() && !args.force {
            println!("  {} Kept existing {}", "•".dimmed(), kind.file_name());
            continue;
        }
        fs::write(&path, default_source(kind))?;
        println!("  {} Created {}", "✓".green(), kind.file_name());
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/index.html", args.src_dir);
    println!("  2. Run: atelier compose");
    println!("  3. Open {}", config.output);

    Ok(())
}

fn default_source(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Html => DEFAULT_HTML,
        SourceKind::Css => DEFAULT_CSS,
        SourceKind::JavaScript => DEFAULT_JS,
    }
}
