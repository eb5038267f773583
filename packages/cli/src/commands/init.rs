use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use brickwork_layout::{Breakpoint, Brick, BrickType, Page, Position};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Example page to create
    #[arg(short, long, default_value = "pages/home.json")]
    pub page: PathBuf,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Brickwork project...".bright_blue().bold());

    let config_json = serde_json::to_string_pretty(&Config::default())?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let page_path = cwd.join(&args.page);
    if !page_path.exists() {
        if let Some(dir) = page_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&page_path, example_page().to_json()?)?;
        println!("  {} Created {}", "✓".green(), args.page.display());
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: brickwork reflow {} --write", args.page.display());
    println!("  2. Run: brickwork check {}", args.page.display());

    Ok(())
}

fn example_page() -> Page {
    Page::new(vec![
        Brick::new("hero-1", BrickType::Hero)
            .with_position(Breakpoint::Desktop, Position::new(0, 0, 12, 5)),
        Brick::new("text-1", BrickType::Text)
            .with_position(Breakpoint::Desktop, Position::new(0, 5, 6, 2)),
        Brick::new("image-1", BrickType::Image)
            .with_position(Breakpoint::Desktop, Position::new(6, 5, 4, 6)),
        Brick::new("button-1", BrickType::Button)
            .with_position(Breakpoint::Desktop, Position::new(0, 7, 2, 1)),
    ])
}
