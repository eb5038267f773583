use crate::config::Config;
use anyhow::Result;
use brickwork_editor::PageDraft;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReflowArgs {
    /// Page file
    pub page: PathBuf,

    /// Write the result back instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

pub fn reflow(args: ReflowArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut draft = PageDraft::load(cwd.join(&args.page))?;

    let changed = draft.adjust_mobile_layout(&config.reflow_config());

    if !args.write {
        println!("{}", draft.page().to_json()?);
        return Ok(());
    }

    if changed == 0 {
        println!("{} {} is already in sync", "✓".green(), args.page.display());
        return Ok(());
    }

    draft.save()?;
    println!(
        "{} Reflowed {} brick(s) in {}",
        "✓".green(),
        changed,
        args.page.display()
    );
    Ok(())
}
