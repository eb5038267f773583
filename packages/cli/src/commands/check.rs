use anyhow::Result;
use brickwork_editor::read_page;
use brickwork_layout::{audit_layout, LayoutIssue};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page file or directory of page files
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let input = cwd.join(&args.input);
    let files = if input.is_file() {
        vec![input]
    } else if input.is_dir() {
        find_page_files(&input)
    } else {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    };

    let mut total_issues = 0;
    for file in &files {
        let issues = check_file(file)?;
        total_issues += issues.len();
        report(file, &issues, &args.format)?;
    }

    if args.format != "json" {
        println!();
        println!("   Pages checked: {}", files.len());
        if total_issues == 0 {
            println!("   {} No layout issues found!", "✓".green());
        } else {
            println!("   {} {}", "Issues:".red(), total_issues);
        }
    }

    if total_issues > 0 {
        std::process::exit(1);
    }

    Ok(())
}

pub fn check_file(path: &Path) -> Result<Vec<LayoutIssue>> {
    let file = read_page(path)?;
    let issues = audit_layout(&file.page.bricks);
    debug!(path = %path.display(), issues = issues.len(), "Page audited");
    Ok(issues)
}

fn report(path: &Path, issues: &[LayoutIssue], format: &str) -> Result<()> {
    if format == "json" {
        let json = serde_json::json!({
            "path": path.display().to_string(),
            "issues": issues,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if issues.is_empty() {
        println!("{} {}", "✓".green(), path.display());
        return Ok(());
    }

    println!("{} {}", "✗".red(), path.display());
    for issue in issues {
        println!("  {} {}", "error".red().bold(), issue);
    }
    Ok(())
}

fn find_page_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path.extension().map(|e| e == "json").unwrap_or(false)
                && !path.ends_with(crate::config::DEFAULT_CONFIG_NAME)
        })
        .collect()
}
