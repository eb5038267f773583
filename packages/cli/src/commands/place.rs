use crate::config::Config;
use anyhow::Result;
use brickwork_editor::{EditSession, PageDraft};
use brickwork_layout::{
    can_drop_on_layout, constraints_for_name, pixel_to_grid, Breakpoint, BrickId, BrickType,
    DropTarget, PixelPoint, Placement,
};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PlaceArgs {
    /// Page file
    pub page: PathBuf,

    /// Brick type to drop (text, image, hero, button, video, container)
    #[arg(short = 't', long = "type")]
    pub brick_type: String,

    /// Pointer x in pixels, relative to the canvas
    #[arg(short, long)]
    pub x: f64,

    /// Pointer y in pixels, relative to the canvas
    #[arg(short, long)]
    pub y: f64,

    /// Breakpoint canvas the drop happens on
    #[arg(short, long, default_value = "desktop")]
    pub breakpoint: String,

    /// Container to drop into
    #[arg(long)]
    pub parent: Option<String>,

    /// Reject colliding drops instead of previewing them
    #[arg(long)]
    pub strict: bool,

    /// Add the brick to the page file when the drop is valid
    #[arg(short, long)]
    pub write: bool,
}

pub fn place(args: PlaceArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let breakpoint: Breakpoint = args.breakpoint.parse()?;
    let constraints = constraints_for_name(&args.brick_type, breakpoint)?;
    let brick_type: BrickType = args.brick_type.parse()?;

    let path = cwd.join(&args.page);
    let draft = PageDraft::load(&path)?;

    let grid = config.grid_for(breakpoint);
    let cell = pixel_to_grid(PixelPoint::new(args.x, args.y), PixelPoint::ORIGIN, &grid);
    let mut target = DropTarget::at(cell);
    target.parent = args.parent.clone().map(Into::into);

    println!(
        "📍 ({}, {}) px → cell ({}, {}) on {}",
        args.x, args.y, cell.x, cell.y, breakpoint
    );

    let placement = can_drop_on_layout(draft.bricks(), breakpoint, &target, &constraints, args.strict);
    report(placement.as_ref());

    let Some(placement) = placement.filter(|p| !p.forbidden) else {
        std::process::exit(1);
    };

    if args.write {
        let id = write_brick(draft, &config, brick_type, breakpoint, placement)?;
        println!("  {} Added {} to {}", "✓".green(), id, args.page.display());
    }

    Ok(())
}

fn report(placement: Option<&Placement>) {
    match placement {
        None => println!("  {} Drop rejected", "✗".red()),
        Some(placement) => {
            let p = &placement.position;
            let status = if placement.forbidden {
                "forbidden".red().bold()
            } else {
                "ok".green().bold()
            };
            println!("  {} x={} y={} w={} h={}", status, p.x, p.y, p.w, p.h);
        }
    }
}

fn write_brick(
    draft: PageDraft,
    config: &Config,
    brick_type: BrickType,
    breakpoint: Breakpoint,
    placement: Placement,
) -> Result<BrickId> {
    let mut session = EditSession::with_options("cli", draft, config.session_options());
    let (id, _) = session.add_placed_brick(brick_type, breakpoint, placement)?;
    session.flush()?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(breakpoint: &str) -> PlaceArgs {
        PlaceArgs {
            page: PathBuf::from("page.json"),
            brick_type: "text".to_string(),
            x: 0.0,
            y: 0.0,
            breakpoint: breakpoint.to_string(),
            parent: None,
            strict: true,
            write: true,
        }
    }

    #[test]
    fn test_mobile_write_also_places_on_desktop() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.json"), r#"{ "bricks": [] }"#).unwrap();

        place(args("mobile"), dir.path()).unwrap();

        let draft = PageDraft::load(&dir.path().join("page.json")).unwrap();
        let brick = draft.get_brick(&"text-1".into()).unwrap();
        assert!(brick.position(Breakpoint::Desktop).is_some());
        assert_eq!(brick.position(Breakpoint::Mobile).unwrap().w, 1);
    }

    #[test]
    fn test_desktop_write_uses_next_free_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("page.json"),
            r#"{ "bricks": [
                { "id": "text-1", "type": "text", "position": { "desktop": { "x": 6, "y": 0, "w": 6, "h": 2 } } }
            ] }"#,
        )
        .unwrap();

        place(args("desktop"), dir.path()).unwrap();

        let draft = PageDraft::load(&dir.path().join("page.json")).unwrap();
        let brick = draft.get_brick(&"text-2".into()).unwrap();
        let desktop = brick.position(Breakpoint::Desktop).unwrap();
        assert_eq!((desktop.x, desktop.y, desktop.w, desktop.h), (0, 0, 6, 2));
        assert!(brick.position(Breakpoint::Mobile).is_some());
    }
}
