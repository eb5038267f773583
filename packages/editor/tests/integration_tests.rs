//! Integration tests for editor crate

use anyhow::Result;
use brickwork_editor::{
    DragSource, EditSession, GestureState, Mutation, PageDraft, PositionPatch, SessionOptions,
    Viewport,
};
use brickwork_layout::{
    audit_layout, Breakpoint, Brick, BrickType, GridCell, GridConfig, Page, PixelPoint, Position,
    ReflowConfig,
};

fn grid() -> GridConfig {
    GridConfig::new(100.0, 50.0).with_padding(10.0, 10.0)
}

#[test]
fn test_draft_lifecycle() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("home.json");
    std::fs::write(
        &path,
        r#"{ "bricks": [
            { "id": "title", "type": "text", "position": { "desktop": { "x": 0, "y": 0, "w": 6, "h": 2 } } }
        ] }"#,
    )?;

    let mut session = EditSession::new("local", PageDraft::load(&path)?);
    assert_eq!(session.draft().version, 0);
    assert!(!session.draft().is_dirty());

    session.insert_brick(BrickType::Image, GridCell::new(0, 0), None)?;
    assert!(session.draft().is_dirty());
    session.flush()?;

    let reloaded = PageDraft::load(&path)?;
    assert_eq!(reloaded.bricks().len(), 2);
    assert!(reloaded.saved_at().is_some());
    assert!(audit_layout(reloaded.bricks()).is_empty());
    Ok(())
}

#[test]
fn test_drop_from_library_at_pixel() -> Result<()> {
    let mut session = EditSession::new("local", PageDraft::from_page(Page::default()));

    session.start_drag(
        DragSource::Library(BrickType::Button),
        Viewport::new(Breakpoint::Desktop, grid()),
        PixelPoint::ORIGIN,
    )?;
    let preview = session.drag_move(PixelPoint::new(215.0, 65.0))?;
    assert_eq!(preview.map(|p| p.position), Some(Position::new(2, 1, 2, 1)));

    let result = session.drop_at(PixelPoint::new(215.0, 65.0))?;
    assert!(result.is_some());
    assert_eq!(session.gesture().state(), &GestureState::Idle);

    let button = session.draft().get_brick(&"button-1".into()).unwrap();
    assert_eq!(button.position(Breakpoint::Desktop), Some(&Position::new(2, 1, 2, 1)));
    Ok(())
}

#[test]
fn test_move_into_container_and_reflow() -> Result<()> {
    let page = Page::new(vec![
        Brick::new("box", BrickType::Container)
            .with_position(Breakpoint::Desktop, Position::new(0, 0, 12, 4)),
        Brick::new("title", BrickType::Text)
            .with_position(Breakpoint::Desktop, Position::new(0, 4, 6, 2)),
    ]);
    let mut session = EditSession::new("local", PageDraft::from_page(page));

    // Drag the title into the container's own grid
    session.start_drag(
        DragSource::Move("title".into()),
        Viewport::new(Breakpoint::Desktop, grid()).inside("box"),
        PixelPoint::ORIGIN,
    )?;
    session.drop_at(PixelPoint::new(10.0, 10.0))?;

    let title = session.draft().get_brick(&"title".into()).unwrap();
    assert_eq!(title.parent(Breakpoint::Desktop), Some(&"box".into()));
    assert_eq!(title.parent(Breakpoint::Mobile), Some(&"box".into()));

    let mobile = title.position(Breakpoint::Mobile).unwrap();
    assert_eq!((mobile.x, mobile.y, mobile.h), (0, 0, 2));
    assert!(audit_layout(session.draft().bricks()).is_empty());
    Ok(())
}

#[test]
fn test_cancelled_drag_leaves_page_alone() -> Result<()> {
    let mut session = EditSession::new("local", PageDraft::from_page(Page::default()));
    session.insert_brick(BrickType::Text, GridCell::new(0, 0), None)?;
    let before = session.draft().page().clone();

    session.start_drag(
        DragSource::Move("text-1".into()),
        Viewport::new(Breakpoint::Desktop, grid()),
        PixelPoint::ORIGIN,
    )?;
    session.drag_move(PixelPoint::new(610.0, 310.0))?;
    session.cancel_drag()?;

    assert_eq!(session.draft().page(), &before);
    assert!(session.drop_at(PixelPoint::ORIGIN).is_err());
    Ok(())
}

#[test]
fn test_wider_mobile_columns_scale_heights() -> Result<()> {
    let options = SessionOptions {
        reflow: ReflowConfig {
            desktop_column_width: 100.0,
            mobile_column_width: 150.0,
        },
        ..SessionOptions::default()
    };
    let mut session = EditSession::with_options("local", PageDraft::from_page(Page::default()), options);

    let brick = Brick::new("a", BrickType::Text)
        .with_position(Breakpoint::Desktop, Position::new(0, 0, 6, 2));
    session.apply(Mutation::AddBrick { brick, parent: None })?;

    let mobile = session
        .draft()
        .get_brick(&"a".into())
        .and_then(|b| b.position(Breakpoint::Mobile))
        .cloned()
        .unwrap();
    assert_eq!(mobile.h, 3);
    Ok(())
}

#[test]
fn test_mobile_hidden_brick_frees_its_space() -> Result<()> {
    let mut session = EditSession::new("local", PageDraft::from_page(Page::default()));
    let first = session.insert_brick(BrickType::Text, GridCell::new(0, 0), None)?;
    let second = session.insert_brick(BrickType::Text, GridCell::new(0, 2), None)?;

    session.apply(Mutation::UpdateBrickPosition {
        brick_id: first.clone(),
        breakpoint: Breakpoint::Mobile,
        patch: PositionPatch::hidden(true),
    })?;

    let second = session.draft().get_brick(&second).unwrap();
    assert_eq!(second.position(Breakpoint::Mobile).unwrap().y, 0);

    let first = session.draft().get_brick(&first).unwrap();
    assert!(first.position(Breakpoint::Mobile).unwrap().hidden);
    // Desktop is untouched
    assert!(first.is_visible(Breakpoint::Desktop));
    Ok(())
}
