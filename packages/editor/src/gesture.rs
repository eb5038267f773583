//! # Drag Gestures
//!
//! Explicit state machine for dragging bricks onto the grid:
//!
//! ```text
//!          start            drop (valid)
//!   Idle ────────→ Dragging ────────────→ Dropped
//!                   │    ↺ pointer_move
//!                   │
//!                   └── cancel / drop (rejected) ──→ Cancelled
//! ```
//!
//! Every pointer event re-runs the pure layout queries against the current
//! page: `pointer_move` produces a preview (possibly `forbidden`), `drop`
//! validates strictly. The gesture never mutates the page; committing a drop
//! is the session's job.

use brickwork_layout::{
    can_drop_on_layout, compute_drop_target, constraints_for, pixel_to_grid, validate_placement,
    Breakpoint, Brick, BrickId, BrickType, DropTarget, GridCell, GridConfig, Page, PixelPoint, Placement,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Grid the gesture happens on: a breakpoint canvas or the inside of a
/// container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub breakpoint: Breakpoint,
    pub grid: GridConfig,

    /// Top-left corner of the grid in page pixels
    pub origin: PixelPoint,

    /// Container whose grid this is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BrickId>,
}

impl Viewport {
    pub fn new(breakpoint: Breakpoint, grid: GridConfig) -> Self {
        Self {
            breakpoint,
            grid,
            origin: PixelPoint::ORIGIN,
            parent: None,
        }
    }

    pub fn at(mut self, origin: PixelPoint) -> Self {
        self.origin = origin;
        self
    }

    pub fn inside(mut self, parent: impl Into<BrickId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragSource {
    /// New brick from the library
    Library(BrickType),

    /// Existing brick being moved
    Move(BrickId),

    /// Existing brick being resized from its bottom-right corner
    Resize(BrickId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,

    Dragging {
        source: DragSource,
        viewport: Viewport,
        grab_offset: PixelPoint,
        preview: Option<Placement>,
    },

    Dropped {
        source: DragSource,
        breakpoint: Breakpoint,
        placement: Placement,
    },

    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Placed {
        source: DragSource,
        breakpoint: Breakpoint,
        placement: Placement,
    },
    Rejected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("No drag in progress")]
    NotDragging,

    #[error("A drag is already in progress")]
    AlreadyDragging,

    #[error("Brick not found: {0}")]
    BrickNotFound(BrickId),

    #[error("Brick {0} has no position at {1}")]
    NotPlaced(BrickId, Breakpoint),
}

#[derive(Debug, Clone)]
pub struct DragGesture {
    state: GestureState,
}

impl DragGesture {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Current preview while dragging
    pub fn preview(&self) -> Option<&Placement> {
        match &self.state {
            GestureState::Dragging { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }

    /// Begin a drag. `grab_offset` is where the pointer holds the dragged
    /// element relative to its top-left corner.
    pub fn start(
        &mut self,
        source: DragSource,
        viewport: Viewport,
        grab_offset: PixelPoint,
    ) -> Result<(), GestureError> {
        if self.is_dragging() {
            return Err(GestureError::AlreadyDragging);
        }

        trace!(?source, breakpoint = %viewport.breakpoint, "Drag started");
        self.state = GestureState::Dragging {
            source,
            viewport,
            grab_offset,
            preview: None,
        };
        Ok(())
    }

    /// Update the preview for a new pointer position
    pub fn pointer_move(
        &mut self,
        page: &Page,
        pointer: PixelPoint,
    ) -> Result<Option<Placement>, GestureError> {
        let GestureState::Dragging {
            source,
            viewport,
            grab_offset,
            preview,
        } = &mut self.state
        else {
            return Err(GestureError::NotDragging);
        };

        let (target, brick_type) = drop_target(page, source, viewport, *grab_offset, pointer)?;
        let constraints = constraints_for(brick_type, viewport.breakpoint);

        *preview = can_drop_on_layout(
            obstacles(page, source, viewport.breakpoint),
            viewport.breakpoint,
            &target,
            &constraints,
            false,
        );
        Ok(preview.clone())
    }

    /// Release the pointer. A rejected drop cancels the gesture.
    pub fn drop(&mut self, page: &Page, pointer: PixelPoint) -> Result<DropOutcome, GestureError> {
        let GestureState::Dragging {
            source,
            viewport,
            grab_offset,
            ..
        } = &self.state
        else {
            return Err(GestureError::NotDragging);
        };

        let (target, brick_type) = drop_target(page, source, viewport, *grab_offset, pointer)?;
        let constraints = constraints_for(brick_type, viewport.breakpoint);
        let breakpoint = viewport.breakpoint;

        let bricks = obstacles(page, source, breakpoint);
        match validate_placement(bricks, breakpoint, &target, &constraints) {
            Some(placement) => {
                let source = source.clone();
                self.state = GestureState::Dropped {
                    source: source.clone(),
                    breakpoint,
                    placement: placement.clone(),
                };
                Ok(DropOutcome::Placed {
                    source,
                    breakpoint,
                    placement,
                })
            }
            None => {
                trace!(x = target.cell.x, y = target.cell.y, "Drop rejected");
                self.state = GestureState::Cancelled;
                Ok(DropOutcome::Rejected)
            }
        }
    }

    pub fn cancel(&mut self) -> Result<(), GestureError> {
        if !self.is_dragging() {
            return Err(GestureError::NotDragging);
        }
        self.state = GestureState::Cancelled;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}

/// Bricks that can block the gesture. Mobile resizes restack their
/// neighbours, so nothing blocks them.
fn obstacles<'a>(page: &'a Page, source: &DragSource, breakpoint: Breakpoint) -> &'a [Brick] {
    match source {
        DragSource::Resize(_) if breakpoint == Breakpoint::Mobile => &[],
        _ => page.bricks.as_slice(),
    }
}

fn drop_target(
    page: &Page,
    source: &DragSource,
    viewport: &Viewport,
    grab_offset: PixelPoint,
    pointer: PixelPoint,
) -> Result<(DropTarget, BrickType), GestureError> {
    let breakpoint = viewport.breakpoint;
    let cell = compute_drop_target(pointer, grab_offset, viewport.origin, &viewport.grid);

    let target = match source {
        DragSource::Library(brick_type) => {
            let mut target = DropTarget::at(cell);
            target.parent = viewport.parent.clone();
            (target, *brick_type)
        }

        DragSource::Move(id) => {
            let (brick_type, position) = placed(page, id, breakpoint)?;
            let mut target = DropTarget::at(cell)
                .with_size(position.w, position.h)
                .for_brick(id.clone());
            target.parent = viewport.parent.clone();
            (target, brick_type)
        }

        DragSource::Resize(id) => {
            let (brick_type, position) = placed(page, id, breakpoint)?;
            // Grid line nearest to the pointer becomes the bottom-right edge
            let corner = pixel_to_grid(pointer, viewport.origin, &viewport.grid);
            let mut target = DropTarget::at(GridCell::new(position.x, position.y))
                .with_size(
                    corner.x.saturating_sub(position.x),
                    corner.y.saturating_sub(position.y),
                )
                .for_brick(id.clone());
            target.parent = position.parent.clone();
            (target, brick_type)
        }
    };

    Ok(target)
}

fn placed(
    page: &Page,
    id: &BrickId,
    breakpoint: Breakpoint,
) -> Result<(BrickType, brickwork_layout::Position), GestureError> {
    let brick = page
        .get(id)
        .ok_or_else(|| GestureError::BrickNotFound(id.clone()))?;
    let position = brick
        .position(breakpoint)
        .ok_or_else(|| GestureError::NotPlaced(id.clone(), breakpoint))?;
    Ok((brick.brick_type, position.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_layout::Position;

    fn viewport() -> Viewport {
        Viewport::new(Breakpoint::Desktop, GridConfig::new(100.0, 50.0))
    }

    fn page() -> Page {
        Page::new(vec![
            Brick::new("a", BrickType::Button)
                .with_position(Breakpoint::Desktop, Position::new(0, 0, 2, 1)),
            Brick::new("b", BrickType::Button)
                .with_position(Breakpoint::Desktop, Position::new(4, 0, 2, 1)),
        ])
    }

    #[test]
    fn test_drop_while_idle_fails() {
        let mut gesture = DragGesture::new();
        assert_eq!(
            gesture.drop(&page(), PixelPoint::ORIGIN),
            Err(GestureError::NotDragging)
        );
        assert_eq!(gesture.cancel(), Err(GestureError::NotDragging));
    }

    #[test]
    fn test_double_start_fails() {
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Library(BrickType::Text), viewport(), PixelPoint::ORIGIN)
            .unwrap();
        assert_eq!(
            gesture.start(DragSource::Library(BrickType::Text), viewport(), PixelPoint::ORIGIN),
            Err(GestureError::AlreadyDragging)
        );
    }

    #[test]
    fn test_preview_flags_collisions() {
        let page = page();
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Move("b".into()), viewport(), PixelPoint::ORIGIN)
            .unwrap();

        // Over "a"
        let preview = gesture.pointer_move(&page, PixelPoint::new(110.0, 0.0)).unwrap();
        assert!(preview.unwrap().forbidden);

        // Free space
        let preview = gesture.pointer_move(&page, PixelPoint::new(810.0, 0.0)).unwrap();
        let preview = preview.unwrap();
        assert!(!preview.forbidden);
        assert_eq!((preview.position.x, preview.position.w), (8, 2));
        assert_eq!(gesture.preview(), Some(&preview));
    }

    #[test]
    fn test_move_ignores_own_rectangle() {
        let page = page();
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Move("b".into()), viewport(), PixelPoint::ORIGIN)
            .unwrap();

        // One column right of where it is, overlapping its old place
        let outcome = gesture.drop(&page, PixelPoint::new(500.0, 0.0)).unwrap();
        assert!(matches!(outcome, DropOutcome::Placed { ref placement, .. } if placement.position.x == 5));
        assert!(matches!(gesture.state(), GestureState::Dropped { .. }));
    }

    #[test]
    fn test_rejected_drop_cancels() {
        let page = page();
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Library(BrickType::Button), viewport(), PixelPoint::ORIGIN)
            .unwrap();

        let outcome = gesture.drop(&page, PixelPoint::new(100.0, 0.0)).unwrap();
        assert_eq!(outcome, DropOutcome::Rejected);
        assert_eq!(gesture.state(), &GestureState::Cancelled);
    }

    #[test]
    fn test_resize_clamps_to_constraints() {
        let page = page();
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Resize("a".into()), viewport(), PixelPoint::ORIGIN)
            .unwrap();

        // Buttons are at most 4 wide
        match gesture.drop(&page, PixelPoint::new(1180.0, 190.0)).unwrap() {
            DropOutcome::Placed { placement, .. } => {
                assert_eq!((placement.position.w, placement.position.h), (4, 4));
            }
            DropOutcome::Rejected => panic!("resize rejected"),
        }
    }

    #[test]
    fn test_unknown_brick() {
        let mut gesture = DragGesture::new();
        gesture
            .start(DragSource::Move("zzz".into()), viewport(), PixelPoint::ORIGIN)
            .unwrap();
        assert_eq!(
            gesture.pointer_move(&page(), PixelPoint::ORIGIN),
            Err(GestureError::BrickNotFound("zzz".into()))
        );
    }
}
