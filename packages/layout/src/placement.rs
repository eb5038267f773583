//! # Drop Placement
//!
//! Decides whether a brick can land on a target cell and with which size.
//!
//! Two modes:
//! - **strict** (drop commit): any collision rejects the placement
//! - **preview** (drag-over): collisions are reported through
//!   [`Placement::forbidden`] so the host can draw an invalid-drop indicator
//!
//! A size that cannot satisfy the type's minimum on this breakpoint is
//! rejected in both modes.

use crate::breakpoint::Breakpoint;
use crate::brick::{Brick, BrickId, Position};
use crate::collision::{detect_collisions, has_collisions, Candidate};
use crate::constraints::Constraints;
use crate::geometry::{pixel_to_grid, GridCell, GridConfig, GridSize, PixelPoint, Rect};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where and how a brick is being dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub cell: GridCell,

    /// Explicit size from a resize or a move; `None` for a fresh drop from
    /// the library, which uses the preferred size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<GridSize>,

    /// Brick being moved or resized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brick_id: Option<BrickId>,

    /// Container the brick is dropped into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BrickId>,
}

impl DropTarget {
    pub fn at(cell: GridCell) -> Self {
        Self {
            cell,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, w: u32, h: u32) -> Self {
        self.size = Some(GridSize::new(w, h));
        self
    }

    pub fn for_brick(mut self, id: impl Into<BrickId>) -> Self {
        self.brick_id = Some(id.into());
        self
    }

    pub fn inside(mut self, parent: impl Into<BrickId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Resolved placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,

    /// Set in preview mode when the rectangle collides with a sibling
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub forbidden: bool,
}

/// Clamp the requested size into the constraints.
///
/// Width is bounded by `[min_width, min(max_width, columns)]`, height by
/// `[min_height, ∞)`. Returns `None` when the breakpoint is too narrow to
/// honour `min_width`.
pub fn resolve_size(
    requested: Option<GridSize>,
    constraints: &Constraints,
    columns: u32,
) -> Option<GridSize> {
    let requested = requested.unwrap_or(GridSize {
        w: constraints.preferred_width,
        h: constraints.preferred_height,
    });

    let max_width = constraints.max_width.min(columns);
    let w = requested.w.max(constraints.min_width).min(max_width);
    let h = requested.h.max(constraints.min_height).max(1);

    if w < constraints.min_width || w == 0 {
        return None;
    }

    Some(GridSize { w, h })
}

/// Check whether a brick can be dropped at `target`.
///
/// Returns `None` when the drop is rejected. In preview mode
/// (`strict == false`) a colliding rectangle is still returned, flagged
/// `forbidden`.
pub fn can_drop_on_layout(
    bricks: &[Brick],
    breakpoint: Breakpoint,
    target: &DropTarget,
    constraints: &Constraints,
    strict: bool,
) -> Option<Placement> {
    let columns = breakpoint.columns();
    let Some(size) = resolve_size(target.size, constraints, columns) else {
        trace!(%breakpoint, min_width = constraints.min_width, "Brick does not fit breakpoint");
        return None;
    };

    let candidate = candidate_at(target, size, columns, target.cell.y);
    let collisions = detect_collisions(&candidate, bricks, breakpoint);

    if !collisions.is_empty() && strict {
        trace!(
            %breakpoint,
            collisions = collisions.len(),
            x = candidate.rect.x,
            y = candidate.rect.y,
            "Drop rejected"
        );
        return None;
    }

    Some(Placement {
        position: position_from(&candidate),
        forbidden: !collisions.is_empty(),
    })
}

/// Strict check used when committing a drop
pub fn validate_placement(
    bricks: &[Brick],
    breakpoint: Breakpoint,
    target: &DropTarget,
    constraints: &Constraints,
) -> Option<Placement> {
    can_drop_on_layout(bricks, breakpoint, target, constraints, true)
}

/// Grid cell under a dragged element.
///
/// `grab_offset` is where the pointer grabbed the element, relative to the
/// element's top-left corner.
pub fn compute_drop_target(
    pointer: PixelPoint,
    grab_offset: PixelPoint,
    origin: PixelPoint,
    grid: &GridConfig,
) -> GridCell {
    let top_left = PixelPoint::new(pointer.x - grab_offset.x, pointer.y - grab_offset.y);
    pixel_to_grid(top_left, origin, grid)
}

/// Nearest strict placement at or below the target cell.
///
/// Rows are scanned downward from `target.cell.y`; within a row, columns are
/// tried by distance from `target.cell.x` (left first on ties). The row just
/// below the lowest sibling is always free, so a result exists whenever the
/// size itself is valid.
pub fn find_free_position(
    bricks: &[Brick],
    breakpoint: Breakpoint,
    target: &DropTarget,
    constraints: &Constraints,
) -> Option<Placement> {
    let columns = breakpoint.columns();
    let size = resolve_size(target.size, constraints, columns)?;

    let lowest = bricks
        .iter()
        .filter(|b| target.brick_id.as_ref() != Some(&b.id))
        .filter_map(|b| b.position(breakpoint))
        .filter(|p| !p.hidden && p.parent == target.parent)
        .map(|p| p.rect().bottom())
        .max()
        .unwrap_or(0);
    let last_row = lowest.max(target.cell.y);

    let anchor = target.cell.x.min(columns - size.w);
    let mut xs: Vec<u32> = (0..=columns - size.w).collect();
    xs.sort_by_key(|x| (x.abs_diff(anchor), *x));

    for y in target.cell.y..=last_row {
        for &x in &xs {
            let probe = DropTarget {
                cell: GridCell::new(x, y),
                ..target.clone()
            };
            let candidate = candidate_at(&probe, size, columns, y);
            if !has_collisions(&candidate, bricks, breakpoint) {
                return Some(Placement {
                    position: position_from(&candidate),
                    forbidden: false,
                });
            }
        }
    }

    None
}

fn candidate_at(target: &DropTarget, size: GridSize, columns: u32, y: u32) -> Candidate {
    // resolve_size guarantees size.w <= columns
    let x = target.cell.x.min(columns - size.w);
    Candidate {
        rect: Rect::new(x, y, size.w, size.h),
        id: target.brick_id.clone(),
        parent: target.parent.clone(),
    }
}

fn position_from(candidate: &Candidate) -> Position {
    Position {
        x: candidate.rect.x,
        y: candidate.rect.y,
        w: candidate.rect.w,
        h: candidate.rect.h,
        hidden: false,
        manual_height: None,
        parent: candidate.parent.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::constraints_for;
    use crate::manifest::BrickType;

    fn constraints(min_width: u32, max_width: u32, preferred: (u32, u32)) -> Constraints {
        Constraints {
            min_width,
            min_height: 1,
            max_width,
            preferred_width: preferred.0,
            preferred_height: preferred.1,
        }
    }

    fn placed(id: &str, position: Position) -> Brick {
        Brick::new(id, BrickType::Text).with_position(Breakpoint::Desktop, position)
    }

    #[test]
    fn test_preferred_size_for_library_drop() {
        let c = constraints(1, 12, (2, 1));
        let placement = can_drop_on_layout(
            &[],
            Breakpoint::Desktop,
            &DropTarget::at(GridCell::new(2, 1)),
            &c,
            true,
        )
        .unwrap();

        assert_eq!(placement.position, Position::new(2, 1, 2, 1));
        assert!(!placement.forbidden);
    }

    #[test]
    fn test_explicit_size_is_clamped() {
        let c = constraints(2, 4, (2, 1));
        let placement = can_drop_on_layout(
            &[],
            Breakpoint::Desktop,
            &DropTarget::at(GridCell::new(0, 0)).with_size(9, 0),
            &c,
            true,
        )
        .unwrap();

        assert_eq!(placement.position.w, 4);
        assert_eq!(placement.position.h, 1);

        let narrow = can_drop_on_layout(
            &[],
            Breakpoint::Desktop,
            &DropTarget::at(GridCell::new(0, 0)).with_size(1, 1),
            &c,
            true,
        )
        .unwrap();
        assert_eq!(narrow.position.w, 2);
    }

    #[test]
    fn test_x_is_clamped_to_columns() {
        let c = constraints(1, 12, (4, 1));
        let placement = can_drop_on_layout(
            &[],
            Breakpoint::Desktop,
            &DropTarget::at(GridCell::new(11, 0)),
            &c,
            true,
        )
        .unwrap();

        assert_eq!(placement.position.x, 8);
        assert_eq!(placement.position.x + placement.position.w, 12);
    }

    #[test]
    fn test_too_narrow_breakpoint_rejects_in_both_modes() {
        let c = constraints_for(BrickType::Hero, Breakpoint::Desktop);
        let target = DropTarget::at(GridCell::new(0, 0));

        assert!(can_drop_on_layout(&[], Breakpoint::Mobile, &target, &c, true).is_none());
        assert!(can_drop_on_layout(&[], Breakpoint::Mobile, &target, &c, false).is_none());
    }

    #[test]
    fn test_preview_mode_flags_collisions() {
        let bricks = vec![placed("a", Position::new(0, 0, 4, 2))];
        let c = constraints(1, 12, (2, 1));
        let target = DropTarget::at(GridCell::new(1, 1));

        assert!(can_drop_on_layout(&bricks, Breakpoint::Desktop, &target, &c, true).is_none());

        let preview =
            can_drop_on_layout(&bricks, Breakpoint::Desktop, &target, &c, false).unwrap();
        assert!(preview.forbidden);
        assert_eq!(preview.position, Position::new(1, 1, 2, 1));
    }

    #[test]
    fn test_moving_brick_ignores_itself() {
        let bricks = vec![placed("a", Position::new(0, 0, 4, 2))];
        let c = constraints(1, 12, (2, 1));
        let target = DropTarget::at(GridCell::new(1, 1))
            .with_size(4, 2)
            .for_brick("a");

        assert!(validate_placement(&bricks, Breakpoint::Desktop, &target, &c).is_some());
    }

    #[test]
    fn test_nested_drop_keeps_parent() {
        let bricks = vec![placed("box", Position::new(0, 0, 12, 4))];
        let c = constraints(1, 12, (2, 1));
        let target = DropTarget::at(GridCell::new(0, 0)).inside("box");

        let placement = validate_placement(&bricks, Breakpoint::Desktop, &target, &c).unwrap();
        assert_eq!(placement.position.parent, Some(BrickId::from("box")));
    }

    #[test]
    fn test_compute_drop_target_uses_grab_offset() {
        let grid = GridConfig::new(100.0, 50.0);
        let cell = compute_drop_target(
            PixelPoint::new(340.0, 120.0),
            PixelPoint::new(40.0, 20.0),
            PixelPoint::ORIGIN,
            &grid,
        );
        assert_eq!(cell, GridCell::new(3, 2));
    }

    #[test]
    fn test_find_free_position_prefers_nearest_column() {
        let bricks = vec![placed("a", Position::new(0, 0, 6, 2))];
        let c = constraints(1, 12, (4, 2));
        let target = DropTarget::at(GridCell::new(2, 0));

        let placement = find_free_position(&bricks, Breakpoint::Desktop, &target, &c).unwrap();
        assert_eq!(placement.position, Position::new(6, 0, 4, 2));
    }

    #[test]
    fn test_find_free_position_moves_down_when_row_is_full() {
        let bricks = vec![placed("a", Position::new(0, 0, 12, 3))];
        let c = constraints(1, 12, (4, 2));
        let target = DropTarget::at(GridCell::new(4, 1));

        let placement = find_free_position(&bricks, Breakpoint::Desktop, &target, &c).unwrap();
        assert_eq!(placement.position, Position::new(4, 3, 4, 2));
    }
}
