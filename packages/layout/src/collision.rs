//! # Collision Detection
//!
//! Bricks only collide with siblings: a top-level candidate is checked
//! against other top-level bricks, a nested candidate against bricks sharing
//! its container. Container children live in a coordinate system local to
//! their container, so comparing them with page-level rectangles would be
//! meaningless.
//!
//! Bricks with no position at the breakpoint, or hidden there, take no space.

use crate::breakpoint::Breakpoint;
use crate::brick::{Brick, BrickId};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Rectangle being tested for a free spot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub rect: Rect,

    /// Brick being moved or resized; its current position is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BrickId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BrickId>,
}

impl Candidate {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            id: None,
            parent: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<BrickId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent: Option<BrickId>) -> Self {
        self.parent = parent;
        self
    }

    /// Candidate describing an already placed brick
    pub fn from_brick(brick: &Brick, breakpoint: Breakpoint) -> Option<Self> {
        let position = brick.position(breakpoint)?;
        Some(Self {
            rect: position.rect(),
            id: Some(brick.id.clone()),
            parent: position.parent.clone(),
        })
    }
}

/// Every sibling brick whose rectangle at `breakpoint` overlaps the candidate
pub fn detect_collisions<'a>(
    candidate: &Candidate,
    bricks: &'a [Brick],
    breakpoint: Breakpoint,
) -> Vec<&'a Brick> {
    bricks
        .iter()
        .filter(|brick| collides(candidate, brick, breakpoint))
        .collect()
}

/// Short-circuiting form of [`detect_collisions`]
pub fn has_collisions(candidate: &Candidate, bricks: &[Brick], breakpoint: Breakpoint) -> bool {
    bricks
        .iter()
        .any(|brick| collides(candidate, brick, breakpoint))
}

fn collides(candidate: &Candidate, brick: &Brick, breakpoint: Breakpoint) -> bool {
    if candidate.id.as_ref() == Some(&brick.id) {
        return false;
    }

    match brick.position(breakpoint) {
        Some(position) => {
            !position.hidden
                && position.parent == candidate.parent
                && position.rect().overlaps(&candidate.rect)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::Position;
    use crate::manifest::BrickType;

    fn brick(id: &str, position: Position) -> Brick {
        Brick::new(id, BrickType::Text).with_position(Breakpoint::Desktop, position)
    }

    fn ids(bricks: Vec<&Brick>) -> Vec<&str> {
        bricks.into_iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_overlapping_both_neighbours() {
        let bricks = vec![
            brick("a", Position::new(0, 0, 2, 1)),
            brick("b", Position::new(2, 0, 2, 1)),
        ];
        let candidate = Candidate::new(Rect::new(1, 0, 2, 1));

        let hits = detect_collisions(&candidate, &bricks, Breakpoint::Desktop);
        assert_eq!(ids(hits), vec!["a", "b"]);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let bricks = vec![brick("a", Position::new(0, 0, 2, 2))];
        let right = Candidate::new(Rect::new(2, 0, 2, 2));
        let below = Candidate::new(Rect::new(0, 2, 2, 2));

        assert!(!has_collisions(&right, &bricks, Breakpoint::Desktop));
        assert!(!has_collisions(&below, &bricks, Breakpoint::Desktop));
    }

    #[test]
    fn test_own_prior_position_is_ignored() {
        let bricks = vec![brick("a", Position::new(0, 0, 2, 2))];
        let moved = Candidate::new(Rect::new(1, 1, 2, 2)).with_id("a");

        assert!(detect_collisions(&moved, &bricks, Breakpoint::Desktop).is_empty());
    }

    #[test]
    fn test_only_siblings_collide() {
        let bricks = vec![
            brick("top", Position::new(0, 0, 4, 4)),
            brick("nested", Position::new(0, 0, 2, 2).with_parent("box")),
            brick("other", Position::new(0, 0, 2, 2).with_parent("other-box")),
        ];

        let top_level = Candidate::new(Rect::new(1, 1, 1, 1));
        assert_eq!(
            ids(detect_collisions(&top_level, &bricks, Breakpoint::Desktop)),
            vec!["top"]
        );

        let in_box = Candidate::new(Rect::new(1, 1, 1, 1)).with_parent(Some("box".into()));
        assert_eq!(
            ids(detect_collisions(&in_box, &bricks, Breakpoint::Desktop)),
            vec!["nested"]
        );
    }

    #[test]
    fn test_missing_breakpoint_position_is_skipped() {
        let bricks = vec![brick("a", Position::new(0, 0, 2, 2))];
        let candidate = Candidate::new(Rect::new(0, 0, 1, 1));

        assert!(detect_collisions(&candidate, &bricks, Breakpoint::Mobile).is_empty());
    }

    #[test]
    fn test_hidden_bricks_take_no_space() {
        let bricks = vec![brick("a", Position::new(0, 0, 2, 2).hidden())];
        let candidate = Candidate::new(Rect::new(0, 0, 1, 1));

        assert!(!has_collisions(&candidate, &bricks, Breakpoint::Desktop));
    }
}
