//! # Page Mutations
//!
//! Every change to a page draft goes through a [`Mutation`].
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each variant is one user-level operation
//! 2. **Validated**: nothing is applied unless the whole mutation is valid
//! 3. **Invertible**: `to_inverse` captures what undo needs before applying
//!
//! ## Mutation Semantics
//!
//! ### UpdateBrickPosition
//! - User move or resize at one breakpoint
//! - Rejected if the result overlaps a visible sibling
//! - Rejected if nesting would create a parent cycle
//!
//! - On mobile, `hidden` and `manualHeight` changes skip the sibling check:
//!   the stack is re-derived right after, pushing neighbours down
//!
//! ### SetBrickPosition
//! - Raw replacement, used by mobile re-sync and by undo
//! - Only checks the rectangle itself; intermediate states of a batch may
//!   overlap until the batch completes
//!
//! ### RemoveBrick / RestoreBrick
//! - Restore puts the brick back at its original index so undo keeps the
//!   collection order stable

use brickwork_layout::{
    has_collisions, Breakpoint, Brick, BrickId, Candidate, Page, Position,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Typed changes applied to a page draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Add a new brick, optionally nested in a container at every breakpoint
    AddBrick {
        brick: Brick,
        parent: Option<BrickId>,
    },

    /// Remove a brick from the page
    RemoveBrick { brick_id: BrickId },

    /// Re-insert a removed brick at its former index
    RestoreBrick { brick: Brick, index: usize },

    /// Move, resize or re-nest a brick at one breakpoint
    UpdateBrickPosition {
        brick_id: BrickId,
        breakpoint: Breakpoint,
        patch: PositionPatch,
    },

    /// Replace (or clear) a brick's position at one breakpoint
    SetBrickPosition {
        brick_id: BrickId,
        breakpoint: Breakpoint,
        position: Option<Position>,
    },

    /// Replace a brick's props
    UpdateProps { brick_id: BrickId, props: Value },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Brick not found: {0}")]
    BrickNotFound(BrickId),

    #[error("Parent not found: {0}")]
    ParentNotFound(BrickId),

    #[error("Brick {0} cannot contain other bricks")]
    NotAContainer(BrickId),

    #[error("Brick id already in use: {0}")]
    DuplicateId(BrickId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid position for {brick_id} at {breakpoint}: {reason}")]
    InvalidPosition {
        brick_id: BrickId,
        breakpoint: Breakpoint,
        reason: String,
    },

    #[error("Placement of {brick_id} at {breakpoint} collides with a sibling")]
    PlacementRejected {
        brick_id: BrickId,
        breakpoint: Breakpoint,
    },
}

/// Partial position update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// `Some(None)` clears the manual height
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub manual_height: Option<Option<u32>>,

    /// `Some(None)` moves the brick to the top level
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Option<BrickId>>,
}

/// Distinguishes an explicit `null` from an absent field
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl PositionPatch {
    pub fn moved_to(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn resized(w: u32, h: u32) -> Self {
        Self {
            w: Some(w),
            h: Some(h),
            ..Self::default()
        }
    }

    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, base: &Position) -> Position {
        Position {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            w: self.w.unwrap_or(base.w),
            h: self.h.unwrap_or(base.h),
            hidden: self.hidden.unwrap_or(base.hidden),
            manual_height: self.manual_height.unwrap_or(base.manual_height),
            parent: self.parent.clone().unwrap_or_else(|| base.parent.clone()),
        }
    }
}

impl Mutation {
    /// Brick this mutation targets
    pub fn brick_id(&self) -> &BrickId {
        match self {
            Mutation::AddBrick { brick, .. } | Mutation::RestoreBrick { brick, .. } => &brick.id,
            Mutation::RemoveBrick { brick_id }
            | Mutation::UpdateBrickPosition { brick_id, .. }
            | Mutation::SetBrickPosition { brick_id, .. }
            | Mutation::UpdateProps { brick_id, .. } => brick_id,
        }
    }

    /// Short human-readable name, used for undo descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddBrick { .. } => "Add brick",
            Mutation::RemoveBrick { .. } => "Remove brick",
            Mutation::RestoreBrick { .. } => "Restore brick",
            Mutation::UpdateBrickPosition { .. } => "Move brick",
            Mutation::SetBrickPosition { .. } => "Set position",
            Mutation::UpdateProps { .. } => "Edit properties",
        }
    }

    /// Whether the mobile stack has to be recomputed after this mutation
    pub fn needs_reflow(&self) -> bool {
        match self {
            Mutation::AddBrick { .. }
            | Mutation::RemoveBrick { .. }
            | Mutation::RestoreBrick { .. } => true,
            Mutation::UpdateBrickPosition {
                breakpoint, patch, ..
            } => {
                *breakpoint == Breakpoint::Desktop
                    || patch.hidden.is_some()
                    || patch.manual_height.is_some()
            }
            Mutation::SetBrickPosition { breakpoint, .. } => *breakpoint == Breakpoint::Desktop,
            Mutation::UpdateProps { .. } => false,
        }
    }

    /// Apply mutation to the page with validation
    pub fn apply(&self, page: &mut Page) -> Result<(), MutationError> {
        self.validate(page)?;

        match self {
            Mutation::AddBrick { brick, parent } => {
                page.bricks.push(Self::nested(brick, parent.as_ref()));
            }

            Mutation::RemoveBrick { brick_id } => {
                let index = Self::index(page, brick_id)?;
                page.bricks.remove(index);
            }

            Mutation::RestoreBrick { brick, index } => {
                let index = (*index).min(page.bricks.len());
                page.bricks.insert(index, brick.clone());
            }

            Mutation::UpdateBrickPosition {
                brick_id,
                breakpoint,
                patch,
            } => {
                let position = Self::patched(page, brick_id, *breakpoint, patch)?;
                Self::brick_mut(page, brick_id)?
                    .position
                    .insert(*breakpoint, position);
            }

            Mutation::SetBrickPosition {
                brick_id,
                breakpoint,
                position,
            } => {
                let brick = Self::brick_mut(page, brick_id)?;
                match position {
                    Some(position) => {
                        brick.position.insert(*breakpoint, position.clone());
                    }
                    None => {
                        brick.position.remove(breakpoint);
                    }
                }
            }

            Mutation::UpdateProps { brick_id, props } => {
                Self::brick_mut(page, brick_id)?.props = props.clone();
            }
        }

        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::AddBrick { brick, parent } => {
                if page.contains(&brick.id) {
                    return Err(MutationError::DuplicateId(brick.id.clone()));
                }

                let brick = Self::nested(brick, parent.as_ref());
                for (breakpoint, position) in &brick.position {
                    Self::check_rect(&brick.id, *breakpoint, position)?;
                    if let Some(parent) = &position.parent {
                        Self::check_parent(page, &brick.id, parent, *breakpoint)?;
                    }
                    Self::check_free(page, &brick.id, *breakpoint, position)?;
                }
                Ok(())
            }

            Mutation::RemoveBrick { brick_id } => Self::index(page, brick_id).map(|_| ()),

            Mutation::RestoreBrick { brick, .. } => {
                if page.contains(&brick.id) {
                    Err(MutationError::DuplicateId(brick.id.clone()))
                } else {
                    Ok(())
                }
            }

            Mutation::UpdateBrickPosition {
                brick_id,
                breakpoint,
                patch,
            } => {
                let position = Self::patched(page, brick_id, *breakpoint, patch)?;
                Self::check_rect(brick_id, *breakpoint, &position)?;
                if let Some(parent) = &position.parent {
                    Self::check_parent(page, brick_id, parent, *breakpoint)?;
                }
                if *breakpoint == Breakpoint::Mobile && self.needs_reflow() {
                    // The mobile stack is rebuilt right after this change
                    return Ok(());
                }
                Self::check_free(page, brick_id, *breakpoint, &position)
            }

            Mutation::SetBrickPosition {
                brick_id,
                breakpoint,
                position,
            } => {
                Self::index(page, brick_id)?;
                match position {
                    Some(position) => Self::check_rect(brick_id, *breakpoint, position),
                    None => Ok(()),
                }
            }

            Mutation::UpdateProps { brick_id, .. } => Self::index(page, brick_id).map(|_| ()),
        }
    }

    /// Mutation that undoes this one, computed against the page before it
    /// is applied
    pub fn to_inverse(&self, page: &Page) -> Result<Mutation, MutationError> {
        match self {
            Mutation::AddBrick { brick, .. } | Mutation::RestoreBrick { brick, .. } => {
                Ok(Mutation::RemoveBrick {
                    brick_id: brick.id.clone(),
                })
            }

            Mutation::RemoveBrick { brick_id } => {
                let index = Self::index(page, brick_id)?;
                Ok(Mutation::RestoreBrick {
                    brick: page.bricks[index].clone(),
                    index,
                })
            }

            Mutation::UpdateBrickPosition {
                brick_id,
                breakpoint,
                ..
            }
            | Mutation::SetBrickPosition {
                brick_id,
                breakpoint,
                ..
            } => {
                let brick = Self::brick(page, brick_id)?;
                Ok(Mutation::SetBrickPosition {
                    brick_id: brick_id.clone(),
                    breakpoint: *breakpoint,
                    position: brick.position(*breakpoint).cloned(),
                })
            }

            Mutation::UpdateProps { brick_id, .. } => {
                let brick = Self::brick(page, brick_id)?;
                Ok(Mutation::UpdateProps {
                    brick_id: brick_id.clone(),
                    props: brick.props.clone(),
                })
            }
        }
    }

    fn nested(brick: &Brick, parent: Option<&BrickId>) -> Brick {
        let mut brick = brick.clone();
        if let Some(parent) = parent {
            for position in brick.position.values_mut() {
                position.parent = Some(parent.clone());
            }
        }
        brick
    }

    fn patched(
        page: &Page,
        brick_id: &BrickId,
        breakpoint: Breakpoint,
        patch: &PositionPatch,
    ) -> Result<Position, MutationError> {
        let brick = Self::brick(page, brick_id)?;
        let base = brick.position(breakpoint).cloned().unwrap_or_default();
        Ok(patch.apply_to(&base))
    }

    fn check_rect(
        brick_id: &BrickId,
        breakpoint: Breakpoint,
        position: &Position,
    ) -> Result<(), MutationError> {
        let invalid = |reason: &str| MutationError::InvalidPosition {
            brick_id: brick_id.clone(),
            breakpoint,
            reason: reason.to_string(),
        };

        if position.w == 0 || position.h == 0 {
            return Err(invalid("width and height must be positive"));
        }
        if !position.rect().fits_columns(breakpoint.columns()) {
            return Err(invalid("extends past the last column"));
        }
        Ok(())
    }

    fn check_parent(
        page: &Page,
        brick_id: &BrickId,
        parent: &BrickId,
        breakpoint: Breakpoint,
    ) -> Result<(), MutationError> {
        let container = page
            .get(parent)
            .ok_or_else(|| MutationError::ParentNotFound(parent.clone()))?;
        if !container.brick_type.is_container() {
            return Err(MutationError::NotAContainer(parent.clone()));
        }

        // Walk up from the new parent; reaching the brick means a cycle
        let mut current = Some(parent);
        let mut steps = 0;
        while let Some(id) = current {
            if id == brick_id || steps > page.bricks.len() {
                return Err(MutationError::CycleDetected);
            }
            current = page.get(id).and_then(|b| b.parent(breakpoint));
            steps += 1;
        }
        Ok(())
    }

    fn check_free(
        page: &Page,
        brick_id: &BrickId,
        breakpoint: Breakpoint,
        position: &Position,
    ) -> Result<(), MutationError> {
        if position.hidden {
            return Ok(());
        }

        let candidate = Candidate::new(position.rect())
            .with_id(brick_id.clone())
            .with_parent(position.parent.clone());
        if has_collisions(&candidate, &page.bricks, breakpoint) {
            return Err(MutationError::PlacementRejected {
                brick_id: brick_id.clone(),
                breakpoint,
            });
        }
        Ok(())
    }

    fn index(page: &Page, brick_id: &BrickId) -> Result<usize, MutationError> {
        page.index_of(brick_id)
            .ok_or_else(|| MutationError::BrickNotFound(brick_id.clone()))
    }

    fn brick<'a>(page: &'a Page, brick_id: &BrickId) -> Result<&'a Brick, MutationError> {
        page.get(brick_id)
            .ok_or_else(|| MutationError::BrickNotFound(brick_id.clone()))
    }

    fn brick_mut<'a>(
        page: &'a mut Page,
        brick_id: &BrickId,
    ) -> Result<&'a mut Brick, MutationError> {
        page.get_mut(brick_id)
            .ok_or_else(|| MutationError::BrickNotFound(brick_id.clone()))
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New draft version
    pub version: u64,

    /// Secondary mutations applied by post effects
    pub secondary: Vec<Mutation>,
}
