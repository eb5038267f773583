//! # Post-Effect System
//!
//! Mutations trigger cascading effects to keep the page consistent:
//! - Removing a container → remove everything nested in it
//! - Changing the desktop layout → re-derive the mobile stack
//!
//! Post-effects are:
//! - **Deterministic**: same mutation and page always produce the same effects
//! - **Minimal**: only bricks whose state actually changes get a mutation
//! - **Sequential**: each effect sees the page left by the previous one
//!
//! The primary mutation and all its effects are recorded as one undo batch.

use crate::mutations::{Mutation, MutationError};
use crate::undo_stack::UndoStack;
use brickwork_layout::{adjust_mobile_layout, Breakpoint, BrickId, Page, ReflowConfig};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Secondary mutations for `mutation`, computed against the page after
    /// the primary mutation (and earlier effects) were applied
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation>;
}

/// Remove the descendants of a removed container
#[derive(Debug)]
pub struct RemoveOrphanedChildren;

impl PostEffect for RemoveOrphanedChildren {
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        let Mutation::RemoveBrick { brick_id } = mutation else {
            return vec![];
        };

        let mut removed = Vec::new();
        let mut seen: HashSet<&BrickId> = HashSet::from([brick_id]);
        let mut pending = vec![brick_id];

        while let Some(container) = pending.pop() {
            for child in page.children_of(container) {
                if seen.insert(&child.id) {
                    removed.push(Mutation::RemoveBrick {
                        brick_id: child.id.clone(),
                    });
                    pending.push(&child.id);
                }
            }
        }

        removed
    }
}

/// Re-derive mobile positions after a desktop-affecting change
#[derive(Debug)]
pub struct SyncMobileLayout {
    pub config: ReflowConfig,
}

impl PostEffect for SyncMobileLayout {
    fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        if !mutation.needs_reflow() {
            return vec![];
        }
        mobile_sync_mutations(page, &self.config)
    }
}

/// `SetBrickPosition` mutations that bring every mobile position in line
/// with the reflowed layout
pub fn mobile_sync_mutations(page: &Page, config: &ReflowConfig) -> Vec<Mutation> {
    adjust_mobile_layout(&page.bricks, config)
        .into_iter()
        .zip(&page.bricks)
        .filter_map(|(reflowed, current)| {
            let position = reflowed.position(Breakpoint::Mobile);
            if position == current.position(Breakpoint::Mobile) {
                return None;
            }
            Some(Mutation::SetBrickPosition {
                brick_id: reflowed.id.clone(),
                breakpoint: Breakpoint::Mobile,
                position: position.cloned(),
            })
        })
        .collect()
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new(reflow: ReflowConfig) -> Self {
        Self {
            effects: vec![
                Box::new(RemoveOrphanedChildren),
                Box::new(SyncMobileLayout { config: reflow }),
            ],
        }
    }

    pub fn with_effects(effects: Vec<Box<dyn PostEffect>>) -> Self {
        Self { effects }
    }

    /// Analyze a mutation against a single page state
    pub fn analyze(&self, mutation: &Mutation, page: &Page) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, page))
            .collect()
    }

    /// Apply a mutation with all its post-effects as one undo step.
    ///
    /// Returns the secondary mutations. On failure every change made so far
    /// is rolled back and nothing is recorded.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        page: &mut Page,
        history: &mut UndoStack,
    ) -> Result<Vec<Mutation>, MutationError> {
        history.begin_batch();
        history.set_batch_description(mutation.label());

        match self.apply_batch(mutation, page, history) {
            Ok(secondary) => {
                history.end_batch();
                debug!(
                    brick = %mutation.brick_id(),
                    secondary = secondary.len(),
                    "Mutation applied"
                );
                Ok(secondary)
            }
            Err(err) => {
                if let Err(rollback) = history.abort_batch(page) {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    fn apply_batch(
        &self,
        mutation: &Mutation,
        page: &mut Page,
        history: &mut UndoStack,
    ) -> Result<Vec<Mutation>, MutationError> {
        history.apply(mutation, page)?;

        let mut secondary = Vec::new();
        for effect in &self.effects {
            for effect_mutation in effect.analyze(mutation, page) {
                history.apply(&effect_mutation, page)?;
                secondary.push(effect_mutation);
            }
        }

        Ok(secondary)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new(ReflowConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PositionPatch;
    use brickwork_layout::{Brick, BrickType, Position};

    fn page() -> Page {
        Page::new(vec![
            Brick::new("box", BrickType::Container)
                .with_position(Breakpoint::Desktop, Position::new(0, 0, 12, 4)),
            Brick::new("inner", BrickType::Container)
                .with_position(Breakpoint::Desktop, Position::new(0, 0, 6, 2).with_parent("box")),
            Brick::new("deep", BrickType::Text)
                .with_position(Breakpoint::Desktop, Position::new(0, 0, 2, 1).with_parent("inner")),
            Brick::new("footer", BrickType::Text)
                .with_position(Breakpoint::Desktop, Position::new(0, 4, 12, 1)),
        ])
    }

    #[test]
    fn test_post_effect_engine_creation() {
        let engine = PostEffectEngine::default();
        assert_eq!(engine.effects.len(), 2);
    }

    #[test]
    fn test_remove_container_cascades() {
        let page = page();
        let mutations = RemoveOrphanedChildren.analyze(
            &Mutation::RemoveBrick {
                brick_id: "box".into(),
            },
            &page,
        );

        let ids: Vec<_> = mutations.iter().map(|m| m.brick_id().as_str()).collect();
        assert_eq!(ids, vec!["inner", "deep"]);
    }

    #[test]
    fn test_props_update_has_no_effects() {
        let page = page();
        let engine = PostEffectEngine::default();
        let mutation = Mutation::UpdateProps {
            brick_id: "footer".into(),
            props: serde_json::json!({ "text": "Bye" }),
        };
        assert!(engine.analyze(&mutation, &page).is_empty());
    }

    #[test]
    fn test_desktop_move_resyncs_mobile() {
        let mut page = page();
        let mut history = UndoStack::new();
        let engine = PostEffectEngine::default();

        let secondary = engine
            .apply_with_effects(
                &Mutation::UpdateBrickPosition {
                    brick_id: "footer".into(),
                    breakpoint: Breakpoint::Desktop,
                    patch: PositionPatch::resized(12, 3),
                },
                &mut page,
                &mut history,
            )
            .unwrap();

        // Every brick gained a mobile position
        assert_eq!(secondary.len(), 4);
        let footer = page.get(&"footer".into()).unwrap();
        assert_eq!(footer.position(Breakpoint::Mobile).unwrap().h, 3);

        // One undo step reverts the move and the sync
        assert_eq!(history.undo_levels(), 1);
        history.undo(&mut page).unwrap();
        let footer = page.get(&"footer".into()).unwrap();
        assert_eq!(footer.position(Breakpoint::Desktop).unwrap().h, 1);
        assert!(footer.position(Breakpoint::Mobile).is_none());
    }

    #[test]
    fn test_failed_mutation_leaves_page_untouched() {
        let mut page = page();
        let before = page.clone();
        let mut history = UndoStack::new();
        let engine = PostEffectEngine::default();

        let result = engine.apply_with_effects(
            &Mutation::UpdateBrickPosition {
                brick_id: "footer".into(),
                breakpoint: Breakpoint::Desktop,
                patch: PositionPatch::moved_to(0, 2),
            },
            &mut page,
            &mut history,
        );

        assert!(matches!(result, Err(MutationError::PlacementRejected { .. })));
        assert_eq!(page, before);
        assert!(!history.can_undo());
    }
}
