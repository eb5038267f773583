//! # Edit Session
//!
//! The application state object for one open page: the draft, its undo
//! history, the active drag gesture, the selection and the autosave timer.
//! Every edit goes through [`EditSession::apply`], which runs post effects
//! and records one undo step.

use crate::autosave::{Autosave, AutosavePolicy};
use crate::gesture::{DragGesture, DragSource, DropOutcome, Viewport};
use crate::post_effects::{mobile_sync_mutations, PostEffectEngine};
use crate::{EditorError, Mutation, MutationResult, PageDraft, PositionPatch, UndoStack};
use brickwork_layout::{
    constraints_for, find_free_position, Breakpoint, Brick, BrickId, BrickType, DropTarget,
    GridCell, Placement, PixelPoint, ReflowConfig,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Undo levels kept (0 = unlimited)
    pub history_levels: usize,
    pub autosave: AutosavePolicy,
    pub reflow: ReflowConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_levels: 100,
            autosave: AutosavePolicy::default(),
            reflow: ReflowConfig::default(),
        }
    }
}

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    draft: PageDraft,
    history: UndoStack,
    effects: PostEffectEngine,
    autosave: Autosave,
    gesture: DragGesture,
    reflow: ReflowConfig,

    /// Currently selected bricks
    pub selected_bricks: Vec<BrickId>,
}

impl EditSession {
    pub fn new(id: impl Into<String>, draft: PageDraft) -> Self {
        Self::with_options(id, draft, SessionOptions::default())
    }

    pub fn with_options(id: impl Into<String>, draft: PageDraft, options: SessionOptions) -> Self {
        Self {
            id: id.into(),
            draft,
            history: UndoStack::with_max_levels(options.history_levels),
            effects: PostEffectEngine::new(options.reflow),
            autosave: Autosave::new(options.autosave),
            gesture: DragGesture::new(),
            reflow: options.reflow,
            selected_bricks: Vec::new(),
        }
    }

    pub fn draft(&self) -> &PageDraft {
        &self.draft
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    /// Apply a mutation with its post effects as one undo step
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.apply_at(mutation, Instant::now())
    }

    pub fn apply_at(
        &mut self,
        mutation: Mutation,
        now: Instant,
    ) -> Result<MutationResult, EditorError> {
        let secondary =
            self.effects
                .apply_with_effects(&mutation, self.draft.page_mut(), &mut self.history)?;

        if let Mutation::RemoveBrick { .. } = mutation {
            self.prune_selection();
        }

        Ok(MutationResult {
            version: self.changed(now),
            secondary,
        })
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.history.undo(self.draft.page_mut())?;
        if undone {
            self.changed(Instant::now());
            self.prune_selection();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.history.redo(self.draft.page_mut())?;
        if redone {
            self.changed(Instant::now());
            self.prune_selection();
        }
        Ok(redone)
    }

    /// Add a brick of `brick_type` at the first free desktop slot at or
    /// below `cell`, with the type's preferred size
    pub fn insert_brick(
        &mut self,
        brick_type: BrickType,
        cell: GridCell,
        parent: Option<BrickId>,
    ) -> Result<BrickId, EditorError> {
        let mut target = DropTarget::at(cell);
        target.parent = parent.clone();
        let placement = self.free_desktop_slot(brick_type, &target)?;

        let id = self.next_brick_id(brick_type);
        let brick = Brick::new(id.clone(), brick_type)
            .with_position(Breakpoint::Desktop, placement.position);
        self.apply(Mutation::AddBrick { brick, parent })?;

        Ok(id)
    }

    /// Copy a brick (props and desktop size) into the nearest free desktop
    /// slot below it. Children of containers are not copied.
    pub fn duplicate_brick(&mut self, brick_id: &BrickId) -> Result<BrickId, EditorError> {
        let original = self
            .draft
            .get_brick(brick_id)
            .ok_or_else(|| EditorError::BrickNotFound(brick_id.clone()))?
            .clone();

        let mut target = match original.position(Breakpoint::Desktop) {
            Some(p) => DropTarget::at(GridCell::new(p.x, p.y + p.h)).with_size(p.w, p.h),
            None => DropTarget::default(),
        };
        target.parent = original.parent(Breakpoint::Desktop).cloned();
        let placement = self.free_desktop_slot(original.brick_type, &target)?;

        let id = self.next_brick_id(original.brick_type);
        let mut brick = Brick::new(id.clone(), original.brick_type)
            .with_position(Breakpoint::Desktop, placement.position);
        brick.props = original.props;

        self.apply(Mutation::AddBrick {
            brick,
            parent: target.parent,
        })?;
        Ok(id)
    }

    pub fn remove_brick(&mut self, brick_id: &BrickId) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::RemoveBrick {
            brick_id: brick_id.clone(),
        })
    }

    pub fn update_props(
        &mut self,
        brick_id: &BrickId,
        props: Value,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateProps {
            brick_id: brick_id.clone(),
            props,
        })
    }

    pub fn set_hidden(
        &mut self,
        brick_id: &BrickId,
        breakpoint: Breakpoint,
        hidden: bool,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateBrickPosition {
            brick_id: brick_id.clone(),
            breakpoint,
            patch: PositionPatch::hidden(hidden),
        })
    }

    /// Re-derive the mobile layout as one undo step. Returns `None` when it
    /// is already in sync.
    pub fn adjust_mobile_layout(&mut self) -> Result<Option<MutationResult>, EditorError> {
        let mutations = mobile_sync_mutations(self.draft.page(), &self.reflow);
        if mutations.is_empty() {
            return Ok(None);
        }

        self.history.begin_batch();
        self.history.set_batch_description("Adjust mobile layout");
        for mutation in &mutations {
            if let Err(err) = self.history.apply(mutation, self.draft.page_mut()) {
                self.history.abort_batch(self.draft.page_mut())?;
                return Err(err.into());
            }
        }
        self.history.end_batch();

        Ok(Some(MutationResult {
            version: self.changed(Instant::now()),
            secondary: mutations,
        }))
    }

    pub fn start_drag(
        &mut self,
        source: DragSource,
        viewport: Viewport,
        grab_offset: PixelPoint,
    ) -> Result<(), EditorError> {
        Ok(self.gesture.start(source, viewport, grab_offset)?)
    }

    /// Preview for the current pointer position
    pub fn drag_move(&mut self, pointer: PixelPoint) -> Result<Option<Placement>, EditorError> {
        Ok(self.gesture.pointer_move(self.draft.page(), pointer)?)
    }

    /// Release the pointer and commit the drop. Returns `None` when the
    /// drop was rejected and nothing changed. The gesture is back to idle
    /// afterwards, whether the commit succeeded or not.
    pub fn drop_at(&mut self, pointer: PixelPoint) -> Result<Option<MutationResult>, EditorError> {
        let outcome = self.gesture.drop(self.draft.page(), pointer);
        let result = match outcome {
            Ok(DropOutcome::Placed {
                source,
                breakpoint,
                placement,
            }) => self.commit_drop(source, breakpoint, placement).map(Some),
            Ok(DropOutcome::Rejected) => Ok(None),
            Err(err) => return Err(err.into()),
        };
        self.gesture.reset();
        result
    }

    /// Add a new brick at an already resolved placement. Bricks placed on
    /// mobile also get the first free desktop slot, since mobile is derived
    /// from desktop.
    pub fn add_placed_brick(
        &mut self,
        brick_type: BrickType,
        breakpoint: Breakpoint,
        placement: Placement,
    ) -> Result<(BrickId, MutationResult), EditorError> {
        let position = placement.position;
        let id = self.next_brick_id(brick_type);
        let mut brick = Brick::new(id.clone(), brick_type);
        if breakpoint != Breakpoint::Desktop {
            let mut target = DropTarget::default();
            target.parent = position.parent.clone();
            let desktop = self.free_desktop_slot(brick_type, &target)?;
            brick = brick.with_position(Breakpoint::Desktop, desktop.position);
        }
        let parent = position.parent.clone();
        brick = brick.with_position(breakpoint, position);

        let result = self.apply(Mutation::AddBrick { brick, parent })?;
        Ok((id, result))
    }

    fn commit_drop(
        &mut self,
        source: DragSource,
        breakpoint: Breakpoint,
        placement: Placement,
    ) -> Result<MutationResult, EditorError> {
        let position = &placement.position;
        let mutation = match source {
            DragSource::Library(brick_type) => {
                let (_, result) = self.add_placed_brick(brick_type, breakpoint, placement)?;
                return Ok(result);
            }

            DragSource::Move(brick_id) => Mutation::UpdateBrickPosition {
                brick_id,
                breakpoint,
                patch: PositionPatch {
                    parent: Some(position.parent.clone()),
                    ..PositionPatch::moved_to(position.x, position.y)
                },
            },

            // The placement may shift x left to keep the wider brick inside
            // the grid, so the origin is committed along with the size
            DragSource::Resize(brick_id) => {
                let mut patch = PositionPatch {
                    x: Some(position.x),
                    y: Some(position.y),
                    ..PositionPatch::resized(position.w, position.h)
                };
                if breakpoint == Breakpoint::Mobile {
                    patch.manual_height = Some(Some(position.h));
                }
                Mutation::UpdateBrickPosition {
                    brick_id,
                    breakpoint,
                    patch,
                }
            }
        };

        self.apply(mutation)
    }

    pub fn cancel_drag(&mut self) -> Result<(), EditorError> {
        self.gesture.cancel()?;
        self.gesture.reset();
        Ok(())
    }

    /// Save when the autosave policy says so. Returns whether a save
    /// happened; memory-backed drafts never save.
    pub fn tick(&mut self, now: Instant) -> Result<bool, EditorError> {
        if self.draft.path().is_none() || !self.autosave.due(now) {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    /// Save immediately if there are unsaved changes
    pub fn flush(&mut self) -> Result<(), EditorError> {
        if self.draft.is_dirty() {
            self.draft.save()?;
            info!(session = %self.id, version = self.draft.version, "Draft saved");
        }
        self.autosave.mark_saved();
        Ok(())
    }

    pub fn set_selection(&mut self, brick_ids: Vec<BrickId>) {
        self.selected_bricks = brick_ids;
        self.prune_selection();
    }

    pub fn selection(&self) -> &[BrickId] {
        &self.selected_bricks
    }

    fn free_desktop_slot(
        &self,
        brick_type: BrickType,
        target: &DropTarget,
    ) -> Result<Placement, EditorError> {
        let constraints = constraints_for(brick_type, Breakpoint::Desktop);
        find_free_position(self.draft.bricks(), Breakpoint::Desktop, target, &constraints)
            .ok_or(EditorError::NoFreePosition(brick_type))
    }

    fn next_brick_id(&self, brick_type: BrickType) -> BrickId {
        (1..)
            .map(|n| BrickId::new(format!("{}-{}", brick_type.name(), n)))
            .find(|id| !self.draft.page().contains(id))
            .unwrap_or_else(|| BrickId::new(brick_type.name()))
    }

    fn changed(&mut self, now: Instant) -> u64 {
        self.autosave.record_change(now);
        let version = self.draft.touch();
        debug!(session = %self.id, version, "Draft changed");
        version
    }

    fn prune_selection(&mut self) {
        let page = self.draft.page();
        self.selected_bricks.retain(|id| page.contains(id));
    }
}
