//! # Undo/Redo Stack
//!
//! Tracks mutation history for a page draft.
//!
//! ## Design
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original mutations
//! - New mutations clear the redo stack
//! - A batch groups a user action with the mutations its post effects
//!   produced, so one undo reverts all of them
//!
//! ## Example
//!
//! ```rust
//! use brickwork_editor::{Mutation, UndoStack};
//! use brickwork_layout::{Breakpoint, Brick, BrickType, Page, Position};
//!
//! let mut page = Page::default();
//! let mut stack = UndoStack::new();
//!
//! let brick = Brick::new("title", BrickType::Text)
//!     .with_position(Breakpoint::Desktop, Position::new(0, 0, 6, 2));
//! stack.apply(&Mutation::AddBrick { brick, parent: None }, &mut page).unwrap();
//! assert_eq!(page.bricks.len(), 1);
//!
//! stack.undo(&mut page).unwrap();
//! assert!(page.bricks.is_empty());
//! ```

use crate::{Mutation, MutationError};
use brickwork_layout::Page;

/// A group of mutations that are undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// Mutations in application order
    pub mutations: Vec<Mutation>,

    /// Inverse mutations, already in undo order
    pub inverses: Vec<Mutation>,

    pub description: Option<String>,
}

impl MutationBatch {
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            mutations: Vec::new(),
            inverses: Vec::new(),
            description: None,
        }
    }
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: &Mutation, page: &mut Page) -> Result<(), MutationError> {
        // Inverse is computed against the state before the change
        let inverse = mutation.to_inverse(page)?;
        mutation.apply(page)?;

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation.clone());
            batch.inverses.insert(0, inverse);
        } else {
            self.push_batch(MutationBatch::single(mutation.clone(), inverse));
        }

        Ok(())
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(MutationBatch::empty());
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Revert everything applied since `begin_batch` and drop the batch
    pub fn abort_batch(&mut self, page: &mut Page) -> Result<(), MutationError> {
        if let Some(batch) = self.current_batch.take() {
            for inverse in &batch.inverses {
                inverse.apply(page)?;
            }
        }
        Ok(())
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for the current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo history
        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Returns false when there is nothing to undo.
    pub fn undo(&mut self, page: &mut Page) -> Result<bool, MutationError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };

        for inverse in &batch.inverses {
            inverse.apply(page)?;
        }
        self.redo_stack.push(batch);

        Ok(true)
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, page: &mut Page) -> Result<bool, MutationError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        for mutation in &batch.mutations {
            mutation.apply(page)?;
        }
        self.undo_stack.push(batch);

        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
