//! # Brickwork Editor
//!
//! Editing engine for brick pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ layout: pure placement + reflow queries     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: draft lifecycle + mutations         │
//! │  - Load/save page files                     │
//! │  - Apply mutations with validation          │
//! │  - Post effects (mobile re-sync, cascades)  │
//! │  - Undo/redo, drag gestures, autosave       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Desktop is the source of truth**: mobile positions are derived,
//!    apart from the `hidden` and `manualHeight` overrides
//! 2. **All edits are mutations**: typed, validated, invertible
//! 3. **One action, one undo step**: post effects join the primary batch
//! 4. **Gestures never write**: they query the layout engine and hand a
//!    validated placement to the session
//!
//! ## Usage
//!
//! ```rust
//! use brickwork_editor::{EditSession, PageDraft};
//! use brickwork_layout::{Breakpoint, BrickType, GridCell, Page};
//!
//! let mut session = EditSession::new("local", PageDraft::from_page(Page::default()));
//!
//! let hero = session.insert_brick(BrickType::Hero, GridCell::new(0, 0), None).unwrap();
//! let brick = session.draft().get_brick(&hero).unwrap();
//! assert!(brick.position(Breakpoint::Mobile).is_some());
//!
//! session.undo().unwrap();
//! assert!(session.draft().bricks().is_empty());
//! ```

mod autosave;
mod draft;
mod errors;
mod gesture;
mod mutations;
mod post_effects;
mod session;
mod storage;
mod undo_stack;

pub use autosave::{Autosave, AutosavePolicy};
pub use draft::{DraftStorage, PageDraft};
pub use errors::EditorError;
pub use gesture::{DragGesture, DragSource, DropOutcome, GestureError, GestureState, Viewport};
pub use mutations::{Mutation, MutationError, MutationResult, PositionPatch};
pub use post_effects::{
    mobile_sync_mutations, PostEffect, PostEffectEngine, RemoveOrphanedChildren, SyncMobileLayout,
};
pub use session::{EditSession, SessionOptions};
pub use storage::{read_page, write_page, PageFile};
pub use undo_stack::{MutationBatch, UndoStack};
