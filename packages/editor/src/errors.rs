//! Error types for the editor

use brickwork_layout::{BrickId, BrickType, LayoutError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Gesture error: {0}")]
    Gesture(#[from] crate::gesture::GestureError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Brick not found: {0}")]
    BrickNotFound(BrickId),

    #[error("No free position for a {0} brick")]
    NoFreePosition(BrickType),

    #[error("Draft is not file-backed")]
    NotFileBacked,
}
