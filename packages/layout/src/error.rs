use thiserror::Error;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Brick types are registered statically, so this is a programmer error.
    #[error("Unknown brick type: {0}")]
    UnknownBrickType(String),

    #[error("Unknown breakpoint: {0}")]
    UnknownBreakpoint(String),
}
