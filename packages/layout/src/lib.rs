//! # Brickwork Layout
//!
//! Pure placement engine behind the Brickwork page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ geometry: pixels ↔ grid cells               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ manifest + constraints: size bounds         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ collision → placement: can this brick land? │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ reflow: desktop layout → mobile stack       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every function here takes a snapshot of the brick collection and returns
//! new data. Nothing holds state between calls, so the editor can run these
//! synchronously on every pointer move.
//!
//! ## Usage
//!
//! ```rust
//! use brickwork_layout::{
//!     can_drop_on_layout, constraints_for, pixel_to_grid, Breakpoint, BrickType, DropTarget,
//!     GridConfig, PixelPoint,
//! };
//!
//! let grid = GridConfig::new(100.0, 50.0).with_padding(10.0, 10.0);
//! let cell = pixel_to_grid(PixelPoint::new(215.0, 65.0), PixelPoint::ORIGIN, &grid);
//!
//! let constraints = constraints_for(BrickType::Button, Breakpoint::Desktop);
//! let placement = can_drop_on_layout(
//!     &[],
//!     Breakpoint::Desktop,
//!     &DropTarget::at(cell),
//!     &constraints,
//!     true,
//! );
//! assert!(placement.is_some());
//! ```

mod audit;
mod breakpoint;
mod brick;
mod collision;
mod constraints;
mod error;
mod geometry;
mod manifest;
mod placement;
mod reflow;

pub use audit::{audit_layout, LayoutIssue};
pub use breakpoint::{Breakpoint, DESKTOP_COLUMNS, MOBILE_COLUMNS};
pub use brick::{Brick, BrickId, Page, Position};
pub use collision::{detect_collisions, has_collisions, Candidate};
pub use constraints::{
    constraints_for, constraints_for_name, Constraints, PartialConstraints, GLOBAL_MIN_HEIGHT,
    GLOBAL_MIN_WIDTH,
};
pub use error::{LayoutError, LayoutResult};
pub use geometry::{
    grid_to_pixel, pixel_to_grid, rect_to_pixels, GridCell, GridConfig, GridSize, PixelPoint,
    PixelRect, Rect,
};
pub use manifest::{BrickManifest, BrickType};
pub use placement::{
    can_drop_on_layout, compute_drop_target, find_free_position, resolve_size,
    validate_placement, DropTarget, Placement,
};
pub use reflow::{adjust_mobile_layout, scale_height, ReflowConfig};
