//! # Grid Geometry
//!
//! Conversion between pixel space (pointer positions, element boxes) and the
//! integer page grid.
//!
//! Columns are `column_width` pixels wide and rows are a fixed `row_height`.
//! The grid starts after the container padding:
//!
//! ```text
//!  origin
//!    ┌──────────────────────────────────┐
//!    │ padding_y                        │
//!    │   ┌─────┬─────┬─────┬─────┐      │
//!    │   │ 0,0 │ 1,0 │ 2,0 │ ... │      │
//!    │   ├─────┼─────┼─────┼─────┤      │
//!    │   │ 0,1 │ 1,1 │ 2,1 │ ... │      │
//!    └───┴─────┴─────┴─────┴─────┴──────┘
//!  padding_x
//! ```

use crate::breakpoint::Breakpoint;
use serde::{Deserialize, Serialize};

/// Point in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const ORIGIN: PixelPoint = PixelPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Box in pixel space, used to draw ghosts and drop indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Size in grid tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub w: u32,
    pub h: u32,
}

impl GridSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Integer grid rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Half-open interval intersection. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the rectangle fits inside a grid of `columns` columns
    pub fn fits_columns(&self, columns: u32) -> bool {
        self.w > 0 && self.right() <= columns
    }
}

/// Runtime grid geometry. Recomputed by the host whenever the page container
/// is resized; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub column_width: f64,
    pub row_height: f64,
    #[serde(default)]
    pub padding_x: f64,
    #[serde(default)]
    pub padding_y: f64,
}

impl GridConfig {
    pub fn new(column_width: f64, row_height: f64) -> Self {
        Self {
            column_width,
            row_height,
            padding_x: 0.0,
            padding_y: 0.0,
        }
    }

    pub fn with_padding(mut self, padding_x: f64, padding_y: f64) -> Self {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
        self
    }

    /// Derive column width from the container's pixel width
    pub fn for_container(
        container_width: f64,
        breakpoint: Breakpoint,
        row_height: f64,
        padding_x: f64,
        padding_y: f64,
    ) -> Self {
        let usable = (container_width - 2.0 * padding_x).max(0.0);
        Self {
            column_width: usable / f64::from(breakpoint.columns()),
            row_height,
            padding_x,
            padding_y,
        }
    }
}

/// Map a pixel position to the nearest grid cell.
///
/// `origin` is the container's top-left corner in the same coordinate space
/// as `point`. Offsets are rounded half away from zero and clamped at zero.
pub fn pixel_to_grid(point: PixelPoint, origin: PixelPoint, grid: &GridConfig) -> GridCell {
    GridCell {
        x: to_track(point.x - origin.x - grid.padding_x, grid.column_width),
        y: to_track(point.y - origin.y - grid.padding_y, grid.row_height),
    }
}

/// Top-left pixel of a grid cell, relative to the container origin
pub fn grid_to_pixel(cell: GridCell, grid: &GridConfig) -> PixelPoint {
    PixelPoint {
        x: grid.padding_x + f64::from(cell.x) * grid.column_width,
        y: grid.padding_y + f64::from(cell.y) * grid.row_height,
    }
}

/// Pixel box covered by a grid rectangle, relative to the container origin
pub fn rect_to_pixels(rect: &Rect, grid: &GridConfig) -> PixelRect {
    let top_left = grid_to_pixel(GridCell::new(rect.x, rect.y), grid);
    PixelRect {
        x: top_left.x,
        y: top_left.y,
        width: f64::from(rect.w) * grid.column_width,
        height: f64::from(rect.h) * grid.row_height,
    }
}

fn to_track(offset: f64, track_size: f64) -> u32 {
    // Degenerate grid (container not measured yet)
    if !(track_size > 0.0) {
        return 0;
    }
    // `as` saturates and maps NaN to zero
    (offset / track_size).round().max(0.0) as u32
}
