use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Columns in the desktop page grid
pub const DESKTOP_COLUMNS: u32 = 12;

/// Columns in the mobile page grid (single column stacking)
pub const MOBILE_COLUMNS: u32 = 1;

/// Responsive viewport mode with its own layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 2] = [Breakpoint::Desktop, Breakpoint::Mobile];

    /// Column count of this breakpoint's grid
    pub fn columns(self) -> u32 {
        match self {
            Breakpoint::Desktop => DESKTOP_COLUMNS,
            Breakpoint::Mobile => MOBILE_COLUMNS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Breakpoint::Desktop),
            "mobile" => Ok(Breakpoint::Mobile),
            other => Err(LayoutError::UnknownBreakpoint(other.to_string())),
        }
    }
}
