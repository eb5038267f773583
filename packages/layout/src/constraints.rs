//! # Size Constraints
//!
//! Resolution order for every field:
//!
//! 1. breakpoint-specific value from the brick type's manifest
//! 2. type-level value from the manifest
//! 3. global default
//!
//! The resolved `max_width` never exceeds the breakpoint's column count.

use crate::breakpoint::Breakpoint;
use crate::error::LayoutResult;
use crate::manifest::BrickType;
use serde::{Deserialize, Serialize};

pub const GLOBAL_MIN_WIDTH: u32 = 1;
pub const GLOBAL_MIN_HEIGHT: u32 = 1;

/// Resolved size bounds of a brick type at one breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub preferred_width: u32,
    pub preferred_height: u32,
}

/// Manifest-level constraints; absent fields fall through to the next level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_height: Option<u32>,
}

impl PartialConstraints {
    pub const EMPTY: PartialConstraints = PartialConstraints {
        min_width: None,
        min_height: None,
        max_width: None,
        preferred_width: None,
        preferred_height: None,
    };

    /// Field-wise fallback: values set on `self` win
    pub fn or(self, fallback: PartialConstraints) -> PartialConstraints {
        PartialConstraints {
            min_width: self.min_width.or(fallback.min_width),
            min_height: self.min_height.or(fallback.min_height),
            max_width: self.max_width.or(fallback.max_width),
            preferred_width: self.preferred_width.or(fallback.preferred_width),
            preferred_height: self.preferred_height.or(fallback.preferred_height),
        }
    }

    fn resolve(self, columns: u32) -> Constraints {
        let min_width = self.min_width.unwrap_or(GLOBAL_MIN_WIDTH);
        let min_height = self.min_height.unwrap_or(GLOBAL_MIN_HEIGHT);
        let max_width = self.max_width.unwrap_or(columns).min(columns);

        // min_width may exceed max_width on narrow breakpoints; placement
        // rejects those bricks instead of silently shrinking them.
        let preferred_width = self
            .preferred_width
            .unwrap_or(min_width)
            .max(min_width)
            .min(max_width);
        let preferred_height = self.preferred_height.unwrap_or(min_height).max(min_height);

        Constraints {
            min_width,
            min_height,
            max_width,
            preferred_width,
            preferred_height,
        }
    }
}

/// Resolve the constraints of `brick_type` at `breakpoint`
pub fn constraints_for(brick_type: BrickType, breakpoint: Breakpoint) -> Constraints {
    let manifest = brick_type.manifest();
    manifest
        .for_breakpoint(breakpoint)
        .or(manifest.constraints)
        .resolve(breakpoint.columns())
}

/// Resolve constraints from a type name, as received from a host or a file.
///
/// Unknown names fail with [`LayoutError::UnknownBrickType`](crate::LayoutError).
pub fn constraints_for_name(brick_type: &str, breakpoint: Breakpoint) -> LayoutResult<Constraints> {
    let brick_type: BrickType = brick_type.parse()?;
    Ok(constraints_for(brick_type, breakpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn test_breakpoint_value_wins() {
        let c = constraints_for(BrickType::Hero, Breakpoint::Desktop);
        assert_eq!(c.min_width, 6);
        assert_eq!(c.preferred_width, 12);
    }

    #[test]
    fn test_type_level_fallback() {
        // Image declares min_height at type level only
        let desktop = constraints_for(BrickType::Image, Breakpoint::Desktop);
        let mobile = constraints_for(BrickType::Image, Breakpoint::Mobile);
        assert_eq!(desktop.min_height, 2);
        assert_eq!(mobile.min_height, 3);
        assert_eq!(mobile.preferred_height, 6);
    }

    #[test]
    fn test_global_default_fallback() {
        let c = constraints_for(BrickType::Text, Breakpoint::Mobile);
        assert_eq!(c.min_width, GLOBAL_MIN_WIDTH);
        assert_eq!(c.max_width, 1);
        assert_eq!(c.preferred_width, 1);
    }

    #[test]
    fn test_max_width_capped_by_columns() {
        for brick_type in BrickType::ALL {
            for breakpoint in Breakpoint::ALL {
                let c = constraints_for(brick_type, breakpoint);
                assert!(c.max_width <= breakpoint.columns(), "{brick_type} at {breakpoint}");
                assert!(c.preferred_height >= c.min_height);
            }
        }
    }

    #[test]
    fn test_unknown_type_name_is_an_error() {
        assert_eq!(
            constraints_for_name("carousel", Breakpoint::Desktop),
            Err(LayoutError::UnknownBrickType("carousel".to_string()))
        );
        assert!(constraints_for_name("text", Breakpoint::Desktop).is_ok());
    }

    #[test]
    fn test_or_prefers_self() {
        let specific = PartialConstraints {
            min_width: Some(3),
            ..PartialConstraints::EMPTY
        };
        let general = PartialConstraints {
            min_width: Some(1),
            min_height: Some(2),
            ..PartialConstraints::EMPTY
        };
        let merged = specific.or(general);
        assert_eq!(merged.min_width, Some(3));
        assert_eq!(merged.min_height, Some(2));
    }
}
