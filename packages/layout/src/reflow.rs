//! # Mobile Reflow
//!
//! Derives the mobile layout from the desktop layout by stacking bricks in
//! desktop reading order.
//!
//! ```text
//! desktop (12 columns)            mobile (1 column)
//! ┌──────────┬───────────┐        ┌──────┐
//! │ A  y=0   │ B  y=0    │        │ A    │ y=0
//! ├──────────┴───────────┤   →    ├──────┤
//! │ C  y=2               │        │ B    │ y=hA
//! └──────────────────────┘        ├──────┤
//!                                 │ C    │ y=hA+hB
//!                                 └──────┘
//! ```
//!
//! Each sibling group (top level, or the children of one container) is
//! stacked on its own cursor. Containers are reflowed children-first and grow
//! to enclose their stacked children.
//!
//! The only mobile state read back is `hidden` and `manual_height`; everything
//! else is recomputed from desktop positions, which makes the reflow
//! idempotent.

use crate::breakpoint::Breakpoint;
use crate::brick::{Brick, BrickId, Position};
use crate::constraints::constraints_for;
use crate::geometry::GridConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Pixel widths used to scale desktop heights into mobile rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowConfig {
    pub desktop_column_width: f64,
    pub mobile_column_width: f64,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            desktop_column_width: 100.0,
            mobile_column_width: 100.0,
        }
    }
}

impl ReflowConfig {
    pub fn from_grids(desktop: &GridConfig, mobile: &GridConfig) -> Self {
        Self {
            desktop_column_width: desktop.column_width,
            mobile_column_width: mobile.column_width,
        }
    }

    /// Mobile to desktop column width ratio; 1.0 for unmeasured grids
    pub fn height_ratio(&self) -> f64 {
        let ratio = self.mobile_column_width / self.desktop_column_width;
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}

/// Scale a desktop height into mobile rows: round up, then clamp to the
/// mobile minimum.
pub fn scale_height(desktop_height: u32, ratio: f64, min_height: u32) -> u32 {
    // Absorb float noise so that e.g. 3 * (1/3 * 3) stays 3
    let scaled = (f64::from(desktop_height) * ratio - 1e-9).ceil().max(0.0) as u32;
    scaled.max(min_height).max(1)
}

/// Recompute `position.mobile` for every brick, leaving desktop positions
/// untouched.
pub fn adjust_mobile_layout(bricks: &[Brick], config: &ReflowConfig) -> Vec<Brick> {
    let mut groups: BTreeMap<Option<BrickId>, Vec<usize>> = BTreeMap::new();
    for (index, brick) in bricks.iter().enumerate() {
        groups.entry(group_key(brick)).or_default().push(index);
    }
    for members in groups.values_mut() {
        members.sort_by(|&a, &b| reading_order(&bricks[a]).cmp(&reading_order(&bricks[b])));
    }

    let mut reflow = Reflow {
        bricks,
        groups: &groups,
        ratio: config.height_ratio(),
        visited: HashSet::new(),
        placed: HashMap::new(),
    };

    reflow.stack_group(None);
    // Orphans: parent missing or not a container
    for parent in groups.keys() {
        reflow.stack_group(parent.as_ref());
    }

    let Reflow { mut placed, .. } = reflow;
    debug!(bricks = bricks.len(), "Mobile layout adjusted");

    bricks
        .iter()
        .enumerate()
        .map(|(index, brick)| {
            let mut brick = brick.clone();
            if let Some(position) = placed.remove(&index) {
                brick.position.insert(Breakpoint::Mobile, position);
            }
            brick
        })
        .collect()
}

struct Reflow<'a> {
    bricks: &'a [Brick],
    groups: &'a BTreeMap<Option<BrickId>, Vec<usize>>,
    ratio: f64,
    visited: HashSet<Option<BrickId>>,
    placed: HashMap<usize, Position>,
}

impl Reflow<'_> {
    /// Stack one sibling group; returns the height of the stack
    fn stack_group(&mut self, parent: Option<&BrickId>) -> u32 {
        let key = parent.cloned();
        // Also guards against parent cycles in malformed pages
        if !self.visited.insert(key.clone()) {
            return 0;
        }
        let (groups, bricks) = (self.groups, self.bricks);
        let Some(members) = groups.get(&key) else {
            return 0;
        };

        let mut cursor = 0u32;
        for &index in members {
            let brick = &bricks[index];
            let mut position = self.mobile_position(brick, key.clone());

            if brick.brick_type.is_container() {
                let inner = self.stack_group(Some(&brick.id));
                if position.manual_height.is_none() {
                    position.h = position.h.max(inner);
                }
            }

            position.y = cursor;
            if !position.hidden {
                cursor = cursor.saturating_add(position.h);
            }
            self.placed.insert(index, position);
        }

        cursor
    }

    fn mobile_position(&self, brick: &Brick, parent: Option<BrickId>) -> Position {
        let columns = Breakpoint::Mobile.columns();
        let constraints = constraints_for(brick.brick_type, Breakpoint::Mobile);
        let previous = brick.position(Breakpoint::Mobile);
        let hidden = previous.map_or(false, |p| p.hidden);
        let manual_height = previous.and_then(|p| p.manual_height);

        let w = match brick.brick_type.manifest().mobile.preferred_width {
            Some(preferred) if preferred < columns => preferred.max(1),
            _ => columns,
        };

        let h = match (manual_height, brick.position(Breakpoint::Desktop)) {
            (Some(manual), _) => manual.max(1),
            (None, Some(desktop)) => scale_height(desktop.h, self.ratio, constraints.min_height),
            (None, None) => previous
                .map_or(constraints.preferred_height, |p| p.h)
                .max(constraints.min_height),
        };

        Position {
            x: 0,
            y: 0,
            w,
            h,
            hidden,
            manual_height,
            parent,
        }
    }
}

fn group_key(brick: &Brick) -> Option<BrickId> {
    match brick.position(Breakpoint::Desktop) {
        Some(desktop) => desktop.parent.clone(),
        None => brick.parent(Breakpoint::Mobile).cloned(),
    }
}

/// Desktop `(y, x)` first, bricks without a desktop position last
fn reading_order(brick: &Brick) -> (bool, u32, u32, &BrickId) {
    match brick.position(Breakpoint::Desktop) {
        Some(p) => (false, p.y, p.x, &brick.id),
        None => (true, 0, 0, &brick.id),
    }
}
