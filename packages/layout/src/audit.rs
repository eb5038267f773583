use crate::breakpoint::Breakpoint;
use crate::brick::{Brick, BrickId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Layout invariant violation found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutIssue {
    Overlap {
        breakpoint: Breakpoint,
        first: BrickId,
        second: BrickId,
    },
    OutOfBounds {
        breakpoint: Breakpoint,
        brick: BrickId,
    },
    ZeroSize {
        breakpoint: Breakpoint,
        brick: BrickId,
    },
    MissingParent {
        breakpoint: Breakpoint,
        brick: BrickId,
        parent: BrickId,
    },
    ParentNotContainer {
        breakpoint: Breakpoint,
        brick: BrickId,
        parent: BrickId,
    },
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutIssue::Overlap {
                breakpoint,
                first,
                second,
            } => write!(f, "[{breakpoint}] {first} overlaps {second}"),
            LayoutIssue::OutOfBounds { breakpoint, brick } => write!(
                f,
                "[{breakpoint}] {brick} extends past column {}",
                breakpoint.columns()
            ),
            LayoutIssue::ZeroSize { breakpoint, brick } => {
                write!(f, "[{breakpoint}] {brick} has zero width or height")
            }
            LayoutIssue::MissingParent {
                breakpoint,
                brick,
                parent,
            } => write!(f, "[{breakpoint}] {brick} is nested in missing brick {parent}"),
            LayoutIssue::ParentNotContainer {
                breakpoint,
                brick,
                parent,
            } => write!(f, "[{breakpoint}] {brick} is nested in non-container {parent}"),
        }
    }
}

/// Check every breakpoint of a page for overlap, containment and nesting
/// problems. Hidden bricks are exempt from the overlap check.
pub fn audit_layout(bricks: &[Brick]) -> Vec<LayoutIssue> {
    let by_id: HashMap<&BrickId, &Brick> = bricks.iter().map(|b| (&b.id, b)).collect();
    let mut issues = Vec::new();

    for breakpoint in Breakpoint::ALL {
        let columns = breakpoint.columns();
        let placed: Vec<_> = bricks
            .iter()
            .filter_map(|b| b.position(breakpoint).map(|p| (b, p)))
            .collect();

        for (brick, position) in &placed {
            if position.w == 0 || position.h == 0 {
                issues.push(LayoutIssue::ZeroSize {
                    breakpoint,
                    brick: brick.id.clone(),
                });
            } else if !position.rect().fits_columns(columns) {
                issues.push(LayoutIssue::OutOfBounds {
                    breakpoint,
                    brick: brick.id.clone(),
                });
            }

            if let Some(parent) = &position.parent {
                match by_id.get(parent) {
                    None => issues.push(LayoutIssue::MissingParent {
                        breakpoint,
                        brick: brick.id.clone(),
                        parent: parent.clone(),
                    }),
                    Some(container) if !container.brick_type.is_container() => {
                        issues.push(LayoutIssue::ParentNotContainer {
                            breakpoint,
                            brick: brick.id.clone(),
                            parent: parent.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        for (i, (first, a)) in placed.iter().enumerate() {
            for (second, b) in &placed[i + 1..] {
                if a.hidden || b.hidden || a.parent != b.parent {
                    continue;
                }
                if a.rect().overlaps(&b.rect()) {
                    issues.push(LayoutIssue::Overlap {
                        breakpoint,
                        first: first.id.clone(),
                        second: second.id.clone(),
                    });
                }
            }
        }
    }

    issues
}
