use crate::breakpoint::Breakpoint;
use crate::geometry::Rect;
use crate::manifest::BrickType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Stable brick identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrickId(String);

impl BrickId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrickId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BrickId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Placement of a brick at one breakpoint.
///
/// Children of a container (`parent` set) use coordinates local to that
/// container rather than page coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// Height in rows chosen explicitly by the user instead of derived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BrickId>,
}

impl Position {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<BrickId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A placed content unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,

    #[serde(rename = "type")]
    pub brick_type: BrickType,

    /// Type-specific content, opaque to the layout engine
    #[serde(default)]
    pub props: Value,

    #[serde(default)]
    pub position: BTreeMap<Breakpoint, Position>,
}

impl Brick {
    /// New brick with the type's default props and no positions
    pub fn new(id: impl Into<BrickId>, brick_type: BrickType) -> Self {
        Self {
            id: id.into(),
            brick_type,
            props: brick_type.default_props(),
            position: BTreeMap::new(),
        }
    }

    pub fn with_position(mut self, breakpoint: Breakpoint, position: Position) -> Self {
        self.position.insert(breakpoint, position);
        self
    }

    pub fn position(&self, breakpoint: Breakpoint) -> Option<&Position> {
        self.position.get(&breakpoint)
    }

    pub fn position_mut(&mut self, breakpoint: Breakpoint) -> Option<&mut Position> {
        self.position.get_mut(&breakpoint)
    }

    pub fn parent(&self, breakpoint: Breakpoint) -> Option<&BrickId> {
        self.position(breakpoint).and_then(|p| p.parent.as_ref())
    }

    /// Present and not hidden at this breakpoint
    pub fn is_visible(&self, breakpoint: Breakpoint) -> bool {
        self.position(breakpoint).map_or(false, |p| !p.hidden)
    }

    /// Whether this brick is nested (directly) in `container` at any breakpoint
    pub fn is_child_of(&self, container: &BrickId) -> bool {
        self.position
            .values()
            .any(|p| p.parent.as_ref() == Some(container))
    }
}

/// Page document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub bricks: Vec<Brick>,
}

impl Page {
    pub fn new(bricks: Vec<Brick>) -> Self {
        Self { bricks }
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn get(&self, id: &BrickId) -> Option<&Brick> {
        self.bricks.iter().find(|b| &b.id == id)
    }

    pub fn get_mut(&mut self, id: &BrickId) -> Option<&mut Brick> {
        self.bricks.iter_mut().find(|b| &b.id == id)
    }

    pub fn index_of(&self, id: &BrickId) -> Option<usize> {
        self.bricks.iter().position(|b| &b.id == id)
    }

    pub fn contains(&self, id: &BrickId) -> bool {
        self.index_of(id).is_some()
    }

    /// Direct children of `container` at any breakpoint
    pub fn children_of<'a>(&'a self, container: &'a BrickId) -> impl Iterator<Item = &'a Brick> + 'a {
        self.bricks.iter().filter(move |b| b.is_child_of(container))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_brick_serialization_shape() {
        let brick = Brick::new("b1", BrickType::Text)
            .with_position(Breakpoint::Desktop, Position::new(0, 0, 6, 2))
            .with_position(
                Breakpoint::Mobile,
                Position {
                    manual_height: Some(3),
                    ..Position::new(0, 0, 1, 3)
                },
            );

        let value = serde_json::to_value(&brick).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["position"]["desktop"], json!({ "x": 0, "y": 0, "w": 6, "h": 2 }));
        assert_eq!(value["position"]["mobile"]["manualHeight"], 3);
    }

    #[test]
    fn test_page_from_json() {
        let page = Page::from_json(
            r#"{
                "bricks": [
                    {
                        "id": "hero-1",
                        "type": "hero",
                        "position": {
                            "desktop": { "x": 0, "y": 0, "w": 12, "h": 5 },
                            "mobile": { "x": 0, "y": 0, "w": 1, "h": 5, "hidden": true }
                        }
                    },
                    {
                        "id": "text-1",
                        "type": "text",
                        "position": {
                            "desktop": { "x": 1, "y": 0, "w": 4, "h": 2, "parent": "box" }
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.bricks.len(), 2);
        let hero = page.get(&BrickId::from("hero-1")).unwrap();
        assert!(hero.is_visible(Breakpoint::Desktop));
        assert!(!hero.is_visible(Breakpoint::Mobile));
        assert!(hero.props.is_null());

        let text = page.get(&BrickId::from("text-1")).unwrap();
        assert_eq!(text.parent(Breakpoint::Desktop), Some(&BrickId::from("box")));
        assert!(text.position(Breakpoint::Mobile).is_none());
        assert_eq!(page.children_of(&BrickId::from("box")).count(), 1);
    }
}
