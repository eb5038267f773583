//! # Brick Type Registry
//!
//! Brick types are a closed set known at compile time. Each variant points to
//! a static [`BrickManifest`] carrying its size constraints and the factory
//! for the props a freshly dropped brick starts with.

use crate::breakpoint::Breakpoint;
use crate::constraints::PartialConstraints;
use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickType {
    Text,
    Image,
    Hero,
    Button,
    Video,
    Container,
}

/// Static description of a brick type
#[derive(Debug)]
pub struct BrickManifest {
    pub name: &'static str,
    pub label: &'static str,
    /// Whether other bricks can be nested inside
    pub container: bool,
    /// Type-level constraints, used when a breakpoint does not override them
    pub constraints: PartialConstraints,
    pub desktop: PartialConstraints,
    pub mobile: PartialConstraints,
    default_props: fn() -> Value,
}

impl BrickManifest {
    pub fn for_breakpoint(&self, breakpoint: Breakpoint) -> PartialConstraints {
        match breakpoint {
            Breakpoint::Desktop => self.desktop,
            Breakpoint::Mobile => self.mobile,
        }
    }

    pub fn default_props(&self) -> Value {
        (self.default_props)()
    }
}

fn text_props() -> Value {
    json!({ "content": "Your text here", "align": "left" })
}

fn image_props() -> Value {
    json!({ "src": null, "alt": "", "fit": "cover" })
}

fn hero_props() -> Value {
    json!({
        "title": "A catchy headline",
        "subtitle": "Tell visitors what this page is about",
        "align": "center"
    })
}

fn button_props() -> Value {
    json!({ "label": "Click me", "href": "#", "variant": "primary" })
}

fn video_props() -> Value {
    json!({ "url": null, "autoplay": false, "controls": true })
}

fn container_props() -> Value {
    json!({ "background": null, "gap": 0 })
}

static TEXT: BrickManifest = BrickManifest {
    name: "text",
    label: "Text",
    container: false,
    constraints: PartialConstraints {
        min_height: Some(1),
        preferred_height: Some(2),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(2),
        preferred_width: Some(6),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints::EMPTY,
    default_props: text_props,
};

static IMAGE: BrickManifest = BrickManifest {
    name: "image",
    label: "Image",
    container: false,
    constraints: PartialConstraints {
        min_height: Some(2),
        preferred_height: Some(6),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(2),
        preferred_width: Some(4),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints {
        min_height: Some(3),
        ..PartialConstraints::EMPTY
    },
    default_props: image_props,
};

static HERO: BrickManifest = BrickManifest {
    name: "hero",
    label: "Hero",
    container: false,
    constraints: PartialConstraints {
        min_height: Some(3),
        preferred_height: Some(5),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(6),
        preferred_width: Some(12),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints {
        min_height: Some(4),
        ..PartialConstraints::EMPTY
    },
    default_props: hero_props,
};

static BUTTON: BrickManifest = BrickManifest {
    name: "button",
    label: "Button",
    container: false,
    constraints: PartialConstraints {
        min_height: Some(1),
        preferred_height: Some(1),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(1),
        max_width: Some(4),
        preferred_width: Some(2),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints::EMPTY,
    default_props: button_props,
};

static VIDEO: BrickManifest = BrickManifest {
    name: "video",
    label: "Video",
    container: false,
    constraints: PartialConstraints {
        min_height: Some(3),
        preferred_height: Some(6),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(3),
        preferred_width: Some(6),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints {
        min_height: Some(4),
        ..PartialConstraints::EMPTY
    },
    default_props: video_props,
};

static CONTAINER: BrickManifest = BrickManifest {
    name: "container",
    label: "Container",
    container: true,
    constraints: PartialConstraints {
        min_height: Some(2),
        preferred_height: Some(4),
        ..PartialConstraints::EMPTY
    },
    desktop: PartialConstraints {
        min_width: Some(2),
        preferred_width: Some(12),
        ..PartialConstraints::EMPTY
    },
    mobile: PartialConstraints::EMPTY,
    default_props: container_props,
};

impl BrickType {
    pub const ALL: [BrickType; 6] = [
        BrickType::Text,
        BrickType::Image,
        BrickType::Hero,
        BrickType::Button,
        BrickType::Video,
        BrickType::Container,
    ];

    pub fn manifest(self) -> &'static BrickManifest {
        match self {
            BrickType::Text => &TEXT,
            BrickType::Image => &IMAGE,
            BrickType::Hero => &HERO,
            BrickType::Button => &BUTTON,
            BrickType::Video => &VIDEO,
            BrickType::Container => &CONTAINER,
        }
    }

    pub fn name(self) -> &'static str {
        self.manifest().name
    }

    pub fn is_container(self) -> bool {
        self.manifest().container
    }

    /// Props a newly created brick of this type starts with
    pub fn default_props(self) -> Value {
        self.manifest().default_props()
    }
}

impl fmt::Display for BrickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrickType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrickType::ALL
            .into_iter()
            .find(|brick_type| brick_type.name() == s)
            .ok_or_else(|| LayoutError::UnknownBrickType(s.to_string()))
    }
}
