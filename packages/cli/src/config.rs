use brickwork_editor::{AutosavePolicy, SessionOptions};
use brickwork_layout::{Breakpoint, GridConfig, ReflowConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "brickwork.config.json";

/// Brickwork configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Row height in pixels, shared by both breakpoints
    #[serde(default = "default_row_height")]
    pub row_height: f64,

    #[serde(default = "GridSettings::desktop")]
    pub desktop: GridSettings,

    #[serde(default = "GridSettings::mobile")]
    pub mobile: GridSettings,

    #[serde(default)]
    pub autosave: AutosavePolicy,
}

/// Canvas geometry for one breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub container_width: f64,

    #[serde(default)]
    pub padding_x: f64,

    #[serde(default)]
    pub padding_y: f64,
}

fn default_row_height() -> f64 {
    40.0
}

impl GridSettings {
    fn desktop() -> Self {
        Self {
            container_width: 1232.0,
            padding_x: 16.0,
            padding_y: 16.0,
        }
    }

    fn mobile() -> Self {
        Self {
            container_width: 375.0,
            padding_x: 12.0,
            padding_y: 12.0,
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn grid_for(&self, breakpoint: Breakpoint) -> GridConfig {
        let settings = match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Mobile => &self.mobile,
        };
        GridConfig::for_container(
            settings.container_width,
            breakpoint,
            self.row_height,
            settings.padding_x,
            settings.padding_y,
        )
    }

    pub fn reflow_config(&self) -> ReflowConfig {
        ReflowConfig::from_grids(
            &self.grid_for(Breakpoint::Desktop),
            &self.grid_for(Breakpoint::Mobile),
        )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            autosave: self.autosave,
            reflow: self.reflow_config(),
            ..SessionOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            desktop: GridSettings::desktop(),
            mobile: GridSettings::mobile(),
            autosave: AutosavePolicy::default(),
        }
    }
}
