//! Scene settings: the prefixes used to name generated objects and the size of the primitives.
//! Every field has a default so a config file only needs the values it changes.

use serde::Deserialize;
use std::{fs, io, path::Path, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub prefix: String,
    pub sphere_radius: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            prefix: "grad_".to_owned(),
            sphere_radius: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub prefix: String,
    pub cone_vertices: u32,
    pub cone_radius: f64,
    pub cone_depth: f64,
    /// Height the cones are placed at. Half the cone depth puts their base on the ground.
    pub elevation: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            prefix: "node_".to_owned(),
            cone_vertices: 32,
            cone_radius: 0.3,
            cone_depth: 5.0,
            elevation: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// The surface of frame `n` is named `<prefix><n>`.
    pub prefix: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            prefix: "Grad_".to_owned(),
        }
    }
}

/// Surface look handed to the host with a primitive. `color` is linear RGB in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: [f64; 3],
    pub alpha: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Wall `i` of a file is named `<prefix><i>`.
    pub prefix: String,
    pub height: f64,
    /// Shared by every wall. Translucent sand by default so the crowd stays visible.
    pub material: Material,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            prefix: "wall".to_owned(),
            height: 3.0,
            material: Material {
                color: [1.0, 0.965, 0.560],
                alpha: 0.1,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub gradients: GradientConfig,
    pub nodes: NodeConfig,
    pub surfaces: SurfaceConfig,
    pub walls: WallConfig,
}

impl SceneConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for SceneConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
