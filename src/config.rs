//! Engine configuration
//!
//! Layout tuning and default render flags. Every field has a default so a
//! partial YAML document is enough.

use crate::error::{CatalogError, CatalogResult};
use crate::value_objects::RenderMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for [`crate::engine::GraphEngine`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Spacing and simulation parameters for the layout engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Width assumed for every node
    pub node_width: f64,
    /// Height assumed for every node
    pub node_height: f64,
    /// Horizontal distance between ranks in the hierarchical layout
    pub rank_spacing: f64,
    /// Vertical distance between nodes of the same rank
    pub node_spacing: f64,
    /// Iterations of the force-directed simulation
    pub iterations: u32,
    /// Preferred edge length of the force-directed simulation
    pub ideal_distance: f64,
    /// Seed for the force-directed initial placement
    pub seed: u64,
    /// Columns used when placing services inside a domain group
    pub group_columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 100.0,
            rank_spacing: 250.0,
            node_spacing: 150.0,
            iterations: 300,
            ideal_distance: 300.0,
            seed: 42,
            group_columns: 3,
        }
    }
}

/// Builder defaults applied by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub render_messages: bool,
    pub render_all_edges: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Simple,
            render_messages: true,
            render_all_edges: false,
        }
    }
}

impl GraphConfig {
    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let config: GraphConfig = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> CatalogResult<()> {
        let layout = &self.layout;
        if layout.node_width <= 0.0 || layout.node_height <= 0.0 {
            return Err(CatalogError::Config(
                "node dimensions must be positive".to_string(),
            ));
        }
        if layout.group_columns == 0 {
            return Err(CatalogError::Config(
                "groupColumns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
