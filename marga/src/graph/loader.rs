//! Location graph file loading.
//!
//! Graph files are TOML documents with one `[[locations]]` table per node:
//!
//! ```toml
//! [[locations]]
//! id = "lobby"
//! name = "Main Lobby"
//! type = "entrance"
//! zone = "east"
//! position = { x = 0.0, y = 0.0 }
//! neighbors = ["hall-1"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::InMemoryGraph;
use crate::core::Location;
use crate::error::{MargaError, Result};

/// How to treat an edge listed in only one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsymmetricEdges {
    /// Fail graph loading.
    #[default]
    Reject,
    /// Add the missing reverse edge and log a warning.
    Symmetrize,
}

/// On-disk graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl GraphFile {
    /// Parse a graph document.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate into a graph.
    pub fn into_graph(self, asymmetric: AsymmetricEdges) -> Result<InMemoryGraph> {
        Ok(InMemoryGraph::with_policy(self.locations, asymmetric)?)
    }
}

/// Load and validate a graph file.
pub fn load_graph(path: &Path, asymmetric: AsymmetricEdges) -> Result<InMemoryGraph> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MargaError::Config(format!("Failed to read graph file {:?}: {}", path, e))
    })?;
    let graph = GraphFile::from_toml(&content)?.into_graph(asymmetric)?;

    log::info!(
        "Loaded {} locations ({} edges) from {:?}",
        graph.len(),
        graph.edge_count(),
        path
    );

    Ok(graph)
}
