//! Configuration loading for Marga.
//!
//! Everything is read from a single TOML file; missing sections and fields
//! fall back to built-in defaults.
//!
//! ## Example TOML
//!
//! ```toml
//! [routing]
//! walking_speed_mps = 1.4
//! intermediate_overhead_s = 30.0
//! min_duration_s = 60.0
//!
//! [alternatives]
//! edge_penalty = 3.0
//! similarity_threshold = 0.7
//!
//! [deviation]
//! minor_threshold_m = 50.0
//! moderate_threshold_m = 200.0
//!
//! [graph]
//! path = "configs/building.toml"
//! asymmetric_edges = "reject"
//!
//! [[policy.overrides]]
//! from = { zone = "east" }
//! to = { zone = "west" }
//! via = ["atrium"]
//! ```

pub(crate) mod defaults;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MargaError, Result};
use crate::graph::AsymmetricEdges;
use crate::instructions::TimingConfig;
use crate::navigation::DeviationConfig;
use crate::planning::{AlternativesConfig, RoutingPolicy};

/// Main configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MargaConfig {
    /// Walking speed and duration estimation
    #[serde(default)]
    pub routing: TimingConfig,

    /// Alternative route search
    #[serde(default)]
    pub alternatives: AlternativesConfig,

    /// Deviation severity thresholds
    #[serde(default)]
    pub deviation: DeviationConfig,

    /// Location graph source
    #[serde(default)]
    pub graph: GraphConfig,

    /// Navigation thread settings
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Waypoint override rules
    #[serde(default)]
    pub policy: RoutingPolicy,
}

/// Location graph source settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Path to the graph TOML file
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Treatment of one-directional edges
    #[serde(default)]
    pub asymmetric_edges: AsymmetricEdges,
}

/// Navigation thread settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// How long a producer waits for the navigation thread to answer
    #[serde(default = "defaults::command_timeout_ms")]
    pub command_timeout_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: defaults::command_timeout_ms(),
        }
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::info!("Loading configuration from {:?}", path);
            Self::load(path)
        } else {
            log::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the estimators cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.routing.walking_speed_mps <= 0.0 {
            return Err(MargaError::Config(
                "routing.walking_speed_mps must be positive".to_string(),
            ));
        }
        if self.alternatives.edge_penalty < 1.0 {
            return Err(MargaError::Config(
                "alternatives.edge_penalty must be at least 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alternatives.similarity_threshold) {
            return Err(MargaError::Config(
                "alternatives.similarity_threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.deviation.minor_threshold_m > self.deviation.moderate_threshold_m {
            return Err(MargaError::Config(
                "deviation.minor_threshold_m exceeds moderate_threshold_m".to_string(),
            ));
        }
        Ok(())
    }
}
