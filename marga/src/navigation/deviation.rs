//! Off-route severity classification.
//!
//! Severity is reported to consumers only; rerouting always happens
//! regardless of how far the traveler strayed.

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::Route;
use crate::graph::LocationGraph;

/// How far the traveler is from the previous route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviationSeverity {
    /// On the route.
    #[default]
    None,
    Minor,
    Moderate,
    Major,
    /// Off the route but the distance could not be measured.
    Unknown,
}

impl DeviationSeverity {
    /// Convert to string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationSeverity::None => "NONE",
            DeviationSeverity::Minor => "MINOR",
            DeviationSeverity::Moderate => "MODERATE",
            DeviationSeverity::Major => "MAJOR",
            DeviationSeverity::Unknown => "UNKNOWN",
        }
    }
}

/// Severity thresholds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviationConfig {
    /// Below this distance (m) a deviation is minor.
    #[serde(default = "defaults::minor_threshold_m")]
    pub minor_threshold_m: f32,

    /// Below this distance (m) a deviation is moderate; above it, major.
    #[serde(default = "defaults::moderate_threshold_m")]
    pub moderate_threshold_m: f32,
}

impl Default for DeviationConfig {
    fn default() -> Self {
        Self {
            minor_threshold_m: defaults::minor_threshold_m(),
            moderate_threshold_m: defaults::moderate_threshold_m(),
        }
    }
}

impl DeviationConfig {
    /// Severity for an off-route distance.
    pub fn classify(&self, distance: Option<f32>) -> DeviationSeverity {
        match distance {
            None => DeviationSeverity::Unknown,
            Some(d) if d < self.minor_threshold_m => DeviationSeverity::Minor,
            Some(d) if d < self.moderate_threshold_m => DeviationSeverity::Moderate,
            Some(_) => DeviationSeverity::Major,
        }
    }

    /// Severity of standing at `location_id` while following `route`.
    pub fn assess(
        &self,
        graph: &dyn LocationGraph,
        route: &Route,
        location_id: &str,
    ) -> DeviationSeverity {
        if route.path.iter().any(|n| n == location_id) {
            return DeviationSeverity::None;
        }
        self.classify(distance_to_route(graph, route, location_id))
    }
}

/// Distance from a location to the nearest point of the route polyline.
pub fn distance_to_route(graph: &dyn LocationGraph, route: &Route, location_id: &str) -> Option<f32> {
    let position = graph.get(location_id)?.position;
    let points: Vec<_> = route
        .path
        .iter()
        .filter_map(|id| graph.get(id).map(|l| l.position))
        .collect();

    match points.as_slice() {
        [] => None,
        [only] => Some(position.distance_to(only)),
        _ => points
            .windows(2)
            .map(|w| position.distance_to_segment(&w[0], &w[1]))
            .min_by(|a, b| a.total_cmp(b)),
    }
}
