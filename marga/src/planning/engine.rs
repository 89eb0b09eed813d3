//! Pathfinding engine: policy-aware shortest paths, alternatives and routes.

use std::sync::Arc;

use super::alternatives::{self, AlternativesConfig};
use super::dijkstra::{self, euclidean};
use super::policy::RoutingPolicy;
use crate::config::MargaConfig;
use crate::core::{GraphPath, Route};
use crate::error::NavError;
use crate::graph::LocationGraph;
use crate::instructions::InstructionGenerator;

/// Shared, thread-safe graph handle.
pub type SharedGraph = Arc<dyn LocationGraph + Send + Sync>;

/// Computes paths and routes over a location graph.
///
/// Stateless between calls apart from its configuration; every call
/// recomputes from scratch.
#[derive(Clone)]
pub struct PathfindingEngine {
    graph: SharedGraph,
    policy: RoutingPolicy,
    alternatives: AlternativesConfig,
    generator: InstructionGenerator,
}

impl std::fmt::Debug for PathfindingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathfindingEngine")
            .field("graph", &"...")
            .field("policy", &self.policy)
            .field("alternatives", &self.alternatives)
            .field("generator", &self.generator)
            .finish()
    }
}

impl PathfindingEngine {
    /// Engine with no overrides and default settings.
    pub fn new(graph: SharedGraph) -> Self {
        Self {
            graph,
            policy: RoutingPolicy::default(),
            alternatives: AlternativesConfig::default(),
            generator: InstructionGenerator::default(),
        }
    }

    /// Engine configured from a loaded config file.
    ///
    /// Fails if a policy rule names a location the graph does not have.
    pub fn from_config(graph: SharedGraph, config: &MargaConfig) -> Result<Self, NavError> {
        config.policy.validate(graph.as_ref())?;

        Ok(Self {
            graph,
            policy: config.policy.clone(),
            alternatives: config.alternatives.clone(),
            generator: InstructionGenerator::new(config.routing.clone()),
        })
    }

    /// Replace the waypoint override table.
    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the alternative search settings.
    pub fn with_alternatives(mut self, config: AlternativesConfig) -> Self {
        self.alternatives = config;
        self
    }

    /// Replace the instruction generator.
    pub fn with_generator(mut self, generator: InstructionGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn graph(&self) -> &dyn LocationGraph {
        self.graph.as_ref()
    }

    pub fn generator(&self) -> &InstructionGenerator {
        &self.generator
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Shortest path honoring waypoint overrides.
    ///
    /// With a matching override the path is the concatenation of the
    /// unconstrained shortest sub-paths through each waypoint in order. Any
    /// missing sub-path makes the whole trip unreachable.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<GraphPath> {
        let stops = self.stops(from, to)?;
        if stops.len() > 2 {
            log::debug!("Routing {} -> {} via {:?}", from, to, &stops[1..stops.len() - 1]);
        }

        let mut path = GraphPath {
            nodes: Vec::new(),
            distance: 0.0,
        };
        for leg in stops.windows(2) {
            path.extend_with(self.unconstrained_path(&leg[0], &leg[1])?);
        }
        Some(path)
    }

    /// Endpoints plus any override waypoints between them.
    ///
    /// Waypoints equal to an endpoint or repeating the previous stop are
    /// skipped. `None` if either endpoint is unknown.
    fn stops(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let graph = self.graph();
        let (from_loc, to_loc) = (graph.get(from)?, graph.get(to)?);

        let mut stops = vec![from.to_string()];
        for waypoint in self.policy.waypoints_for(from_loc, to_loc).unwrap_or_default() {
            if waypoint == to || waypoint == from || stops.last() == Some(&waypoint) {
                continue;
            }
            stops.push(waypoint);
        }
        stops.push(to.to_string());
        Some(stops)
    }

    /// Plain Dijkstra, ignoring overrides.
    pub fn unconstrained_path(&self, from: &str, to: &str) -> Option<GraphPath> {
        dijkstra::shortest_path(self.graph(), from, to, euclidean)
    }

    /// Up to `k` paths besides the primary one, each sufficiently different.
    pub fn alternatives(&self, from: &str, to: &str, k: usize) -> Vec<GraphPath> {
        let (Some(stops), Some(primary)) = (self.stops(from, to), self.shortest_path(from, to))
        else {
            return Vec::new();
        };
        self.alternatives_through(&primary, &stops, k)
    }

    /// Full route with instructions and a duration estimate.
    pub fn route(&self, from: &str, to: &str) -> Result<Route, NavError> {
        let path = self.checked_path(from, to)?;
        let route = self.generator.build_route(self.graph(), &path);

        log::info!(
            "Route {}: {} nodes, {:.1} m, ~{:.0} s",
            route.id,
            route.len(),
            route.distance,
            route.estimated_time_s
        );
        Ok(route)
    }

    /// Primary route followed by up to `k` alternatives.
    pub fn alternative_routes(&self, from: &str, to: &str, k: usize) -> Result<Vec<Route>, NavError> {
        let primary = self.checked_path(from, to)?;
        let stops = self.stops(from, to).unwrap_or_default();
        let mut routes = vec![self.generator.build_route(self.graph(), &primary)];

        routes.extend(
            self.alternatives_through(&primary, &stops, k)
                .iter()
                .map(|p| self.generator.build_route(self.graph(), p)),
        );

        log::info!(
            "Found {} alternative(s) for {} -> {}",
            routes.len() - 1,
            from,
            to
        );
        Ok(routes)
    }

    fn alternatives_through(&self, primary: &GraphPath, stops: &[String], k: usize) -> Vec<GraphPath> {
        alternatives::find_alternatives_through(self.graph(), primary, stops, k, &self.alternatives)
    }

    /// `shortest_path` with errors distinguishing unknown ids from
    /// disconnected ones.
    fn checked_path(&self, from: &str, to: &str) -> Result<GraphPath, NavError> {
        let graph = self.graph();
        for id in [from, to] {
            if !graph.exists(id) {
                return Err(NavError::InvalidLocation(id.to_string()));
            }
        }

        self.shortest_path(from, to).ok_or_else(|| {
            log::warn!("No route from {} to {}", from, to);
            NavError::Unreachable {
                from: from.to_string(),
                to: to.to_string(),
            }
        })
    }
}
