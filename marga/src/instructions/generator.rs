//! Turn-by-turn instruction generation and duration estimates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::formatter::{Hop, InstructionFormatter, PlainFormatter};
use crate::config::defaults;
use crate::core::{Direction, GraphPath, InstructionKind, Location, NavigationInstruction, Route};
use crate::graph::LocationGraph;

/// Elevation change (meters) across a stairs/elevator hop that counts as a
/// floor change.
const FLOOR_CHANGE_THRESHOLD_M: f32 = 0.5;

/// Duration estimation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Walking speed (m/s).
    #[serde(default = "defaults::walking_speed_mps")]
    pub walking_speed_mps: f32,

    /// Seconds added per intermediate node.
    #[serde(default = "defaults::intermediate_overhead_s")]
    pub intermediate_overhead_s: f32,

    /// Minimum duration of any route (seconds), same-location routes included.
    #[serde(default = "defaults::min_duration_s")]
    pub min_duration_s: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            walking_speed_mps: defaults::walking_speed_mps(),
            intermediate_overhead_s: defaults::intermediate_overhead_s(),
            min_duration_s: defaults::min_duration_s(),
        }
    }
}

impl TimingConfig {
    /// Pure walking time for a distance.
    #[inline]
    pub fn walking_time(&self, distance: f32) -> f32 {
        distance / self.walking_speed_mps
    }

    /// Estimated duration of a path with `node_count` nodes.
    pub fn estimate(&self, distance: f32, node_count: usize) -> f32 {
        let intermediate = node_count.saturating_sub(2) as f32;
        let raw = self.walking_time(distance) + self.intermediate_overhead_s * intermediate;
        raw.max(self.min_duration_s)
    }
}

/// Produces instructions and routes from node paths.
#[derive(Clone)]
pub struct InstructionGenerator {
    timing: TimingConfig,
    formatter: Arc<dyn InstructionFormatter>,
}

impl std::fmt::Debug for InstructionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionGenerator")
            .field("timing", &self.timing)
            .field("formatter", &"...")
            .finish()
    }
}

impl Default for InstructionGenerator {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

impl InstructionGenerator {
    /// Create a generator with the plain English formatter.
    pub fn new(timing: TimingConfig) -> Self {
        Self::with_formatter(timing, Arc::new(PlainFormatter))
    }

    /// Create a generator with a custom formatter.
    pub fn with_formatter(timing: TimingConfig, formatter: Arc<dyn InstructionFormatter>) -> Self {
        Self { timing, formatter }
    }

    /// Duration settings.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Generate one instruction per hop of `path`.
    ///
    /// - 0 or 1 nodes: no instructions
    /// - 2 nodes: a single `Destination` hop
    /// - otherwise: `Start`, then `Straight`/`Turn`, then `Destination`
    pub fn generate(
        &self,
        graph: &dyn LocationGraph,
        route_id: &str,
        path: &[String],
    ) -> Vec<NavigationInstruction> {
        if path.len() < 2 {
            return Vec::new();
        }

        let nodes: Vec<Option<&Location>> = path.iter().map(|id| graph.get(id)).collect();
        let total_hops = path.len() - 1;

        (0..total_hops)
            .map(|i| {
                let direction = hop_direction(&nodes, i);
                let kind = if i == total_hops - 1 {
                    InstructionKind::Destination
                } else if i == 0 {
                    InstructionKind::Start
                } else if direction == Direction::Forward {
                    InstructionKind::Straight
                } else {
                    InstructionKind::Turn { direction }
                };

                let distance = match (nodes[i], nodes[i + 1]) {
                    (Some(a), Some(b)) => a.distance_to(b),
                    _ => 0.0,
                };

                let from_name = nodes[i].map_or(path[i].as_str(), |l| l.name.as_str());
                let to_name = nodes[i + 1].map_or(path[i + 1].as_str(), |l| l.name.as_str());
                let description = self.formatter.describe(&Hop {
                    kind,
                    from: from_name,
                    to: to_name,
                    distance,
                    total_hops,
                });

                NavigationInstruction {
                    id: format!("{}#{}", route_id, i),
                    kind,
                    description,
                    from: path[i].clone(),
                    to: path[i + 1].clone(),
                    direction,
                    distance,
                }
            })
            .collect()
    }

    /// Copy of `instruction` with a different kind and matching text.
    pub fn rekind(
        &self,
        graph: &dyn LocationGraph,
        instruction: &NavigationInstruction,
        kind: InstructionKind,
        total_hops: usize,
    ) -> NavigationInstruction {
        let from_name = graph
            .get(&instruction.from)
            .map_or(instruction.from.as_str(), |l| l.name.as_str());
        let to_name = graph
            .get(&instruction.to)
            .map_or(instruction.to.as_str(), |l| l.name.as_str());

        NavigationInstruction {
            kind,
            description: self.formatter.describe(&Hop {
                kind,
                from: from_name,
                to: to_name,
                distance: instruction.distance,
                total_hops,
            }),
            ..instruction.clone()
        }
    }

    /// Build a full route from a node path.
    pub fn build_route(&self, graph: &dyn LocationGraph, path: &GraphPath) -> Route {
        let estimated_time_s = self.timing.estimate(path.distance, path.len());

        self.build_route_with_time(graph, path, estimated_time_s)
    }

    /// Build a route with an externally computed duration.
    pub fn build_route_with_time(
        &self,
        graph: &dyn LocationGraph,
        path: &GraphPath,
        estimated_time_s: f32,
    ) -> Route {
        let start_id = path.first().unwrap_or_default().to_string();
        let end_id = path.last().unwrap_or_default().to_string();
        let id = Route::make_id(&start_id, &end_id);
        let instructions = self.generate(graph, &id, &path.nodes);

        Route {
            id,
            start_id,
            end_id,
            path: path.nodes.clone(),
            distance: path.distance,
            estimated_time_s,
            instructions,
        }
    }
}

/// Direction of hop `i` based on stairs/elevator nodes around it.
///
/// Entering a connector compares the node after the connector with the hop
/// origin; leaving one compares the hop target with the node before it.
fn hop_direction(nodes: &[Option<&Location>], i: usize) -> Direction {
    let (Some(from), Some(to)) = (nodes[i], nodes[i + 1]) else {
        return Direction::Forward;
    };

    let dz = if to.location_type.is_vertical_connector() {
        let far = nodes.get(i + 2).copied().flatten().unwrap_or(to);
        far.position.z - from.position.z
    } else if from.location_type.is_vertical_connector() {
        let near = i
            .checked_sub(1)
            .and_then(|p| nodes[p])
            .unwrap_or(from);
        to.position.z - near.position.z
    } else {
        return Direction::Forward;
    };

    if dz > FLOOR_CHANGE_THRESHOLD_M {
        Direction::Up
    } else if dz < -FLOOR_CHANGE_THRESHOLD_M {
        Direction::Down
    } else {
        Direction::Forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LocationType, Position};
    use crate::graph::InMemoryGraph;

    fn ids(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    /// Ground floor a-b, elevator e1 (z=0) to e2 (z=4), then c on floor 1.
    fn two_floor_graph() -> InMemoryGraph {
        InMemoryGraph::new(vec![
            Location::new("a", "A", LocationType::Room, Position::new(0.0, 0.0))
                .with_neighbors(["b"]),
            Location::new("b", "B", LocationType::Hallway, Position::new(10.0, 0.0))
                .with_neighbors(["a", "e1"]),
            Location::new("e1", "Lift G", LocationType::Elevator, Position::new(20.0, 0.0))
                .with_neighbors(["b", "e2"]),
            Location::new(
                "e2",
                "Lift 1",
                LocationType::Elevator,
                Position::with_z(20.0, 0.0, 4.0),
            )
            .with_neighbors(["e1", "c"]),
            Location::new("c", "C", LocationType::Room, Position::with_z(30.0, 0.0, 4.0))
                .with_neighbors(["e2", "d"]),
            Location::new("d", "D", LocationType::Room, Position::with_z(40.0, 0.0, 4.0))
                .with_neighbors(["c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_and_single_node() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();

        assert!(generator.generate(&graph, "r", &[]).is_empty());
        assert!(generator.generate(&graph, "r", &ids(&["a"])).is_empty());
    }

    #[test]
    fn test_direct_hop() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();

        let instructions = generator.generate(&graph, "r", &ids(&["a", "b"]));

        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].kind, InstructionKind::Destination);
        assert_eq!(instructions[0].description, "Go directly to B");
        assert!((instructions[0].distance - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_kinds_and_chaining() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();
        let path = ids(&["a", "b", "e1", "e2", "c", "d"]);

        let instructions = generator.generate(&graph, "r", &path);

        assert_eq!(instructions.len(), path.len() - 1);
        assert_eq!(instructions[0].kind, InstructionKind::Start);
        assert_eq!(
            instructions[1].kind,
            InstructionKind::Turn {
                direction: Direction::Up
            }
        );
        assert_eq!(
            instructions[2].kind,
            InstructionKind::Turn {
                direction: Direction::Up
            }
        );
        assert_eq!(
            instructions[3].kind,
            InstructionKind::Turn {
                direction: Direction::Up
            }
        );
        assert_eq!(instructions[4].kind, InstructionKind::Destination);

        for pair in instructions.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
        assert_eq!(instructions[0].id, "r#0");
    }

    #[test]
    fn test_going_down() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();
        let path = ids(&["d", "c", "e2", "e1", "b", "a"]);

        let instructions = generator.generate(&graph, "r", &path);

        assert_eq!(
            instructions[1].kind,
            InstructionKind::Turn {
                direction: Direction::Down
            }
        );
        assert_eq!(instructions[3].direction, Direction::Down);
    }

    #[test]
    fn test_same_floor_hops_are_straight() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();

        let instructions = generator.generate(&graph, "r", &ids(&["e2", "c", "d"]));

        assert_eq!(instructions[0].kind, InstructionKind::Start);
        assert_eq!(instructions[1].kind, InstructionKind::Destination);

        let instructions = generator.generate(&graph, "r", &ids(&["a", "b", "e1"]));
        assert_eq!(instructions[0].direction, Direction::Forward);
    }

    #[test]
    fn test_estimate_time() {
        let timing = TimingConfig::default();

        // 5 nodes, 140 m: 100 s walking + 3 * 30 s overhead
        assert!((timing.estimate(140.0, 5) - 190.0).abs() < 1e-4);

        // Short routes are floored
        assert!((timing.estimate(7.0, 2) - 60.0).abs() < 1e-6);
        assert!((timing.estimate(0.0, 1) - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_build_route() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();
        let path = GraphPath {
            nodes: ids(&["a", "b"]),
            distance: 10.0,
        };

        let route = generator.build_route(&graph, &path);

        assert_eq!(route.id, "a->b");
        assert_eq!(route.start_id, "a");
        assert_eq!(route.end_id, "b");
        assert_eq!(route.instructions.len(), 1);
        assert!((route.estimated_time_s - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_rekind_rewrites_description() {
        let graph = two_floor_graph();
        let generator = InstructionGenerator::default();
        let instructions = generator.generate(&graph, "r", &ids(&["a", "b", "e1"]));

        let reroute = generator.rekind(&graph, &instructions[1], InstructionKind::Reroute, 2);

        assert_eq!(reroute.kind, InstructionKind::Reroute);
        assert_eq!(reroute.from, "b");
        assert_eq!(reroute.description, "Rerouting: head from B to Lift G");
    }
}
