//! Completed-path / active-path merging.
//!
//! On every position update while navigating, the route is rebuilt from
//! scratch as `completed prefix ++ fresh path`:
//!
//! ```text
//! original start ──(prefix)──► current ──(fresh)──► destination
//! ```
//!
//! The prefix is the part of the previous route already walked (truncated at
//! the current location) or, when the traveler left the route, the shortest
//! path from the original start to where they are now. The merged route is
//! a pure function of its inputs, so repeating an update with the same
//! location yields an identical route.

use super::deviation::{DeviationConfig, DeviationSeverity};
use crate::core::{GraphPath, Route};
use crate::planning::PathfindingEngine;
use crate::planning::dijkstra::path_distance;

/// Inputs to one merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeInput<'a> {
    pub current: &'a str,
    pub destination: &'a str,
    pub original_start: &'a str,
    pub previous: Option<&'a Route>,
    pub previous_step: usize,
}

/// Result of one merge.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The traveler stands at the destination.
    Arrived { route: Route, step_index: usize },

    /// No path from the current location to the destination.
    Unreachable,

    /// New combined route.
    Merged {
        route: Route,
        step_index: usize,
        /// The traveler was not on the previous route.
        deviated: bool,
        severity: DeviationSeverity,
    },
}

/// Rebuilds routes on position updates.
#[derive(Debug, Clone, Default)]
pub struct RouteMerger {
    deviation: DeviationConfig,
}

impl RouteMerger {
    pub fn new(deviation: DeviationConfig) -> Self {
        Self { deviation }
    }

    pub fn deviation_config(&self) -> &DeviationConfig {
        &self.deviation
    }

    /// Run the merge for one position update.
    pub fn merge(&self, engine: &PathfindingEngine, input: &MergeInput<'_>) -> MergeOutcome {
        if input.current == input.destination {
            return self.arrive(engine, input);
        }

        let Some(fresh) = engine.shortest_path(input.current, input.destination) else {
            log::warn!(
                "Reroute failed: {} unreachable from {}",
                input.destination,
                input.current
            );
            return MergeOutcome::Unreachable;
        };

        let (prefix, deviated) = self.completed_prefix(engine, input);
        let severity = match (deviated, input.previous) {
            (true, Some(previous)) => self.deviation.assess(engine.graph(), previous, input.current),
            _ => DeviationSeverity::None,
        };

        let generator = engine.generator();
        let timing = generator.timing();
        let estimated_time_s =
            timing.walking_time(prefix.distance) + timing.estimate(fresh.distance, fresh.len());

        let step_index = prefix.len() - 1;
        let mut merged = prefix;
        merged.extend_with(fresh);

        let route = generator.build_route_with_time(engine.graph(), &merged, estimated_time_s);

        log::debug!(
            "Merged route at {} (step {}/{}, deviated: {}, severity: {})",
            input.current,
            step_index,
            route.len(),
            deviated,
            severity.as_str()
        );

        MergeOutcome::Merged {
            route,
            step_index,
            deviated,
            severity,
        }
    }

    /// Keep the previous route when it ends here. A route to some other
    /// destination is cut back to the walked prefix.
    fn arrive(&self, engine: &PathfindingEngine, input: &MergeInput<'_>) -> MergeOutcome {
        if let Some(previous) = input.previous
            && previous.end_id == input.destination
            && let Some(step_index) = previous.position_of(input.current, input.previous_step)
        {
            return MergeOutcome::Arrived {
                route: previous.clone(),
                step_index,
            };
        }

        let (prefix, _) = self.completed_prefix(engine, input);
        let step_index = prefix.len() - 1;
        let route = engine.generator().build_route(engine.graph(), &prefix);

        MergeOutcome::Arrived { route, step_index }
    }

    /// Path already walked, ending at the current location.
    ///
    /// Returns the prefix and whether the traveler had left the previous
    /// route. The prefix is never empty.
    fn completed_prefix(&self, engine: &PathfindingEngine, input: &MergeInput<'_>) -> (GraphPath, bool) {
        let current = input.current;

        match input.previous {
            Some(previous) => match previous.position_of(current, input.previous_step) {
                Some(i) => {
                    let nodes = previous.path[..=i].to_vec();
                    let distance = path_distance(engine.graph(), &nodes);
                    (GraphPath { nodes, distance }, false)
                }
                None => (self.prefix_from_start(engine, input), true),
            },
            None if current == input.original_start => (GraphPath::trivial(current), false),
            None => (self.prefix_from_start(engine, input), false),
        }
    }

    fn prefix_from_start(&self, engine: &PathfindingEngine, input: &MergeInput<'_>) -> GraphPath {
        engine
            .shortest_path(input.original_start, input.current)
            .unwrap_or_else(|| GraphPath::trivial(input.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::{Location, LocationType, Position};
    use crate::graph::InMemoryGraph;

    fn loc(id: &str, x: f32, y: f32, neighbors: &[&str]) -> Location {
        Location::new(id, id, LocationType::Hallway, Position::new(x, y))
            .with_neighbors(neighbors.iter().copied())
    }

    /// a-b-c-d-e in a line, plus x hanging off c.
    fn engine() -> PathfindingEngine {
        PathfindingEngine::new(Arc::new(
            InMemoryGraph::new(vec![
                loc("a", 0.0, 0.0, &["b"]),
                loc("b", 10.0, 0.0, &["a", "c"]),
                loc("c", 20.0, 0.0, &["b", "d", "x"]),
                loc("d", 30.0, 0.0, &["c", "e"]),
                loc("e", 40.0, 0.0, &["d"]),
                loc("x", 20.0, 10.0, &["c"]),
            ])
            .unwrap(),
        ))
    }

    fn input<'a>(current: &'a str, previous: Option<&'a Route>, previous_step: usize) -> MergeInput<'a> {
        MergeInput {
            current,
            destination: "e",
            original_start: "a",
            previous,
            previous_step,
        }
    }

    fn merged(outcome: MergeOutcome) -> (Route, usize, bool) {
        match outcome {
            MergeOutcome::Merged {
                route,
                step_index,
                deviated,
                ..
            } => (route, step_index, deviated),
            other => panic!("Expected Merged, got {:?}", other),
        }
    }

    #[test]
    fn test_progress_along_route() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        let (route, step, deviated) = merged(merger.merge(&engine, &input("c", Some(&initial), 0)));

        assert_eq!(route.path, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(step, 2);
        assert!(!deviated);
        assert!((route.distance - 40.0).abs() < 1e-6);
        // 20 m walked, then the remaining c-d-e leg hits the 60 s floor
        let expected = 20.0 / 1.4 + 60.0;
        assert!((route.estimated_time_s - expected).abs() < 1e-3);
    }

    #[test]
    fn test_deviation_splices_detour() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        let (route, step, deviated) = merged(merger.merge(&engine, &input("x", Some(&initial), 2)));

        assert_eq!(route.path, vec!["a", "b", "c", "x", "c", "d", "e"]);
        assert_eq!(step, 3);
        assert!(deviated);
        assert_eq!(route.path[step], "x");
        assert_eq!(route.instructions.len(), route.len() - 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        let (first, step, _) = merged(merger.merge(&engine, &input("x", Some(&initial), 2)));
        let (second, second_step, deviated) =
            merged(merger.merge(&engine, &input("x", Some(&first), step)));

        assert_eq!(first, second);
        assert_eq!(step, second_step);
        assert!(!deviated);
    }

    #[test]
    fn test_repeated_node_uses_latest_occurrence() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        let (detour, step, _) = merged(merger.merge(&engine, &input("x", Some(&initial), 2)));
        // Walking back to c after x: the c after x, not the first one
        let (route, step, _) = merged(merger.merge(&engine, &input("c", Some(&detour), step)));

        assert_eq!(route.path, vec!["a", "b", "c", "x", "c", "d", "e"]);
        assert_eq!(step, 4);
    }

    #[test]
    fn test_no_previous_route() {
        let engine = engine();
        let merger = RouteMerger::default();

        let (route, step, _) = merged(merger.merge(&engine, &input("a", None, 0)));
        assert_eq!(route.path, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(step, 0);

        let (route, step, _) = merged(merger.merge(&engine, &input("c", None, 0)));
        assert_eq!(route.path, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(step, 2);
    }

    #[test]
    fn test_arrival() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        match merger.merge(&engine, &input("e", Some(&initial), 3)) {
            MergeOutcome::Arrived { route, step_index } => {
                assert_eq!(route, initial);
                assert_eq!(step_index, 4);
            }
            other => panic!("Expected Arrived, got {:?}", other),
        }
    }

    #[test]
    fn test_arrival_at_new_destination_cuts_route() {
        let engine = engine();
        let merger = RouteMerger::default();
        let initial = engine.route("a", "e").unwrap();

        let moved = MergeInput {
            destination: "c",
            ..input("c", Some(&initial), 2)
        };
        match merger.merge(&engine, &moved) {
            MergeOutcome::Arrived { route, step_index } => {
                assert_eq!(route.path, vec!["a", "b", "c"]);
                assert_eq!(route.end_id, "c");
                assert_eq!(step_index, 2);
                assert!((route.distance - 20.0).abs() < 1e-6);
            }
            other => panic!("Expected Arrived, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable() {
        let engine = PathfindingEngine::new(Arc::new(
            InMemoryGraph::new(vec![
                loc("a", 0.0, 0.0, &["b"]),
                loc("b", 10.0, 0.0, &["a"]),
                loc("e", 50.0, 0.0, &[]),
            ])
            .unwrap(),
        ));

        let outcome = RouteMerger::default().merge(&engine, &input("b", None, 0));
        assert_eq!(outcome, MergeOutcome::Unreachable);
    }
}
