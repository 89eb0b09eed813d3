//! Test utilities for Marga integration tests.
//!
//! Graph fixtures and helpers shared by the scenario and invariant tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use marga::{
    InMemoryGraph, Location, LocationGraph, LocationType, NavigationController, PathfindingEngine,
    Position, Route, SharedGraph,
};

/// Location on the ground floor.
pub fn loc(id: &str, x: f32, y: f32, neighbors: &[&str]) -> Location {
    Location::new(id, id, LocationType::Hallway, Position::new(x, y))
        .with_neighbors(neighbors.iter().copied())
}

/// Linear corridor `A-B-C-D-E` with 10 m spacing.
pub fn linear_locations() -> Vec<Location> {
    vec![
        loc("A", 0.0, 0.0, &["B"]),
        loc("B", 10.0, 0.0, &["A", "C"]),
        loc("C", 20.0, 0.0, &["B", "D"]),
        loc("D", 30.0, 0.0, &["C", "E"]),
        loc("E", 40.0, 0.0, &["D"]),
    ]
}

/// Linear corridor plus a dead-end room `X` off `C`.
pub fn linear_with_spur() -> SharedGraph {
    let mut locations = linear_locations();
    for l in &mut locations {
        if l.id == "C" {
            l.neighbors.push("X".to_string());
        }
    }
    locations.push(
        Location::new("X", "Storage X", LocationType::Room, Position::new(20.0, 10.0))
            .with_neighbors(["C"]),
    );
    Arc::new(InMemoryGraph::new(locations).unwrap())
}

/// Two components: `A-B` and `C-D`.
pub fn disconnected() -> SharedGraph {
    Arc::new(
        InMemoryGraph::new(vec![
            loc("A", 0.0, 0.0, &["B"]),
            loc("B", 10.0, 0.0, &["A"]),
            loc("C", 100.0, 0.0, &["D"]),
            loc("D", 110.0, 0.0, &["C"]),
        ])
        .unwrap(),
    )
}

/// 4x4 grid with 10 m spacing, ids `r{row}c{col}`.
pub fn grid_graph() -> SharedGraph {
    let n = 4;
    let id = |r: usize, c: usize| format!("r{}c{}", r, c);

    let mut locations = Vec::new();
    for r in 0..n {
        for c in 0..n {
            let mut neighbors = Vec::new();
            if r > 0 {
                neighbors.push(id(r - 1, c));
            }
            if r + 1 < n {
                neighbors.push(id(r + 1, c));
            }
            if c > 0 {
                neighbors.push(id(r, c - 1));
            }
            if c + 1 < n {
                neighbors.push(id(r, c + 1));
            }
            let name = id(r, c);
            locations.push(
                Location::new(
                    name.clone(),
                    name,
                    LocationType::Hallway,
                    Position::new(c as f32 * 10.0, r as f32 * 10.0),
                )
                .with_neighbors(neighbors),
            );
        }
    }
    Arc::new(InMemoryGraph::new(locations).unwrap())
}

pub fn controller(graph: SharedGraph) -> NavigationController {
    NavigationController::new(PathfindingEngine::new(graph))
}

/// Path to a file under `configs/`.
pub fn config_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join(name)
}

pub fn ids(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

/// Check the structural invariants every route must satisfy.
pub fn assert_route_valid(graph: &dyn LocationGraph, route: &Route) {
    assert!(!route.path.is_empty(), "empty path");
    assert_eq!(route.path[0], route.start_id);
    assert_eq!(route.path[route.path.len() - 1], route.end_id);
    assert_eq!(route.instructions.len(), route.path.len() - 1);

    for w in route.path.windows(2) {
        assert!(
            graph.neighbors(&w[0]).iter().any(|l| l.id == w[1]),
            "{} and {} are not neighbors",
            w[0],
            w[1]
        );
    }
    for w in route.instructions.windows(2) {
        assert_eq!(w[0].to, w[1].from, "instructions do not chain");
    }
    for (i, instruction) in route.instructions.iter().enumerate() {
        assert_eq!(instruction.from, route.path[i]);
        assert_eq!(instruction.to, route.path[i + 1]);
    }
}
