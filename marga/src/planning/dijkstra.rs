//! Dijkstra shortest-path search over a location graph.
//!
//! Uses a binary heap keyed on `(cost, id)` so that equal-cost frontier
//! nodes are always expanded in lexical id order. Two runs over the same
//! graph therefore produce the same path, even when several shortest paths
//! exist.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::core::{GraphPath, Location};
use crate::graph::LocationGraph;

/// Frontier entry in the search heap.
#[derive(Debug, Clone)]
struct SearchNode {
    cost: f32,
    id: String,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower cost, then lower id, first)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Euclidean edge weight.
#[inline]
pub fn euclidean(from: &Location, to: &Location) -> f32 {
    from.distance_to(to)
}

/// Find the cheapest path from `from` to `to` under `weight`.
///
/// Returns `None` if either id is unknown or the goal is unreachable.
/// The returned distance is the geometric length of the path, whatever
/// `weight` was used to pick it.
pub fn shortest_path<F>(
    graph: &dyn LocationGraph,
    from: &str,
    to: &str,
    weight: F,
) -> Option<GraphPath>
where
    F: Fn(&Location, &Location) -> f32,
{
    if !graph.exists(from) || !graph.exists(to) {
        return None;
    }
    if from == to {
        return Some(GraphPath::trivial(from));
    }

    let mut open_set = BinaryHeap::new();
    let mut best: HashMap<String, f32> = HashMap::new();
    let mut parent: HashMap<String, String> = HashMap::new();
    let mut settled: HashSet<String> = HashSet::new();

    best.insert(from.to_string(), 0.0);
    open_set.push(SearchNode {
        cost: 0.0,
        id: from.to_string(),
    });

    while let Some(SearchNode { cost, id }) = open_set.pop() {
        if !settled.insert(id.clone()) {
            continue;
        }

        if id == to {
            let nodes = reconstruct_path(&parent, from, to);
            let distance = path_distance(graph, &nodes);
            return Some(GraphPath { nodes, distance });
        }

        let Some(current) = graph.get(&id) else {
            continue;
        };

        for neighbor in graph.neighbors(&id) {
            if settled.contains(&neighbor.id) {
                continue;
            }

            let candidate = cost + weight(current, neighbor);
            let existing = best.get(&neighbor.id).copied().unwrap_or(f32::INFINITY);

            if candidate < existing {
                best.insert(neighbor.id.clone(), candidate);
                parent.insert(neighbor.id.clone(), id.clone());
                open_set.push(SearchNode {
                    cost: candidate,
                    id: neighbor.id.clone(),
                });
            }
        }
    }

    None
}

/// Geometric length of a node sequence.
pub fn path_distance(graph: &dyn LocationGraph, nodes: &[String]) -> f32 {
    nodes
        .windows(2)
        .map(|w| match (graph.get(&w[0]), graph.get(&w[1])) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => 0.0,
        })
        .sum()
}

/// Walk parents back from the goal.
fn reconstruct_path(parent: &HashMap<String, String>, start: &str, goal: &str) -> Vec<String> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;

    while current != start {
        match parent.get(current) {
            Some(p) => {
                path.push(p.clone());
                current = p;
            }
            None => break,
        }
    }

    path.reverse();
    path
}
