//! In-memory location graph with load-time validation.

use std::collections::{HashMap, HashSet};

use super::LocationGraph;
use super::loader::AsymmetricEdges;
use crate::core::Location;
use crate::error::GraphError;

/// Location graph held in memory.
///
/// Locations are kept sorted by id so that [`LocationGraph::all`] is stable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl InMemoryGraph {
    /// Build a graph, rejecting asymmetric edges.
    pub fn new(locations: Vec<Location>) -> Result<Self, GraphError> {
        Self::with_policy(locations, AsymmetricEdges::Reject)
    }

    /// Build a graph with an explicit policy for one-directional edges.
    ///
    /// Duplicate ids, self loops and unknown neighbors are always rejected.
    pub fn with_policy(
        mut locations: Vec<Location>,
        asymmetric: AsymmetricEdges,
    ) -> Result<Self, GraphError> {
        locations.sort_by(|a, b| a.id.cmp(&b.id));

        let mut index = HashMap::with_capacity(locations.len());
        for (i, loc) in locations.iter().enumerate() {
            if index.insert(loc.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateLocation(loc.id.clone()));
            }
        }

        // Drop repeated neighbor entries, keeping first-listed order
        for loc in &mut locations {
            let mut seen = HashSet::new();
            loc.neighbors.retain(|n| seen.insert(n.clone()));
        }

        let mut missing_reverse = Vec::new();
        for loc in &locations {
            for neighbor in &loc.neighbors {
                if *neighbor == loc.id {
                    return Err(GraphError::SelfLoop(loc.id.clone()));
                }
                let Some(&j) = index.get(neighbor) else {
                    return Err(GraphError::UnknownNeighbor {
                        location: loc.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                };
                if !locations[j].neighbors.contains(&loc.id) {
                    missing_reverse.push((loc.id.clone(), neighbor.clone(), j));
                }
            }
        }

        if let Some((from, to, _)) = missing_reverse.first() {
            match asymmetric {
                AsymmetricEdges::Reject => {
                    return Err(GraphError::AsymmetricEdge {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                AsymmetricEdges::Symmetrize => {
                    for (from, to, j) in missing_reverse {
                        log::warn!("Edge {} -> {} has no reverse edge, adding it", from, to);
                        locations[j].neighbors.push(from);
                    }
                }
            }
        }

        log::debug!("Location graph ready: {} locations", locations.len());

        Ok(Self { locations, index })
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Check if the graph has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.locations.iter().map(|l| l.neighbors.len()).sum::<usize>() / 2
    }
}

impl LocationGraph for InMemoryGraph {
    fn get(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    fn all(&self) -> Vec<&Location> {
        self.locations.iter().collect()
    }

    fn neighbors(&self, id: &str) -> Vec<&Location> {
        self.get(id)
            .map(|loc| {
                loc.neighbors
                    .iter()
                    .filter_map(|n| self.get(n))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LocationType, Position};

    fn loc(id: &str, x: f32, neighbors: &[&str]) -> Location {
        Location::new(id, id.to_uppercase(), LocationType::Hallway, Position::new(x, 0.0))
            .with_neighbors(neighbors.iter().copied())
    }

    #[test]
    fn test_symmetric_graph() {
        let graph = InMemoryGraph::new(vec![
            loc("b", 10.0, &["a", "c"]),
            loc("a", 0.0, &["b"]),
            loc("c", 20.0, &["b"]),
        ])
        .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.exists("a"));
        assert!(!graph.exists("z"));

        // Stable id order
        let ids: Vec<_> = graph.all().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let neighbors: Vec<_> = graph.neighbors("b").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(neighbors, vec!["a", "c"]);
        assert!(graph.neighbors("z").is_empty());
    }

    #[test]
    fn test_rejects_asymmetric_edge() {
        let result = InMemoryGraph::new(vec![loc("a", 0.0, &["b"]), loc("b", 10.0, &[])]);

        assert_eq!(
            result.unwrap_err(),
            GraphError::AsymmetricEdge {
                from: "a".into(),
                to: "b".into()
            }
        );
    }

    #[test]
    fn test_symmetrize_asymmetric_edge() {
        let graph = InMemoryGraph::with_policy(
            vec![loc("a", 0.0, &["b"]), loc("b", 10.0, &[])],
            AsymmetricEdges::Symmetrize,
        )
        .unwrap();

        assert_eq!(graph.get("b").unwrap().neighbors, vec!["a".to_string()]);
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let dup = InMemoryGraph::new(vec![loc("a", 0.0, &[]), loc("a", 1.0, &[])]);
        assert_eq!(dup.unwrap_err(), GraphError::DuplicateLocation("a".into()));

        let self_loop = InMemoryGraph::new(vec![loc("a", 0.0, &["a"])]);
        assert_eq!(self_loop.unwrap_err(), GraphError::SelfLoop("a".into()));

        let unknown = InMemoryGraph::new(vec![loc("a", 0.0, &["ghost"])]);
        assert!(matches!(
            unknown.unwrap_err(),
            GraphError::UnknownNeighbor { .. }
        ));
    }

    #[test]
    fn test_duplicate_neighbor_entries_collapsed() {
        let graph = InMemoryGraph::new(vec![loc("a", 0.0, &["b", "b"]), loc("b", 1.0, &["a"])])
            .unwrap();

        assert_eq!(graph.neighbors("a").len(), 1);
    }
}
