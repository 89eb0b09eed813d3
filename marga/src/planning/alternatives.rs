//! Alternative route search by iterative edge penalties.
//!
//! After the primary path is known, every edge it uses is made more
//! expensive and Dijkstra is run again. Candidates that share too many
//! nodes with an already accepted path are discarded, but their edges are
//! penalized as well so the next round is pushed further away.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::dijkstra;
use crate::config::defaults;
use crate::core::GraphPath;
use crate::graph::LocationGraph;

/// Alternative search settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlternativesConfig {
    /// Multiplicative weight applied per use of an edge.
    #[serde(default = "defaults::edge_penalty")]
    pub edge_penalty: f32,

    /// Maximum node-overlap ratio with any accepted path.
    #[serde(default = "defaults::similarity_threshold")]
    pub similarity_threshold: f32,

    /// Search rounds allowed per requested alternative.
    #[serde(default = "defaults::max_attempts_per_path")]
    pub max_attempts_per_path: usize,
}

impl Default for AlternativesConfig {
    fn default() -> Self {
        Self {
            edge_penalty: defaults::edge_penalty(),
            similarity_threshold: defaults::similarity_threshold(),
            max_attempts_per_path: defaults::max_attempts_per_path(),
        }
    }
}

/// Undirected edge key.
fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Bump the use count of every edge on `path`.
fn penalize(path: &GraphPath, uses: &mut HashMap<(String, String), i32>) {
    for w in path.nodes.windows(2) {
        *uses.entry(edge_key(&w[0], &w[1])).or_insert(0) += 1;
    }
}

/// Share of nodes two paths have in common, relative to the longer one.
pub fn overlap_ratio(a: &GraphPath, b: &GraphPath) -> f32 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }

    let a_nodes: HashSet<&str> = a.nodes.iter().map(String::as_str).collect();
    let shared = b
        .nodes
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&a_nodes)
        .count();

    shared as f32 / longest as f32
}

/// Find up to `k` paths distinct from `primary` and from each other.
pub fn find_alternatives(
    graph: &dyn LocationGraph,
    primary: &GraphPath,
    k: usize,
    config: &AlternativesConfig,
) -> Vec<GraphPath> {
    let (Some(from), Some(to)) = (primary.first(), primary.last()) else {
        return Vec::new();
    };
    let stops = [from.to_string(), to.to_string()];
    find_alternatives_through(graph, primary, &stops, k, config)
}

/// Like [`find_alternatives`], but every candidate passes through `stops`
/// in order. `stops` starts and ends at the primary's endpoints.
///
/// Each leg between consecutive stops is searched under the shared penalty
/// table and the legs are joined, so a candidate can only differ from the
/// primary between the stops.
pub fn find_alternatives_through(
    graph: &dyn LocationGraph,
    primary: &GraphPath,
    stops: &[String],
    k: usize,
    config: &AlternativesConfig,
) -> Vec<GraphPath> {
    let (Some(from), Some(to)) = (stops.first(), stops.last()) else {
        return Vec::new();
    };
    if k == 0 || from == to || primary.len() < 2 {
        return Vec::new();
    }

    let mut uses: HashMap<(String, String), i32> = HashMap::new();
    let mut accepted: Vec<GraphPath> = vec![primary.clone()];
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    seen.insert(primary.nodes.clone());
    penalize(primary, &mut uses);

    let budget = k * config.max_attempts_per_path.max(1);

    for attempt in 0..budget {
        if accepted.len() > k {
            break;
        }

        let Some(candidate) = penalized_path(graph, stops, &uses, config.edge_penalty) else {
            break;
        };

        if !seen.insert(candidate.nodes.clone()) {
            log::debug!("Alternative search converged after {} rounds", attempt + 1);
            break;
        }

        penalize(&candidate, &mut uses);

        let distinct = accepted
            .iter()
            .all(|a| overlap_ratio(a, &candidate) <= config.similarity_threshold);

        if distinct {
            accepted.push(candidate);
        } else {
            log::debug!(
                "Rejected alternative {:?}: too similar to an accepted path",
                candidate.nodes
            );
        }
    }

    accepted.into_iter().skip(1).collect()
}

/// Cheapest path through `stops` under the current penalties.
fn penalized_path(
    graph: &dyn LocationGraph,
    stops: &[String],
    uses: &HashMap<(String, String), i32>,
    edge_penalty: f32,
) -> Option<GraphPath> {
    let mut path = GraphPath {
        nodes: Vec::new(),
        distance: 0.0,
    };
    for leg in stops.windows(2) {
        let part = dijkstra::shortest_path(graph, &leg[0], &leg[1], |a, b| {
            let count = uses.get(&edge_key(&a.id, &b.id)).copied().unwrap_or(0);
            a.distance_to(b) * edge_penalty.powi(count)
        })?;
        path.extend_with(part);
    }
    Some(path)
}
