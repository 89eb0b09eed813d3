//! Path and route types.
//!
//! A [`GraphPath`] is the raw output of the pathfinder. A [`Route`] is a
//! path dressed with instructions and an estimated duration; it is a value
//! created fresh by every pathfinding call and replaced, never patched.

use serde::{Deserialize, Serialize};

/// Ordered node path with its total length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPath {
    /// Location ids from start to goal.
    pub nodes: Vec<String>,

    /// Sum of hop distances in meters.
    pub distance: f32,
}

impl GraphPath {
    /// Single-node path.
    pub fn trivial(id: impl Into<String>) -> Self {
        Self {
            nodes: vec![id.into()],
            distance: 0.0,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the path has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node.
    pub fn first(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// Last node.
    pub fn last(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    /// Whether the path visits `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    /// Append `other`, dropping its first node when it repeats our last one.
    pub fn extend_with(&mut self, other: GraphPath) {
        let skip = usize::from(!self.nodes.is_empty() && self.last() == other.first());
        self.nodes.extend(other.nodes.into_iter().skip(skip));
        self.distance += other.distance;
    }
}

/// Vertical or planar direction of a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Up,
    Down,
}

impl Direction {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Type of a navigation instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    Start,
    Straight,
    Turn { direction: Direction },
    Destination,
    /// Emitted for the first active hop after the traveler left the route.
    Reroute,
}

/// One hop of turn-by-turn guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationInstruction {
    /// Unique within the owning route.
    pub id: String,

    pub kind: InstructionKind,

    /// Human-readable text.
    pub description: String,

    /// Hop origin.
    pub from: String,

    /// Hop target.
    pub to: String,

    pub direction: Direction,

    /// Hop length in meters.
    pub distance: f32,
}

/// A computed route between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Derived from start and end so that recomputation is reproducible.
    pub id: String,

    pub start_id: String,

    pub end_id: String,

    /// Location ids; `path[0] == start_id`, `path[last] == end_id`.
    pub path: Vec<String>,

    /// Total length in meters.
    pub distance: f32,

    /// Estimated walking time in seconds.
    pub estimated_time_s: f32,

    /// One instruction per hop.
    pub instructions: Vec<NavigationInstruction>,
}

impl Route {
    /// Route id for a start/end pair.
    pub fn make_id(start_id: &str, end_id: &str) -> String {
        format!("{}->{}", start_id, end_id)
    }

    /// Number of nodes in the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Check if the path is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Index of the first occurrence of `id` at or after `from_index`,
    /// falling back to the first occurrence anywhere.
    pub fn position_of(&self, id: &str, from_index: usize) -> Option<usize> {
        self.path
            .iter()
            .skip(from_index)
            .position(|n| n == id)
            .map(|i| i + from_index)
            .or_else(|| self.path.iter().position(|n| n == id))
    }

    /// Nodes already traversed, up to and including `step`.
    pub fn completed_path(&self, step: usize) -> &[String] {
        let end = (step + 1).min(self.path.len());
        &self.path[..end]
    }

    /// Nodes still ahead, starting at `step`.
    pub fn active_path(&self, step: usize) -> &[String] {
        let start = step.min(self.path.len());
        &self.path[start..]
    }

    /// Remaining distance from `step` to the end.
    pub fn remaining_distance(&self, step: usize) -> f32 {
        self.instructions.iter().skip(step).map(|i| i.distance).sum()
    }

    /// Fraction of the route distance already covered (0.0 to 1.0).
    pub fn progress(&self, step: usize) -> f32 {
        if self.distance <= 0.0 {
            return if step + 1 >= self.path.len() { 1.0 } else { 0.0 };
        }
        1.0 - (self.remaining_distance(step) / self.distance).min(1.0)
    }

    /// Instruction for the hop leaving `step`, if any.
    pub fn instruction_at(&self, step: usize) -> Option<&NavigationInstruction> {
        self.instructions.get(step)
    }
}
