//! Path planning over the location graph.
//!
//! - [`dijkstra`]: deterministic weighted shortest path
//! - [`RoutingPolicy`]: mandatory waypoints for selected trips
//! - [`find_alternatives`]: penalty-based alternative search, optionally
//!   pinned to waypoints with [`find_alternatives_through`]
//! - [`PathfindingEngine`]: ties the above together and builds [`Route`]s
//!
//! [`Route`]: crate::core::Route

pub mod alternatives;
pub mod dijkstra;
mod engine;
mod policy;

pub use alternatives::{
    AlternativesConfig, find_alternatives, find_alternatives_through, overlap_ratio,
};
pub use engine::{PathfindingEngine, SharedGraph};
pub use policy::{LocationMatcher, RoutingPolicy, WaypointOverride};
