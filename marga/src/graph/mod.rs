//! Location graph access.
//!
//! The routing core reads the building through the [`LocationGraph`] trait.
//! Reads are pure and synchronous; implementations must not change while a
//! route is being computed.
//!
//! [`InMemoryGraph`] is the bundled implementation. It validates the
//! adjacency lists at construction time so that the pathfinder never sees
//! one-directional edges.

mod loader;
mod memory;

pub use loader::{AsymmetricEdges, GraphFile, load_graph};
pub use memory::InMemoryGraph;

use crate::core::Location;

/// Read-only view of locations and their adjacency.
pub trait LocationGraph {
    /// Look up a location by id.
    fn get(&self, id: &str) -> Option<&Location>;

    /// All locations, in a stable order.
    fn all(&self) -> Vec<&Location>;

    /// Locations adjacent to `id`, in adjacency-list order.
    ///
    /// Empty when `id` is unknown.
    fn neighbors(&self, id: &str) -> Vec<&Location>;

    /// Whether `id` names a location.
    fn exists(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}
