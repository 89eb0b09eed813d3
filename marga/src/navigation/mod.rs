//! Navigation session management.
//!
//! - [`NavigationController`]: state machine owning the session
//! - [`RouteMerger`]: completed + active path merge on position updates
//! - [`DeviationConfig`]: off-route severity
//! - [`PositionTracker`]: start/stop hook for the position source

mod controller;
mod deviation;
mod merger;
mod state;
mod tracker;

pub use controller::NavigationController;
pub use deviation::{DeviationConfig, DeviationSeverity, distance_to_route};
pub use merger::{MergeInput, MergeOutcome, RouteMerger};
pub use state::{NavState, NavigationSession, SessionError, SessionSnapshot};
pub use tracker::{ManualTracker, PositionTracker};
