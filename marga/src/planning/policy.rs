//! Routing policy: mandatory waypoints for selected origin/destination pairs.
//!
//! Some buildings want routes between particular areas to pass through a
//! specific junction (a staffed desk, an accessible corridor, a security
//! gate). These rules live in configuration:
//!
//! ```toml
//! [[policy.overrides]]
//! from = { zone = "east" }
//! to = { zone = "west" }
//! via = ["atrium"]
//! bidirectional = true
//! ```
//!
//! Rules are checked in order and the first match wins.

use serde::{Deserialize, Serialize};

use crate::core::{Location, LocationType};
use crate::error::NavError;
use crate::graph::LocationGraph;

/// Selects a class of locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatcher {
    /// Every location.
    Any,
    /// A single location id.
    Id(String),
    /// Every location tagged with this zone.
    Zone(String),
    /// Every location of this type.
    Type(LocationType),
}

impl LocationMatcher {
    /// Whether `location` belongs to this class.
    pub fn matches(&self, location: &Location) -> bool {
        match self {
            LocationMatcher::Any => true,
            LocationMatcher::Id(id) => location.id == *id,
            LocationMatcher::Zone(zone) => location.zone.as_deref() == Some(zone.as_str()),
            LocationMatcher::Type(t) => location.location_type == *t,
        }
    }
}

/// One override rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointOverride {
    pub from: LocationMatcher,

    pub to: LocationMatcher,

    /// Locations the route must visit, in order.
    pub via: Vec<String>,

    /// Also apply to the reversed pair, visiting `via` backwards.
    #[serde(default)]
    pub bidirectional: bool,
}

/// Ordered table of waypoint overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub overrides: Vec<WaypointOverride>,
}

impl RoutingPolicy {
    /// Policy with the given rules.
    pub fn new(overrides: Vec<WaypointOverride>) -> Self {
        Self { overrides }
    }

    /// Mandatory waypoints for a trip, from the first matching rule.
    pub fn waypoints_for(&self, from: &Location, to: &Location) -> Option<Vec<String>> {
        if from.id == to.id {
            return None;
        }

        self.overrides.iter().find_map(|rule| {
            if rule.from.matches(from) && rule.to.matches(to) {
                Some(rule.via.clone())
            } else if rule.bidirectional && rule.from.matches(to) && rule.to.matches(from) {
                Some(rule.via.iter().rev().cloned().collect())
            } else {
                None
            }
        })
    }

    /// Check that every waypoint names a location in `graph`.
    pub fn validate(&self, graph: &dyn LocationGraph) -> Result<(), NavError> {
        for rule in &self.overrides {
            if let Some(missing) = rule.via.iter().find(|id| !graph.exists(id)) {
                return Err(NavError::InvalidLocation(missing.clone()));
            }
            if let LocationMatcher::Id(id) = &rule.from
                && !graph.exists(id)
            {
                return Err(NavError::InvalidLocation(id.clone()));
            }
            if let LocationMatcher::Id(id) = &rule.to
                && !graph.exists(id)
            {
                return Err(NavError::InvalidLocation(id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::graph::InMemoryGraph;

    fn room(id: &str, zone: &str) -> Location {
        Location::new(id, id, LocationType::Room, Position::new(0.0, 0.0)).in_zone(zone)
    }

    fn east_west_rule(bidirectional: bool) -> WaypointOverride {
        WaypointOverride {
            from: LocationMatcher::Zone("east".into()),
            to: LocationMatcher::Zone("west".into()),
            via: vec!["j1".into(), "j2".into()],
            bidirectional,
        }
    }

    #[test]
    fn test_matchers() {
        let loc = room("lab", "east");

        assert!(LocationMatcher::Any.matches(&loc));
        assert!(LocationMatcher::Id("lab".into()).matches(&loc));
        assert!(!LocationMatcher::Id("other".into()).matches(&loc));
        assert!(LocationMatcher::Zone("east".into()).matches(&loc));
        assert!(!LocationMatcher::Zone("west".into()).matches(&loc));
        assert!(LocationMatcher::Type(LocationType::Room).matches(&loc));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let policy = RoutingPolicy::new(vec![
            east_west_rule(false),
            WaypointOverride {
                from: LocationMatcher::Any,
                to: LocationMatcher::Any,
                via: vec!["fallback".into()],
                bidirectional: false,
            },
        ]);

        let via = policy.waypoints_for(&room("e", "east"), &room("w", "west"));
        assert_eq!(via, Some(vec!["j1".to_string(), "j2".to_string()]));

        let via = policy.waypoints_for(&room("w", "west"), &room("e", "east"));
        assert_eq!(via, Some(vec!["fallback".to_string()]));
    }

    #[test]
    fn test_bidirectional_reverses_waypoints() {
        let policy = RoutingPolicy::new(vec![east_west_rule(true)]);

        let via = policy.waypoints_for(&room("w", "west"), &room("e", "east"));
        assert_eq!(via, Some(vec!["j2".to_string(), "j1".to_string()]));
    }

    #[test]
    fn test_no_rule_for_same_location() {
        let policy = RoutingPolicy::new(vec![WaypointOverride {
            from: LocationMatcher::Any,
            to: LocationMatcher::Any,
            via: vec!["j1".into()],
            bidirectional: false,
        }]);

        let loc = room("a", "east");
        assert!(policy.waypoints_for(&loc, &loc).is_none());
    }

    #[test]
    fn test_validate() {
        let graph = InMemoryGraph::new(vec![room("j1", "core")]).unwrap();

        let policy = RoutingPolicy::new(vec![east_west_rule(false)]);
        assert_eq!(
            policy.validate(&graph),
            Err(NavError::InvalidLocation("j2".into()))
        );

        let policy = RoutingPolicy::new(vec![WaypointOverride {
            from: LocationMatcher::Id("j1".into()),
            to: LocationMatcher::Any,
            via: vec!["j1".into()],
            bidirectional: false,
        }]);
        assert!(policy.validate(&graph).is_ok());
    }
}
