//! Location types.
//!
//! A [`Location`] is a node of the indoor graph. Positions are in meters in
//! a building-local frame, with `z` carrying elevation so that floor changes
//! show up in hop distances and in up/down instructions.

use serde::{Deserialize, Serialize};

/// Position of a location in the building frame (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate in meters.
    pub x: f32,
    /// Y coordinate in meters.
    pub y: f32,
    /// Elevation in meters.
    #[serde(default)]
    pub z: f32,
}

impl Position {
    /// Create a position on the ground floor.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Create a position with elevation.
    #[inline]
    pub fn with_z(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance from this position to the segment `a`-`b`.
    pub fn distance_to_segment(&self, a: &Position, b: &Position) -> f32 {
        let (abx, aby, abz) = (b.x - a.x, b.y - a.y, b.z - a.z);
        let len_sq = abx * abx + aby * aby + abz * abz;

        if len_sq < 1e-10 {
            // Degenerate segment
            return self.distance_to(a);
        }

        let t = (((self.x - a.x) * abx + (self.y - a.y) * aby + (self.z - a.z) * abz) / len_sq)
            .clamp(0.0, 1.0);
        let closest = Position::with_z(a.x + t * abx, a.y + t * aby, a.z + t * abz);
        self.distance_to(&closest)
    }
}

/// Kind of location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Room,
    Hallway,
    Entrance,
    Exit,
    Elevator,
    Stairs,
    Restroom,
    /// Waypoint-only node used for path continuity.
    Checkpoint,
}

impl LocationType {
    /// Whether this location moves the traveler between floors.
    pub fn is_vertical_connector(&self) -> bool {
        matches!(self, LocationType::Elevator | LocationType::Stairs)
    }

    /// Whether travelers can pick this location as a destination.
    pub fn is_destination(&self) -> bool {
        !matches!(self, LocationType::Checkpoint | LocationType::Hallway)
    }

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Room => "room",
            LocationType::Hallway => "hallway",
            LocationType::Entrance => "entrance",
            LocationType::Exit => "exit",
            LocationType::Elevator => "elevator",
            LocationType::Stairs => "stairs",
            LocationType::Restroom => "restroom",
            LocationType::Checkpoint => "checkpoint",
        }
    }
}

/// A named node of the indoor graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Location kind.
    #[serde(rename = "type")]
    pub location_type: LocationType,

    /// Position in the building frame.
    pub position: Position,

    /// Wing or area tag used by routing policy rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Ids of directly connected locations.
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl Location {
    /// Create a location without neighbors or zone.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location_type: LocationType,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location_type,
            position,
            zone: None,
            neighbors: Vec::new(),
        }
    }

    /// Set the zone tag.
    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Add neighbor ids.
    pub fn with_neighbors<I, S>(mut self, neighbors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.neighbors.extend(neighbors.into_iter().map(Into::into));
        self
    }

    /// Distance to another location.
    #[inline]
    pub fn distance_to(&self, other: &Location) -> f32 {
        self.position.distance_to(&other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);

        let up = Position::with_z(0.0, 0.0, 4.0);
        assert!((a.distance_to(&up) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);

        // Perpendicular foot inside the segment
        let p = Position::new(5.0, 3.0);
        assert!((p.distance_to_segment(&a, &b) - 3.0).abs() < 1e-6);

        // Beyond the end clamps to the endpoint
        let q = Position::new(13.0, 4.0);
        assert!((q.distance_to_segment(&a, &b) - 5.0).abs() < 1e-6);

        // Degenerate segment
        assert!((p.distance_to_segment(&a, &a) - a.distance_to(&p)).abs() < 1e-6);
    }

    #[test]
    fn test_location_type_flags() {
        assert!(LocationType::Elevator.is_vertical_connector());
        assert!(LocationType::Stairs.is_vertical_connector());
        assert!(!LocationType::Hallway.is_vertical_connector());
        assert!(!LocationType::Checkpoint.is_destination());
        assert!(LocationType::Room.is_destination());
    }

    #[test]
    fn test_location_deserialize() {
        let loc: Location = toml::from_str(
            r#"
            id = "lab-101"
            name = "Robotics Lab"
            type = "room"
            zone = "east"
            neighbors = ["hall-1"]
            position = { x = 1.0, y = 2.0 }
            "#,
        )
        .unwrap();

        assert_eq!(loc.id, "lab-101");
        assert_eq!(loc.location_type, LocationType::Room);
        assert_eq!(loc.zone.as_deref(), Some("east"));
        assert_eq!(loc.neighbors, vec!["hall-1".to_string()]);
        assert!((loc.position.z - 0.0).abs() < 1e-6);
    }
}
