//! Error types for Marga

use thiserror::Error;

/// Navigation errors surfaced by the routing core.
///
/// These are returned as values from controller operations; the controller
/// additionally records them in the session as an `Error` state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// Unknown location id passed to an operation.
    #[error("Unknown location: {0}")]
    InvalidLocation(String),

    /// Both locations exist but no path connects them.
    #[error("No route from {from} to {to}")]
    Unreachable { from: String, to: String },

    /// Operation invoked in a state that does not allow it.
    #[error("Invalid session state: {0}")]
    SessionState(String),
}

impl NavError {
    /// Error category, used for the session error record.
    pub fn kind(&self) -> NavErrorKind {
        match self {
            NavError::InvalidLocation(_) => NavErrorKind::InvalidLocation,
            NavError::Unreachable { .. } => NavErrorKind::Unreachable,
            NavError::SessionState(_) => NavErrorKind::SessionState,
        }
    }
}

/// Category of a [`NavError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NavErrorKind {
    InvalidLocation,
    Unreachable,
    SessionState,
}

/// Location graph validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate location id: {0}")]
    DuplicateLocation(String),

    #[error("Location {location} lists unknown neighbor {neighbor}")]
    UnknownNeighbor { location: String, neighbor: String },

    #[error("Location {0} lists itself as a neighbor")]
    SelfLoop(String),

    #[error("Edge {from} -> {to} has no reverse edge")]
    AsymmetricEdge { from: String, to: String },
}

/// Top-level Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Navigation error: {0}")]
    Nav(#[from] NavError),

    #[error("Navigation thread unavailable: {0}")]
    Channel(String),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_error_kind() {
        assert_eq!(
            NavError::InvalidLocation("x".into()).kind(),
            NavErrorKind::InvalidLocation
        );
        assert_eq!(
            NavError::Unreachable {
                from: "a".into(),
                to: "b".into()
            }
            .kind(),
            NavErrorKind::Unreachable
        );
    }

    #[test]
    fn test_error_messages() {
        let err = NavError::Unreachable {
            from: "lobby".into(),
            to: "lab".into(),
        };
        assert_eq!(err.to_string(), "No route from lobby to lab");

        let err: MargaError = GraphError::SelfLoop("a".into()).into();
        assert!(err.to_string().contains("lists itself"));
    }
}
