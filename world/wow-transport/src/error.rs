//! Error types for transport path generation

use thiserror::Error;

/// Errors that can occur while building transport data
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// The transport's taxi path has no nodes
    #[error("Transport {entry} has no waypoints (taxi path {path_id})")]
    NoWaypoints {
        /// Game object entry of the transport
        entry: u32,
        /// Taxi path that was looked up
        path_id: u32,
    },

    /// Path nodes are out of order or carry unusable values
    #[error("Malformed path for transport {entry}: {reason}")]
    MalformedPath {
        /// Game object entry of the transport
        entry: u32,
        /// What was wrong with the path
        reason: String,
    },

    /// Movement speed is zero, negative or not finite
    #[error("Invalid move speed {speed} for transport {entry}")]
    InvalidSpeed {
        /// Game object entry of the transport
        entry: u32,
        /// The rejected speed
        speed: f32,
    },

    /// Configuration values are out of range
    #[error("Invalid transport configuration: {0}")]
    InvalidConfig(String),
}

/// Result type using `TransportError`
pub type Result<T> = std::result::Result<T, TransportError>;
