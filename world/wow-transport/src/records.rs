//! Raw rows supplied by the data-loading layer
//!
//! These mirror the client database tables a transport is assembled from:
//! `TaxiPathNode` for the route, the transport game object template for
//! speed settings, `Map` for instance information, and
//! `TransportAnimation`/`TransportRotation` for the sparse visual tracks.

use glam::{Quat, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Per-node action flags from `TaxiPathNode`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct PathNodeFlags: u32 {
        /// The transport jumps from this node to the next one
        const TELEPORT = 0x1;
        /// The transport comes to rest at this node for `delay` milliseconds
        const STOP = 0x2;
    }
}

/// One waypoint of a taxi path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TaxiPathNode {
    /// Taxi path this node belongs to
    pub path_id: u32,
    /// Position of the node within its path
    pub index: u32,
    /// Map the node lies on
    pub map_id: u32,
    /// World position
    pub position: Vec3,
    /// Action flags
    pub flags: PathNodeFlags,
    /// Time spent stopped at this node (milliseconds)
    pub delay: u32,
    /// Game event fired on arrival (0 = none)
    pub arrival_event_id: u32,
    /// Game event fired on departure (0 = none)
    pub departure_event_id: u32,
}

impl TaxiPathNode {
    /// Create a plain travel node
    pub fn new(path_id: u32, index: u32, map_id: u32, position: Vec3) -> Self {
        Self {
            path_id,
            index,
            map_id,
            position,
            flags: PathNodeFlags::empty(),
            delay: 0,
            arrival_event_id: 0,
            departure_event_id: 0,
        }
    }

    /// Turn this node into a stop of `delay_ms` milliseconds
    pub fn with_stop(mut self, delay_ms: u32) -> Self {
        self.flags |= PathNodeFlags::STOP;
        self.delay = delay_ms;
        self
    }

    /// Mark the hop from this node to the next as a teleport
    pub fn with_teleport(mut self) -> Self {
        self.flags |= PathNodeFlags::TELEPORT;
        self
    }

    /// Whether the transport rests at this node
    pub fn is_stop(&self) -> bool {
        self.flags.contains(PathNodeFlags::STOP)
    }

    /// Whether the transport jumps away from this node
    pub fn is_teleport(&self) -> bool {
        self.flags.contains(PathNodeFlags::TELEPORT)
    }
}

/// Transport game object definition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TransportInfo {
    /// Game object entry
    pub entry: u32,
    /// Display name, only used for diagnostics
    pub name: String,
    /// Taxi path followed by the transport
    pub path_id: u32,
    /// Cruise speed override (yards per second)
    pub move_speed: Option<f32>,
    /// Acceleration override (yards per second squared)
    pub accel_rate: Option<f32>,
}

impl TransportInfo {
    /// Create a definition that uses the configured speed defaults
    pub fn new(entry: u32, name: impl Into<String>, path_id: u32) -> Self {
        Self {
            entry,
            name: name.into(),
            path_id,
            move_speed: None,
            accel_rate: None,
        }
    }
}

/// Map information needed to classify transport routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct MapEntry {
    /// Map id
    pub id: u32,
    /// Whether the map is a dungeon, raid or battleground
    pub instanceable: bool,
}

/// One sample of a transport's animation track
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TransportAnimationEntry {
    /// Row id
    pub id: u32,
    /// Game object entry the sample belongs to
    pub transport_entry: u32,
    /// Offset within the animation (milliseconds)
    pub time_index: u32,
    /// Position offset relative to the spawn point
    pub position: Vec3,
    /// Animation sequence played from this sample
    pub sequence_id: u32,
}

/// One sample of a transport's rotation track
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TransportRotationEntry {
    /// Row id
    pub id: u32,
    /// Game object entry the sample belongs to
    pub transport_entry: u32,
    /// Offset within the animation (milliseconds)
    pub time_index: u32,
    /// Orientation override
    pub rotation: Quat,
}
