//! Timed waypoints of a transport cycle

use crate::spline::SplineId;

/// One timed waypoint, generated for every node of a transport's path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct KeyFrame {
    /// Position of the frame in the cycle
    pub index: usize,
    /// Index of the source node in the template's node table
    pub node: usize,
    /// Heading of the path through this frame (radians, `[0, 2π)`)
    pub initial_orientation: f32,
    /// Distance travelled since the current run departed
    pub dist_since_stop: Option<f32>,
    /// Distance left until the current run comes to rest
    pub dist_until_stop: Option<f32>,
    /// Distance travelled from the previous frame
    pub dist_from_prev: Option<f32>,
    /// Seconds since the current run departed when this frame is reached
    pub time_from: f32,
    /// Seconds spent travelling the outgoing leg
    pub time_to: f32,
    /// Frame is reached by an instantaneous jump
    pub teleport: bool,
    /// Outgoing leg has no length; the frame only updates position
    pub update: bool,
    /// Arrival at this frame (milliseconds into the cycle)
    pub arrive_time: u32,
    /// Departure from this frame (milliseconds into the cycle)
    pub departure_time: u32,
    /// Time spent at rest on stop frames (milliseconds)
    pub stop_delay: Option<u32>,
    /// Spline covering the outgoing leg
    pub spline: Option<SplineId>,
}

impl KeyFrame {
    pub(crate) fn new(index: usize, node: usize) -> Self {
        Self {
            index,
            node,
            initial_orientation: 0.0,
            dist_since_stop: None,
            dist_until_stop: None,
            dist_from_prev: None,
            time_from: 0.0,
            time_to: 0.0,
            teleport: false,
            update: false,
            arrive_time: 0,
            departure_time: 0,
            stop_delay: None,
            spline: None,
        }
    }

    /// Whether the transport rests at this frame
    pub fn is_stop_frame(&self) -> bool {
        self.stop_delay.is_some()
    }

    /// Milliseconds between arrival and departure
    pub fn dwell_time(&self) -> u32 {
        self.departure_time.saturating_sub(self.arrive_time)
    }

    /// Whether `time` (milliseconds, normalized) falls inside the stop window
    pub fn is_resting_at(&self, time: u32) -> bool {
        time >= self.arrive_time && time < self.departure_time
    }
}

/// Keyframes of one transport cycle, ordered by index
pub type KeyFrameVec = Vec<KeyFrame>;
