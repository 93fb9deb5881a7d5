//! Precomputed transport cycles and their store

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;

use crate::builder::generate_waypoints;
use crate::config::TransportConfig;
use crate::keyframe::{KeyFrame, KeyFrameVec};
use crate::motion::VelocityProfile;
use crate::records::TaxiPathNode;
use crate::source::TransportDataSource;
use crate::spline::{SplineId, TransportSpline};

/// Spline covering one run of a transport path
#[derive(Debug, Clone, PartialEq)]
pub struct RunSpline {
    /// Curve through the run's distinct node positions
    pub curve: TransportSpline,
    /// Frame the run departs from
    pub first_frame: usize,
    /// Frame the run comes to rest at or jumps from
    pub last_frame: usize,
    /// The run brakes into a stop at `last_frame`
    pub ends_at_stop: bool,
}

/// Shared timing and geometry of every instance of one transport entry
#[derive(Debug)]
pub struct TransportTemplate {
    /// Game object entry
    pub entry: u32,
    /// Display name
    pub name: String,
    /// Timeline, one frame per path node
    pub key_frames: KeyFrameVec,
    /// Path nodes the frames were built from
    pub nodes: Arc<[TaxiPathNode]>,
    /// One spline per travelled run
    pub splines: Vec<RunSpline>,
    /// Every map the path touches
    pub maps_used: BTreeSet<u32>,
    /// The path visits an instance map
    pub in_instance: bool,
    /// Length of one cycle (milliseconds)
    pub path_time: u32,
    /// Cruise speed (yards per second)
    pub move_speed: f32,
    /// Seconds spent reaching cruise speed after a stop
    pub accel_time: f32,
    /// Yards covered reaching cruise speed after a stop
    pub accel_dist: f32,
    pub(crate) profile: VelocityProfile,
    pub(crate) counter: AtomicU32,
}

impl TransportTemplate {
    /// Fold an elapsed time into `[0, path_time)`
    pub fn normalize_time(&self, time: u32) -> u32 {
        if self.path_time == 0 {
            0
        } else {
            time % self.path_time
        }
    }

    /// Whether the transport never travels
    pub fn is_stationary(&self) -> bool {
        self.splines.is_empty()
    }

    /// Index of the frame whose window contains `time`
    ///
    /// The window of frame `i` runs from its arrival to the next frame's
    /// arrival. Frames sharing an arrival time resolve to the last of them.
    pub fn frame_index_at(&self, time: u32) -> usize {
        let time = self.normalize_time(time);
        self.key_frames
            .partition_point(|frame| frame.arrive_time <= time)
            .saturating_sub(1)
    }

    /// Frame containing `time`
    pub fn frame_at(&self, time: u32) -> Option<&KeyFrame> {
        self.key_frames.get(self.frame_index_at(time))
    }

    /// Index of the frame following `index`, wrapping to the first frame
    pub fn next_frame(&self, index: usize) -> usize {
        if self.key_frames.is_empty() {
            0
        } else {
            (index + 1) % self.key_frames.len()
        }
    }

    /// Spline by id
    pub fn spline(&self, id: SplineId) -> Option<&RunSpline> {
        self.splines.get(id.0)
    }

    /// Path node a frame was built from
    pub fn node(&self, frame: &KeyFrame) -> Option<&TaxiPathNode> {
        self.nodes.get(frame.node)
    }

    /// World position at `time` milliseconds into the cycle
    pub fn position_at(&self, time: u32) -> Option<Vec3> {
        let time = self.normalize_time(time);
        let frame = self.frame_at(time)?;
        let resting = self.node(frame)?.position;

        let Some(id) = frame.spline else {
            return Some(resting);
        };
        if time < frame.departure_time {
            return Some(resting);
        }

        let run = self.spline(id)?;
        let departed = self.key_frames.get(run.first_frame)?.departure_time;
        let elapsed = f64::from(time.saturating_sub(departed)) / 1000.0;
        let length = run.curve.length();
        let distance = self
            .profile
            .distance_at_time(elapsed, length, run.ends_at_stop);

        Some(run.curve.position_at_distance(distance))
    }

    /// Record a spawned instance, returning the new instance count
    pub fn register_instance(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of spawned instances using this template
    pub fn instance_count(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Outcome of a bulk template load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Templates generated and stored
    pub loaded: usize,
    /// Definitions skipped because generation failed
    pub skipped: usize,
}

/// Templates keyed by transport entry
#[derive(Debug, Default)]
pub struct TransportTemplateStore {
    templates: HashMap<u32, TransportTemplate>,
}

impl TransportTemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a template for every transport definition in `source`
    ///
    /// Definitions whose path cannot be generated are logged and left out.
    pub fn load<S>(source: &S, config: &TransportConfig) -> (Self, LoadSummary)
    where
        S: TransportDataSource + ?Sized,
    {
        let mut store = Self::new();
        let mut summary = LoadSummary::default();

        for info in source.transports() {
            let nodes = source.path_nodes(info.path_id);
            let is_instanceable =
                |map_id| source.map_entry(map_id).is_some_and(|map| map.instanceable);

            match generate_waypoints(info, nodes, is_instanceable, config) {
                Ok(template) => {
                    if store.insert(template).is_some() {
                        log::warn!(
                            "Transport {} is defined more than once, keeping the last definition",
                            info.entry
                        );
                    }
                    summary.loaded += 1;
                }
                Err(e) => {
                    log::warn!("Skipping transport {} ({}): {}", info.entry, info.name, e);
                    summary.skipped += 1;
                }
            }
        }

        (store, summary)
    }

    /// Template for `entry`
    pub fn get(&self, entry: u32) -> Option<&TransportTemplate> {
        self.templates.get(&entry)
    }

    /// Add a template, returning the one it replaced
    pub fn insert(&mut self, template: TransportTemplate) -> Option<TransportTemplate> {
        self.templates.insert(template.entry, template)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store holds no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over all templates in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &TransportTemplate> {
        self.templates.values()
    }
}
