//! Sparse time-keyed animation and rotation tracks
//!
//! Samples are owned by shared arenas handed out by the data source. Each
//! track only stores `time -> arena index`, and lookups select the sample at
//! or before a time and the one strictly after it, wrapping around the cycle.
//! Blending between the two is left to the caller.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use crate::records::{TransportAnimationEntry, TransportRotationEntry};
use crate::source::TransportDataSource;

/// A sample selected from a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSample<'a, T> {
    /// Key of the sample (milliseconds)
    pub time: u32,
    /// The sample row
    pub entry: &'a T,
}

/// Time-keyed references into a shared arena of rows
#[derive(Debug, Clone)]
pub struct SampleTable<T> {
    arena: Arc<[T]>,
    keys: BTreeMap<u32, usize>,
}

impl<T> SampleTable<T> {
    /// Create an empty table over `arena`
    pub fn new(arena: Arc<[T]>) -> Self {
        Self {
            arena,
            keys: BTreeMap::new(),
        }
    }

    /// Key `time` to arena row `index`
    ///
    /// Returns `false` without inserting when `index` is outside the arena.
    /// A repeated key replaces the earlier row.
    pub fn insert(&mut self, time: u32, index: usize) -> bool {
        if index >= self.arena.len() {
            return false;
        }
        if let Some(previous) = self.keys.insert(time, index) {
            log::debug!(
                "Sample at {} ms replaced row {} with row {}",
                time,
                previous,
                index
            );
        }
        true
    }

    fn sample(&self, time: u32, index: usize) -> Option<TimedSample<'_, T>> {
        self.arena
            .get(index)
            .map(|entry| TimedSample { time, entry })
    }

    /// Sample with the greatest key `<= time`, wrapping to the last sample
    pub fn prev(&self, time: u32) -> Option<TimedSample<'_, T>> {
        let (&key, &index) = self
            .keys
            .range(..=time)
            .next_back()
            .or_else(|| self.keys.iter().next_back())?;
        self.sample(key, index)
    }

    /// Sample with the smallest key `> time`, wrapping to the first sample
    pub fn next(&self, time: u32) -> Option<TimedSample<'_, T>> {
        let (&key, &index) = self
            .keys
            .range((Bound::Excluded(time), Bound::Unbounded))
            .next()
            .or_else(|| self.keys.iter().next())?;
        self.sample(key, index)
    }

    /// Greatest key in the table
    pub fn last_key(&self) -> Option<u32> {
        self.keys.keys().next_back().copied()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.keys.keys().copied()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table has no samples
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Animation and rotation tracks of one transport entry
#[derive(Debug, Clone)]
pub struct TransportAnimation {
    /// Game object entry
    pub entry: u32,
    /// Position/sequence samples
    pub path: SampleTable<TransportAnimationEntry>,
    /// Rotation samples
    pub rotations: SampleTable<TransportRotationEntry>,
    /// Greatest key seen across both tracks (milliseconds)
    pub total_time: u32,
}

impl TransportAnimation {
    /// Create empty tracks over the given arenas
    pub fn new(
        entry: u32,
        animations: Arc<[TransportAnimationEntry]>,
        rotations: Arc<[TransportRotationEntry]>,
    ) -> Self {
        Self {
            entry,
            path: SampleTable::new(animations),
            rotations: SampleTable::new(rotations),
            total_time: 0,
        }
    }

    /// Add an animation sample
    pub fn add_path_node(&mut self, time: u32, index: usize) -> bool {
        let inserted = self.path.insert(time, index);
        if inserted {
            self.total_time = self.total_time.max(time);
        }
        inserted
    }

    /// Add a rotation sample
    pub fn add_rotation(&mut self, time: u32, index: usize) -> bool {
        let inserted = self.rotations.insert(time, index);
        if inserted {
            self.total_time = self.total_time.max(time);
        }
        inserted
    }

    /// Fold an elapsed time into the animation cycle
    pub fn normalize_time(&self, time: u32) -> u32 {
        if self.total_time == 0 {
            0
        } else {
            time % self.total_time
        }
    }

    /// Animation sample at or before `time`
    pub fn prev_anim_node(&self, time: u32) -> Option<TimedSample<'_, TransportAnimationEntry>> {
        self.path.prev(time)
    }

    /// Animation sample after `time`
    pub fn next_anim_node(&self, time: u32) -> Option<TimedSample<'_, TransportAnimationEntry>> {
        self.path.next(time)
    }

    /// Rotation sample at or before `time`
    pub fn prev_rotation(&self, time: u32) -> Option<TimedSample<'_, TransportRotationEntry>> {
        self.rotations.prev(time)
    }

    /// Rotation sample after `time`
    pub fn next_rotation(&self, time: u32) -> Option<TimedSample<'_, TransportRotationEntry>> {
        self.rotations.next(time)
    }
}

/// Animation tracks keyed by transport entry
#[derive(Debug, Clone)]
pub struct TransportAnimationContainer {
    animations: Arc<[TransportAnimationEntry]>,
    rotations: Arc<[TransportRotationEntry]>,
    by_entry: HashMap<u32, TransportAnimation>,
}

impl Default for TransportAnimationContainer {
    fn default() -> Self {
        Self::new(Arc::from(Vec::new()), Arc::from(Vec::new()))
    }
}

impl TransportAnimationContainer {
    /// Create an empty container over the given arenas
    pub fn new(
        animations: Arc<[TransportAnimationEntry]>,
        rotations: Arc<[TransportRotationEntry]>,
    ) -> Self {
        Self {
            animations,
            rotations,
            by_entry: HashMap::new(),
        }
    }

    /// Group every animation and rotation row of `source` by transport entry
    pub fn load<S>(source: &S) -> Self
    where
        S: TransportDataSource + ?Sized,
    {
        let animations = source.animation_entries();
        let rotations = source.rotation_entries();
        let mut container = Self::new(Arc::clone(&animations), Arc::clone(&rotations));

        for (index, row) in animations.iter().enumerate() {
            container.add_path_node_to_transport(row.transport_entry, row.time_index, index);
        }
        for (index, row) in rotations.iter().enumerate() {
            container.add_path_rotation_to_transport(row.transport_entry, row.time_index, index);
        }

        container
    }

    fn entry_mut(&mut self, entry: u32) -> &mut TransportAnimation {
        let animations = &self.animations;
        let rotations = &self.rotations;
        self.by_entry.entry(entry).or_insert_with(|| {
            TransportAnimation::new(entry, Arc::clone(animations), Arc::clone(rotations))
        })
    }

    /// Key animation row `index` to `time` in `entry`'s track
    pub fn add_path_node_to_transport(&mut self, entry: u32, time: u32, index: usize) {
        if index >= self.animations.len() {
            log::warn!(
                "Animation row {} for transport {} does not exist",
                index,
                entry
            );
            return;
        }
        self.entry_mut(entry).add_path_node(time, index);
    }

    /// Key rotation row `index` to `time` in `entry`'s track
    pub fn add_path_rotation_to_transport(&mut self, entry: u32, time: u32, index: usize) {
        if index >= self.rotations.len() {
            log::warn!(
                "Rotation row {} for transport {} does not exist",
                index,
                entry
            );
            return;
        }
        self.entry_mut(entry).add_rotation(time, index);
    }

    /// Tracks of `entry`
    pub fn get(&self, entry: u32) -> Option<&TransportAnimation> {
        self.by_entry.get(&entry)
    }

    /// Number of entries with at least one sample
    pub fn len(&self) -> usize {
        self.by_entry.len()
    }

    /// Whether no entry has samples
    pub fn is_empty(&self) -> bool {
        self.by_entry.is_empty()
    }
}
