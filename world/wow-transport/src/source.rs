//! Access to the raw rows owned by the data-loading layer

use std::collections::HashMap;
use std::sync::Arc;

use crate::records::{
    MapEntry, TaxiPathNode, TransportAnimationEntry, TransportInfo, TransportRotationEntry,
};

/// Read access to the tables transports are built from
///
/// Implemented by whatever loads the world database. Animation and rotation
/// rows are handed out as shared arenas so lookup tables can refer to them
/// by index for as long as they live.
pub trait TransportDataSource {
    /// All transport game object definitions
    fn transports(&self) -> &[TransportInfo];

    /// Nodes of a taxi path, ordered by node index (empty if unknown)
    fn path_nodes(&self, path_id: u32) -> &[TaxiPathNode];

    /// Map information for `map_id`
    fn map_entry(&self, map_id: u32) -> Option<&MapEntry>;

    /// Every transport animation row
    fn animation_entries(&self) -> Arc<[TransportAnimationEntry]>;

    /// Every transport rotation row
    fn rotation_entries(&self) -> Arc<[TransportRotationEntry]>;
}

/// In-memory rows, filled by a loader or by hand
#[derive(Debug, Clone)]
pub struct MemoryDataSource {
    transports: Vec<TransportInfo>,
    paths: HashMap<u32, Vec<TaxiPathNode>>,
    maps: HashMap<u32, MapEntry>,
    animations: Arc<[TransportAnimationEntry]>,
    rotations: Arc<[TransportRotationEntry]>,
}

impl Default for MemoryDataSource {
    fn default() -> Self {
        Self {
            transports: Vec::new(),
            paths: HashMap::new(),
            maps: HashMap::new(),
            animations: Arc::from(Vec::new()),
            rotations: Arc::from(Vec::new()),
        }
    }
}

impl MemoryDataSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transport definition
    pub fn add_transport(&mut self, info: TransportInfo) -> &mut Self {
        self.transports.push(info);
        self
    }

    /// Add a path node, keeping each path ordered by node index
    pub fn add_path_node(&mut self, node: TaxiPathNode) -> &mut Self {
        let nodes = self.paths.entry(node.path_id).or_default();
        let at = nodes.partition_point(|n| n.index <= node.index);
        nodes.insert(at, node);
        self
    }

    /// Add several path nodes
    pub fn add_path_nodes(&mut self, nodes: impl IntoIterator<Item = TaxiPathNode>) -> &mut Self {
        for node in nodes {
            self.add_path_node(node);
        }
        self
    }

    /// Add map information
    pub fn add_map(&mut self, map: MapEntry) -> &mut Self {
        self.maps.insert(map.id, map);
        self
    }

    /// Replace the animation rows
    pub fn set_animation_entries(&mut self, rows: Vec<TransportAnimationEntry>) -> &mut Self {
        self.animations = Arc::from(rows);
        self
    }

    /// Replace the rotation rows
    pub fn set_rotation_entries(&mut self, rows: Vec<TransportRotationEntry>) -> &mut Self {
        self.rotations = Arc::from(rows);
        self
    }
}

impl TransportDataSource for MemoryDataSource {
    fn transports(&self) -> &[TransportInfo] {
        &self.transports
    }

    fn path_nodes(&self, path_id: u32) -> &[TaxiPathNode] {
        self.paths.get(&path_id).map_or(&[], Vec::as_slice)
    }

    fn map_entry(&self, map_id: u32) -> Option<&MapEntry> {
        self.maps.get(&map_id)
    }

    fn animation_entries(&self) -> Arc<[TransportAnimationEntry]> {
        Arc::clone(&self.animations)
    }

    fn rotation_entries(&self) -> Arc<[TransportRotationEntry]> {
        Arc::clone(&self.rotations)
    }
}
