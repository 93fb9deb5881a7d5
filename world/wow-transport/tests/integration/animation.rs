//! Animation and rotation track lookups

use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use test_case::test_case;
use wow_transport::{
    MemoryDataSource, TransportAnimationContainer, TransportAnimationEntry,
    TransportRotationEntry,
};

use super::init_logging;

fn animation_rows(entry: u32, times: &[u32]) -> Vec<TransportAnimationEntry> {
    times
        .iter()
        .map(|&time| TransportAnimationEntry {
            id: entry * 1000 + time / 100,
            transport_entry: entry,
            time_index: time,
            position: Vec3::new(time as f32, 0.0, 0.0),
            sequence_id: 1,
        })
        .collect()
}

fn container() -> TransportAnimationContainer {
    init_logging();
    let mut rows = animation_rows(190_549, &[0, 1000, 5000]);
    rows.extend(animation_rows(181_688, &[300, 12_000]));

    let mut source = MemoryDataSource::new();
    source.set_animation_entries(rows).set_rotation_entries(vec![
        TransportRotationEntry {
            id: 1,
            transport_entry: 190_549,
            time_index: 6000,
            rotation: Quat::from_rotation_z(0.5),
        },
        TransportRotationEntry {
            id: 2,
            transport_entry: 190_549,
            time_index: 2000,
            rotation: Quat::from_rotation_z(1.0),
        },
    ]);
    TransportAnimationContainer::load(&source)
}

#[test_case(4000, 1000, 5000 ; "between keys")]
#[test_case(0, 0, 1000 ; "on first key")]
#[test_case(1000, 1000, 5000 ; "on middle key")]
#[test_case(5500, 5000, 0 ; "after last key wraps")]
fn test_prev_next(time: u32, prev: u32, next: u32) {
    let container = container();
    let elevator = container.get(190_549).unwrap();

    assert_eq!(elevator.prev_anim_node(time).map(|s| s.time), Some(prev));
    assert_eq!(elevator.next_anim_node(time).map(|s| s.time), Some(next));
}

#[test]
fn test_samples_resolve_rows() {
    let container = container();
    let elevator = container.get(190_549).unwrap();

    let sample = elevator.prev_anim_node(4000).unwrap();
    assert_eq!(sample.entry.time_index, 1000);
    assert_eq!(sample.entry.position, Vec3::new(1000.0, 0.0, 0.0));

    let rotation = elevator.next_rotation(2500).unwrap();
    assert_eq!(rotation.entry.id, 1);
    assert_eq!(elevator.prev_rotation(1000).unwrap().entry.id, 1);
}

#[test]
fn test_total_time_is_largest_key() {
    let container = container();
    assert_eq!(container.get(190_549).unwrap().total_time, 6000);
    assert_eq!(container.get(181_688).unwrap().total_time, 12_000);
    assert_eq!(container.len(), 2);
}

#[test]
fn test_neighbour_property() {
    let container = container();
    let elevator = container.get(190_549).unwrap();
    let first_key = elevator.path.keys().next().unwrap();

    for time in 0..elevator.total_time {
        let prev = elevator.prev_anim_node(time).unwrap().time;
        let next = elevator.next_anim_node(time).unwrap().time;

        assert!(prev <= time);
        assert!(time < next || next == first_key, "t={time} next={next}");
    }
}

#[test]
fn test_missing_entry_and_empty_tracks() {
    let container = container();
    assert!(container.get(1).is_none());

    // Entry 181688 has animation samples but no rotations
    let ship = container.get(181_688).unwrap();
    assert!(ship.prev_rotation(0).is_none());
    assert!(ship.next_rotation(0).is_none());
    assert_eq!(ship.prev_anim_node(100).map(|s| s.time), Some(12_000));
}

#[test]
fn test_bad_row_index_ignored() {
    let mut container = container();
    container.add_path_node_to_transport(190_549, 9000, 999);
    container.add_path_rotation_to_transport(42, 100, 999);

    assert_eq!(container.get(190_549).unwrap().total_time, 6000);
    assert!(container.get(42).is_none());
}
