//! Template generation across whole paths

use glam::Vec3;
use pretty_assertions::assert_eq;
use test_case::test_case;
use wow_transport::{
    MemoryDataSource, TaxiPathNode, TransportConfig, TransportInfo, TransportTemplate,
    TransportTemplateStore, generate_waypoints,
};

use super::{init_logging, path};

fn config() -> TransportConfig {
    TransportConfig {
        default_speed: 12.0,
        default_accel_rate: 2.0,
        ..TransportConfig::default()
    }
}

fn harbor_loop() -> Vec<TaxiPathNode> {
    let mut nodes = path(
        1,
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(80.0, 10.0, 0.0),
            Vec3::new(160.0, 60.0, 2.0),
            Vec3::new(200.0, 140.0, 2.0),
            Vec3::new(180.0, 220.0, 0.0),
            Vec3::new(100.0, 260.0, 0.0),
            Vec3::new(20.0, 240.0, 0.0),
        ],
    );
    nodes[3] = nodes[3].clone().with_stop(15_000);
    nodes[6] = nodes[6].clone().with_stop(20_000);
    nodes
}

fn dungeon_lift() -> Vec<TaxiPathNode> {
    let mut nodes = path(
        2,
        &[
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(10.0, 10.0, 40.0),
            Vec3::new(10.0, 10.0, 80.0),
        ],
    );
    nodes[0] = nodes[0].clone().with_stop(5000);
    nodes[3] = nodes[3].clone().with_stop(5000);
    nodes
}

fn two_continents() -> Vec<TaxiPathNode> {
    let mut nodes = path(
        3,
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(300.0, 0.0, 0.0),
            Vec3::new(600.0, 50.0, 0.0),
            Vec3::new(-4000.0, 900.0, 0.0),
            Vec3::new(-3700.0, 900.0, 0.0),
        ],
    );
    nodes[2] = nodes[2].clone().with_teleport();
    nodes[3].map_id = 1;
    nodes[4].map_id = 1;
    nodes
}

fn build(nodes: &[TaxiPathNode]) -> TransportTemplate {
    init_logging();
    let info = TransportInfo::new(500, "Test transport", nodes[0].path_id);
    generate_waypoints(&info, nodes, |_| false, &config()).unwrap()
}

#[test_case(harbor_loop() ; "harbor loop with two stops")]
#[test_case(dungeon_lift() ; "lift starting at a stop")]
#[test_case(two_continents() ; "teleport between maps")]
fn test_timeline_invariants(nodes: Vec<TaxiPathNode>) {
    let template = build(&nodes);
    let frames = &template.key_frames;

    assert_eq!(frames.len(), nodes.len());
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.index, i);
        assert!(frame.arrive_time <= frame.departure_time, "frame {i}");
        if frame.update {
            assert_eq!(frame.spline, None);
            assert_eq!(frame.time_to, 0.0);
        }
        if let Some(delay) = frame.stop_delay {
            assert_eq!(frame.departure_time - frame.arrive_time, delay);
        }
    }
    for pair in frames.windows(2) {
        assert!(pair[0].departure_time <= pair[1].arrive_time);
    }

    assert_eq!(
        template.path_time,
        frames.last().map(|f| f.departure_time).unwrap()
    );
}

#[test_case(harbor_loop() ; "harbor loop with two stops")]
#[test_case(dungeon_lift() ; "lift starting at a stop")]
#[test_case(two_continents() ; "teleport between maps")]
fn test_cycle_wraps(nodes: Vec<TaxiPathNode>) {
    let template = build(&nodes);

    assert_eq!(
        template.frame_index_at(template.path_time),
        template.frame_index_at(0)
    );
    assert_eq!(
        template.position_at(template.path_time),
        template.position_at(0)
    );
    assert_eq!(
        template.position_at(template.path_time + 1234),
        template.position_at(1234)
    );
}

#[test]
fn test_positions_stay_on_route() {
    let template = build(&harbor_loop());

    for time in (0..template.path_time).step_by(250) {
        let position = template.position_at(time).unwrap();
        let index = template.frame_index_at(time);
        let frame = &template.key_frames[index];
        let from = template.node(frame).unwrap().position;
        let to = template.key_frames[template.next_frame(index)].node;
        let to = template.nodes[to].position;

        // Catmull-Rom overshoot stays well inside the leg's bounding box
        let slack = from.distance(to) * 0.25 + 1.0;
        assert!(position.cmpge(from.min(to) - slack).all(), "t={time}");
        assert!(position.cmple(from.max(to) + slack).all(), "t={time}");
    }
}

#[test]
fn test_arc_length_distances() {
    let template = build(&harbor_loop());
    let frames = &template.key_frames;

    // First run: frames 0..=3, braking into the stop at frame 3
    let run = &template.splines[0];
    assert_eq!((run.first_frame, run.last_frame), (0, 3));
    assert!(run.ends_at_stop);

    let total: f32 = frames[1..=3].iter().filter_map(|f| f.dist_from_prev).sum();
    assert!((f64::from(total) - run.curve.length()).abs() < 1e-2);
    assert_eq!(frames[3].dist_since_stop, Some(0.0));
    assert!(frames[1].dist_until_stop.unwrap() > frames[2].dist_until_stop.unwrap());

    let chord = harbor_loop()[0].position.distance(harbor_loop()[1].position);
    assert!(frames[1].dist_from_prev.unwrap() >= chord - 1e-3);
}

#[test]
fn test_lift_starting_at_stop() {
    let template = build(&dungeon_lift());
    let frames = &template.key_frames;

    assert_eq!(frames[0].stop_delay, Some(5000));
    assert_eq!(frames[0].departure_time, 5000);
    assert!(frames[0].update);
    assert_eq!(frames[1].arrive_time, 5000);
    assert_eq!(template.splines.len(), 1);
    assert_eq!(frames[3].dist_since_stop, Some(0.0));
    assert_eq!(template.path_time, frames[3].arrive_time + 5000);
}

#[test]
fn test_teleport_between_maps() {
    let template = build(&two_continents());
    let frames = &template.key_frames;

    assert!(frames[3].teleport);
    assert_eq!(frames[3].dist_from_prev, Some(0.0));
    assert_eq!(frames[2].time_to, 0.0);
    assert_eq!(frames[2].spline, None);
    assert_eq!(frames[3].arrive_time, frames[2].departure_time);
    assert_eq!(template.maps_used.len(), 2);
    assert_eq!(template.splines.len(), 2);
}

#[test]
fn test_single_node() {
    let nodes = vec![TaxiPathNode::new(4, 0, 0, Vec3::new(5.0, 5.0, 5.0)).with_stop(10_000)];
    let template = build(&nodes);

    assert_eq!(template.path_time, 0);
    assert!(template.splines.is_empty());
    assert!(template.is_stationary());
    assert_eq!(template.key_frames.len(), 1);
    assert_eq!(template.position_at(777), Some(Vec3::new(5.0, 5.0, 5.0)));
}

#[test]
fn test_duplicate_nodes() {
    let nodes = path(5, &[Vec3::ONE, Vec3::ONE]);
    let template = build(&nodes);
    let frame = &template.key_frames[0];

    assert_eq!(frame.time_to, 0.0);
    assert_eq!(frame.spline, None);
    assert!(frame.update);
    assert!(template.splines.is_empty());
    assert_eq!(template.path_time, 0);
}

#[test]
fn test_loading_is_deterministic() {
    init_logging();
    let mut source = MemoryDataSource::new();
    source
        .add_transport(TransportInfo::new(1, "Harbor", 1))
        .add_transport(TransportInfo::new(2, "Lift", 2))
        .add_transport(TransportInfo::new(3, "Portal ship", 3))
        .add_path_nodes(harbor_loop())
        .add_path_nodes(dungeon_lift())
        .add_path_nodes(two_continents());

    let (first, _) = TransportTemplateStore::load(&source, &config());
    let (second, _) = TransportTemplateStore::load(&source, &config());

    for entry in 1..=3 {
        let a = first.get(entry).unwrap();
        let b = second.get(entry).unwrap();
        assert_eq!(a.path_time, b.path_time);
        assert_eq!(a.key_frames, b.key_frames);
        assert_eq!(a.splines, b.splines);
    }
}
