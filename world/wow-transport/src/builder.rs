//! Keyframe generation from taxi path nodes
//!
//! A path is cut into runs: stretches travelled without coming to rest. Runs
//! end at stop nodes, before teleports and at the end of the path. Every run
//! with at least two distinct positions gets one spline, and the velocity
//! profile of the run turns spline distances into travel times.

use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use glam::Vec3;

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::keyframe::{KeyFrame, KeyFrameVec};
use crate::motion::VelocityProfile;
use crate::records::{TaxiPathNode, TransportInfo};
use crate::spline::{SplineId, TransportSpline};
use crate::template::{RunSpline, TransportTemplate};

/// Frames travelled between two rest points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: usize,
    end: usize,
    /// The run ends at a stop frame and brakes into it
    brakes: bool,
}

/// Build the keyframe timeline of one transport
///
/// `nodes` must be the transport's taxi path ordered by node index and
/// `is_instanceable` reports whether a map id is an instance map.
pub fn generate_waypoints<F>(
    info: &TransportInfo,
    nodes: &[TaxiPathNode],
    is_instanceable: F,
    config: &TransportConfig,
) -> Result<TransportTemplate>
where
    F: Fn(u32) -> bool,
{
    let entry = info.entry;
    if nodes.is_empty() {
        return Err(TransportError::NoWaypoints {
            entry,
            path_id: info.path_id,
        });
    }
    validate_nodes(entry, nodes)?;

    let speed = info.move_speed.unwrap_or(config.default_speed);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(TransportError::InvalidSpeed { entry, speed });
    }

    let mut accel = info.accel_rate.unwrap_or(config.default_accel_rate);
    if !accel.is_finite() || accel < 0.0 {
        log::warn!(
            "Transport {} has unusable acceleration {}, using instant acceleration",
            entry,
            accel
        );
        accel = 0.0;
    }
    let profile = VelocityProfile::new(speed, accel);

    let maps_used: BTreeSet<u32> = nodes.iter().map(|node| node.map_id).collect();
    let in_instance = maps_used.iter().any(|&map| is_instanceable(map));
    if in_instance && maps_used.len() > 1 {
        log::warn!(
            "Transport {} ({}) crosses {} maps including an instance map",
            entry,
            info.name,
            maps_used.len()
        );
    }

    let mut frames: KeyFrameVec = (0..nodes.len()).map(|i| KeyFrame::new(i, i)).collect();

    if nodes.len() > 1 {
        mark_teleports(&mut frames, nodes, config.teleport_distance);
        for (frame, node) in frames.iter_mut().zip(nodes) {
            if node.is_stop() {
                frame.stop_delay = Some(node.delay.max(config.min_stop_delay_ms));
            }
        }
    } else if nodes[0].is_stop() {
        log::debug!(
            "Transport {} has a single stop node, treating it as stationary",
            entry
        );
    }

    let mut splines = Vec::new();
    let mut time_to = vec![0.0_f64; frames.len()];
    for run in split_runs(&frames) {
        build_run(
            run,
            nodes,
            &profile,
            config.spline_steps_per_segment,
            &mut frames,
            &mut splines,
            &mut time_to,
        );
    }

    // The wrap back to the first frame is a jump, so a final stop starts nothing
    if let Some(last) = frames.last_mut().filter(|f| f.is_stop_frame()) {
        last.dist_since_stop = Some(0.0);
        last.dist_until_stop = Some(0.0);
        last.time_from = 0.0;
    }

    assign_orientations(&mut frames, nodes);
    let path_time = assign_times(&mut frames, &time_to);

    log::debug!(
        "Generated transport {} ({}): {} frames, {} splines, path time {} ms",
        entry,
        info.name,
        frames.len(),
        splines.len(),
        path_time
    );

    Ok(TransportTemplate {
        entry,
        name: info.name.clone(),
        key_frames: frames,
        nodes: Arc::from(nodes),
        splines,
        maps_used,
        in_instance,
        path_time,
        move_speed: speed,
        accel_time: profile.accel_time() as f32,
        accel_dist: profile.accel_dist() as f32,
        profile,
        counter: AtomicU32::new(0),
    })
}

fn validate_nodes(entry: u32, nodes: &[TaxiPathNode]) -> Result<()> {
    for pair in nodes.windows(2) {
        if pair[1].index <= pair[0].index {
            return Err(TransportError::MalformedPath {
                entry,
                reason: format!(
                    "node index {} follows node index {}",
                    pair[1].index, pair[0].index
                ),
            });
        }
    }

    if let Some(node) = nodes.iter().find(|node| !node.position.is_finite()) {
        return Err(TransportError::MalformedPath {
            entry,
            reason: format!("node {} has a non-finite position", node.index),
        });
    }

    Ok(())
}

fn mark_teleports(frames: &mut [KeyFrame], nodes: &[TaxiPathNode], teleport_distance: f32) {
    for (i, pair) in nodes.windows(2).enumerate() {
        let (prev, node) = (&pair[0], &pair[1]);
        let gap = prev.position.distance(node.position);

        let teleport = prev.is_teleport()
            || prev.map_id != node.map_id
            || (!prev.is_stop() && gap > teleport_distance);

        if teleport {
            let frame = &mut frames[i + 1];
            frame.teleport = true;
            frame.dist_from_prev = Some(0.0);
        }
    }
}

fn split_runs(frames: &[KeyFrame]) -> Vec<Run> {
    let last = frames.len() - 1;
    let mut runs = Vec::new();
    let mut start = 0;

    for (i, frame) in frames.iter().enumerate().skip(1) {
        if frame.teleport {
            runs.push(Run {
                start,
                end: i - 1,
                brakes: false,
            });
            start = i;
        }
        if frame.is_stop_frame() && i != last && start < i {
            runs.push(Run {
                start,
                end: i,
                brakes: true,
            });
            start = i;
        }
    }

    runs.push(Run {
        start,
        end: last,
        brakes: last > start && frames[last].is_stop_frame(),
    });
    runs
}

fn build_run(
    run: Run,
    nodes: &[TaxiPathNode],
    profile: &VelocityProfile,
    steps: u32,
    frames: &mut [KeyFrame],
    splines: &mut Vec<RunSpline>,
    time_to: &mut [f64],
) {
    // Collapse repeated positions; each frame maps onto a control point
    let mut points: Vec<Vec3> = Vec::new();
    let mut control = Vec::with_capacity(run.end - run.start + 1);
    for node in &nodes[run.start..=run.end] {
        if points.last() != Some(&node.position) {
            points.push(node.position);
        }
        control.push(points.len() - 1);
    }

    let curve = TransportSpline::new(&points, steps);
    let cumulative: Vec<f64> = control
        .iter()
        .map(|&point| curve.as_ref().map_or(0.0, |c| c.length_to_node(point)))
        .collect();
    let length = cumulative.last().copied().unwrap_or(0.0);
    let times: Vec<f64> = cumulative
        .iter()
        .map(|&distance| profile.time_at_distance(distance, length, run.brakes))
        .collect();

    let id = curve.map(|curve| {
        splines.push(RunSpline {
            curve,
            first_frame: run.start,
            last_frame: run.end,
            ends_at_stop: run.brakes,
        });
        SplineId(splines.len() - 1)
    });

    for (offset, index) in (run.start..=run.end).enumerate() {
        let frame = &mut frames[index];
        frame.dist_since_stop = Some(cumulative[offset] as f32);
        frame.dist_until_stop = Some((length - cumulative[offset]) as f32);
        frame.time_from = times[offset] as f32;

        if offset > 0 {
            frame.dist_from_prev = Some((cumulative[offset] - cumulative[offset - 1]) as f32);
        }

        if index == run.end {
            continue;
        }

        if cumulative[offset + 1] > cumulative[offset] {
            frame.spline = id;
            frame.update = false;
            time_to[index] = times[offset + 1] - times[offset];
        } else {
            frame.spline = None;
            frame.update = true;
            time_to[index] = 0.0;
        }
        frame.time_to = time_to[index] as f32;
    }
}

fn assign_orientations(frames: &mut [KeyFrame], nodes: &[TaxiPathNode]) {
    let teleports: Vec<bool> = frames.iter().map(|frame| frame.teleport).collect();
    let mut heading = 0.0_f32;

    for (i, frame) in frames.iter_mut().enumerate() {
        let here = nodes[i].position;
        let behind = if i > 0 && !teleports[i] {
            nodes[i - 1].position
        } else {
            here
        };
        let ahead = match teleports.get(i + 1) {
            Some(false) => nodes[i + 1].position,
            _ => here,
        };

        let direction = ahead - behind;
        if direction.x.abs() > f32::EPSILON || direction.y.abs() > f32::EPSILON {
            heading = direction.y.atan2(direction.x).rem_euclid(TAU);
            if heading >= TAU {
                heading = 0.0;
            }
        }
        frame.initial_orientation = heading;
    }
}

/// Fill in absolute arrival and departure times, returning the cycle length
fn assign_times(frames: &mut [KeyFrame], time_to: &[f64]) -> u32 {
    let mut clock = 0.0_f64;
    for (frame, &leg) in frames.iter_mut().zip(time_to) {
        frame.arrive_time = clock.round() as u32;
        clock += f64::from(frame.stop_delay.unwrap_or(0));
        frame.departure_time = clock.round() as u32;
        clock += leg * 1000.0;
    }
    frames.last().map_or(0, |frame| frame.departure_time)
}
