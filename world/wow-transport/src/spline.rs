//! Catmull-Rom curves through transport path nodes
//!
//! Each curve passes through every control point. The first and last
//! segments use a reflected phantom point so that a straight, evenly spaced
//! run of nodes produces a straight curve travelled at constant speed.
//! Positions are addressed by arc length, measured from a sampled polyline
//! built once at construction.

use glam::{DVec3, Vec3};

/// Index of a spline within its template's spline table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SplineId(pub usize);

/// A uniform Catmull-Rom curve with an arc-length table
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSpline {
    /// Control points, padded with one phantom point at each end
    points: Vec<DVec3>,
    /// Cumulative sampled arc length, `steps` samples per segment
    arc: Vec<f64>,
    steps: usize,
}

impl TransportSpline {
    /// Build a curve through `nodes`
    ///
    /// Returns `None` for fewer than two control points. Consecutive duplicate
    /// points are expected to be collapsed by the caller.
    pub fn new(nodes: &[Vec3], steps_per_segment: u32) -> Option<Self> {
        if nodes.len() < 2 || steps_per_segment == 0 {
            return None;
        }

        let first = nodes[0].as_dvec3();
        let second = nodes[1].as_dvec3();
        let last = nodes[nodes.len() - 1].as_dvec3();
        let before_last = nodes[nodes.len() - 2].as_dvec3();

        let mut points = Vec::with_capacity(nodes.len() + 2);
        points.push(first * 2.0 - second);
        points.extend(nodes.iter().map(Vec3::as_dvec3));
        points.push(last * 2.0 - before_last);

        let steps = steps_per_segment as usize;
        let mut spline = Self {
            points,
            arc: Vec::new(),
            steps,
        };
        spline.arc = spline.sample_arc_lengths();
        Some(spline)
    }

    fn sample_arc_lengths(&self) -> Vec<f64> {
        let segments = self.segment_count();
        let mut arc = Vec::with_capacity(segments * self.steps + 1);
        let mut total = 0.0;
        arc.push(total);

        for segment in 0..segments {
            let mut previous = self.segment_point(segment, 0.0);
            for step in 1..=self.steps {
                let point = self.segment_point(segment, step as f64 / self.steps as f64);
                total += previous.distance(point);
                arc.push(total);
                previous = point;
            }
        }

        arc
    }

    /// Hermite form of the segment between control points `segment` and `segment + 1`
    fn segment_point(&self, segment: usize, t: f64) -> DVec3 {
        let p0 = self.points[segment];
        let p1 = self.points[segment + 1];
        let p2 = self.points[segment + 2];
        let p3 = self.points[segment + 3];

        let m1 = (p2 - p0) * 0.5;
        let m2 = (p3 - p1) * 0.5;

        let t2 = t * t;
        let t3 = t2 * t;

        p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
            + m1 * (t3 - 2.0 * t2 + t)
            + p2 * (-2.0 * t3 + 3.0 * t2)
            + m2 * (t3 - t2)
    }

    /// Number of control points the curve passes through
    pub fn node_count(&self) -> usize {
        self.points.len() - 2
    }

    /// Number of segments between control points
    pub fn segment_count(&self) -> usize {
        self.node_count() - 1
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.arc.last().copied().unwrap_or(0.0)
    }

    /// Arc length from the start of the curve to control point `node`
    ///
    /// Indices past the end clamp to the total length.
    pub fn length_to_node(&self, node: usize) -> f64 {
        self.arc
            .get(node * self.steps)
            .copied()
            .unwrap_or_else(|| self.length())
    }

    /// Arc length between two control points
    pub fn length_between(&self, from: usize, to: usize) -> f64 {
        self.length_to_node(to) - self.length_to_node(from)
    }

    /// Position of control point `node`
    pub fn node_position(&self, node: usize) -> Option<Vec3> {
        self.points.get(node + 1).map(DVec3::as_vec3)
    }

    /// Position at `distance` along the curve, clamped to `[0, length]`
    pub fn position_at_distance(&self, distance: f64) -> Vec3 {
        let distance = distance.clamp(0.0, self.length());

        let upper = self
            .arc
            .partition_point(|&length| length < distance)
            .clamp(1, self.arc.len() - 1);
        let lower = upper - 1;

        let span = self.arc[upper] - self.arc[lower];
        let fraction = if span > 0.0 {
            (distance - self.arc[lower]) / span
        } else {
            0.0
        };

        let segment = lower / self.steps;
        let local = (lower % self.steps) as f64 + fraction;
        self.segment_point(segment, local / self.steps as f64).as_vec3()
    }
}
