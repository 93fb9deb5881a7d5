//! Kinematic model used to turn run distances into travel times
//!
//! A transport leaves every rest point (path start, stop, teleport) from
//! standstill and accelerates at a constant rate up to its cruise speed. A run
//! that ends at a stop brakes into it at the same rate. When a run is too short
//! to reach cruise speed the profile becomes triangular. A non-positive
//! acceleration means the transport reaches cruise speed instantly.

/// Trapezoidal velocity profile for one transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityProfile {
    speed: f64,
    accel: f64,
    accel_time: f64,
    accel_dist: f64,
}

impl VelocityProfile {
    /// Create a profile for cruise `speed` (yd/s) and `accel_rate` (yd/s²)
    pub fn new(speed: f32, accel_rate: f32) -> Self {
        let speed = f64::from(speed);
        let accel = f64::from(accel_rate);

        if accel > 0.0 && accel.is_finite() {
            Self {
                speed,
                accel,
                accel_time: speed / accel,
                accel_dist: 0.5 * speed * speed / accel,
            }
        } else {
            Self {
                speed,
                accel: 0.0,
                accel_time: 0.0,
                accel_dist: 0.0,
            }
        }
    }

    /// Cruise speed (yards per second)
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Seconds needed to reach cruise speed from rest
    pub fn accel_time(&self) -> f64 {
        self.accel_time
    }

    /// Yards covered while reaching cruise speed from rest
    pub fn accel_dist(&self) -> f64 {
        self.accel_dist
    }

    fn is_instant(&self) -> bool {
        self.accel <= 0.0
    }

    /// Whether a braking run of `run_length` is too short to reach cruise speed
    fn is_triangular(&self, run_length: f64, brakes: bool) -> bool {
        brakes && run_length < 2.0 * self.accel_dist
    }

    /// Seconds needed for a whole run of `run_length` yards
    pub fn run_time(&self, run_length: f64, brakes: bool) -> f64 {
        self.time_at_distance(run_length, run_length, brakes)
    }

    /// Seconds after departure at which `distance` yards of the run are covered
    pub fn time_at_distance(&self, distance: f64, run_length: f64, brakes: bool) -> f64 {
        let run_length = run_length.max(0.0);
        let s = distance.clamp(0.0, run_length);

        if self.is_instant() {
            return s / self.speed;
        }

        let a = self.accel;
        if self.is_triangular(run_length, brakes) {
            if s <= run_length * 0.5 {
                return (2.0 * s / a).sqrt();
            }
            return 2.0 * (run_length / a).sqrt() - (2.0 * (run_length - s) / a).sqrt();
        }

        if s <= self.accel_dist {
            return (2.0 * s / a).sqrt();
        }

        if brakes && s > run_length - self.accel_dist {
            let total = 2.0 * self.accel_time + (run_length - 2.0 * self.accel_dist) / self.speed;
            return total - (2.0 * (run_length - s) / a).sqrt();
        }

        self.accel_time + (s - self.accel_dist) / self.speed
    }

    /// Yards of the run covered `time` seconds after departure
    pub fn distance_at_time(&self, time: f64, run_length: f64, brakes: bool) -> f64 {
        let run_length = run_length.max(0.0);
        let total = self.run_time(run_length, brakes);
        let t = time.clamp(0.0, total);

        if self.is_instant() {
            return (self.speed * t).min(run_length);
        }

        let a = self.accel;
        let distance = if self.is_triangular(run_length, brakes) {
            let half = (run_length / a).sqrt();
            if t <= half {
                0.5 * a * t * t
            } else {
                let remaining = 2.0 * half - t;
                run_length - 0.5 * a * remaining * remaining
            }
        } else if t <= self.accel_time {
            0.5 * a * t * t
        } else if brakes && t > total - self.accel_time {
            let remaining = total - t;
            run_length - 0.5 * a * remaining * remaining
        } else {
            self.accel_dist + self.speed * (t - self.accel_time)
        };

        distance.clamp(0.0, run_length)
    }
}
