use chrono::{NaiveDateTime, TimeDelta};
use std::fmt::Debug;

/// Time tag of a sample.
///
/// The kinematics only ever need signed durations in seconds between two
/// time points and shifting a time point by such a duration.
pub trait TimePoint: Copy + Debug + PartialEq + PartialOrd + Send + Sync {
    /// Seconds elapsed from `other` to `self`.
    fn duration_from(&self, other: &Self) -> f64;

    fn shifted_by(&self, dt: f64) -> Self;
}

/// Seconds on an arbitrary scale.
impl TimePoint for f64 {
    fn duration_from(&self, other: &Self) -> f64 {
        self - other
    }

    fn shifted_by(&self, dt: f64) -> Self {
        self + dt
    }
}

impl TimePoint for NaiveDateTime {
    fn duration_from(&self, other: &Self) -> f64 {
        let delta = self.signed_duration_since(*other);
        delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
    }

    fn shifted_by(&self, dt: f64) -> Self {
        *self + TimeDelta::nanoseconds((dt * 1e9).round() as i64)
    }
}
