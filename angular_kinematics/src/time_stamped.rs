use crate::state::KinematicState;
use crate::time_point::TimePoint;
use crate::vector_triple::VectorTriple;
use nalgebra::Vector3;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use sim_value::SimValue;
use std::cmp::Ordering;

/// A [`KinematicState`] valid at a given time point.
///
/// Equality and ordering only look at the date.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: SimValue + Serialize, D: Serialize",
    deserialize = "T: SimValue + Deserialize<'de>, D: Deserialize<'de>"
))]
pub struct TimeStampedKinematicState<T = f64, D = f64> {
    pub(crate) date: D,
    pub(crate) state: KinematicState<T>,
}

impl<T: SimValue, D: TimePoint> TimeStampedKinematicState<T, D> {
    pub fn new(
        date: D,
        rotation: UnitQuaternion<T>,
        rate: Vector3<T>,
        acceleration: Vector3<T>,
    ) -> Self {
        Self::from_parts(date, KinematicState::new(rotation, rate, acceleration))
    }

    pub fn from_parts(date: D, state: KinematicState<T>) -> Self {
        Self { date, state }
    }

    pub fn date(&self) -> D {
        self.date
    }

    pub fn state(&self) -> &KinematicState<T> {
        &self.state
    }

    /// Moves both the date and the state by `dt` seconds.
    pub fn shifted_by(&self, dt: f64) -> Self {
        Self::from_parts(
            self.date.shifted_by(dt),
            self.state.shifted_by(dt),
        )
    }

    pub fn add_offset(&self, offset: &KinematicState<T>) -> Self {
        Self::from_parts(self.date, self.state.add_offset(offset))
    }

    pub fn subtract_offset(&self, offset: &KinematicState<T>) -> Self {
        Self::from_parts(self.date, self.state.subtract_offset(offset))
    }

    pub fn revert(&self) -> Self {
        Self::from_parts(self.date, self.state.revert())
    }

    pub fn apply_to(&self, triple: &VectorTriple<T>) -> VectorTriple<T> {
        self.state.apply_to(triple)
    }
}

impl<T, D: TimePoint> PartialEq for TimeStampedKinematicState<T, D> {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl<T, D: TimePoint> PartialOrd for TimeStampedKinematicState<T, D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.date
            .partial_cmp(&other.date)
    }
}
