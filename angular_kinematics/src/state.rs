use crate::tolerance::Tolerances;
use nalgebra::Vector3;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use sim_value::SimValue;

/// Orientation of a frame B relative to a frame A, together with its first and
/// second time derivatives.
///
/// `rotation` transforms vectors from A to B, `rate` is the angular velocity of
/// B with respect to A expressed in B, `acceleration` its time derivative.
/// The quaternion evolves as q̇ = ½ ω ⊗ q.
///
/// States are values, every operation returns a new state. There is no
/// component-wise equality since q and -q are the same rotation, compare with
/// [`KinematicState::is_close`] instead.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: SimValue + Serialize",
    deserialize = "T: SimValue + Deserialize<'de>"
))]
pub struct KinematicState<T = f64> {
    pub(crate) rotation: UnitQuaternion<T>,
    pub(crate) rate: Vector3<T>,
    pub(crate) acceleration: Vector3<T>,
}

impl<T: SimValue> Default for KinematicState<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: SimValue> KinematicState<T> {
    pub fn new(rotation: UnitQuaternion<T>, rate: Vector3<T>, acceleration: Vector3<T>) -> Self {
        Self { rotation, rate, acceleration }
    }

    /// Fixed rotation, zero rate and acceleration.
    pub fn from_rotation(rotation: UnitQuaternion<T>) -> Self {
        Self::new(rotation, Vector3::zeros(), Vector3::zeros())
    }

    pub fn identity() -> Self {
        Self::from_rotation(UnitQuaternion::identity())
    }

    pub fn rotation(&self) -> UnitQuaternion<T> {
        self.rotation
    }

    pub fn rate(&self) -> Vector3<T> {
        self.rate
    }

    pub fn acceleration(&self) -> Vector3<T> {
        self.acceleration
    }

    /// State of A relative to B.
    ///
    /// The rate and acceleration are brought back to A and negated, so that
    /// `state.add_offset(&state.revert())` is the identity.
    pub fn revert(&self) -> Self {
        Self::new(
            self.rotation.inv(),
            -self.rotation.rotate(&self.rate),
            -self.rotation.rotate(&self.acceleration),
        )
    }

    /// (angular distance, |Δrate|, |Δacceleration|) as plain reals.
    pub fn distances(&self, other: &Self) -> (f64, f64, f64) {
        let d_rate = self.rate - other.rate;
        let d_acceleration = self.acceleration - other.acceleration;
        (
            self.rotation
                .angular_distance(&other.rotation)
                .to_f64(),
            d_rate
                .dot(&d_rate)
                .sqrt()
                .to_f64(),
            d_acceleration
                .dot(&d_acceleration)
                .sqrt()
                .to_f64(),
        )
    }

    pub fn is_close(&self, other: &Self, tolerances: &Tolerances) -> bool {
        tolerances.check_error(self.distances(other))
    }

    /// Lifts a real state into the scalar field `T`, derivative parts zero.
    pub fn from_real(state: &KinematicState<f64>) -> Self {
        Self::new(
            UnitQuaternion::from_real(&state.rotation),
            state
                .rate
                .map(T::from_f64),
            state
                .acceleration
                .map(T::from_f64),
        )
    }

    /// Value parts only.
    pub fn to_real(&self) -> KinematicState<f64> {
        KinematicState::new(
            self.rotation.to_real(),
            self.rate.map(|c| c.to_f64()),
            self.acceleration
                .map(|c| c.to_f64()),
        )
    }
}
