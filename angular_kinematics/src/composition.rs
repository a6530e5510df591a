use crate::state::KinematicState;
use crate::KinematicsErrors;
use nalgebra::Vector3;
use rotations::prelude::*;
use sim_value::SimValue;

impl<T: SimValue> KinematicState<T> {
    /// Composes `self` (A to B) with `offset` (B to C) into the state of C
    /// relative to A.
    ///
    /// ω_AC = ω_BC + R_BC ω_AB
    /// α_AC = α_BC + R_BC α_AB - ω_BC × (R_BC ω_AB)
    ///
    /// Not commutative.
    pub fn add_offset(&self, offset: &KinematicState<T>) -> Self {
        let rate = offset
            .rotation
            .transform(&self.rate);
        let acceleration = offset
            .rotation
            .transform(&self.acceleration);
        Self::new(
            offset.rotation * self.rotation,
            offset.rate + rate,
            offset.acceleration + acceleration - offset.rate.cross(&rate),
        )
    }

    /// `self.add_offset(&offset.revert())`, undoes [`KinematicState::add_offset`].
    pub fn subtract_offset(&self, offset: &KinematicState<T>) -> Self {
        self.add_offset(&offset.revert())
    }

    /// Rotation part of [`KinematicState::shifted_by`].
    pub fn rotation_shifted_by(&self, dt: f64) -> UnitQuaternion<T> {
        let dt = T::from_f64(dt);
        let half = T::from_f64(0.5);
        let linear = UnitQuaternion::from_rotation_vector(&(self.rate * dt));
        let quadratic =
            UnitQuaternion::from_rotation_vector(&(self.acceleration * (half * dt * dt)));
        quadratic * linear * self.rotation
    }

    /// Propagates the state by `dt` seconds at constant angular acceleration.
    ///
    /// The rotation is exact for a constant rate and second order in `dt`
    /// otherwise. The acceleration is kept.
    pub fn shifted_by(&self, dt: f64) -> Self {
        Self::new(
            self.rotation_shifted_by(dt),
            self.rate + self.acceleration * T::from_f64(dt),
            self.acceleration,
        )
    }

    /// Constant rate turning `start` into `end` in `dt` seconds along the
    /// shortest path.
    ///
    /// Exact for a constant rate motion turning less than half a turn over `dt`.
    /// A zero `dt` is a [`KinematicsErrors::DuplicateSampleTime`].
    pub fn estimate_rate(
        start: &UnitQuaternion<T>,
        end: &UnitQuaternion<T>,
        dt: f64,
    ) -> Result<Vector3<T>, KinematicsErrors> {
        if dt == 0.0 {
            return Err(KinematicsErrors::DuplicateSampleTime);
        }
        let evolution = *end * start.inv();
        Ok(evolution.rotation_vector() / T::from_f64(dt))
    }
}
