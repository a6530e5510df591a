use crate::state::KinematicState;
use crate::KinematicsErrors;
use nalgebra::Vector3;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use sim_value::SimValue;

/// Modified Rodrigues vector and its first two time derivatives, one row each.
pub type ModifiedRodrigues<T> = [[T; 3]; 3];

/// Branch of the modified Rodrigues vector.
///
/// `r = q'_v / (1 + q'_w)` with `q' = sign · q`. Each branch is singular for
/// one half turn, `-q` is always representable when `q` is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RodriguesSign {
    Positive,
    Negative,
}

impl RodriguesSign {
    pub fn opposite(&self) -> Self {
        match self {
            RodriguesSign::Positive => RodriguesSign::Negative,
            RodriguesSign::Negative => RodriguesSign::Positive,
        }
    }

    pub fn value<T: SimValue>(&self) -> T {
        match self {
            RodriguesSign::Positive => T::one(),
            RodriguesSign::Negative => -T::one(),
        }
    }

    /// Branch keeping `sign · w` non negative, where the vector is shortest.
    pub fn preferred_for<T: SimValue>(rotation: &UnitQuaternion<T>) -> Self {
        if rotation.0.w < T::zero() {
            RodriguesSign::Negative
        } else {
            RodriguesSign::Positive
        }
    }
}

impl<T: SimValue> KinematicState<T> {
    /// Modified Rodrigues vector on the `sign` branch with its first and second
    /// time derivatives: `[r, ṙ, r̈]`.
    ///
    /// Fails with [`KinematicsErrors::UnrepresentableRotation`] on the singular
    /// half turn of the branch, the opposite sign then succeeds.
    pub fn get_modified_rodrigues(
        &self,
        sign: RodriguesSign,
    ) -> Result<ModifiedRodrigues<T>, KinematicsErrors> {
        let one = T::one();
        let two = one + one;
        let half = T::from_f64(0.5);

        let q = self.rotation.0.scale(sign.value());
        let q_dot = (Quaternion::pure(&self.rate) * q).scale(half);
        let q_ddot = (Quaternion::pure(&self.acceleration) * q
            + Quaternion::pure(&self.rate) * q_dot)
            .scale(half);

        let denominator = one + q.w;
        if denominator.to_f64() <= f64::EPSILON {
            return Err(KinematicsErrors::UnrepresentableRotation(sign));
        }
        let inv = one / denominator;

        // r (1 + w) = v, differentiated twice
        let r = q.vector() * inv;
        let r_dot = (q_dot.vector() - r * q_dot.w) * inv;
        let r_ddot = (q_ddot.vector() - r_dot * (two * q_dot.w) - r * q_ddot.w) * inv;

        Ok([
            [r[0], r[1], r[2]],
            [r_dot[0], r_dot[1], r_dot[2]],
            [r_ddot[0], r_ddot[1], r_ddot[2]],
        ])
    }

    /// Inverse of [`KinematicState::get_modified_rodrigues`].
    ///
    /// `rows` holds `r` and optionally `ṙ` and `r̈`, missing derivatives are
    /// taken as zero.
    pub fn create_from_modified_rodrigues(rows: &[[T; 3]]) -> Result<Self, KinematicsErrors> {
        if rows.is_empty() || rows.len() > 3 {
            return Err(KinematicsErrors::DimensionMismatch { expected: 3, got: rows.len() });
        }
        let row = |i: usize| {
            rows.get(i)
                .map(|r| Vector3::new(r[0], r[1], r[2]))
                .unwrap_or_else(Vector3::zeros)
        };
        let (r, r_dot, r_ddot) = (row(0), row(1), row(2));

        let one = T::one();
        let two = one + one;

        // q = (k r, k - 1) with k = 2 / (1 + |r|²)
        let k = two / (one + r.dot(&r));
        let r_r_dot = r.dot(&r_dot);
        let k_dot = -(k * k * r_r_dot);
        let k_ddot =
            -(two * k * k_dot * r_r_dot) - k * k * (r_dot.dot(&r_dot) + r.dot(&r_ddot));

        let v = r * k;
        let v_dot = r * k_dot + r_dot * k;
        let v_ddot = r * k_ddot + r_dot * (two * k_dot) + r_ddot * k;

        let q = Quaternion::new(v[0], v[1], v[2], k - one);
        let q_dot = Quaternion::new(v_dot[0], v_dot[1], v_dot[2], k_dot);
        let q_ddot = Quaternion::new(v_ddot[0], v_ddot[1], v_ddot[2], k_ddot);

        // ω = 2 vec(q̇ ⊗ q*), α = 2 vec(q̈ ⊗ q*) since ω ⊗ ω is a pure scalar
        let rate = (q_dot * q.inv()).vector() * two;
        let acceleration = (q_ddot * q.inv()).vector() * two;

        Ok(Self::new(UnitQuaternion::new_unchecked(q), rate, acceleration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::Tolerances;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use sim_value::Dual;
    use std::f64::consts::PI;

    fn random_vector(rng: &mut SmallRng, scale: f64) -> Vector3<f64> {
        Vector3::new(
            rng.random_range(-scale..scale),
            rng.random_range(-scale..scale),
            rng.random_range(-scale..scale),
        )
    }

    #[test]
    fn test_round_trip() {
        let mut rng = SmallRng::seed_from_u64(31);
        for _ in 0..200 {
            let state = KinematicState::new(
                UnitQuaternion::rand(&mut rng).unwrap(),
                random_vector(&mut rng, 0.1),
                random_vector(&mut rng, 0.01),
            );
            let sign = RodriguesSign::preferred_for(&state.rotation());
            let rows = state
                .get_modified_rodrigues(sign)
                .unwrap();
            let back = KinematicState::create_from_modified_rodrigues(&rows).unwrap();
            let (angle, rate, acceleration) = state.distances(&back);
            assert!(angle < 1e-14, "angle {angle}");
            assert!(rate < 1e-15, "rate {rate}");
            assert!(acceleration < 1e-15, "acceleration {acceleration}");

            // the other branch works too, away from its singular half turn
            let w = state.rotation().0.w * sign.opposite().value::<f64>();
            if 1.0 + w > 0.05 {
                let rows = state
                    .get_modified_rodrigues(sign.opposite())
                    .unwrap();
                let back = KinematicState::create_from_modified_rodrigues(&rows).unwrap();
                assert!(back.is_close(&state, &Tolerances::uniform(1e-12)));
            }
        }
    }

    #[test]
    fn test_identity_is_exactly_zero() {
        let rows = KinematicState::<f64>::identity()
            .get_modified_rodrigues(RodriguesSign::Positive)
            .unwrap();
        for row in rows {
            for c in row {
                assert_eq!(c, 0.0);
            }
        }
        let back = KinematicState::create_from_modified_rodrigues(&rows).unwrap();
        assert_eq!(back.rotation().0, Quaternion::IDENTITY);
        assert_eq!(back.rate(), Vector3::zeros());
        assert_eq!(back.acceleration(), Vector3::zeros());
    }

    #[test]
    fn test_vector_is_tan_quarter_angle() {
        let angle: f64 = 1.3;
        let axis = Vector3::new(2.0, -1.0, 0.5).normalize();
        let state = KinematicState::from_rotation(UnitQuaternion::from_rotation_vector(
            &(axis * angle),
        ));
        let rows = state
            .get_modified_rodrigues(RodriguesSign::Positive)
            .unwrap();
        let r = Vector3::from(rows[0]);
        assert_abs_diff_eq!((r - axis * (angle / 4.0).tan()).norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_singular_branch() {
        // a full turn maps to w = -1 on the positive branch
        let axis = Vector3::new(0.0, 3.0, 4.0).normalize();
        let state = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&(axis * (2.0 * PI))),
            Vector3::new(0.1, 0.0, 0.0),
            Vector3::zeros(),
        );
        let result = state.get_modified_rodrigues(RodriguesSign::Positive);
        assert_eq!(
            result.unwrap_err(),
            KinematicsErrors::UnrepresentableRotation(RodriguesSign::Positive)
        );

        let sign = RodriguesSign::Positive.opposite();
        assert_eq!(sign, RodriguesSign::preferred_for(&state.rotation()));
        let rows = state
            .get_modified_rodrigues(sign)
            .unwrap();
        let back = KinematicState::create_from_modified_rodrigues(&rows).unwrap();
        assert!(back.is_close(&state, &Tolerances::uniform(1e-14)));
    }

    #[test]
    fn test_reduced_orders() {
        let state = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(0.3, 0.2, -0.1)),
            Vector3::new(0.01, 0.02, 0.03),
            Vector3::new(0.001, -0.002, 0.0),
        );
        let rows = state
            .get_modified_rodrigues(RodriguesSign::Positive)
            .unwrap();

        let rotation_only = KinematicState::create_from_modified_rodrigues(&rows[..1]).unwrap();
        let (angle, _, _) = rotation_only.distances(&state);
        assert_abs_diff_eq!(angle, 0.0, epsilon = 1e-15);
        assert_eq!(rotation_only.rate(), Vector3::zeros());
        assert_eq!(rotation_only.acceleration(), Vector3::zeros());

        let with_rate = KinematicState::create_from_modified_rodrigues(&rows[..2]).unwrap();
        assert_abs_diff_eq!((with_rate.rate() - state.rate()).norm(), 0.0, epsilon = 1e-15);

        assert_eq!(
            KinematicState::<f64>::create_from_modified_rodrigues(&[]).unwrap_err(),
            KinematicsErrors::DimensionMismatch { expected: 3, got: 0 }
        );
    }

    #[test]
    fn test_rate_is_time_derivative() {
        // propagate a jet in t through the forward transform and compare the
        // derivative of r(t) against the ṙ row
        let state = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(-0.4, 0.9, 0.2)),
            Vector3::new(0.3, -0.2, 0.5),
            Vector3::zeros(),
        );
        let lifted = KinematicState::<Dual<f64>>::from_real(&state);
        let t = Dual::variable(0.0);
        let evolution = UnitQuaternion::from_rotation_vector(&(lifted.rate() * t));
        let moving = KinematicState::from_rotation(evolution * lifted.rotation());
        let jet = moving
            .get_modified_rodrigues(RodriguesSign::Positive)
            .unwrap();
        let rows = state
            .get_modified_rodrigues(RodriguesSign::Positive)
            .unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(jet[0][i].value, rows[0][i], epsilon = 1e-15);
            assert_abs_diff_eq!(jet[0][i].derivative, rows[1][i], epsilon = 1e-15);
        }
    }
}
