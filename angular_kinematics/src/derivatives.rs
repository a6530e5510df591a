use crate::state::KinematicState;
use crate::KinematicsErrors;
use nalgebra::Vector3;
use rotations::prelude::*;
use sim_value::{Dual, Dual2, SimValue};

/// A rotation as an explicit function of time, the quaternion components
/// carrying none, one or two time derivatives.
#[derive(Clone, Copy, Debug)]
pub enum DerivativeRotation<T = f64> {
    Order0(UnitQuaternion<T>),
    Order1(UnitQuaternion<Dual<T>>),
    Order2(UnitQuaternion<Dual2<T>>),
}

impl<T: SimValue> DerivativeRotation<T> {
    pub fn order(&self) -> usize {
        match self {
            DerivativeRotation::Order0(_) => 0,
            DerivativeRotation::Order1(_) => 1,
            DerivativeRotation::Order2(_) => 2,
        }
    }

    /// Same rotation with `order` derivatives, dropping the extra ones or
    /// padding the missing ones with zero.
    pub fn with_order(&self, order: usize) -> Result<Self, KinematicsErrors> {
        KinematicState::from_derivative_rotation(self).to_derivative_rotation(order)
    }

    /// The rotation itself, derivatives dropped.
    pub fn rotation(&self) -> UnitQuaternion<T> {
        KinematicState::from_derivative_rotation(self).rotation
    }
}

impl<T: SimValue> KinematicState<T> {
    fn quaternion_derivatives(&self) -> (Quaternion<T>, Quaternion<T>, Quaternion<T>) {
        let half = T::from_f64(0.5);
        let q = self.rotation.0;
        let q_dot = (Quaternion::pure(&self.rate) * q).scale(half);
        let q_ddot = (Quaternion::pure(&self.acceleration) * q
            + Quaternion::pure(&self.rate) * q_dot)
            .scale(half);
        (q, q_dot, q_ddot)
    }

    pub fn to_derivative_rotation(
        &self,
        order: usize,
    ) -> Result<DerivativeRotation<T>, KinematicsErrors> {
        match order {
            0 => Ok(DerivativeRotation::Order0(self.rotation)),
            1 => Ok(DerivativeRotation::Order1(self.to_dual_rotation())),
            2 => Ok(DerivativeRotation::Order2(self.to_dual2_rotation())),
            _ => Err(KinematicsErrors::UnsupportedOrder(order)),
        }
    }

    /// q(t) to first order around the state's time, q̇ = ½ ω ⊗ q.
    pub fn to_dual_rotation(&self) -> UnitQuaternion<Dual<T>> {
        let (q, q_dot, _) = self.quaternion_derivatives();
        UnitQuaternion::new_unchecked(Quaternion::new(
            Dual::new(q.x, q_dot.x),
            Dual::new(q.y, q_dot.y),
            Dual::new(q.z, q_dot.z),
            Dual::new(q.w, q_dot.w),
        ))
    }

    /// q(t) to second order, q̈ = ½ (α ⊗ q + ω ⊗ q̇).
    pub fn to_dual2_rotation(&self) -> UnitQuaternion<Dual2<T>> {
        let (q, q_dot, q_ddot) = self.quaternion_derivatives();
        UnitQuaternion::new_unchecked(Quaternion::new(
            Dual2::new(q.x, q_dot.x, q_ddot.x),
            Dual2::new(q.y, q_dot.y, q_ddot.y),
            Dual2::new(q.z, q_dot.z, q_ddot.z),
            Dual2::new(q.w, q_dot.w, q_ddot.w),
        ))
    }

    /// Reads the rate off a first order rotation, the acceleration is zero.
    pub fn from_dual_rotation(rotation: &UnitQuaternion<Dual<T>>) -> Self {
        let r = rotation.0;
        let q = Quaternion::new(r.x.value, r.y.value, r.z.value, r.w.value);
        let q_dot = Quaternion::new(
            r.x.derivative,
            r.y.derivative,
            r.z.derivative,
            r.w.derivative,
        );
        let two = T::one() + T::one();
        Self::new(
            UnitQuaternion::new_unchecked(q),
            (q_dot * q.inv()).vector() * two,
            Vector3::zeros(),
        )
    }

    pub fn from_dual2_rotation(rotation: &UnitQuaternion<Dual2<T>>) -> Self {
        let r = rotation.0;
        let q = Quaternion::new(r.x.value, r.y.value, r.z.value, r.w.value);
        let q_dot = Quaternion::new(r.x.first, r.y.first, r.z.first, r.w.first);
        let q_ddot = Quaternion::new(r.x.second, r.y.second, r.z.second, r.w.second);
        // ω ⊗ ω has no vector part, so α = 2 vec(q̈ ⊗ q*)
        let two = T::one() + T::one();
        Self::new(
            UnitQuaternion::new_unchecked(q),
            (q_dot * q.inv()).vector() * two,
            (q_ddot * q.inv()).vector() * two,
        )
    }

    pub fn from_derivative_rotation(rotation: &DerivativeRotation<T>) -> Self {
        match rotation {
            DerivativeRotation::Order0(q) => Self::from_rotation(*q),
            DerivativeRotation::Order1(q) => Self::from_dual_rotation(q),
            DerivativeRotation::Order2(q) => Self::from_dual2_rotation(q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::Tolerances;
    use approx::assert_abs_diff_eq;

    fn state() -> KinematicState {
        KinematicState::new(
            UnitQuaternion::new(0.3, -0.1, 0.5, 0.8).unwrap(),
            Vector3::new(0.02, -0.03, 0.01),
            Vector3::new(1e-3, 2e-3, -5e-4),
        )
    }

    #[test]
    fn test_round_trips() {
        let state = state();
        let tol = Tolerances::uniform(1e-15);

        let dual2 = state.to_dual2_rotation();
        assert!(KinematicState::from_dual2_rotation(&dual2).is_close(&state, &tol));

        let dual = KinematicState::from_dual_rotation(&state.to_dual_rotation());
        let expected = KinematicState::new(state.rotation(), state.rate(), Vector3::zeros());
        assert!(dual.is_close(&expected, &tol));
    }

    #[test]
    fn test_orders() {
        let state = state();
        for order in 0..3 {
            let rotation = state
                .to_derivative_rotation(order)
                .unwrap();
            assert_eq!(rotation.order(), order);
            let back = KinematicState::from_derivative_rotation(&rotation);
            let (angle, rate, acceleration) = back.distances(&state);
            assert!(angle < 1e-15);
            if order >= 1 {
                assert!(rate < 1e-15);
            } else {
                assert_eq!(back.rate(), Vector3::zeros());
            }
            if order == 2 {
                assert!(acceleration < 1e-15);
            } else {
                assert_eq!(back.acceleration(), Vector3::zeros());
            }
        }
        assert_eq!(
            state
                .to_derivative_rotation(3)
                .unwrap_err(),
            KinematicsErrors::UnsupportedOrder(3)
        );
    }

    #[test]
    fn test_with_order() {
        let state = state();
        let full = state
            .to_derivative_rotation(2)
            .unwrap();
        let truncated = full
            .with_order(1)
            .unwrap();
        assert_eq!(truncated.order(), 1);
        let back = KinematicState::from_derivative_rotation(&truncated);
        assert_abs_diff_eq!((back.rate() - state.rate()).norm(), 0.0, epsilon = 1e-15);
        assert_eq!(back.acceleration(), Vector3::zeros());

        // padded derivatives are zero
        let padded = DerivativeRotation::Order0(state.rotation())
            .with_order(2)
            .unwrap();
        let back = KinematicState::from_derivative_rotation(&padded);
        assert!(back.is_close(
            &KinematicState::from_rotation(state.rotation()),
            &Tolerances::uniform(1e-15)
        ));
        assert_abs_diff_eq!(
            padded
                .rotation()
                .angular_distance(&state.rotation()),
            0.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_dual2_rotation_stays_unit() {
        // |q(t)|² = 1 for all t, so its derivatives vanish
        let q = state().to_dual2_rotation().0;
        let norm = q.dot(&q);
        assert_abs_diff_eq!(norm.value, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(norm.first, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(norm.second, 0.0, epsilon = 1e-15);
    }
}
