use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use sim_value::{Dual2, SimValue};
use std::ops::{Add, Neg, Sub};

/// A vector with its first and second time derivatives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: SimValue + Serialize",
    deserialize = "T: SimValue + Deserialize<'de>"
))]
pub struct VectorTriple<T = f64> {
    pub position: Vector3<T>,
    pub velocity: Vector3<T>,
    pub acceleration: Vector3<T>,
}

impl<T: SimValue> PartialEq for VectorTriple<T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.velocity == other.velocity
            && self.acceleration == other.acceleration
    }
}

impl<T: SimValue> VectorTriple<T> {
    pub fn new(position: Vector3<T>, velocity: Vector3<T>, acceleration: Vector3<T>) -> Self {
        Self { position, velocity, acceleration }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros(), Vector3::zeros())
    }

    /// Fixed vector, zero derivatives.
    pub fn from_position(position: Vector3<T>) -> Self {
        Self::new(position, Vector3::zeros(), Vector3::zeros())
    }

    /// a·u + b·v, channel by channel.
    pub fn linear_combination(a: T, u: &Self, b: T, v: &Self) -> Self {
        Self::new(
            u.position * a + v.position * b,
            u.velocity * a + v.velocity * b,
            u.acceleration * a + v.acceleration * b,
        )
    }

    /// Second order Taylor expansion, the acceleration is kept constant.
    pub fn shifted_by(&self, dt: f64) -> Self {
        let dt = T::from_f64(dt);
        let half_dt2 = T::from_f64(0.5) * dt * dt;
        Self::new(
            self.position + self.velocity * dt + self.acceleration * half_dt2,
            self.velocity + self.acceleration * dt,
            self.acceleration,
        )
    }

    /// Position as an explicit function of time, each component carrying its
    /// first and second derivative.
    pub fn to_dual2_vector(&self) -> Vector3<Dual2<T>> {
        Vector3::from_fn(|i, _| {
            Dual2::new(
                self.position[i],
                self.velocity[i],
                self.acceleration[i],
            )
        })
    }

    pub fn from_dual2_vector(v: &Vector3<Dual2<T>>) -> Self {
        Self::new(
            v.map(|c| c.value),
            v.map(|c| c.first),
            v.map(|c| c.second),
        )
    }
}

impl<T: SimValue> Add for VectorTriple<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.position + rhs.position,
            self.velocity + rhs.velocity,
            self.acceleration + rhs.acceleration,
        )
    }
}

impl<T: SimValue> Sub for VectorTriple<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.position - rhs.position,
            self.velocity - rhs.velocity,
            self.acceleration - rhs.acceleration,
        )
    }
}

impl<T: SimValue> Neg for VectorTriple<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.position, -self.velocity, -self.acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    const TOL: f64 = 1e-14;

    fn sample() -> VectorTriple {
        VectorTriple::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-0.5, 0.1, 0.0),
            Vector3::new(0.2, 0.0, -0.4),
        )
    }

    #[test]
    fn test_taylor_shift() {
        let u = sample();
        let s = u.shifted_by(2.0);
        assert_abs_diff_eq!(s.position[0], 1.0 - 1.0 + 0.4, epsilon = TOL);
        assert_abs_diff_eq!(s.position[2], 3.0 - 0.8, epsilon = TOL);
        assert_abs_diff_eq!(s.velocity[0], -0.5 + 0.4, epsilon = TOL);
        assert_eq!(s.acceleration, u.acceleration);

        // constant acceleration makes the shift reversible
        let back = s.shifted_by(-2.0);
        assert_abs_diff_eq!((back.position - u.position).norm(), 0.0, epsilon = TOL);
    }

    #[test]
    fn test_linear_combination() {
        let u = sample();
        let c = VectorTriple::linear_combination(2.0, &u, -1.0, &u);
        assert_eq!(c, u);
        assert_eq!(u - u, VectorTriple::zero());
        assert_eq!(-u + u, VectorTriple::zero());
    }

    #[test]
    fn test_dual2_vector_carries_derivatives() {
        let u = sample();
        let d = u.to_dual2_vector();
        assert_eq!(d[1].value, 2.0);
        assert_eq!(d[1].first, 0.1);
        assert_eq!(d[2].second, -0.4);
        assert_eq!(VectorTriple::from_dual2_vector(&d), u);

        // |u(t)|² differentiated through the jet
        let n2 = d.dot(&d);
        let expected_first = 2.0 * u.position.dot(&u.velocity);
        let expected_second =
            2.0 * (u.velocity.dot(&u.velocity) + u.position.dot(&u.acceleration));
        assert_abs_diff_eq!(n2.first, expected_first, epsilon = TOL);
        assert_abs_diff_eq!(n2.second, expected_second, epsilon = TOL);
    }
}
