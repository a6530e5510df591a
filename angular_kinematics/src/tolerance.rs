use serde::{Deserialize, Serialize};

/// Thresholds used to decide whether two kinematic states are the same.
///
/// `rotation` bounds the angular distance in radians, `rate` and `acceleration`
/// bound the norm of the vector differences.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub rotation: f64,
    pub rate: f64,
    pub acceleration: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            rotation: 1e-10,
            rate: 1e-10,
            acceleration: 1e-10,
        }
    }
}

impl Tolerances {
    pub fn new(rotation: f64, rate: f64, acceleration: f64) -> Self {
        Self { rotation, rate, acceleration }
    }

    /// Same threshold on every channel.
    pub fn uniform(tol: f64) -> Self {
        Self::new(tol, tol, tol)
    }

    /// `distances` is (angle, |Δrate|, |Δacceleration|).
    pub fn check_error(&self, distances: (f64, f64, f64)) -> bool {
        let (angle, rate, acceleration) = distances;
        angle <= self.rotation && rate <= self.rate && acceleration <= self.acceleration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_error() {
        let tol = Tolerances::new(1e-6, 1e-3, 1e-1);
        assert!(tol.check_error((1e-7, 1e-4, 1e-2)));
        assert!(!tol.check_error((1e-5, 1e-4, 1e-2)));
        assert!(!tol.check_error((1e-7, 1e-2, 1e-2)));
        assert!(!tol.check_error((1e-7, 1e-4, 1.0)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let tol: Tolerances = ron::from_str("(rate: 0.5)").unwrap();
        assert_eq!(tol.rate, 0.5);
        assert_eq!(tol.rotation, Tolerances::default().rotation);
        assert_eq!(tol.acceleration, Tolerances::default().acceleration);
    }
}
