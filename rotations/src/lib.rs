pub mod quaternion;
pub mod rotation_matrix;

use nalgebra::Vector3;
use sim_value::SimValue;

pub mod prelude {
    pub use crate::quaternion::*;
    pub use crate::rotation_matrix::*;
    pub use crate::RotationTrait;
}

/// Trait defining rotation and transformation operations.
pub trait RotationTrait<T: SimValue = f64> {
    /// Rotates a vector by the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<T>) -> Vector3<T>;

    /// Transforms a vector by the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<T>) -> Vector3<T>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}
