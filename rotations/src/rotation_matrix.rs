use super::*;
use crate::quaternion::{Quaternion, UnitQuaternion};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use thiserror::Error;

/// A struct representing a 3x3 rotation matrix.
///
/// The matrix is the frame transform (direction cosine matrix): `transform(v) = M v`
/// expresses in the new frame a vector given in the old one.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: SimValue + Serialize",
    deserialize = "T: SimValue + Deserialize<'de>"
))]
pub struct RotationMatrix<T = f64>(pub Matrix3<T>);

impl<T: SimValue> PartialEq for RotationMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Errors that can occur when creating a `RotationMatrix`.
#[derive(Debug, Copy, Clone, Error, PartialEq)]
pub enum RotationMatrixError {
    /// Occurs when a column vector has zero magnitude.
    #[error("rotation matrix column has zero magnitude")]
    ZeroMagnitudeColumn,
}

impl<T: SimValue> RotationMatrix<T> {
    /// Creates a new `RotationMatrix` from its columns, normalizing each of them.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing a new `RotationMatrix` if columns are valid,
    /// or an `Err` containing a `RotationMatrixError`.
    pub fn from_columns(
        c1: &Vector3<T>,
        c2: &Vector3<T>,
        c3: &Vector3<T>,
    ) -> Result<Self, RotationMatrixError> {
        // Helper function to normalize a column vector.
        fn normalize<T: SimValue>(c: &Vector3<T>) -> Result<Vector3<T>, RotationMatrixError> {
            let mag_squared = c.dot(c);
            if mag_squared.to_f64() < f64::EPSILON {
                return Err(RotationMatrixError::ZeroMagnitudeColumn);
            }
            Ok(c / mag_squared.sqrt())
        }

        Ok(Self(Matrix3::from_columns(&[
            normalize(c1)?,
            normalize(c2)?,
            normalize(c3)?,
        ])))
    }

    pub fn get_value(&self) -> Matrix3<T> {
        self.0
    }
}

impl<T: SimValue> From<Matrix3<T>> for RotationMatrix<T> {
    fn from(value: Matrix3<T>) -> Self {
        Self(value)
    }
}

impl<T: SimValue> From<&UnitQuaternion<T>> for RotationMatrix<T> {
    /// Converts a `UnitQuaternion` into the matrix of its frame transform.
    fn from(q: &UnitQuaternion<T>) -> Self {
        let Quaternion { x, y, z, w } = q.0;
        let two = T::one() + T::one();

        let e11 = x * x - y * y - z * z + w * w;
        let e12 = two * (x * y + z * w);
        let e13 = two * (x * z - y * w);
        let e21 = two * (x * y - z * w);
        let e22 = -x * x + y * y - z * z + w * w;
        let e23 = two * (y * z + x * w);
        let e31 = two * (x * z + y * w);
        let e32 = two * (y * z - x * w);
        let e33 = -x * x - y * y + z * z + w * w;

        Self(Matrix3::new(
            e11, e12, e13, e21, e22, e23, e31, e32, e33,
        ))
    }
}

impl<T: SimValue> From<&RotationMatrix<T>> for UnitQuaternion<T> {
    /// Shepperd's method, pivoting on the largest of the trace and the diagonal.
    fn from(m: &RotationMatrix<T>) -> Self {
        let a = &m.0;
        let one = T::one();
        let two = one + one;
        let four = two + two;
        let trace = a[(0, 0)] + a[(1, 1)] + a[(2, 2)];

        let q = if trace >= a[(0, 0)] && trace >= a[(1, 1)] && trace >= a[(2, 2)] {
            let w = (one + trace).sqrt() / two;
            let k = four * w;
            Quaternion::new(
                (a[(1, 2)] - a[(2, 1)]) / k,
                (a[(2, 0)] - a[(0, 2)]) / k,
                (a[(0, 1)] - a[(1, 0)]) / k,
                w,
            )
        } else if a[(0, 0)] >= a[(1, 1)] && a[(0, 0)] >= a[(2, 2)] {
            let x = (one + two * a[(0, 0)] - trace).sqrt() / two;
            let k = four * x;
            Quaternion::new(
                x,
                (a[(0, 1)] + a[(1, 0)]) / k,
                (a[(0, 2)] + a[(2, 0)]) / k,
                (a[(1, 2)] - a[(2, 1)]) / k,
            )
        } else if a[(1, 1)] >= a[(2, 2)] {
            let y = (one + two * a[(1, 1)] - trace).sqrt() / two;
            let k = four * y;
            Quaternion::new(
                (a[(0, 1)] + a[(1, 0)]) / k,
                y,
                (a[(1, 2)] + a[(2, 1)]) / k,
                (a[(2, 0)] - a[(0, 2)]) / k,
            )
        } else {
            let z = (one + two * a[(2, 2)] - trace).sqrt() / two;
            let k = four * z;
            Quaternion::new(
                (a[(0, 2)] + a[(2, 0)]) / k,
                (a[(1, 2)] + a[(2, 1)]) / k,
                z,
                (a[(0, 1)] - a[(1, 0)]) / k,
            )
        };

        // the pivot keeps the magnitude near one, this only removes rounding
        UnitQuaternion::new_unchecked(q.scale(one / q.mag()))
    }
}

impl<T: SimValue> RotationTrait<T> for RotationMatrix<T> {
    fn rotate(&self, v: &Vector3<T>) -> Vector3<T> {
        self.0.transpose() * v
    }

    fn transform(&self, v: &Vector3<T>) -> Vector3<T> {
        self.0 * v
    }

    fn identity() -> Self {
        Self(Matrix3::identity())
    }

    fn inv(&self) -> Self {
        Self(self.0.transpose())
    }
}

impl<T: SimValue> Mul<RotationMatrix<T>> for RotationMatrix<T> {
    type Output = Self;

    /// q_a2c = q_b2c * q_a2b, as for quaternions
    fn mul(self, rhs: RotationMatrix<T>) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}
