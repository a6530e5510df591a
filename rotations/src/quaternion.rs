use super::*;
use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};
use thiserror::Error;

/// A struct representing a quaternion for 3D rotations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion<T = f64> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

/// Errors that can occur when creating a `Quaternion`.
#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum QuaternionErrors {
    #[error("got zero magnitude quaternion")]
    ZeroMagnitude,
}

impl<T: SimValue> Quaternion<T> {
    /// Creates a new `Quaternion`, no normalization is applied.
    ///
    /// # Arguments
    ///
    /// * `x` - The x component of the quaternion.
    /// * `y` - The y component of the quaternion.
    /// * `z` - The z component of the quaternion.
    /// * `w` - The scalar component of the quaternion.
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Pure quaternion (zero scalar part) holding `v`.
    pub fn pure(v: &Vector3<T>) -> Self {
        Self::new(v[0], v[1], v[2], T::zero())
    }

    /// Vector part of the quaternion.
    pub fn vector(&self) -> Vector3<T> {
        Vector3::new(self.x, self.y, self.z)
    }

    // Dot product of two quaternions
    pub fn dot(&self, other: &Quaternion<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Conjugate, which is the inverse for unit quaternions.
    pub fn inv(&self) -> Quaternion<T> {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn mag(&self) -> T {
        self.dot(self)
            .sqrt()
    }

    pub fn normalize(&self) -> Result<Self, QuaternionErrors> {
        let mag = self.mag();
        if mag.to_f64() < f64::EPSILON {
            return Err(QuaternionErrors::ZeroMagnitude);
        }
        Ok(Quaternion::new(
            self.x / mag,
            self.y / mag,
            self.z / mag,
            self.w / mag,
        ))
    }

    /// Multiplies every component by `k`.
    pub fn scale(&self, k: T) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k, self.w * k)
    }

    /// Drops any derivative information carried by the components.
    pub fn to_real(&self) -> Quaternion<f64> {
        Quaternion::new(
            self.x.to_f64(),
            self.y.to_f64(),
            self.z.to_f64(),
            self.w.to_f64(),
        )
    }
}

impl Quaternion<f64> {
    /// Creates an identity quaternion.
    ///
    /// # Returns
    ///
    /// A `Quaternion` representing no rotation.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Creates a random, non-normalized quaternion.
    pub fn rand<R: Rng>(rng: &mut R) -> Quaternion {
        let x = rng.random_range(-1.0..1.0);
        let y = rng.random_range(-1.0..1.0);
        let z = rng.random_range(-1.0..1.0);
        let s = rng.random_range(-1.0..1.0);

        Quaternion::new(x, y, z, s)
    }
}

impl<T: SimValue> Default for Quaternion<T> {
    /// Provides the default value for a quaternion.
    ///
    /// # Returns
    ///
    /// The identity quaternion.
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: SimValue> Mul<Quaternion<T>> for Quaternion<T> {
    type Output = Self;

    /// Multiplies two quaternions.
    /// IMPORTANT: This follows from the "x" logic rather than the "dot" logic from Markley/Crassidis
    /// Successive multiplications act like DCMs so that a rotation from a2c is
    /// q_a2c = q_b2c * q_a2b
    /// This is different than most of the quaternion calculators out there.
    ///
    /// # Arguments
    ///
    /// * `rhs` - The right-hand side quaternion.
    ///
    /// # Returns
    ///
    /// The product of the two quaternions.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w - self.y * rhs.z + self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w - self.z * rhs.x + self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w - self.x * rhs.y + self.y * rhs.x,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// Quaternion addition has no meaning for attitude, it is only used on
/// quaternion derivatives.
impl<T: SimValue> Add<Quaternion<T>> for Quaternion<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl<T: SimValue> Sub<Quaternion<T>> for Quaternion<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl<T: SimValue> Neg for Quaternion<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// A quaternion of unit norm, representing a rotation.
///
/// `q` and `-q` represent the same rotation, every comparison goes through
/// [`UnitQuaternion::angular_distance`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct UnitQuaternion<T = f64>(pub Quaternion<T>);

impl<T: SimValue> Default for UnitQuaternion<T> {
    fn default() -> Self {
        Self(Quaternion::identity())
    }
}

impl UnitQuaternion<f64> {
    pub const IDENTITY: Self = Self(Quaternion::IDENTITY);

    pub fn rand<R: Rng>(rng: &mut R) -> Result<Self, QuaternionErrors> {
        Ok(Self(
            Quaternion::rand(rng).normalize()?,
        ))
    }
}

impl<T: SimValue> UnitQuaternion<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Result<Self, QuaternionErrors> {
        Ok(Self(
            Quaternion::new(x, y, z, w).normalize()?,
        ))
    }

    /// Wraps a quaternion already known to be of unit norm.
    ///
    /// Used for quaternions carrying derivatives, where a renormalization would
    /// alter the derivative parts.
    pub fn new_unchecked(q: Quaternion<T>) -> Self {
        Self(q)
    }

    pub fn quaternion(&self) -> &Quaternion<T> {
        &self.0
    }

    /// Rotation angle in [0, π].
    pub fn angle(&self) -> T {
        let q = &self.0;
        let two = T::one() + T::one();
        two * q
            .vector()
            .dot(&q.vector())
            .sqrt()
            .atan2(q.w.abs())
    }

    /// Angle of the rotation taking `other` to `self`, insensitive to the
    /// quaternion sign.
    pub fn angular_distance(&self, other: &Self) -> T {
        (*self * other.inv()).angle()
    }

    /// Rotation vector (axis scaled by the angle in [0, π]) of the frame
    /// transform, inverse of [`UnitQuaternion::from_rotation_vector`].
    pub fn rotation_vector(&self) -> Vector3<T> {
        let q = if self.0.w < T::zero() { -self.0 } else { self.0 };
        let v = q.vector();
        let s = v
            .dot(&v)
            .sqrt();
        let two = T::one() + T::one();
        if s.to_f64() == 0.0 {
            return v * two;
        }
        v * (two * s.atan2(q.w) / s)
    }

    /// Frame transform rotating by `|v|` about `v`.
    pub fn from_rotation_vector(v: &Vector3<T>) -> Self {
        let two = T::one() + T::one();
        let angle = v
            .dot(v)
            .sqrt();
        if angle.to_f64() == 0.0 {
            return Self(Quaternion::new(
                v[0] / two,
                v[1] / two,
                v[2] / two,
                T::one(),
            ));
        }
        let (s, c) = (angle / two).sin_cos();
        let k = s / angle;
        Self(Quaternion::new(v[0] * k, v[1] * k, v[2] * k, c))
    }

    pub fn to_real(&self) -> UnitQuaternion<f64> {
        UnitQuaternion(self.0.to_real())
    }

    /// Lifts a real rotation into any scalar field.
    pub fn from_real(q: &UnitQuaternion<f64>) -> Self {
        Self(Quaternion::new(
            T::from_f64(q.0.x),
            T::from_f64(q.0.y),
            T::from_f64(q.0.z),
            T::from_f64(q.0.w),
        ))
    }
}

impl<T: SimValue> TryFrom<&Quaternion<T>> for UnitQuaternion<T> {
    type Error = QuaternionErrors;
    fn try_from(value: &Quaternion<T>) -> Result<Self, QuaternionErrors> {
        Ok(Self(value.normalize()?))
    }
}

impl<T: SimValue> From<&UnitQuaternion<T>> for Quaternion<T> {
    fn from(value: &UnitQuaternion<T>) -> Self {
        value.0
    }
}

// We decide not to deref to quat since if a user doesnt import RotationTrait,
// inv() will be found for the Quaternion, returning Quaternion instead of UnitQuaternion

impl<T: SimValue> RotationTrait<T> for UnitQuaternion<T> {
    /// Rotates a vector by the quaternion.
    /// Follows the logic from Markley/Crassidis
    /// aka Active Rotation or "Alibi"
    /// See Markley/Crassidis section 2.4 and figure 2.2 for details
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<T>) -> Vector3<T> {
        let Quaternion { x: q1, y: q2, z: q3, w: q4 } = self.0;
        let two = T::one() + T::one();

        let out1 = (q1 * q1 - q2 * q2 - q3 * q3 + q4 * q4) * v[0]
            + two * (q1 * q2 - q3 * q4) * v[1]
            + two * (q1 * q3 + q2 * q4) * v[2];

        let out2 = two * (q2 * q1 + q3 * q4) * v[0]
            + (-q1 * q1 + q2 * q2 - q3 * q3 + q4 * q4) * v[1]
            + two * (q2 * q3 - q1 * q4) * v[2];

        let out3 = two * (q3 * q1 - q2 * q4) * v[0]
            + two * (q3 * q2 + q1 * q4) * v[1]
            + (-q1 * q1 - q2 * q2 + q3 * q3 + q4 * q4) * v[2];

        Vector3::new(out1, out2, out3)
    }

    /// Transforms a vector by the quaternion.
    /// Follows the logic from Markley/Crassidis
    /// Section 2.9.3, equations 2.125 and 2.130
    /// aka Passive Rotation or "Alias"
    /// See Markley/Crassidis section 2.4 and figure 2.2 for details
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<T>) -> Vector3<T> {
        let Quaternion { x: q1, y: q2, z: q3, w: q4 } = self.0;
        let two = T::one() + T::one();

        let out1 = (q1 * q1 - q2 * q2 - q3 * q3 + q4 * q4) * v[0]
            + two * (q1 * q2 + q3 * q4) * v[1]
            + two * (q1 * q3 - q2 * q4) * v[2];

        let out2 = two * (q2 * q1 - q3 * q4) * v[0]
            + (-q1 * q1 + q2 * q2 - q3 * q3 + q4 * q4) * v[1]
            + two * (q2 * q3 + q1 * q4) * v[2];

        let out3 = two * (q3 * q1 + q2 * q4) * v[0]
            + two * (q3 * q2 - q1 * q4) * v[1]
            + (-q1 * q1 - q2 * q2 + q3 * q3 + q4 * q4) * v[2];

        Vector3::new(out1, out2, out3)
    }

    fn identity() -> Self {
        Self(Quaternion::identity())
    }

    fn inv(&self) -> Self {
        UnitQuaternion(
            self.0
                .inv(),
        ) // no need to renormalize since just taking conjugate of a UnitQuaternion
    }
}

impl<T: SimValue> Mul<UnitQuaternion<T>> for UnitQuaternion<T> {
    type Output = Self;
    fn mul(self, rhs: UnitQuaternion<T>) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<T: SimValue> Neg for UnitQuaternion<T> {
    type Output = Self;

    fn neg(self) -> Self {
        // still unit norm, same rotation
        Self(-self.0)
    }
}
