pub mod dual;
pub mod dual2;

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub use dual::Dual;
pub use dual2::Dual2;

pub mod prelude {
    pub use crate::{Abs, Dual, Dual2, SimValue, Sqrt, Trig};
}

/// Scalar field used by all the kinematics algorithms.
///
/// Implemented for `f64` and `f32`, and for the forward-mode differentiation
/// types `Dual<T>` (value and first derivative) and `Dual2<T>` (value, first and
/// second derivative), so the same code computes plain values or exact time
/// derivatives.
///
/// Comparisons (`PartialOrd`) only look at the value part, `to_f64` projects
/// onto that value.
pub trait SimValue:
    Abs
    + Add<Output = Self>
    + AddAssign
    + Copy
    + Debug
    + Div<Output = Self>
    + DivAssign
    + Mul<Output = Self>
    + MulAssign
    + Neg<Output = Self>
    + One
    + PartialEq
    + PartialOrd
    + Send
    + Sqrt
    + Sub<Output = Self>
    + SubAssign
    + Sync
    + Trig
    + Zero
    + 'static
{
    /// Lifts a plain constant into the field (all derivatives zero).
    fn from_f64(value: f64) -> Self;

    /// Value part, dropping any derivative information.
    fn to_f64(self) -> f64;

    /// +1 or -1 depending on the sign of the value part, as a constant.
    fn signum(self) -> Self {
        if self.to_f64() < 0.0 {
            -Self::one()
        } else {
            Self::one()
        }
    }
}

/// Trait defining a square root operation.
pub trait Sqrt {
    /// Returns the square root of the value.
    fn sqrt(self) -> Self;
}

pub trait Abs {
    fn abs(self) -> Self;
}

/// Elementary trigonometric functions needed by the rotation algebra.
pub trait Trig: Sized {
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    fn atan(self) -> Self;
    fn atan2(self, other: Self) -> Self;

    fn sin_cos(self) -> (Self, Self)
    where
        Self: Copy,
    {
        (self.sin(), self.cos())
    }
}

macro_rules! impl_float {
    ($t:ty) => {
        impl Sqrt for $t {
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
        }

        impl Abs for $t {
            fn abs(self) -> Self {
                <$t>::abs(self)
            }
        }

        impl Trig for $t {
            fn sin(self) -> Self {
                <$t>::sin(self)
            }
            fn cos(self) -> Self {
                <$t>::cos(self)
            }
            fn tan(self) -> Self {
                <$t>::tan(self)
            }
            fn asin(self) -> Self {
                <$t>::asin(self)
            }
            fn acos(self) -> Self {
                <$t>::acos(self)
            }
            fn atan(self) -> Self {
                <$t>::atan(self)
            }
            fn atan2(self, other: Self) -> Self {
                <$t>::atan2(self, other)
            }
            fn sin_cos(self) -> (Self, Self) {
                <$t>::sin_cos(self)
            }
        }

        impl SimValue for $t {
            fn from_f64(value: f64) -> Self {
                value as $t
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_float!(f64);
impl_float!(f32);
