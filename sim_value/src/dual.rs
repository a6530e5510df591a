use crate::{Abs, SimValue, Sqrt, Trig};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Forward-mode dual number `value + derivative·ε` with ε² = 0.
///
/// Carries one exact first derivative through every `SimValue` operation.
/// Ordering compares values only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dual<T> {
    pub value: T,
    pub derivative: T,
}

impl<T: SimValue> Dual<T> {
    pub fn new(value: T, derivative: T) -> Self {
        Self { value, derivative }
    }

    /// Constant (derivative = 0)
    pub fn constant(value: T) -> Self {
        Self { value, derivative: T::zero() }
    }

    /// Independent variable (derivative = 1)
    pub fn variable(value: T) -> Self {
        Self { value, derivative: T::one() }
    }

    /// Applies a function with known value `f0` and derivative `f1` at `self.value`.
    fn chain(self, f0: T, f1: T) -> Self {
        Self { value: f0, derivative: f1 * self.derivative }
    }
}

impl<T: SimValue> PartialOrd for Dual<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value
            .partial_cmp(&other.value)
    }
}

impl<T: SimValue> Add for Dual<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.value + rhs.value,
            self.derivative + rhs.derivative,
        )
    }
}

impl<T: SimValue> Sub for Dual<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.value - rhs.value,
            self.derivative - rhs.derivative,
        )
    }
}

impl<T: SimValue> Mul for Dual<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.value * rhs.value,
            self.value * rhs.derivative + self.derivative * rhs.value,
        )
    }
}

impl<T: SimValue> Div for Dual<T> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let value = self.value / rhs.value;
        Self::new(
            value,
            (self.derivative - value * rhs.derivative) / rhs.value,
        )
    }
}

impl<T: SimValue> Neg for Dual<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value, -self.derivative)
    }
}

impl<T: SimValue> AddAssign for Dual<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: SimValue> SubAssign for Dual<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: SimValue> MulAssign for Dual<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: SimValue> DivAssign for Dual<T> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<T: SimValue> Zero for Dual<T> {
    fn zero() -> Self {
        Self::constant(T::zero())
    }
    fn is_zero(&self) -> bool {
        self.value
            .is_zero()
            && self
                .derivative
                .is_zero()
    }
}

impl<T: SimValue> One for Dual<T> {
    fn one() -> Self {
        Self::constant(T::one())
    }
}

impl<T: SimValue> Sqrt for Dual<T> {
    fn sqrt(self) -> Self {
        let root = self
            .value
            .sqrt();
        self.chain(root, T::one() / (root + root))
    }
}

impl<T: SimValue> Abs for Dual<T> {
    fn abs(self) -> Self {
        let sign = self
            .value
            .signum();
        Self::new(
            sign * self.value,
            sign * self.derivative,
        )
    }
}

impl<T: SimValue> Trig for Dual<T> {
    fn sin(self) -> Self {
        let (s, c) = self
            .value
            .sin_cos();
        self.chain(s, c)
    }

    fn cos(self) -> Self {
        let (s, c) = self
            .value
            .sin_cos();
        self.chain(c, -s)
    }

    fn tan(self) -> Self {
        let t = self
            .value
            .tan();
        self.chain(t, T::one() + t * t)
    }

    fn asin(self) -> Self {
        let x = self.value;
        self.chain(
            x.asin(),
            T::one() / (T::one() - x * x).sqrt(),
        )
    }

    fn acos(self) -> Self {
        let x = self.value;
        self.chain(
            x.acos(),
            -T::one() / (T::one() - x * x).sqrt(),
        )
    }

    fn atan(self) -> Self {
        let x = self.value;
        self.chain(x.atan(), T::one() / (T::one() + x * x))
    }

    // d atan2(y, x) = (x dy - y dx) / (x² + y²)
    fn atan2(self, other: Self) -> Self {
        let (y, x) = (self.value, other.value);
        Self::new(
            y.atan2(x),
            (x * self.derivative - y * other.derivative) / (x * x + y * y),
        )
    }
}

impl<T: SimValue> SimValue for Dual<T> {
    fn from_f64(value: f64) -> Self {
        Self::constant(T::from_f64(value))
    }

    fn to_f64(self) -> f64 {
        self.value
            .to_f64()
    }
}
