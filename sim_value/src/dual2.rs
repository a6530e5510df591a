use crate::{Abs, SimValue, Sqrt, Trig};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Second-order univariate jet: a value with its first and second derivative
/// with respect to one free parameter (time, for the kinematics crates).
///
/// `Dual2::variable(t)` seeds the parameter itself, `Dual2::constant(c)` a value
/// independent of it. Ordering compares values only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dual2<T> {
    pub value: T,
    pub first: T,
    pub second: T,
}

impl<T: SimValue> Dual2<T> {
    pub fn new(value: T, first: T, second: T) -> Self {
        Self { value, first, second }
    }

    pub fn constant(value: T) -> Self {
        Self { value, first: T::zero(), second: T::zero() }
    }

    pub fn variable(value: T) -> Self {
        Self { value, first: T::one(), second: T::zero() }
    }

    /// Applies a function given its value `f0`, first `f1` and second `f2`
    /// derivative at `self.value`: (f∘g)'' = f''·g'² + f'·g''.
    fn chain(self, f0: T, f1: T, f2: T) -> Self {
        Self {
            value: f0,
            first: f1 * self.first,
            second: f2 * self.first * self.first + f1 * self.second,
        }
    }
}

impl<T: SimValue> PartialOrd for Dual2<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value
            .partial_cmp(&other.value)
    }
}

impl<T: SimValue> Add for Dual2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.value + rhs.value,
            self.first + rhs.first,
            self.second + rhs.second,
        )
    }
}

impl<T: SimValue> Sub for Dual2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.value - rhs.value,
            self.first - rhs.first,
            self.second - rhs.second,
        )
    }
}

impl<T: SimValue> Mul for Dual2<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let two = T::one() + T::one();
        Self::new(
            self.value * rhs.value,
            self.value * rhs.first + self.first * rhs.value,
            self.second * rhs.value + two * self.first * rhs.first + self.value * rhs.second,
        )
    }
}

impl<T: SimValue> Div for Dual2<T> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        // h = f / g  =>  h g = f, differentiate twice
        let two = T::one() + T::one();
        let value = self.value / rhs.value;
        let first = (self.first - value * rhs.first) / rhs.value;
        let second =
            (self.second - two * first * rhs.first - value * rhs.second) / rhs.value;
        Self::new(value, first, second)
    }
}

impl<T: SimValue> Neg for Dual2<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value, -self.first, -self.second)
    }
}

impl<T: SimValue> AddAssign for Dual2<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: SimValue> SubAssign for Dual2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: SimValue> MulAssign for Dual2<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: SimValue> DivAssign for Dual2<T> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<T: SimValue> Zero for Dual2<T> {
    fn zero() -> Self {
        Self::constant(T::zero())
    }
    fn is_zero(&self) -> bool {
        self.value
            .is_zero()
            && self
                .first
                .is_zero()
            && self
                .second
                .is_zero()
    }
}

impl<T: SimValue> One for Dual2<T> {
    fn one() -> Self {
        Self::constant(T::one())
    }
}

impl<T: SimValue> Sqrt for Dual2<T> {
    fn sqrt(self) -> Self {
        let root = self
            .value
            .sqrt();
        let f1 = T::one() / (root + root);
        // f'' = -1 / (4 x^(3/2)) = -f' / (2x)
        let f2 = -f1 / (self.value + self.value);
        self.chain(root, f1, f2)
    }
}

impl<T: SimValue> Abs for Dual2<T> {
    fn abs(self) -> Self {
        let sign = self
            .value
            .signum();
        Self::new(
            sign * self.value,
            sign * self.first,
            sign * self.second,
        )
    }
}

impl<T: SimValue> Trig for Dual2<T> {
    fn sin(self) -> Self {
        let (s, c) = self
            .value
            .sin_cos();
        self.chain(s, c, -s)
    }

    fn cos(self) -> Self {
        let (s, c) = self
            .value
            .sin_cos();
        self.chain(c, -s, -c)
    }

    fn tan(self) -> Self {
        let t = self
            .value
            .tan();
        let f1 = T::one() + t * t;
        self.chain(t, f1, (t + t) * f1)
    }

    fn asin(self) -> Self {
        let x = self.value;
        let d = T::one() - x * x;
        let f1 = T::one() / d.sqrt();
        self.chain(x.asin(), f1, x * f1 / d)
    }

    fn acos(self) -> Self {
        let x = self.value;
        let d = T::one() - x * x;
        let f1 = T::one() / d.sqrt();
        self.chain(x.acos(), -f1, -(x * f1 / d))
    }

    fn atan(self) -> Self {
        let x = self.value;
        let d = T::one() + x * x;
        let f1 = T::one() / d;
        self.chain(x.atan(), f1, -(x + x) * f1 * f1)
    }

    fn atan2(self, other: Self) -> Self {
        let (y, x) = (self.value, other.value);
        let two = T::one() + T::one();
        // u' = N / D with N = x y' - y x', D = x² + y²
        let n = x * self.first - y * other.first;
        let d = x * x + y * y;
        let n_dot = x * self.second - y * other.second;
        let d_dot = two * (x * other.first + y * self.first);
        Self::new(
            y.atan2(x),
            n / d,
            (n_dot * d - n * d_dot) / (d * d),
        )
    }
}

impl<T: SimValue> SimValue for Dual2<T> {
    fn from_f64(value: f64) -> Self {
        Self::constant(T::from_f64(value))
    }

    fn to_f64(self) -> f64 {
        self.value
            .to_f64()
    }
}
