// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use num_traits::{AsPrimitive, Float};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A duration tagged with its unit.
///
/// # Type Parameter
/// - `U`: The unit of the value (a zero-sized marker type)
/// - `T`: The underlying value (typically a floating point number)
///
/// # Examples
/// ```rust
/// use crlab_units::nanoseconds;
///
/// let pi_pulse = nanoseconds(40.0);
/// let echo = pi_pulse * 2.0;
/// assert_eq!(echo.value(), 80.0);
/// ```
#[derive(Clone, Copy)]
pub struct Duration<U, T = f64> {
    value: T,
    unit: U,
}

/// Duration in nanoseconds, the native time unit of pulse timelines.
pub type Ns = Duration<Nanosecond>;

impl<U, T: Copy> Duration<U, T> {
    pub fn value(&self) -> T {
        self.value
    }
}

impl<U: Copy, T: Float> Duration<U, T> {
    pub fn zero(unit: U) -> Self {
        Duration {
            value: T::zero(),
            unit,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    pub fn max(self, other: Self) -> Self {
        if other.value > self.value {
            other
        } else {
            self
        }
    }

    pub fn min(self, other: Self) -> Self {
        if other.value < self.value {
            other
        } else {
            self
        }
    }
}

impl<T: Float, U> PartialEq for Duration<U, T> {
    fn eq(&self, other: &Self) -> bool {
        let a = self.value;
        let b = other.value;
        if a.is_zero() && b.is_zero() {
            true
        } else {
            a == b
        }
    }
}

impl<T: Float, U> Eq for Duration<U, T> {}

impl<T: Float, U> PartialOrd for Duration<U, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Float, U> Ord for Duration<U, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.value < other.value {
            std::cmp::Ordering::Less
        } else if self.value > other.value {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl<T: Debug, U> Debug for Duration<U, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Duration")
            .field("value", &self.value)
            .field("unit", &std::any::type_name::<U>())
            .finish()
    }
}

impl<U: Copy, T: Add<Output = T>> Add for Duration<U, T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Duration {
            value: self.value + rhs.value,
            unit: self.unit,
        }
    }
}

impl<U: Copy, T: Add<Output = T> + Copy> AddAssign for Duration<U, T> {
    fn add_assign(&mut self, rhs: Self) {
        self.value = self.value + rhs.value;
    }
}

impl<U: Copy, T: Sub<Output = T>> Sub for Duration<U, T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration {
            value: self.value - rhs.value,
            unit: self.unit,
        }
    }
}

impl<U: Copy, T: Mul<Output = T>> Mul<T> for Duration<U, T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        Duration {
            value: self.value * rhs,
            unit: self.unit,
        }
    }
}

impl<U: Copy, T: Div<Output = T>> Div<T> for Duration<U, T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output {
        Duration {
            value: self.value / rhs,
            unit: self.unit,
        }
    }
}

impl<U: Copy, T: Neg<Output = T>> Neg for Duration<U, T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Duration {
            value: -self.value,
            unit: self.unit,
        }
    }
}

fn round_to_significant_digits(x: f64, n: u32) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        let order = x.abs().log10().floor();
        let scale = 10f64.powf((n as f64) - 1.0 - order);
        (x * scale).round() / scale
    }
}

impl<U, T> Display for Duration<U, T>
where
    T: Display + Debug + AsPrimitive<f64> + Float,
    U: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            Display::fmt(&self.value, f)?;
        } else {
            // Trim digits below epsilon so accumulated boundary sums print cleanly.
            let significand_digits = (-T::epsilon().log10() - T::one()).as_() as u32;
            let value = round_to_significant_digits(self.value.as_(), significand_digits);
            Debug::fmt(&value, f)?;
        }
        write!(f, " ")?;
        self.unit.fmt(f)
    }
}

impl<U, T: Serialize> Serialize for Duration<U, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, U: Default, T: Deserialize<'de>> Deserialize<'de> for Duration<U, T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = T::deserialize(deserializer)?;
        Ok(Duration {
            value,
            unit: U::default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Nanosecond;

impl Display for Nanosecond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ns")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Second;

impl Display for Second {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "s")
    }
}

impl<T: Float, U: Default> From<T> for Duration<U, T> {
    fn from(value: T) -> Self {
        Duration {
            value,
            unit: U::default(),
        }
    }
}

impl<U> From<Duration<U, f64>> for f64 {
    fn from(duration: Duration<U, f64>) -> Self {
        duration.value
    }
}

impl Duration<Nanosecond> {
    pub fn to_seconds(self) -> Duration<Second> {
        seconds(self.value * 1e-9)
    }
}

impl Duration<Second> {
    pub fn to_nanoseconds(self) -> Ns {
        nanoseconds(self.value * 1e9)
    }
}

pub const fn nanoseconds<T>(value: T) -> Duration<Nanosecond, T> {
    Duration {
        value,
        unit: Nanosecond,
    }
}

pub const fn seconds<T>(value: T) -> Duration<Second, T> {
    Duration {
        value,
        unit: Second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let duration: Ns = 40.0.into();
        assert_eq!(duration.value(), 40.0);

        let duration = Ns::from(1e-3);
        assert_eq!(duration.value(), 1e-3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", nanoseconds(40.0)), "40.0 ns");
        assert_eq!(format!("{}", nanoseconds(0.1 + 0.2)), "0.3 ns");
        assert_eq!(format!("{:#}", nanoseconds(0.5)), "0.5 ns");
    }

    #[test]
    fn test_eq() {
        assert_eq!(nanoseconds(0.0), nanoseconds(-0.0));
        assert_ne!(nanoseconds(40.0), nanoseconds(-40.0));
    }

    #[test]
    fn test_arithmetic() {
        let start = nanoseconds(40.0);
        let duration = nanoseconds(20.0);
        assert_eq!(start + duration, nanoseconds(60.0));
        assert_eq!(start - duration, duration);
        assert_eq!(duration * 3.0, nanoseconds(60.0));
        assert_eq!(start / 2.0, duration);
        assert_eq!(-duration, nanoseconds(-20.0));

        let mut cursor = nanoseconds(5.0);
        cursor += start;
        assert_eq!(cursor, nanoseconds(45.0));
    }

    #[test]
    fn test_ordering() {
        let mut c = vec![nanoseconds(80.0), nanoseconds(0.0), nanoseconds(40.0)];
        c.sort();
        assert_eq!(c, vec![nanoseconds(0.0), nanoseconds(40.0), nanoseconds(80.0)]);
        assert_eq!(nanoseconds(1.0).max(nanoseconds(2.0)), nanoseconds(2.0));
        assert_eq!(nanoseconds(1.0).min(nanoseconds(2.0)), nanoseconds(1.0));
    }

    #[test]
    fn test_unit_conversion() {
        assert!((nanoseconds(200e3).to_seconds().value() - 200e-6).abs() < 1e-18);
        assert!((seconds(1e-6).to_nanoseconds().value() - 1e3).abs() < 1e-9);
    }

    #[test]
    fn test_serde_as_plain_number() {
        let json = serde_json::to_string(&nanoseconds(40.0)).unwrap();
        assert_eq!(json, "40.0");
        let back: Ns = serde_json::from_str("12.5").unwrap();
        assert_eq!(back, nanoseconds(12.5));
    }
}
