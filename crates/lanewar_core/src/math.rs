//! Fixed-point math utilities for deterministic simulation.
//!
//! Every quantity the tick loop touches (positions, hit points,
//! resources, energy, timers) is a [`Fixed`]. Floating-point
//! operations can produce different results on different CPUs,
//! which would break replays and state hashes.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for `Option<Fixed>`.
pub mod option_fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional fixed-point number.
    pub fn serialize<S>(value: &Option<Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(Fixed::to_bits).serialize(serializer)
    }

    /// Deserialize an optional fixed-point number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<i64>::deserialize(deserializer)?;
        Ok(opt.map(Fixed::from_bits))
    }
}

/// Serde support for human-edited config values.
///
/// Config files carry plain decimal numbers (`0.55`, `1200`) rather
/// than raw bits, so they stay readable in RON.
pub mod fixed_decimal_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_num::<f64>())
    }

    /// Deserialize a fixed-point number from a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(value)
            .ok_or_else(|| serde::de::Error::custom(format!("{value} is out of fixed-point range")))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer coordinates.
    #[must_use]
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Calculate squared distance (avoids sqrt for comparisons).
    ///
    /// Saturates at [`Fixed::MAX`] instead of overflowing for far-apart points.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x.saturating_sub(other.x);
        let dy = self.y.saturating_sub(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Euclidean distance.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        fixed_sqrt(self.distance_squared(other))
    }

    /// Whether `other` lies strictly closer than `radius`.
    #[must_use]
    pub fn within(self, other: Self, radius: Fixed) -> bool {
        self.distance_squared(other) < radius * radius
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> Fixed {
        self.x * other.x + self.y * other.y
    }

    /// Scale both components.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Normalize vector using fixed-point math.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = fixed_sqrt(self.dot(self));
        if len == Fixed::ZERO {
            return Self::ZERO;
        }

        Self::new(self.x / len, self.y / len)
    }

    /// Move `distance` units along the bearing toward `target`.
    ///
    /// The full step is taken even when it passes the target; callers
    /// use an arrival radius larger than any single step.
    #[must_use]
    pub fn step_toward(self, target: Self, distance: Fixed) -> Self {
        self + (target - self).normalize().scale(distance)
    }
}

/// Computes the square root of a fixed-point number using binary search.
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let one = Fixed::from_num(1);
    let mut high = if value > one { value } else { one };

    // Lane-scale values reach ~2e6, so 32 halvings would leave ~1e-3 error.
    for _ in 0..48 {
        let mid = low + (high - low) / Fixed::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_distance() {
        let a = Vec2Fixed::from_ints(3, 0);
        let b = Vec2Fixed::from_ints(0, 4);
        assert_eq!(a.distance_squared(b), Fixed::from_num(25));

        let dist = a.distance(b);
        let epsilon = Fixed::from_num(1) / Fixed::from_num(10000);
        assert!((dist - Fixed::from_num(5)).abs() < epsilon, "got {dist:?}");
    }

    #[test]
    fn test_distance_squared_saturates_across_huge_fields() {
        let a = Vec2Fixed::from_ints(0, 0);
        let b = Vec2Fixed::from_ints(60_000, 60_000);
        assert_eq!(a.distance_squared(b), Fixed::MAX);

        let c = Vec2Fixed::from_ints(40_000, 0);
        assert_eq!(a.distance_squared(c), Fixed::from_num(1_600_000_000i64));
    }

    #[test]
    fn test_within_is_strict() {
        let a = Vec2Fixed::ZERO;
        let b = Vec2Fixed::from_ints(6, 0);
        assert!(!a.within(b, Fixed::from_num(6)));
        assert!(a.within(b, Fixed::from_num(7)));
    }

    #[test]
    fn test_sqrt_at_lane_scale() {
        // Opposite corners of the default 1200x720 field.
        let a = Vec2Fixed::ZERO;
        let b = Vec2Fixed::from_ints(1200, 720);
        let dist = a.distance(b);
        let expected = Fixed::from_num(1399.4284);
        assert!((dist - expected).abs() < Fixed::from_num(0.001), "got {dist:?}");
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2Fixed::from_ints(3, 4);
        let norm = v.normalize();

        let len_sq = norm.dot(norm);
        let one = Fixed::from_num(1);
        let epsilon = one / Fixed::from_num(10000);
        assert!(
            (len_sq - one).abs() < epsilon,
            "normalized vector length² should be ~1, got {:?}",
            len_sq
        );

        let ratio_diff = (norm.x * Fixed::from_num(4)) - (norm.y * Fixed::from_num(3));
        assert!(ratio_diff.abs() < epsilon, "direction not preserved: {:?}", ratio_diff);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec2Fixed::ZERO.normalize(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_step_toward_moves_along_bearing() {
        let start = Vec2Fixed::ZERO;
        let target = Vec2Fixed::from_ints(30, 40);
        let moved = start.step_toward(target, Fixed::from_num(5));

        let epsilon = Fixed::from_num(0.001);
        assert!((moved.x - Fixed::from_num(3)).abs() < epsilon);
        assert!((moved.y - Fixed::from_num(4)).abs() < epsilon);
    }

    #[test]
    fn test_decimal_serde_reads_plain_numbers() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(with = "fixed_decimal_serde")]
            value: Fixed,
        }

        let parsed: Wrapper = ron::from_str("(value: 0.55)").unwrap();
        let epsilon = Fixed::from_num(0.000_001);
        assert!((parsed.value - Fixed::from_num(0.55)).abs() < epsilon);
    }
}
