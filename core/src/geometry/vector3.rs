//! 3-D Vectors

use super::{Dot, Normal3, Point3};
use num_traits::{Float, Num, Zero};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A 3-D vector containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D vector containing `Float` values.
pub type Vector3f = Vector3<crate::pbrt::Float>;

/// 3-D vector containing `Int` values.
pub type Vector3i = Vector3<crate::pbrt::Int>;

/// Creates a new 3-D vector.
///
/// * `x` - X-coordinate.
/// * `y` - Y-coordinate.
/// * `z` - Z-coordinate.
pub fn vector3<T>(x: T, y: T, z: T) -> Vector3<T> {
    Vector3 { x, y, z }
}

impl Vector3f {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num + Copy> Vector3<T> {
    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's cross product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl<T: Float> Vector3<T> {
    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the vector's length.
    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector in the same direction.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns a new vector containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the largest coordinate value.
    pub fn max_component(&self) -> T {
        self.x.max(self.y.max(self.z))
    }

    /// Returns the index of the coordinate with the largest value.
    pub fn max_dimension(&self) -> usize {
        if self.x > self.y {
            if self.x > self.z {
                0
            } else {
                2
            }
        } else if self.y > self.z {
            1
        } else {
            2
        }
    }

    /// Returns a local coordinate system where `self` is the first axis.
    /// The vector is expected to be normalized.
    pub fn coordinate_system(&self) -> (Self, Self) {
        let v2 = if self.x.abs() > self.y.abs() {
            Self::new(-self.z, T::zero(), self.x) / (self.x * self.x + self.z * self.z).sqrt()
        } else {
            Self::new(T::zero(), self.z, -self.y) / (self.y * self.y + self.z * self.z).sqrt()
        };
        (v2, self.cross(&v2))
    }
}

impl<T: Num + Zero + Neg<Output = T> + PartialOrd + Copy> Dot<Vector3<T>> for Vector3<T> {
    type Output = T;

    fn dot(&self, other: &Vector3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Num + Zero + Neg<Output = T> + PartialOrd + Copy> Dot<Normal3<T>> for Vector3<T> {
    type Output = T;

    fn dot(&self, n: &Normal3<T>) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl<T: Num> Add for Vector3<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T: Num + Copy> AddAssign for Vector3<T> {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl<T: Num> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T: Num + Copy> SubAssign for Vector3<T> {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

tuple3_ops!(Vector3);

impl<T> From<Point3<T>> for Vector3<T> {
    /// Convert a 3-D point to a vector from the origin.
    fn from(p: Point3<T>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

impl<T> From<Normal3<T>> for Vector3<T> {
    fn from(n: Normal3<T>) -> Self {
        Self { x: n.x, y: n.y, z: n.z }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbrt::{axis_3d_strategy, Float};
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn zero_vector() {
        assert!(Vector3f::ZERO == vector3(0.0, 0.0, 0.0));
        assert!(Vector3f::ZERO.length_squared() == 0.0);
    }

    #[test]
    fn has_nans() {
        assert!(!Vector3f::new(0.0, 0.0, 0.0).has_nans());
        assert!(Vector3f::new(0.0, 0.0, Float::NAN).has_nans());
        assert!(Vector3f::new(Float::NAN, 0.0, 0.0).has_nans());
    }

    #[test]
    fn cross_of_axes() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector3f::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", vector3(1, -2, 3)), "[1, -2, 3]");
    }

    proptest! {
        #[test]
        fn index_matches_fields(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32,
                                axis in axis_3d_strategy()) {
            let v = Vector3f::new(x, y, z);
            let expected = match axis {
                crate::pbrt::Axis::X => x,
                crate::pbrt::Axis::Y => y,
                crate::pbrt::Axis::Z => z,
            };
            prop_assert_eq!(v[axis], expected);
            prop_assert_eq!(v[axis as usize], expected);
        }

        #[test]
        fn cross_is_orthogonal(v1 in prop_vector3!(-10.0..10.0f32, -10.0..10.0f32, -10.0..10.0f32),
                               v2 in prop_vector3!(-10.0..10.0f32, -10.0..10.0f32, -10.0..10.0f32)) {
            let c = v1.cross(&v2);
            prop_assert!(approx_eq!(f32, c.dot(&v1), 0.0, epsilon = 1e-2));
            prop_assert!(approx_eq!(f32, c.dot(&v2), 0.0, epsilon = 1e-2));
        }

        #[test]
        fn normalize_has_unit_length(v in prop_vector3!(-100.0..100.0f32, -100.0..100.0f32, 1.0..100.0f32)) {
            prop_assert!(approx_eq!(f32, v.normalize().length(), 1.0, epsilon = 1e-5));
        }

        #[test]
        fn coordinate_system_is_orthonormal(v in prop_vector3!(-10.0..10.0f32, -10.0..10.0f32, 0.5..10.0f32)) {
            let v1 = v.normalize();
            let (v2, v3) = v1.coordinate_system();
            prop_assert!(approx_eq!(f32, v1.dot(&v2), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, v1.dot(&v3), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, v2.dot(&v3), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, v2.length(), 1.0, epsilon = 1e-5));
        }

        #[test]
        fn scaling_is_componentwise(v in prop_vector3!(-100.0..100.0f32, -100.0..100.0f32, -100.0..100.0f32),
                                    f in -10.0..10.0f32) {
            prop_assert_eq!(v * f, f * v);
            prop_assert_eq!((v * f).x, f * v.x);
            prop_assert_eq!(-v, Vector3f::new(-v.x, -v.y, -v.z));
        }
    }
}
