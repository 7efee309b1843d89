//! Common

use crate::pbrt::abs;
use num_traits::{Num, Zero};
use std::ops::Neg;

/// Dot product trait.
pub trait Dot<V> {
    type Output: Num + Zero + Neg<Output = Self::Output> + PartialOrd + Copy;

    /// Returns the dot product.
    ///
    /// * `other` - The other vector/normal.
    fn dot(&self, other: &V) -> Self::Output;

    /// Returns the absolute value of dot product.
    ///
    /// * `other` - The other vector/normal.
    fn abs_dot(&self, other: &V) -> Self::Output {
        abs(self.dot(other))
    }
}

/// FaceForward trait allows pointing vectors in the same hemisphere as
/// another normal/vector.
pub trait FaceForward<T, V>
where
    T: Num + Zero + Neg<Output = T> + PartialOrd + Copy,
    Self: Dot<V, Output = T> + Neg<Output = Self> + Sized + Copy,
{
    /// If the vector/normal is not in the same hemisphere as another,
    /// return flipped vector/normal. Otherwise, return itself.
    ///
    /// * `other` - The other vector.
    fn face_forward(&self, other: &V) -> Self {
        if self.dot(other) < T::zero() {
            -*self
        } else {
            *self
        }
    }
}

/// Union trait allows union between two objects.
pub trait Union<T> {
    /// Return the result of a union with an another object of type `T`.
    ///
    /// * `other` - The other object.
    fn union(&self, other: &T) -> Self;
}

/// Intersect trait allows intersection between objects.
pub trait Intersect<T> {
    /// Return the result of an intersection with an another object of type `T`.
    ///
    /// * `other` - The other object.
    fn intersect(&self, other: &T) -> Self;
}

/// Generates the scaling, negation, indexing and formatting operators shared
/// by the 3-D tuple types (points, vectors and normals). The type must have a
/// `new(x, y, z)` constructor.
macro_rules! tuple3_ops {
    ($name: ident) => {
        impl<T: num_traits::Num + Copy> std::ops::Mul<T> for $name<T> {
            type Output = Self;

            /// Scale by `f`.
            fn mul(self, f: T) -> Self::Output {
                Self::new(f * self.x, f * self.y, f * self.z)
            }
        }

        impl<T: num_traits::Num + Copy> std::ops::MulAssign<T> for $name<T> {
            fn mul_assign(&mut self, f: T) {
                *self = *self * f;
            }
        }

        impl<T: num_traits::Num + Copy> std::ops::Div<T> for $name<T> {
            type Output = Self;

            /// Scale by 1/f.
            fn div(self, f: T) -> Self::Output {
                debug_assert!(!f.is_zero());

                let inv = T::one() / f;
                Self::new(inv * self.x, inv * self.y, inv * self.z)
            }
        }

        impl<T: num_traits::Num + Copy> std::ops::DivAssign<T> for $name<T> {
            fn div_assign(&mut self, f: T) {
                *self = *self / f;
            }
        }

        impl<T: num_traits::Num + std::ops::Neg<Output = T> + Copy> std::ops::Neg for $name<T> {
            type Output = Self;

            fn neg(self) -> Self::Output {
                Self::new(-self.x, -self.y, -self.z)
            }
        }

        impl std::ops::Mul<$name<f32>> for f32 {
            type Output = $name<f32>;

            fn mul(self, v: $name<f32>) -> $name<f32> {
                $name::new(self * v.x, self * v.y, self * v.z)
            }
        }

        impl std::ops::Mul<$name<f64>> for f64 {
            type Output = $name<f64>;

            fn mul(self, v: $name<f64>) -> $name<f64> {
                $name::new(self * v.x, self * v.y, self * v.z)
            }
        }

        impl<T> std::ops::Index<$crate::pbrt::Axis> for $name<T> {
            type Output = T;

            fn index(&self, axis: $crate::pbrt::Axis) -> &Self::Output {
                match axis {
                    $crate::pbrt::Axis::X => &self.x,
                    $crate::pbrt::Axis::Y => &self.y,
                    $crate::pbrt::Axis::Z => &self.z,
                }
            }
        }

        impl<T> std::ops::IndexMut<$crate::pbrt::Axis> for $name<T> {
            fn index_mut(&mut self, axis: $crate::pbrt::Axis) -> &mut Self::Output {
                match axis {
                    $crate::pbrt::Axis::X => &mut self.x,
                    $crate::pbrt::Axis::Y => &mut self.y,
                    $crate::pbrt::Axis::Z => &mut self.z,
                }
            }
        }

        impl<T> std::ops::Index<usize> for $name<T> {
            type Output = T;

            fn index(&self, i: usize) -> &Self::Output {
                &self[$crate::pbrt::Axis::from(i)]
            }
        }

        impl<T> std::ops::IndexMut<usize> for $name<T> {
            fn index_mut(&mut self, i: usize) -> &mut Self::Output {
                &mut self[$crate::pbrt::Axis::from(i)]
            }
        }

        impl<T: std::fmt::Display> std::fmt::Display for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
            }
        }
    };
}
