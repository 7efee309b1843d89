//! 3-D Axis Aligned Bounding Boxes.

use super::{Intersect, Point3, Point3f, Ray, Union, Vector3, Vector3f};
use crate::pbrt::{gamma, lerp, max, min, Float};
use num_traits::Num;
use std::ops::Index;

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T> {
    /// Minimum bounds.
    pub p_min: Point3<T>,

    /// Maximum bounds.
    pub p_max: Point3<T>,
}

/// 3-D bounding box containing `Float` points.
pub type Bounds3f = Bounds3<Float>;

impl Bounds3f {
    /// An inverted box that any union overrides; `is_empty()` is true for it.
    /// The corners are the largest and lowest finite values so the center
    /// stays finite.
    pub const EMPTY: Self = Self {
        p_min: Point3f {
            x: Float::MAX,
            y: Float::MAX,
            z: Float::MAX,
        },
        p_max: Point3f {
            x: Float::MIN,
            y: Float::MIN,
            z: Float::MIN,
        },
    };
}

impl<T: Num + PartialOrd + Copy> Bounds3<T> {
    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// of each coordinate are used so the points may be given in any order.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3<T>, p2: Point3<T>) -> Self {
        Self {
            p_min: Point3::new(min(p1.x, p2.x), min(p1.y, p2.y), min(p1.z, p2.z)),
            p_max: Point3::new(max(p1.x, p2.x), max(p1.y, p2.y), max(p1.z, p2.z)),
        }
    }

    /// Returns the vector from the minimum to maximum corner.
    pub fn diagonal(&self) -> Vector3<T> {
        self.p_max - self.p_min
    }

    /// Returns true if the box has no volume on some axis in the sense that
    /// a minimum exceeds its maximum.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the coordinates of one of the eight corners. Bit 0 of `corner`
    /// selects x, bit 1 selects y and bit 2 selects z.
    ///
    /// * `corner` - Corner index in `0..8`.
    pub fn corner(&self, corner: usize) -> Point3<T> {
        debug_assert!(corner < 8);
        Point3::new(
            self[corner & 1].x,
            self[(corner >> 1) & 1].y,
            self[(corner >> 2) & 1].z,
        )
    }

    /// Returns true if the two boxes overlap.
    ///
    /// * `other` - The other bounding box.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.p_max.x >= other.p_min.x
            && self.p_min.x <= other.p_max.x
            && self.p_max.y >= other.p_min.y
            && self.p_min.y <= other.p_max.y
            && self.p_max.z >= other.p_min.z
            && self.p_min.z <= other.p_max.z
    }

    /// Returns true if a point is inside the box, boundary included.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point3<T>) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns the box padded by `delta` on every side.
    ///
    /// * `delta` - Padding.
    pub fn expand(&self, delta: T) -> Self {
        let d = Vector3::new(delta, delta, delta);
        Self {
            p_min: self.p_min - d,
            p_max: self.p_max + d,
        }
    }
}

impl Bounds3f {
    /// Returns the surface area of the six faces.
    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the volume.
    pub fn volume(&self) -> Float {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Returns the index of the longest axis.
    pub fn maximum_extent(&self) -> usize {
        self.diagonal().max_dimension()
    }

    /// Linearly interpolates between the corners per axis.
    ///
    /// * `t` - Interpolation parameter per axis.
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
            lerp(t.z, self.p_min.z, self.p_max.z),
        )
    }

    /// Returns the position of a point relative to the box corners; the
    /// minimum corner maps to `(0, 0, 0)` and the maximum to `(1, 1, 1)`.
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        for axis in 0..3 {
            if self.p_max[axis] > self.p_min[axis] {
                o[axis] /= self.p_max[axis] - self.p_min[axis];
            }
        }
        o
    }

    /// Returns the center and radius of a sphere enclosing the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = (self.p_min + self.p_max) * 0.5;
        let radius = if self.contains(&center) {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    /// Slab test against a ray restricted to `[0, ray.t_max]`. Returns the
    /// parametric entry and exit distances, or `None` if the ray misses.
    /// The exit distance is grown by `1 + 2·gamma(3)` so rays grazing an edge
    /// are not lost to rounding.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = 0.0;
        let mut t1 = ray.t_max;

        for axis in 0..3 {
            let inv_ray_dir = 1.0 / ray.d[axis];
            let mut t_near = (self.p_min[axis] - ray.o[axis]) * inv_ray_dir;
            let mut t_far = (self.p_max[axis] - ray.o[axis]) * inv_ray_dir;
            if inv_ray_dir < 0.0 {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            t_far *= 1.0 + 2.0 * gamma(3);

            // Written so that a NaN slab distance leaves the interval alone.
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }

    /// Slab test using a precomputed reciprocal direction and per-axis sign
    /// flags. Accepts and rejects exactly the rays `intersect_p()` does.
    ///
    /// * `ray`        - The ray.
    /// * `inv_dir`    - Reciprocal of the ray direction per axis.
    /// * `dir_is_neg` - 1 for each axis where `inv_dir` is negative, else 0.
    pub fn intersect_p_inv(&self, ray: &Ray, inv_dir: &Vector3f, dir_is_neg: [u8; 3]) -> bool {
        let mut t0 = 0.0;
        let mut t1 = ray.t_max;

        for axis in 0..3 {
            let near = dir_is_neg[axis] as usize;
            let t_near = (self[near][axis] - ray.o[axis]) * inv_dir[axis];
            let t_far = (self[1 - near][axis] - ray.o[axis]) * inv_dir[axis];
            let t_far = t_far * (1.0 + 2.0 * gamma(3));

            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return false;
            }
        }

        true
    }
}

impl<T> Index<usize> for Bounds3<T> {
    type Output = Point3<T>;

    /// Index 0 is the minimum corner and 1 the maximum corner.
    ///
    /// * `i` - 0 or 1.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.p_min,
            1 => &self.p_max,
            _ => panic!("Invalid index {} for Bounds3", i),
        }
    }
}

impl<T: Num + PartialOrd + Copy> From<Point3<T>> for Bounds3<T> {
    /// Use a 3-D point as minimum and maximum 3-D bounds.
    ///
    /// * `p` - 3-D point.
    fn from(p: Point3<T>) -> Self {
        Self { p_min: p, p_max: p }
    }
}

impl<T: Num + PartialOrd + Copy> Union<Point3<T>> for Bounds3<T> {
    /// Return a bounding box that also encloses a point.
    ///
    /// * `p` - The point.
    fn union(&self, p: &Point3<T>) -> Self {
        Self {
            p_min: Point3::new(min(self.p_min.x, p.x), min(self.p_min.y, p.y), min(self.p_min.z, p.z)),
            p_max: Point3::new(max(self.p_max.x, p.x), max(self.p_max.y, p.y), max(self.p_max.z, p.z)),
        }
    }
}

impl<T: Num + PartialOrd + Copy> Union<Bounds3<T>> for Bounds3<T> {
    /// Return a bounding box enclosing both boxes.
    ///
    /// * `other` - The other bounding box.
    fn union(&self, other: &Self) -> Self {
        self.union(&other.p_min).union(&other.p_max)
    }
}

impl<T: Num + PartialOrd + Copy> Intersect<Bounds3<T>> for Bounds3<T> {
    /// Return the overlap of two boxes. The result is empty if they do not
    /// overlap.
    ///
    /// * `other` - The other bounding box.
    fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: Point3::new(
                max(self.p_min.x, other.p_min.x),
                max(self.p_min.y, other.p_min.y),
                max(self.p_min.z, other.p_min.z),
            ),
            p_max: Point3::new(
                min(self.p_max.x, other.p_max.x),
                min(self.p_max.y, other.p_max.y),
                min(self.p_max.z, other.p_max.z),
            ),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
