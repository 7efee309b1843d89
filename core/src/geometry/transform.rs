//! Transformations

use super::{Bounds3f, Dot, FaceForward, Matrix4x4, Normal3f, Point3f, Ray, RayDifferential, Union, Vector3f};
use crate::interaction::SurfaceInteraction;
use crate::pbrt::{abs, gamma, Float};
use std::hash::{Hash, Hasher};
use std::ops::Mul;
use std::sync::Arc;

/// A transformation for mapping from points to points and vectors to vectors.
/// The inverse matrix is kept alongside so that inverting is free and normals
/// can be transformed by the inverse transpose.
#[derive(Copy, Clone, Debug, Default)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse transformation matrix.
    pub m_inv: Matrix4x4,
}

/// Atomic reference counted `Transform`.
pub type ArcTransform = Arc<Transform>;

impl Transform {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        m: Matrix4x4::IDENTITY,
        m_inv: Matrix4x4::IDENTITY,
    };

    /// Create a transformation from a matrix. Returns `None` if the matrix is
    /// singular.
    ///
    /// * `m` - A matrix representing a transformation.
    pub fn new(m: Matrix4x4) -> Option<Self> {
        m.inverse().map(|m_inv| Self { m, m_inv })
    }

    /// Create a transformation representing a translation.
    ///
    /// * `delta` - Translation.
    #[rustfmt::skip]
    pub fn translate(delta: &Vector3f) -> Self {
        Self {
            m: Matrix4x4::new([
                [1.0, 0.0, 0.0, delta.x],
                [0.0, 1.0, 0.0, delta.y],
                [0.0, 0.0, 1.0, delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0, 0.0, 0.0, -delta.x],
                [0.0, 1.0, 0.0, -delta.y],
                [0.0, 0.0, 1.0, -delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Create a transformation representing a scale. Factors must be non-zero.
    ///
    /// * `x` - Scaling factor in x-axis.
    /// * `y` - Scaling factor in y-axis.
    /// * `z` - Scaling factor in z-axis.
    #[rustfmt::skip]
    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        Self {
            m: Matrix4x4::new([
                [x,   0.0, 0.0, 0.0],
                [0.0, y,   0.0, 0.0],
                [0.0, 0.0, z,   0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0 / x, 0.0,     0.0,     0.0],
                [0.0,     1.0 / y, 0.0,     0.0],
                [0.0,     0.0,     1.0 / z, 0.0],
                [0.0,     0.0,     0.0,     1.0],
            ]),
        }
    }

    /// Rotation about the x-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_x(theta: Float) -> Self {
        let (s, c) = theta.to_radians().sin_cos();
        Self::rotation([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation about the y-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_y(theta: Float) -> Self {
        let (s, c) = theta.to_radians().sin_cos();
        Self::rotation([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Rotation about the z-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_z(theta: Float) -> Self {
        let (s, c) = theta.to_radians().sin_cos();
        Self::rotation([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation about an arbitrary axis.
    ///
    /// * `theta` - Angle in degrees.
    /// * `axis`  - Axis of rotation.
    pub fn rotate_axis(theta: Float, axis: &Vector3f) -> Self {
        let a = axis.normalize();
        let (s, c) = theta.to_radians().sin_cos();
        let t = 1.0 - c;
        Self::rotation([
            [a.x * a.x + (1.0 - a.x * a.x) * c, a.x * a.y * t - a.z * s, a.x * a.z * t + a.y * s],
            [a.x * a.y * t + a.z * s, a.y * a.y + (1.0 - a.y * a.y) * c, a.y * a.z * t - a.x * s],
            [a.x * a.z * t - a.y * s, a.y * a.z * t + a.x * s, a.z * a.z + (1.0 - a.z * a.z) * c],
        ])
    }

    /// Builds a pure rotation; the inverse of an orthonormal matrix is its
    /// transpose.
    fn rotation(r: [[Float; 3]; 3]) -> Self {
        let m = Matrix4x4::new([
            [r[0][0], r[0][1], r[0][2], 0.0],
            [r[1][0], r[1][1], r[1][2], 0.0],
            [r[2][0], r[2][1], r[2][2], 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self {
            m,
            m_inv: m.transpose(),
        }
    }

    /// Returns the world-to-camera transformation for a camera at `pos`
    /// looking at `look`. Returns `None` if `up` is parallel to the viewing
    /// direction.
    ///
    /// * `pos`  - Position of camera.
    /// * `look` - Position to point towards.
    /// * `up`   - Orients the camera around the viewing direction.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Option<Self> {
        let dir = (*look - *pos).normalize();
        let right = up.normalize().cross(&dir);
        if right.length() == 0.0 {
            warn!("look_at: up vector {} and viewing direction {} are parallel", up, dir);
            return None;
        }
        let right = right.normalize();
        let new_up = dir.cross(&right);

        let camera_to_world = Matrix4x4::new([
            [right.x, new_up.x, dir.x, pos.x],
            [right.y, new_up.y, dir.y, pos.y],
            [right.z, new_up.z, dir.z, pos.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        camera_to_world.inverse().map(|m| Self {
            m,
            m_inv: camera_to_world,
        })
    }

    /// Returns the inverse transformation.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns true if the transformation is the identity.
    pub fn is_identity(&self) -> bool {
        self.m == Matrix4x4::IDENTITY
    }

    /// Returns true if any coordinate axis changes length by more than a
    /// small tolerance.
    pub fn has_scale(&self) -> bool {
        let not_one = |v: Vector3f| {
            let l2 = self.transform_vector(&v).length_squared();
            !(0.999..=1.001).contains(&l2)
        };
        not_one(Vector3f::new(1.0, 0.0, 0.0))
            || not_one(Vector3f::new(0.0, 1.0, 0.0))
            || not_one(Vector3f::new(0.0, 0.0, 1.0))
    }

    /// Returns `true` if the transformation changes the handedness of the
    /// coordinate system, i.e. the upper 3x3 has a negative determinant.
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.m;
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        det < 0.0
    }

    /// Applies transformation to a given point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        debug_assert!(wp != 0.0);

        let p = Point3f::new(xp, yp, zp);
        if wp == 1.0 {
            p
        } else {
            p / wp
        }
    }

    /// Returns the transformed point and a conservative bound on the absolute
    /// error introduced by the transformation. Assumes an affine matrix.
    ///
    /// * `p` - The point.
    pub fn transform_point_with_error(&self, p: &Point3f) -> (Point3f, Vector3f) {
        let m = &self.m;
        let abs_sum = |r: usize| abs(m[r][0] * p.x) + abs(m[r][1] * p.y) + abs(m[r][2] * p.z) + abs(m[r][3]);
        let p_error = Vector3f::new(abs_sum(0), abs_sum(1), abs_sum(2)) * gamma(3);
        (self.transform_point(p), p_error)
    }

    /// Transforms a point that already carries error `p_error` and returns
    /// the point and its combined error bound.
    ///
    /// * `p`       - The point.
    /// * `p_error` - Absolute error already present in `p`.
    pub fn transform_point_with_abs_error(&self, p: &Point3f, p_error: &Vector3f) -> (Point3f, Vector3f) {
        let m = &self.m;
        let g3 = gamma(3);
        let err = |r: usize| {
            (g3 + 1.0) * (abs(m[r][0]) * p_error.x + abs(m[r][1]) * p_error.y + abs(m[r][2]) * p_error.z)
                + g3 * (abs(m[r][0] * p.x) + abs(m[r][1] * p.y) + abs(m[r][2] * p.z) + abs(m[r][3]))
        };
        (self.transform_point(p), Vector3f::new(err(0), err(1), err(2)))
    }

    /// Applies transformation to a given vector. Translation is ignored.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Returns the transformed vector and a conservative bound on its
    /// absolute error.
    ///
    /// * `v` - The vector.
    pub fn transform_vector_with_error(&self, v: &Vector3f) -> (Vector3f, Vector3f) {
        let m = &self.m;
        let abs_sum = |r: usize| abs(m[r][0] * v.x) + abs(m[r][1] * v.y) + abs(m[r][2] * v.z);
        let v_error = Vector3f::new(abs_sum(0), abs_sum(1), abs_sum(2)) * gamma(3);
        (self.transform_vector(v), v_error)
    }

    /// Applies transformation to a given normal using the inverse transpose
    /// so that it stays perpendicular to transformed tangents.
    ///
    /// * `n` - The normal.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let mi = &self.m_inv;
        Normal3f::new(
            mi[0][0] * n.x + mi[1][0] * n.y + mi[2][0] * n.z,
            mi[0][1] * n.x + mi[1][1] * n.y + mi[2][1] * n.z,
            mi[0][2] * n.x + mi[1][2] * n.y + mi[2][2] * n.z,
        )
    }

    fn transform_differentials(&self, r: &Ray) -> Option<RayDifferential> {
        r.differentials.map(|rd| {
            RayDifferential::new(
                self.transform_point(&rd.rx_origin),
                self.transform_point(&rd.ry_origin),
                self.transform_vector(&rd.rx_direction),
                self.transform_vector(&rd.ry_direction),
            )
        })
    }

    /// Applies transformation to a given ray. The origin is pushed to the
    /// edge of its error bounds along the direction and `t_max` shortened by
    /// the same amount so the ray does not reach past its original end.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let (mut o, o_error) = self.transform_point_with_error(&r.o);
        let d = self.transform_vector(&r.d);

        let mut t_max = r.t_max;
        let length_squared = d.length_squared();
        if length_squared > 0.0 {
            let dt = d.abs().dot(&o_error) / length_squared;
            o += d * dt;
            t_max -= dt;
        }

        Ray {
            o,
            d,
            t_max,
            time: r.time,
            differentials: self.transform_differentials(r),
            medium: r.medium.clone(),
        }
    }

    /// Applies transformation to a ray and returns it with the absolute
    /// errors of its origin and direction. The origin is offset like
    /// `transform_ray()` but `t_max` is kept, since the caller compares
    /// against it with the returned error bounds.
    ///
    /// * `r` - The ray.
    pub fn transform_ray_with_error(&self, r: &Ray) -> (Ray, Vector3f, Vector3f) {
        let (mut o, o_error) = self.transform_point_with_error(&r.o);
        let (d, d_error) = self.transform_vector_with_error(&r.d);

        let length_squared = d.length_squared();
        if length_squared > 0.0 {
            let dt = d.abs().dot(&o_error) / length_squared;
            o += d * dt;
        }

        let tr = Ray {
            o,
            d,
            t_max: r.t_max,
            time: r.time,
            differentials: self.transform_differentials(r),
            medium: r.medium.clone(),
        };
        (tr, o_error, d_error)
    }

    /// Applies transformation to a bounding box by transforming all eight
    /// corners.
    ///
    /// * `b` - The bounding box.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        (1..8).fold(Bounds3f::from(self.transform_point(&b.corner(0))), |acc, i| {
            acc.union(&self.transform_point(&b.corner(i)))
        })
    }

    /// Applies transformation to a surface interaction. The point error is
    /// propagated and the shading normal is kept in the hemisphere of the
    /// transformed geometric normal.
    ///
    /// * `si` - The surface interaction.
    pub fn transform_surface_interaction(&self, si: &SurfaceInteraction) -> SurfaceInteraction {
        let (p, p_error) = self.transform_point_with_abs_error(&si.hit.p, &si.hit.p_error);

        let mut ret = si.clone();
        ret.hit.p = p;
        ret.hit.p_error = p_error;
        ret.hit.n = self.transform_normal(&si.hit.n).normalize();
        ret.hit.wo = self.transform_vector(&si.hit.wo);
        if ret.hit.wo != Vector3f::ZERO {
            ret.hit.wo = ret.hit.wo.normalize();
        }

        ret.der.dpdu = self.transform_vector(&si.der.dpdu);
        ret.der.dpdv = self.transform_vector(&si.der.dpdv);
        ret.der.dndu = self.transform_normal(&si.der.dndu);
        ret.der.dndv = self.transform_normal(&si.der.dndv);
        ret.der.dpdx = self.transform_vector(&si.der.dpdx);
        ret.der.dpdy = self.transform_vector(&si.der.dpdy);

        ret.shading.n = self
            .transform_normal(&si.shading.n)
            .normalize()
            .face_forward(&ret.hit.n);
        ret.shading.dpdu = self.transform_vector(&si.shading.dpdu);
        ret.shading.dpdv = self.transform_vector(&si.shading.dpdv);
        ret.shading.dndu = self.transform_normal(&si.shading.dndu);
        ret.shading.dndv = self.transform_normal(&si.shading.dndv);

        ret
    }
}

impl Mul for Transform {
    type Output = Self;

    /// Composes two transformations. The result applies `rhs` first and then
    /// `self`.
    ///
    /// * `rhs` - The transformation to compose.
    fn mul(self, rhs: Self) -> Self {
        Self {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
    }
}

impl Eq for Transform {}

impl Hash for Transform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for row in self.m.m.iter() {
            for v in row.iter() {
                // -0.0 == 0.0 so both must hash alike.
                (v + 0.0).to_bits().hash(state);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2f;
    use crate::pbrt::INFINITY;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn assert_point_near(a: Point3f, b: Point3f, eps: Float) {
        assert!(approx_eq!(f32, a.x, b.x, epsilon = eps), "{} != {}", a, b);
        assert!(approx_eq!(f32, a.y, b.y, epsilon = eps), "{} != {}", a, b);
        assert!(approx_eq!(f32, a.z, b.z, epsilon = eps), "{} != {}", a, b);
    }

    #[test]
    fn translate_moves_points_not_vectors() {
        let t = Transform::translate(&Vector3f::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(&Point3f::ZERO), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(&Vector3f::new(1.0, 0.0, 0.0)), Vector3f::new(1.0, 0.0, 0.0));
        assert!(!t.has_scale());
        assert!(!t.swaps_handedness());
    }

    #[test]
    fn scale_properties() {
        let t = Transform::scale(2.0, 2.0, 2.0);
        assert!(t.has_scale());
        assert!(!t.swaps_handedness());
        assert!(Transform::scale(1.0, 1.0, -1.0).swaps_handedness());
        assert!(Transform::IDENTITY.is_identity());
        assert!(!t.is_identity());
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let t = Transform::rotate_z(90.0);
        assert_point_near(t.transform_point(&Point3f::new(1.0, 0.0, 0.0)), Point3f::new(0.0, 1.0, 0.0), 1e-6);
        let a = Transform::rotate_axis(90.0, &Vector3f::new(0.0, 0.0, 1.0));
        assert_point_near(a.transform_point(&Point3f::new(1.0, 0.0, 0.0)), Point3f::new(0.0, 1.0, 0.0), 1e-6);
        assert!(!t.has_scale());
    }

    #[test]
    fn normals_stay_perpendicular_under_non_uniform_scale() {
        let t = Transform::scale(1.0, 4.0, 1.0);
        let tangent = Vector3f::new(1.0, -1.0, 0.0);
        let n = Normal3f::new(1.0, 1.0, 0.0);
        let tt = t.transform_vector(&tangent);
        let tn = t.transform_normal(&n);
        assert!(approx_eq!(f32, tt.dot(&tn), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn composition_order() {
        let t = Transform::translate(&Vector3f::new(1.0, 0.0, 0.0)) * Transform::scale(2.0, 2.0, 2.0);
        assert_eq!(t.transform_point(&Point3f::new(1.0, 1.0, 1.0)), Point3f::new(3.0, 2.0, 2.0));
        let back = t.inverse().transform_point(&Point3f::new(3.0, 2.0, 2.0));
        assert_point_near(back, Point3f::new(1.0, 1.0, 1.0), 1e-6);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        assert!(Transform::new(Matrix4x4::new([[0.0; 4]; 4])).is_none());
        assert!(Transform::new(Matrix4x4::IDENTITY).is_some());
    }

    #[test]
    fn look_at_maps_camera_to_origin() {
        let pos = Point3f::new(0.0, 0.0, -5.0);
        let t = Transform::look_at(&pos, &Point3f::ZERO, &Vector3f::new(0.0, 1.0, 0.0)).unwrap();
        assert_point_near(t.transform_point(&pos), Point3f::ZERO, 1e-6);
        assert_point_near(t.transform_point(&Point3f::ZERO), Point3f::new(0.0, 0.0, 5.0), 1e-6);

        assert!(Transform::look_at(&pos, &Point3f::ZERO, &Vector3f::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn bounds_enclose_rotated_box() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let tb = Transform::rotate_z(45.0).transform_bounds(&b);
        assert!(approx_eq!(f32, tb.p_max.x, Float::sqrt(2.0), epsilon = 1e-5));
        assert!(approx_eq!(f32, tb.p_min.y, -Float::sqrt(2.0), epsilon = 1e-5));
        assert_eq!(tb.p_max.z, 1.0);
    }

    #[test]
    fn ray_with_error_keeps_t_max() {
        let t = Transform::translate(&Vector3f::new(10.0, 0.0, 0.0));
        let r = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 7.0, 0.25, None);

        let (tr, o_error, d_error) = t.transform_ray_with_error(&r);
        assert_eq!(tr.t_max, 7.0);
        assert_eq!(tr.time, 0.25);
        assert!(o_error.x > 0.0);
        assert_eq!(d_error.x, 0.0);
        assert!(d_error.z > 0.0);
        assert!(tr.o.z >= -5.0);

        let tr = t.transform_ray(&r);
        assert!(tr.t_max <= 7.0);
        assert!(!tr.has_differentials());
    }

    #[test]
    fn surface_interaction_is_moved() {
        let si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::ZERO,
            Point2f::new(0.25, 0.5),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::ZERO,
            Normal3f::ZERO,
            0.0,
            None,
            0,
        );
        let t = Transform::translate(&Vector3f::new(0.0, 0.0, 2.0)) * Transform::scale(3.0, 3.0, 3.0);
        let tsi = t.transform_surface_interaction(&si);
        assert_eq!(tsi.hit.p, Point3f::new(0.0, 0.0, 5.0));
        assert!(tsi.hit.p_error.z > 0.0);
        assert_eq!(tsi.hit.n, Normal3f::new(0.0, 0.0, 1.0));
        assert_eq!(tsi.uv, si.uv);
        assert_eq!(tsi.der.dpdu, Vector3f::new(3.0, 0.0, 0.0));
        assert!(tsi.shading.n.dot(&tsi.hit.n) > 0.0);
    }

    proptest! {
        #[test]
        fn inverse_round_trips_points(
            p in prop_point3!(-100.0..100.0f32, -100.0..100.0f32, -100.0..100.0f32),
            angle in -360.0..360.0f32,
            delta in prop_vector3!(-10.0..10.0f32, -10.0..10.0f32, -10.0..10.0f32),
        ) {
            let t = Transform::translate(&delta) * Transform::rotate_y(angle);
            let back = t.inverse().transform_point(&t.transform_point(&p));
            prop_assert!(approx_eq!(f32, back.x, p.x, epsilon = 1e-3));
            prop_assert!(approx_eq!(f32, back.y, p.y, epsilon = 1e-3));
            prop_assert!(approx_eq!(f32, back.z, p.z, epsilon = 1e-3));
        }

        #[test]
        fn point_error_bounds_contain_exact_result(
            p in prop_point3!(-100.0..100.0f32, -100.0..100.0f32, -100.0..100.0f32),
            angle in -360.0..360.0f32,
        ) {
            let t = Transform::rotate_x(angle);
            let (tp, err) = t.transform_point_with_error(&p);

            // Same computation in f64.
            let m = &t.m;
            for r in 0..3 {
                let exact = m[r][0] as f64 * p.x as f64 + m[r][1] as f64 * p.y as f64 + m[r][2] as f64 * p.z as f64 + m[r][3] as f64;
                prop_assert!((tp[r] as f64 - exact).abs() <= err[r] as f64);
            }
        }

        #[test]
        fn transformed_rays_keep_infinite_extent(
            o in prop_point3!(-10.0..10.0f32, -10.0..10.0f32, -10.0..10.0f32),
            d in prop_vector3!(-1.0..1.0f32, -1.0..1.0f32, 0.1..1.0f32),
        ) {
            let r = Ray::new(o, d, INFINITY, 0.0, None);
            let tr = Transform::scale(2.0, 2.0, 2.0).transform_ray(&r);
            prop_assert_eq!(tr.t_max, INFINITY);
        }
    }
}
