//! Surface Interactions

use super::Hit;
use crate::geometry::{Dot, FaceForward, Normal3f, Point2f, Point3f, Ray, ShapeData, Vector3f};
use crate::pbrt::{abs, solve_linear_system_2x2, Float};
use std::fmt;
use std::sync::Arc;

/// SurfaceInteraction represents geometry of a particular point on a surface.
#[derive(Clone)]
pub struct SurfaceInteraction {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Derivatives.
    pub der: Derivatives,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The shape data.
    pub shape_data: Option<Arc<ShapeData>>,

    /// Face index in a triangle mesh where hit occurred.
    pub face_index: usize,
}

impl SurfaceInteraction {
    /// Create a new surface interaction. The geometric normal is
    /// `normalize(dpdu × dpdv)`, flipped if the shape's orientation is
    /// reversed or its transformation swaps handedness, but not both.
    ///
    /// * `p`          - Point of interaction.
    /// * `p_error`    - Floating point error for ray intersection points.
    /// * `uv`         - The uv coordinates from surface parametrization.
    /// * `wo`         - The negative ray direction.
    /// * `dpdu`       - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv`       - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu`       - Differential change ∂n/∂u in surface normal as we move along u.
    /// * `dndv`       - Differential change ∂n/∂v in surface normal as we move along v.
    /// * `time`       - Time when interaction occurred.
    /// * `shape_data` - The shape data.
    /// * `face_index` - The face index in a triangle mesh where hit occurred. Use 0 if not triangle mesh.
    pub fn new(
        p: Point3f,
        p_error: Vector3f,
        uv: Point2f,
        wo: Vector3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        time: Float,
        shape_data: Option<Arc<ShapeData>>,
        face_index: usize,
    ) -> Self {
        let mut n = Normal3f::from(dpdu.cross(&dpdv).normalize());
        if let Some(sd) = shape_data.as_ref() {
            if sd.reverse_orientation ^ sd.transform_swaps_handedness {
                n = -n;
            }
        }

        Self {
            hit: Hit::new(p, time, p_error, wo, n, None),
            uv,
            der: Derivatives {
                dpdu,
                dpdv,
                dndu,
                dndv,
                ..Derivatives::default()
            },
            shading: Shading {
                n,
                dpdu,
                dpdv,
                dndu,
                dndv,
            },
            shape_data,
            face_index,
        }
    }

    /// Updates the shading geometry. The shading normal and the geometric
    /// normal are made to lie in the same hemisphere; which one is flipped
    /// depends on `orientation_is_authoritative`.
    ///
    /// * `dpdu`                         - Shading ∂p/∂u.
    /// * `dpdv`                         - Shading ∂p/∂v.
    /// * `dndu`                         - Shading ∂n/∂u.
    /// * `dndv`                         - Shading ∂n/∂v.
    /// * `orientation_is_authoritative` - If true the shading normal decides.
    pub fn set_shading_geometry(
        &mut self,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        orientation_is_authoritative: bool,
    ) {
        self.shading.n = Normal3f::from(dpdu.cross(&dpdv)).normalize();
        if orientation_is_authoritative {
            self.hit.n = self.hit.n.face_forward(&self.shading.n);
        } else {
            self.shading.n = self.shading.n.face_forward(&self.hit.n);
        }

        self.shading.dpdu = dpdu;
        self.shading.dpdv = dpdv;
        self.shading.dndu = dndu;
        self.shading.dndv = dndv;
    }

    /// Uses the ray's auxilliary rays to estimate the screen space partial
    /// derivatives ∂p/∂x, ∂p/∂y and those of the (u, v) parameterization.
    /// All estimates are zeroed when the ray has no differentials or the
    /// auxilliary rays are parallel to the tangent plane.
    ///
    /// * `ray` - The ray that produced this interaction.
    pub fn compute_differentials(&mut self, ray: &Ray) {
        self.der.dpdx = Vector3f::ZERO;
        self.der.dpdy = Vector3f::ZERO;
        self.der.dudx = 0.0;
        self.der.dvdx = 0.0;
        self.der.dudy = 0.0;
        self.der.dvdy = 0.0;

        let rd = match ray.differentials {
            Some(rd) => rd,
            None => return,
        };

        // Intersect the auxilliary rays with the tangent plane.
        let n = self.hit.n;
        let p = self.hit.p;
        let d = n.dot(&Vector3f::from(p));

        let tx = -(n.dot(&Vector3f::from(rd.rx_origin)) - d) / n.dot(&rd.rx_direction);
        let ty = -(n.dot(&Vector3f::from(rd.ry_origin)) - d) / n.dot(&rd.ry_direction);
        if !tx.is_finite() || !ty.is_finite() {
            return;
        }

        let px = rd.rx_origin + rd.rx_direction * tx;
        let py = rd.ry_origin + rd.ry_direction * ty;
        self.der.dpdx = px - p;
        self.der.dpdy = py - p;

        // Project onto the two axes where the normal is smallest.
        let dim = if abs(n.x) > abs(n.y) && abs(n.x) > abs(n.z) {
            [1, 2]
        } else if abs(n.y) > abs(n.z) {
            [0, 2]
        } else {
            [0, 1]
        };

        let a = [
            [self.der.dpdu[dim[0]], self.der.dpdv[dim[0]]],
            [self.der.dpdu[dim[1]], self.der.dpdv[dim[1]]],
        ];
        let bx = [px[dim[0]] - p[dim[0]], px[dim[1]] - p[dim[1]]];
        let by = [py[dim[0]] - p[dim[0]], py[dim[1]] - p[dim[1]]];

        if let Some((dudx, dvdx)) = solve_linear_system_2x2(&a, &bx) {
            self.der.dudx = dudx;
            self.der.dvdx = dvdx;
        }
        if let Some((dudy, dvdy)) = solve_linear_system_2x2(&a, &by) {
            self.der.dudy = dudy;
            self.der.dvdy = dvdy;
        }
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit.spawn_ray(d)
    }

    /// Spawn's a new ray towards another point.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        self.hit.spawn_ray_to_point(p)
    }

    /// Spawn's a new ray towards another interaction.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        self.hit.spawn_ray_to_hit(hit)
    }
}

/// Shading geometry used for perturbed values for bump mapping.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Surface normal.
    pub n: Normal3f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shading {{ n: {}, dpdu: {}, dpdv: {}, dndu: {}, dndv: {} }}",
            self.n, self.dpdu, self.dpdv, self.dndu, self.dndv,
        )
    }
}

/// Surface interaction derivatives.
#[derive(Copy, Clone, Debug, Default)]
pub struct Derivatives {
    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,

    /// ∂u/∂x
    pub dudx: Float,

    /// ∂u/∂y
    pub dudy: Float,

    /// ∂v/∂x
    pub dvdx: Float,

    /// ∂v/∂y
    pub dvdy: Float,

    /// Partial derivative of the point ∂p/∂x in world space.
    pub dpdx: Vector3f,

    /// Partial derivative of the point ∂p/∂y in world space.
    pub dpdy: Vector3f,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{RayDifferential, Transform};
    use crate::pbrt::INFINITY;
    use float_cmp::approx_eq;

    /// A point on the z = 0 plane parameterized by u = x, v = y.
    fn plane_interaction(shape_data: Option<Arc<ShapeData>>) -> SurfaceInteraction {
        SurfaceInteraction::new(
            Point3f::new(0.5, 0.5, 0.0),
            Vector3f::ZERO,
            Point2f::new(0.5, 0.5),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::ZERO,
            Normal3f::ZERO,
            0.0,
            shape_data,
            0,
        )
    }

    fn shape_data(reverse_orientation: bool, swaps: bool) -> Option<Arc<ShapeData>> {
        let t = Arc::new(Transform::IDENTITY);
        let mut data = ShapeData::new(Arc::clone(&t), t, reverse_orientation);
        data.transform_swaps_handedness = swaps;
        Some(Arc::new(data))
    }

    #[test]
    fn normal_follows_partial_derivatives() {
        let si = plane_interaction(None);
        assert_eq!(si.hit.n, Normal3f::new(0.0, 0.0, 1.0));
        assert_eq!(si.shading.n, si.hit.n);
    }

    #[test]
    fn normal_flips_on_exclusive_or() {
        assert_eq!(plane_interaction(shape_data(true, false)).hit.n.z, -1.0);
        assert_eq!(plane_interaction(shape_data(false, true)).hit.n.z, -1.0);
        assert_eq!(plane_interaction(shape_data(true, true)).hit.n.z, 1.0);
    }

    #[test]
    fn shading_geometry_hemisphere() {
        let mut si = plane_interaction(None);
        let dpdu = Vector3f::new(0.0, 1.0, 0.0);
        let dpdv = Vector3f::new(1.0, 0.0, 0.0);

        si.set_shading_geometry(dpdu, dpdv, Normal3f::ZERO, Normal3f::ZERO, false);
        assert_eq!(si.shading.n.z, 1.0);
        assert_eq!(si.hit.n.z, 1.0);

        si.set_shading_geometry(dpdu, dpdv, Normal3f::ZERO, Normal3f::ZERO, true);
        assert_eq!(si.shading.n.z, -1.0);
        assert_eq!(si.hit.n.z, -1.0);
    }

    #[test]
    fn differentials_absent_are_zero() {
        let mut si = plane_interaction(None);
        si.der.dudx = 3.0;
        let ray = Ray::new(Point3f::new(0.5, 0.5, 1.0), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
        si.compute_differentials(&ray);
        assert_eq!(si.der.dudx, 0.0);
        assert_eq!(si.der.dpdx, Vector3f::ZERO);
    }

    #[test]
    fn differentials_from_offset_rays() {
        let mut si = plane_interaction(None);
        let d = Vector3f::new(0.0, 0.0, -1.0);
        let rd = RayDifferential::new(
            Point3f::new(0.6, 0.5, 1.0),
            Point3f::new(0.5, 0.7, 1.0),
            d,
            d,
        );
        let ray = Ray::new_with_differentials(Point3f::new(0.5, 0.5, 1.0), d, INFINITY, 0.0, rd, None);
        si.compute_differentials(&ray);

        assert!(approx_eq!(f32, si.der.dudx, 0.1, epsilon = 1e-6));
        assert!(approx_eq!(f32, si.der.dvdx, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, si.der.dudy, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, si.der.dvdy, 0.2, epsilon = 1e-6));
    }

    #[test]
    fn parallel_offset_rays_give_zero() {
        let mut si = plane_interaction(None);
        let parallel = Vector3f::new(1.0, 0.0, 0.0);
        let rd = RayDifferential::new(Point3f::new(0.6, 0.5, 1.0), Point3f::new(0.5, 0.7, 1.0), parallel, parallel);
        let ray = Ray::new_with_differentials(
            Point3f::new(0.5, 0.5, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            INFINITY,
            0.0,
            rd,
            None,
        );
        si.compute_differentials(&ray);
        assert_eq!(si.der.dudx, 0.0);
        assert_eq!(si.der.dpdy, Vector3f::ZERO);
    }
}
