//! Spheres

use pbr_core::efloat::*;
use pbr_core::geometry::*;
use pbr_core::interaction::*;
use pbr_core::paramset::*;
use pbr_core::pbrt::*;
use pbr_core::sampling::*;
use std::sync::Arc;

/// A sphere centered at the object space origin, optionally truncated in z
/// and swept through less than a full turn in φ.
#[derive(Clone)]
pub struct Sphere {
    /// Common shape data.
    pub data: Arc<ShapeData>,

    /// Radius of sphere.
    pub radius: Float,

    /// Minimum z-value to truncate sphere.
    pub z_min: Float,

    /// Maximum z-value to truncate sphere.
    pub z_max: Float,

    /// Minimum spherical coordinate for θ.
    pub theta_min: Float,

    /// Maximum spherical coordinate for θ.
    pub theta_max: Float,

    /// Maximum spherical coordinate for Φ in radians.
    pub phi_max: Float,
}

/// An accepted root of the ray-sphere quadratic in object space.
struct ObjectHit {
    /// The object space ray.
    ray: Ray,

    /// Ray parameter of the hit.
    t: EFloat,

    /// Hit point, reprojected onto the surface.
    p: Point3f,

    /// Azimuth of the hit point in [0, 2π).
    phi: Float,
}

impl Sphere {
    /// Create a new sphere. The z-limits are sorted and clamped to
    /// `[-radius, radius]` and `phi_max` is clamped to `[0, 360]` degrees.
    /// A zero radius is undefined. A sphere with `phi_max == 0` or equal
    /// z-limits has no area and is never hit.
    ///
    /// * `object_to_world`     - The object to world transfomation.
    /// * `world_to_object`     - The world to object transfomation.
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default
    /// * `radius`              - Radius of sphere.
    /// * `z_min`               - Minimum z-value to truncate sphere.
    /// * `z_max`               - Maximum z-value to truncate sphere.
    /// * `phi_max`             - Maximum spherical coordinate for Φ in degrees.
    pub fn new(
        object_to_world: ArcTransform,
        world_to_object: ArcTransform,
        reverse_orientation: bool,
        radius: Float,
        z_min: Float,
        z_max: Float,
        phi_max: Float,
    ) -> Self {
        let (lo, hi) = (min(z_min, z_max), max(z_min, z_max));
        let theta = |z: Float| clamp(z / radius, -1.0, 1.0).acos();
        Self {
            data: Arc::new(ShapeData::new(object_to_world, world_to_object, reverse_orientation)),
            radius,
            z_min: clamp(lo, -radius, radius),
            z_max: clamp(hi, -radius, radius),
            theta_min: theta(lo),
            theta_max: theta(hi),
            phi_max: clamp(phi_max, 0.0, 360.0).to_radians(),
        }
    }

    /// Evaluates the object space ray at `t` and returns the point projected
    /// back onto the surface along with its azimuth.
    fn surface_point(&self, ray: &Ray, t: EFloat) -> (Point3f, Float) {
        let mut p = ray.at(t.value());
        p *= self.radius / p.distance(&Point3f::ZERO);

        // φ is undefined on the z-axis.
        if p.x == 0.0 && p.y == 0.0 {
            p.x = 1e-5 * self.radius;
        }

        let phi = atan2(p.y, p.x);
        (p, if phi < 0.0 { phi + TWO_PI } else { phi })
    }

    /// Returns `true` if the point falls outside the z range or φ sweep.
    fn is_clipped(&self, p: &Point3f, phi: Float) -> bool {
        (self.z_min > -self.radius && p.z < self.z_min)
            || (self.z_max < self.radius && p.z > self.z_max)
            || phi > self.phi_max
    }

    /// Finds the nearest admissible root for a world space ray. Roots must lie
    /// in `(0, t_max)` conservatively and survive clipping.
    ///
    /// * `r` - The ray in world space.
    fn nearest_hit(&self, r: &Ray) -> Option<ObjectHit> {
        if self.phi_max == 0.0 || self.theta_max == self.theta_min {
            return None;
        }

        let (ray, o_err, d_err) = self.data.world_to_object.transform_ray_with_error(r);

        let ox = EFloat::new(ray.o.x, o_err.x);
        let oy = EFloat::new(ray.o.y, o_err.y);
        let oz = EFloat::new(ray.o.z, o_err.z);
        let dx = EFloat::new(ray.d.x, d_err.x);
        let dy = EFloat::new(ray.d.y, d_err.y);
        let dz = EFloat::new(ray.d.z, d_err.z);
        let radius = EFloat::from(self.radius);

        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - radius * radius;

        let (t0, t1) = Quadratic::solve_efloat(a, b, c)?;
        if t0.upper_bound() > ray.t_max || t1.lower_bound() <= 0.0 {
            return None;
        }

        let mut t = t0;
        if t.lower_bound() <= 0.0 {
            t = t1;
            if t.upper_bound() > ray.t_max {
                return None;
            }
        }

        let (mut p, mut phi) = self.surface_point(&ray, t);
        if self.is_clipped(&p, phi) {
            if t == t1 || t1.upper_bound() > ray.t_max {
                return None;
            }
            t = t1;
            (p, phi) = self.surface_point(&ray, t);
            if self.is_clipped(&p, phi) {
                return None;
            }
        }

        Some(ObjectHit { ray, t, p, phi })
    }
}

impl Shape for Sphere {
    fn get_type(&self) -> &'static str {
        "sphere"
    }

    fn get_data(&self) -> Arc<ShapeData> {
        Arc::clone(&self.data)
    }

    fn object_bound(&self) -> Bounds3f {
        Bounds3f::new(
            Point3f::new(-self.radius, -self.radius, self.z_min),
            Point3f::new(self.radius, self.radius, self.z_max),
        )
    }

    /// Returns the nearest hit in `(0, r.t_max)`, or `None`.
    ///
    /// * `r`                  - The ray in world space.
    /// * `test_alpha_texture` - Perform alpha texture tests (not supported).
    fn intersect(&self, r: &Ray, _test_alpha_texture: bool) -> Option<Intersection> {
        let ObjectHit { ray, t, p, phi } = self.nearest_hit(r)?;

        // Parametric representation of the hit.
        let u = phi / self.phi_max;
        let theta = clamp(p.z / self.radius, -1.0, 1.0).acos();
        let theta_range = self.theta_max - self.theta_min;
        let v = (theta - self.theta_min) / theta_range;

        let inv_z_radius = 1.0 / (p.x * p.x + p.y * p.y).sqrt();
        let (cos_phi, sin_phi) = (p.x * inv_z_radius, p.y * inv_z_radius);
        let dpdu = Vector3f::new(-self.phi_max * p.y, self.phi_max * p.x, 0.0);
        let dpdv = theta_range * Vector3f::new(p.z * cos_phi, p.z * sin_phi, -self.radius * theta.sin());

        // Second derivatives for the Weingarten equations.
        let d2p_duu = -self.phi_max * self.phi_max * Vector3f::new(p.x, p.y, 0.0);
        let d2p_duv = theta_range * p.z * self.phi_max * Vector3f::new(-sin_phi, cos_phi, 0.0);
        let d2p_dvv = -theta_range * theta_range * Vector3f::from(p);

        let n = dpdu.cross(&dpdv).normalize();
        let (e1, f1, g1) = (dpdu.dot(&dpdu), dpdu.dot(&dpdv), dpdv.dot(&dpdv));
        let (e2, f2, g2) = (n.dot(&d2p_duu), n.dot(&d2p_duv), n.dot(&d2p_dvv));

        let inv_egf = 1.0 / (e1 * g1 - f1 * f1);
        let dndu = Normal3f::from(
            (f2 * f1 - e2 * g1) * inv_egf * dpdu + (e2 * f1 - f2 * e1) * inv_egf * dpdv,
        );
        let dndv = Normal3f::from(
            (g2 * f1 - f2 * g1) * inv_egf * dpdu + (f2 * f1 - g2 * e1) * inv_egf * dpdv,
        );

        let p_error = gamma(5) * Vector3f::from(p.abs());

        let si = SurfaceInteraction::new(
            p,
            p_error,
            Point2f::new(u, v),
            -ray.d,
            dpdu,
            dpdv,
            dndu,
            dndv,
            ray.time,
            Some(Arc::clone(&self.data)),
            0,
        );
        let isect = self.data.object_to_world.transform_surface_interaction(&si);

        Some(Intersection::new(t.value(), isect))
    }

    /// Same acceptance as `intersect` without building the surface
    /// interaction.
    ///
    /// * `r`                  - The ray in world space.
    /// * `test_alpha_texture` - Perform alpha texture tests (not supported).
    fn intersect_p(&self, r: &Ray, _test_alpha_texture: bool) -> bool {
        self.nearest_hit(r).is_some()
    }

    fn area(&self) -> Float {
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }

    /// Samples a point uniformly over the full sphere. Partial spheres are
    /// not accounted for.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let mut p_obj = Point3f::ZERO + self.radius * uniform_sample_sphere(u);

        let o2w = &self.data.object_to_world;
        let mut n = o2w.transform_normal(&Normal3f::from(Vector3f::from(p_obj))).normalize();
        if self.data.reverse_orientation {
            n = -n;
        }

        p_obj *= self.radius / p_obj.distance(&Point3f::ZERO);
        let p_obj_error = gamma(5) * Vector3f::from(p_obj.abs());
        let (p, p_error) = o2w.transform_point_with_abs_error(&p_obj, &p_obj_error);

        (Hit::new(p, 0.0, p_error, Vector3f::ZERO, n, None), 1.0 / self.area())
    }
}

impl From<(&ParamSet, ArcTransform, ArcTransform, bool)> for Sphere {
    /// Create a `Sphere` from a parameter set, the object to world and world
    /// to object transforms, and whether normals are reversed.
    ///
    /// Recognized parameters: `radius` (1), `zmin` (-radius), `zmax`
    /// (radius) and `phimax` (360).
    fn from(p: (&ParamSet, ArcTransform, ArcTransform, bool)) -> Self {
        let (params, o2w, w2o, reverse_orientation) = p;

        let radius = params.find_one_float("radius", 1.0);
        let z_min = params.find_one_float("zmin", -radius);
        let z_max = params.find_one_float("zmax", radius);
        let phi_max = params.find_one_float("phimax", 360.0);

        if z_min > z_max {
            warn!("Sphere zmin {} exceeds zmax {}; swapping.", z_min, z_max);
        }
        if !(0.0..=360.0).contains(&phi_max) {
            warn!("Sphere phimax {} outside [0, 360]; clamping.", phi_max);
        }

        Self::new(o2w, w2o, reverse_orientation, radius, z_min, z_max, phi_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn placed(o2w: Transform, radius: Float, z_min: Float, z_max: Float, phi_max: Float) -> Sphere {
        let w2o = Arc::new(o2w.inverse());
        Sphere::new(Arc::new(o2w), w2o, false, radius, z_min, z_max, phi_max)
    }

    fn unit(z_min: Float, z_max: Float, phi_max: Float) -> Sphere {
        placed(Transform::IDENTITY, 1.0, z_min, z_max, phi_max)
    }

    fn ray(o: (Float, Float, Float), d: (Float, Float, Float)) -> Ray {
        Ray::new(Point3f::new(o.0, o.1, o.2), Vector3f::new(d.0, d.1, d.2), INFINITY, 0.0, None)
    }

    fn point_in(lo: Float, hi: Float) -> impl Strategy<Value = Point3f> {
        (lo..hi, lo..hi, lo..hi).prop_map(|(x, y, z)| Point3f::new(x, y, z))
    }

    #[test]
    fn construction_clamps_parameters() {
        let s = unit(2.0, -3.0, 400.0);
        assert_eq!(s.z_min, -1.0);
        assert_eq!(s.z_max, 1.0);
        assert!(approx_eq!(f32, s.phi_max, TWO_PI, ulps = 2));
        assert!(approx_eq!(f32, s.theta_min, PI, ulps = 2));
        assert_eq!(s.theta_max, 0.0);
        assert!(!s.data.transform_swaps_handedness);
    }

    #[test]
    fn bounds_and_area() {
        let s = placed(Transform::translate(&Vector3f::new(1.0, 2.0, 3.0)), 2.0, -1.0, 2.0, 360.0);
        let b = s.object_bound();
        assert_eq!(b.p_min, Point3f::new(-2.0, -2.0, -1.0));
        assert_eq!(b.p_max, Point3f::new(2.0, 2.0, 2.0));

        let w = s.world_bound();
        assert_eq!(w.p_min, Point3f::new(-1.0, 0.0, 2.0));
        assert_eq!(w.p_max, Point3f::new(3.0, 4.0, 5.0));

        assert!(approx_eq!(f32, unit(-1.0, 1.0, 360.0).area(), FOUR_PI, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.area(), TWO_PI * 2.0 * 3.0, epsilon = 1e-4));
    }

    #[test]
    fn head_on_hit() {
        init();
        let s = unit(-1.0, 1.0, 360.0);
        let it = s.intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)), true).unwrap();

        assert!(approx_eq!(f32, it.t, 4.0, epsilon = 1e-4));
        let hit = &it.isect.hit;
        assert!(approx_eq!(f32, hit.p.z, -1.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, hit.n.z, -1.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, hit.wo.z, -1.0, epsilon = 1e-6));
        assert!(hit.p_error.z > 0.0);
        assert!(approx_eq!(f32, it.isect.uv.y, 0.0, epsilon = 1e-4));
        assert!(it.isect.shape_data.is_some());
    }

    #[test]
    fn short_ray_misses() {
        let s = unit(-1.0, 1.0, 360.0);
        let mut r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        r.t_max = 3.0;
        assert!(s.intersect(&r, true).is_none());
        assert!(!s.intersect_p(&r, true));
        assert_eq!(r.t_max, 3.0);

        let r = ray((0.0, 3.0, -5.0), (0.0, 0.0, 1.0));
        assert!(s.intersect(&r, true).is_none());
        assert!(!s.intersect_p(&r, true));

        let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, -1.0));
        assert!(s.intersect(&r, true).is_none());

        let away = Vector3f::new(2.0, 2.0, 2.0).normalize();
        let r = ray((2.0, 2.0, 2.0), (away.x, away.y, away.z));
        assert!(s.intersect(&r, true).is_none());
        assert!(!s.intersect_p(&r, true));
    }

    #[test]
    fn origin_inside_uses_far_root() {
        let s = unit(-1.0, 1.0, 360.0);
        let it = s.intersect(&ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)), true).unwrap();
        assert!(approx_eq!(f32, it.t, 1.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, it.isect.hit.p.z, 1.0, epsilon = 1e-4));
    }

    #[test]
    fn z_clipping_falls_back_to_far_root() {
        let s = unit(0.0, 1.0, 360.0);
        let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        let it = s.intersect(&r, true).unwrap();
        assert!(approx_eq!(f32, it.t, 6.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, it.isect.hit.p.z, 1.0, epsilon = 1e-4));
        assert!(s.intersect_p(&r, true));

        let mut short = r.clone();
        short.t_max = 5.0;
        assert!(s.intersect(&short, true).is_none());
    }

    #[test]
    fn z_clipping_accepts_boundary() {
        let s = unit(0.0, 1.0, 360.0);
        let it = s.intersect(&ray((-5.0, 0.0, 0.0), (1.0, 0.0, 0.0)), true).unwrap();
        assert!(approx_eq!(f32, it.t, 4.0, epsilon = 1e-4));
        assert_eq!(it.isect.hit.p.z, 0.0);

        // Both roots below the cut.
        assert!(s.intersect(&ray((-5.0, 0.0, -0.5), (1.0, 0.0, 0.0)), true).is_none());
    }

    #[test]
    fn phi_clipping() {
        let s = unit(-1.0, 1.0, 180.0);

        let it = s.intersect(&ray((0.0, -5.0, 0.0), (0.0, 1.0, 0.0)), true).unwrap();
        assert!(approx_eq!(f32, it.t, 6.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, it.isect.hit.p.y, 1.0, epsilon = 1e-4));

        let it = s.intersect(&ray((0.0, 5.0, 0.0), (0.0, -1.0, 0.0)), true).unwrap();
        assert!(approx_eq!(f32, it.t, 4.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, it.isect.uv.x, 0.5, epsilon = 1e-4));

        // The whole chord lies in the cut-away half.
        assert!(s.intersect(&ray((-5.0, -0.5, 0.0), (1.0, 0.0, 0.0)), true).is_none());
    }

    #[test]
    fn zero_area_spheres_are_never_hit() {
        let wedge = unit(-1.0, 1.0, 0.0);
        let r = ray((5.0, 0.0, 0.0), (-1.0, 0.0, 0.0));
        assert_eq!(wedge.area(), 0.0);
        assert!(wedge.intersect(&r, true).is_none());
        assert!(!wedge.intersect_p(&r, true));

        let ring = unit(0.0, 0.0, 360.0);
        let r = ray((-5.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        assert_eq!(ring.area(), 0.0);
        assert!(ring.intersect(&r, true).is_none());
        assert!(!ring.intersect_p(&r, true));
    }

    #[test]
    fn tangent_ray_does_not_panic() {
        let s = unit(-1.0, 1.0, 360.0);
        for &x in &[1.0, 1.0 - 1e-7, 1.0 + 1e-7] {
            let r = ray((x, 0.0, -5.0), (0.0, 0.0, 1.0));
            if let Some(it) = s.intersect(&r, true) {
                let d = it.isect.hit.p.distance(&Point3f::ZERO);
                assert!(approx_eq!(f32, d, 1.0, epsilon = 1e-3));
            }
            assert_eq!(s.intersect(&r, true).is_some(), s.intersect_p(&r, true));
        }
    }

    #[test]
    fn transformed_sphere() {
        let s = placed(Transform::translate(&Vector3f::new(0.0, 0.0, 10.0)), 2.0, -2.0, 2.0, 360.0);
        let it = s.intersect(&ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)), true).unwrap();
        assert!(approx_eq!(f32, it.t, 8.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, it.isect.hit.p.z, 8.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, it.isect.hit.n.z, -1.0, epsilon = 1e-3));
    }

    #[test]
    fn reverse_orientation_flips_normal() {
        let o2w = Arc::new(Transform::IDENTITY);
        let s = Sphere::new(Arc::clone(&o2w), o2w, true, 1.0, -1.0, 1.0, 360.0);
        let it = s.intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)), true).unwrap();
        assert!(approx_eq!(f32, it.isect.hit.n.z, 1.0, epsilon = 1e-3));
    }

    #[test]
    fn nearest_of_several_spheres() {
        let near: ArcShape = Arc::new(placed(Transform::translate(&Vector3f::new(0.0, 0.0, 5.0)), 1.0, -1.0, 1.0, 360.0));
        let far: ArcShape = Arc::new(placed(Transform::translate(&Vector3f::new(0.0, 0.0, 10.0)), 1.0, -1.0, 1.0, 360.0));
        let r = ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0));

        let it = intersect_nearest(&[Arc::clone(&far), Arc::clone(&near)], &r, true).unwrap();
        assert!(approx_eq!(f32, it.t, 4.0, epsilon = 1e-3));
        assert_eq!(r.t_max, INFINITY);
        assert!(intersect_any(&[far, near], &r, true));
    }

    #[test]
    fn sample_area_lies_on_surface() {
        let s = placed(Transform::translate(&Vector3f::new(1.0, 0.0, 0.0)), 2.0, -2.0, 2.0, 360.0);
        for &(a, b) in &[(0.0, 0.0), (0.25, 0.5), (0.5, 0.75), (0.9, 0.1)] {
            let (hit, pdf) = s.sample_area(&Point2f::new(a, b));
            let d = hit.p.distance(&Point3f::new(1.0, 0.0, 0.0));
            assert!(approx_eq!(f32, d, 2.0, epsilon = 1e-4));
            assert!(approx_eq!(f32, hit.n.length(), 1.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, pdf, 1.0 / s.area(), ulps = 2));
            assert_eq!(hit.wo, Vector3f::ZERO);
        }
    }

    #[test]
    fn from_paramset() {
        init();
        let mut ps = ParamSet::new();
        ps.add_float("radius", &[2.0]);
        ps.add_float("zmin", &[1.0]);
        ps.add_float("zmax", &[-1.0]);
        ps.add_float("phimax", &[90.0]);

        let o2w = Arc::new(Transform::IDENTITY);
        let s = Sphere::from((&ps, Arc::clone(&o2w), o2w, false));
        assert_eq!(s.radius, 2.0);
        assert_eq!(s.z_min, -1.0);
        assert_eq!(s.z_max, 1.0);
        assert!(approx_eq!(f32, s.phi_max, PI / 2.0, ulps = 2));
        assert!(ps.unused().is_empty());
    }

    proptest! {
        #[test]
        fn hits_lie_on_surface(o in point_in(-10.0, 10.0), q in point_in(-0.5, 0.5)) {
            prop_assume!(o.distance(&q) > 1e-2);
            let s = unit(-1.0, 1.0, 360.0);
            let r = Ray::new(o, q - o, INFINITY, 0.0, None);

            let it = s.intersect(&r, true);
            prop_assert!(it.is_some());
            let it = it.unwrap();
            prop_assert!(it.t > 0.0);
            let d = it.isect.hit.p.distance(&Point3f::ZERO);
            prop_assert!(approx_eq!(f32, d, 1.0, epsilon = 1e-3));
            prop_assert!(s.intersect_p(&r, true));

            let again = s.intersect(&r, true).unwrap();
            prop_assert_eq!(it.t, again.t);
            prop_assert_eq!(it.isect.hit.p, again.isect.hit.p);
        }

        #[test]
        fn clipped_hits_respect_limits(o in point_in(-10.0, 10.0), q in point_in(-0.5, 0.5)) {
            prop_assume!(o.distance(&q) > 1e-2);
            let s = unit(0.0, 1.0, 270.0);
            let r = Ray::new(o, q - o, INFINITY, 0.0, None);

            if let Some(it) = s.intersect(&r, true) {
                let p = it.isect.hit.p;
                prop_assert!(p.z >= 0.0);
                prop_assert!(!(p.x > 1e-4 && p.y < -1e-4));
            }
            prop_assert_eq!(s.intersect(&r, true).is_some(), s.intersect_p(&r, true));
        }
    }
}
