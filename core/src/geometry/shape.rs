//! Shapes

use super::{ArcTransform, Bounds3f, Dot, Point2f, Ray, Vector3f};
use crate::interaction::{Hit, SurfaceInteraction};
use crate::pbrt::Float;
use std::sync::Arc;

/// Shape common functions. Shapes are immutable once built and are queried
/// from many threads at once.
pub trait Shape {
    /// Returns the shape type. Usually these are behind ArcShape and harder to
    /// debug. So this will be helpful.
    fn get_type(&self) -> &'static str;

    /// Returns the underlying shape data.
    fn get_data(&self) -> Arc<ShapeData>;

    /// Returns a bounding box in the shapes object space.
    fn object_bound(&self) -> Bounds3f;

    /// Returns a bounding box in the world space.
    ///
    /// Default is to transform the object bounds with the object-to-world
    /// transformation. Override for tighter bounds implementation.
    fn world_bound(&self) -> Bounds3f {
        self.get_data().object_to_world.transform_bounds(&self.object_bound())
    }

    /// Returns the nearest intersection with parameter in `(0, r.t_max)`
    /// together with its surface interaction in world space, or `None` if the
    /// ray misses. The ray is not modified.
    ///
    /// * `r`                  - The ray in world space.
    /// * `test_alpha_texture` - Discard hits on regions cut away by an alpha
    ///                          texture, for shapes that carry one.
    fn intersect(&self, r: &Ray, test_alpha_texture: bool) -> Option<Intersection>;

    /// Returns `true` if a ray-shape intersection exists in `(0, r.t_max)`.
    /// Implementations may skip computing the surface interaction.
    ///
    /// * `r`                  - The ray in world space.
    /// * `test_alpha_texture` - Discard hits on alpha cut-away regions.
    fn intersect_p(&self, r: &Ray, test_alpha_texture: bool) -> bool {
        self.intersect(r, test_alpha_texture).is_some()
    }

    /// Returns the surface area of the shape in object space.
    fn area(&self) -> Float;

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// NOTE: The returned `Hit` value will have `wo` = Vector3f::ZERO.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float);

    /// Sample a point on the shape given a reference point and return the PDF
    /// with respect to the solid angle from ref.
    ///
    /// * `hit` - Reference point.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        let (intr, pdf) = self.sample_area(u);
        let wi = intr.p - hit.p;
        if wi.length_squared() == 0.0 {
            return (intr, 0.0);
        }

        // Convert from area measure to solid angle measure.
        let wi = wi.normalize();
        let pdf = pdf * hit.p.distance_squared(&intr.p) / intr.n.abs_dot(&-wi);
        if pdf.is_infinite() {
            (intr, 0.0)
        } else {
            (intr, pdf)
        }
    }

    /// Return the PDF for the shape. By default it is 1/area.
    ///
    /// * `hit` - The interaction hit point.
    fn pdf(&self, _hit: &Hit) -> Float {
        1.0 / self.area()
    }

    /// Returns the PDF with respect to solid angle of sampling direction
    /// `wi` from `hit`; zero if the direction misses the shape.
    ///
    /// * `hit` - The reference point.
    /// * `wi`  - The incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let ray = hit.spawn_ray(wi);
        match self.intersect(&ray, false) {
            Some(Intersection { isect, .. }) => {
                let pdf = hit.p.distance_squared(&isect.hit.p) / (isect.hit.n.abs_dot(&-*wi) * self.area());
                if pdf.is_infinite() {
                    0.0
                } else {
                    pdf
                }
            }
            None => 0.0,
        }
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;

/// Stores geometric information about a single ray-shape intersection.
#[derive(Clone)]
pub struct Intersection {
    /// The parameter along the ray where intersection occurred.
    pub t: Float,

    /// The surface interaction details.
    pub isect: SurfaceInteraction,
}

impl Intersection {
    /// Create a new intersection.
    ///
    /// * `t`     - The parameter along the ray where intersection occurred.
    /// * `isect` - The surface interaction details.
    pub fn new(t: Float, isect: SurfaceInteraction) -> Self {
        Self { t, isect }
    }
}

/// Store common shape data.
#[derive(Clone)]
pub struct ShapeData {
    /// The object to world transfomation.
    pub object_to_world: ArcTransform,

    /// The world to object transfomation.
    pub world_to_object: ArcTransform,

    /// Indicates whether their surface normal directions should be reversed
    /// from the default
    pub reverse_orientation: bool,

    /// Indicates if `object_to_world` transformation changes the handedness
    /// of the coordinate system.
    pub transform_swaps_handedness: bool,
}

impl ShapeData {
    /// Create a new instance of shape data.
    ///
    /// * `object_to_world`     - The object to world transfomation.
    /// * `world_to_object`     - The world to object transfomation.
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default
    pub fn new(object_to_world: ArcTransform, world_to_object: ArcTransform, reverse_orientation: bool) -> Self {
        let transform_swaps_handedness = object_to_world.swaps_handedness();
        Self {
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        }
    }
}

/// Returns the closest intersection of a ray with any of the shapes. The
/// query keeps its own copy of the ray and shortens that copy's `t_max` after
/// every hit, so later shapes only report closer hits. The caller's ray is
/// left untouched.
///
/// * `shapes`             - The shapes to test.
/// * `r`                  - The ray in world space.
/// * `test_alpha_texture` - Discard hits on alpha cut-away regions.
pub fn intersect_nearest(shapes: &[ArcShape], r: &Ray, test_alpha_texture: bool) -> Option<Intersection> {
    let mut ray = r.clone();
    let mut nearest = None;
    for shape in shapes {
        if let Some(it) = shape.intersect(&ray, test_alpha_texture) {
            ray.t_max = it.t;
            nearest = Some(it);
        }
    }
    nearest
}

/// Returns `true` if the ray hits any of the shapes in `(0, r.t_max)`.
///
/// * `shapes`             - The shapes to test.
/// * `r`                  - The ray in world space.
/// * `test_alpha_texture` - Discard hits on alpha cut-away regions.
pub fn intersect_any(shapes: &[ArcShape], r: &Ray, test_alpha_texture: bool) -> bool {
    shapes.iter().any(|shape| shape.intersect_p(r, test_alpha_texture))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Normal3f, Point3f, Transform};
    use crate::pbrt::INFINITY;

    /// A unit square in the plane z = `z`, facing +z. A cut-out square is
    /// fully transparent when alpha is tested.
    struct Square {
        z: Float,
        cut_out: bool,
        data: Arc<ShapeData>,
    }

    impl Square {
        fn new(z: Float) -> ArcShape {
            Self::build(z, false)
        }

        fn cut_out(z: Float) -> ArcShape {
            Self::build(z, true)
        }

        fn build(z: Float, cut_out: bool) -> ArcShape {
            let t = Arc::new(Transform::IDENTITY);
            Arc::new(Self {
                z,
                cut_out,
                data: Arc::new(ShapeData::new(Arc::clone(&t), t, false)),
            })
        }
    }

    impl Shape for Square {
        fn get_type(&self) -> &'static str {
            "square"
        }

        fn get_data(&self) -> Arc<ShapeData> {
            Arc::clone(&self.data)
        }

        fn object_bound(&self) -> Bounds3f {
            Bounds3f::new(Point3f::new(-1.0, -1.0, self.z), Point3f::new(1.0, 1.0, self.z))
        }

        fn intersect(&self, r: &Ray, test_alpha_texture: bool) -> Option<Intersection> {
            let t = (self.z - r.o.z) / r.d.z;
            if !(t > 0.0 && t < r.t_max) || (test_alpha_texture && self.cut_out) {
                return None;
            }
            let p = r.at(t);
            if p.x.abs() > 1.0 || p.y.abs() > 1.0 {
                return None;
            }
            let isect = SurfaceInteraction::new(
                p,
                Vector3f::ZERO,
                Point2f::new((p.x + 1.0) / 2.0, (p.y + 1.0) / 2.0),
                -r.d,
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 2.0, 0.0),
                Normal3f::ZERO,
                Normal3f::ZERO,
                r.time,
                Some(self.get_data()),
                0,
            );
            Some(Intersection::new(t, isect))
        }

        fn area(&self) -> Float {
            4.0
        }

        fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
            let p = Point3f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0, self.z);
            let hit = Hit::new(p, 0.0, Vector3f::ZERO, Vector3f::ZERO, Normal3f::new(0.0, 0.0, 1.0), None);
            (hit, 1.0 / self.area())
        }
    }

    fn down_ray() -> Ray {
        Ray::new(Point3f::new(0.0, 0.0, 10.0), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None)
    }

    #[test]
    fn nearest_wins_regardless_of_order() {
        let shapes = vec![Square::new(1.0), Square::new(5.0), Square::new(3.0)];
        let r = down_ray();

        let it = intersect_nearest(&shapes, &r, true).unwrap();
        assert_eq!(it.t, 5.0);
        assert_eq!(it.isect.hit.p.z, 5.0);
        assert_eq!(r.t_max, INFINITY);

        let reversed: Vec<ArcShape> = shapes.iter().rev().cloned().collect();
        assert_eq!(intersect_nearest(&reversed, &r, true).unwrap().t, 5.0);
    }

    #[test]
    fn nearest_respects_t_max() {
        let shapes = vec![Square::new(1.0), Square::new(5.0)];
        let mut r = down_ray();
        r.t_max = 4.0;
        assert!(intersect_nearest(&shapes, &r, true).is_none());
        assert!(!intersect_any(&shapes, &r, true));

        r.t_max = 9.5;
        assert_eq!(intersect_nearest(&shapes, &r, true).unwrap().t, 5.0);
        assert!(intersect_any(&shapes, &r, true));
    }

    #[test]
    fn alpha_test_flag_reaches_shapes() {
        let shapes = vec![Square::new(1.0), Square::cut_out(5.0)];
        let r = down_ray();

        assert_eq!(intersect_nearest(&shapes, &r, false).unwrap().t, 5.0);
        assert_eq!(intersect_nearest(&shapes, &r, true).unwrap().t, 9.0);
        assert!(shapes[1].intersect_p(&r, false));
        assert!(!shapes[1].intersect_p(&r, true));
        assert!(!intersect_any(&shapes[1..], &r, true));

        // Solid angle pdfs ignore alpha.
        let hit = Hit::new(Point3f::new(0.0, 0.0, 6.0), 0.0, Vector3f::ZERO, Vector3f::ZERO, Normal3f::ZERO, None);
        assert!(shapes[1].pdf_solid_angle(&hit, &Vector3f::new(0.0, 0.0, -1.0)) > 0.0);
    }

    #[test]
    fn default_bounds_and_pdfs() {
        let s = Square::new(2.0);
        assert_eq!(s.world_bound(), s.object_bound());

        let hit = Hit::new(Point3f::new(0.0, 0.0, 3.0), 0.0, Vector3f::ZERO, Vector3f::ZERO, Normal3f::ZERO, None);
        assert_eq!(s.pdf(&hit), 0.25);

        // Straight down from one unit above the center.
        let pdf = s.pdf_solid_angle(&hit, &Vector3f::new(0.0, 0.0, -1.0));
        assert!((pdf - 0.25).abs() < 1e-4);
        assert_eq!(s.pdf_solid_angle(&hit, &Vector3f::new(0.0, 0.0, 1.0)), 0.0);

        let (sampled, pdf) = s.sample_solid_angle(&hit, &Point2f::new(0.5, 0.5));
        assert_eq!(sampled.p, Point3f::new(0.0, 0.0, 2.0));
        assert!((pdf - 0.25).abs() < 1e-6);
    }
}
