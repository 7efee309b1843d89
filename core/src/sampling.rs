//! Sampling

use crate::geometry::{Point2f, Vector3f};
use crate::pbrt::{max, Float, INV_FOUR_PI, TWO_PI};

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point in `[0, 1)²`.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let (sin_phi, cos_phi) = (TWO_PI * u[1]).sin_cos();
    Vector3f::new(r * cos_phi, r * sin_phi, z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}
