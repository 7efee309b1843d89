//! Interactions

use crate::geometry::{Dot, Normal3f, Point3f, Ray, Vector3f};
use crate::medium::{ArcMedium, MediumInterface};
use crate::pbrt::{Float, INFINITY, SHADOW_EPSILON};

mod surface_interaction;

pub use surface_interaction::*;

/// Hit holds the data shared by every kind of interaction point.
#[derive(Clone)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// Conservative bound on the floating point error in `p`.
    pub p_error: Vector3f,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`.
    pub n: Normal3f,

    /// The medium interface used for scattering media.
    pub medium_interface: Option<MediumInterface>,
}

impl Hit {
    /// Create a new hit. `wo` is normalized unless it is the zero vector.
    ///
    /// `p`                - Point of interaction.
    /// `time`             - Time when interaction occurred.
    /// `p_error`          - Floating point error for ray intersection points.
    /// `wo`               - The negative ray direction.
    /// `n`                - Surface normal at the point `p`.
    /// `medium_interface` - The medium interface used for scattering media.
    pub fn new(
        p: Point3f,
        time: Float,
        p_error: Vector3f,
        wo: Vector3f,
        n: Normal3f,
        medium_interface: Option<MediumInterface>,
    ) -> Self {
        let wo = if wo == Vector3f::ZERO { wo } else { wo.normalize() };
        Self {
            p,
            time,
            p_error,
            wo,
            n,
            medium_interface,
        }
    }

    /// Returns `true` if this hit lies on a surface.
    pub fn is_surface_interaction(&self) -> bool {
        !self.n.is_zero()
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, d);
        Ray::new(origin, *d, INFINITY, self.time, self.get_medium_in_direction(d))
    }

    /// Spawn's a new ray towards another point. The ray stops just short of
    /// the point so it can be used for visibility tests.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let d = *p - self.p;
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &d);
        let d = *p - origin;
        Ray::new(origin, d, 1.0 - SHADOW_EPSILON, self.time, self.get_medium_in_direction(&d))
    }

    /// Spawn's a new ray towards another interaction, offsetting both ends.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &(hit.p - self.p));
        let target = Ray::offset_origin(&hit.p, &hit.p_error, &hit.n, &(origin - hit.p));
        let d = target - origin;
        Ray::new(origin, d, 1.0 - SHADOW_EPSILON, self.time, self.get_medium_in_direction(&d))
    }

    /// Returns the medium on the side of the surface a direction points to.
    ///
    /// * `w` - The direction.
    pub fn get_medium_in_direction(&self, w: &Vector3f) -> Option<ArcMedium> {
        let mi = self.medium_interface.as_ref()?;
        if w.dot(&self.n) > 0.0 {
            mi.outside.clone()
        } else {
            mi.inside.clone()
        }
    }

    /// Returns the medium when both sides of the interface agree.
    pub fn get_medium(&self) -> Option<ArcMedium> {
        match self.medium_interface.as_ref() {
            Some(mi) if !mi.is_medium_transition() => mi.inside.clone(),
            _ => None,
        }
    }
}
