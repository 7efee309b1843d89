//! Rays

use super::{Dot, Normal3f, Point3f, Vector3f};
use crate::medium::ArcMedium;
use crate::pbrt::{next_float_down, next_float_up, Float, INFINITY};
use std::fmt;

/// A semi-infinite line `o + t·d` restricted to `0 < t < t_max`.
#[derive(Clone)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// Auxilliary rays offset by one sample in x and y direction.
    pub differentials: Option<RayDifferential>,

    /// Medium containing the origin.
    pub medium: Option<ArcMedium>,
}

impl Ray {
    /// Returns a ray with no differentials.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Maximum extent of the ray.
    /// * `time`   - Time value.
    /// * `medium` - Medium containing origin `o`.
    pub fn new(
        o: Point3f,
        d: Vector3f,
        t_max: Float,
        time: Float,
        medium: Option<ArcMedium>,
    ) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            differentials: None,
            medium,
        }
    }

    /// Returns a ray with differentials.
    ///
    /// * `o`             - Origin.
    /// * `d`             - Direction.
    /// * `t_max`         - Maximum extent of the ray.
    /// * `time`          - Time value.
    /// * `differentials` - Auxilliary rays offset by one sample in x and y direction.
    /// * `medium`        - Medium containing origin `o`.
    pub fn new_with_differentials(
        o: Point3f,
        d: Vector3f,
        t_max: Float,
        time: Float,
        differentials: RayDifferential,
        medium: Option<ArcMedium>,
    ) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            differentials: Some(differentials),
            medium,
        }
    }

    /// Returns true if the origin, direction or extent contain NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_max.is_nan()
    }

    /// Returns true if the auxilliary rays are present.
    pub fn has_differentials(&self) -> bool {
        self.differentials.is_some()
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Scale the differential rays to account for spacing between samples on
    /// the film plane. Does nothing if the ray has no differentials.
    ///
    /// * `s` - The weight used to scale the differential rays.
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(rd) = self.differentials {
            self.differentials = Some(RayDifferential {
                rx_origin: self.o + (rd.rx_origin - self.o) * s,
                ry_origin: self.o + (rd.ry_origin - self.o) * s,
                rx_direction: self.d + (rd.rx_direction - self.d) * s,
                ry_direction: self.d + (rd.ry_direction - self.d) * s,
            });
        }
    }

    /// Offsets a point along the surface normal so that it lies outside the
    /// floating point error box of the surface, on the same side as `w`.
    ///
    /// `p`       - Intersection point.
    /// `p_error` - Floating point error for intersection points.
    /// `n`       - Surface normal at the point `p`.
    /// `w`       - The direction.
    pub fn offset_origin(p: &Point3f, p_error: &Vector3f, n: &Normal3f, w: &Vector3f) -> Point3f {
        let d = n.abs().dot(p_error);

        let mut offset = Vector3f::from(*n) * d;
        if w.dot(n) < 0.0 {
            offset = -offset;
        }

        let mut po = *p + offset;

        // Round offset point po away from p.
        for axis in 0..3 {
            if offset[axis] > 0.0 {
                po[axis] = next_float_up(po[axis]);
            } else if offset[axis] < 0.0 {
                po[axis] = next_float_down(po[axis]);
            }
        }

        po
    }
}

impl fmt::Debug for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ray")
            .field("o", &self.o)
            .field("d", &self.d)
            .field("t_max", &self.t_max)
            .field("time", &self.time)
            .field("differentials", &self.differentials)
            .field("medium", &self.medium.is_some())
            .finish()
    }
}

impl Default for Ray {
    /// Returns a ray at the origin with zero direction and infinite extent.
    fn default() -> Self {
        Self {
            o: Point3f::ZERO,
            d: Vector3f::ZERO,
            t_max: INFINITY,
            time: 0.0,
            differentials: None,
            medium: None,
        }
    }
}

/// Two auxilliary rays offset by one sample in the x and y direction of the
/// film, used to estimate the footprint of a ray on a surface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Origin of ray offset in x-direction.
    pub rx_origin: Point3f,

    /// Origin of ray offset in y-direction.
    pub ry_origin: Point3f,

    /// Direction of ray offset in x-direction.
    pub rx_direction: Vector3f,

    /// Direction of ray offset in y-direction.
    pub ry_direction: Vector3f,
}

impl RayDifferential {
    /// Returns a ray differential.
    ///
    /// * `xo` - Origin for x-direction differential.
    /// * `yo` - Origin for y-direction differential.
    /// * `xd` - Direction for x-direction differential.
    /// * `yd` - Direction for y-direction differential.
    pub fn new(xo: Point3f, yo: Point3f, xd: Vector3f, yd: Vector3f) -> Self {
        Self {
            rx_origin: xo,
            ry_origin: yo,
            rx_direction: xd,
            ry_direction: yd,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
