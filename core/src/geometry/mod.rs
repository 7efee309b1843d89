//! Geometry

#[macro_use]
mod common;

#[cfg(test)]
macro_rules! prop_point3 {
    ($xr: expr, $yr: expr, $zr: expr) => {
        ($xr, $yr, $zr).prop_map(|(x, y, z)| $crate::geometry::Point3 { x, y, z })
    };
}

#[cfg(test)]
macro_rules! prop_vector3 {
    ($xr: expr, $yr: expr, $zr: expr) => {
        ($xr, $yr, $zr).prop_map(|(x, y, z)| $crate::geometry::Vector3 { x, y, z })
    };
}

#[cfg(test)]
macro_rules! prop_normal3 {
    ($xr: expr, $yr: expr, $zr: expr) => {
        ($xr, $yr, $zr).prop_map(|(x, y, z)| $crate::geometry::Normal3 { x, y, z })
    };
}

mod bounds3;
mod matrix4x4;
mod normal;
mod point2;
mod point3;
mod ray;
mod shape;
mod transform;
mod transform_cache;
mod vector3;

// Re-export.
pub use bounds3::*;
pub use common::*;
pub use matrix4x4::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use shape::*;
pub use transform::*;
pub use transform_cache::*;
pub use vector3::*;
