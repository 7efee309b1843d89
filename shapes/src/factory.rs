//! Shape factory

use crate::{Result, ShapeError, Sphere};
use pbr_core::geometry::{ArcShape, ArcTransform};
use pbr_core::paramset::ParamSet;
use std::sync::Arc;

/// Creates the named shape from a parameter set. Parameters the shape never
/// looked up are reported as warnings.
///
/// * `name`                - Shape name.
/// * `object_to_world`     - Transformation from object space to world space.
/// * `world_to_object`     - Transformation from world space to object space.
/// * `reverse_orientation` - Indicates whether surface normal directions are reversed.
/// * `params`              - Parameter set.
pub fn make_shape(
    name: &str,
    object_to_world: ArcTransform,
    world_to_object: ArcTransform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<Vec<ArcShape>> {
    let shapes: Vec<ArcShape> = match name {
        "sphere" => {
            let radius = params.find_one_float("radius", 1.0);
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ShapeError::InvalidParameter {
                    shape: name.to_string(),
                    name: String::from("radius"),
                    value: radius,
                });
            }
            let p = (params, object_to_world, world_to_object, reverse_orientation);
            vec![Arc::new(Sphere::from(p))]
        }
        _ => {
            error!("Shape '{}' unknown.", name);
            return Err(ShapeError::UnknownShape(name.to_string()));
        }
    };

    debug!("Created {} '{}' shape(s).", shapes.len(), name);
    params.report_unused();
    Ok(shapes)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
