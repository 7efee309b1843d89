//! Parameter Sets

use crate::geometry::{Point3f, Vector3f};
use crate::pbrt::{Float, Int};
use std::collections::HashMap;
use std::fmt;

mod paramset_item;

// Re-export
pub use paramset_item::*;

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores named, typed parameter lists that configure scene objects.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub point3fs: ParamSetMap<Point3f>,
    pub vector3fs: ParamSetMap<Vector3f>,
    pub strings: ParamSetMap<String>,
}

/// Generates the add/erase/find/find_one accessors for one typed list.
macro_rules! paramset_accessors {
    ($paramset: ident, $t: ty, $add: ident, $erase: ident, $find: ident, $find_one: ident) => {
        /// Add or replace a parameter.
        ///
        /// * `name`   - Parameter name.
        /// * `values` - The values.
        pub fn $add(&mut self, name: &str, values: &[$t]) {
            self.$paramset.insert(String::from(name), ParamSetItem::new(values.to_vec()));
        }

        /// Remove a parameter. Returns `true` if it existed.
        ///
        /// * `name` - Parameter name.
        pub fn $erase(&mut self, name: &str) -> bool {
            self.$paramset.remove(name).is_some()
        }

        /// Returns all values of a parameter, or an empty list.
        ///
        /// * `name` - Parameter name.
        pub fn $find(&self, name: &str) -> Vec<$t> {
            self.$paramset
                .get(name)
                .map_or_else(Vec::new, |param| param.read().to_vec())
        }

        /// Returns the value of a single valued parameter, or `default` if
        /// it is missing or holds more than one value.
        ///
        /// * `name`    - Parameter name.
        /// * `default` - Value to use if not found.
        pub fn $find_one(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name).map(|param| param.read()) {
                Some([v]) => v.clone(),
                _ => default,
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_accessors!(bools, bool, add_bool, erase_bool, find_bool, find_one_bool);
    paramset_accessors!(ints, Int, add_int, erase_int, find_int, find_one_int);
    paramset_accessors!(floats, Float, add_float, erase_float, find_float, find_one_float);
    paramset_accessors!(point3fs, Point3f, add_point3f, erase_point3f, find_point3f, find_one_point3f);
    paramset_accessors!(vector3fs, Vector3f, add_vector3f, erase_vector3f, find_vector3f, find_one_vector3f);
    paramset_accessors!(strings, String, add_string, erase_string, find_string, find_one_string);

    /// Returns the names of parameters that were never looked up, sorted.
    pub fn unused(&self) -> Vec<String> {
        fn collect<T>(params: &ParamSetMap<T>, kind: &str, out: &mut Vec<String>) {
            out.extend(
                params
                    .iter()
                    .filter(|(_, param)| !param.looked_up.get())
                    .map(|(name, _)| format!("{} \"{}\"", kind, name)),
            );
        }

        let mut unused = Vec::new();
        collect(&self.bools, "bool", &mut unused);
        collect(&self.ints, "integer", &mut unused);
        collect(&self.floats, "float", &mut unused);
        collect(&self.point3fs, "point3", &mut unused);
        collect(&self.vector3fs, "vector3", &mut unused);
        collect(&self.strings, "string", &mut unused);
        unused.sort();
        unused
    }

    /// Logs a warning for every parameter that was never looked up. Usually
    /// a misspelt parameter name.
    pub fn report_unused(&self) {
        for name in self.unused() {
            warn!("Parameter {} not used", name);
        }
    }

    /// Clear all parameter set items.
    pub fn clear(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.floats.clear();
        self.point3fs.clear();
        self.vector3fs.clear();
        self.strings.clear();
    }
}

fn display_params<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    params: &ParamSetMap<T>,
    kind: &str,
) -> fmt::Result {
    let mut names: Vec<&String> = params.keys().collect();
    names.sort();
    for name in names {
        writeln!(f, "\"{} {}\" {}", kind, name, params[name])?;
    }
    Ok(())
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_params(f, &self.bools, "bool")?;
        display_params(f, &self.ints, "integer")?;
        display_params(f, &self.floats, "float")?;
        display_params(f, &self.point3fs, "point3")?;
        display_params(f, &self.vector3fs, "vector3")?;
        display_params(f, &self.strings, "string")
    }
}
