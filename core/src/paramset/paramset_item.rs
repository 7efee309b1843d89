//! Parameter Set Items

use std::cell::Cell;
use std::fmt;

/// Stores a parameter set item consisting of a list of values of type `T`.
#[derive(Clone, Debug, Default)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,

    /// Indicates if the parameter set item was ever read back. Lookups go
    /// through shared references, hence the `Cell`.
    pub looked_up: Cell<bool>,
}

impl<T> ParamSetItem<T> {
    /// Create new `ParamSetItem<T>` that has not been looked up yet.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            looked_up: Cell::new(false),
        }
    }

    /// Returns the values and marks the item as read.
    pub fn read(&self) -> &[T] {
        self.looked_up.set(true);
        &self.values
    }
}

impl<T: fmt::Display> fmt::Display for ParamSetItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}
