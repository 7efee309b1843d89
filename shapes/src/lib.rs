//! Shapes

#[macro_use]
extern crate log;

mod error;
mod factory;
mod sphere;

// Re-export
pub use error::*;
pub use factory::*;
pub use sphere::*;
