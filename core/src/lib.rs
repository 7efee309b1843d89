//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod efloat;
pub mod geometry;
pub mod interaction;
pub mod medium;
pub mod paramset;
pub mod pbrt;
pub mod sampling;
