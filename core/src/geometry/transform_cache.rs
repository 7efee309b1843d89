//! Transform Cache

use super::{ArcTransform, Transform};
use std::collections::HashSet;
use std::sync::Arc;

/// Stores a single shared reference for each unique transformation so that
/// shapes built with equal transformations share one allocation.
#[derive(Default)]
pub struct TransformCache {
    /// Caches the transformations.
    transforms: HashSet<ArcTransform>,

    /// Number of lookups.
    lookups: usize,

    /// Number of lookups that found an existing transformation.
    hits: usize,
}

impl TransformCache {
    /// Creates a new `TransformCache`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup a reference to a `Transform`. If it is cached, return a
    /// reference to it. Otherwise, insert it and return the cloned reference.
    ///
    /// * `t` - Reference to a transform to lookup.
    pub fn lookup(&mut self, t: &Transform) -> ArcTransform {
        self.lookups += 1;
        if let Some(transform) = self.transforms.get(t) {
            self.hits += 1;
            return Arc::clone(transform);
        }

        let ret = Arc::new(*t);
        self.transforms.insert(Arc::clone(&ret));
        ret
    }

    /// Returns the number of unique transformations stored.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Clear the cached transformations and log the hit rate.
    pub fn clear(&mut self) {
        if self.lookups > 0 {
            debug!(
                "TransformCache: {} unique of {} lookups ({} hits)",
                self.transforms.len(),
                self.lookups,
                self.hits
            );
        }
        self.transforms.clear();
        self.lookups = 0;
        self.hits = 0;
    }
}
