//! Axiom distance heuristics and their shared cache
//!
//! A distance is the cost of applying one axiom. Hypotheses whose
//! accumulated distance from the observation exceeds the knowledge base's
//! `max_distance` are never generated.
//!
//! The cache is the only mutable state shared by concurrent searches over
//! one knowledge base. Clearing it while a computation is in flight is
//! allowed: the value is recomputed on the next lookup.

use crate::logic::{Axiom, AxiomId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Strategy computing the cost of applying an axiom
pub trait DistanceProvider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Cost of one application of `axiom`; expected to be non-negative
    fn distance(&self, axiom: &Axiom) -> f32;
}

/// Every axiom costs the same
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformDistance {
    pub value: f32,
}

impl Default for UniformDistance {
    fn default() -> Self {
        UniformDistance { value: 1.0 }
    }
}

impl DistanceProvider for UniformDistance {
    fn name(&self) -> &str {
        "uniform"
    }

    fn distance(&self, _axiom: &Axiom) -> f32 {
        self.value
    }
}

/// Uses the cost written on the axiom, or `default_cost` when it has none
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostDistance {
    pub default_cost: f32,
}

impl DistanceProvider for CostDistance {
    fn name(&self) -> &str {
        "cost"
    }

    fn distance(&self, axiom: &Axiom) -> f32 {
        axiom.cost.unwrap_or(self.default_cost)
    }
}

/// Wraps an arbitrary scoring function, e.g. learned weights
pub struct FnDistance<F> {
    name: String,
    f: F,
}

impl<F> FnDistance<F>
where
    F: Fn(&Axiom) -> f32 + Send + Sync,
{
    pub fn new(name: &str, f: F) -> Self {
        FnDistance {
            name: name.to_string(),
            f,
        }
    }
}

impl<F> DistanceProvider for FnDistance<F>
where
    F: Fn(&Axiom) -> f32 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, axiom: &Axiom) -> f32 {
        (self.f)(axiom)
    }
}

impl<F> fmt::Debug for FnDistance<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDistance").field("name", &self.name).finish()
    }
}

/// Serializable choice of a built-in provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistanceSpec {
    Uniform { value: f32 },
    Cost { default_cost: f32 },
}

impl Default for DistanceSpec {
    fn default() -> Self {
        DistanceSpec::Cost { default_cost: 1.0 }
    }
}

impl DistanceSpec {
    pub fn build(&self) -> Box<dyn DistanceProvider> {
        match *self {
            DistanceSpec::Uniform { value } => Box::new(UniformDistance { value }),
            DistanceSpec::Cost { default_cost } => Box::new(CostDistance { default_cost }),
        }
    }
}

/// Memoized distances keyed by axiom id
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: Mutex<HashMap<AxiomId, f32>>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached distance of `id`, computing and storing it first
    /// if absent. `compute` runs without the lock held.
    pub fn get_or_compute(&self, id: AxiomId, compute: impl FnOnce() -> f32) -> f32 {
        if let Some(&d) = self.lock().get(&id) {
            return d;
        }
        let d = sanitize(id, compute());
        *self.lock().entry(id).or_insert(d)
    }

    /// Drop every memoized value
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-written,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<AxiomId, f32>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sanitize(id: AxiomId, d: f32) -> f32 {
    if d >= 0.0 {
        d
    } else {
        warn!(axiom = id, distance = d, "distance provider returned an invalid value, using 0");
        0.0
    }
}
