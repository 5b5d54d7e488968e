//! Configuration types.
//!
//! Every struct deserializes from JSON with missing fields taking their
//! `Default` values.

use crate::error::Result;
use crate::kb::DistanceSpec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

/// How much the engine reports through `tracing`.
///
/// Ordinary progress is always emitted at `debug`/`info`; higher levels add
/// per-node and per-unifier dumps, which are expensive to format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Detailed,
    Full,
}

impl Verbosity {
    pub fn at_least(self, level: Verbosity) -> bool {
        self >= level
    }
}

/// Settings of a single proof graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Largest term distance at which two distinct constants may still be
    /// unified. 0 means only syntactically identical terms unify.
    pub soft_unification_threshold: f32,
    pub verbosity: Verbosity,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            soft_unification_threshold: 0.0,
            verbosity: Verbosity::Normal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Ceiling on the accumulated cost of a hypothesis; `None` is unbounded
    pub max_distance: Option<f32>,
    pub distance: DistanceSpec,
}

/// Limits of the depth-based hypothesis enumerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumeratorConfig {
    /// Deepest depth a chained node may have; `None` is unbounded
    pub max_depth: Option<usize>,
    /// Stop once the graph holds this many nodes; `None` is unbounded
    pub max_nodes: Option<usize>,
    pub backward_chaining: bool,
    pub forward_chaining: bool,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        EnumeratorConfig {
            max_depth: Some(3),
            max_nodes: None,
            backward_chaining: true,
            forward_chaining: false,
        }
    }
}

/// Settings of an inference session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub graph: GraphConfig,
    pub enumerator: EnumeratorConfig,
    /// Seconds allowed for hypothesis generation; `None` is unbounded
    pub timeout_lhs: Option<f64>,
    /// Seconds allowed for the ILP conversion
    pub timeout_ilp: Option<f64>,
    /// Seconds allowed for the solver
    pub timeout_sol: Option<f64>,
    /// Seconds allowed for the whole inference
    pub timeout_all: Option<f64>,
    /// Free-form parameters for components
    pub params: BTreeMap<String, String>,
    pub flags: BTreeSet<String>,
    /// Only observations with these names are inferred; empty means all
    pub targets: BTreeSet<String>,
    pub excluded: BTreeSet<String>,
}

impl SessionConfig {
    pub fn lhs_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_lhs)
    }

    pub fn ilp_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_ilp)
    }

    pub fn sol_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_sol)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_all)
    }
}

// Negative values read as "no limit"
fn seconds(secs: Option<f64>) -> Option<Duration> {
    secs.filter(|s| *s >= 0.0).map(Duration::from_secs_f64)
}

/// Parse any config struct from JSON text
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse any config struct from a JSON file
pub fn from_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    from_json_str(&json)
}
