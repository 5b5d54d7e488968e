//! Unifiers and clusters of unifiable terms

pub mod clusters;
pub mod unifier;


pub use clusters::{ClusterIdx, UnifiableVariableClusterSet};
pub use unifier::Unifier;
