//! Predicate registry
//!
//! Interns `(name, arity)` pairs into dense `PredicateId`s and records what
//! the knowledge base declares about predicates:
//! - mutual exclusions between predicate pairs, with the argument positions
//!   that have to be aligned for the exclusion to apply
//! - functional predicates and their relational properties
//!
//! Ids are assigned densely in interning order and never reused. The
//! registry is filled while the knowledge base is loaded and only read
//! afterwards.

use crate::error::{AbductorError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// ID for an interned `(predicate name, arity)` pair
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub(crate) u32);

impl PredicateId {
    /// Reserved handle that no predicate ever receives
    pub const INVALID: PredicateId = PredicateId(u32::MAX);

    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl Serialize for PredicateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PredicateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(PredicateId)
    }
}

/// Index of an argument position in a literal
pub type TermIdx = usize;

/// Relational properties a functional predicate can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationProperty {
    Irreflexive,
    Symmetric,
    Asymmetric,
    Transitive,
    RightUnique,
    LeftUnique,
}

/// Settings of a predicate whose semantics are computed outside the axioms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionalConfig {
    #[serde(default)]
    pub properties: Vec<RelationProperty>,
}

impl FunctionalConfig {
    pub fn new(properties: Vec<RelationProperty>) -> Self {
        FunctionalConfig { properties }
    }

    pub fn has(&self, property: RelationProperty) -> bool {
        self.properties.contains(&property)
    }
}

/// Entry returned for ids that were never assigned
const SENTINEL: (&str, usize) = ("", 0);

/// Anything that can turn a `PredicateId` back into `(name, arity)`
pub trait PredicateNames {
    fn predicate_name(&self, id: PredicateId) -> (&str, usize);
}

impl PredicateNames for PredicateRegistry {
    fn predicate_name(&self, id: PredicateId) -> (&str, usize) {
        self.to_predicate(id)
    }
}

/// Dense `(name, arity)` table plus the declarations attached to predicates
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    /// Interned pairs, indexed by ID
    arities: Vec<(String, usize)>,
    /// Lookup table from pair to ID
    lookup: HashMap<(String, usize), PredicateId>,
    /// Exclusions keyed by the smaller id first
    exclusions: HashMap<PredicateId, HashMap<PredicateId, Vec<(TermIdx, TermIdx)>>>,
    /// Every predicate declared exclusive with the key, in either order
    partners: HashMap<PredicateId, Vec<PredicateId>>,
    functional: HashMap<PredicateId, FunctionalConfig>,
    equality: Option<PredicateId>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a predicate, returning its ID (get-or-create)
    pub fn to_id(&mut self, name: &str, arity: usize) -> PredicateId {
        if let Some(&id) = self.lookup.get(&(name.to_string(), arity)) {
            return id;
        }
        let id = PredicateId(self.arities.len() as u32);
        self.arities.push((name.to_string(), arity));
        self.lookup.insert((name.to_string(), arity), id);
        id
    }

    /// Get the ID for an already-interned predicate
    pub fn find(&self, name: &str, arity: usize) -> Option<PredicateId> {
        self.lookup.get(&(name.to_string(), arity)).copied()
    }

    /// Look up a predicate written as `name/arity`
    pub fn find_by_arity_str(&self, arity: &str) -> Option<PredicateId> {
        let (name, num) = split_arity_str(arity)?;
        self.find(name, num)
    }

    /// Resolve an ID to its `(name, arity)`.
    ///
    /// Unknown ids (including `PredicateId::INVALID`) resolve to `("", 0)`.
    pub fn to_predicate(&self, id: PredicateId) -> (&str, usize) {
        self.arities
            .get(id.0 as usize)
            .map(|(name, arity)| (name.as_str(), *arity))
            .unwrap_or(SENTINEL)
    }

    /// `name/arity` form of a predicate
    pub fn arity_str(&self, id: PredicateId) -> String {
        let (name, arity) = self.to_predicate(id);
        format!("{}/{}", name, arity)
    }

    /// Number of interned predicates
    pub fn len(&self) -> usize {
        self.arities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PredicateId> {
        (0..self.arities.len() as u32).map(PredicateId)
    }

    // === Equality ===

    /// Intern `=/2` and remember it as the equality predicate
    pub fn register_equality(&mut self) -> PredicateId {
        let id = self.to_id("=", 2);
        self.equality = Some(id);
        id
    }

    pub fn equality(&self) -> Option<PredicateId> {
        self.equality
    }

    // === Mutual exclusions ===

    /// Declare `a1` and `a2` mutually exclusive.
    ///
    /// Each pair `(i, j)` says the exclusion applies when argument `i` of an
    /// `a1` literal is identified with argument `j` of an `a2` literal.
    pub fn declare_exclusion(
        &mut self,
        a1: PredicateId,
        a2: PredicateId,
        positions: &[(TermIdx, TermIdx)],
    ) -> Result<()> {
        let (_, arity1) = self.checked(a1)?;
        let (_, arity2) = self.checked(a2)?;
        if let Some(&(i, j)) = positions.iter().find(|&&(i, j)| i >= arity1 || j >= arity2) {
            return Err(AbductorError::InvalidPredicate(format!(
                "exclusion position ({}, {}) out of range for {} and {}",
                i,
                j,
                self.arity_str(a1),
                self.arity_str(a2)
            )));
        }

        let (lo, hi, pairs): (_, _, Vec<_>) = if a1 <= a2 {
            (a1, a2, positions.to_vec())
        } else {
            (a2, a1, positions.iter().map(|&(i, j)| (j, i)).collect())
        };
        let entry = self.exclusions.entry(lo).or_default().entry(hi).or_default();
        for pair in pairs {
            if !entry.contains(&pair) {
                entry.push(pair);
            }
        }

        add_partner(&mut self.partners, lo, hi);
        if lo != hi {
            add_partner(&mut self.partners, hi, lo);
        }
        Ok(())
    }

    /// Position pairs that make `a1` and `a2` inconsistent.
    ///
    /// # Panics
    /// Requires `a1 <= a2`; the relation is stored in canonical order only.
    pub fn find_inconsistent_terms(
        &self,
        a1: PredicateId,
        a2: PredicateId,
    ) -> Option<&[(TermIdx, TermIdx)]> {
        assert!(a1 <= a2, "find_inconsistent_terms requires a1 <= a2 ({} > {})", a1, a2);
        self.exclusions
            .get(&a1)
            .and_then(|m| m.get(&a2))
            .map(|v| v.as_slice())
    }

    /// Order-insensitive form of `find_inconsistent_terms`; the first
    /// position of each returned pair always refers to `a1`.
    pub fn declared_exclusion(
        &self,
        a1: PredicateId,
        a2: PredicateId,
    ) -> Option<Vec<(TermIdx, TermIdx)>> {
        if a1 <= a2 {
            self.find_inconsistent_terms(a1, a2).map(|v| v.to_vec())
        } else {
            self.find_inconsistent_terms(a2, a1)
                .map(|v| v.iter().map(|&(i, j)| (j, i)).collect())
        }
    }

    /// Predicates declared exclusive with `id`
    pub fn exclusive_partners(&self, id: PredicateId) -> &[PredicateId] {
        self.partners.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    // === Functional predicates ===

    pub fn set_functional(&mut self, id: PredicateId, config: FunctionalConfig) -> Result<()> {
        self.checked(id)?;
        self.functional.insert(id, config);
        Ok(())
    }

    pub fn functional_config(&self, id: PredicateId) -> Option<&FunctionalConfig> {
        self.functional.get(&id)
    }

    pub fn functional_predicates(&self) -> &HashMap<PredicateId, FunctionalConfig> {
        &self.functional
    }

    fn checked(&self, id: PredicateId) -> Result<(&str, usize)> {
        if (id.0 as usize) < self.arities.len() {
            Ok(self.to_predicate(id))
        } else {
            Err(AbductorError::InvalidPredicate(id.to_string()))
        }
    }
}

fn add_partner(
    partners: &mut HashMap<PredicateId, Vec<PredicateId>>,
    from: PredicateId,
    to: PredicateId,
) {
    let list = partners.entry(from).or_default();
    if !list.contains(&to) {
        list.push(to);
    }
}

/// Split `name/arity` at the last slash
pub fn split_arity_str(arity: &str) -> Option<(&str, usize)> {
    let idx = arity.rfind('/')?;
    if idx == 0 {
        return None;
    }
    let num = arity[idx + 1..].parse().ok()?;
    Some((&arity[..idx], num))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_interning() {
        let mut registry = PredicateRegistry::new();

        let p1 = registry.to_id("p", 1);
        let p2 = registry.to_id("p", 2);
        let p1_again = registry.to_id("p", 1);

        // Same name, different arity is a different predicate
        assert_ne!(p1, p2);
        assert_eq!(p1, p1_again);
        assert_eq!(p1.as_u32(), 0);
        assert_eq!(p2.as_u32(), 1);
        assert_eq!(registry.to_predicate(p2), ("p", 2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_id_falls_back_to_sentinel() {
        let mut registry = PredicateRegistry::new();
        registry.to_id("p", 1);
        assert_eq!(registry.to_predicate(PredicateId(7)), ("", 0));
        assert_eq!(registry.to_predicate(PredicateId::INVALID), ("", 0));
        assert!(!PredicateId::INVALID.is_valid());
    }

    #[test]
    fn test_find_by_arity_str() {
        let mut registry = PredicateRegistry::new();
        let p = registry.to_id("own/er", 2);
        assert_eq!(registry.find_by_arity_str("own/er/2"), Some(p));
        assert_eq!(registry.find_by_arity_str("own/er/3"), None);
        assert_eq!(registry.find_by_arity_str("nonsense"), None);
        assert_eq!(registry.arity_str(p), "own/er/2");
    }

    #[test]
    fn test_exclusion_is_stored_canonically() {
        let mut registry = PredicateRegistry::new();
        let p = registry.to_id("p", 2);
        let q = registry.to_id("q", 1);

        registry.declare_exclusion(q, p, &[(0, 1)]).unwrap();

        assert_eq!(registry.find_inconsistent_terms(p, q), Some(&[(1, 0)][..]));
        assert_eq!(registry.declared_exclusion(q, p), Some(vec![(0, 1)]));
        assert_eq!(registry.declared_exclusion(p, q), Some(vec![(1, 0)]));
        assert_eq!(registry.exclusive_partners(p), &[q]);
        assert_eq!(registry.exclusive_partners(q), &[p]);
    }

    #[test]
    #[should_panic(expected = "requires a1 <= a2")]
    fn test_unordered_query_panics() {
        let mut registry = PredicateRegistry::new();
        let p = registry.to_id("p", 1);
        let q = registry.to_id("q", 1);
        registry.find_inconsistent_terms(q, p);
    }

    #[test]
    fn test_missing_exclusion_is_none() {
        let mut registry = PredicateRegistry::new();
        let p = registry.to_id("p", 1);
        let q = registry.to_id("q", 1);
        assert!(registry.find_inconsistent_terms(p, q).is_none());
        assert!(registry.exclusive_partners(p).is_empty());
    }

    #[test]
    fn test_exclusion_position_out_of_range() {
        let mut registry = PredicateRegistry::new();
        let p = registry.to_id("p", 1);
        let q = registry.to_id("q", 1);
        assert!(registry.declare_exclusion(p, q, &[(0, 1)]).is_err());
    }

    #[test]
    fn test_functional_config() {
        let mut registry = PredicateRegistry::new();
        let before = registry.to_id("before", 2);
        registry
            .set_functional(before, FunctionalConfig::new(vec![RelationProperty::Asymmetric]))
            .unwrap();
        let config = registry.functional_config(before).unwrap();
        assert!(config.has(RelationProperty::Asymmetric));
        assert!(!config.has(RelationProperty::Symmetric));
        assert!(registry.set_functional(PredicateId(9), FunctionalConfig::default()).is_err());
    }
}
