//! Knowledge base: predicates, axioms and the distance heuristic
//!
//! A `KnowledgeBase` is assembled once through `KnowledgeBaseBuilder` and
//! is read-only afterwards, except for the distance cache. Wrap it in an
//! `Arc` to share it between proof graphs.

pub mod axioms;
pub mod definition;
pub mod distance;
pub mod predicates;

pub use axioms::AxiomStore;
pub use definition::{
    AxiomDefinition, ExclusionDefinition, FunctionalDefinition, KnowledgeBaseDefinition,
};
pub use distance::{
    CostDistance, DistanceCache, DistanceProvider, DistanceSpec, FnDistance, UniformDistance,
};
pub use predicates::{
    split_arity_str, FunctionalConfig, PredicateId, PredicateNames, PredicateRegistry,
    RelationProperty, TermIdx,
};

use crate::config::KnowledgeBaseConfig;
use crate::error::{AbductorError, Result};
use crate::logic::{parse_rule, Axiom, AxiomId, Literal, ParsedLiteral};
use std::fmt;
use tracing::info;

pub struct KnowledgeBase {
    predicates: PredicateRegistry,
    axioms: AxiomStore,
    provider: Box<dyn DistanceProvider>,
    cache: DistanceCache,
    max_distance: Option<f32>,
}

impl KnowledgeBase {
    pub fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::new()
    }

    pub fn predicates(&self) -> &PredicateRegistry {
        &self.predicates
    }

    pub fn axioms(&self) -> &AxiomStore {
        &self.axioms
    }

    /// # Panics
    /// Panics if `id` is not an axiom of this knowledge base.
    pub fn axiom(&self, id: AxiomId) -> &Axiom {
        self.axioms.get(id)
    }

    /// Candidate axioms for forward chaining from `predicate`
    pub fn axioms_with_left(&self, predicate: PredicateId) -> &[AxiomId] {
        self.axioms.axioms_with_left(predicate)
    }

    /// Candidate axioms for backward chaining from `predicate`
    pub fn axioms_with_right(&self, predicate: PredicateId) -> &[AxiomId] {
        self.axioms.axioms_with_right(predicate)
    }

    /// Cost of applying `axiom`, memoized across every search on this
    /// knowledge base
    pub fn distance(&self, axiom: &Axiom) -> f32 {
        self.cache
            .get_or_compute(axiom.id, || self.provider.distance(axiom))
    }

    pub fn distance_of(&self, id: AxiomId) -> f32 {
        self.distance(self.axioms.get(id))
    }

    pub fn distance_provider(&self) -> &dyn DistanceProvider {
        self.provider.as_ref()
    }

    pub fn distance_cache(&self) -> &DistanceCache {
        &self.cache
    }

    pub fn clear_distance_cache(&self) {
        self.cache.clear();
    }

    /// Ceiling on accumulated path cost; `None` means unbounded
    pub fn max_distance(&self) -> Option<f32> {
        self.max_distance
    }

    /// True if a hypothesis with accumulated cost `d` must not be generated
    pub fn exceeds_max_distance(&self, d: f32) -> bool {
        matches!(self.max_distance, Some(max) if d > max)
    }

    /// The `=/2` predicate, always registered by the builder
    pub fn equality_predicate(&self) -> PredicateId {
        self.predicates.equality().unwrap_or(PredicateId::INVALID)
    }

    /// Resolve a parsed literal against the registry without interning
    pub fn resolve(&self, parsed: &ParsedLiteral) -> Option<Literal> {
        let id = self.predicates.find(&parsed.predicate, parsed.terms.len())?;
        Some(Literal::new(id, parsed.terms.clone(), parsed.polarity))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: KnowledgeBaseDefinition = serde_json::from_str(json)?;
        Ok(KnowledgeBaseBuilder::from_definition(&definition)?.build())
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl PredicateNames for KnowledgeBase {
    fn predicate_name(&self, id: PredicateId) -> (&str, usize) {
        self.predicates.to_predicate(id)
    }
}

impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("predicates", &self.predicates.len())
            .field("axioms", &self.axioms.len())
            .field("distance", &self.provider.name())
            .field("max_distance", &self.max_distance)
            .finish()
    }
}

/// Incremental construction of a `KnowledgeBase`
pub struct KnowledgeBaseBuilder {
    predicates: PredicateRegistry,
    axioms: AxiomStore,
    config: KnowledgeBaseConfig,
    provider: Option<Box<dyn DistanceProvider>>,
}

impl Default for KnowledgeBaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBaseBuilder {
    pub fn new() -> Self {
        Self::with_config(KnowledgeBaseConfig::default())
    }

    pub fn with_config(config: KnowledgeBaseConfig) -> Self {
        KnowledgeBaseBuilder {
            predicates: PredicateRegistry::new(),
            axioms: AxiomStore::new(),
            config,
            provider: None,
        }
    }

    /// Replay a JSON definition into a fresh builder
    pub fn from_definition(definition: &KnowledgeBaseDefinition) -> Result<Self> {
        let mut builder = Self::with_config(definition.config.clone());
        for arity in &definition.predicates {
            builder.predicate_by_arity_str(arity)?;
        }
        for axiom in &definition.axioms {
            builder.add_rule(axiom.name.as_deref(), &axiom.rule, axiom.cost)?;
        }
        for exclusion in &definition.exclusions {
            builder.declare_exclusion(&exclusion.left, &exclusion.right, &exclusion.positions)?;
        }
        for functional in &definition.functional {
            builder.set_functional(&functional.predicate, functional.config.clone())?;
        }
        Ok(builder)
    }

    pub fn predicates(&self) -> &PredicateRegistry {
        &self.predicates
    }

    /// Intern a predicate
    pub fn predicate(&mut self, name: &str, arity: usize) -> PredicateId {
        self.predicates.to_id(name, arity)
    }

    /// Intern a predicate written as `name/arity`
    pub fn predicate_by_arity_str(&mut self, arity: &str) -> Result<PredicateId> {
        let (name, num) = split_arity_str(arity)
            .ok_or_else(|| AbductorError::InvalidPredicate(arity.to_string()))?;
        Ok(self.predicates.to_id(name, num))
    }

    /// Intern the predicate of a parsed literal and build the literal
    pub fn literal(&mut self, parsed: &ParsedLiteral) -> Literal {
        let id = self.predicates.to_id(&parsed.predicate, parsed.terms.len());
        Literal::new(id, parsed.terms.clone(), parsed.polarity)
    }

    /// Add an axiom given as rule text, e.g. `p(X) & q(X, Y) => r(Y)`
    pub fn add_rule(&mut self, name: Option<&str>, rule: &str, cost: Option<f32>) -> Result<AxiomId> {
        let parsed = parse_rule(rule)?;
        let left = parsed.left.iter().map(|l| self.literal(l)).collect();
        let right = parsed.right.iter().map(|l| self.literal(l)).collect();
        self.axioms.add(name, left, right, cost)
    }

    /// Add an axiom from already resolved literals
    pub fn add_axiom(
        &mut self,
        name: Option<&str>,
        left: Vec<Literal>,
        right: Vec<Literal>,
        cost: Option<f32>,
    ) -> Result<AxiomId> {
        self.axioms.add(name, left, right, cost)
    }

    /// Declare two predicates, written as `name/arity`, mutually exclusive
    pub fn declare_exclusion(
        &mut self,
        left: &str,
        right: &str,
        positions: &[(TermIdx, TermIdx)],
    ) -> Result<()> {
        let a1 = self.predicate_by_arity_str(left)?;
        let a2 = self.predicate_by_arity_str(right)?;
        self.predicates.declare_exclusion(a1, a2, positions)
    }

    pub fn declare_exclusion_ids(
        &mut self,
        a1: PredicateId,
        a2: PredicateId,
        positions: &[(TermIdx, TermIdx)],
    ) -> Result<()> {
        self.predicates.declare_exclusion(a1, a2, positions)
    }

    pub fn set_functional(&mut self, predicate: &str, config: FunctionalConfig) -> Result<()> {
        let id = self.predicate_by_arity_str(predicate)?;
        self.predicates.set_functional(id, config)
    }

    /// Use a custom provider instead of the one named in the config
    pub fn distance_provider(&mut self, provider: Box<dyn DistanceProvider>) -> &mut Self {
        self.provider = Some(provider);
        self
    }

    pub fn max_distance(&mut self, max_distance: Option<f32>) -> &mut Self {
        self.config.max_distance = max_distance;
        self
    }

    pub fn build(self) -> KnowledgeBase {
        let KnowledgeBaseBuilder {
            mut predicates,
            axioms,
            config,
            provider,
        } = self;
        predicates.register_equality();
        let provider = provider.unwrap_or_else(|| config.distance.build());

        info!(
            predicates = predicates.len(),
            axioms = axioms.len(),
            functional = predicates.functional_predicates().len(),
            distance = provider.name(),
            "knowledge base loaded"
        );

        KnowledgeBase {
            predicates,
            axioms,
            provider,
            cache: DistanceCache::new(),
            max_distance: config.max_distance,
        }
    }
}
