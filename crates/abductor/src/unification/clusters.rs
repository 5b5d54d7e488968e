//! Clusters of terms that may denote the same entity
//!
//! A union-find over terms. Each unification or equality assumption merges
//! the clusters of its two terms; a cluster is the transitive closure of
//! those merges.

use crate::logic::Term;
use std::collections::HashMap;

/// Handle of a cluster. Only valid until the next merge.
pub type ClusterIdx = usize;

#[derive(Debug, Clone, Default)]
pub struct UnifiableVariableClusterSet {
    /// Terms in first-seen order
    terms: Vec<Term>,
    index: HashMap<Term, usize>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnifiableVariableClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `t1` and `t2` are unifiable, merging their clusters
    pub fn add(&mut self, t1: &Term, t2: &Term) {
        let a = self.insert(t1);
        let b = self.insert(t2);
        self.union(a, b);
    }

    /// Register a term as a singleton cluster (no-op if known)
    pub fn add_term(&mut self, term: &Term) {
        self.insert(term);
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.index.contains_key(term)
    }

    /// The cluster containing `term`, or `None` if the term was never added
    pub fn find_cluster(&self, term: &Term) -> Option<ClusterIdx> {
        self.index.get(term).map(|&i| self.root(i))
    }

    pub fn is_in_same_cluster(&self, t1: &Term, t2: &Term) -> bool {
        if t1 == t2 {
            return true;
        }
        match (self.find_cluster(t1), self.find_cluster(t2)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Every term clustered with `term`, including itself, in first-seen order
    pub fn cluster_members(&self, term: &Term) -> Vec<Term> {
        match self.find_cluster(term) {
            Some(root) => (0..self.terms.len())
                .filter(|&i| self.root(i) == root)
                .map(|i| self.terms[i].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// All clusters, each in first-seen order, ordered by their first term
    pub fn clusters(&self) -> Vec<Vec<Term>> {
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let mut out: Vec<Vec<Term>> = Vec::new();
        for (i, term) in self.terms.iter().enumerate() {
            let root = self.root(i);
            let k = *slot.entry(root).or_insert_with(|| {
                out.push(Vec::new());
                out.len() - 1
            });
            out[k].push(term.clone());
        }
        out
    }

    /// Number of known terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn insert(&mut self, term: &Term) -> usize {
        if let Some(&i) = self.index.get(term) {
            return i;
        }
        let i = self.terms.len();
        self.terms.push(term.clone());
        self.index.insert(term.clone(), i);
        self.parent.push(i);
        self.rank.push(0);
        i
    }

    // No path compression: union by rank keeps trees logarithmic and lets
    // lookups take `&self`.
    fn root(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
