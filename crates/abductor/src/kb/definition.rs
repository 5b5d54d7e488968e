//! JSON form of a knowledge base
//!
//! ```json
//! {
//!   "config": { "max_distance": 3.0, "distance": { "type": "cost", "default_cost": 1.0 } },
//!   "predicates": ["p/1", "q/1"],
//!   "axioms": [ { "name": "pr", "rule": "p(X) => r(X)", "cost": 1.5 } ],
//!   "exclusions": [ { "left": "p/1", "right": "q/1", "positions": [[0, 0]] } ],
//!   "functional": [ { "predicate": "before/2", "properties": ["asymmetric"] } ]
//! }
//! ```
//!
//! `predicates` is optional; listing predicates there fixes their ids in
//! declaration order before any axiom is read.

use super::predicates::{FunctionalConfig, TermIdx};
use crate::config::KnowledgeBaseConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseDefinition {
    #[serde(default)]
    pub config: KnowledgeBaseConfig,
    #[serde(default)]
    pub predicates: Vec<String>,
    #[serde(default)]
    pub axioms: Vec<AxiomDefinition>,
    #[serde(default)]
    pub exclusions: Vec<ExclusionDefinition>,
    #[serde(default)]
    pub functional: Vec<FunctionalDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxiomDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub rule: String,
    #[serde(default)]
    pub cost: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionDefinition {
    pub left: String,
    pub right: String,
    #[serde(default)]
    pub positions: Vec<(TermIdx, TermIdx)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalDefinition {
    pub predicate: String,
    #[serde(flatten)]
    pub config: FunctionalConfig,
}

#[cfg(test)]
mod tests {
    use crate::kb::{KnowledgeBase, RelationProperty};

    const KB_JSON: &str = r#"{
        "config": { "max_distance": 3.0, "distance": { "type": "uniform", "value": 0.5 } },
        "predicates": ["p/1", "q/1"],
        "axioms": [
            { "name": "pr", "rule": "p(X) => r(X)" },
            { "rule": "r(X) & s(X, Y) => q(Y)", "cost": 2.0 }
        ],
        "exclusions": [ { "left": "p/1", "right": "q/1", "positions": [[0, 0]] } ],
        "functional": [ { "predicate": "before/2", "properties": ["asymmetric"] } ]
    }"#;

    #[test]
    fn test_load_from_json() {
        let kb = KnowledgeBase::from_json_str(KB_JSON).unwrap();
        let preds = kb.predicates();
        let p = preds.find("p", 1).unwrap();
        let q = preds.find("q", 1).unwrap();
        let before = preds.find("before", 2).unwrap();

        assert_eq!((p.as_u32(), q.as_u32()), (0, 1));
        assert_eq!(kb.axioms().len(), 2);
        assert_eq!(kb.axiom(1).name, "_0x00000000");
        assert_eq!(preds.find_inconsistent_terms(p, q), Some(&[(0, 0)][..]));
        assert!(preds
            .functional_config(before)
            .unwrap()
            .has(RelationProperty::Asymmetric));
        assert_eq!(kb.max_distance(), Some(3.0));
        assert_eq!(kb.distance_of(1), 0.5);
    }

    #[test]
    fn test_empty_definition() {
        let kb = KnowledgeBase::from_json_str("{}").unwrap();
        assert!(kb.axioms().is_empty());
        assert_eq!(kb.predicates().len(), 1);
        assert_eq!(kb.max_distance(), None);
    }

    #[test]
    fn test_bad_rule_is_an_error() {
        let json = r#"{ "axioms": [ { "rule": "p(X) =>" } ] }"#;
        assert!(KnowledgeBase::from_json_str(json).is_err());
    }
}
