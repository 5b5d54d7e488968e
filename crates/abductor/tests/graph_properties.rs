//! Property-based tests for proof graph invariants using proptest.

use abductor::{parse_literal, GraphConfig, KnowledgeBase, NodeIdx, ProofGraph, Term};
use proptest::prelude::*;
use std::sync::Arc;

const RULES: &[&str] = &[
    "q(X) => p(X)",
    "r(X, Y) => q(X)",
    "p(X) & s(X) => t(X)",
    "t(X) => r(X, X)",
    "q(X) & s(Y) => r(X, Y)",
    "!p(X) => u(X)",
];

const OBSERVATIONS: &[&str] = &["p", "q", "s", "t", "!p", "u"];
const CONSTANTS: &[&str] = &["a", "b", "X", "Y"];

fn kb() -> Arc<KnowledgeBase> {
    let mut builder = KnowledgeBase::builder();
    for rule in RULES {
        builder.add_rule(None, rule, None).unwrap();
    }
    builder.declare_exclusion("p/1", "s/1", &[(0, 0)]).unwrap();
    Arc::new(builder.build())
}

/// One `chain` call: which targets (by position in the node list), which
/// axiom and which direction
#[derive(Debug, Clone)]
struct ChainOp {
    targets: Vec<u8>,
    axiom: u8,
    backward: bool,
}

fn arb_observations() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0..OBSERVATIONS.len() as u8, 0..CONSTANTS.len() as u8), 1..5)
}

fn arb_ops() -> impl Strategy<Value = Vec<ChainOp>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(any::<u8>(), 1..3),
            0..RULES.len() as u8,
            any::<bool>(),
        )
            .prop_map(|(targets, axiom, backward)| ChainOp {
                targets,
                axiom,
                backward,
            }),
        0..12,
    )
}

fn build(observations: &[(u8, u8)]) -> ProofGraph {
    let mut graph = ProofGraph::new(kb(), GraphConfig::default());
    for &(p, c) in observations {
        let text = format!("{}({})", OBSERVATIONS[p as usize], CONSTANTS[c as usize]);
        let lit = graph.literal(&parse_literal(&text).unwrap());
        graph.add_observation(lit, 0);
    }
    graph
}

fn targets_of(graph: &ProofGraph, op: &ChainOp) -> Vec<NodeIdx> {
    let n = graph.nodes().len();
    op.targets.iter().map(|&t| t as usize % n).collect()
}

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn observe(graph: &mut ProofGraph, text: &str) -> NodeIdx {
    let lit = graph.literal(&parse_literal(text).unwrap());
    graph.add_observation(lit, 0)
}

fn run(graph: &mut ProofGraph, ops: &[ChainOp]) {
    for op in ops {
        let targets = targets_of(graph, op);
        graph.chain(&targets, op.axiom as usize, op.backward);
    }
}

proptest! {
    /// ancestors contain the parents and are transitively closed
    #[test]
    fn ancestors_are_closed(obs in arb_observations(), ops in arb_ops()) {
        let mut graph = build(&obs);
        run(&mut graph, &ops);
        for node in graph.nodes() {
            prop_assert!(node.parents().is_subset(node.ancestors()));
            for &a in node.ancestors() {
                prop_assert!(graph.node(a).ancestors().is_subset(node.ancestors()));
            }
        }
    }

    /// a chained node is one deeper than its deepest parent
    #[test]
    fn depth_is_monotone(obs in arb_observations(), ops in arb_ops()) {
        let mut graph = build(&obs);
        run(&mut graph, &ops);
        for node in graph.nodes() {
            if let Some(deepest) = node.parents().iter().map(|&p| graph.node(p).depth()).max() {
                prop_assert_eq!(node.depth(), deepest + 1);
            }
        }
    }

    /// the exclusion table answers the same in both orders
    #[test]
    fn exclusions_are_symmetric(obs in arb_observations(), ops in arb_ops()) {
        let mut graph = build(&obs);
        run(&mut graph, &ops);
        let n = graph.nodes().len();
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(
                    graph.search_mutual_exclusion_of_node(i, j),
                    graph.search_mutual_exclusion_of_node(j, i)
                );
                prop_assert_eq!(
                    graph.check_coexistability(&[i, j]),
                    graph.check_coexistability(&[j, i])
                );
            }
        }
    }

    /// further construction never changes existing nodes, hypernodes or edges
    #[test]
    fn indices_are_stable(obs in arb_observations(), first in arb_ops(), second in arb_ops()) {
        let mut graph = build(&obs);
        run(&mut graph, &first);
        let literals: Vec<_> = graph.nodes().iter().map(|n| n.literal().clone()).collect();
        let hypernodes = graph.hypernodes().to_vec();
        let edges = graph.edges().to_vec();

        run(&mut graph, &second);
        for (i, lit) in literals.iter().enumerate() {
            prop_assert_eq!(graph.node(i).literal(), lit);
            prop_assert_eq!(graph.node(i).index(), i);
        }
        prop_assert_eq!(&graph.hypernodes()[..hypernodes.len()], &hypernodes[..]);
        prop_assert_eq!(&graph.edges()[..edges.len()], &edges[..]);
    }

    /// repeating an application adds nothing and returns the same head
    #[test]
    fn chaining_is_idempotent(obs in arb_observations(), ops in arb_ops()) {
        let mut graph = build(&obs);
        for op in &ops {
            let targets = targets_of(&graph, op);
            let first = graph.chain(&targets, op.axiom as usize, op.backward);
            let sizes = (graph.nodes().len(), graph.hypernodes().len(), graph.edges().len());
            let again = graph.chain(&targets, op.axiom as usize, op.backward);
            prop_assert_eq!(first, again);
            prop_assert_eq!(
                sizes,
                (graph.nodes().len(), graph.hypernodes().len(), graph.edges().len())
            );
        }
    }

    /// every hypernode is found again through its unordered node set
    #[test]
    fn hypernodes_are_deduplicated(obs in arb_observations(), ops in arb_ops()) {
        let mut graph = build(&obs);
        run(&mut graph, &ops);
        for (i, nodes) in graph.hypernodes().iter().enumerate() {
            let mut reversed = nodes.clone();
            reversed.reverse();
            prop_assert_eq!(graph.find_hypernode_with_unordered_nodes(&reversed), Some(i));
        }
    }

    /// every ordering of a three-literal tuple is matched position by
    /// position and memoized separately
    #[test]
    fn chaining_respects_target_order(
        c0 in 0..CONSTANTS.len(),
        c1 in 0..CONSTANTS.len(),
        c2 in 0..CONSTANTS.len(),
    ) {
        let mut builder = KnowledgeBase::builder();
        let ax = builder.add_rule(None, "p(X) & p(Y) & q(Z) => w(X, Y, Z)", None).unwrap();
        let mut graph = ProofGraph::new(Arc::new(builder.build()), GraphConfig::default());
        let targets = [
            observe(&mut graph, &format!("p({})", CONSTANTS[c0])),
            observe(&mut graph, &format!("p({})", CONSTANTS[c1])),
            observe(&mut graph, &format!("q({})", CONSTANTS[c2])),
        ];

        let mut heads = Vec::new();
        for perm in PERMUTATIONS {
            let ordered: Vec<NodeIdx> = perm.iter().map(|&i| targets[i]).collect();
            let head = graph.forward_chain(&ordered, ax);
            // only orders that keep the q node last match the templates
            prop_assert_eq!(head.is_some(), perm[2] == 2);
            if let Some(h) = head {
                let expected: Vec<Term> = ordered
                    .iter()
                    .map(|&n| graph.node(n).literal().terms[0].clone())
                    .collect();
                let created = graph.hypernode(h);
                prop_assert_eq!(created.len(), 1);
                prop_assert_eq!(&graph.node(created[0]).literal().terms, &expected);
                prop_assert!(!heads.contains(&h));
                heads.push(h);
            }
        }
        prop_assert_eq!(heads.len(), 2);

        // re-chaining each order returns its own head
        let mut memoized = Vec::new();
        for perm in PERMUTATIONS.iter().filter(|perm| perm[2] == 2) {
            let ordered: Vec<NodeIdx> = perm.iter().map(|&i| targets[i]).collect();
            memoized.push(graph.forward_chain(&ordered, ax));
        }
        prop_assert_eq!(memoized, heads.into_iter().map(Some).collect::<Vec<_>>());
    }
}
