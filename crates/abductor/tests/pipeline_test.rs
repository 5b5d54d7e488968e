//! Session tests with stand-in converter and solver components

use abductor::{
    AbductorError, DepthBasedEnumerator, EnumeratorConfig, IlpConverter, IlpProblem, IlpSolution,
    IlpSolver, KnowledgeBase, Observation, ProofGraph, Result, Session, SessionConfig,
    SolutionStatus, Timeout,
};
use std::sync::Arc;

/// One variable per node
struct NodeCountConverter;

impl IlpConverter for NodeCountConverter {
    fn name(&self) -> &str {
        "node-count"
    }

    fn execute(&self, graph: &ProofGraph, _timeout: &Timeout) -> Result<IlpProblem> {
        let names: Vec<String> = graph.nodes().iter().map(|n| graph.node_string(n.index())).collect();
        Ok(IlpProblem::new("nodes", graph.nodes().len(), names))
    }
}

/// Selects every variable
struct AllOnesSolver;

impl IlpSolver for AllOnesSolver {
    fn name(&self) -> &str {
        "all-ones"
    }

    fn execute(&self, problem: &IlpProblem, _timeout: &Timeout) -> Result<Vec<IlpSolution>> {
        Ok(vec![IlpSolution {
            status: SolutionStatus::Optimal,
            objective: Some(problem.num_variables() as f64),
            values: vec![1.0; problem.num_variables()],
        }])
    }
}

struct UnavailableSolver;

impl IlpSolver for UnavailableSolver {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn execute(&self, problem: &IlpProblem, _timeout: &Timeout) -> Result<Vec<IlpSolution>> {
        Ok(vec![IlpSolution::not_available(problem)])
    }
}

fn kb() -> Arc<KnowledgeBase> {
    let mut builder = KnowledgeBase::builder();
    builder.add_rule(Some("bird-fly"), "bird(X) => fly(X)", None).unwrap();
    builder.add_rule(Some("plane-fly"), "plane(X) => fly(X)", None).unwrap();
    builder.declare_exclusion("bird/1", "plane/1", &[(0, 0)]).unwrap();
    Arc::new(builder.build())
}

fn full_session(config: SessionConfig) -> Session {
    let mut session = Session::new(kb(), config);
    session.set_enumerator(Box::new(DepthBasedEnumerator::new(EnumeratorConfig::default())));
    session.set_converter(Box::new(NodeCountConverter));
    session.set_solver(Box::new(AllOnesSolver));
    session
}

#[test]
fn test_check_validity_names_missing_component() {
    let mut session = Session::new(kb(), SessionConfig::default());
    let err = session.check_validity().unwrap_err();
    assert!(matches!(err, AbductorError::MissingComponent("lhs_enumerator")));
    assert_eq!(err.to_string(), "Cannot infer, because of lack of lhs_enumerator");

    session.set_enumerator(Box::new(DepthBasedEnumerator::default()));
    let err = session.check_validity().unwrap_err();
    assert!(matches!(err, AbductorError::MissingComponent("ilp_converter")));

    session.set_converter(Box::new(NodeCountConverter));
    let err = session.check_validity().unwrap_err();
    assert!(matches!(err, AbductorError::MissingComponent("ilp_solver")));

    session.set_solver(Box::new(AllOnesSolver));
    assert!(session.check_validity().is_ok());
}

#[test]
fn test_infer_without_components_fails() {
    let mut session = Session::new(kb(), SessionConfig::default());
    let obs = Observation::parse("o1", "fly(tweety)").unwrap();
    assert!(session.infer(&obs).is_err());
    assert!(session.graph().is_none());
}

#[test]
fn test_infer_runs_all_stages() {
    let mut session = full_session(SessionConfig::default());
    let obs = Observation::parse("o1", "fly(tweety)").unwrap();

    assert!(session.infer(&obs).unwrap());

    let graph = session.graph().unwrap();
    // fly(tweety), bird(tweety), plane(tweety)
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.attributes().get("observation").map(String::as_str), Some("o1"));
    let bird = graph.search_nodes_with_predicate("bird", 1)[0];
    let plane = graph.search_nodes_with_predicate("plane", 1)[0];
    assert!(graph.search_mutual_exclusion_of_node(bird, plane).is_some());

    let problem = session.problem().unwrap();
    assert_eq!(problem.name(), "nodes");
    assert_eq!(problem.num_variables(), 3);
    let names = problem.payload::<Vec<String>>().unwrap();
    assert_eq!(names[0], "fly(tweety):0");
    assert!(problem.payload::<u32>().is_none());

    assert_eq!(session.solutions().len(), 1);
    assert!(session.solutions()[0].is_available());
    assert_eq!(session.solutions()[0].objective, Some(3.0));
}

#[test]
fn test_next_inference_replaces_products() {
    let mut session = full_session(SessionConfig::default());
    session.infer(&Observation::parse("o1", "fly(tweety)").unwrap()).unwrap();
    session
        .infer(&Observation::parse("o2", "fly(a) & fly(b)").unwrap())
        .unwrap();

    let graph = session.graph().unwrap();
    assert_eq!(graph.attributes().get("observation").map(String::as_str), Some("o2"));
    assert_eq!(graph.observation_indices().len(), 2);
    assert_eq!(session.problem().unwrap().num_variables(), graph.nodes().len());
}

#[test]
fn test_replacing_solver() {
    let mut session = full_session(SessionConfig::default());
    assert_eq!(session.solver().map(|s| s.name()), Some("all-ones"));

    session.set_solver(Box::new(UnavailableSolver));
    assert_eq!(session.solver().map(|s| s.name()), Some("unavailable"));
    assert_eq!(session.enumerator().map(|e| e.name()), Some("depth"));
    assert_eq!(session.converter().map(|c| c.name()), Some("node-count"));

    session.infer(&Observation::parse("o1", "fly(x)").unwrap()).unwrap();
    let solution = &session.solutions()[0];
    assert!(!solution.is_available());
    assert_eq!(solution.status, SolutionStatus::NotAvailable);
    assert_eq!(solution.values, vec![0.0; 3]);
}

#[test]
fn test_target_filter() {
    let mut session = full_session(SessionConfig::default());
    assert!(session.is_target("anything"));

    session.add_target("wanted");
    assert!(session.is_target("wanted"));
    assert!(!session.is_target("other"));

    assert!(!session.infer(&Observation::parse("other", "fly(x)").unwrap()).unwrap());
    assert!(session.graph().is_none());
    assert!(session.infer(&Observation::parse("wanted", "fly(x)").unwrap()).unwrap());
    assert!(session.graph().is_some());

    session.clear_targets();
    assert!(session.is_target("other"));
}

#[test]
fn test_exclusion_filter() {
    let mut session = full_session(SessionConfig::default());
    session.add_exclusion("skip");
    assert!(session.is_excluded("skip"));
    assert!(!session.infer(&Observation::parse("skip", "fly(x)").unwrap()).unwrap());

    // exclusion wins over an explicit target
    session.add_target("skip");
    assert!(!session.infer(&Observation::parse("skip", "fly(x)").unwrap()).unwrap());

    session.clear_exclusions();
    assert!(session.infer(&Observation::parse("skip", "fly(x)").unwrap()).unwrap());
}

#[test]
fn test_params_and_flags() {
    let mut session = Session::new(kb(), SessionConfig::default());
    session.set_param("max_depth", "4");
    session.set_param("threshold", " 0.25 ");
    session.set_param("broken", "four");

    assert_eq!(session.param("max_depth"), Some("4"));
    assert_eq!(session.param_int("max_depth", -1), 4);
    assert_eq!(session.param_int("broken", -1), -1);
    assert_eq!(session.param_int("missing", 7), 7);
    assert_eq!(session.param_float("threshold", 0.0), 0.25);
    assert_eq!(session.param_float("missing", 1.5), 1.5);

    session.erase_param("max_depth");
    assert_eq!(session.param("max_depth"), None);

    assert!(!session.flag("verbose"));
    session.set_flag("verbose");
    assert!(session.flag("verbose"));
    session.erase_flag("verbose");
    assert!(!session.flag("verbose"));
}

#[test]
fn test_session_config_from_json() {
    let json = r#"{
        "timeout_all": 10.0,
        "timeout_lhs": -1.0,
        "params": {"k": "v"},
        "flags": ["f"],
        "targets": ["o1"],
        "enumerator": {"max_depth": 1}
    }"#;
    let config: SessionConfig = abductor::config::from_json_str(json).unwrap();
    assert_eq!(config.total_timeout(), Some(std::time::Duration::from_secs(10)));
    assert_eq!(config.lhs_timeout(), None);
    assert_eq!(config.enumerator.max_depth, Some(1));

    let session = full_session(config);
    assert_eq!(session.param("k"), Some("v"));
    assert!(session.flag("f"));
    assert!(session.is_target("o1"));
    assert!(!session.is_target("o2"));
}

#[test]
fn test_requirements_reach_the_graph() {
    let mut session = full_session(SessionConfig::default());
    let obs = Observation::parse("o1", "fly(tweety)")
        .unwrap()
        .with_requirements("bird(tweety)")
        .unwrap();
    session.infer(&obs).unwrap();

    let graph = session.graph().unwrap();
    assert_eq!(graph.requirements().len(), 1);
    assert_eq!(graph.requirements()[0].literals.len(), 1);
    assert!(!graph.requirements()[0].is_gold);
}
