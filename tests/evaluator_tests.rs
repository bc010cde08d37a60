use std::io::Cursor;

use rpqbench::{
    CardStat, Estimator, EstimatorKind, Evaluator, LabeledGraph, PathExpr, ProjectionGraph, Query,
    RpqError,
    bench_utils::{GraphShape, generate_graph},
};

fn sample_graph() -> LabeledGraph {
    LabeledGraph::from_reader(Cursor::new("3,3,2\n0 0 1 .\n1 0 2 .\n0 1 2 .\n")).expect("graph")
}

fn eval(graph: &LabeledGraph, path: &str) -> Result<CardStat, RpqError> {
    Evaluator::new(graph).evaluate(&Query::new("*", path, "*"))
}

#[test]
fn test_two_hop_path_over_label_zero() {
    let graph = sample_graph();
    assert_eq!(eval(&graph, "0+/0+").unwrap(), CardStat::new(1, 1, 1));
}

#[test]
fn test_single_label_projection() {
    let graph = sample_graph();
    assert_eq!(eval(&graph, "1+").unwrap(), CardStat::new(1, 1, 1));
    assert_eq!(eval(&graph, "0+").unwrap(), CardStat::new(2, 2, 2));
}

#[test]
fn test_inverse_chain_with_no_shared_middle_is_empty() {
    let graph = sample_graph();
    assert_eq!(eval(&graph, "0-/1-").unwrap().path_count, 0);
}

#[test]
fn test_inverse_then_forward() {
    let graph = sample_graph();
    // 0- holds 1->0 and 2->1, 1+ holds 0->2.
    let stats = eval(&graph, "0-/1+").unwrap();
    assert_eq!(stats, CardStat::new(1, 1, 1));
}

#[test]
fn test_unknown_label_evaluates_to_empty() {
    let graph = sample_graph();
    assert_eq!(eval(&graph, "7+/0+").unwrap(), CardStat::default());
}

#[test]
fn test_malformed_leaf_fails_whole_query() {
    let graph = sample_graph();
    for path in ["0+/x", "0*", "(0+/1)/0+", "0+/"] {
        let err = eval(&graph, path).unwrap_err();
        assert!(matches!(err, RpqError::InvalidLabel(_)), "{path}: {err}");
    }
}

#[test]
fn test_right_assoc_parse_agrees_with_left_fold() {
    let graph = generate_graph(GraphShape::RandomErdosRenyi { edges: 150 }, 30, 3, 0xA5).to_graph();
    let evaluator = Evaluator::new(&graph);
    let parsed = evaluator.evaluate_path(&PathExpr::parse("0+/1-/2+")).unwrap();
    let manual = ProjectionGraph::join(
        &ProjectionGraph::join(
            &ProjectionGraph::project(&graph, 0, false),
            &ProjectionGraph::project(&graph, 1, true),
        ),
        &ProjectionGraph::project(&graph, 2, false),
    );
    assert_eq!(parsed.path_count, manual.edge_count());
    let grouped = evaluator.evaluate_path(&PathExpr::parse("0+/(1-/2+)")).unwrap();
    assert_eq!(parsed, grouped);
}

#[test]
fn test_leaf_evaluation_borrows_graph_storage() {
    let graph = sample_graph();
    let evaluator = Evaluator::new(&graph);
    let leaf = evaluator.evaluate_tree(&PathExpr::parse("0+")).unwrap();
    assert!(leaf.is_borrowed());
    let joined = evaluator.evaluate_tree(&PathExpr::parse("0+/0+")).unwrap();
    assert!(!joined.is_borrowed());
}

#[test]
fn test_long_concatenation_chain_runs_to_completion() {
    let mut graph = LabeledGraph::with_labels(1);
    graph.add_edge(0, 1, 0);
    let path = vec!["0+"; 100_000].join("/");
    let tree = PathExpr::parse(&path);
    assert_eq!(tree.depth(), 100_000);
    assert_eq!(tree.leaves().len(), 100_000);
    assert!(tree.to_string().starts_with("(/ (/ "));

    let estimator = Estimator::prepared(EstimatorKind::Summary, &graph);
    let evaluator = Evaluator::with_estimator(&graph, estimator);
    assert_eq!(evaluator.evaluate_path(&tree).unwrap(), CardStat::default());
    assert_eq!(evaluator.estimate(&tree).unwrap(), CardStat::new(1, 1, 1));
}

#[test]
fn test_deeply_nested_groups_evaluate() {
    let mut graph = LabeledGraph::with_labels(1);
    graph.add_edge(0, 0, 0);
    let levels = 20_000;
    let path = format!("{}0+{}", "0+/(".repeat(levels), ")".repeat(levels));
    let tree = PathExpr::parse(&path);
    assert_eq!(tree.depth(), levels + 1);
    assert_eq!(
        Evaluator::new(&graph).evaluate_path(&tree).unwrap(),
        CardStat::new(1, 1, 1)
    );
}
