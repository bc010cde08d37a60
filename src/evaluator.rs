use tracing::debug;

use crate::{
    errors::RpqError,
    estimator::{Estimator, EstimatorKind},
    graph::LabeledGraph,
    path::{LabelAtom, PathExpr},
    projection::ProjectionGraph,
    query::Query,
    stats::CardStat,
};

pub struct Evaluator<'g> {
    graph: &'g LabeledGraph,
    estimator_kind: EstimatorKind,
    estimator: Option<Estimator>,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g LabeledGraph) -> Self {
        Self::with_estimator_kind(graph, EstimatorKind::default())
    }

    pub fn with_estimator_kind(graph: &'g LabeledGraph, estimator_kind: EstimatorKind) -> Self {
        Self {
            graph,
            estimator_kind,
            estimator: None,
        }
    }

    pub fn with_estimator(graph: &'g LabeledGraph, estimator: Estimator) -> Self {
        Self {
            graph,
            estimator_kind: estimator.kind(),
            estimator: Some(estimator),
        }
    }

    pub fn prepare(&mut self) {
        self.estimator = Some(Estimator::prepared(self.estimator_kind, self.graph));
    }

    pub fn estimate(&self, tree: &PathExpr) -> Result<CardStat, RpqError> {
        self.estimator
            .as_ref()
            .ok_or(RpqError::NotPrepared)?
            .estimate(tree)
    }

    pub fn evaluate(&self, query: &Query) -> Result<CardStat, RpqError> {
        let tree = query.tree();
        debug!(query = %query, tree = %tree, "evaluating query");
        self.evaluate_path(&tree)
    }

    pub fn evaluate_path(&self, tree: &PathExpr) -> Result<CardStat, RpqError> {
        Ok(self.evaluate_tree(tree)?.stats())
    }

    pub fn evaluate_tree(&self, tree: &PathExpr) -> Result<ProjectionGraph<'g>, RpqError> {
        let graph = self.graph;
        tree.try_fold(
            |token| -> Result<ProjectionGraph<'g>, RpqError> {
                let atom = LabelAtom::parse(token)?;
                Ok(ProjectionGraph::project(graph, atom.label, atom.is_inverse()))
            },
            |left, right| Ok(ProjectionGraph::join(&left, &right)),
            |operator, _| {
                Err(RpqError::unsupported_operator(format!(
                    "unary operator {operator}"
                )))
            },
        )
    }
}
