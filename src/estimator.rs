use std::{fmt, str::FromStr};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    errors::RpqError,
    graph::{LabelId, LabeledGraph},
    path::{LabelAtom, PathExpr},
    stats::CardStat,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    Zero,
    #[default]
    Summary,
}

impl FromStr for EstimatorKind {
    type Err = RpqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(EstimatorKind::Zero),
            "summary" => Ok(EstimatorKind::Summary),
            other => Err(RpqError::invalid_input(format!(
                "unknown estimator {other}, expected zero|summary"
            ))),
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorKind::Zero => f.write_str("zero"),
            EstimatorKind::Summary => f.write_str("summary"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Estimator {
    kind: EstimatorKind,
    labels: AHashMap<LabelId, CardStat>,
    prepared: bool,
}

impl Estimator {
    pub fn new(kind: EstimatorKind) -> Self {
        Self {
            kind,
            labels: AHashMap::new(),
            prepared: false,
        }
    }

    pub fn prepared(kind: EstimatorKind, graph: &LabeledGraph) -> Self {
        let mut estimator = Self::new(kind);
        estimator.prepare(graph);
        estimator
    }

    pub fn kind(&self) -> EstimatorKind {
        self.kind
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn prepare(&mut self, graph: &LabeledGraph) {
        self.labels = match self.kind {
            EstimatorKind::Zero => AHashMap::new(),
            EstimatorKind::Summary => graph
                .labels()
                .map(|(label, relation)| {
                    let summary = CardStat {
                        distinct_sources: relation.forward().len(),
                        path_count: relation.edge_count(),
                        distinct_targets: relation.reverse().len(),
                    };
                    (label, summary)
                })
                .collect(),
        };
        self.prepared = true;
    }

    pub fn label_summary(&self, label: LabelId) -> CardStat {
        self.labels.get(&label).copied().unwrap_or_default()
    }

    pub fn estimate(&self, tree: &PathExpr) -> Result<CardStat, RpqError> {
        if !self.prepared {
            return Err(RpqError::NotPrepared);
        }
        match self.kind {
            EstimatorKind::Zero => Ok(CardStat::default()),
            EstimatorKind::Summary => self.estimate_node(tree),
        }
    }

    fn estimate_node(&self, tree: &PathExpr) -> Result<CardStat, RpqError> {
        tree.try_fold(
            |token| {
                let atom = LabelAtom::parse(token)?;
                let summary = self.label_summary(atom.label);
                Ok(if atom.is_inverse() {
                    summary.inverse()
                } else {
                    summary
                })
            },
            |left, right| Ok(compose(left, right)),
            |operator, _| {
                Err(RpqError::unsupported_operator(format!(
                    "unary operator {operator}"
                )))
            },
        )
    }
}

fn compose(left: CardStat, right: CardStat) -> CardStat {
    if left.path_count == 0 || right.path_count == 0 {
        return CardStat::default();
    }
    let middles = left.distinct_targets.max(right.distinct_sources).max(1) as u128;
    let product = left.path_count as u128 * right.path_count as u128;
    let paths = usize::try_from(product.div_ceil(middles)).unwrap_or(usize::MAX);
    CardStat {
        distinct_sources: left.distinct_sources.min(paths),
        path_count: paths,
        distinct_targets: right.distinct_targets.min(paths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_empty_side_is_empty() {
        let a = CardStat::new(2, 4, 2);
        assert_eq!(compose(a, CardStat::default()), CardStat::default());
        assert_eq!(compose(CardStat::default(), a), CardStat::default());
    }

    #[test]
    fn test_compose_caps_endpoints_at_path_count() {
        let left = CardStat::new(10, 10, 10);
        let right = CardStat::new(100, 1, 1);
        let est = compose(left, right);
        assert_eq!(est.path_count, 1);
        assert_eq!(est.distinct_sources, 1);
        assert_eq!(est.distinct_targets, 1);
    }

    #[test]
    fn test_estimator_kind_parses() {
        assert_eq!("zero".parse::<EstimatorKind>().unwrap(), EstimatorKind::Zero);
        assert_eq!(
            "summary".parse::<EstimatorKind>().unwrap(),
            EstimatorKind::Summary
        );
        assert!("histogram".parse::<EstimatorKind>().is_err());
    }
}
