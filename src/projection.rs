use std::borrow::Cow;

use crate::{
    graph::{AdjacencyMap, LabelId, LabeledGraph, NodeId, Relation},
    stats::CardStat,
};

#[derive(Clone, Debug)]
pub struct ProjectionGraph<'g> {
    forward: Cow<'g, AdjacencyMap>,
    reverse: Cow<'g, AdjacencyMap>,
    edge_count: usize,
}

impl<'g> ProjectionGraph<'g> {
    pub fn project(graph: &'g LabeledGraph, label: LabelId, inverse: bool) -> Self {
        let Some(relation) = graph.relation(label) else {
            return ProjectionGraph::empty();
        };
        let (forward, reverse) = if inverse {
            (relation.reverse(), relation.forward())
        } else {
            (relation.forward(), relation.reverse())
        };
        Self {
            forward: Cow::Borrowed(forward),
            reverse: Cow::Borrowed(reverse),
            edge_count: relation.edge_count(),
        }
    }

    pub fn forward(&self) -> &AdjacencyMap {
        &self.forward
    }

    pub fn reverse(&self) -> &AdjacencyMap {
        &self.reverse
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.forward, Cow::Borrowed(_))
    }

    pub fn contains(&self, from: NodeId, to: NodeId) -> bool {
        self.forward
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.forward
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }

    pub fn stats(&self) -> CardStat {
        CardStat {
            distinct_sources: self.forward.len(),
            path_count: self.edge_count,
            distinct_targets: self.reverse.len(),
        }
    }
}

impl ProjectionGraph<'static> {
    pub fn empty() -> Self {
        Self::from_relation(Relation::new())
    }

    pub fn from_relation(relation: Relation) -> Self {
        let (forward, reverse, edge_count) = relation.into_parts();
        Self {
            forward: Cow::Owned(forward),
            reverse: Cow::Owned(reverse),
            edge_count,
        }
    }

    /// Composes `left` with `right`: `(u, v)` for every `u -> m` in `left` and
    /// `m -> v` in `right`, each pair emitted once.
    pub fn join(left: &ProjectionGraph<'_>, right: &ProjectionGraph<'_>) -> Self {
        let mut out = Relation::new();
        for (source, middles) in left.forward().iter() {
            for middle in middles.iter() {
                let Some(targets) = right.forward().get(middle) else {
                    continue;
                };
                for target in targets.iter() {
                    out.insert(*source, *target);
                }
            }
        }
        Self::from_relation(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_projects_to_empty() {
        let graph = LabeledGraph::with_labels(1);
        let projected = ProjectionGraph::project(&graph, 9, false);
        assert_eq!(projected.stats(), CardStat::default());
        assert!(!projected.is_borrowed());
    }

    #[test]
    fn test_join_result_is_owned() {
        let mut graph = LabeledGraph::with_labels(1);
        graph.add_edge(0, 1, 0);
        let a = ProjectionGraph::project(&graph, 0, false);
        assert!(a.is_borrowed());
        let joined = ProjectionGraph::join(&a, &a);
        assert!(!joined.is_borrowed());
        assert_eq!(joined.edge_count(), 0);
    }
}
