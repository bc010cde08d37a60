use ahash::{AHashMap, AHashSet};

pub type NodeId = u32;
pub type LabelId = u32;
pub type AdjacencyMap = AHashMap<NodeId, AHashSet<NodeId>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relation {
    forward: AdjacencyMap,
    reverse: AdjacencyMap,
    edge_count: usize,
}

impl Relation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.forward.entry(from).or_default().insert(to) {
            return false;
        }
        self.reverse.entry(to).or_default().insert(from);
        self.edge_count += 1;
        true
    }

    pub fn contains(&self, from: NodeId, to: NodeId) -> bool {
        self.forward
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn targets(&self, from: NodeId) -> Option<&AHashSet<NodeId>> {
        self.forward.get(&from)
    }

    pub fn sources(&self, to: NodeId) -> Option<&AHashSet<NodeId>> {
        self.reverse.get(&to)
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

    pub fn into_parts(self) -> (AdjacencyMap, AdjacencyMap, usize) {
        (self.forward, self.reverse, self.edge_count)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.forward
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }
}

#[derive(Clone, Debug)]
pub struct LabeledGraph {
    relations: AHashMap<LabelId, Relation>,
    label_bound: usize,
    edge_total: usize,
}

impl Default for LabeledGraph {
    fn default() -> Self {
        Self::with_labels(1)
    }
}

impl LabeledGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(label_count: usize) -> Self {
        let mut graph = Self {
            relations: AHashMap::new(),
            label_bound: 0,
            edge_total: 0,
        };
        graph.set_label_count(label_count);
        graph
    }

    pub fn set_label_count(&mut self, label_count: usize) {
        self.relations.clear();
        self.label_bound = label_count;
        self.edge_total = 0;
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: LabelId) -> bool {
        self.label_bound = self.label_bound.max(label as usize + 1);
        let inserted = self.relations.entry(label).or_default().insert(from, to);
        if inserted {
            self.edge_total += 1;
        }
        inserted
    }

    pub fn edge_total(&self) -> usize {
        self.edge_total
    }

    /// Declared label count, or the highest label seen plus one if larger.
    pub fn label_count(&self) -> usize {
        self.label_bound
    }

    pub fn label_edge_count(&self, label: LabelId) -> usize {
        self.relation(label).map_or(0, Relation::edge_count)
    }

    pub fn relation(&self, label: LabelId) -> Option<&Relation> {
        self.relations.get(&label)
    }

    pub fn forward(&self, label: LabelId) -> Option<&AdjacencyMap> {
        self.relation(label).map(Relation::forward)
    }

    pub fn reverse(&self, label: LabelId) -> Option<&AdjacencyMap> {
        self.relation(label).map(Relation::reverse)
    }

    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &Relation)> + '_ {
        self.relations
            .iter()
            .map(|(label, relation)| (*label, relation))
    }

    pub fn node_count(&self) -> usize {
        let mut nodes = AHashSet::new();
        for relation in self.relations.values() {
            nodes.extend(relation.forward().keys().copied());
            nodes.extend(relation.reverse().keys().copied());
        }
        nodes.len()
    }
}
