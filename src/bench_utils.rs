use std::io::{self, Write};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    graph::{LabelId, LabeledGraph, NodeId},
    query::Query,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabeledEdge {
    pub from: NodeId,
    pub label: LabelId,
    pub to: NodeId,
}

#[derive(Clone, Debug)]
pub struct GraphDataset {
    pub nodes: usize,
    pub labels: usize,
    pub edges: Vec<LabeledEdge>,
}

impl GraphDataset {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn to_graph(&self) -> LabeledGraph {
        let mut graph = LabeledGraph::with_labels(self.labels);
        for edge in &self.edges {
            graph.add_edge(edge.from, edge.to, edge.label);
        }
        graph
    }

    pub fn write_source<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{},{},{}", self.nodes, self.edges.len(), self.labels)?;
        for edge in &self.edges {
            writeln!(out, "{} {} {} .", edge.from, edge.label, edge.to)?;
        }
        Ok(())
    }

    pub fn to_source(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_source(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[derive(Clone, Debug)]
pub enum GraphShape {
    Line,
    Star,
    RandomErdosRenyi { edges: usize },
}

pub fn generate_graph(
    shape: GraphShape,
    node_count: usize,
    labels: usize,
    seed: u64,
) -> GraphDataset {
    assert!(node_count > 1, "node_count must exceed 1");
    assert!(labels > 0, "labels must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges: Vec<LabeledEdge> = match shape {
        GraphShape::Line => (0..node_count - 1)
            .map(|idx| new_edge(idx, idx + 1, idx % labels))
            .collect(),
        GraphShape::Star => (1..node_count)
            .map(|leaf| new_edge(0, leaf, leaf % labels))
            .collect(),
        GraphShape::RandomErdosRenyi { edges } => {
            generate_random_edges(node_count, edges, labels, &mut rng)
        }
    };
    edges.sort_by(|a, b| {
        a.from
            .cmp(&b.from)
            .then_with(|| a.to.cmp(&b.to))
            .then_with(|| a.label.cmp(&b.label))
    });
    GraphDataset {
        nodes: node_count,
        labels,
        edges,
    }
}

pub fn generate_queries(labels: usize, count: usize, max_len: usize, seed: u64) -> Vec<Query> {
    assert!(labels > 0 && max_len > 0, "labels and max_len must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            let atoms: Vec<String> = (0..len)
                .map(|_| {
                    let label = rng.gen_range(0..labels);
                    let marker = if rng.gen_bool(0.5) { '+' } else { '-' };
                    format!("{label}{marker}")
                })
                .collect();
            Query::new("*", atoms.join("/"), "*")
        })
        .collect()
}

fn generate_random_edges(
    node_count: usize,
    edge_count: usize,
    labels: usize,
    rng: &mut StdRng,
) -> Vec<LabeledEdge> {
    let total_pairs = pair_count(node_count);
    assert!(
        edge_count as u128 <= total_pairs,
        "edge_count exceeds possible pairs"
    );
    let mut edges = Vec::with_capacity(edge_count);
    let mut idx = 0u64;
    let mut remaining_edges = edge_count as u64;
    while remaining_edges > 0 && idx < total_pairs as u64 {
        let remaining_pairs = total_pairs as u64 - idx;
        let p = remaining_edges as f64 / remaining_pairs as f64;
        idx += sample_geometric(rng, p);
        if idx >= total_pairs as u64 {
            break;
        }
        let (from, to) = pair_from_index(idx, node_count as u64);
        let (from, to) = if rng.gen_bool(0.5) { (from, to) } else { (to, from) };
        let label = rng.gen_range(0..labels);
        edges.push(new_edge(from as usize, to as usize, label));
        idx += 1;
        remaining_edges -= 1;
    }
    edges
}

fn new_edge(from: usize, to: usize, label: usize) -> LabeledEdge {
    LabeledEdge {
        from: from as NodeId,
        label: label as LabelId,
        to: to as NodeId,
    }
}

fn pair_count(nodes: usize) -> u128 {
    let n = nodes as u128;
    n * (n - 1) / 2
}

fn sample_geometric(rng: &mut StdRng, p: f64) -> u64 {
    if p >= 1.0 {
        return 0;
    }
    let u = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
    ((u.ln() / (1.0 - p).ln()).floor().max(0.0)) as u64
}

fn pair_from_index(idx: u64, nodes: u64) -> (u64, u64) {
    let mut left = 0;
    let mut start = 0u64;
    while left < nodes - 1 {
        let remaining = nodes - left - 1;
        if idx < start + remaining {
            return (left, left + 1 + (idx - start));
        }
        start += remaining;
        left += 1;
    }
    (nodes - 2, nodes - 1)
}
