use std::{fmt::Write as _, io::BufRead, io::Cursor, path::Path};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::BenchConfig,
    errors::RpqError,
    estimator::{Estimator, EstimatorKind},
    evaluator::Evaluator,
    graph::LabeledGraph,
    ingest::{self, LoadSummary},
    perf::PerfRecorder,
    query::{Query, QueryMode},
    stats::CardStat,
};

pub const STAT_FIELDS: &str = "(distinctSources, pathCount, distinctTargets)";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryReport {
    pub query: Query,
    pub tree: String,
    pub estimate: Option<CardStat>,
    pub actual: Option<CardStat>,
    pub error: Option<String>,
}

impl QueryReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Processing query: {}", self.query);
        let _ = writeln!(out, "Parsed query tree: {}", self.tree);
        if let Some(estimate) = self.estimate {
            let _ = writeln!(out, "Estimation {STAT_FIELDS} : {estimate}");
        }
        if let Some(actual) = self.actual {
            let _ = writeln!(out, "Actual {STAT_FIELDS} : {actual}");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "Failed: {error}");
        }
        out
    }
}

pub struct Bench<'p> {
    recorder: &'p PerfRecorder,
    estimator_kind: EstimatorKind,
    query_mode: QueryMode,
    graph: Option<LabeledGraph>,
    estimator: Option<Estimator>,
    queries: Vec<Query>,
}

impl<'p> Bench<'p> {
    pub fn new(
        recorder: &'p PerfRecorder,
        estimator_kind: EstimatorKind,
        query_mode: QueryMode,
    ) -> Self {
        Self {
            recorder,
            estimator_kind,
            query_mode,
            graph: None,
            estimator: None,
            queries: Vec::new(),
        }
    }

    pub fn from_config(config: &BenchConfig, recorder: &'p PerfRecorder) -> Self {
        Self::new(recorder, config.estimator, config.query_mode)
    }

    pub fn graph(&self) -> Option<&LabeledGraph> {
        self.graph.as_ref()
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn is_prepared(&self) -> bool {
        self.estimator.is_some()
    }

    pub fn load_graph_from_reader<R: BufRead>(
        &mut self,
        reader: R,
    ) -> Result<LoadSummary, RpqError> {
        info!("reading the graph into memory");
        let (graph, summary) = self
            .recorder
            .measure("read the graph into memory", || ingest::load_graph(reader))?;
        info!(
            labels = graph.label_count(),
            edges = graph.edge_total(),
            skipped = summary.skipped,
            "graph loaded"
        );
        self.graph = Some(graph);
        self.estimator = None;
        Ok(summary)
    }

    pub fn load_graph<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary, RpqError> {
        let reader = ingest::open_source(path)?;
        self.load_graph_from_reader(reader)
    }

    pub fn load_queries_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, RpqError> {
        info!("loading queries");
        self.queries = ingest::load_queries(reader, self.query_mode)?;
        Ok(self.queries.len())
    }

    pub fn load_queries<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RpqError> {
        let reader = ingest::open_source(path)?;
        self.load_queries_from_reader(reader)
    }

    pub fn load_query(&mut self, line: &str) -> Result<usize, RpqError> {
        info!(line, "loading query");
        self.load_queries_from_reader(Cursor::new(line))
    }

    pub fn prepare(&mut self) -> Result<(), RpqError> {
        let graph = self.graph.as_ref().ok_or(RpqError::GraphNotLoaded)?;
        info!(estimator = %self.estimator_kind, "preparing estimator and evaluation engine");
        let kind = self.estimator_kind;
        let estimator = self
            .recorder
            .measure("prepare the estimator", || Estimator::prepared(kind, graph));
        self.estimator = Some(estimator);
        Ok(())
    }

    pub fn run_queries(&self) -> Result<Vec<QueryReport>, RpqError> {
        let graph = self.graph.as_ref().ok_or(RpqError::GraphNotLoaded)?;
        if self.queries.is_empty() {
            return Err(RpqError::NoQueries);
        }
        let estimator = self.estimator.clone().ok_or(RpqError::NotPrepared)?;
        let evaluator = Evaluator::with_estimator(graph, estimator);
        info!(queries = self.queries.len(), "running the query workload");
        Ok(self
            .queries
            .iter()
            .map(|query| self.run_query(&evaluator, query))
            .collect())
    }

    fn run_query(&self, evaluator: &Evaluator<'_>, query: &Query) -> QueryReport {
        let tree = query.tree();
        debug!(query = %query, tree = %tree, "parsed query tree");
        let estimate = self.recorder.measure("estimate", || evaluator.estimate(&tree));
        let actual = self
            .recorder
            .measure("evaluate", || evaluator.evaluate_path(&tree));
        let error = match (&estimate, &actual) {
            (Err(err), _) | (_, Err(err)) => {
                warn!(query = %query, %err, "query failed");
                Some(err.to_string())
            }
            _ => None,
        };
        QueryReport {
            query: query.clone(),
            tree: tree.to_string(),
            estimate: estimate.ok(),
            actual: actual.ok(),
            error,
        }
    }
}
