//! In-memory regular path query evaluation over labeled graphs.
//!
//! A [`LabeledGraph`] is loaded from a graph source, path strings are parsed
//! into [`PathExpr`] trees and evaluated bottom-up into [`ProjectionGraph`]s,
//! and each query reports an estimated and an actual [`CardStat`].
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench;
pub mod bench_utils;
pub mod config;
pub mod errors;
pub mod estimator;
pub mod evaluator;
pub mod graph;
pub mod ingest;
pub mod path;
pub mod perf;
pub mod projection;
pub mod query;
pub mod stats;

pub use crate::bench::{Bench, QueryReport};
pub use crate::config::{BenchConfig, OutputFormat};
pub use crate::errors::RpqError;
pub use crate::estimator::{Estimator, EstimatorKind};
pub use crate::evaluator::Evaluator;
pub use crate::graph::{LabelId, LabeledGraph, NodeId, Relation};
pub use crate::path::{Direction, LabelAtom, PathExpr};
pub use crate::perf::{PerfRecorder, Timing};
pub use crate::projection::ProjectionGraph;
pub use crate::query::{Query, QueryMode};
pub use crate::stats::CardStat;
