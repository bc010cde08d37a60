use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::LazyLock,
};

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::{
    errors::RpqError,
    graph::{LabelId, LabeledGraph, NodeId},
    query::{Query, QueryMode},
};

static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+),(\d+),(\d+)").expect("header pattern"));
static EDGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s(\d+)\s(\d+)\s\.").expect("edge pattern"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub records: usize,
    pub edges_added: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

pub trait RecordSink {
    fn header(&mut self, line: &str) -> Result<(), RpqError>;
    fn record(&mut self, line: &str) -> Result<(), RpqError>;
}

pub fn read_records<R, S>(reader: R, sink: &mut S) -> Result<usize, RpqError>
where
    R: BufRead,
    S: RecordSink,
{
    let mut count = 0usize;
    for line in reader.lines() {
        let line = line?;
        if count == 0 {
            sink.header(&line)?;
        } else {
            sink.record(&line)?;
        }
        count += 1;
    }
    Ok(count)
}

pub fn read_lines<R, L>(reader: R, mut on_line: L) -> Result<usize, RpqError>
where
    R: BufRead,
    L: FnMut(&str) -> Result<(), RpqError>,
{
    let mut count = 0usize;
    for line in reader.lines() {
        on_line(&line?)?;
        count += 1;
    }
    Ok(count)
}

pub fn open_source<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, RpqError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| RpqError::io(format!("cannot open {}: {e}", path.display())))?;
    Ok(BufReader::new(file))
}

pub fn parse_header(line: &str) -> Result<usize, RpqError> {
    let caps = HEADER_PATTERN
        .captures(line)
        .ok_or_else(|| RpqError::invalid_header(format!("got {line:?}")))?;
    caps[3]
        .parse::<usize>()
        .map_err(|e| RpqError::invalid_header(format!("label count in {line:?}: {e}")))
}

pub fn parse_edge(line: &str) -> Option<(NodeId, LabelId, NodeId)> {
    let caps = EDGE_PATTERN.captures(line)?;
    let subject = caps[1].parse().ok()?;
    let predicate = caps[2].parse().ok()?;
    let object = caps[3].parse().ok()?;
    Some((subject, predicate, object))
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: LabeledGraph,
    summary: LoadSummary,
    saw_header: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<(LabeledGraph, LoadSummary), RpqError> {
        if !self.saw_header {
            return Err(RpqError::invalid_header("graph source is empty"));
        }
        Ok((self.graph, self.summary))
    }
}

impl RecordSink for GraphBuilder {
    fn header(&mut self, line: &str) -> Result<(), RpqError> {
        let labels = parse_header(line)?;
        info!(labels, "graph header accepted");
        self.graph.set_label_count(labels);
        self.saw_header = true;
        Ok(())
    }

    fn record(&mut self, line: &str) -> Result<(), RpqError> {
        self.summary.records += 1;
        match parse_edge(line) {
            Some((subject, predicate, object)) => {
                if self.graph.add_edge(subject, object, predicate) {
                    self.summary.edges_added += 1;
                } else {
                    self.summary.duplicates += 1;
                }
            }
            None => {
                debug!(line, "skipping non-edge line");
                self.summary.skipped += 1;
            }
        }
        Ok(())
    }
}

pub fn load_graph<R: BufRead>(reader: R) -> Result<(LabeledGraph, LoadSummary), RpqError> {
    let mut builder = GraphBuilder::new();
    read_records(reader, &mut builder)?;
    builder.finish()
}

pub fn load_queries<R: BufRead>(reader: R, mode: QueryMode) -> Result<Vec<Query>, RpqError> {
    let mut queries = Vec::new();
    read_lines(reader, |line| {
        if line.trim().is_empty() {
            return Ok(());
        }
        match Query::from_line(line) {
            Ok(query) => queries.push(query),
            Err(err) => match mode {
                QueryMode::Strict => return Err(err),
                QueryMode::Lenient => warn!(%err, "dropping query line"),
            },
        }
        Ok(())
    })?;
    if queries.is_empty() {
        warn!("did not parse any queries, check the query source");
    }
    Ok(queries)
}

impl LabeledGraph {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, RpqError> {
        load_graph(reader).map(|(graph, _)| graph)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RpqError> {
        Self::from_reader(open_source(path)?)
    }
}
