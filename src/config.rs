use std::io::{BufRead, Write};

use crate::{errors::RpqError, estimator::EstimatorKind, query::QueryMode};

pub const DEFAULT_GRAPH_PATH: &str = "input/graph.nt";
pub const DEFAULT_QUERIES_PATH: &str = "input/queries.csv";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub graph: Option<String>,
    pub queries: Option<String>,
    pub query: Option<String>,
    pub query_mode: QueryMode,
    pub estimator: EstimatorKind,
    pub format: OutputFormat,
    pub verbose: bool,
    pub interactive: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            graph: None,
            queries: None,
            query: None,
            query_mode: QueryMode::Lenient,
            estimator: EstimatorKind::Summary,
            format: OutputFormat::Text,
            verbose: false,
            interactive: false,
        }
    }
}

impl BenchConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut config = Self::default();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--graph" | "-g" => {
                    config.graph = Some(
                        iter.next()
                            .ok_or_else(|| "--graph requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--queries" | "-q" => {
                    config.queries = Some(
                        iter.next()
                            .ok_or_else(|| "--queries requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--query" => {
                    config.query = Some(
                        iter.next()
                            .ok_or_else(|| "--query requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--estimator" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| "--estimator requires a value".to_string())?;
                    config.estimator = value.parse().map_err(|e: RpqError| e.to_string())?;
                }
                "--format" => {
                    config.format = match *iter
                        .next()
                        .ok_or_else(|| "--format requires a value".to_string())?
                    {
                        "text" => OutputFormat::Text,
                        "json" => OutputFormat::Json,
                        other => return Err(format!("unknown format {other}")),
                    };
                }
                "--strict" => config.query_mode = QueryMode::Strict,
                "--verbose" | "-v" => config.verbose = true,
                "--interactive" | "-i" => config.interactive = true,
                other => return Err(format!("unknown argument {other}")),
            }
        }
        if config.queries.is_some() && config.query.is_some() {
            return Err("--queries and --query are mutually exclusive".to_string());
        }
        Ok(config)
    }

    pub fn help() -> &'static str {
        "Usage: rpqbench --graph PATH (--queries PATH | --query LINE)\n\
         \x20      [--estimator zero|summary] [--format text|json] [--strict] [--verbose]\n\
         \x20      rpqbench --interactive\n"
    }

    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RpqError> {
        if self.graph.is_none() {
            let answer = prompt(
                input,
                output,
                &format!("Graph file (default: {DEFAULT_GRAPH_PATH}): "),
            )?;
            self.graph = Some(answer.unwrap_or_else(|| DEFAULT_GRAPH_PATH.to_string()));
        }
        if self.queries.is_none() && self.query.is_none() {
            let answer = prompt(
                input,
                output,
                &format!("Queries file (default: {DEFAULT_QUERIES_PATH}): "),
            )?;
            self.queries = Some(answer.unwrap_or_else(|| DEFAULT_QUERIES_PATH.to_string()));
        }
        Ok(())
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>, RpqError> {
    output.write_all(text.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
