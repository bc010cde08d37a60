use std::{env, io, process};

use rpqbench::{
    Bench, BenchConfig, OutputFormat, PerfRecorder, QueryReport, RpqError, bench::STAT_FIELDS,
};
use tracing::Level;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", BenchConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let mut config = match BenchConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", BenchConfig::help());
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    if config.interactive {
        println!("-------- Regular path query benchmark --------");
        let stdin = io::stdin();
        if let Err(err) = config.prompt_missing(&mut stdin.lock(), &mut io::stdout()) {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }

    let recorder = PerfRecorder::new();
    let reports = match run(&config, &recorder) {
        Ok(reports) => reports,
        Err(err) => {
            eprintln!("benchmark failed: {err}");
            process::exit(1);
        }
    };
    if let Err(err) = print_reports(&reports, &recorder, config.format) {
        eprintln!("cannot write results: {err}");
        process::exit(1);
    }
    if reports.iter().any(|report| !report.is_ok()) {
        process::exit(3);
    }
}

fn run(config: &BenchConfig, recorder: &PerfRecorder) -> Result<Vec<QueryReport>, RpqError> {
    let graph = config
        .graph
        .as_deref()
        .ok_or_else(|| RpqError::invalid_input("--graph is required"))?;
    let mut bench = Bench::from_config(config, recorder);
    bench.load_graph(graph)?;
    match (&config.queries, &config.query) {
        (Some(path), _) => bench.load_queries(path)?,
        (None, Some(line)) => bench.load_query(line)?,
        (None, None) => return Err(RpqError::invalid_input("--queries or --query is required")),
    };
    bench.prepare()?;
    bench.run_queries()
}

fn print_reports(
    reports: &[QueryReport],
    recorder: &PerfRecorder,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                println!("{}", report.render_text());
            }
            let failed = reports.iter().filter(|r| !r.is_ok()).count();
            println!(
                "{} queries, {} failed, stats as {STAT_FIELDS}",
                reports.len(),
                failed
            );
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "reports": reports,
                "timings": recorder.snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
