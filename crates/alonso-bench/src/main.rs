//! Times the Alonso pipeline, phase by phase, over script files.
//!
//! Each script is run through lex, parse and eval separately so the report
//! shows where a workload spends its time. Pass script paths directly, or
//! run with no arguments to pick up everything under `benchmark/scripts/`.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser as CliParser;
use serde::Serialize;

use alonso_interpreter::Interpreter;
use alonso_lexer::Lexer;
use alonso_parser::Parser;

#[derive(CliParser, Debug)]
#[command(name = "alonso-bench", about = "Time the Alonso engine over .alo scripts")]
struct Cli {
    /// Script files to benchmark; scans benchmark/scripts/ when empty
    scripts: Vec<PathBuf>,

    /// Measured iterations per script
    #[arg(short = 'n', long, default_value_t = 10)]
    iterations: u32,

    /// Unmeasured warmup iterations per script
    #[arg(short, long, default_value_t = 2)]
    warmup: u32,

    /// Write a JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

/// Millisecond summary of one phase across all measured iterations.
#[derive(Debug, Serialize)]
struct PhaseStats {
    avg_ms: f64,
    median_ms: f64,
    max_ms: f64,
}

#[derive(Debug, Serialize)]
struct ScriptReport {
    script: String,
    iterations: u32,
    lex: PhaseStats,
    parse: PhaseStats,
    eval: PhaseStats,
    total: PhaseStats,
}

#[derive(Debug, Serialize)]
struct Report {
    generated_at: String,
    engine_version: String,
    scripts: Vec<ScriptReport>,
}

fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// One full run of the pipeline, returning [lex, parse, eval] milliseconds.
/// A script that does not lex, parse and evaluate cleanly cannot be timed.
fn time_pipeline(src: &str) -> Result<[f64; 3], String> {
    let started = Instant::now();
    let tokens = Lexer::new(src).tokenize();
    let lex_ms = ms_since(started);

    let started = Instant::now();
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    if let Some(e) = parser.errors().first() {
        return Err(format!("parse error: {}", e));
    }
    let parse_ms = ms_since(started);

    let started = Instant::now();
    Interpreter::new()
        .run_program(&program)
        .map_err(|e| format!("runtime error: {}", e.message()))?;
    let eval_ms = ms_since(started);

    Ok([lex_ms, parse_ms, eval_ms])
}

fn phase_stats(samples: &[f64]) -> PhaseStats {
    if samples.is_empty() {
        return PhaseStats {
            avg_ms: 0.0,
            median_ms: 0.0,
            max_ms: 0.0,
        };
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    PhaseStats {
        avg_ms: sorted.iter().sum::<f64>() / sorted.len() as f64,
        median_ms: sorted[sorted.len() / 2],
        max_ms: sorted[sorted.len() - 1],
    }
}

fn bench_script(path: &PathBuf, iterations: u32, warmup: u32) -> Result<ScriptReport, String> {
    let src = fs::read_to_string(path).map_err(|e| format!("cannot read: {}", e))?;

    for _ in 0..warmup {
        time_pipeline(&src)?;
    }

    let mut lex = Vec::with_capacity(iterations as usize);
    let mut parse = Vec::with_capacity(iterations as usize);
    let mut eval = Vec::with_capacity(iterations as usize);
    let mut total = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let phases = time_pipeline(&src)?;
        lex.push(phases[0]);
        parse.push(phases[1]);
        eval.push(phases[2]);
        total.push(phases.iter().sum());
    }

    Ok(ScriptReport {
        script: path.display().to_string(),
        iterations,
        lex: phase_stats(&lex),
        parse: phase_stats(&parse),
        eval: phase_stats(&eval),
        total: phase_stats(&total),
    })
}

fn collect_scripts(cli: &Cli) -> Vec<PathBuf> {
    if !cli.scripts.is_empty() {
        return cli.scripts.clone();
    }
    let mut found = Vec::new();
    if let Ok(entries) = fs::read_dir("benchmark/scripts") {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "alo") {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

fn main() {
    let cli = Cli::parse();

    let scripts = collect_scripts(&cli);
    if scripts.is_empty() {
        eprintln!("no scripts given and none found under benchmark/scripts/");
        process::exit(2);
    }

    let mut reports = Vec::new();
    for path in &scripts {
        match bench_script(path, cli.iterations, cli.warmup) {
            Ok(report) => {
                println!(
                    "{}: total {:.3}ms median over {} runs (lex {:.3} / parse {:.3} / eval {:.3})",
                    report.script,
                    report.total.median_ms,
                    report.iterations,
                    report.lex.median_ms,
                    report.parse.median_ms,
                    report.eval.median_ms,
                );
                reports.push(report);
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    if let Some(json_path) = &cli.json {
        let report = Report {
            generated_at: chrono::Utc::now().to_rfc3339(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            scripts: reports,
        };
        let body = match serde_json::to_string_pretty(&report) {
            Ok(body) => body,
            Err(e) => {
                eprintln!("cannot serialize report: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = fs::write(json_path, body) {
            eprintln!("cannot write {}: {}", json_path.display(), e);
            process::exit(1);
        }
        println!("report written to {}", json_path.display());
    }
}
