//! Command-line orchestration around `mcm-core`: argument parsing, dataset
//! I/O, and the output-file layout. The core itself never touches the
//! filesystem; everything in this crate exists to feed it parsed rows and
//! to render its results back out as the original tool's output format.

#![deny(unsafe_code)]

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use mcm_core::dataset::parse_dataset_line;
use mcm_core::error::McmError;
use mcm_core::{Dataset, Model};

/// The one-letter and two-letter flags of the original tool, kept as a flat
/// set of presence switches rather than subcommands: `-es`, `-gs`, and `-dc`
/// are not mutually exclusive, and their relative order on the command line
/// carries no meaning (see [`run`]).
#[derive(Debug, Parser)]
#[command(name = "mcm", about = "Search for the Minimally Complex Model of a categorical dataset")]
pub struct Cli {
    /// Base filename: dataset read from `input/<name>.dat`, output written
    /// to `output/<name>_output.dat`.
    #[arg(short = 'f', value_name = "NAME")]
    pub file: Option<String>,

    /// Number of variables, 1..=128.
    #[arg(short = 'n', value_name = "N")]
    pub n: Option<usize>,

    /// Alphabet size, >=2.
    #[arg(short = 'q', value_name = "Q")]
    pub q: Option<u32>,

    /// Write a per-step log file for the greedy and divide-and-conquer modes.
    #[arg(short = 'l')]
    pub log_file: bool,

    /// Run the gauge transform before any requested search, rebasing the
    /// in-memory dataset onto its lowest-entropy independent operators.
    #[arg(long = "gt")]
    pub gauge_transform: bool,

    /// Run exhaustive search.
    #[arg(long = "es")]
    pub exhaustive: bool,

    /// Run greedy pairwise-merge search.
    #[arg(long = "gs")]
    pub greedy: bool,

    /// Run divide-and-conquer search.
    #[arg(long = "dc")]
    pub divide_and_conquer: bool,
}

impl Cli {
    /// Parses `std::env::args()`, first rewriting the original's single-dash
    /// multi-letter flags (`-gt`, `-es`, `-gs`, `-dc`) into the double-dash
    /// form `clap`'s derive macros expect. `-f`, `-n`, `-q`, and `-l` are
    /// genuine single-character short flags and pass through unchanged.
    pub fn parse_env() -> Self {
        Self::parse_from(normalize_args(std::env::args()))
    }
}

fn normalize_args(args: impl Iterator<Item = String>) -> Vec<String> {
    args.map(|arg| match arg.as_str() {
        "-gt" | "-es" | "-gs" | "-dc" => format!("-{arg}"),
        other => other.to_string(),
    })
    .collect()
}

/// Everything that can go wrong orchestrating a run, beyond what `mcm-core`
/// itself reports.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("dataset engine error: {0}")]
    Core(#[from] McmError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// Reads `input/<name>.dat` and parses it into value rows via
/// [`parse_dataset_line`], one call per line, numbering lines from zero.
pub fn read_dataset(name: &str, n: usize) -> Result<Vec<Vec<u32>>, CliError> {
    let path = Path::new("input").join(format!("{name}.dat"));
    let file = File::open(&path)?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        rows.push(parse_dataset_line(&line, n, line_no)?);
    }
    Ok(rows)
}

fn output_path(name: &str) -> PathBuf {
    Path::new("output").join(format!("{name}_output.dat"))
}

fn log_path(name: &str, mode: &str) -> PathBuf {
    Path::new("output").join(format!("{name}_{mode}_log.dat"))
}

/// Runs the CLI end to end: reads the dataset, builds a `Model`, runs every
/// requested mode in the fixed order `gt -> es -> gs -> dc` regardless of
/// the order the flags were given in, and appends each mode's headed
/// section to the output file. Returns the process exit code: 0 on success
/// (including the "missing required flag" diagnostics, preserved from the
/// original tool for compatibility) and 1 only when the dataset file cannot
/// be opened.
pub fn run(cli: &Cli) -> i32 {
    let Some(name) = cli.file.as_deref() else {
        eprintln!("Argument for input file name (-f) is missing.");
        return 0;
    };
    let Some(n) = cli.n else {
        eprintln!("Argument for number of variables (-n) is missing.");
        return 0;
    };
    let Some(q) = cli.q else {
        eprintln!("Argument for number of states (-q) is missing.");
        return 0;
    };
    if n == 0 || n > 128 {
        eprintln!("Argument for number of variables (-n) must be between 1 and 128.");
        return 0;
    }

    let rows = match read_dataset(name, n) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("Could not read dataset '{name}': {err}");
            return 1;
        }
    };

    let dataset = match Dataset::from_rows(&rows, n, q) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("Could not build dataset '{name}': {err}");
            return 1;
        }
    };
    info!(name, n, q, observations = dataset.len(), "dataset loaded");

    if n > 30 && (cli.exhaustive) {
        warn!(n, "exhaustive search requested near/above the dense-cache limit; this may refuse to run");
    }

    let mut model = Model::new(dataset);
    let output = match File::create(output_path(name)) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Could not open output file for '{name}': {err}");
            return 1;
        }
    };
    let mut output = io::BufWriter::new(output);

    if cli.gauge_transform {
        run_gauge_transform(&mut model, &mut output);
    }
    if cli.exhaustive {
        run_exhaustive(&mut model, &mut output);
    }
    if cli.greedy {
        run_greedy(&mut model, name, cli.log_file, &mut output);
    }
    if cli.divide_and_conquer {
        run_divide_and_conquer(&mut model, name, cli.log_file, &mut output);
    }

    0
}

fn write_section_header<W: Write>(writer: &mut W, title: &str, elapsed_secs: f64) -> io::Result<()> {
    writeln!(writer, "\n=== {title} ===")?;
    writeln!(writer, "Duration: {elapsed_secs:.6} s")
}

fn run_gauge_transform<W: Write>(model: &mut Model, output: &mut W) {
    let start = Instant::now();
    info!("running gauge transform");
    model.apply_gauge_transform(Some(4));
    let elapsed = start.elapsed().as_secs_f64();

    let _ = write_section_header(output, "Gauge transform", elapsed);
    if let Some(basis) = model.best_basis() {
        let n = model.dataset().n();
        for (i, op) in basis.iter().enumerate() {
            let values = op.to_values(n);
            let rendered = values.iter().fold(String::new(), |mut acc, v| {
                let _ = write!(acc, "{v}");
                acc
            });
            let _ = writeln!(output, "Basis operator {i} : {rendered}");
        }
    }
    info!(elapsed_secs = elapsed, "gauge transform complete");
}

fn run_exhaustive<W: Write>(model: &mut Model, output: &mut W) {
    let start = Instant::now();
    info!("running exhaustive search");
    let result = model.run_exhaustive();
    let elapsed = start.elapsed().as_secs_f64();

    let _ = write_section_header(output, "Exhaustive search", elapsed);
    match result {
        Ok(()) => {
            for partition in model.best_mcm() {
                let _ = mcm_core::partition::write_partition(output, partition);
                let _ = writeln!(output);
            }
            let _ = writeln!(output, "Best log-evidence: {}", model.best_evidence());
            info!(elapsed_secs = elapsed, best_evidence = model.best_evidence(), "exhaustive search complete");
        }
        Err(err) => {
            let _ = writeln!(output, "Refused: {err}");
            warn!(%err, "exhaustive search refused");
        }
    }
}

fn run_greedy<W: Write>(model: &mut Model, name: &str, log_enabled: bool, output: &mut W) {
    let start = Instant::now();
    info!("running greedy search");

    let mut log_file = log_enabled.then(|| File::create(log_path(name, "greedy")));
    let result = match log_file.as_mut() {
        Some(Ok(file)) => model.run_greedy(Some(file)),
        Some(Err(_)) => model.run_greedy(None),
        None => model.run_greedy(None),
    };
    let elapsed = start.elapsed().as_secs_f64();

    let _ = write_section_header(output, "Greedy search", elapsed);
    if let Err(err) = result {
        let _ = writeln!(output, "Failed: {err}");
        return;
    }
    for partition in model.best_mcm() {
        let _ = mcm_core::partition::write_partition(output, partition);
    }
    let _ = writeln!(output, "Best log-evidence: {}", model.best_evidence());
    info!(elapsed_secs = elapsed, best_evidence = model.best_evidence(), "greedy search complete");
}

fn run_divide_and_conquer<W: Write>(model: &mut Model, name: &str, log_enabled: bool, output: &mut W) {
    let start = Instant::now();
    info!("running divide and conquer search");

    let mut log_file = log_enabled.then(|| File::create(log_path(name, "divide_and_conquer")));
    let result = match log_file.as_mut() {
        Some(Ok(file)) => model.run_divide_and_conquer(Some(file)),
        Some(Err(_)) => model.run_divide_and_conquer(None),
        None => model.run_divide_and_conquer(None),
    };
    let elapsed = start.elapsed().as_secs_f64();

    let _ = write_section_header(output, "Divide and conquer search", elapsed);
    if let Err(err) = result {
        let _ = writeln!(output, "Failed: {err}");
        return;
    }
    for partition in model.best_mcm() {
        let _ = mcm_core::partition::write_partition(output, partition);
    }
    let _ = writeln!(output, "Best log-evidence: {}", model.best_evidence());
    info!(elapsed_secs = elapsed, best_evidence = model.best_evidence(), "divide and conquer search complete");
}

/// Ensures `input/` and `output/` exist relative to the current directory,
/// matching the original tool's assumption that both are siblings of the
/// working directory it is invoked from.
pub fn ensure_io_directories() -> io::Result<()> {
    fs::create_dir_all("input")?;
    fs::create_dir_all("output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_args_rewrites_mode_flags_to_double_dash() {
        let args = ["mcm", "-f", "t1", "-n", "3", "-q", "3", "-es", "-dc"].map(String::from);
        let normalized = normalize_args(args.into_iter());
        assert_eq!(normalized, vec!["mcm", "-f", "t1", "-n", "3", "-q", "3", "--es", "--dc"]);
    }

    #[test]
    fn normalize_args_leaves_single_char_flags_alone() {
        let args = ["mcm", "-f", "t1", "-l"].map(String::from);
        let normalized = normalize_args(args.into_iter());
        assert_eq!(normalized, vec!["mcm", "-f", "t1", "-l"]);
    }

    #[test]
    fn cli_parses_mode_flags_after_normalization() {
        let args = normalize_args(["mcm", "-f", "t1", "-n", "3", "-q", "3", "-gt", "-es"].map(String::from).into_iter());
        let cli = Cli::parse_from(args);
        assert_eq!(cli.file.as_deref(), Some("t1"));
        assert_eq!(cli.n, Some(3));
        assert_eq!(cli.q, Some(3));
        assert!(cli.gauge_transform);
        assert!(cli.exhaustive);
        assert!(!cli.greedy);
        assert!(!cli.divide_and_conquer);
    }

    #[test]
    fn run_reports_success_when_n_is_missing() {
        let cli = Cli {
            file: Some("whatever".into()),
            n: None,
            q: Some(3),
            log_file: false,
            gauge_transform: false,
            exhaustive: false,
            greedy: false,
            divide_and_conquer: false,
        };
        assert_eq!(run(&cli), 0);
    }

    #[test]
    fn run_reports_failure_when_dataset_is_unreadable() {
        let cli = Cli {
            file: Some("does-not-exist-anywhere".into()),
            n: Some(3),
            q: Some(3),
            log_file: false,
            gauge_transform: false,
            exhaustive: false,
            greedy: false,
            divide_and_conquer: false,
        };
        assert_eq!(run(&cli), 1);
    }
}
