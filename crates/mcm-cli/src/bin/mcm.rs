//! Entry point: parse arguments, set up diagnostics, hand off to `mcm_cli::run`.

use std::process::ExitCode;

use mcm_cli::{ensure_io_directories, run, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_env();

    if let Err(err) = ensure_io_directories() {
        eprintln!("Could not prepare input/output directories: {err}");
        return ExitCode::from(1);
    }

    let code = run(&cli);
    ExitCode::from(code as u8)
}
