use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use docqa_lib::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let result = docqa_lib::run(cli, stdin.lock(), &mut stdout);
    let _ = stdout.flush();
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
