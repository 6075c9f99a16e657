use pagestubs::cli::run_cli;
use pagestubs::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let _guard = match init_logging(&LogConfig::from_env()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
