use std::process::ExitCode;

use clap::Parser;
use intl_analyzer::cli::{Arguments, ExitStatus};
use intl_analyzer::logging::init_logger;

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logger(args.verbose, args.no_color);

    match intl_analyzer::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
