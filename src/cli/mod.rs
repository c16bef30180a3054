use std::io;

use anyhow::Result;

pub mod args;
mod exit_status;
pub mod report;
pub mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use run::RunSummary;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let summary = run::run(&args, &mut io::stdout().lock())?;
    report::report(&summary)?;

    Ok(ExitStatus::from(&summary))
}
