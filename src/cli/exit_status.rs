use std::process::ExitCode;

use super::run::RunSummary;

/// Exit status of a run, following common conventions for linter tools.
///
/// - `Success` (0): no issues found, or all unused keys were removed
/// - `Failure` (1): missing or unused translations were reported
/// - `Error` (2): the run failed (parse error, config error, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

impl From<&RunSummary> for ExitStatus {
    fn from(summary: &RunSummary) -> Self {
        let diagnostics = &summary.diagnostics;
        let unused_reported = !diagnostics.unused.is_empty() && !summary.fix;
        let stale_whitelist = summary.error_on_unused_whitelist_entries
            && !diagnostics.unused_whitelist_entries.is_empty();

        if unused_reported || !diagnostics.missing.is_empty() || stale_whitelist {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
