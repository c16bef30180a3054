//! Console report of a run.
//!
//! Separate from the core so the analyzer can be used as a library.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::run::RunSummary;
use crate::core::KeyMap;
use crate::utils::generate_file_list;

/// Number of progress steps printed by a run.
pub const STEP_COUNT: usize = 4;

pub fn print_step_to<W: Write>(writer: &mut W, step: usize, message: &str) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}",
        format!("[{}/{}]", step, STEP_COUNT).dimmed(),
        message
    )
}

fn print_keys<W: Write>(keys: &KeyMap, writer: &mut W) -> Result<()> {
    for (key, files) in keys {
        let used_in = format!("(used in {})", generate_file_list(files)?);
        writeln!(writer, "   - {} {}", key, used_in.dimmed())?;
    }
    Ok(())
}

/// Print the unused, missing and whitelist sections.
pub fn report(summary: &RunSummary) -> Result<()> {
    report_to(summary, &mut io::stdout().lock())
}

/// Print the report to a custom writer.
pub fn report_to<W: Write>(summary: &RunSummary, writer: &mut W) -> Result<()> {
    let diagnostics = &summary.diagnostics;

    writeln!(writer)?;
    if diagnostics.unused.is_empty() {
        writeln!(writer, " 👏  No unused translations were found!")?;
    } else {
        writeln!(
            writer,
            " ⚠️   Found {} unused translations!",
            diagnostics.unused.len().to_string().bold().yellow()
        )?;
        if !summary.fix {
            writeln!(
                writer,
                "     You can use {} to remove all unused translations.",
                "--fix".cyan()
            )?;
        }
        writeln!(writer)?;
        print_keys(&diagnostics.unused, writer)?;
    }

    writeln!(writer)?;
    if diagnostics.missing.is_empty() {
        writeln!(writer, " 👏  No missing translations were found!")?;
    } else {
        writeln!(
            writer,
            " ⚠️   Found {} missing translations!",
            diagnostics.missing.len().to_string().bold().yellow()
        )?;
        writeln!(writer)?;
        print_keys(&diagnostics.missing, writer)?;
    }

    if summary.fix && !diagnostics.unused.is_empty() {
        writeln!(writer)?;
        writeln!(
            writer,
            " 👏  Removed all unused translations from {} {}!",
            summary.fixed_files,
            if summary.fixed_files == 1 { "file" } else { "files" }
        )?;
    }

    if summary.error_on_unused_whitelist_entries && !diagnostics.unused_whitelist_entries.is_empty()
    {
        writeln!(writer)?;
        writeln!(
            writer,
            " ⚠️   Found {} unused whitelist entries! Please remove them:",
            diagnostics
                .unused_whitelist_entries
                .len()
                .to_string()
                .bold()
                .yellow()
        )?;
        writeln!(writer)?;
        for entry in &diagnostics.unused_whitelist_entries {
            writeln!(writer, "   - {}", entry)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::report::*;
    use crate::core::keys::record_key;
    use pretty_assertions::assert_eq;

    fn render(summary: &RunSummary) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        report_to(summary, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_clean_run() {
        assert_eq!(
            render(&RunSummary::default()),
            "\n 👏  No unused translations were found!\n\n 👏  No missing translations were found!\n"
        );
    }

    #[test]
    fn test_report_issues() {
        let mut summary = RunSummary::default();
        record_key(&mut summary.diagnostics.unused, "a_unused", "translations/en.json");
        record_key(&mut summary.diagnostics.unused, "a_unused", "translations/de.json");
        record_key(&mut summary.diagnostics.missing, "hello.world", "app/controllers/index.js");

        assert_eq!(
            render(&summary),
            "
 ⚠️   Found 1 unused translations!
     You can use --fix to remove all unused translations.

   - a_unused (used in de.json and en.json)

 ⚠️   Found 1 missing translations!

   - hello.world (used in app/controllers/index.js)
"
        );
    }

    #[test]
    fn test_report_fix_and_stale_whitelist() {
        let mut summary = RunSummary {
            fix: true,
            fixed_files: 2,
            error_on_unused_whitelist_entries: true,
            ..RunSummary::default()
        };
        record_key(&mut summary.diagnostics.unused, "old", "translations/en.json");
        summary.diagnostics.unused_whitelist_entries = vec!["^legacy\\.".to_string()];

        let output = render(&summary);
        assert!(!output.contains("--fix"));
        assert!(output.contains(" 👏  Removed all unused translations from 2 files!"));
        assert!(output.contains(" ⚠️   Found 1 unused whitelist entries! Please remove them:"));
        assert!(output.ends_with("   - ^legacy\\.\n"));
    }

    #[test]
    fn test_step_line() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_step_to(&mut out, 2, "Searching").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[2/4] Searching\n");
    }
}
