use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_whitelist_exempts_keys() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "config/intl-analyzer.json",
            r#"{ "whitelist": ["^legacy\\.", "^dynamic\\."] }"#,
        ),
        ("app/templates/application.hbs", r#"{{t "dynamic.key"}}"#),
        ("translations/en-us.json", r#"{"legacy": {"old": "Old"}}"#),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    Ok(())
}

#[test]
fn test_unused_whitelist_entries() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "config/intl-analyzer.json",
            r#"{ "whitelist": ["^legacy\\.", "^stale\\."], "errorOnUnusedWhitelistEntries": true }"#,
        ),
        ("translations/en-us.json", r#"{"legacy": {"old": "Old"}}"#),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(1));
    assert!(
        output.stdout.ends_with(
            " ⚠️   Found 1 unused whitelist entries! Please remove them:\n\n   - ^stale\\.\n"
        ),
        "{}",
        output.stdout
    );
    Ok(())
}

#[test]
fn test_unused_whitelist_entries_are_ignored_by_default() -> Result<()> {
    let test = CliTest::with_files(&[
        ("config/intl-analyzer.json", r#"{ "whitelist": ["^stale\\."] }"#),
        ("translations/en-us.json", "{}"),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0));
    assert!(!output.stdout.contains("whitelist"));
    Ok(())
}

#[test]
fn test_custom_helpers() -> Result<()> {
    let test = CliTest::with_files(&[
        ("config/intl-analyzer.json", r#"{ "helpers": ["t-html"] }"#),
        (
            "app/templates/application.hbs",
            r#"{{t-html "intro"}} {{translate "ignored"}}"#,
        ),
        ("translations/en-us.json", r#"{"intro": "<b>Hi</b>"}"#),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    Ok(())
}

#[test]
fn test_invalid_config_exits_with_error() -> Result<()> {
    let test = CliTest::with_files(&[(
        "config/intl-analyzer.json",
        r#"{ "whitelist": ["(unclosed"] }"#,
    )])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(2));
    assert!(
        output
            .stderr
            .starts_with("error: Invalid regular expression in 'whitelist': \"(unclosed\""),
        "{}",
        output.stderr
    );
    assert_eq!(output.stdout, "");
    Ok(())
}

#[test]
fn test_undeclared_extensions_are_not_scanned() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/services/intl.ts", "export const x = t('ts.only');"),
        ("translations/en-us.json", "{}"),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    Ok(())
}
