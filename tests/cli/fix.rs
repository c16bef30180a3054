use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

fn compact(content: &str) -> Result<String> {
    let value: Value = serde_json::from_str(content)?;
    Ok(serde_json::to_string(&value)?)
}

#[test]
fn test_fix_removes_unused_keys() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "a.b"}}"#),
        (
            "translations/en-us.json",
            r#"{"a": {"b": "x"}, "a_unused": "y"}"#,
        ),
    ])?;

    let output = run(test.fix_command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    assert!(!output.stdout.contains("You can use --fix"));
    assert!(output.stdout.ends_with(" 👏  Removed all unused translations from 1 file!\n"));

    let content = test.read_file("translations/en-us.json")?;
    assert_eq!(content, "{\n  \"a\": {\n    \"b\": \"x\"\n  }\n}\n");
    Ok(())
}

#[test]
fn test_fix_prunes_emptied_parents_in_every_catalog() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "keep"}}"#),
        (
            "translations/en-us.json",
            r#"{"keep": "Keep", "old": {"nested": {"key": "Old"}}, "z": "Z"}"#,
        ),
        (
            "translations/de-de.json",
            r#"{"old": {"nested": {"key": "Alt"}, "other": "Anders"}, "keep": "Behalten"}"#,
        ),
    ])?;

    let output = run(test.fix_command())?;
    assert_eq!(output.code, Some(0), "{}", output.stdout);

    assert_snapshot!(compact(&test.read_file("translations/en-us.json")?)?, @r#"{"keep":"Keep"}"#);
    assert_snapshot!(compact(&test.read_file("translations/de-de.json")?)?, @r#"{"keep":"Behalten"}"#);
    Ok(())
}

#[test]
fn test_fix_keeps_missing_keys_failing() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "not.defined"}}"#),
        ("translations/en-us.json", r#"{"unused": "U"}"#),
    ])?;

    let output = run(test.fix_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("   - not.defined (used in app/templates/application.hbs)"));
    assert_eq!(test.read_file("translations/en-us.json")?, "{}\n");
    Ok(())
}

#[test]
fn test_fix_yaml_catalog() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "menu.open"}}"#),
        (
            "translations/en-us.yaml",
            "menu:\n  open: Open\n  close: Close\n",
        ),
    ])?;

    let output = run(test.fix_command())?;
    assert_eq!(output.code, Some(0), "{}", output.stdout);

    let content = test.read_file("translations/en-us.yaml")?;
    assert!(content.contains("open: Open"), "{}", content);
    assert!(!content.contains("close"), "{}", content);
    Ok(())
}

#[test]
fn test_fix_is_idempotent() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "a"}}"#),
        ("translations/en-us.json", r#"{"a": "A", "b": "B"}"#),
    ])?;

    run(test.fix_command())?;
    let first = test.read_file("translations/en-us.json")?;

    let output = run(test.fix_command())?;
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains(" 👏  No unused translations were found!"));
    assert_eq!(test.read_file("translations/en-us.json")?, first);
    Ok(())
}

#[test]
fn test_untouched_catalogs_are_not_rewritten() -> Result<()> {
    let original = "{ \"a\":   \"A\" }";
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "a"}}"#),
        ("translations/en-us.json", original),
    ])?;

    run(test.fix_command())?;

    assert_eq!(test.read_file("translations/en-us.json")?, original);
    Ok(())
}
