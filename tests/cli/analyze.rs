use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, STEPS, run};

#[test]
fn test_clean_project() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"<h1>{{t "title"}}</h1>"#),
        ("translations/en-us.json", r#"{"title": "Hello"}"#),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        format!(
            "{STEPS}\n 👏  No unused translations were found!\n\n 👏  No missing translations were found!\n"
        )
    );
    assert_eq!(output.stderr, "");
    Ok(())
}

#[test]
fn test_missing_and_unused() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "a.b"}}"#),
        (
            "app/controllers/application.js",
            "export default class { greet() { return this.intl.t('hello.world'); } }",
        ),
        (
            "translations/en-us.json",
            r#"{"a": {"b": "x"}, "a_unused": "y"}"#,
        ),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(1));
    assert_eq!(
        output.stdout,
        format!(
            "{STEPS}
 ⚠️   Found 1 unused translations!
     You can use --fix to remove all unused translations.

   - a_unused (used in en-us.json)

 ⚠️   Found 1 missing translations!

   - hello.world (used in app/controllers/application.js)
"
        )
    );
    Ok(())
}

#[test]
fn test_every_dialect_is_scanned() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "config/intl-analyzer.json",
            r#"{ "extensions": [".ts", ".gjs"], "analyzeConcatExpression": true }"#,
        ),
        (
            "app/templates/index.hbs",
            r#"{{t (concat "menu." (if open "open" "closed"))}}"#,
        ),
        ("app/templates/legacy.emblem", "h1 = t \"legacy.title\"\n"),
        (
            "app/services/greeter.ts",
            "export default class Greeter { greet(intl: any): string { return intl.t('greeter.hello'); } }",
        ),
        (
            "app/components/badge.gjs",
            "<template><span>{{t \"badge.label\"}}</span></template>\n",
        ),
        (
            "translations/en-us.yaml",
            "menu:\n  open: Open\n  closed: Closed\nlegacy:\n  title: Legacy\ngreeter:\n  hello: Hi\nbadge:\n  label: Badge\n",
        ),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    assert!(output.stdout.contains(" 👏  No unused translations were found!"));
    assert!(output.stdout.contains(" 👏  No missing translations were found!"));
    Ok(())
}

#[test]
fn test_external_catalogs_satisfy_missing_keys() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "config/intl-analyzer.json",
            r#"{ "externalPaths": ["design-system"] }"#,
        ),
        ("app/templates/application.hbs", r#"{{t "ds.button"}}"#),
        ("translations/en-us.json", "{}"),
        (
            "node_modules/design-system/translations/en-us.json",
            r#"{"ds": {"button": "Click", "unused": "Never reported"}}"#,
        ),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    Ok(())
}

#[test]
fn test_in_repo_addons() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/application.hbs", r#"{{t "app.title"}}"#),
        ("lib/admin/addon/templates/panel.hbs", r#"{{t "admin.title"}}"#),
        ("translations/en-us.json", r#"{"app": {"title": "App"}}"#),
        ("lib/admin/translations/en-us.json", r#"{"admin": {"title": "Admin"}}"#),
    ])?;
    test.write_file(
        "package.json",
        r#"{ "name": "test-app", "ember-addon": { "paths": ["lib/admin"] } }"#,
    )?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0), "{}", output.stdout);
    Ok(())
}

#[test]
fn test_parse_error_exits_with_error() -> Result<()> {
    let test = CliTest::with_files(&[
        ("app/templates/broken.hbs", "{{#if ready}}\n  {{t \"a\"}}\n"),
        ("translations/en-us.json", r#"{"a": "A"}"#),
    ])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(2));
    assert!(
        output
            .stderr
            .starts_with("error: Failed to parse app/templates/broken.hbs"),
        "{}",
        output.stderr
    );
    Ok(())
}

#[test]
fn test_invalid_catalog_value_exits_with_error() -> Result<()> {
    let test = CliTest::with_files(&[("translations/en-us.json", r#"{"count": 3}"#)])?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(2));
    assert_eq!(
        output.stderr,
        "error: Unknown value type: number (for count in translations/en-us.json)\n"
    );
    Ok(())
}

#[test]
fn test_root_argument() -> Result<()> {
    let test = CliTest::with_files(&[
        ("web/package.json", "{}"),
        ("web/app/templates/application.hbs", r#"{{t "web.title"}}"#),
    ])?;

    let mut cmd = test.command();
    cmd.arg("--root").arg(test.root().join("web"));
    let output = run(cmd)?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("   - web.title (used in app/templates/application.hbs)"));
    Ok(())
}
