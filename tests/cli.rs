//! Command runs configured from JSON catalogs

mod helper;

use std::path::Path;

use tempfile::TempDir;

use glsa_check::cli::{self, Cli, Context};
use glsa_check::config::GlsaConfig;

use clap::Parser;
use helper::write_advisory;

const PKG: &str = r#"
    <package name="cat/pkg" auto="yes" arch="amd64 x86">
      <unaffected range="ge">1.0</unaffected>
      <vulnerable range="lt">1.0</vulnerable>
    </package>"#;

fn setup(temp: &Path) {
    write_advisory(&temp.join("glsa"), "202401-01", "pkg: overflow", PKG);
    std::fs::write(
        temp.join("installed.json"),
        r#"[{ "package": "cat/pkg", "version": "0.9", "slot": "0" }]"#,
    )
    .unwrap();
    std::fs::write(
        temp.join("available.json"),
        r#"[
            { "package": "cat/pkg", "version": "1.0", "slot": "0" },
            { "package": "cat/pkg", "version": "1.1", "slot": "0" }
        ]"#,
    )
    .unwrap();
}

fn run(temp: &Path, args: &[&str]) -> String {
    let glsa_dir = temp.join("glsa");
    let checkfile = temp.join("glsa_injected");
    let installed = temp.join("installed.json");
    let available = temp.join("available.json");
    let mut argv = vec![
        "glsa-check",
        "--glsa-dir",
        glsa_dir.to_str().unwrap(),
        "--checkfile",
        checkfile.to_str().unwrap(),
        "--installed-catalog",
        installed.to_str().unwrap(),
        "--available-catalog",
        available.to_str().unwrap(),
    ];
    argv.extend_from_slice(args);

    let cli = Cli::try_parse_from(argv).unwrap();
    let config = GlsaConfig::default().with_overrides(cli.overrides());
    let ctx = Context::from_config(&config).unwrap();

    let mut out = Vec::new();
    cli::run(&ctx, &cli.command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_reports_affected_advisory() {
    let temp = TempDir::new().unwrap();
    setup(temp.path());

    assert_eq!(run(temp.path(), &["--arch", "amd64", "test", "all"]), "202401-01\n");
    assert_eq!(run(temp.path(), &["--arch", "arm64", "test", "all"]), "");
}

#[test]
fn pretend_latest_lists_newest_fix() {
    let temp = TempDir::new().unwrap();
    setup(temp.path());

    let text = run(
        temp.path(),
        &["--arch", "x86", "pretend", "--latest", "202401-01"],
    );

    assert!(text.contains("cat/pkg-0.9 -> cat/pkg-1.1"));
}

#[test]
fn inject_then_list_shows_applied() {
    let temp = TempDir::new().unwrap();
    setup(temp.path());

    assert_eq!(
        run(temp.path(), &["--arch", "amd64", "inject", "affected"]),
        "injecting 202401-01\n"
    );
    assert_eq!(
        run(temp.path(), &["--arch", "amd64", "list"]),
        "202401-01 [A] pkg: overflow (cat/pkg)\n"
    );
    assert_eq!(run(temp.path(), &["--arch", "amd64", "list", "new"]), "");
}

#[test]
fn missing_catalog_file_fails_context() {
    let temp = TempDir::new().unwrap();
    let config = GlsaConfig {
        installed_catalog: Some(temp.path().join("missing.json")),
        ..GlsaConfig::default()
    };

    assert!(Context::from_config(&config).is_err());
}
