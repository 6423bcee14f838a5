use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn ifacemaker() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ifacemaker"))
}

const STORE: &str = r#"package store

import "context"

// Store keeps widgets.
type Store struct{}

// Get loads a widget.
func (s *Store) Get(ctx context.Context, id string) (*Widget, error) {
    return nil, nil
}
"#;

const STORE_EXTRA: &str = r#"package store

func (s *Store) Close() error { return nil }

func (s *Store) flush() {}
"#;

#[test]
fn test_cli_directory_to_stdout() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b_extra.go"), STORE_EXTRA).unwrap();
    fs::write(dir.path().join("a_store.go"), STORE).unwrap();
    fs::write(dir.path().join("README.md"), "not go").unwrap();

    let output = ifacemaker()
        .args(["-f", &dir.path().display().to_string()])
        .args(["-s", "Store", "-i", "StoreAPI", "-p", "api"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = "// Code generated by ifacemaker. DO NOT EDIT.

package api

import (
\t\"context\"
)

type StoreAPI interface {
\t// Get loads a widget.
\tGet(ctx context.Context, id string) (*Widget, error)
\tClose() error
}
";
    assert_eq!(stdout, expected);
}

#[test]
fn test_cli_writes_output_file_without_docs() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("store.go");
    fs::write(&source, STORE).unwrap();
    let out = dir.path().join("api").join("store_api.go");
    fs::create_dir_all(out.parent().unwrap()).unwrap();

    let status = ifacemaker()
        .args(["-f", &source.display().to_string()])
        .args(["-s", "Store", "-i", "StoreAPI", "-p", "api", "-d", "false"])
        .args(["-o", &out.display().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("\tGet(ctx context.Context, id string) (*Widget, error)\n"));
    assert!(!written.contains("Get loads"));
}

#[test]
fn test_cli_bare_doc_flag_means_true() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("store.go");
    fs::write(&source, STORE).unwrap();
    let config = dir.path().join("ifacemaker.json");
    fs::write(
        &config,
        r#"{ "struct_name": "Store", "iface_name": "StoreAPI", "pkg_name": "api", "copy_docs": false }"#,
    )
    .unwrap();

    let output = ifacemaker()
        .args(["-f", &source.display().to_string()])
        .args(["-c", &config.display().to_string(), "-d"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\t// Get loads a widget.\n"));
}

#[test]
fn test_cli_config_file_supplies_names() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("store.go");
    fs::write(&source, STORE).unwrap();
    let config = dir.path().join("ifacemaker.json");
    fs::write(
        &config,
        r#"{ "struct_name": "Store", "iface_name": "FromConfig", "pkg_name": "api" }"#,
    )
    .unwrap();

    let output = ifacemaker()
        .args(["-f", &source.display().to_string()])
        .args(["-c", &config.display().to_string(), "-i", "FromFlag"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("type FromFlag interface {"));
}

#[test]
fn test_cli_reports_errors_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.go");
    let b = dir.path().join("b.go");
    fs::write(&a, "package p\n\nimport q \"x/y\"\n\nfunc (s *S) A(v q.T) {}\n").unwrap();
    fs::write(&b, "package p\n\nimport q \"x/z\"\n\nfunc (s *S) B(v q.T) {}\n").unwrap();

    let output = ifacemaker()
        .args(["-f", &a.display().to_string(), &b.display().to_string()])
        .args(["-s", "S", "-i", "SI", "-p", "p"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Import alias q already in use"));
    assert!(output.stdout.is_empty());
}
