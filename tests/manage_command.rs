#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `manage` command.
//!
//! Each test runs the compiled binary against a temporary home directory
//! and checks the resulting filesystem and manifest.

mod common;

use common::{IntegrationTestContext, TestContextBuilder, stderr};
use confshelf::manifest::ManagedLink;

fn manifest_text(ctx: &IntegrationTestContext) -> String {
    std::fs::read_to_string(ctx.paths().manifest_path())
        .unwrap()
        .replace(ctx.home_path().to_str().unwrap(), "/home/u")
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn manage_vimrc_links_back_and_records() {
    let ctx = TestContextBuilder::new()
        .with_file(".vimrc", "set number\n")
        .build();
    let source = ctx.path(".vimrc");

    ctx.run_ok(&["manage", source.to_str().unwrap(), "vimrc"]);

    let member = ctx.path(".confshelf/repo/vimrc");
    assert!(source.symlink_metadata().unwrap().is_symlink());
    assert_eq!(std::fs::read_link(&source).unwrap(), member);
    assert_eq!(std::fs::read_to_string(&member).unwrap(), "set number\n");
    insta::assert_snapshot!(manifest_text(&ctx).trim_end(), @r#""/home/u/.vimrc" = "vimrc""#);
}

#[test]
fn relative_source_is_recorded_as_absolute() {
    let ctx = TestContextBuilder::new().with_file(".bashrc", "x").build();

    ctx.run_ok(&["manage", ".bashrc", "bashrc"]);

    assert_eq!(
        ctx.manifest(),
        vec![ManagedLink::new(ctx.path(".bashrc"), "bashrc")]
    );
}

#[test]
fn first_run_bootstraps_application_directory() {
    let ctx = TestContextBuilder::new().with_file(".vimrc", "x").build();

    ctx.run_ok(&["manage", ".vimrc", "vimrc"]);

    let paths = ctx.paths();
    assert!(paths.repository_root().is_dir());
    assert!(paths.config_path().is_file());
    assert!(ctx.path(".cache/confshelf/manage.log").is_file());
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn managing_twice_is_a_conflict() {
    let ctx = TestContextBuilder::new().with_file(".vimrc", "x").build();
    ctx.run_ok(&["manage", ".vimrc", "vimrc"]);

    let out = ctx.run_err(&["manage", ".vimrc", "vimrc"]);

    assert!(stderr(&out).contains("already exists"), "{}", stderr(&out));
    assert_eq!(
        std::fs::read_link(ctx.path(".vimrc")).unwrap(),
        ctx.path(".confshelf/repo/vimrc")
    );
    assert_eq!(ctx.manifest().len(), 1);
}

#[test]
fn missing_source_fails_without_changes() {
    let ctx = IntegrationTestContext::new();

    let out = ctx.run_err(&["manage", ".nope", "nope"]);

    assert!(stderr(&out).contains("does not exist"), "{}", stderr(&out));
    assert!(!ctx.paths().repository_root().join("nope").exists());
    assert!(ctx.manifest().is_empty());
}

#[test]
fn failure_is_written_to_log_file_as_error() {
    let ctx = IntegrationTestContext::new();

    let out = ctx.run_err(&["manage", ".nope", "nope"]);

    let log = std::fs::read_to_string(ctx.path(".cache/confshelf/manage.log")).unwrap();
    let error_line = log
        .lines()
        .find(|line| line.contains("[error]"))
        .unwrap_or_else(|| panic!("no error line in log:\n{log}"));
    assert!(error_line.contains("does not exist"), "{error_line}");
    assert!(stderr(&out).contains("details in"), "{}", stderr(&out));
}

#[test]
fn directory_source_is_rejected() {
    let ctx = TestContextBuilder::new()
        .with_file(".config/nvim/init.lua", "x")
        .build();

    let out = ctx.run_err(&["manage", ".config/nvim", "nvim"]);

    assert!(stderr(&out).contains("not a regular file"), "{}", stderr(&out));
    assert!(ctx.path(".config/nvim").is_dir());
}

#[test]
fn escaping_name_is_rejected() {
    let ctx = TestContextBuilder::new().with_file(".vimrc", "x").build();

    let out = ctx.run_err(&["manage", ".vimrc", "../../vimrc"]);

    assert!(stderr(&out).contains("invalid repository name"), "{}", stderr(&out));
    assert!(ctx.path(".vimrc").symlink_metadata().unwrap().is_file());
}

#[test]
fn missing_home_is_a_configuration_error() {
    let cache = tempfile::tempdir().unwrap();
    let out = std::process::Command::new(env!("CARGO_BIN_EXE_confshelf"))
        .args(["manage", "/tmp/x", "x"])
        .current_dir(cache.path())
        .env("XDG_CACHE_HOME", cache.path())
        .env_remove("HOME")
        .env_remove("USERPROFILE")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("\"HOME\" variable not set"), "{}", stderr(&out));
}

#[test]
fn relative_home_is_rejected_before_any_change() {
    let cwd = tempfile::tempdir().unwrap();
    std::fs::create_dir(cwd.path().join("h")).unwrap();
    std::fs::write(cwd.path().join("h/.vimrc"), "set nu\n").unwrap();

    let out = std::process::Command::new(env!("CARGO_BIN_EXE_confshelf"))
        .args(["manage", "h/.vimrc", "vimrc"])
        .current_dir(cwd.path())
        .env("HOME", "h")
        .env("XDG_CACHE_HOME", cwd.path().join(".cache"))
        .env_remove("USERPROFILE")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("is not an absolute path"), "{}", stderr(&out));
    let meta = cwd.path().join("h/.vimrc").symlink_metadata().unwrap();
    assert!(meta.is_file(), "source must stay a regular file");
    assert!(!cwd.path().join("h/.confshelf").exists());
}

// ---------------------------------------------------------------------------
// Manifest monotonicity
// ---------------------------------------------------------------------------

#[test]
fn failed_operations_append_nothing() {
    let ctx = TestContextBuilder::new()
        .with_file(".vimrc", "v")
        .with_file(".zshrc", "z")
        .build();

    ctx.run_ok(&["manage", ".vimrc", "vimrc"]);
    ctx.run_err(&["manage", ".vimrc", "vimrc"]);
    ctx.run_err(&["manage", ".missing", "missing"]);
    ctx.run_ok(&["manage", ".zshrc", "zshrc"]);
    ctx.run_err(&["link", "vimrc", ".zshrc"]);
    ctx.run_ok(&["link", "vimrc", ".vimrc-copy"]);

    let names: Vec<String> = ctx
        .manifest()
        .into_iter()
        .map(|e| e.repo_relative_name)
        .collect();
    assert_eq!(names, vec!["vimrc", "zshrc", "vimrc"]);
}
