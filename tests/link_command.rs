#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `link` command.

mod common;

use common::{TestContextBuilder, stderr};
use confshelf::manifest::ManagedLink;

#[test]
fn link_to_managed_file() {
    let ctx = TestContextBuilder::new().with_file(".vimrc", "x").build();
    ctx.run_ok(&["manage", ".vimrc", "vimrc"]);

    ctx.run_ok(&["link", "vimrc", ".vimrc-work"]);

    let link = ctx.path(".vimrc-work");
    let member = ctx.path(".confshelf/repo/vimrc");
    assert_eq!(std::fs::read_link(&link).unwrap(), member);
    assert_eq!(std::fs::read_to_string(&link).unwrap(), "x");
    assert_eq!(
        ctx.manifest().last(),
        Some(&ManagedLink::new(&link, "vimrc"))
    );
}

#[test]
fn link_to_file_placed_in_repository_by_hand() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("gitconfig", "[user]\n")
        .build();

    ctx.run_ok(&["link", "gitconfig", ".gitconfig"]);

    assert_eq!(
        std::fs::read_to_string(ctx.path(".gitconfig")).unwrap(),
        "[user]\n"
    );
}

#[test]
fn existing_target_is_a_conflict() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("gitconfig", "repo")
        .with_file(".gitconfig", "local")
        .build();

    let out = ctx.run_err(&["link", "gitconfig", ".gitconfig"]);

    assert!(stderr(&out).contains("already exists"), "{}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(ctx.path(".gitconfig")).unwrap(),
        "local"
    );
    assert!(ctx.manifest().is_empty());
}

#[test]
fn missing_member_is_reported() {
    let ctx = TestContextBuilder::new().build();

    let out = ctx.run_err(&["link", "gitconfig", ".gitconfig"]);

    assert!(stderr(&out).contains("does not exist"), "{}", stderr(&out));
    assert!(ctx.path(".gitconfig").symlink_metadata().is_err());
}

#[test]
fn missing_parent_directory_is_an_io_error() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("init.lua", "x")
        .build();

    let out = ctx.run_err(&["link", "init.lua", ".config/nvim/init.lua"]);

    assert!(
        stderr(&out).contains("failed to create symlink"),
        "{}",
        stderr(&out)
    );
    assert!(ctx.manifest().is_empty());
}
