// Shared helpers for integration tests.
//
// Provides a temporary home directory and a fluent builder so each
// integration test can run the `confshelf` binary in an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use confshelf::manifest::{ManagedLink, ManifestStore};
use confshelf::paths::AppPaths;

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// `HOME` and `XDG_CACHE_HOME` of every spawned process point into it, so
/// nothing outside the temporary directory is touched.
pub struct IntegrationTestContext {
    /// Temporary directory acting as the user's home.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new, empty home directory.
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create temp dir");
        Self { home }
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Default application layout under the home directory.
    pub fn paths(&self) -> AppPaths {
        AppPaths::from_home(self.home.path())
    }

    /// Run `confshelf` with `args` from inside the home directory.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_confshelf"))
            .args(args)
            .current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env("XDG_CACHE_HOME", self.home.path().join(".cache"))
            .env_remove("USERPROFILE")
            .output()
            .expect("failed to execute confshelf binary")
    }

    /// Run `confshelf` and assert that it exited successfully.
    pub fn run_ok(&self, args: &[&str]) -> Output {
        let out = self.run(args);
        assert!(
            out.status.success(),
            "confshelf {args:?} failed:\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
        out
    }

    /// Run `confshelf` and assert that it exited with status 1.
    pub fn run_err(&self, args: &[&str]) -> Output {
        let out = self.run(args);
        assert_eq!(
            out.status.code(),
            Some(1),
            "confshelf {args:?} should fail:\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
        out
    }

    /// Absolute path of `rel` inside the home directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    /// Manifest entries recorded so far.
    pub fn manifest(&self) -> Vec<ManagedLink> {
        ManifestStore::new(self.paths().manifest_path())
            .read()
            .expect("read manifest")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty home directory.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `rel` inside the home directory.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.ctx.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Write `content` to `name` inside the default repository root.
    pub fn with_repo_file(self, name: &str, content: &str) -> Self {
        let path = self.ctx.paths().repository_root().join(name);
        std::fs::create_dir_all(path.parent().expect("repo file parent")).expect("create repo");
        std::fs::write(&path, content).expect("write repo file");
        self
    }

    /// Write `content` as `~/.confshelf/config.toml`.
    pub fn with_config(self, content: &str) -> Self {
        let path = self.ctx.paths().config_path();
        std::fs::create_dir_all(path.parent().expect("config parent")).expect("create app dir");
        std::fs::write(&path, content).expect("write config");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Stdout of `out` as a string.
pub fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Stderr of `out` as a string.
pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}
