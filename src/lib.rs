//! Personal configuration file manager.
//!
//! `confshelf` moves chosen files into a central repository directory,
//! leaves symbolic links at their original locations, and records every
//! relocation in an append-only manifest (`~/.confshelf/known_links.toml`).
//!
//! The public API is organised in layers, leaves first:
//!
//! - **[`error`]**: [`ConfshelfError`](error::ConfshelfError) and its [`ErrorKind`](error::ErrorKind)
//! - **[`paths`]**: the [`AppPaths`](paths::AppPaths) layout resolved once per invocation
//! - **[`config`]** and **[`bootstrap`]**: the config file and directory creation
//! - **[`operations`]**: the filesystem seam used by the link engine
//! - **[`manifest`]**: append and read `known_links.toml`
//! - **[`links`]**: `manage`, `link_existing`, audit and restore
//! - **[`commands`]** and **[`cli`]**: top-level subcommand orchestration
//! - **[`logging`]**: console and log file output through `tracing`
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod paths;
