//! Command: print version information.

/// The version string: `CONFSHELF_VERSION` baked in at build time from
/// `git describe`, falling back to the crate version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("CONFSHELF_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Print the confshelf version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("confshelf {}", version());
}
