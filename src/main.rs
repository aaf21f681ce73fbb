//! Command-line entry point for `confshelf`.

use std::process::ExitCode;

use clap::Parser;

use confshelf::cli::{Cli, Command};
use confshelf::commands;
use confshelf::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    logging::init_subscriber(args.verbose, args.command.name());
    let log = Logger::new(args.command.name());

    let result = match &args.command {
        Command::Setup => commands::setup::run(&log),
        Command::Manage { source, name } => commands::manage::run(source, name, &log),
        Command::Link { name, link } => commands::link::run(name, link, &log),
        Command::List => commands::list::run(&log),
        Command::Restore => commands::restore::run(&log),
        Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            if let Some(path) = log.log_path() {
                log.warn(&format!("details in {}", path.display()));
            }
            ExitCode::FAILURE
        }
    }
}
