//! ORTF prescription-transfer toolkit CLI.

use clap::{ColorChoice, Parser};
use std::io::IsTerminal;

mod cli;
mod commands;
mod join;
mod logging;

use crate::cli::{Cli, Command};
use crate::commands::{run_fields, run_rewrite, run_rximage};
use crate::logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    init_logging(&log_config_from_cli(&cli));

    let result = match &cli.command {
        Command::Rximage(args) => run_rximage(args),
        Command::Rewrite(args) => run_rewrite(args),
        Command::Fields(args) => run_fields(args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        },
    }
}
