#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! choicekit: inspect, search and script a choices-style select or tag input.

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("choicekit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);

    match commands::dispatch(&cli.command, &ctx) {
        Ok(()) => {}
        Err(err) => {
            let error_output = ErrorOutput::from_error(&err);
            write_error(&error_output, cli.output, cli.json);
            std::process::exit(types::exit_code(&err));
        }
    }
}
