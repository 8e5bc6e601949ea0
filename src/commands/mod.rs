/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod run;
pub mod search;
pub mod state;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::OutputCtx;
use crate::cli::args::Command;
use choicekit::choices::{Choices, ChoicesError, Config, SourceElement};

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns an error when an input file cannot be read or decoded, or when the
/// engine rejects the setup.
pub fn dispatch(command: &Command, ctx: &OutputCtx) -> anyhow::Result<()> {
    match command {
        Command::State(args) => state::run(args, ctx),
        Command::Search(args) => search::run(args, ctx),
        Command::Run(args) => run::run(args, ctx),
    }
}

/// Contents of a setup file.
#[derive(Debug, Deserialize)]
pub struct Setup {
    pub element: SourceElement,
    #[serde(default)]
    pub config: Config,
}

/// Read a JSON file and decode it.
///
/// # Errors
///
/// Returns an I/O error with the path attached, or `ChoicesError::Json`.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&raw).map_err(ChoicesError::from)?;
    Ok(value)
}

/// Build a control from a setup file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or decoded, or when
/// construction fails.
pub fn load_setup(path: &Path) -> anyhow::Result<Choices> {
    let setup: Setup = read_json(path)?;
    Ok(Choices::new(setup.element, setup.config)?)
}
