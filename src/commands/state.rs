/// `state` command: print the items, choices and groups of a control.
use crate::cli::OutputCtx;
use crate::cli::args::StateArgs;
use crate::cli::output::write_state;
use crate::commands::load_setup;
use crate::types::{ChoiceOutput, GroupOutput, ItemOutput, StateOutput};

/// Run `choicekit state`.
///
/// # Errors
///
/// Returns an error when the setup file cannot be loaded.
pub fn run(args: &StateArgs, ctx: &OutputCtx) -> anyhow::Result<()> {
    let choices = load_setup(&args.setup)?;
    let store = choices.store();

    let output = StateOutput {
        mode: choices.mode().as_str().to_owned(),
        items: choices.get_value().into_iter().map(ItemOutput::from).collect(),
        choices: store.choices().iter().map(ChoiceOutput::from).collect(),
        groups: store.groups().iter().map(GroupOutput::from).collect(),
    };

    write_state(&output, ctx);
    Ok(())
}
