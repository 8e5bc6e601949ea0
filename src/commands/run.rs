/// `run` command: replay a script of user intents against a control.
///
/// Choices and items are addressed by value in scripts so they stay readable;
/// the first match wins.
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::OutputCtx;
use crate::cli::args::RunArgs;
use crate::cli::output::write_run;
use crate::commands::{load_setup, read_json};
use crate::types::{ItemOutput, RunOutput};
use choicekit::choices::{ChoiceId, Choices, Direction, ItemId, ItemSpec};

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    /// Type into the search (or text) input.
    Search { query: String },
    #[serde(rename_all = "camelCase")]
    Move {
        direction: Direction,
        #[serde(default)]
        skip: bool,
    },
    Hover { value: String },
    /// Enter on the highlighted choice.
    Select,
    ClickChoice { value: String },
    EnterText,
    Backspace,
    SelectAll,
    ClickItem {
        value: String,
        #[serde(default)]
        shift: bool,
    },
    RemoveButton { value: String },
    RemoveItem { value: String },
    RemoveHighlighted,
    HighlightAll,
    UnhighlightAll,
    SetValue { values: Vec<ItemSpec> },
    SetChoiceByValue { values: Vec<String> },
    #[serde(rename_all = "camelCase")]
    SetChoices {
        choices: Vec<Value>,
        #[serde(default = "default_value_key")]
        value_key: String,
        #[serde(default = "default_label_key")]
        label_key: String,
        #[serde(default)]
        replace: bool,
    },
    /// Begin and complete an async load in one step.
    #[serde(rename_all = "camelCase")]
    Load {
        results: Vec<Value>,
        #[serde(default = "default_value_key")]
        value_key: String,
        #[serde(default = "default_label_key")]
        label_key: String,
    },
    ClearInput,
    ClearStore,
    ShowDropdown,
    HideDropdown,
    ToggleDropdown,
    Escape,
    Enable,
    Disable,
    Reset,
}

fn default_value_key() -> String {
    "value".to_owned()
}

fn default_label_key() -> String {
    "label".to_owned()
}

/// Run `choicekit run`.
///
/// # Errors
///
/// Returns an error when the setup or script file cannot be loaded.
pub fn run(args: &RunArgs, ctx: &OutputCtx) -> anyhow::Result<()> {
    let mut choices = load_setup(&args.setup)?;
    let script: Vec<Intent> = read_json(&args.script)?;

    for intent in &script {
        debug!(?intent, "replaying");
        apply(&mut choices, intent);
    }

    let output = RunOutput {
        items: choices.get_value().into_iter().map(ItemOutput::from).collect(),
        dropdown: choices.dropdown_view(),
        open: choices.is_open(),
        events: choices.drain_events(),
    };
    write_run(&output, ctx);
    Ok(())
}

/// Apply one intent. Intents naming unknown values are ignored.
pub fn apply(choices: &mut Choices, intent: &Intent) {
    match intent {
        Intent::Search { query } => {
            choices.on_search_input(query);
        }
        Intent::Move { direction, skip } => {
            choices.on_directional_intent(*direction, *skip);
        }
        Intent::Hover { value } => {
            if let Some(id) = choice_id(choices, value) {
                choices.on_choice_hover(id);
            }
        }
        Intent::Select => {
            choices.on_select_intent();
        }
        Intent::ClickChoice { value } => {
            if let Some(id) = choice_id(choices, value) {
                choices.on_choice_click(id);
            }
        }
        Intent::EnterText => {
            choices.on_enter_text();
        }
        Intent::Backspace => choices.on_backspace(),
        Intent::SelectAll => choices.on_select_all(),
        Intent::ClickItem { value, shift } => {
            if let Some(id) = item_id(choices, value) {
                choices.on_item_click(id, *shift);
            }
        }
        Intent::RemoveButton { value } => {
            if let Some(id) = item_id(choices, value) {
                choices.on_remove_button(id);
            }
        }
        Intent::RemoveItem { value } => choices.remove_active_items_by_value(value),
        Intent::RemoveHighlighted => choices.remove_highlighted_items(true),
        Intent::HighlightAll => choices.highlight_all(),
        Intent::UnhighlightAll => choices.unhighlight_all(),
        Intent::SetValue { values } => choices.set_value(values),
        Intent::SetChoiceByValue { values } => {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            choices.set_choice_by_value(&values);
        }
        Intent::SetChoices {
            choices: entries,
            value_key,
            label_key,
            replace,
        } => choices.set_choices(entries, value_key, label_key, *replace),
        Intent::Load {
            results,
            value_key,
            label_key,
        } => {
            let token = choices.begin_load();
            choices.complete_load(token, results, value_key, label_key);
        }
        Intent::ClearInput => choices.clear_input(),
        Intent::ClearStore => choices.clear_store(),
        Intent::ShowDropdown => {
            choices.show_dropdown();
        }
        Intent::HideDropdown => {
            choices.hide_dropdown();
        }
        Intent::ToggleDropdown => choices.toggle_dropdown(),
        Intent::Escape => choices.on_escape(),
        Intent::Enable => choices.enable(),
        Intent::Disable => choices.disable(),
        Intent::Reset => choices.form_reset(),
    }
}

fn choice_id(choices: &Choices, value: &str) -> Option<ChoiceId> {
    choices
        .store()
        .choices()
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.id)
}

fn item_id(choices: &Choices, value: &str) -> Option<ItemId> {
    choices
        .store()
        .items()
        .iter()
        .find(|i| i.value == value)
        .map(|i| i.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use choicekit::choices::{Config, OptionSpec, SourceElement};

    fn colours() -> Choices {
        let element = SourceElement::new("select-multiple").with_options(vec![
            OptionSpec::new("red", "Red"),
            OptionSpec::new("green", "Green"),
        ]);
        Choices::new(element, Config::default()).unwrap()
    }

    fn script(json: &str) -> Vec<Intent> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_intents() {
        let intents = script(
            r#"[
                {"intent": "search", "query": "re"},
                {"intent": "move", "direction": "pageDown"},
                {"intent": "clickItem", "value": "red", "shift": true},
                {"intent": "setChoices", "choices": [{"id": 1}], "valueKey": "id"},
                {"intent": "reset"}
            ]"#,
        );
        assert_eq!(intents.len(), 5);
        assert_eq!(
            intents[1],
            Intent::Move {
                direction: Direction::PageDown,
                skip: false
            }
        );
        assert!(matches!(&intents[3], Intent::SetChoices { value_key, label_key, .. }
            if value_key == "id" && label_key == "label"));
    }

    #[test]
    fn test_replay_click_and_remove() {
        let mut choices = colours();
        for intent in script(
            r#"[
                {"intent": "clickChoice", "value": "red"},
                {"intent": "clickChoice", "value": "green"},
                {"intent": "removeItem", "value": "red"},
                {"intent": "clickChoice", "value": "missing"}
            ]"#,
        ) {
            apply(&mut choices, &intent);
        }
        assert_eq!(choices.values(), vec!["green"]);
    }

    #[test]
    fn test_replay_load_and_reset() {
        let mut choices = colours();
        apply(
            &mut choices,
            &Intent::Load {
                results: vec![serde_json::json!({"value": "blue", "label": "Blue"})],
                value_key: default_value_key(),
                label_key: default_label_key(),
            },
        );
        apply(&mut choices, &Intent::ClickChoice { value: "blue".to_owned() });
        assert_eq!(choices.values(), vec!["blue"]);
        apply(&mut choices, &Intent::Reset);
        assert!(choices.values().is_empty());
    }
}
