/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the engine's `Choice` / `Item` types.
use serde::Serialize;

use choicekit::choices::{Choice, ChoicesError, DropdownView, Event, Group, Item};

/// An item in the output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    pub id: u32,
    pub value: String,
    pub label: String,
    /// Originating choice id, or null for typed values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_id: Option<u32>,
    pub highlighted: bool,
    pub placeholder: bool,
}

impl From<&Item> for ItemOutput {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.0,
            value: item.value.clone(),
            label: item.label.clone(),
            choice_id: item.choice_id.map(|c| c.0),
            highlighted: item.highlighted,
            placeholder: item.placeholder,
        }
    }
}

/// A choice in the output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ChoiceOutput {
    pub id: u32,
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    pub selected: bool,
    pub disabled: bool,
    pub active: bool,
    pub placeholder: bool,
}

impl From<&Choice> for ChoiceOutput {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id.0,
            value: choice.value.clone(),
            label: choice.label.clone(),
            group_id: choice.group_id.map(|g| g.0),
            selected: choice.selected,
            disabled: choice.disabled,
            active: choice.active,
            placeholder: choice.placeholder,
        }
    }
}

/// A group in the output.
#[derive(Debug, Clone, Serialize)]
pub struct GroupOutput {
    pub id: u64,
    pub label: String,
    pub active: bool,
    pub disabled: bool,
}

impl From<&Group> for GroupOutput {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.0,
            label: group.value.clone(),
            active: group.active,
            disabled: group.disabled,
        }
    }
}

/// Result of `choicekit state`.
#[derive(Debug, Clone, Serialize)]
pub struct StateOutput {
    /// Element type (`text`, `select-one`, `select-multiple`).
    pub mode: String,
    pub items: Vec<ItemOutput>,
    pub choices: Vec<ChoiceOutput>,
    pub groups: Vec<GroupOutput>,
}

/// A search result with match score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultOutput {
    pub id: u32,
    pub value: String,
    pub label: String,
    /// Match score (lower = better). 0 for exact matches.
    pub score: f64,
}

/// Result of `choicekit run`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    /// Items after the last intent, in display order.
    pub items: Vec<ItemOutput>,
    /// Every event emitted while replaying the script.
    pub events: Vec<Event>,
    /// The dropdown as it would render after the last intent.
    pub dropdown: DropdownView,
    pub open: bool,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from any command failure, recognising engine errors.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<ChoicesError>()
            .map_or("io_error", ChoicesError::code);
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: format!("{err:#}"),
            },
        }
    }
}

/// Process exit code for a command failure.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ChoicesError>()
        .map_or(1, ChoicesError::exit_code)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_error_envelope_for_engine_error() {
        let err = anyhow::Error::new(ChoicesError::UnrecognisedElement {
            kind: "textarea".to_owned(),
        });
        let out = ErrorOutput::from_error(&err);
        assert!(!out.ok);
        assert_eq!(out.error.code, "unrecognised_element");
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_error_envelope_for_io_error() {
        let err = std::fs::read_to_string("/nonexistent/setup.json")
            .context("reading setup")
            .unwrap_err();
        let out = ErrorOutput::from_error(&err);
        assert_eq!(out.error.code, "io_error");
        assert!(out.error.message.starts_with("reading setup"));
        assert_eq!(exit_code(&err), 1);
    }
}
