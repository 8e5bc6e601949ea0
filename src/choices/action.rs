/// Typed actions and the factories that build them.
use serde::Serialize;
use serde_json::Value;

use super::model::{ChoiceId, GroupId, ItemId};
use super::store::State;

/// A ranked search hit handed to the choices reducer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchMatch {
    pub id: ChoiceId,
    /// Lower is better, 0 is a perfect match.
    pub score: f64,
}

/// Payload of [`Action::AddChoice`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewChoice {
    pub id: ChoiceId,
    pub value: String,
    pub label: String,
    pub group_id: Option<GroupId>,
    pub disabled: bool,
    pub placeholder: bool,
    pub custom_properties: Value,
    pub key_code: Option<u32>,
}

/// Payload of [`Action::AddItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: ItemId,
    pub choice_id: Option<ChoiceId>,
    pub value: String,
    pub label: String,
    pub group_id: Option<GroupId>,
    pub placeholder: bool,
    pub custom_properties: Value,
    pub key_code: Option<u32>,
}

/// Everything the store knows how to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddChoice(NewChoice),
    FilterChoices(Vec<SearchMatch>),
    ActivateChoices(bool),
    ClearChoices,
    AddItem(NewItem),
    RemoveItem {
        id: ItemId,
        choice_id: Option<ChoiceId>,
    },
    HighlightItem {
        id: ItemId,
        highlighted: bool,
    },
    AddGroup {
        id: GroupId,
        value: String,
        active: bool,
        disabled: bool,
    },
    ClearAll,
    ResetTo(Box<State>),
}

impl Action {
    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddChoice(_) => "ADD_CHOICE",
            Self::FilterChoices(_) => "FILTER_CHOICES",
            Self::ActivateChoices(_) => "ACTIVATE_CHOICES",
            Self::ClearChoices => "CLEAR_CHOICES",
            Self::AddItem(_) => "ADD_ITEM",
            Self::RemoveItem { .. } => "REMOVE_ITEM",
            Self::HighlightItem { .. } => "HIGHLIGHT_ITEM",
            Self::AddGroup { .. } => "ADD_GROUP",
            Self::ClearAll => "CLEAR_ALL",
            Self::ResetTo(_) => "RESET_TO",
        }
    }
}

// --- Choices ---

#[must_use]
pub fn add_choice(choice: NewChoice) -> Action {
    Action::AddChoice(choice)
}

#[must_use]
pub fn filter_choices(results: Vec<SearchMatch>) -> Action {
    Action::FilterChoices(results)
}

#[must_use]
pub fn activate_choices(active: bool) -> Action {
    Action::ActivateChoices(active)
}

#[must_use]
pub fn clear_choices() -> Action {
    Action::ClearChoices
}

// --- Items ---

#[must_use]
pub fn add_item(item: NewItem) -> Action {
    Action::AddItem(item)
}

#[must_use]
pub fn remove_item(id: ItemId, choice_id: Option<ChoiceId>) -> Action {
    Action::RemoveItem { id, choice_id }
}

#[must_use]
pub fn highlight_item(id: ItemId, highlighted: bool) -> Action {
    Action::HighlightItem { id, highlighted }
}

// --- Groups ---

#[must_use]
pub fn add_group(value: impl Into<String>, id: GroupId, active: bool, disabled: bool) -> Action {
    Action::AddGroup {
        id,
        value: value.into(),
        active,
        disabled,
    }
}

// --- Misc ---

#[must_use]
pub fn clear_all() -> Action {
    Action::ClearAll
}

/// Replace the whole state with `snapshot`.
///
/// The snapshot is cloned into the action, so later mutation of the source
/// cannot leak into the restored state.
#[must_use]
pub fn reset_to(snapshot: &State) -> Action {
    Action::ResetTo(Box::new(snapshot.clone()))
}
