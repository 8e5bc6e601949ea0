/// Core entities: choices, items, groups and their identifiers.
///
/// These types carry shape only. Every rule that ties them together
/// (selection consistency, id uniqueness) is enforced by the reducers.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a [`Choice`]. Assigned from a monotonic counter, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub u32);

/// Identifier of an [`Item`]. Separate id space from [`ChoiceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

/// Identifier of a [`Group`]. Caller-supplied or randomly generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: ChoiceId,
    /// Machine value.
    pub value: String,
    /// Display string. Equal to `value` when the caller supplied none.
    pub label: String,
    /// Owning group, `None` when ungrouped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// True while at least one item references this choice.
    pub selected: bool,
    /// A disabled choice is never selected through user action.
    pub disabled: bool,
    /// Passes the current search/activation filter.
    pub active: bool,
    /// Non-selectable prompt such as "Select an option".
    pub placeholder: bool,
    /// Fuzzy score while a search is active. Lower is better, 0 is perfect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Caller metadata, carried through unmodified.
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub custom_properties: Value,
    /// Key that last interacted with this choice (Enter vs pointer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_code: Option<u32>,
}

/// A materialised selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// Originating choice, `None` for freely typed values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_id: Option<ChoiceId>,
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Marked for pending removal.
    pub highlighted: bool,
    pub placeholder: bool,
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub custom_properties: Value,
    /// Key that produced this item, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_code: Option<u32>,
}

/// A labelled partition of choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    /// Display label.
    pub value: String,
    pub active: bool,
    /// Propagated to member choices at creation time only.
    pub disabled: bool,
}

/// Key codes the engine distinguishes.
pub mod key {
    pub const BACK: u32 = 46;
    pub const DELETE: u32 = 8;
    pub const ENTER: u32 = 13;
    pub const A: u32 = 65;
    pub const ESC: u32 = 27;
    pub const UP: u32 = 38;
    pub const DOWN: u32 = 40;
    pub const PAGE_UP: u32 = 33;
    pub const PAGE_DOWN: u32 = 34;
}
