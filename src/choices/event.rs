/// Outbound notifications for the UI layer and embedding application.
use serde::Serialize;
use serde_json::Value;

use super::model::{ChoiceId, ItemId};

/// Something observable happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    AddItem {
        id: ItemId,
        value: String,
        label: String,
        #[serde(skip_serializing_if = "Value::is_null")]
        custom_properties: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        group_value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        key_code: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveItem {
        id: ItemId,
        value: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        group_value: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    HighlightItem {
        id: ItemId,
        value: String,
        label: String,
        highlighted: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        group_value: Option<String>,
    },
    /// A choice was interacted with, before any selection.
    #[serde(rename_all = "camelCase")]
    Choice {
        id: ChoiceId,
        value: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        key_code: Option<u32>,
    },
    /// An item's presence changed.
    Change { value: String },
    #[serde(rename_all = "camelCase")]
    Search { value: String, result_count: usize },
    ShowDropdown,
    HideDropdown,
}

impl Event {
    /// Event name as used by the embedding page.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "addItem",
            Self::RemoveItem { .. } => "removeItem",
            Self::HighlightItem { .. } => "highlightItem",
            Self::Choice { .. } => "choice",
            Self::Change { .. } => "change",
            Self::Search { .. } => "search",
            Self::ShowDropdown => "showDropdown",
            Self::HideDropdown => "hideDropdown",
        }
    }
}
