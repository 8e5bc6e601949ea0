/// Engine configuration and its defaults.
///
/// Everything that can be expressed as data deserialises from camelCase JSON.
/// Hooks that need code (value comparison, display ordering, notice text
/// callbacks) are set with the builder methods at the bottom.
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::highlight::Boundary;
use super::search::{FieldKey, FuzzyOptions, SearchField};

/// Whether already-selected choices stay in the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum RenderSelectedChoices {
    #[default]
    Auto,
    Always,
}

impl From<String> for RenderSelectedChoices {
    fn from(s: String) -> Self {
        if s == "always" { Self::Always } else { Self::Auto }
    }
}

/// A notice template (`{value}` / `{count}` are substituted) or a callback.
#[derive(Clone)]
pub enum NoticeText {
    Template(String),
    Callback(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NoticeText {
    /// Render the notice for `arg` (a value, or a count for the max-item text).
    #[must_use]
    pub fn render(&self, arg: &str) -> String {
        match self {
            Self::Template(t) => t.replace("{value}", arg).replace("{count}", arg),
            Self::Callback(f) => f(arg),
        }
    }
}

impl fmt::Debug for NoticeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for NoticeText {
    fn from(s: &str) -> Self {
        Self::Template(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for NoticeText {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(Self::Template)
    }
}

/// Value equality used by duplicate detection and `set_choice_by_value`.
#[derive(Clone)]
pub struct ItemComparer(Arc<dyn Fn(&str, &str) -> bool + Send + Sync>);

impl ItemComparer {
    #[must_use]
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.0)(a, b)
    }
}

impl Default for ItemComparer {
    fn default() -> Self {
        Self(Arc::new(|a, b| a == b))
    }
}

impl fmt::Debug for ItemComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemComparer(..)")
    }
}

/// Display ordering applied to choice labels and group labels.
#[derive(Clone)]
pub struct SortFn(Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>);

impl SortFn {
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.0)(a, b)
    }
}

impl Default for SortFn {
    fn default() -> Self {
        Self(Arc::new(sort_by_alpha))
    }
}

impl fmt::Debug for SortFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortFn(..)")
    }
}

/// A preset choice or group, as found in config `choices` or `setChoices` input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PresetEntry {
    Group(GroupSpec),
    Choice(ChoiceSpec),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceSpec {
    pub value: String,
    pub label: Option<String>,
    pub selected: bool,
    pub disabled: bool,
    pub placeholder: bool,
    pub custom_properties: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    pub label: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub disabled: bool,
    pub choices: Vec<ChoiceSpec>,
}

/// A preset item: a raw value or a full description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemSpec {
    Value(String),
    Full {
        value: String,
        #[serde(default)]
        label: Option<String>,
        /// Choice the item refers to.
        #[serde(default)]
        id: Option<u32>,
        #[serde(default, rename = "customProperties")]
        custom_properties: Value,
        #[serde(default)]
        placeholder: bool,
    },
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub items: Vec<ItemSpec>,
    pub choices: Vec<PresetEntry>,
    /// Suppress engine warnings.
    pub silent: bool,
    /// Dropdown row limit outside of search. `None` renders everything.
    #[serde(deserialize_with = "limit")]
    pub render_choice_limit: Option<usize>,
    /// Maximum number of items. 0 is unlimited.
    #[serde(deserialize_with = "count")]
    pub max_item_count: usize,
    pub add_items: bool,
    pub remove_items: bool,
    pub remove_item_button: bool,
    pub edit_items: bool,
    pub duplicate_items_allowed: bool,
    /// Separator for the source element's initial value.
    pub delimiter: String,
    pub search_enabled: bool,
    pub search_choices: bool,
    /// Minimum query length that triggers a search.
    pub search_floor: usize,
    pub search_result_limit: usize,
    pub search_fields: Vec<SearchField>,
    #[serde(alias = "fuseOptions")]
    pub fuzzy: FuzzyOptions,
    pub should_sort: bool,
    pub should_sort_items: bool,
    pub render_selected_choices: RenderSelectedChoices,
    pub highlight_boundary: Boundary,
    pub prepend_value: Option<String>,
    pub append_value: Option<String>,
    /// Pattern typed values must match (text inputs only).
    pub regex_filter: Option<String>,
    pub placeholder_value: Option<String>,
    pub loading_text: String,
    pub no_results_text: NoticeText,
    pub no_choices_text: NoticeText,
    pub item_select_text: String,
    pub add_item_text: NoticeText,
    pub max_item_text: NoticeText,
    pub unique_item_text: NoticeText,
    pub custom_add_item_text: NoticeText,
    #[serde(skip)]
    pub item_comparer: ItemComparer,
    #[serde(skip)]
    pub sort_fn: SortFn,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            choices: Vec::new(),
            silent: false,
            render_choice_limit: None,
            max_item_count: 0,
            add_items: true,
            remove_items: true,
            remove_item_button: false,
            edit_items: false,
            duplicate_items_allowed: true,
            delimiter: ",".to_owned(),
            search_enabled: true,
            search_choices: true,
            search_floor: 1,
            search_result_limit: 4,
            search_fields: vec![FieldKey::Label.into(), FieldKey::Value.into()],
            fuzzy: FuzzyOptions::default(),
            should_sort: true,
            should_sort_items: false,
            render_selected_choices: RenderSelectedChoices::Auto,
            highlight_boundary: Boundary::Stop,
            prepend_value: None,
            append_value: None,
            regex_filter: None,
            placeholder_value: None,
            loading_text: "Loading...".to_owned(),
            no_results_text: "No results found".into(),
            no_choices_text: "No choices to choose from".into(),
            item_select_text: "Press to select".to_owned(),
            add_item_text: "Press Enter to add \"{value}\"".into(),
            max_item_text: "Only {count} values can be added".into(),
            unique_item_text: "Only unique values can be added".into(),
            custom_add_item_text: "Only values matching specific conditions can be added".into(),
            item_comparer: ItemComparer::default(),
            sort_fn: SortFn::default(),
        }
    }
}

impl Config {
    /// Use a custom value equality.
    #[must_use]
    pub fn with_item_comparer(
        mut self,
        f: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.item_comparer = ItemComparer(Arc::new(f));
        self
    }

    /// Use a custom display ordering.
    #[must_use]
    pub fn with_sort_fn(
        mut self,
        f: impl Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort_fn = SortFn(Arc::new(f));
        self
    }

    /// Compute the max-item notice with a callback receiving the limit.
    #[must_use]
    pub fn with_max_item_text(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.max_item_text = NoticeText::Callback(Arc::new(f));
        self
    }

    /// Compute the add-item notice with a callback receiving the typed value.
    #[must_use]
    pub fn with_add_item_text(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.add_item_text = NoticeText::Callback(Arc::new(f));
        self
    }

    /// Compute the duplicate notice with a callback receiving the value.
    #[must_use]
    pub fn with_unique_item_text(
        mut self,
        f: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.unique_item_text = NoticeText::Callback(Arc::new(f));
        self
    }
}

/// Limits accept any integer; zero and negatives mean "no limit".
fn limit<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    let raw = Option::<i64>::deserialize(d)?;
    Ok(raw.and_then(|n| usize::try_from(n).ok()).filter(|n| *n > 0))
}

fn count<'de, D: serde::Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    limit(d).map(Option::unwrap_or_default)
}

/// Case-insensitive, punctuation-blind, numeric-aware ordering.
///
/// `"Item 2"` sorts before `"item 10"`.
#[must_use]
pub fn sort_by_alpha(a: &str, b: &str) -> Ordering {
    let key = |s: &str| -> Vec<char> {
        s.chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let (a, b) = (key(a), key(b));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let start_a = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let num_a: String = a[start_a..i].iter().collect::<String>();
            let num_b: String = b[start_b..j].iter().collect::<String>();
            let num_a = num_a.trim_start_matches('0');
            let num_b = num_b.trim_start_matches('0');
            let ord = num_a.len().cmp(&num_b.len()).then_with(|| num_a.cmp(num_b));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.search_floor, 1);
        assert_eq!(config.search_result_limit, 4);
        assert!(config.duplicate_items_allowed);
        assert_eq!(config.search_fields.len(), 2);
        assert_eq!(config.render_selected_choices, RenderSelectedChoices::Auto);
    }

    #[test]
    fn test_camel_case_keys_and_fallbacks() {
        let config: Config = serde_json::from_str(
            r#"{
                "maxItemCount": 3,
                "duplicateItemsAllowed": false,
                "renderSelectedChoices": "sometimes",
                "searchFields": ["value", {"key": "label", "weight": 0.5}],
                "fuseOptions": {"threshold": 0.3},
                "uniqueItemText": "Already have {value}"
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_item_count, 3);
        assert!(!config.duplicate_items_allowed);
        assert_eq!(config.render_selected_choices, RenderSelectedChoices::Auto);
        assert!((config.search_fields[1].weight - 0.5).abs() < f64::EPSILON);
        assert!((config.fuzzy.threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.unique_item_text.render("red"), "Already have red");
    }

    #[test]
    fn test_preset_entries_parse_groups_and_choices() {
        let entries: Vec<PresetEntry> = serde_json::from_str(
            r#"[
                {"value": "a", "label": "A", "selected": true},
                {"label": "Group", "id": 5, "choices": [{"value": "b"}]}
            ]"#,
        )
        .unwrap();
        assert!(matches!(&entries[0], PresetEntry::Choice(c) if c.selected));
        assert!(matches!(&entries[1], PresetEntry::Group(g) if g.id == Some(5)));
    }

    #[test]
    fn test_sort_by_alpha_numeric_and_case() {
        assert_eq!(sort_by_alpha("Item 2", "item 10"), Ordering::Less);
        assert_eq!(sort_by_alpha("apple", "Banana"), Ordering::Less);
        assert_eq!(sort_by_alpha("a-b", "ab"), Ordering::Equal);
    }

    #[test]
    fn test_negative_limits_mean_unlimited() {
        let config: Config =
            serde_json::from_str(r#"{"renderChoiceLimit": -1, "maxItemCount": -1}"#).unwrap();
        assert_eq!(config.render_choice_limit, None);
        assert_eq!(config.max_item_count, 0);

        let config: Config = serde_json::from_str(r#"{"renderChoiceLimit": 5}"#).unwrap();
        assert_eq!(config.render_choice_limit, Some(5));
    }

    #[test]
    fn test_callback_notice() {
        let config = Config::default().with_max_item_text(|n| format!("max {n}"));
        assert_eq!(config.max_item_text.render("2"), "max 2");
    }
}
