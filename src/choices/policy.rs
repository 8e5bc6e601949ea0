/// The can-add gate: whether a candidate value may become an item.
use regex::Regex;
use serde::Serialize;

use super::config::Config;
use super::mode::Mode;
use super::model::Item;

/// Outcome of the gate. A refusal carries a notice for the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItemResponse {
    pub response: bool,
    pub notice: String,
}

/// Evaluate the gate for `value` against the currently active items.
///
/// Checks run in order and the first refusal wins: the item limit, then the
/// acceptance pattern (free-text modes only), then duplicates. In exclusive
/// mode the new item replaces every existing one, so nothing counts toward
/// the limit.
#[must_use]
pub fn can_add_item(
    mode: Mode,
    config: &Config,
    filter: Option<&Regex>,
    active_items: &[&Item],
    value: &str,
) -> AddItemResponse {
    let accepted = AddItemResponse {
        response: true,
        notice: config.add_item_text.render(value),
    };
    let occupied = if mode.is_exclusive() { 0 } else { active_items.len() };
    if config.max_item_count > 0 && occupied >= config.max_item_count {
        return refuse(
            config
                .max_item_text
                .render(&config.max_item_count.to_string()),
        );
    }

    if mode.accepts_free_text()
        && config.add_items
        && filter.is_some_and(|re| !re.is_match(value))
    {
        return refuse(config.custom_add_item_text.render(value));
    }

    let is_duplicate = active_items
        .iter()
        .any(|item| config.item_comparer.matches(&item.value, value));
    if !config.duplicate_items_allowed && is_duplicate {
        return refuse(config.unique_item_text.render(value));
    }

    accepted
}

fn refuse(notice: String) -> AddItemResponse {
    AddItemResponse {
        response: false,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::choices::model::ItemId;

    fn item(id: u32, value: &str) -> Item {
        Item {
            id: ItemId(id),
            choice_id: None,
            value: value.to_owned(),
            label: value.to_owned(),
            group_id: None,
            highlighted: false,
            placeholder: false,
            custom_properties: Value::Null,
            key_code: None,
        }
    }

    #[test]
    fn test_accepts_with_add_notice() {
        let res = can_add_item(Mode::Text, &Config::default(), None, &[], "red");
        assert!(res.response);
        assert_eq!(res.notice, "Press Enter to add \"red\"");
    }

    #[test]
    fn test_max_count_wins_over_everything() {
        let config = Config {
            max_item_count: 2,
            duplicate_items_allowed: true,
            ..Config::default()
        };
        let items = [item(1, "a"), item(2, "b")];
        let refs: Vec<&Item> = items.iter().collect();
        let re = Regex::new(".*").ok();
        let res = can_add_item(Mode::SelectMultiple, &config, re.as_ref(), &refs, "c");
        assert!(!res.response);
        assert_eq!(res.notice, "Only 2 values can be added");
    }

    #[test]
    fn test_duplicate_refused() {
        let config = Config {
            duplicate_items_allowed: false,
            ..Config::default()
        };
        let items = [item(1, "red")];
        let refs: Vec<&Item> = items.iter().collect();
        let res = can_add_item(Mode::Text, &config, None, &refs, "red");
        assert!(!res.response);
        assert!(!res.notice.is_empty());
    }

    #[test]
    fn test_custom_comparer() {
        let config = Config {
            duplicate_items_allowed: false,
            ..Config::default()
        }
        .with_item_comparer(|a, b| a.eq_ignore_ascii_case(b));
        let items = [item(1, "Red")];
        let refs: Vec<&Item> = items.iter().collect();
        assert!(!can_add_item(Mode::Text, &config, None, &refs, "RED").response);
    }

    #[test]
    fn test_regex_only_for_free_text() {
        let config = Config::default();
        let re = Regex::new(r"^\d+$").ok();
        assert!(!can_add_item(Mode::Text, &config, re.as_ref(), &[], "abc").response);
        assert!(can_add_item(Mode::Text, &config, re.as_ref(), &[], "123").response);
        assert!(can_add_item(Mode::SelectMultiple, &config, re.as_ref(), &[], "abc").response);
    }

    #[test]
    fn test_select_one_ignores_pattern() {
        let re = Regex::new(r"^\d+$").ok();
        assert!(can_add_item(Mode::SelectOne, &Config::default(), re.as_ref(), &[], "b").response);
    }

    #[test]
    fn test_select_one_replacement_is_not_limited() {
        let config = Config {
            max_item_count: 1,
            ..Config::default()
        };
        let items = [item(1, "a")];
        let refs: Vec<&Item> = items.iter().collect();
        assert!(can_add_item(Mode::SelectOne, &config, None, &refs, "b").response);
        assert!(!can_add_item(Mode::SelectMultiple, &config, None, &refs, "b").response);
    }
}
