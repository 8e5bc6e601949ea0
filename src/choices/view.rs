/// Read-only projections a renderer turns into markup.
use std::cmp::Ordering;

use serde::Serialize;

use super::config::{Config, RenderSelectedChoices};
use super::mode::Mode;
use super::model::{Choice, ChoiceId, GroupId, Item};
use super::policy::AddItemResponse;
use super::store::Store;

/// One line of the dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "camelCase")]
pub enum Row {
    Group {
        id: GroupId,
        label: String,
    },
    #[serde(rename_all = "camelCase")]
    Choice {
        id: ChoiceId,
        value: String,
        label: String,
        disabled: bool,
        selected: bool,
        placeholder: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// A search matched nothing.
    NoResults,
    /// There is nothing to choose from.
    NoChoices,
    /// The can-add gate refused.
    AddItem,
}

/// What the dropdown should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum DropdownView {
    Rows { rows: Vec<Row> },
    Notice { kind: NoticeKind, text: String },
}

impl DropdownView {
    /// Ids of the rows the highlight cursor may land on, in display order.
    #[must_use]
    pub fn selectable(&self) -> Vec<ChoiceId> {
        match self {
            Self::Rows { rows } => rows
                .iter()
                .filter_map(|row| match row {
                    Row::Choice {
                        id, disabled: false, ..
                    } => Some(*id),
                    _ => None,
                })
                .collect(),
            Self::Notice { .. } => Vec::new(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Rows { rows } => rows,
            Self::Notice { .. } => &[],
        }
    }
}

/// Build the dropdown view.
///
/// Groups are shown only outside of search. Placeholders always lead. While
/// searching, rows are ordered by score and capped at `search_result_limit`;
/// otherwise they follow `sort_fn` when `should_sort` is on and are capped at
/// `render_choice_limit` outside of groups.
#[must_use]
pub fn dropdown(
    store: &Store,
    config: &Config,
    is_searching: bool,
    gate: &AddItemResponse,
) -> DropdownView {
    let candidates: Vec<&Choice> = match config.render_selected_choices {
        RenderSelectedChoices::Auto => store.active_choices(),
        RenderSelectedChoices::Always => store.active_choices_with_selected(),
    };

    let mut rows = Vec::new();
    let mut groups = store.active_groups();
    if !groups.is_empty() && !is_searching {
        let loose_placeholders: Vec<&Choice> = candidates
            .iter()
            .copied()
            .filter(|c| c.placeholder && c.group_id.is_none())
            .collect();
        choice_rows(&loose_placeholders, config, false, false, &mut rows);

        if config.should_sort {
            groups.sort_by(|a, b| config.sort_fn.compare(&a.value, &b.value));
        }
        for group in groups {
            let members: Vec<&Choice> = candidates
                .iter()
                .copied()
                .filter(|c| c.group_id == Some(group.id))
                .collect();
            if members.is_empty() {
                continue;
            }
            rows.push(Row::Group {
                id: group.id,
                label: group.value.clone(),
            });
            choice_rows(&members, config, false, true, &mut rows);
        }
    } else {
        choice_rows(&candidates, config, is_searching, false, &mut rows);
    }

    if rows.is_empty() {
        return if is_searching {
            DropdownView::Notice {
                kind: NoticeKind::NoResults,
                text: config.no_results_text.render(""),
            }
        } else {
            DropdownView::Notice {
                kind: NoticeKind::NoChoices,
                text: config.no_choices_text.render(""),
            }
        };
    }

    if !gate.response {
        return DropdownView::Notice {
            kind: NoticeKind::AddItem,
            text: gate.notice.clone(),
        };
    }

    DropdownView::Rows { rows }
}

fn choice_rows(
    choices: &[&Choice],
    config: &Config,
    is_searching: bool,
    within_group: bool,
    out: &mut Vec<Row>,
) {
    let (placeholders, mut normal): (Vec<&Choice>, Vec<&Choice>) =
        choices.iter().copied().partition(|c| c.placeholder);

    if is_searching {
        normal.sort_by(|a, b| by_score(a.score, b.score));
    } else if config.should_sort {
        normal.sort_by(|a, b| config.sort_fn.compare(&a.label, &b.label));
    }

    let limit = if is_searching {
        config.search_result_limit
    } else if within_group {
        usize::MAX
    } else {
        config.render_choice_limit.filter(|l| *l > 0).unwrap_or(usize::MAX)
    };

    out.extend(
        placeholders
            .into_iter()
            .chain(normal)
            .take(limit)
            .map(|c| Row::Choice {
                id: c.id,
                value: c.value.clone(),
                label: c.label.clone(),
                disabled: c.disabled,
                selected: c.selected,
                placeholder: c.placeholder,
                score: c.score,
            }),
    );
}

fn by_score(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Items in display order.
#[must_use]
pub fn item_list<'a>(store: &'a Store, config: &Config, mode: Mode) -> Vec<&'a Item> {
    let mut items = store.active_items();
    if config.should_sort_items && mode.supports_item_sorting() {
        items.sort_by(|a, b| config.sort_fn.compare(&a.label, &b.label));
    }
    items
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::choices::action::{self, NewChoice, SearchMatch};

    fn add(store: &mut Store, id: u32, label: &str, group: Option<u64>) {
        store.dispatch(&action::add_choice(NewChoice {
            id: ChoiceId(id),
            value: label.to_lowercase(),
            label: label.to_owned(),
            group_id: group.map(GroupId),
            disabled: false,
            placeholder: false,
            custom_properties: Value::Null,
            key_code: None,
        }));
    }

    fn accept() -> AddItemResponse {
        AddItemResponse {
            response: true,
            notice: String::new(),
        }
    }

    fn labels(view: &DropdownView) -> Vec<String> {
        view.rows()
            .iter()
            .map(|r| match r {
                Row::Group { label, .. } => format!("[{label}]"),
                Row::Choice { label, .. } => label.clone(),
            })
            .collect()
    }

    #[test]
    fn test_sorted_flat_list() {
        let mut store = Store::new();
        add(&mut store, 1, "Cherry", None);
        add(&mut store, 2, "Apple", None);
        let view = dropdown(&store, &Config::default(), false, &accept());
        assert_eq!(labels(&view), vec!["Apple", "Cherry"]);
        assert_eq!(view.selectable(), vec![ChoiceId(2), ChoiceId(1)]);
    }

    #[test]
    fn test_groups_render_headers() {
        let mut store = Store::new();
        store.dispatch(&action::add_group("Fruit", GroupId(1), true, false));
        store.dispatch(&action::add_group("Empty", GroupId(2), true, false));
        add(&mut store, 1, "Pear", Some(1));
        add(&mut store, 2, "Fig", Some(1));
        let view = dropdown(&store, &Config::default(), false, &accept());
        assert_eq!(labels(&view), vec!["[Fruit]", "Fig", "Pear"]);
    }

    #[test]
    fn test_search_orders_by_score_and_limits() {
        let mut store = Store::new();
        for (id, label) in [(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e"), (6, "f")] {
            add(&mut store, id, label, None);
        }
        store.dispatch(&action::filter_choices(
            (1..=6)
                .rev()
                .map(|id| SearchMatch {
                    id: ChoiceId(id),
                    score: f64::from(6 - id) / 10.0,
                })
                .collect(),
        ));
        let view = dropdown(&store, &Config::default(), true, &accept());
        assert_eq!(labels(&view), vec!["f", "e", "d", "c"]);
    }

    #[test]
    fn test_notices() {
        let mut store = Store::new();
        let config = Config::default();
        assert!(matches!(
            dropdown(&store, &config, false, &accept()),
            DropdownView::Notice { kind: NoticeKind::NoChoices, .. }
        ));
        assert!(matches!(
            dropdown(&store, &config, true, &accept()),
            DropdownView::Notice { kind: NoticeKind::NoResults, .. }
        ));

        add(&mut store, 1, "x", None);
        let refused = AddItemResponse {
            response: false,
            notice: "full".to_owned(),
        };
        assert_eq!(
            dropdown(&store, &config, false, &refused),
            DropdownView::Notice {
                kind: NoticeKind::AddItem,
                text: "full".to_owned()
            }
        );
    }
}
